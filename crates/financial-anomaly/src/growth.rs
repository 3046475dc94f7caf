//! Growth consistency over a chronological ARR projection.

use benchmark_core::stats::{coefficient_of_variation, growth_rates, mean, population_std_dev, population_variance};
use benchmark_core::{HealthFinding, RiskSeverity, RiskType};
use serde::{Deserialize, Serialize};

/// Minimum number of ARR points needed to judge consistency
pub const MIN_GROWTH_POINTS: usize = 3;

const ACCELERATION_RATIO: f64 = 1.10;
const DECELERATION_RATIO: f64 = 0.90;
/// Mean period growth below which a decelerating series is a stall risk
const STALL_GROWTH: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthTrend {
    Accelerating,
    Stable,
    Decelerating,
}

impl GrowthTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthTrend::Accelerating => "accelerating",
            GrowthTrend::Stable => "stable",
            GrowthTrend::Decelerating => "decelerating",
        }
    }

    /// Compare the mean of the first half of `rates` with the second half.
    pub fn from_rates(rates: &[f64]) -> Self {
        if rates.len() < 2 {
            return GrowthTrend::Stable;
        }
        let (first, second) = rates.split_at(rates.len() / 2);
        let (early, late) = (mean(first), mean(second));

        if early > 0.0 {
            let ratio = late / early;
            if ratio > ACCELERATION_RATIO {
                GrowthTrend::Accelerating
            } else if ratio < DECELERATION_RATIO {
                GrowthTrend::Decelerating
            } else {
                GrowthTrend::Stable
            }
        } else {
            // Ratio is meaningless around zero or negative growth
            let delta = late - early;
            if delta > f64::EPSILON {
                GrowthTrend::Accelerating
            } else if delta < -f64::EPSILON {
                GrowthTrend::Decelerating
            } else {
                GrowthTrend::Stable
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConsistency {
    pub growth_rates: Vec<f64>,
    pub mean_growth: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// `None` when mean growth is zero
    pub coefficient_of_variation: Option<f64>,
    pub is_consistent: bool,
    pub trend: GrowthTrend,
    pub red_flags: Vec<HealthFinding>,
}

pub struct GrowthConsistencyAnalyzer {
    cov_ceiling: f64,
}

impl Default for GrowthConsistencyAnalyzer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl GrowthConsistencyAnalyzer {
    pub fn new(cov_ceiling: f64) -> Self {
        Self { cov_ceiling }
    }

    pub fn analyze(&self, projected_arr: &[f64]) -> GrowthConsistency {
        let points: Vec<f64> = projected_arr.iter().copied().filter(|v| v.is_finite()).collect();
        let rates = growth_rates(&points);

        if points.len() < MIN_GROWTH_POINTS || rates.len() < MIN_GROWTH_POINTS - 1 {
            tracing::debug!(
                "Growth consistency skipped: {} usable ARR points",
                points.len()
            );
            return GrowthConsistency {
                mean_growth: mean(&rates),
                variance: 0.0,
                std_dev: 0.0,
                coefficient_of_variation: None,
                is_consistent: true,
                trend: GrowthTrend::Stable,
                growth_rates: rates,
                red_flags: vec![HealthFinding::new(
                    RiskSeverity::Low,
                    format!(
                        "Insufficient data: at least {} ARR projection points are needed to assess growth consistency",
                        MIN_GROWTH_POINTS
                    ),
                )],
            };
        }

        let mean_growth = mean(&rates);
        let variance = population_variance(&rates);
        let std_dev = population_std_dev(&rates);
        let cov = coefficient_of_variation(&rates);
        let trend = GrowthTrend::from_rates(&rates);
        let mut red_flags = Vec::new();

        let is_consistent = match cov {
            Some(cov) if cov > self.cov_ceiling => {
                red_flags.push(
                    HealthFinding::new(
                        RiskSeverity::Medium,
                        format!(
                            "Inconsistent growth: coefficient of variation {:.2} exceeds {:.2}",
                            cov, self.cov_ceiling
                        ),
                    )
                    .with_kind(RiskType::Inconsistency),
                );
                false
            }
            Some(_) => true,
            None => {
                red_flags.push(HealthFinding::new(
                    RiskSeverity::Low,
                    "Growth consistency indeterminate: mean growth is zero",
                ));
                std_dev < f64::EPSILON
            }
        };

        if trend == GrowthTrend::Decelerating && mean_growth < STALL_GROWTH {
            red_flags.push(HealthFinding::new(
                RiskSeverity::High,
                format!(
                    "Growth is decelerating with mean period growth of {:.1}%",
                    mean_growth * 100.0
                ),
            ));
        }

        GrowthConsistency {
            growth_rates: rates,
            mean_growth,
            variance,
            std_dev,
            coefficient_of_variation: cov,
            is_consistent,
            trend,
            red_flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_ratio_series() {
        let result = GrowthConsistencyAnalyzer::default().analyze(&[100.0, 110.0, 121.0, 133.1]);
        assert_eq!(result.growth_rates.len(), 3);
        assert_abs_diff_eq!(result.mean_growth, 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(result.coefficient_of_variation.unwrap(), 0.0, epsilon = 1e-9);
        assert!(result.is_consistent);
        assert_eq!(result.trend, GrowthTrend::Stable);
        assert!(result.red_flags.is_empty());
    }

    #[test]
    fn test_short_series_is_optimistic() {
        let result = GrowthConsistencyAnalyzer::default().analyze(&[100.0, 150.0]);
        assert!(result.is_consistent);
        assert_eq!(result.red_flags.len(), 1);
        assert_eq!(result.red_flags[0].severity, RiskSeverity::Low);
        assert!(result.red_flags[0].message.starts_with("Insufficient data"));
    }

    #[test]
    fn test_erratic_growth_is_inconsistent() {
        // rates: 1.0, 0.0, 0.5
        let result = GrowthConsistencyAnalyzer::default().analyze(&[100.0, 200.0, 200.0, 300.0]);
        assert!(result.coefficient_of_variation.unwrap() > 0.5);
        assert!(!result.is_consistent);
        let dispersion = result
            .red_flags
            .iter()
            .find(|f| f.severity == RiskSeverity::Medium)
            .unwrap();
        assert_eq!(dispersion.kind, RiskType::Inconsistency);
    }

    #[test]
    fn test_only_dispersion_is_an_inconsistency() {
        // dispersion stays under a loose ceiling, but the series stalls
        let stalled = GrowthConsistencyAnalyzer::new(10.0).analyze(&[100.0, 110.0, 118.8, 120.0, 120.0]);
        assert!(!stalled.red_flags.is_empty());
        assert!(stalled
            .red_flags
            .iter()
            .all(|f| f.kind == RiskType::FinancialAnomaly));

        let short = GrowthConsistencyAnalyzer::default().analyze(&[100.0]);
        assert_eq!(short.red_flags[0].kind, RiskType::FinancialAnomaly);
    }

    #[test]
    fn test_ceiling_is_configurable() {
        let series = [100.0, 200.0, 200.0, 300.0];
        assert!(GrowthConsistencyAnalyzer::new(2.0).analyze(&series).is_consistent);
    }

    #[test]
    fn test_zero_mean_is_indeterminate() {
        let flat = GrowthConsistencyAnalyzer::default().analyze(&[100.0, 100.0, 100.0]);
        assert!(flat.coefficient_of_variation.is_none());
        assert!(flat.is_consistent);
        assert_eq!(flat.red_flags[0].severity, RiskSeverity::Low);

        let oscillating = GrowthConsistencyAnalyzer::default().analyze(&[100.0, 150.0, 100.0, 125.0]);
        // rates: 0.5, -1/3, 0.25 -> mean is not zero, so this one has a CoV
        assert!(oscillating.coefficient_of_variation.is_some());
    }

    #[test]
    fn test_stalling_growth_is_high() {
        // rates: 0.10, 0.08, ~0.01, 0.0
        let result = GrowthConsistencyAnalyzer::new(10.0).analyze(&[100.0, 110.0, 118.8, 120.0, 120.0]);
        assert_eq!(result.trend, GrowthTrend::Decelerating);
        assert!(result.mean_growth < 0.05);
        assert!(result
            .red_flags
            .iter()
            .any(|f| f.severity == RiskSeverity::High));
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(GrowthTrend::from_rates(&[0.1, 0.1, 0.2, 0.2]), GrowthTrend::Accelerating);
        assert_eq!(GrowthTrend::from_rates(&[0.2, 0.2, 0.1, 0.1]), GrowthTrend::Decelerating);
        assert_eq!(GrowthTrend::from_rates(&[0.1, 0.105]), GrowthTrend::Stable);
        // non-positive early growth falls back to a difference
        assert_eq!(GrowthTrend::from_rates(&[-0.1, 0.05]), GrowthTrend::Accelerating);
        assert_eq!(GrowthTrend::from_rates(&[0.0, -0.05]), GrowthTrend::Decelerating);
    }
}

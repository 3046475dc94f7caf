//! Unit Economics Health
//!
//! Scores LTV:CAC, gross margin, CAC payback and burn multiple into a single
//! health value in `[0, 1]`. Each failing check deducts a fixed amount.

use benchmark_core::stats::as_fraction;
use benchmark_core::{CompanyMetrics, HealthFinding, RiskSeverity};
use serde::{Deserialize, Serialize};

use crate::sector::SectorClass;
use crate::thresholds::AnomalyThresholds;

/// Gross margin assumed for payback when none is reported
pub const ASSUMED_GROSS_MARGIN: f64 = 0.5;

/// Ratios derived from raw company metrics, shared by the threshold engine
/// and the health scorer so both read the same numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedRatios {
    pub ltv_cac_ratio: Option<f64>,
    /// Fraction
    pub gross_margin: Option<f64>,
    /// Months
    pub payback_period: Option<f64>,
    pub burn_multiple: Option<f64>,
}

impl DerivedRatios {
    pub fn from_metrics(metrics: &CompanyMetrics) -> Self {
        let gross_margin = metrics
            .revenue
            .gross_margin
            .filter(|m| m.is_finite())
            .map(as_fraction);

        let payback_period = match (metrics.traction.cac, metrics.monthly_recurring_revenue()) {
            (Some(cac), Some(mrr)) => {
                let denominator = mrr * gross_margin.unwrap_or(ASSUMED_GROSS_MARGIN);
                if denominator > 0.0 && cac.is_finite() {
                    Some(cac / denominator)
                } else {
                    None
                }
            }
            _ => None,
        };

        let burn_multiple = match (metrics.team.burn_rate, metrics.revenue.arr) {
            (Some(burn), Some(arr)) if arr > 0.0 && burn.is_finite() => Some(burn * 12.0 / arr),
            _ => None,
        };

        Self {
            ltv_cac_ratio: metrics.ltv_cac_ratio().filter(|r| r.is_finite()),
            gross_margin,
            payback_period,
            burn_multiple,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitEconomicsHealth {
    pub ltv_cac_ratio: Option<f64>,
    pub payback_period: Option<f64>,
    pub gross_margin: Option<f64>,
    pub burn_multiple: Option<f64>,
    /// 0.0 to 1.0
    pub health_score: f64,
    pub red_flags: Vec<HealthFinding>,
    pub warnings: Vec<String>,
}

pub struct UnitEconomicsHealthScorer {
    thresholds: AnomalyThresholds,
}

impl Default for UnitEconomicsHealthScorer {
    fn default() -> Self {
        Self::new(AnomalyThresholds::default())
    }
}

impl UnitEconomicsHealthScorer {
    pub fn new(thresholds: AnomalyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn score(&self, metrics: &CompanyMetrics, class: SectorClass) -> UnitEconomicsHealth {
        self.score_ratios(&DerivedRatios::from_metrics(metrics), class)
    }

    pub fn score_ratios(&self, ratios: &DerivedRatios, class: SectorClass) -> UnitEconomicsHealth {
        let t = &self.thresholds;
        let sector = t.sector(class);
        let mut score: f64 = 1.0;
        let mut red_flags = Vec::new();
        let mut warnings = Vec::new();

        match ratios.ltv_cac_ratio {
            Some(ratio) if ratio < t.ltv_cac_minimum => {
                score -= 0.4;
                red_flags.push(HealthFinding::new(
                    RiskSeverity::High,
                    format!(
                        "LTV:CAC of {:.1}x is below the {:.1}x minimum",
                        ratio, t.ltv_cac_minimum
                    ),
                ));
            }
            Some(ratio) if ratio < t.ltv_cac_healthy => {
                score -= 0.2;
                warnings.push(format!(
                    "LTV:CAC of {:.1}x is below the {:.1}x healthy level",
                    ratio, t.ltv_cac_healthy
                ));
            }
            Some(_) => {}
            None => {
                score -= 0.3;
                warnings.push("LTV or CAC not reported; unit economics cannot be verified".to_string());
            }
        }

        match ratios.gross_margin {
            Some(margin) if margin < sector.margin_minimum => {
                score -= 0.3;
                red_flags.push(HealthFinding::new(
                    RiskSeverity::High,
                    format!(
                        "Gross margin of {:.1}% is below the {:.0}% {} minimum",
                        margin * 100.0,
                        sector.margin_minimum * 100.0,
                        class.as_str()
                    ),
                ));
            }
            Some(margin) if margin < sector.margin_healthy => {
                score -= 0.1;
                warnings.push(format!(
                    "Gross margin of {:.1}% is below the {:.0}% healthy level",
                    margin * 100.0,
                    sector.margin_healthy * 100.0
                ));
            }
            Some(_) => {}
            None => {
                score -= 0.2;
                warnings.push("Gross margin not reported".to_string());
            }
        }

        if let Some(payback) = ratios.payback_period {
            if payback > t.payback_critical_months {
                score -= 0.3;
                red_flags.push(HealthFinding::new(
                    RiskSeverity::High,
                    format!(
                        "CAC payback of {:.1} months exceeds {:.0} months",
                        payback, t.payback_critical_months
                    ),
                ));
            } else if payback > t.payback_warning_months {
                score -= 0.1;
                warnings.push(format!(
                    "CAC payback of {:.1} months is above the {:.0} month target",
                    payback, t.payback_warning_months
                ));
            }
        }

        if let Some(burn) = ratios.burn_multiple {
            if burn > t.burn_multiple_critical {
                score -= 0.2;
                red_flags.push(HealthFinding::new(
                    RiskSeverity::Medium,
                    format!(
                        "Burn multiple of {:.1}x exceeds {:.1}x",
                        burn, t.burn_multiple_critical
                    ),
                ));
            } else if burn > t.burn_multiple_warning {
                score -= 0.1;
                warnings.push(format!(
                    "Burn multiple of {:.1}x is above {:.1}x",
                    burn, t.burn_multiple_warning
                ));
            }
        }

        UnitEconomicsHealth {
            ltv_cac_ratio: ratios.ltv_cac_ratio,
            payback_period: ratios.payback_period,
            gross_margin: ratios.gross_margin,
            burn_multiple: ratios.burn_multiple,
            health_score: score.clamp(0.0, 1.0),
            red_flags,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ratios(ltv_cac: Option<f64>, margin: Option<f64>, payback: Option<f64>, burn: Option<f64>) -> DerivedRatios {
        DerivedRatios {
            ltv_cac_ratio: ltv_cac,
            gross_margin: margin,
            payback_period: payback,
            burn_multiple: burn,
        }
    }

    #[test]
    fn test_healthy_company_scores_one() {
        let scorer = UnitEconomicsHealthScorer::default();
        let health = scorer.score_ratios(&ratios(Some(6.0), Some(0.8), Some(12.0), Some(1.5)), SectorClass::Saas);
        assert_abs_diff_eq!(health.health_score, 1.0, epsilon = 1e-12);
        assert!(health.red_flags.is_empty());
        assert!(health.warnings.is_empty());
    }

    #[test]
    fn test_deductions_stack() {
        let scorer = UnitEconomicsHealthScorer::default();
        // LTV:CAC -0.2, margin -0.1, payback -0.1, burn -0.1
        let health = scorer.score_ratios(&ratios(Some(4.0), Some(0.7), Some(24.0), Some(4.0)), SectorClass::Saas);
        assert_abs_diff_eq!(health.health_score, 0.5, epsilon = 1e-9);
        assert!(health.red_flags.is_empty());
        assert_eq!(health.warnings.len(), 4);
    }

    #[test]
    fn test_score_is_floored_at_zero() {
        let scorer = UnitEconomicsHealthScorer::default();
        let health = scorer.score_ratios(&ratios(Some(1.0), Some(0.1), Some(48.0), Some(8.0)), SectorClass::Saas);
        assert_eq!(health.health_score, 0.0);
        assert_eq!(health.red_flags.len(), 4);
        assert_eq!(health.red_flags[3].severity, RiskSeverity::Medium);
    }

    #[test]
    fn test_missing_inputs() {
        let scorer = UnitEconomicsHealthScorer::default();
        let health = scorer.score_ratios(&DerivedRatios::default(), SectorClass::Default);
        // missing LTV/CAC -0.3 and margin -0.2; payback and burn not computable
        assert_abs_diff_eq!(health.health_score, 0.5, epsilon = 1e-9);
        assert_eq!(health.warnings.len(), 2);
    }

    #[test]
    fn test_payback_boundary_is_exclusive() {
        let scorer = UnitEconomicsHealthScorer::default();
        let at_critical = scorer.score_ratios(&ratios(Some(6.0), Some(0.8), Some(36.0), None), SectorClass::Saas);
        assert_abs_diff_eq!(at_critical.health_score, 0.9, epsilon = 1e-9);
        let at_warning = scorer.score_ratios(&ratios(Some(6.0), Some(0.8), Some(18.0), None), SectorClass::Saas);
        assert_abs_diff_eq!(at_warning.health_score, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_derived_ratios() {
        let mut m = CompanyMetrics::default();
        m.revenue.arr = Some(1_200_000.0);
        m.revenue.gross_margin = Some(80.0);
        m.traction.ltv = Some(12_000.0);
        m.traction.cac = Some(4_000.0);
        m.team.burn_rate = Some(200_000.0);

        let r = DerivedRatios::from_metrics(&m);
        assert_abs_diff_eq!(r.gross_margin.unwrap(), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(r.ltv_cac_ratio.unwrap(), 3.0, epsilon = 1e-12);
        // 4000 / (100000 * 0.8)
        assert_abs_diff_eq!(r.payback_period.unwrap(), 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(r.burn_multiple.unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_payback_assumes_half_margin() {
        let mut m = CompanyMetrics::default();
        m.revenue.mrr = Some(1_000.0);
        m.traction.cac = Some(20_000.0);
        let r = DerivedRatios::from_metrics(&m);
        assert_abs_diff_eq!(r.payback_period.unwrap(), 40.0, epsilon = 1e-12);

        m.revenue.mrr = Some(0.0);
        assert!(DerivedRatios::from_metrics(&m).payback_period.is_none());
    }
}

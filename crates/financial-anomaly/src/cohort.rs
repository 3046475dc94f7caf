//! Cohort retention health.

use benchmark_core::stats::{as_fraction, mean};
use benchmark_core::{CohortData, HealthFinding, RiskSeverity};
use serde::{Deserialize, Serialize};

const IMPROVING_RATIO: f64 = 1.05;
const DETERIORATING_RATIO: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionTrend {
    Improving,
    Stable,
    Deteriorating,
}

impl RetentionTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionTrend::Improving => "improving",
            RetentionTrend::Stable => "stable",
            RetentionTrend::Deteriorating => "deteriorating",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortHealth {
    pub cohort_count: usize,
    pub first_cohort_retention: Option<f64>,
    pub last_cohort_retention: Option<f64>,
    pub retention_trend: RetentionTrend,
    pub mean_churn_rate: Option<f64>,
    pub is_healthy: bool,
    pub red_flags: Vec<HealthFinding>,
}

pub struct CohortHealthAnalyzer {
    churn_ceiling: f64,
}

impl Default for CohortHealthAnalyzer {
    fn default() -> Self {
        Self::new(0.15)
    }
}

impl CohortHealthAnalyzer {
    pub fn new(churn_ceiling: f64) -> Self {
        Self { churn_ceiling }
    }

    /// `cohorts` must be in chronological order.
    pub fn analyze(&self, cohorts: &[CohortData]) -> CohortHealth {
        let mut red_flags = Vec::new();

        let (first, last) = match (cohorts.first(), cohorts.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                red_flags.push(HealthFinding::new(
                    RiskSeverity::Medium,
                    "No cohort data provided; retention cannot be verified",
                ));
                return CohortHealth {
                    cohort_count: 0,
                    first_cohort_retention: None,
                    last_cohort_retention: None,
                    retention_trend: RetentionTrend::Stable,
                    mean_churn_rate: None,
                    is_healthy: false,
                    red_flags,
                };
            }
        };

        let first_retention = mean_retention(first);
        let last_retention = mean_retention(last);

        let retention_trend = if cohorts.len() < 2 {
            RetentionTrend::Stable
        } else if last_retention >= first_retention * IMPROVING_RATIO {
            RetentionTrend::Improving
        } else if last_retention <= first_retention * DETERIORATING_RATIO {
            red_flags.push(HealthFinding::new(
                RiskSeverity::Medium,
                format!(
                    "Retention is deteriorating: cohort {} retains {:.1}% against {:.1}% for cohort {}",
                    last.period,
                    last_retention * 100.0,
                    first_retention * 100.0,
                    first.period
                ),
            ));
            RetentionTrend::Deteriorating
        } else {
            RetentionTrend::Stable
        };

        let churn: Vec<f64> = cohorts
            .iter()
            .map(|c| c.churn_rate)
            .filter(|c| c.is_finite())
            .map(as_fraction)
            .collect();
        let mean_churn_rate = if churn.is_empty() { None } else { Some(mean(&churn)) };

        if let Some(churn) = mean_churn_rate.filter(|c| *c > self.churn_ceiling) {
            red_flags.push(HealthFinding::new(
                RiskSeverity::High,
                format!(
                    "Mean cohort churn of {:.1}% exceeds {:.0}%",
                    churn * 100.0,
                    self.churn_ceiling * 100.0
                ),
            ));
        }

        CohortHealth {
            cohort_count: cohorts.len(),
            first_cohort_retention: Some(first_retention),
            last_cohort_retention: Some(last_retention),
            retention_trend,
            mean_churn_rate,
            is_healthy: red_flags.is_empty(),
            red_flags,
        }
    }
}

fn mean_retention(cohort: &CohortData) -> f64 {
    let rates: Vec<f64> = cohort
        .retention_rates
        .iter()
        .copied()
        .filter(|r| r.is_finite())
        .map(as_fraction)
        .collect();
    mean(&rates)
}

//! Overall financial health score.

use crate::cohort::CohortHealth;
use crate::detector::ChurnAnalysis;
use crate::growth::GrowthConsistency;
use crate::unit_economics::UnitEconomicsHealth;

const CHURN_WEIGHT: f64 = 0.25;
const UNIT_ECONOMICS_WEIGHT: f64 = 0.35;
const GROWTH_WEIGHT: f64 = 0.25;
const COHORT_WEIGHT: f64 = 0.15;

pub struct HealthScoreAggregator;

impl HealthScoreAggregator {
    /// Weighted sum in `[0, 1]`. Churn, growth and cohort terms are all or
    /// nothing; the unit-economics term scales with its health score.
    pub fn aggregate(
        churn: &ChurnAnalysis,
        unit_economics: &UnitEconomicsHealth,
        growth: &GrowthConsistency,
        cohort: &CohortHealth,
    ) -> f64 {
        let indicator = |healthy: bool| if healthy { 1.0 } else { 0.0 };

        let score = CHURN_WEIGHT * indicator(churn.is_healthy)
            + UNIT_ECONOMICS_WEIGHT * unit_economics.health_score
            + GROWTH_WEIGHT * indicator(growth.is_consistent)
            + COHORT_WEIGHT * indicator(cohort.is_healthy);

        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

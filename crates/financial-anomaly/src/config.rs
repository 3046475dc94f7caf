use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::thresholds::AnomalyThresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    pub cov_ceiling: f64,          // 0.5
    pub cohort_churn_ceiling: f64, // 0.15
    pub thresholds: AnomalyThresholds,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            cov_ceiling: 0.5,
            cohort_churn_ceiling: 0.15,
            thresholds: AnomalyThresholds::default(),
        }
    }
}

impl AnomalyConfig {
    /// Load overrides from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        let config = Self {
            cov_ceiling: dotenvy::var("ANOMALY_COV_CEILING")
                .unwrap_or_else(|_| "0.5".to_string())
                .parse()
                .context("ANOMALY_COV_CEILING must be a number")?,
            cohort_churn_ceiling: dotenvy::var("ANOMALY_COHORT_CHURN_CEILING")
                .unwrap_or_else(|_| "0.15".to_string())
                .parse()
                .context("ANOMALY_COHORT_CHURN_CEILING must be a number")?,
            thresholds: AnomalyThresholds::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cov_ceiling.is_finite() || self.cov_ceiling <= 0.0 {
            bail!("CoV ceiling must be positive, got {}", self.cov_ceiling);
        }
        if !(0.0..=1.0).contains(&self.cohort_churn_ceiling) {
            bail!(
                "cohort churn ceiling must be a fraction in [0, 1], got {}",
                self.cohort_churn_ceiling
            );
        }
        let t = &self.thresholds;
        if t.ltv_cac_minimum > t.ltv_cac_healthy
            || t.payback_warning_months > t.payback_critical_months
            || t.burn_multiple_warning > t.burn_multiple_critical
        {
            bail!("warning thresholds must not exceed their critical counterparts");
        }
        for sector in [&t.saas, &t.ecommerce, &t.marketplace, &t.default] {
            if sector.churn_warning > sector.churn_critical || sector.margin_minimum > sector.margin_healthy {
                bail!("sector thresholds are out of order: {:?}", sector);
            }
        }
        Ok(())
    }
}

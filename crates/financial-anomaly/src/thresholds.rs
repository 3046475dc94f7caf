//! Threshold table for the anomaly rules.
//!
//! Churn and margin limits depend on the sector class; LTV:CAC, payback and
//! burn-multiple limits are shared across sectors.

use serde::{Deserialize, Serialize};

use crate::sector::SectorClass;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorThresholds {
    /// Monthly churn, fraction
    pub churn_warning: f64,
    pub churn_critical: f64,
    /// Gross margin, fraction
    pub margin_minimum: f64,
    pub margin_healthy: f64,
}

impl SectorThresholds {
    pub fn for_class(class: SectorClass) -> Self {
        match class {
            SectorClass::Saas => Self {
                churn_warning: 0.05,
                churn_critical: 0.10,
                margin_minimum: 0.60,
                margin_healthy: 0.75,
            },
            SectorClass::Ecommerce => Self {
                churn_warning: 0.08,
                churn_critical: 0.15,
                margin_minimum: 0.20,
                margin_healthy: 0.40,
            },
            SectorClass::Marketplace | SectorClass::Default => Self {
                churn_warning: 0.07,
                churn_critical: 0.12,
                margin_minimum: 0.30,
                margin_healthy: 0.50,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyThresholds {
    pub saas: SectorThresholds,
    pub ecommerce: SectorThresholds,
    pub marketplace: SectorThresholds,
    pub default: SectorThresholds,

    pub ltv_cac_minimum: f64,         // 3.0
    pub ltv_cac_healthy: f64,         // 5.0
    pub payback_warning_months: f64,  // 18
    pub payback_critical_months: f64, // 36
    pub burn_multiple_warning: f64,   // 3x
    pub burn_multiple_critical: f64,  // 5x
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            saas: SectorThresholds::for_class(SectorClass::Saas),
            ecommerce: SectorThresholds::for_class(SectorClass::Ecommerce),
            marketplace: SectorThresholds::for_class(SectorClass::Marketplace),
            default: SectorThresholds::for_class(SectorClass::Default),
            ltv_cac_minimum: 3.0,
            ltv_cac_healthy: 5.0,
            payback_warning_months: 18.0,
            payback_critical_months: 36.0,
            burn_multiple_warning: 3.0,
            burn_multiple_critical: 5.0,
        }
    }
}

impl AnomalyThresholds {
    pub fn sector(&self, class: SectorClass) -> &SectorThresholds {
        match class {
            SectorClass::Saas => &self.saas,
            SectorClass::Ecommerce => &self.ecommerce,
            SectorClass::Marketplace => &self.marketplace,
            SectorClass::Default => &self.default,
        }
    }

    pub fn with_sector(mut self, class: SectorClass, thresholds: SectorThresholds) -> Self {
        match class {
            SectorClass::Saas => self.saas = thresholds,
            SectorClass::Ecommerce => self.ecommerce = thresholds,
            SectorClass::Marketplace => self.marketplace = thresholds,
            SectorClass::Default => self.default = thresholds,
        }
        self
    }
}

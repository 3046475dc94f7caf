//! Anomaly Threshold Engine
//!
//! Checks churn, gross margin, LTV:CAC, payback and burn multiple against the
//! sector's thresholds and emits a [`RiskFlag`] for every breach.

use benchmark_core::stats::as_fraction;
use benchmark_core::{CompanyMetrics, RiskFlag, RiskSeverity, RiskType};
use serde::{Deserialize, Serialize};

use crate::sector::SectorClass;
use crate::thresholds::AnomalyThresholds;
use crate::unit_economics::DerivedRatios;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnAnalysis {
    /// Monthly churn as a fraction
    pub churn_rate: Option<f64>,
    pub sector_class: SectorClass,
    pub warning_threshold: f64,
    pub critical_threshold: f64,
    /// `None` when churn is within limits
    pub severity: Option<RiskSeverity>,
    pub is_healthy: bool,
}

#[derive(Debug, Clone)]
pub struct ThresholdEvaluation {
    pub flags: Vec<RiskFlag>,
    pub churn_analysis: ChurnAnalysis,
}

pub struct AnomalyThresholdEngine {
    thresholds: AnomalyThresholds,
}

impl Default for AnomalyThresholdEngine {
    fn default() -> Self {
        Self::new(AnomalyThresholds::default())
    }
}

impl AnomalyThresholdEngine {
    pub fn new(thresholds: AnomalyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &AnomalyThresholds {
        &self.thresholds
    }

    pub fn evaluate(
        &self,
        metrics: &CompanyMetrics,
        class: SectorClass,
        source_documents: &[String],
    ) -> ThresholdEvaluation {
        let ratios = DerivedRatios::from_metrics(metrics);
        let churn_rate = metrics
            .traction
            .churn_rate
            .filter(|c| c.is_finite())
            .map(as_fraction);

        let mut flags = Vec::new();
        let churn_analysis = self.check_churn(churn_rate, class, source_documents, &mut flags);
        self.check_margin(ratios.gross_margin, class, source_documents, &mut flags);
        self.check_ltv_cac(ratios.ltv_cac_ratio, source_documents, &mut flags);
        self.check_payback(ratios.payback_period, source_documents, &mut flags);
        self.check_burn(ratios.burn_multiple, source_documents, &mut flags);

        for flag in &flags {
            tracing::debug!("{} anomaly: {}", flag.severity.as_str(), flag.title);
        }

        ThresholdEvaluation {
            flags,
            churn_analysis,
        }
    }

    fn check_churn(
        &self,
        churn_rate: Option<f64>,
        class: SectorClass,
        docs: &[String],
        flags: &mut Vec<RiskFlag>,
    ) -> ChurnAnalysis {
        let sector = self.thresholds.sector(class);
        let (warning, critical) = (sector.churn_warning, sector.churn_critical);

        let severity = match churn_rate {
            None => {
                flags.push(
                    RiskFlag::builder(RiskType::FinancialAnomaly, RiskSeverity::Medium, "Missing churn data")
                        .description("Missing churn data — cannot assess retention risk")
                        .affected_metric("churn_rate")
                        .mitigation("Request monthly logo and revenue churn by cohort before relying on retention assumptions.")
                        .source_documents(docs)
                        .confidence(0.75)
                        .evidence("churn rate not reported")
                        .build(),
                );
                Some(RiskSeverity::Medium)
            }
            Some(churn) if churn >= critical => {
                flags.push(
                    RiskFlag::builder(RiskType::FinancialAnomaly, RiskSeverity::High, "Churn rate critically high")
                        .description(format!(
                            "Monthly churn of {:.1}% is critically high for {} companies (critical threshold {:.1}%)",
                            churn * 100.0,
                            class.as_str(),
                            critical * 100.0
                        ))
                        .affected_metric("churn_rate")
                        .mitigation("Investigate churn drivers by cohort and invest in onboarding and customer success before scaling acquisition.")
                        .source_documents(docs)
                        .confidence(0.9)
                        .evidence(format!("actual value: {:.1}%", churn * 100.0))
                        .evidence(format!("sector threshold: {:.1}%", critical * 100.0))
                        .build(),
                );
                Some(RiskSeverity::High)
            }
            Some(churn) if churn >= warning => {
                flags.push(
                    RiskFlag::builder(RiskType::FinancialAnomaly, RiskSeverity::Medium, "Churn rate elevated")
                        .description(format!(
                            "Monthly churn of {:.1}% is above the {} warning level of {:.1}%",
                            churn * 100.0,
                            class.as_str(),
                            warning * 100.0
                        ))
                        .affected_metric("churn_rate")
                        .mitigation("Track churn monthly and identify the segments with the weakest retention.")
                        .source_documents(docs)
                        .confidence(0.85)
                        .evidence(format!("actual value: {:.1}%", churn * 100.0))
                        .evidence(format!("sector threshold: {:.1}%", warning * 100.0))
                        .build(),
                );
                Some(RiskSeverity::Medium)
            }
            Some(_) => None,
        };

        ChurnAnalysis {
            churn_rate,
            sector_class: class,
            warning_threshold: warning,
            critical_threshold: critical,
            severity,
            is_healthy: severity.is_none(),
        }
    }

    fn check_margin(
        &self,
        margin: Option<f64>,
        class: SectorClass,
        docs: &[String],
        flags: &mut Vec<RiskFlag>,
    ) {
        let Some(margin) = margin else { return };
        let sector = self.thresholds.sector(class);

        let (severity, title, threshold, confidence) = if margin < sector.margin_minimum {
            (RiskSeverity::High, "Gross margin below sector minimum", sector.margin_minimum, 0.9)
        } else if margin < sector.margin_healthy {
            (RiskSeverity::Medium, "Gross margin below healthy level", sector.margin_healthy, 0.8)
        } else {
            return;
        };

        flags.push(
            RiskFlag::builder(RiskType::FinancialAnomaly, severity, title)
                .description(format!(
                    "Gross margin of {:.1}% is below the {:.0}% threshold for {} companies",
                    margin * 100.0,
                    threshold * 100.0,
                    class.as_str()
                ))
                .affected_metric("gross_margin")
                .mitigation("Review pricing and cost of goods sold; identify the delivery costs that do not scale with revenue.")
                .source_documents(docs)
                .confidence(confidence)
                .evidence(format!("actual value: {:.1}%", margin * 100.0))
                .evidence(format!("sector threshold: {:.1}%", threshold * 100.0))
                .build(),
        );
    }

    fn check_ltv_cac(&self, ratio: Option<f64>, docs: &[String], flags: &mut Vec<RiskFlag>) {
        let Some(ratio) = ratio else { return };
        let t = &self.thresholds;

        let (severity, title, threshold, confidence) = if ratio < t.ltv_cac_minimum {
            (RiskSeverity::High, "LTV:CAC below minimum", t.ltv_cac_minimum, 0.85)
        } else if ratio < t.ltv_cac_healthy {
            (RiskSeverity::Medium, "LTV:CAC below healthy level", t.ltv_cac_healthy, 0.8)
        } else {
            return;
        };

        flags.push(
            RiskFlag::builder(RiskType::FinancialAnomaly, severity, title)
                .description(format!(
                    "LTV:CAC of {:.1}x is below the {:.1}x threshold",
                    ratio, threshold
                ))
                .affected_metric("ltv")
                .affected_metric("cac")
                .mitigation("Reduce acquisition cost through channel mix or raise customer lifetime value through pricing and expansion.")
                .source_documents(docs)
                .confidence(confidence)
                .evidence(format!("actual value: {:.1}x", ratio))
                .evidence(format!("sector threshold: {:.1}x", threshold))
                .build(),
        );
    }

    fn check_payback(&self, payback: Option<f64>, docs: &[String], flags: &mut Vec<RiskFlag>) {
        let Some(payback) = payback else { return };
        let t = &self.thresholds;

        let (severity, title, threshold, confidence) = if payback >= t.payback_critical_months {
            (RiskSeverity::High, "CAC payback period too long", t.payback_critical_months, 0.8)
        } else if payback >= t.payback_warning_months {
            (RiskSeverity::Medium, "CAC payback period elevated", t.payback_warning_months, 0.75)
        } else {
            return;
        };

        flags.push(
            RiskFlag::builder(RiskType::FinancialAnomaly, severity, title)
                .description(format!(
                    "Recovering acquisition cost takes {:.1} months against a {:.0} month threshold",
                    payback, threshold
                ))
                .affected_metric("cac")
                .affected_metric("mrr")
                .mitigation("Shorten payback with annual prepayment, higher entry pricing or cheaper acquisition channels.")
                .source_documents(docs)
                .confidence(confidence)
                .evidence(format!("actual value: {:.1} months", payback))
                .evidence(format!("sector threshold: {:.0} months", threshold))
                .build(),
        );
    }

    fn check_burn(&self, burn: Option<f64>, docs: &[String], flags: &mut Vec<RiskFlag>) {
        let Some(burn) = burn else { return };
        let t = &self.thresholds;

        let (severity, title, threshold, confidence) = if burn >= t.burn_multiple_critical {
            (RiskSeverity::High, "Burn multiple critically high", t.burn_multiple_critical, 0.85)
        } else if burn >= t.burn_multiple_warning {
            (RiskSeverity::Medium, "Burn multiple elevated", t.burn_multiple_warning, 0.8)
        } else {
            return;
        };

        flags.push(
            RiskFlag::builder(RiskType::FinancialAnomaly, severity, title)
                .description(format!(
                    "Annualized burn is {:.1}x ARR against a {:.1}x threshold",
                    burn, threshold
                ))
                .affected_metric("burn_rate")
                .affected_metric("arr")
                .mitigation("Cut spend that does not contribute to new ARR and set a burn-multiple target for the next two quarters.")
                .source_documents(docs)
                .confidence(confidence)
                .evidence(format!("actual value: {:.1}x", burn))
                .evidence(format!("sector threshold: {:.1}x", threshold))
                .build(),
        );
    }
}

//! Financial Anomaly Report
//!
//! Runs every analyzer over one company and collects the results, plus a
//! severity-ordered list of anomalies, into a single report.

use benchmark_core::{
    CohortData, CompanyMetrics, HealthFinding, RiskCategory, RiskFlag, RiskType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assessment::RiskAssessment;
use crate::cohort::{CohortHealth, CohortHealthAnalyzer};
use crate::config::AnomalyConfig;
use crate::detector::{AnomalyThresholdEngine, ChurnAnalysis};
use crate::growth::{GrowthConsistency, GrowthConsistencyAnalyzer};
use crate::health::HealthScoreAggregator;
use crate::sector::{SectorClass, SectorClassifier};
use crate::unit_economics::{UnitEconomicsHealth, UnitEconomicsHealthScorer};

/// Everything the detector needs about one company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnomalyInput {
    pub metrics: CompanyMetrics,
    pub sector: String,
    /// Chronological
    #[serde(default)]
    pub cohorts: Vec<CohortData>,
    #[serde(default)]
    pub source_documents: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialAnomalyReport {
    /// 0.0 to 1.0
    pub overall_health_score: f64,
    pub sector_class: SectorClass,
    pub churn_analysis: ChurnAnalysis,
    pub unit_economics: UnitEconomicsHealth,
    pub growth_consistency: GrowthConsistency,
    pub cohort_health: CohortHealth,
    /// HIGH first, then MEDIUM, then LOW
    pub anomalies: Vec<RiskFlag>,
    pub generated_at: DateTime<Utc>,
}

impl FinancialAnomalyReport {
    pub fn risk_assessment(&self) -> RiskAssessment {
        RiskAssessment::from_flags(&self.anomalies)
    }
}

pub struct FinancialAnomalyDetector {
    classifier: SectorClassifier,
    engine: AnomalyThresholdEngine,
    unit_economics: UnitEconomicsHealthScorer,
    growth: GrowthConsistencyAnalyzer,
    cohorts: CohortHealthAnalyzer,
}

impl Default for FinancialAnomalyDetector {
    fn default() -> Self {
        Self::new(AnomalyConfig::default())
    }
}

impl FinancialAnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self {
            classifier: SectorClassifier::default(),
            engine: AnomalyThresholdEngine::new(config.thresholds.clone()),
            unit_economics: UnitEconomicsHealthScorer::new(config.thresholds),
            growth: GrowthConsistencyAnalyzer::new(config.cov_ceiling),
            cohorts: CohortHealthAnalyzer::new(config.cohort_churn_ceiling),
        }
    }

    pub fn with_classifier(mut self, classifier: SectorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn analyze(&self, input: &AnomalyInput) -> FinancialAnomalyReport {
        let class = self.classifier.classify(&input.sector);
        let docs = &input.source_documents;

        let evaluation = self.engine.evaluate(&input.metrics, class, docs);
        let unit_economics = self.unit_economics.score(&input.metrics, class);
        let projected_arr = input.metrics.revenue.projected_arr.as_deref().unwrap_or(&[]);
        let growth_consistency = self.growth.analyze(projected_arr);
        let cohort_health = self.cohorts.analyze(&input.cohorts);

        let overall_health_score = HealthScoreAggregator::aggregate(
            &evaluation.churn_analysis,
            &unit_economics,
            &growth_consistency,
            &cohort_health,
        );

        let mut anomalies = evaluation.flags;
        anomalies.extend(
            growth_consistency
                .red_flags
                .iter()
                .map(|finding| growth_flag(finding, docs)),
        );
        anomalies.extend(
            cohort_health
                .red_flags
                .iter()
                .map(|finding| cohort_flag(finding, docs)),
        );
        // Stable, so each severity keeps detection order
        anomalies.sort_by(|a, b| b.severity.cmp(&a.severity));

        tracing::info!(
            "Financial anomaly report for '{}' ({}): health {:.2}, {} anomalies",
            input.sector,
            class.as_str(),
            overall_health_score,
            anomalies.len()
        );

        FinancialAnomalyReport {
            overall_health_score,
            sector_class: class,
            churn_analysis: evaluation.churn_analysis,
            unit_economics,
            growth_consistency,
            cohort_health,
            anomalies,
            generated_at: Utc::now(),
        }
    }
}

fn growth_flag(finding: &HealthFinding, docs: &[String]) -> RiskFlag {
    let title = match finding.kind {
        RiskType::Inconsistency => "Inconsistent ARR growth",
        _ => "ARR growth concern",
    };

    RiskFlag::builder(finding.kind, finding.severity, title)
        .description(finding.message.clone())
        .affected_metric("projected_arr")
        .mitigation("Reconcile the ARR projection with historical bookings and document the assumptions behind each period.")
        .source_documents(docs)
        .confidence(0.8)
        .category(RiskCategory::Financial)
        .evidence(finding.message.clone())
        .build()
}

fn cohort_flag(finding: &HealthFinding, docs: &[String]) -> RiskFlag {
    RiskFlag::builder(finding.kind, finding.severity, "Cohort retention concern")
        .description(finding.message.clone())
        .affected_metric("cohort_retention")
        .mitigation("Break retention down by acquisition cohort and address the drivers behind the weakest cohorts.")
        .source_documents(docs)
        .confidence(0.8)
        .category(RiskCategory::Financial)
        .evidence(finding.message.clone())
        .build()
}

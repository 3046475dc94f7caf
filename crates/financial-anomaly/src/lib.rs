//! Financial Anomaly Detection
//!
//! Flags financial metrics that breach sector thresholds and scores overall
//! financial health from unit economics, growth consistency and cohort
//! retention.

pub mod assessment;
pub mod cohort;
pub mod config;
pub mod detector;
pub mod growth;
pub mod health;
pub mod report;
pub mod sector;
pub mod thresholds;
pub mod unit_economics;

pub use assessment::RiskAssessment;
pub use cohort::{CohortHealth, CohortHealthAnalyzer, RetentionTrend};
pub use config::AnomalyConfig;
pub use detector::{AnomalyThresholdEngine, ChurnAnalysis, ThresholdEvaluation};
pub use growth::{GrowthConsistency, GrowthConsistencyAnalyzer, GrowthTrend};
pub use health::HealthScoreAggregator;
pub use report::{AnomalyInput, FinancialAnomalyDetector, FinancialAnomalyReport};
pub use sector::{SectorClass, SectorClassifier, SectorRule};
pub use thresholds::{AnomalyThresholds, SectorThresholds};
pub use unit_economics::{DerivedRatios, UnitEconomicsHealth, UnitEconomicsHealthScorer};

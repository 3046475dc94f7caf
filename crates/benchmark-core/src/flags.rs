//! Risk flags emitted by the anomaly engine and consumed by downstream
//! reporting. A flag is immutable once built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskType {
    Inconsistency,
    MarketSize,
    #[default]
    FinancialAnomaly,
    CompetitiveRisk,
    TeamRisk,
    TechnicalRisk,
}

/// Severity ordering is `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskSeverity::Low => "LOW",
            RiskSeverity::Medium => "MEDIUM",
            RiskSeverity::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskImpact {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLikelihood {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Financial,
    Market,
    Team,
    Product,
    Competitive,
    Operational,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub flag_type: RiskType,
    pub severity: RiskSeverity,
    pub title: String,
    pub description: String,
    pub affected_metrics: Vec<String>,
    pub suggested_mitigation: String,
    /// Upstream document identifiers, carried through verbatim
    pub source_documents: Vec<String>,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub impact: RiskImpact,
    pub likelihood: RiskLikelihood,
    pub category: RiskCategory,
    pub evidence: Vec<String>,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub related_flags: Option<Vec<Uuid>>,
}

impl RiskFlag {
    pub fn builder(flag_type: RiskType, severity: RiskSeverity, title: &str) -> RiskFlagBuilder {
        RiskFlagBuilder::new(flag_type, severity, title)
    }
}

/// A finding produced by one of the health analyzers before it is lifted
/// into a full [`RiskFlag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFinding {
    pub severity: RiskSeverity,
    pub message: String,
    /// Type of the flag this finding becomes
    #[serde(default)]
    pub kind: RiskType,
}

impl HealthFinding {
    pub fn new(severity: RiskSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            kind: RiskType::default(),
        }
    }

    pub fn with_kind(mut self, kind: RiskType) -> Self {
        self.kind = kind;
        self
    }
}

/// Builder for [`RiskFlag`]. Impact and likelihood default from severity.
pub struct RiskFlagBuilder {
    flag_type: RiskType,
    severity: RiskSeverity,
    title: String,
    description: String,
    affected_metrics: Vec<String>,
    suggested_mitigation: String,
    source_documents: Vec<String>,
    confidence: f64,
    impact: Option<RiskImpact>,
    likelihood: Option<RiskLikelihood>,
    category: RiskCategory,
    evidence: Vec<String>,
    related_flags: Option<Vec<Uuid>>,
}

impl RiskFlagBuilder {
    pub fn new(flag_type: RiskType, severity: RiskSeverity, title: &str) -> Self {
        Self {
            flag_type,
            severity,
            title: title.to_string(),
            description: String::new(),
            affected_metrics: Vec::new(),
            suggested_mitigation: String::new(),
            source_documents: Vec::new(),
            confidence: 0.8,
            impact: None,
            likelihood: None,
            category: RiskCategory::Financial,
            evidence: Vec::new(),
            related_flags: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn affected_metric(mut self, metric: &str) -> Self {
        self.affected_metrics.push(metric.to_string());
        self
    }

    pub fn mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.suggested_mitigation = mitigation.into();
        self
    }

    pub fn source_documents(mut self, documents: &[String]) -> Self {
        self.source_documents = documents.to_vec();
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn impact(mut self, impact: RiskImpact) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn likelihood(mut self, likelihood: RiskLikelihood) -> Self {
        self.likelihood = Some(likelihood);
        self
    }

    pub fn category(mut self, category: RiskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn evidence(mut self, item: impl Into<String>) -> Self {
        self.evidence.push(item.into());
        self
    }

    pub fn related_to(mut self, ids: Vec<Uuid>) -> Self {
        self.related_flags = Some(ids);
        self
    }

    pub fn build(self) -> RiskFlag {
        let impact = self.impact.unwrap_or(match self.severity {
            RiskSeverity::High => RiskImpact::High,
            RiskSeverity::Medium => RiskImpact::Medium,
            RiskSeverity::Low => RiskImpact::Low,
        });
        let likelihood = self.likelihood.unwrap_or(match self.severity {
            RiskSeverity::High => RiskLikelihood::High,
            RiskSeverity::Medium => RiskLikelihood::Medium,
            RiskSeverity::Low => RiskLikelihood::Low,
        });
        let confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        RiskFlag {
            id: Uuid::new_v4(),
            flag_type: self.flag_type,
            severity: self.severity,
            title: self.title,
            description: self.description,
            affected_metrics: self.affected_metrics,
            suggested_mitigation: self.suggested_mitigation,
            source_documents: self.source_documents,
            confidence,
            impact,
            likelihood,
            category: self.category,
            evidence: self.evidence,
            detected_at: Utc::now(),
            related_flags: self.related_flags,
        }
    }
}

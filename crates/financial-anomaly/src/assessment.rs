//! Risk assessment summary over a set of flags.

use benchmark_core::{RiskFlag, RiskSeverity};
use serde::{Deserialize, Serialize};

const HIGH_POINTS: u32 = 25;
const MEDIUM_POINTS: u32 = 10;
const LOW_POINTS: u32 = 3;

pub const ROUTINE_MONITORING: &str =
    "No material risks identified; continue routine monitoring of financial metrics.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0 to 100
    pub overall_risk_score: u32,
    pub high_priority_risks: Vec<RiskFlag>,
    pub medium_priority_risks: Vec<RiskFlag>,
    pub low_priority_risks: Vec<RiskFlag>,
    /// Never empty
    pub risk_mitigation_plan: Vec<String>,
}

impl RiskAssessment {
    pub fn from_flags(flags: &[RiskFlag]) -> Self {
        let by_severity = |severity: RiskSeverity| -> Vec<RiskFlag> {
            flags.iter().filter(|f| f.severity == severity).cloned().collect()
        };
        let high = by_severity(RiskSeverity::High);
        let medium = by_severity(RiskSeverity::Medium);
        let low = by_severity(RiskSeverity::Low);

        let points = HIGH_POINTS * high.len() as u32
            + MEDIUM_POINTS * medium.len() as u32
            + LOW_POINTS * low.len() as u32;

        let mut plan: Vec<String> = Vec::new();
        for flag in high.iter().chain(medium.iter()) {
            let mitigation = flag.suggested_mitigation.trim();
            if !mitigation.is_empty() && !plan.iter().any(|p| p == mitigation) {
                plan.push(mitigation.to_string());
            }
        }
        if plan.is_empty() {
            plan.push(ROUTINE_MONITORING.to_string());
        }

        Self {
            overall_risk_score: points.min(100),
            high_priority_risks: high,
            medium_priority_risks: medium,
            low_priority_risks: low,
            risk_mitigation_plan: plan,
        }
    }

    pub fn total_risks(&self) -> usize {
        self.high_priority_risks.len() + self.medium_priority_risks.len() + self.low_priority_risks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchmark_core::RiskType;

    fn flag(severity: RiskSeverity, mitigation: &str) -> RiskFlag {
        RiskFlag::builder(RiskType::FinancialAnomaly, severity, "test")
            .mitigation(mitigation)
            .build()
    }

    #[test]
    fn test_score_and_buckets() {
        let flags = vec![
            flag(RiskSeverity::High, "cut burn"),
            flag(RiskSeverity::Medium, "track churn"),
            flag(RiskSeverity::Low, "collect data"),
            flag(RiskSeverity::Medium, "track churn"),
        ];
        let assessment = RiskAssessment::from_flags(&flags);
        assert_eq!(assessment.overall_risk_score, 25 + 20 + 3);
        assert_eq!(assessment.high_priority_risks.len(), 1);
        assert_eq!(assessment.medium_priority_risks.len(), 2);
        assert_eq!(assessment.total_risks(), 4);
        // duplicates collapse, low-severity mitigations stay out
        assert_eq!(assessment.risk_mitigation_plan, vec!["cut burn", "track churn"]);
    }

    #[test]
    fn test_score_is_capped() {
        let flags: Vec<RiskFlag> = (0..6).map(|_| flag(RiskSeverity::High, "x")).collect();
        assert_eq!(RiskAssessment::from_flags(&flags).overall_risk_score, 100);
    }

    #[test]
    fn test_clean_assessment_still_has_a_plan() {
        let assessment = RiskAssessment::from_flags(&[]);
        assert_eq!(assessment.overall_risk_score, 0);
        assert_eq!(assessment.risk_mitigation_plan, vec![ROUTINE_MONITORING.to_string()]);
    }
}

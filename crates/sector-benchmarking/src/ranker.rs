//! Metric Ranking
//!
//! Applies the percentile estimator across the fixed benchmark vocabulary.

use std::collections::{BTreeMap, HashMap};

use benchmark_core::{CompanyMetrics, MetricDistribution, PercentileRanking};
use serde::{Deserialize, Serialize};

use crate::percentile::{MetricDirection, PercentileEstimator};

/// Metrics tracked against sector benchmarks, in encounter order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMetric {
    Arr,
    GrowthRate,
    GrossMargin,
    Customers,
    ChurnRate,
    LtvCacRatio,
    TeamSize,
    TotalRaised,
}

impl BenchmarkMetric {
    pub const ALL: [BenchmarkMetric; 8] = [
        BenchmarkMetric::Arr,
        BenchmarkMetric::GrowthRate,
        BenchmarkMetric::GrossMargin,
        BenchmarkMetric::Customers,
        BenchmarkMetric::ChurnRate,
        BenchmarkMetric::LtvCacRatio,
        BenchmarkMetric::TeamSize,
        BenchmarkMetric::TotalRaised,
    ];

    /// Key used in benchmark distribution maps and weight tables
    pub fn key(&self) -> &'static str {
        match self {
            BenchmarkMetric::Arr => "arr",
            BenchmarkMetric::GrowthRate => "growth_rate",
            BenchmarkMetric::GrossMargin => "gross_margin",
            BenchmarkMetric::Customers => "customers",
            BenchmarkMetric::ChurnRate => "churn_rate",
            BenchmarkMetric::LtvCacRatio => "ltv_cac_ratio",
            BenchmarkMetric::TeamSize => "team_size",
            BenchmarkMetric::TotalRaised => "total_raised",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.key() == key)
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            BenchmarkMetric::Arr => "ARR",
            BenchmarkMetric::GrowthRate => "Growth Rate",
            BenchmarkMetric::GrossMargin => "Gross Margin",
            BenchmarkMetric::Customers => "Customer Count",
            BenchmarkMetric::ChurnRate => "Churn Rate",
            BenchmarkMetric::LtvCacRatio => "LTV:CAC Ratio",
            BenchmarkMetric::TeamSize => "Team Size",
            BenchmarkMetric::TotalRaised => "Total Raised",
        }
    }

    pub fn direction(&self) -> MetricDirection {
        match self {
            BenchmarkMetric::ChurnRate => MetricDirection::LowerIsBetter,
            _ => MetricDirection::HigherIsBetter,
        }
    }

    /// Pull this metric's value out of the extracted company record
    pub fn extract(&self, metrics: &CompanyMetrics) -> Option<f64> {
        match self {
            BenchmarkMetric::Arr => metrics.revenue.arr,
            BenchmarkMetric::GrowthRate => metrics.revenue.growth_rate,
            BenchmarkMetric::GrossMargin => metrics.revenue.gross_margin,
            BenchmarkMetric::Customers => metrics.traction.customers,
            BenchmarkMetric::ChurnRate => metrics.traction.churn_rate,
            BenchmarkMetric::LtvCacRatio => metrics.ltv_cac_ratio(),
            BenchmarkMetric::TeamSize => metrics.team.size,
            BenchmarkMetric::TotalRaised => metrics.funding.total_raised,
        }
    }

    /// Human-readable rendering of a value of this metric
    pub fn format_value(&self, value: f64) -> String {
        match self {
            BenchmarkMetric::Arr | BenchmarkMetric::TotalRaised => format_currency(value),
            BenchmarkMetric::GrowthRate
            | BenchmarkMetric::GrossMargin
            | BenchmarkMetric::ChurnRate => format_rate(value),
            BenchmarkMetric::LtvCacRatio => format!("{:.1}x", value),
            BenchmarkMetric::Customers | BenchmarkMetric::TeamSize => format!("{:.0}", value),
        }
    }
}

fn format_currency(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("${:.1}B", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.0}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Rates may arrive as fractions or as percentages
fn format_rate(value: f64) -> String {
    if value.abs() <= 1.0 {
        format!("{:.1}%", value * 100.0)
    } else {
        format!("{:.1}%", value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricRanker;

impl MetricRanker {
    pub fn new() -> Self {
        Self
    }

    /// Rank every vocabulary metric present in both the company record and
    /// the distribution map. Anything missing on either side is skipped.
    pub fn rank(
        &self,
        metrics: &CompanyMetrics,
        distributions: &HashMap<String, MetricDistribution>,
    ) -> BTreeMap<BenchmarkMetric, PercentileRanking> {
        let mut rankings = BTreeMap::new();

        for metric in BenchmarkMetric::ALL {
            let Some(value) = metric.extract(metrics) else {
                continue;
            };
            let Some(distribution) = distributions.get(metric.key()) else {
                continue;
            };
            if !value.is_finite() {
                tracing::debug!("Skipping non-finite value for {}", metric.key());
                continue;
            }
            let ranking = PercentileEstimator::rank(value, distribution, metric.direction());
            rankings.insert(metric, ranking);
        }

        rankings
    }
}

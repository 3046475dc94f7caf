use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::BenchmarkError;

/// Revenue figures extracted from company documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub arr: Option<f64>,
    pub mrr: Option<f64>,
    pub growth_rate: Option<f64>,
    /// Chronological ARR projection points
    #[serde(default)]
    pub projected_arr: Option<Vec<f64>>,
    pub revenue_run_rate: Option<f64>,
    pub gross_margin: Option<f64>,
    pub net_revenue_retention: Option<f64>,
}

/// Customer traction figures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TractionMetrics {
    pub customers: Option<f64>,
    pub customer_growth_rate: Option<f64>,
    pub churn_rate: Option<f64>,
    pub nps: Option<f64>,
    pub active_users: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub ltv: Option<f64>,
    pub cac: Option<f64>,
    pub ltv_cac_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub size: Option<f64>,
    pub founders_count: Option<u32>,
    pub engineering_team_size: Option<u32>,
    pub sales_team_size: Option<u32>,
    /// Monthly net cash burn
    pub burn_rate: Option<f64>,
    /// Runway in months
    pub runway: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundingMetrics {
    pub total_raised: Option<f64>,
    pub last_round_size: Option<f64>,
    pub current_ask: Option<f64>,
    pub valuation: Option<f64>,
    pub stage: Option<FundingStage>,
}

/// Structured company metrics as produced by the upstream extraction step.
///
/// Every field is optional. Missing data is the normal case and is never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyMetrics {
    #[serde(default)]
    pub revenue: RevenueMetrics,
    #[serde(default)]
    pub traction: TractionMetrics,
    #[serde(default)]
    pub team: TeamMetrics,
    #[serde(default)]
    pub funding: FundingMetrics,
}

impl CompanyMetrics {
    /// Explicit LTV:CAC ratio, or `ltv / cac` when both halves are known.
    pub fn ltv_cac_ratio(&self) -> Option<f64> {
        if let Some(ratio) = self.traction.ltv_cac_ratio {
            return Some(ratio);
        }
        match (self.traction.ltv, self.traction.cac) {
            (Some(ltv), Some(cac)) if cac > 0.0 => Some(ltv / cac),
            _ => None,
        }
    }

    /// Reported MRR, falling back to ARR / 12.
    pub fn monthly_recurring_revenue(&self) -> Option<f64> {
        self.revenue
            .mrr
            .or_else(|| self.revenue.arr.map(|arr| arr / 12.0))
    }
}

/// Funding stage of a company or benchmark cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FundingStage {
    PreSeed,
    Seed,
    SeriesA,
    SeriesB,
    SeriesC,
    LaterStage,
}

impl FundingStage {
    pub fn to_label(&self) -> &'static str {
        match self {
            FundingStage::PreSeed => "Pre-Seed",
            FundingStage::Seed => "Seed",
            FundingStage::SeriesA => "Series A",
            FundingStage::SeriesB => "Series B",
            FundingStage::SeriesC => "Series C",
            FundingStage::LaterStage => "Later Stage",
        }
    }
}

/// Six-point quantile summary of a sector metric.
///
/// Callers must supply `min <= p25 <= median <= p75 <= p90 <= max`. The
/// estimator does not check this; use [`MetricDistribution::check_ordering`]
/// upstream when the source is untrusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDistribution {
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p90: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub sample_size: u32,
}

impl MetricDistribution {
    /// `(percentile, value)` breakpoints used for interpolation
    pub fn breakpoints(&self) -> [(f64, f64); 6] {
        [
            (0.0, self.min),
            (25.0, self.p25),
            (50.0, self.median),
            (75.0, self.p75),
            (90.0, self.p90),
            (100.0, self.max),
        ]
    }

    pub fn check_ordering(&self) -> Result<(), BenchmarkError> {
        if self.sample_size < 1 {
            return Err(BenchmarkError::InvalidDistribution(
                "sample_size must be at least 1".to_string(),
            ));
        }
        let points = self.breakpoints();
        for pair in points.windows(2) {
            let ((p_lo, v_lo), (p_hi, v_hi)) = (pair[0], pair[1]);
            if v_lo.is_nan() || v_hi.is_nan() || v_lo > v_hi {
                return Err(BenchmarkError::InvalidDistribution(format!(
                    "p{} ({}) exceeds p{} ({})",
                    p_lo, v_lo, p_hi, v_hi
                )));
            }
        }
        Ok(())
    }
}

/// Benchmark distributions for one sector/stage slice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkData {
    pub sector: String,
    #[serde(default)]
    pub sub_sector: Option<String>,
    #[serde(default)]
    pub stage: Option<FundingStage>,
    #[serde(default)]
    pub geography: Option<String>,
    pub sample_size: u32,
    /// Keyed by metric name (`arr`, `churn_rate`, ...)
    pub metrics: HashMap<String, MetricDistribution>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub data_source: String,
    #[serde(default)]
    pub confidence: f64,
}

impl BenchmarkData {
    pub fn stage_label(&self) -> &'static str {
        self.stage.map(|s| s.to_label()).unwrap_or("all")
    }
}

/// Position of one company value inside a sector distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileRanking {
    pub value: f64,
    /// 0-100, one decimal place
    pub percentile: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub metric: String,
    pub company_value: f64,
    pub sector_median: f64,
    pub percentile: f64,
    pub interpretation: String,
    pub context: String,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// Categorical tier for the overall benchmark score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceCategory {
    Exceptional,
    Strong,
    Average,
    BelowAverage,
    Concerning,
}

impl PerformanceCategory {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => PerformanceCategory::Exceptional,
            s if s >= 75.0 => PerformanceCategory::Strong,
            s if s >= 40.0 => PerformanceCategory::Average,
            s if s >= 25.0 => PerformanceCategory::BelowAverage,
            _ => PerformanceCategory::Concerning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceCategory::Exceptional => "exceptional",
            PerformanceCategory::Strong => "strong",
            PerformanceCategory::Average => "average",
            PerformanceCategory::BelowAverage => "below-average",
            PerformanceCategory::Concerning => "concerning",
        }
    }
}

/// Full output of a benchmark comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparisonResult {
    /// Ordered by distance from the median, most significant first
    pub comparisons: Vec<BenchmarkComparison>,
    pub percentile_rankings: BTreeMap<String, PercentileRanking>,
    pub overall_score: f64,
    pub performance_category: PerformanceCategory,
    pub summary: String,
}

/// One customer cohort tracked over subsequent periods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortData {
    /// Acquisition period label, e.g. `2024-Q1`
    pub period: String,
    pub retention_rates: Vec<f64>,
    pub churn_rate: f64,
}

//! Benchmark Comparison
//!
//! Turns per-metric percentile rankings into ordered comparison records, an
//! overall weighted score, a performance tier and a short summary.

use std::collections::BTreeMap;
use std::sync::Arc;

use benchmark_core::stats::round_to;
use benchmark_core::{
    BenchmarkComparison, BenchmarkData, BenchmarkError, CompanyMetrics, MetricComparisonResult,
    MetricDistribution, PercentileRanking, PerformanceCategory,
};
use serde::{Deserialize, Serialize};

use crate::cache::{fingerprint, ComparisonCache, InMemoryComparisonCache};
use crate::config::BenchmarkingConfig;
use crate::ranker::{BenchmarkMetric, MetricRanker};
use crate::scoring::effective_weighted_score;

const STRONG_PERCENTILE: f64 = 75.0;
const URGENT_PERCENTILE: f64 = 10.0;
const SUMMARY_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOptions {
    pub include_recommendations: bool,
    /// Percentile at or below which a metric gets improvement advice
    pub significance_threshold: f64,
    pub use_cache: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            include_recommendations: true,
            significance_threshold: 25.0,
            use_cache: true,
        }
    }
}

pub struct ComparisonAggregator {
    config: BenchmarkingConfig,
    ranker: MetricRanker,
    cache: Option<Arc<dyn ComparisonCache>>,
}

impl Default for ComparisonAggregator {
    fn default() -> Self {
        Self::new(BenchmarkingConfig::default())
    }
}

impl ComparisonAggregator {
    /// Aggregator backed by an in-process cache sized from `config`
    pub fn new(config: BenchmarkingConfig) -> Self {
        let cache: Arc<dyn ComparisonCache> =
            Arc::new(InMemoryComparisonCache::new(config.max_cache_size));
        Self {
            config,
            ranker: MetricRanker::new(),
            cache: Some(cache),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ComparisonCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn cache(&self) -> Option<&Arc<dyn ComparisonCache>> {
        self.cache.as_ref()
    }

    /// Options seeded from the aggregator's configuration
    pub fn default_options(&self) -> ComparisonOptions {
        ComparisonOptions {
            significance_threshold: self.config.significance_threshold,
            ..ComparisonOptions::default()
        }
    }

    /// Compare a company against a sector benchmark.
    ///
    /// The benchmark is looked up by an upstream collaborator; a lookup that
    /// found nothing is a caller error.
    pub fn compare(
        &self,
        metrics: &CompanyMetrics,
        benchmark: Option<&BenchmarkData>,
        options: &ComparisonOptions,
    ) -> Result<MetricComparisonResult, BenchmarkError> {
        let benchmark = benchmark.ok_or(BenchmarkError::MissingBenchmark)?;

        let cache = if options.use_cache { self.cache.as_ref() } else { None };
        let key = cache
            .and_then(|_| fingerprint(metrics, benchmark, options, &self.config.weights));

        if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
            if let Some(hit) = cache.get(key) {
                tracing::debug!("Benchmark comparison cache hit for {} ({})", benchmark.sector, key);
                return Ok(hit);
            }
            tracing::debug!("Benchmark comparison cache miss for {}", benchmark.sector);
        }

        let result = self.build(metrics, benchmark, options);

        if let (Some(cache), Some(key)) = (cache, key) {
            cache.set(key, result.clone(), self.config.cache_ttl());
        }

        tracing::info!(
            "Benchmarked {} metrics against {} ({}): score {:.1} ({})",
            result.comparisons.len(),
            benchmark.sector,
            benchmark.stage_label(),
            result.overall_score,
            result.performance_category.as_str()
        );

        Ok(result)
    }

    fn build(
        &self,
        metrics: &CompanyMetrics,
        benchmark: &BenchmarkData,
        options: &ComparisonOptions,
    ) -> MetricComparisonResult {
        let rankings = self.ranker.rank(metrics, &benchmark.metrics);

        let mut comparisons: Vec<BenchmarkComparison> = rankings
            .iter()
            .filter_map(|(metric, ranking)| {
                let distribution = benchmark.metrics.get(metric.key())?;
                Some(self.build_comparison(*metric, ranking, distribution, benchmark, options))
            })
            .collect();

        // Stable: ties keep vocabulary order
        comparisons.sort_by(|a, b| {
            let da = (a.percentile - 50.0).abs();
            let db = (b.percentile - 50.0).abs();
            db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
        });

        let overall_score = self.overall_score(&rankings);
        let performance_category = PerformanceCategory::from_score(overall_score);
        let summary = summarize(&comparisons, overall_score, performance_category, benchmark);

        let percentile_rankings = rankings
            .into_iter()
            .map(|(metric, ranking)| (metric.key().to_string(), ranking))
            .collect();

        MetricComparisonResult {
            comparisons,
            percentile_rankings,
            overall_score,
            performance_category,
            summary,
        }
    }

    fn build_comparison(
        &self,
        metric: BenchmarkMetric,
        ranking: &PercentileRanking,
        distribution: &MetricDistribution,
        benchmark: &BenchmarkData,
        options: &ComparisonOptions,
    ) -> BenchmarkComparison {
        let context = format!(
            "Based on {} {} companies at {} stage; range {}–{}; your value at {:.1}th percentile",
            distribution.sample_size,
            benchmark.sector,
            benchmark.stage_label(),
            metric.format_value(distribution.min),
            metric.format_value(distribution.max),
            ranking.percentile
        );

        let recommendation = if options.include_recommendations {
            Some(recommend(metric, ranking.percentile, distribution, options.significance_threshold))
        } else {
            None
        };

        BenchmarkComparison {
            metric: metric.key().to_string(),
            company_value: ranking.value,
            sector_median: distribution.median,
            percentile: ranking.percentile,
            interpretation: ranking.interpretation.clone(),
            context,
            recommendation,
        }
    }

    /// Weighted mean percentile over the metrics that were actually ranked
    pub fn overall_score(&self, rankings: &BTreeMap<BenchmarkMetric, PercentileRanking>) -> f64 {
        let scores = rankings.iter().map(|(m, r)| (m.key(), r.percentile));
        effective_weighted_score(scores, &self.config.weights)
            .map(|s| round_to(s.clamp(0.0, 100.0), 1))
            .unwrap_or(0.0)
    }
}

fn improvement_advice(metric: BenchmarkMetric) -> &'static str {
    match metric {
        BenchmarkMetric::Arr => {
            "Revenue scale trails sector peers. Tighten the sales pipeline and prioritize segments with the shortest path to recurring contracts."
        }
        BenchmarkMetric::GrowthRate => {
            "Growth is slower than peers at this stage. Revisit go-to-market efficiency and concentrate spend on the best-converting channels."
        }
        BenchmarkMetric::GrossMargin => {
            "Gross margin is below sector norms. Review pricing and the cost of delivery, especially hosting and support."
        }
        BenchmarkMetric::Customers => {
            "The customer base is small relative to peers, which concentrates revenue risk. Broaden acquisition beyond the current core accounts."
        }
        BenchmarkMetric::ChurnRate => {
            "Churn is higher than peers. Invest in onboarding and customer success, and analyze exit reasons by cohort."
        }
        BenchmarkMetric::LtvCacRatio => {
            "Unit economics lag the sector. Lower acquisition cost or raise expansion revenue per customer before scaling spend."
        }
        BenchmarkMetric::TeamSize => {
            "The team is lean for this stage. Plan the key hires needed to execute the next milestones."
        }
        BenchmarkMetric::TotalRaised => {
            "Capital raised is below peers. Tie the next raise to milestones that extend runway."
        }
    }
}

fn recommend(
    metric: BenchmarkMetric,
    percentile: f64,
    distribution: &MetricDistribution,
    significance_threshold: f64,
) -> String {
    if percentile >= STRONG_PERCENTILE {
        format!(
            "{} is a relative strength at the {:.1}th percentile. Document the practices behind it and keep them in place as the company scales.",
            metric.to_label(),
            percentile
        )
    } else if percentile <= significance_threshold {
        let advice = improvement_advice(metric);
        if percentile <= URGENT_PERCENTILE {
            format!("Urgent: {}", advice)
        } else {
            advice.to_string()
        }
    } else {
        format!(
            "{} is within the normal range for the sector. The top-quartile benchmark is {}.",
            metric.to_label(),
            metric.format_value(distribution.p75)
        )
    }
}

fn metric_label(key: &str) -> String {
    BenchmarkMetric::from_key(key)
        .map(|m| m.to_label().to_string())
        .unwrap_or_else(|| key.to_string())
}

fn summarize(
    comparisons: &[BenchmarkComparison],
    overall_score: f64,
    category: PerformanceCategory,
    benchmark: &BenchmarkData,
) -> String {
    if comparisons.is_empty() {
        return format!(
            "No tracked metrics could be compared against the {} benchmark.",
            benchmark.sector
        );
    }

    let mut summary = format!(
        "Overall performance is {} relative to {} peers, with a weighted score of {:.1}/100 across {} benchmarked metrics.",
        category.as_str(),
        benchmark.sector,
        overall_score,
        comparisons.len()
    );

    let cite = |c: &BenchmarkComparison| format!("{} ({:.1}th percentile)", metric_label(&c.metric), c.percentile);

    let strengths: Vec<String> = comparisons
        .iter()
        .filter(|c| c.percentile >= STRONG_PERCENTILE)
        .take(SUMMARY_LIMIT)
        .map(cite)
        .collect();
    let weaknesses: Vec<String> = comparisons
        .iter()
        .filter(|c| c.percentile <= 25.0)
        .take(SUMMARY_LIMIT)
        .map(cite)
        .collect();

    if !strengths.is_empty() {
        summary.push_str(&format!(" Strengths: {}.", strengths.join(", ")));
    }
    if !weaknesses.is_empty() {
        summary.push_str(&format!(" Areas for improvement: {}.", weaknesses.join(", ")));
    }

    summary
}

//! Sector Benchmarking
//!
//! Ranks company metrics against sector quantile summaries, aggregates the
//! rankings into a weighted score and caches comparison results.

pub mod cache;
pub mod comparison;
pub mod config;
pub mod percentile;
pub mod ranker;
pub mod scoring;
#[cfg(test)]
mod tests;

pub use cache::{fingerprint, CacheEntry, ComparisonCache, InMemoryComparisonCache};
pub use comparison::{ComparisonAggregator, ComparisonOptions};
pub use config::BenchmarkingConfig;
pub use percentile::{MetricDirection, PercentileEstimator};
pub use ranker::{BenchmarkMetric, MetricRanker};
pub use scoring::{effective_weighted_score, MetricWeights};

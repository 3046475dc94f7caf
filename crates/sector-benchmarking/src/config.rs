use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::scoring::MetricWeights;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkingConfig {
    // Result cache
    pub cache_ttl_secs: i64,              // 1800 (30 minutes)
    pub max_cache_size: usize,            // 1000 entries

    // Comparison
    pub significance_threshold: f64,      // 25th percentile
    pub weights: MetricWeights,
}

impl Default for BenchmarkingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 1800,
            max_cache_size: 1000,
            significance_threshold: 25.0,
            weights: MetricWeights::default(),
        }
    }
}

impl BenchmarkingConfig {
    /// Load overrides from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        let config = Self {
            cache_ttl_secs: dotenvy::var("BENCHMARK_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .context("BENCHMARK_CACHE_TTL_SECS must be an integer")?,
            max_cache_size: dotenvy::var("BENCHMARK_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("BENCHMARK_CACHE_MAX_ENTRIES must be a positive integer")?,
            significance_threshold: dotenvy::var("BENCHMARK_SIGNIFICANCE_THRESHOLD")
                .unwrap_or_else(|_| "25.0".to_string())
                .parse()
                .context("BENCHMARK_SIGNIFICANCE_THRESHOLD must be a number")?,
            weights: MetricWeights::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_secs <= 0 {
            bail!("cache TTL must be positive, got {}", self.cache_ttl_secs);
        }
        if self.max_cache_size == 0 {
            bail!("cache capacity must be at least 1");
        }
        if !(0.0..=100.0).contains(&self.significance_threshold) {
            bail!(
                "significance threshold must be a percentile in [0, 100], got {}",
                self.significance_threshold
            );
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::seconds(self.cache_ttl_secs)
    }
}

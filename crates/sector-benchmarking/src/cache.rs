//! Comparison Result Cache
//!
//! Results are keyed by a fingerprint of the inputs that affect them. The
//! in-memory store expires entries lazily on read and, when full, evicts one
//! entry in map iteration order. That is an approximation of oldest-first,
//! not a true LRU.

use std::sync::Mutex;

use benchmark_core::{BenchmarkData, CompanyMetrics, FundingStage, MetricComparisonResult};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::comparison::ComparisonOptions;
use crate::scoring::MetricWeights;

/// Storage seam for comparison results, so a shared or distributed store can
/// replace the in-process map without touching the scoring code.
pub trait ComparisonCache: Send + Sync {
    fn get(&self, key: &str) -> Option<MetricComparisonResult>;
    fn set(&self, key: String, value: MetricComparisonResult, ttl: Duration);
    fn len(&self) -> usize;
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub result: MetricComparisonResult,
    pub timestamp: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp > self.ttl
    }
}

pub struct InMemoryComparisonCache {
    entries: DashMap<String, CacheEntry>,
    max_entries: usize,
    /// Serializes the check-capacity/evict/insert sequence
    write_lock: Mutex<()>,
}

impl InMemoryComparisonCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            write_lock: Mutex::new(()),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub(crate) fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<MetricComparisonResult> {
        match self.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired_at(now) => return Some(entry.result.clone()),
            Some(_) => {}
        }

        // Stale: only remove if nobody refreshed it in the meantime
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            tracing::debug!("Evicted stale comparison cache entry {}", key);
        }
        None
    }

    pub(crate) fn set_at(
        &self,
        key: String,
        value: MetricComparisonResult,
        ttl: Duration,
        now: DateTime<Utc>,
    ) {
        if self.max_entries == 0 {
            return;
        }
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                let victim = self.entries.iter().next().map(|entry| entry.key().clone());
                match victim {
                    Some(victim) => {
                        self.entries.remove(&victim);
                        tracing::debug!("Comparison cache full, evicted {}", victim);
                    }
                    None => break,
                }
            }
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                result: value,
                timestamp: now,
                ttl,
            },
        );
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before.saturating_sub(self.entries.len())
    }
}

impl Default for InMemoryComparisonCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl ComparisonCache for InMemoryComparisonCache {
    fn get(&self, key: &str) -> Option<MetricComparisonResult> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: String, value: MetricComparisonResult, ttl: Duration) {
        self.set_at(key, value, ttl, Utc::now());
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// Inputs that determine a comparison result
#[derive(Serialize)]
struct FingerprintInput<'a> {
    arr: Option<f64>,
    growth_rate: Option<f64>,
    gross_margin: Option<f64>,
    customers: Option<f64>,
    churn_rate: Option<f64>,
    ltv_cac_ratio: Option<f64>,
    team_size: Option<f64>,
    total_raised: Option<f64>,
    sector: &'a str,
    stage: Option<FundingStage>,
    last_updated: DateTime<Utc>,
    include_recommendations: bool,
    significance_threshold: f64,
    weights: Vec<(&'a str, f64)>,
    fallback_weight: f64,
}

/// SHA-256 hex digest of the salient metrics, the benchmark identity, the
/// options and the scoring weights.
///
/// Returns `None` if the input cannot be serialized, in which case the
/// caller should skip caching.
pub fn fingerprint(
    metrics: &CompanyMetrics,
    benchmark: &BenchmarkData,
    options: &ComparisonOptions,
    weights: &MetricWeights,
) -> Option<String> {
    let input = FingerprintInput {
        arr: metrics.revenue.arr,
        growth_rate: metrics.revenue.growth_rate,
        gross_margin: metrics.revenue.gross_margin,
        customers: metrics.traction.customers,
        churn_rate: metrics.traction.churn_rate,
        ltv_cac_ratio: metrics.ltv_cac_ratio(),
        team_size: metrics.team.size,
        total_raised: metrics.funding.total_raised,
        sector: &benchmark.sector,
        stage: benchmark.stage,
        last_updated: benchmark.last_updated,
        include_recommendations: options.include_recommendations,
        significance_threshold: options.significance_threshold,
        weights: weights.entries(),
        fallback_weight: weights.fallback(),
    };

    match serde_json::to_vec(&input) {
        Ok(bytes) => Some(hex::encode(Sha256::digest(&bytes))),
        Err(e) => {
            tracing::warn!("Could not fingerprint comparison input: {}", e);
            None
        }
    }
}

//! Weighted scoring over partially-present metrics.
//!
//! Missing metrics are ignored and the remaining weights renormalized, so a
//! company is never penalized for data it did not disclose.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Weight used for any metric key not in the table
pub const UNKNOWN_METRIC_WEIGHT: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricWeights {
    weights: HashMap<String, f64>,
    fallback: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        let weights = [
            ("arr", 0.25),
            ("growth_rate", 0.20),
            ("gross_margin", 0.15),
            ("customers", 0.10),
            ("churn_rate", 0.10),
            ("ltv_cac_ratio", 0.10),
            ("team_size", 0.05),
            ("total_raised", 0.05),
        ]
        .into_iter()
        .map(|(k, w)| (k.to_string(), w))
        .collect();

        Self {
            weights,
            fallback: UNKNOWN_METRIC_WEIGHT,
        }
    }
}

impl MetricWeights {
    pub fn new(weights: HashMap<String, f64>) -> Self {
        Self {
            weights,
            fallback: UNKNOWN_METRIC_WEIGHT,
        }
    }

    pub fn with_weight(mut self, metric: &str, weight: f64) -> Self {
        self.weights.insert(metric.to_string(), weight);
        self
    }

    pub fn weight_for(&self, metric: &str) -> f64 {
        self.weights.get(metric).copied().unwrap_or(self.fallback)
    }

    /// Explicit weights sorted by metric key
    pub fn entries(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .weights
            .iter()
            .map(|(metric, weight)| (metric.as_str(), *weight))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }
}

/// Weighted mean of `(metric, score)` pairs, divided by the sum of the
/// weights actually used.
///
/// Returns `None` when nothing carries weight.
pub fn effective_weighted_score<'a, I>(scores: I, weights: &MetricWeights) -> Option<f64>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (metric, score) in scores {
        let weight = weights.weight_for(metric);
        if weight <= 0.0 || !score.is_finite() {
            continue;
        }
        weighted_sum += score * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

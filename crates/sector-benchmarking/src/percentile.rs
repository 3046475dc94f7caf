//! Percentile Estimation
//!
//! Maps a scalar onto a six-point sector distribution using piecewise-linear
//! interpolation between the `min, p25, median, p75, p90, max` breakpoints.

use benchmark_core::stats::round_to;
use benchmark_core::{MetricDistribution, PercentileRanking};
use serde::{Deserialize, Serialize};

/// Whether a larger value is an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricDirection {
    HigherIsBetter,
    LowerIsBetter,
}

pub struct PercentileEstimator;

impl PercentileEstimator {
    /// Raw percentile of `value` within `distribution`, 0-100 rounded to one decimal.
    ///
    /// The first bracket whose upper value reaches `value` is used, so a value
    /// sitting on a plateau of equal breakpoints takes the plateau's lowest
    /// percentile. A zero-width bracket is never divided by; it snaps to its
    /// upper percentile.
    pub fn estimate(value: f64, distribution: &MetricDistribution) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        if value <= distribution.min {
            return 0.0;
        }
        if value >= distribution.max {
            return 100.0;
        }

        for pair in distribution.breakpoints().windows(2) {
            let (p_lo, v_lo) = pair[0];
            let (p_hi, v_hi) = pair[1];
            if value > v_hi {
                continue;
            }
            let span = v_hi - v_lo;
            if span <= 0.0 {
                return p_hi;
            }
            let percentile = p_lo + (p_hi - p_lo) * (value - v_lo) / span;
            return round_to(percentile.clamp(0.0, 100.0), 1);
        }

        100.0
    }

    /// Percentile adjusted for metric direction, with an interpretation phrase.
    pub fn rank(
        value: f64,
        distribution: &MetricDistribution,
        direction: MetricDirection,
    ) -> PercentileRanking {
        let raw = Self::estimate(value, distribution);
        let percentile = match direction {
            MetricDirection::HigherIsBetter => raw,
            MetricDirection::LowerIsBetter => round_to(100.0 - raw, 1),
        };

        PercentileRanking {
            value,
            percentile,
            interpretation: Self::interpret(percentile, direction).to_string(),
        }
    }

    pub fn interpret(percentile: f64, direction: MetricDirection) -> &'static str {
        match direction {
            MetricDirection::HigherIsBetter => match percentile {
                p if p >= 90.0 => "Top 10% of sector peers",
                p if p >= 75.0 => "Top quartile performance",
                p if p >= 50.0 => "Above the sector median",
                p if p >= 25.0 => "Below the sector median",
                _ => "Bottom quartile of sector peers",
            },
            MetricDirection::LowerIsBetter => match percentile {
                p if p >= 90.0 => "Among the lowest 10% in the sector (favorable)",
                p if p >= 75.0 => "Lower than most sector peers (favorable)",
                p if p >= 50.0 => "Slightly better than the sector median",
                p if p >= 25.0 => "Higher than the sector median (unfavorable)",
                _ => "Among the highest in the sector (unfavorable)",
            },
        }
    }
}

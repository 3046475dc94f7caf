//! Descriptive statistics shared by the benchmarking and anomaly engines.
//!
//! Everything here works on plain `f64` slices and never panics: empty inputs
//! collapse to neutral values and undefined ratios come back as `None`.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (divides by `n`, not `n - 1`).
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation.
pub fn population_std_dev(data: &[f64]) -> f64 {
    population_variance(data).sqrt()
}

/// Coefficient of variation `std_dev / |mean|`.
///
/// Returns `None` when the mean is zero, where the ratio is indeterminate.
pub fn coefficient_of_variation(data: &[f64]) -> Option<f64> {
    let m = mean(data);
    if data.is_empty() || m.abs() < f64::EPSILON {
        return None;
    }
    Some(population_std_dev(data) / m.abs())
}

/// Period-over-period growth rates of a chronological series.
///
/// Pairs whose predecessor is zero or negative have no meaningful growth rate
/// and are skipped.
pub fn growth_rates(series: &[f64]) -> Vec<f64> {
    series
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Normalize a rate that may be expressed as a percentage (`12.0`) or a
/// fraction (`0.12`) into fraction form. Values above 1.0 are read as percentages.
pub fn as_fraction(rate: f64) -> f64 {
    if rate > 1.0 {
        rate / 100.0
    } else {
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_variance() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&data), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(population_variance(&data), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(population_std_dev(&data), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_inputs_are_neutral() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_variance(&[]), 0.0);
        assert!(coefficient_of_variation(&[]).is_none());
    }

    #[test]
    fn test_cov_zero_mean_is_indeterminate() {
        assert!(coefficient_of_variation(&[0.1, -0.1]).is_none());
        let cov = coefficient_of_variation(&[0.1, 0.3]).unwrap();
        assert_abs_diff_eq!(cov, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_growth_rates_skip_non_positive_base() {
        let rates = growth_rates(&[0.0, 100.0, 150.0]);
        assert_eq!(rates.len(), 1);
        assert_abs_diff_eq!(rates[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_as_fraction() {
        assert_abs_diff_eq!(as_fraction(12.0), 0.12, epsilon = 1e-12);
        assert_abs_diff_eq!(as_fraction(0.12), 0.12, epsilon = 1e-12);
        assert_abs_diff_eq!(as_fraction(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(58.333_333, 1), 58.3);
        assert_eq!(round_to(99.96, 1), 100.0);
    }
}

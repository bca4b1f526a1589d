//! Batch estimators over a materialized sequence
//!
//! Variance is computed in two passes: the mean first, then the squared
//! deviations from it. The `E[x^2] - E[x]^2` shortcut is never used because
//! it cancels catastrophically for data with a large offset and small spread.

use super::combine::PartitionSummary;
use crate::math;
use crate::traits::StatsError;

/// Arithmetic mean of `values`
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when `values` is empty.
///
/// # Example
///
/// ```
/// use runstats::statistics::mean;
///
/// let m = mean(&[1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
/// assert!((m - 1.8).abs() < 1e-12);
/// ```
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput { statistic: "mean" });
    }

    let sum: f64 = values.iter().sum();
    Ok(sum / values.len() as f64)
}

/// Population variance of `values` (divisor `n`)
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when `values` is empty.
///
/// # Example
///
/// ```
/// use runstats::statistics::variance;
///
/// let v = variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((v - 4.0).abs() < 1e-12);
/// ```
pub fn variance(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput {
            statistic: "variance",
        });
    }

    let mean = mean(values)?;
    Ok(sum_squared_deviations(values, mean) / values.len() as f64)
}

/// Sample variance of `values` (Bessel's correction, divisor `n - 1`)
///
/// Use [`variance`] for the population variance every other operation in
/// this crate works with.
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when `values` is empty and
/// [`StatsError::InvalidArgument`] when it holds a single value.
pub fn sample_variance(values: &[f64]) -> Result<f64, StatsError> {
    match values.len() {
        0 => Err(StatsError::EmptyInput {
            statistic: "sample variance",
        }),
        1 => Err(StatsError::InvalidArgument(
            "sample variance needs at least two values",
        )),
        n => {
            let mean = mean(values)?;
            Ok(sum_squared_deviations(values, mean) / (n - 1) as f64)
        }
    }
}

/// Population standard deviation of `values`
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when `values` is empty.
pub fn stddev(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput {
            statistic: "standard deviation",
        });
    }

    variance(values).map(math::sqrt)
}

/// Freeze `values` into a [`PartitionSummary`] ready to be combined
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when `values` is empty.
pub fn summarize(values: &[f64]) -> Result<PartitionSummary, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput {
            statistic: "summary",
        });
    }

    let mean = mean(values)?;
    let count = values.len() as u64;
    let variance = sum_squared_deviations(values, mean) / count as f64;
    PartitionSummary::new(mean, variance, count)
}

fn sum_squared_deviations(values: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .map(|&x| {
            let d = x - mean;
            d * d
        })
        .sum()
}

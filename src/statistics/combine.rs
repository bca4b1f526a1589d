//! Partition combiner
//!
//! Merges the summaries of two disjoint partitions into the summary of their
//! union in O(1), without revisiting the raw values. Uses Chan et al.'s
//! parallel decomposition of the sum of squared deviations:
//!
//! ```text
//! M2 = M2_a + M2_b + delta^2 * n_a * n_b / (n_a + n_b)
//! ```
//!
//! A partition with count 0 carries no information: its mean and variance
//! fields are ignored and the other partition is returned unchanged.

use crate::math;
use crate::traits::StatsError;

/// Mean, population variance and count of an unseen sample sequence
///
/// Summaries are plain values. They can be produced by
/// [`summarize`](super::summarize), frozen from a
/// [`RollingAccumulator`](super::RollingAccumulator), or shipped between
/// workers (with the `serde` feature) and combined with
/// [`combine`](Self::combine).
///
/// # Example
///
/// ```
/// use runstats::statistics::{summarize, PartitionSummary};
///
/// let left = summarize(&[1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
/// let right = summarize(&[3.0, 1.0, 2.0, 5.0, 4.0, 6.0]).unwrap();
///
/// let all = left.combine(&right).unwrap();
/// assert_eq!(all.count(), 11);
/// assert!((all.mean() - 30.0 / 11.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPartitionSummary"))]
pub struct PartitionSummary {
    mean: f64,
    variance: f64,
    count: u64,
}

/// Wire form of [`PartitionSummary`], validated through
/// [`PartitionSummary::new`] on the way in
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPartitionSummary {
    mean: f64,
    variance: f64,
    count: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPartitionSummary> for PartitionSummary {
    type Error = StatsError;

    fn try_from(raw: RawPartitionSummary) -> Result<Self, Self::Error> {
        Self::new(raw.mean, raw.variance, raw.count)
    }
}

impl Default for PartitionSummary {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartitionSummary {
    /// Create a summary from its first two central moments
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidArgument`] when `count > 0` and the
    /// variance is negative. NaN is accepted and propagates.
    pub fn new(mean: f64, variance: f64, count: u64) -> Result<Self, StatsError> {
        if count > 0 && variance < 0.0 {
            return Err(StatsError::InvalidArgument("variance must be non-negative"));
        }

        Ok(Self {
            mean,
            variance,
            count,
        })
    }

    /// The summary of an empty partition
    pub const fn empty() -> Self {
        Self {
            mean: 0.0,
            variance: 0.0,
            count: 0,
        }
    }

    /// Rebuild a summary from a running sum of squared deviations
    pub(crate) fn from_m2(mean: f64, m2: f64, count: u64) -> Self {
        if count == 0 {
            return Self::empty();
        }

        Self {
            mean,
            variance: m2 / count as f64,
            count,
        }
    }

    /// Mean of the partition (meaningless when the count is zero)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance of the partition
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Number of values summarized
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if the partition holds no values
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Population standard deviation
    pub fn stddev(&self) -> f64 {
        math::sqrt(self.variance)
    }

    /// Sample variance (divisor `n - 1`)
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoData`] for an empty partition and
    /// [`StatsError::InvalidArgument`] for a single-value partition.
    pub fn sample_variance(&self) -> Result<f64, StatsError> {
        match self.count {
            0 => Err(StatsError::NoData),
            1 => Err(StatsError::InvalidArgument(
                "sample variance needs at least two values",
            )),
            n => Ok(self.m2() / (n - 1) as f64),
        }
    }

    /// Sum of the summarized values
    pub fn sum(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean * self.count as f64
        }
    }

    /// Recovered sum of squared deviations from the mean
    pub fn m2(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.variance * self.count as f64
        }
    }

    /// Summary of the union of `self` and `other`
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::DegeneratePartition`] when both partitions are
    /// empty and [`StatsError::InvalidArgument`] when the combined count does
    /// not fit in a `u64`.
    pub fn combine(&self, other: &Self) -> Result<Self, StatsError> {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => {
                log::debug!("rejecting combine of two empty partitions");
                Err(StatsError::DegeneratePartition)
            }
            (true, false) => Ok(*other),
            (false, true) => Ok(*self),
            (false, false) => {
                let (mean, m2, count) = merge_moments(
                    (self.mean, self.m2(), self.count),
                    (other.mean, other.m2(), other.count),
                )?;
                Ok(Self::from_m2(mean, m2, count))
            }
        }
    }

    /// Fold any number of partition summaries into one
    ///
    /// Empty partitions are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::DegeneratePartition`] when the total count is
    /// zero, including when `parts` yields nothing, and
    /// [`StatsError::InvalidArgument`] when it does not fit in a `u64`.
    ///
    /// # Example
    ///
    /// ```
    /// use runstats::statistics::{summarize, PartitionSummary};
    ///
    /// let shards = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    /// let parts = shards.iter().map(|s| summarize(s).unwrap());
    ///
    /// let all = PartitionSummary::combine_all(parts).unwrap();
    /// assert_eq!(all.count(), 6);
    /// assert!((all.mean() - 3.5).abs() < 1e-12);
    /// ```
    pub fn combine_all<I>(parts: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = Self>,
    {
        let total = parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .try_fold(Self::empty(), |acc, p| acc.combine(&p))?;

        if total.is_empty() {
            log::debug!("rejecting combine of partitions with a total count of zero");
            return Err(StatsError::DegeneratePartition);
        }
        Ok(total)
    }
}

/// Mean of the union of two partitions, given each partition's mean and count
///
/// # Errors
///
/// Returns [`StatsError::DegeneratePartition`] when `n1 + n2 == 0` and
/// [`StatsError::InvalidArgument`] when `n1 + n2` does not fit in a `u64`.
///
/// # Example
///
/// ```
/// use runstats::statistics::combine_means;
///
/// let m = combine_means(1.8, 5, 3.5, 6).unwrap();
/// assert!((m - 30.0 / 11.0).abs() < 1e-12);
/// ```
pub fn combine_means(mean1: f64, n1: u64, mean2: f64, n2: u64) -> Result<f64, StatsError> {
    if n1 == 0 && n2 == 0 {
        log::debug!("rejecting combine of partitions with a total count of zero");
        return Err(StatsError::DegeneratePartition);
    }

    let (mean, _, _) = merge_moments((mean1, 0.0, n1), (mean2, 0.0, n2))?;
    Ok(mean)
}

/// Population variance of the union of two partitions
///
/// Each partition is given as (mean, population variance, count).
///
/// # Errors
///
/// Returns [`StatsError::DegeneratePartition`] when `n1 + n2 == 0` and
/// [`StatsError::InvalidArgument`] when a non-empty partition has a negative
/// variance or `n1 + n2` does not fit in a `u64`.
pub fn combine_variances(
    mean1: f64,
    var1: f64,
    n1: u64,
    mean2: f64,
    var2: f64,
    n2: u64,
) -> Result<f64, StatsError> {
    let a = PartitionSummary::new(mean1, var1, n1).inspect_err(log_invalid)?;
    let b = PartitionSummary::new(mean2, var2, n2).inspect_err(log_invalid)?;

    match (n1, n2) {
        (0, 0) => {
            log::debug!("rejecting combine of partitions with a total count of zero");
            Err(StatsError::DegeneratePartition)
        }
        (0, _) => Ok(var2),
        (_, 0) => Ok(var1),
        _ => {
            let (_, m2, count) = merge_moments((a.mean, a.m2(), n1), (b.mean, b.m2(), n2))?;
            Ok(m2 / count as f64)
        }
    }
}

fn log_invalid(err: &StatsError) {
    log::debug!("rejecting combine: {:?}", err);
}

/// Combine two `(mean, M2, count)` triples into the triple of their union
///
/// A side with count 0 is ignored entirely and the other side is returned
/// verbatim. Two empty sides yield an empty triple; callers that must reject
/// that case check the counts first.
pub(crate) fn merge_moments(
    a: (f64, f64, u64),
    b: (f64, f64, u64),
) -> Result<(f64, f64, u64), StatsError> {
    let (mean_a, m2_a, n_a) = a;
    let (mean_b, m2_b, n_b) = b;

    if n_b == 0 {
        log::trace!("skipping empty right partition");
        return Ok(a);
    }
    if n_a == 0 {
        log::trace!("skipping empty left partition");
        return Ok(b);
    }

    let Some(count) = n_a.checked_add(n_b) else {
        log::debug!("rejecting combine: {} + {} overflows u64", n_a, n_b);
        return Err(StatsError::InvalidArgument("combined count overflows u64"));
    };
    let delta = mean_b - mean_a;
    let (na, nb, n) = (n_a as f64, n_b as f64, count as f64);

    let mean = mean_a + delta * (nb / n);
    let m2 = m2_a + m2_b + delta * delta * na * nb / n;

    Ok((mean, m2, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{mean, summarize, variance};

    const LEFT: [f64; 5] = [1.0, 2.0, 3.0, 2.0, 1.0];
    const RIGHT: [f64; 6] = [3.0, 1.0, 2.0, 5.0, 4.0, 6.0];
    const ALL: [f64; 11] = [1.0, 2.0, 3.0, 2.0, 1.0, 3.0, 1.0, 2.0, 5.0, 4.0, 6.0];

    #[test]
    fn test_combine_means() {
        let m = combine_means(1.8, 5, 3.5, 6).unwrap();
        assert!((m - 2.73).abs() < 0.01);
        assert!((m - mean(&ALL).unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_combine_variances() {
        let v = combine_variances(
            mean(&LEFT).unwrap(),
            variance(&LEFT).unwrap(),
            5,
            mean(&RIGHT).unwrap(),
            variance(&RIGHT).unwrap(),
            6,
        )
        .unwrap();

        assert!((v - variance(&ALL).unwrap()).abs() < 1e-12, "variance: {}", v);
    }

    #[test]
    fn test_combined_sample_variance() {
        let all = summarize(&LEFT)
            .unwrap()
            .combine(&summarize(&RIGHT).unwrap())
            .unwrap();

        assert!((all.sample_variance().unwrap() - 2.82).abs() < 0.01);
    }

    #[test]
    fn test_empty_partition_is_ignored() {
        // The fields paired with a zero count are garbage and must not leak
        assert_eq!(combine_means(1.8, 5, 1e300, 0).unwrap(), 1.8);
        assert_eq!(combine_means(f64::NAN, 0, 3.5, 6).unwrap(), 3.5);

        assert_eq!(combine_variances(1.8, 0.56, 5, 99.0, -4.0, 0).unwrap(), 0.56);
        assert_eq!(
            combine_variances(f64::NAN, f64::NAN, 0, 3.5, 2.5, 6).unwrap(),
            2.5
        );
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(
            combine_means(1.0, 0, 2.0, 0),
            Err(StatsError::DegeneratePartition)
        );
        assert_eq!(
            combine_variances(1.0, 1.0, 0, 2.0, 1.0, 0),
            Err(StatsError::DegeneratePartition)
        );
        assert_eq!(
            PartitionSummary::empty().combine(&PartitionSummary::empty()),
            Err(StatsError::DegeneratePartition)
        );
    }

    #[test]
    fn test_negative_variance_rejected() {
        assert!(matches!(
            combine_variances(1.0, -0.5, 3, 2.0, 1.0, 4),
            Err(StatsError::InvalidArgument(_))
        ));
        assert!(matches!(
            PartitionSummary::new(1.0, -1.0, 2),
            Err(StatsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_element_partitions() {
        // Two singletons: mean 2, variance 1
        assert_eq!(combine_means(1.0, 1, 3.0, 1).unwrap(), 2.0);
        assert_eq!(combine_variances(1.0, 0.0, 1, 3.0, 0.0, 1).unwrap(), 1.0);
    }

    #[test]
    fn test_count_overflow_rejected() {
        let overflow = Err(StatsError::InvalidArgument("combined count overflows u64"));

        assert_eq!(combine_means(1.0, u64::MAX, 2.0, 1), overflow);
        assert_eq!(combine_variances(1.0, 0.5, u64::MAX, 2.0, 0.5, 1), overflow);

        let huge = PartitionSummary::new(1.0, 0.5, u64::MAX).unwrap();
        let one = PartitionSummary::new(2.0, 0.0, 1).unwrap();
        assert!(matches!(
            huge.combine(&one),
            Err(StatsError::InvalidArgument("combined count overflows u64"))
        ));
        assert!(PartitionSummary::combine_all([huge, one]).is_err());

        // Right at the limit still combines
        let m = combine_means(1.0, u64::MAX - 1, 1.0, 1).unwrap();
        assert_eq!(m, 1.0);
    }

    #[test]
    fn test_combine_all() {
        let parts = [
            summarize(&LEFT).unwrap(),
            PartitionSummary::empty(),
            summarize(&RIGHT).unwrap(),
        ];

        let all = PartitionSummary::combine_all(parts).unwrap();
        assert_eq!(all.count(), 11);
        assert!((all.mean() - mean(&ALL).unwrap()).abs() < 1e-12);
        assert!((all.variance() - variance(&ALL).unwrap()).abs() < 1e-12);
        assert!((all.sum() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_combine_all_empty() {
        assert_eq!(
            PartitionSummary::combine_all(core::iter::empty()),
            Err(StatsError::DegeneratePartition)
        );
        assert_eq!(
            PartitionSummary::combine_all([PartitionSummary::empty(); 3]),
            Err(StatsError::DegeneratePartition)
        );
    }
}

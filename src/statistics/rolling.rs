//! Rolling mean and variance
//!
//! Computes streaming statistics using Welford's numerically stable online algorithm.
//! Supports merging for distributed computation.

use super::combine::{merge_moments, PartitionSummary};
use crate::math;
use crate::traits::{Accumulator, StatsError};

/// Rolling mean/variance accumulator using Welford's algorithm
///
/// Keeps `(count, mean, M2)` where `M2` is the running sum of squared
/// deviations from the running mean, so memory is O(1) and no history is
/// stored. The population variance is `M2 / count`.
///
/// The accumulator is owned by one caller at a time; it holds no lock, so
/// concurrent ingestion must be serialized externally. For parallel work keep
/// one accumulator per worker and [`merge`](Self::merge) them afterwards.
///
/// # Example
///
/// ```
/// use runstats::statistics::RollingAccumulator;
///
/// let mut acc = RollingAccumulator::new();
///
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.ingest(value);
/// }
///
/// assert_eq!(acc.current_count(), 8);
/// assert!((acc.current_mean().unwrap() - 5.0).abs() < 1e-12);
/// assert!((acc.current_variance().unwrap() - 4.0).abs() < 1e-12);
/// ```
///
/// # Distributed Usage
///
/// ```
/// use runstats::statistics::RollingAccumulator;
///
/// let mut worker1: RollingAccumulator = [1.0, 2.0, 3.0].into_iter().collect();
/// let worker2: RollingAccumulator = [4.0, 5.0, 6.0].into_iter().collect();
///
/// worker1.merge(&worker2).unwrap();
/// assert!((worker1.current_mean().unwrap() - 3.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRollingAccumulator"))]
pub struct RollingAccumulator {
    /// Number of values seen
    count: u64,
    /// Running mean
    mean: f64,
    /// Sum of squared differences from mean (M2 in Welford's algorithm)
    m2: f64,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRollingAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRollingAccumulator> for RollingAccumulator {
    type Error = StatsError;

    fn try_from(raw: RawRollingAccumulator) -> Result<Self, Self::Error> {
        if raw.count > 0 && raw.m2 < 0.0 {
            return Err(StatsError::InvalidArgument("M2 must be non-negative"));
        }
        if raw.count == 0 {
            return Ok(Self::new());
        }

        Ok(Self {
            count: raw.count,
            mean: raw.mean,
            m2: raw.m2,
        })
    }
}

impl RollingAccumulator {
    /// Create a new empty accumulator
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Thaw a frozen summary back into a live accumulator
    pub fn from_summary(summary: &PartitionSummary) -> Self {
        if summary.is_empty() {
            return Self::new();
        }

        Self {
            count: summary.count(),
            mean: summary.mean(),
            m2: summary.m2(),
        }
    }

    /// Add a value
    ///
    /// Any float is accepted. NaN and infinities are not filtered and
    /// propagate through the mean and variance.
    pub fn ingest(&mut self, value: f64) {
        // The order is load-bearing: delta uses the old mean, delta2 the new one
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Pure form of [`ingest`](Self::ingest): consume the state and return the next one
    #[must_use]
    pub fn ingested(mut self, value: f64) -> Self {
        self.ingest(value);
        self
    }

    /// Mean of all values ingested so far
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoData`] before the first ingest.
    pub fn current_mean(&self) -> Result<f64, StatsError> {
        if self.count == 0 {
            return Err(StatsError::NoData);
        }
        Ok(self.mean)
    }

    /// Population variance of all values ingested so far
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoData`] before the first ingest.
    pub fn current_variance(&self) -> Result<f64, StatsError> {
        if self.count == 0 {
            return Err(StatsError::NoData);
        }
        Ok(self.m2 / self.count as f64)
    }

    /// Sample variance (Bessel's correction) of all values ingested so far
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoData`] before the first ingest and
    /// [`StatsError::InvalidArgument`] after exactly one.
    pub fn current_sample_variance(&self) -> Result<f64, StatsError> {
        match self.count {
            0 => Err(StatsError::NoData),
            1 => Err(StatsError::InvalidArgument(
                "sample variance needs at least two values",
            )),
            n => Ok(self.m2 / (n - 1) as f64),
        }
    }

    /// Population standard deviation
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoData`] before the first ingest.
    pub fn current_stddev(&self) -> Result<f64, StatsError> {
        self.current_variance().map(math::sqrt)
    }

    /// Number of values ingested
    pub fn current_count(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the sum of all values
    pub fn sum(&self) -> f64 {
        self.mean * self.count as f64
    }

    /// Freeze the live state into a [`PartitionSummary`]
    pub fn summary(&self) -> PartitionSummary {
        PartitionSummary::from_m2(self.mean, self.m2, self.count)
    }

    /// Merge with another accumulator using the parallel algorithm
    ///
    /// Afterwards `self` describes the union of both input streams.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidArgument`] when the combined count does
    /// not fit in a `u64`; `self` is left unchanged.
    pub fn merge(&mut self, other: &Self) -> Result<(), StatsError> {
        if other.count == 0 {
            return Ok(());
        }

        if self.count == 0 {
            *self = other.clone();
            return Ok(());
        }

        let (mean, m2, count) =
            merge_moments((self.mean, self.m2, self.count), (other.mean, other.m2, other.count))?;

        self.count = count;
        self.mean = mean;
        self.m2 = m2;
        Ok(())
    }

    /// Reset to the empty state
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Accumulator for RollingAccumulator {
    type Item = f64;

    fn update(&mut self, item: &Self::Item) {
        self.ingest(*item);
    }

    fn merge(&mut self, other: &Self) -> Result<(), StatsError> {
        RollingAccumulator::merge(self, other)
    }

    fn clear(&mut self) {
        RollingAccumulator::clear(self);
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Extend<f64> for RollingAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.ingest(value);
        }
    }
}

impl FromIterator<f64> for RollingAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::new();
        acc.extend(iter);
        acc
    }
}


#[cfg(all(test, feature = "serde", feature = "std"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_serde_round_trip() {
        let acc: RollingAccumulator = [1.0, 2.0, 3.0, 2.0, 1.0].into_iter().collect();

        let json = serde_json::to_string(&acc).unwrap();
        let back: RollingAccumulator = serde_json::from_str(&json).unwrap();

        assert_eq!(back, acc);
    }

    #[test]
    fn test_deserialize_rejects_negative_m2() {
        let json = r#"{"count":2,"mean":1.0,"m2":-1.0}"#;

        assert!(serde_json::from_str::<RollingAccumulator>(json).is_err());
    }
}

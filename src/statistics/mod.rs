//! Mean and variance for batches, partitions and streams
//!
//! Three entry points share one numeric contract (population variance,
//! divisor `n`):
//!
//! - batch estimators over a materialized slice ([`mean`], [`variance`]),
//! - the partition combiner, which merges `(mean, variance, count)` summaries
//!   of disjoint partitions in O(1) ([`combine_means`], [`combine_variances`],
//!   [`PartitionSummary`]),
//! - the [`RollingAccumulator`], which ingests one value at a time with
//!   Welford's recurrence.
//!
//! # Example
//!
//! ```
//! use runstats::statistics::{combine_means, mean, variance, RollingAccumulator};
//!
//! let data = [1.0, 2.0, 3.0, 2.0, 1.0, 3.0, 1.0, 2.0, 5.0, 4.0, 6.0];
//!
//! let mut acc = RollingAccumulator::new();
//! for value in data {
//!     acc.ingest(value);
//! }
//!
//! let batch = variance(&data).unwrap();
//! assert!((acc.current_variance().unwrap() - batch).abs() < 1e-12);
//!
//! let (left, right) = data.split_at(5);
//! let m = combine_means(mean(left).unwrap(), 5, mean(right).unwrap(), 6).unwrap();
//! assert!((m - mean(&data).unwrap()).abs() < 1e-12);
//! ```

mod batch;
mod combine;
mod rolling;

pub use batch::{mean, sample_variance, stddev, summarize, variance};
pub use combine::{combine_means, combine_variances, PartitionSummary};
pub use rolling::RollingAccumulator;

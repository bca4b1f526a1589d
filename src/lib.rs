//! # Runstats
//!
//! Single-pass, numerically stable mean and variance for Rust.
//!
//! Runstats computes the first two moments of a sequence three ways that all
//! agree numerically: over a batch, by combining the summaries of disjoint
//! partitions, or incrementally one value at a time.
//!
//! ## Features
//!
//! - **Batch Estimators**: two-pass mean and population variance
//! - **Partition Combiner**: O(1) merge of `(mean, variance, count)` summaries
//! - **Rolling Accumulator**: Welford's online recurrence, O(1) memory
//! - **Full Mergeability**: accumulators and summaries combine across workers
//!
//! ## Quick Start
//!
//! ```rust
//! use runstats::prelude::*;
//!
//! let mut acc = RollingAccumulator::new();
//! for latency_ms in [12.0, 15.0, 11.0, 14.0] {
//!     acc.ingest(latency_ms);
//! }
//! println!("Mean latency: {}", acc.current_mean().unwrap());
//! ```
//!
//! ## Distributed Computing
//!
//! Each worker summarizes its own partition and the summaries are combined
//! without revisiting any raw value:
//!
//! ```rust
//! use runstats::statistics::{summarize, PartitionSummary};
//!
//! let worker1 = summarize(&[1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
//! let worker2 = summarize(&[3.0, 1.0, 2.0, 5.0, 4.0, 6.0]).unwrap();
//!
//! let all = PartitionSummary::combine_all([worker1, worker2]).unwrap();
//! assert_eq!(all.count(), 11);
//! ```
//!
//! ## Errors
//!
//! Undefined results are reported as [`StatsError`] rather than NaN: an empty
//! batch, a combine whose counts sum to zero, or a query on an accumulator
//! that has seen no data. Non-finite inputs are not rejected and propagate
//! under the usual floating-point rules.
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `libm`: Float math for `no_std` builds (required without `std`)
//! - `serde`: Enable serialization of summaries and accumulators
//! - `full`: Enable all features

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("runstats needs either the `std` or the `libm` feature for float math");

mod math;

pub mod statistics;
pub mod traits;

pub mod prelude {
    pub use crate::statistics::{
        combine_means, combine_variances, mean, summarize, variance, PartitionSummary,
        RollingAccumulator,
    };
    pub use crate::traits::*;
}

pub use statistics::{PartitionSummary, RollingAccumulator};
pub use traits::StatsError;

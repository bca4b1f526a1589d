//! Core traits and errors shared by the statistics engine
//!
//! Every fallible operation reports a [`StatsError`]. Live accumulators
//! implement [`Accumulator`], which includes a `merge` operation so that
//! per-shard state can be folded into a single result.

use core::fmt::Debug;

/// Error raised by the estimators, the partition combiner and the rolling
/// accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// A batch function received a zero-length sequence
    #[error("cannot compute the {statistic} of an empty sequence")]
    EmptyInput {
        /// Name of the statistic that was requested
        statistic: &'static str,
    },
    /// Two partitions were combined whose counts sum to zero
    #[error("cannot combine partitions with a total count of zero")]
    DegeneratePartition,
    /// A rolling accumulator was queried before any value was ingested
    #[error("no values have been ingested")]
    NoData,
    /// An argument violates the invariants of a partition summary
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Core trait for live, mergeable accumulators
///
/// A caller that splits a stream across workers keeps one accumulator per
/// worker and merges them at the end. Implementations are not internally
/// synchronized: concurrent updates to the same instance must be serialized
/// by the owner.
pub trait Accumulator: Clone + Debug {
    /// The type of item this accumulator processes
    type Item: ?Sized;

    /// Add an item to the accumulator
    fn update(&mut self, item: &Self::Item);

    /// Merge another accumulator into this one
    ///
    /// The result must equal the state reached by updating a single
    /// accumulator with both input streams. Returns an error if the merged
    /// state cannot be represented.
    fn merge(&mut self, other: &Self) -> Result<(), StatsError>;

    /// Reset to the empty state
    fn clear(&mut self);

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if no item has been processed
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

//! Inventory error types.

use derive_more::Display;

/// Expected, recoverable inventory failures.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AllocationError {
    /// Allocation was requested without any topic.
    #[display("No topics requested")]
    EmptyTopics,

    /// Requested topic names unknown to the inventory.
    #[display("Unknown topics: {:?}", _0)]
    InvalidTopics(Vec<String>),

    /// Not enough free challenges in scope; carries how many are available.
    #[display("Insufficient challenges: only {} available", _0)]
    InsufficientChallenges(usize),

    /// Indices that are out of range, duplicated, or not allocated.
    #[display("Invalid indices for deallocation: {:?}", _0)]
    InvalidDeallocIndices(Vec<usize>),

    /// An index that is out of range or not currently allocated.
    #[display("Challenge index {} is not allocated", _0)]
    InvalidIndex(usize),
}

impl std::error::Error for AllocationError {}

/// A persisted inventory that does not fit the loaded content.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SnapshotError {
    /// Status array length differs from the challenge count.
    #[display("Snapshot has {} statuses for {} challenges", found, expected)]
    StatusCount {
        /// Challenges in the content.
        expected: usize,
        /// Statuses in the snapshot.
        found: usize,
    },

    /// Topic keys differ from the content catalog.
    #[display("Snapshot topics {:?} do not match content topics {:?}", found, expected)]
    TopicMismatch {
        /// Topics in the content.
        expected: Vec<String>,
        /// Topics in the snapshot.
        found: Vec<String>,
    },

    /// Restored state breaks inventory invariants.
    #[display("Snapshot is inconsistent: {:?}", _0)]
    Inconsistent(Vec<String>),
}

impl std::error::Error for SnapshotError {}

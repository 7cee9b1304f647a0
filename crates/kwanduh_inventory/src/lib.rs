//! Challenge inventory for kwanduh.
//!
//! Tracks, for a pool of topic-tagged trivia challenges, which are free,
//! on the board, answered, or abandoned, and keeps per-topic counters in
//! lockstep with the per-challenge status array.
//!
//! # Example
//!
//! ```
//! use kwanduh_inventory::{ChallengeInventory, ChallengeStatus, seed_play_data};
//! use rand::SeedableRng;
//!
//! let mut inventory = ChallengeInventory::new(&seed_play_data(&["History", "Science"], 10));
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let picked = inventory
//!     .allocate(&["History".to_string()], 4, &mut rng)
//!     .unwrap();
//! assert_eq!(inventory.count(ChallengeStatus::Allocated), 4);
//!
//! inventory.deallocate(&picked).unwrap();
//! assert_eq!(inventory.count(ChallengeStatus::Allocated), 0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod answered;
mod content;
mod error;
pub mod invariants;
mod inventory;
mod seeds;
mod snapshot;
mod status;
mod topic_info;

pub use answered::{AnswerDetails, AnsweredRecord};
pub use content::{BasicTopic, Challenge, ContentError, GameData, PlayData, TopicGroup};
pub use error::{AllocationError, SnapshotError};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, InventoryInvariants};
pub use inventory::{ChallengeIndex, ChallengeInventory};
pub use seeds::{DEFAULT_TOPICS, seed_play_data};
pub use snapshot::InventorySnapshot;
pub use status::ChallengeStatus;
pub use topic_info::TopicInfo;

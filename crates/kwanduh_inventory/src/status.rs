//! Per-challenge lifecycle status.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Where a challenge is in its lifecycle.
///
/// ```text
/// InReserve -> Allocated -> PlayedCorrectly | PlayedIncorrectly
///              Allocated -> Abandoned
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeStatus {
    /// Free to be allocated.
    #[default]
    InReserve,
    /// Placed on the current board.
    Allocated,
    /// Answered correctly.
    PlayedCorrectly,
    /// Answered incorrectly.
    PlayedIncorrectly,
    /// Replaced mid-game with a gimmee.
    Abandoned,
}

impl ChallengeStatus {
    /// Terminal statuses never change again (short of a full reset).
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ChallengeStatus::PlayedCorrectly
                | ChallengeStatus::PlayedIncorrectly
                | ChallengeStatus::Abandoned
        )
    }
}

//! Answer log entries.

use crate::status::ChallengeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the caller knows about an answer when reporting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct AnswerDetails {
    /// The choice the player picked.
    pub answer: String,
    /// How long the player took.
    pub time_to_answer: Duration,
    /// Game the answer belongs to.
    pub game_number: usize,
    /// Move the answer belongs to.
    pub move_number: usize,
    /// Board row of the answered cell.
    pub row: usize,
    /// Board column of the answered cell.
    pub col: usize,
}

/// A logged answer, keyed by challenge id in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredRecord {
    /// Id of the answered challenge.
    pub challenge_id: String,
    /// The choice the player picked.
    pub answer: String,
    /// `PlayedCorrectly` or `PlayedIncorrectly`.
    pub outcome: ChallengeStatus,
    /// When the answer was recorded.
    pub timestamp: DateTime<Utc>,
    /// How long the player took.
    pub time_to_answer: Duration,
    /// Game the answer belongs to.
    pub game_number: usize,
    /// Move the answer belongs to.
    pub move_number: usize,
    /// Board row of the answered cell.
    pub row: usize,
    /// Board column of the answered cell.
    pub col: usize,
}

impl AnsweredRecord {
    /// Stamps caller details with the challenge id, outcome and current time.
    pub fn from_details(
        challenge_id: impl Into<String>,
        outcome: ChallengeStatus,
        details: AnswerDetails,
    ) -> Self {
        Self {
            challenge_id: challenge_id.into(),
            answer: details.answer,
            outcome,
            timestamp: Utc::now(),
            time_to_answer: details.time_to_answer,
            game_number: details.game_number,
            move_number: details.move_number,
            row: details.row,
            col: details.col,
        }
    }
}

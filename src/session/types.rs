//! Value types the session hands to callers.

use kwanduh_board::{Coordinate, GameCellState};
use kwanduh_inventory::ChallengeIndex;
use serde::{Deserialize, Serialize};

/// Where the session is in its lifecycle.
///
/// `InitializingApp → PlayingNow → {JustWon | JustLost | JustAbandoned} → PlayingNow`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum PlayState {
    /// No game has been set up yet.
    #[default]
    InitializingApp,
    /// A board is live.
    PlayingNow,
    /// The last game ended in a loss.
    JustLost,
    /// The last game ended in a win.
    JustWon,
    /// The last game was given up.
    JustAbandoned,
}

impl PlayState {
    /// True for the three states a game can end in.
    pub fn is_final(self) -> bool {
        matches!(self, Self::JustLost | Self::JustWon | Self::JustAbandoned)
    }
}

/// A played cell, as reported by the move history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMove {
    /// The cell.
    pub coordinate: Coordinate,
    /// 1-based order in which the cell was played.
    pub move_number: usize,
    /// `PlayedCorrectly` or `PlayedIncorrectly`.
    pub state: GameCellState,
    /// Challenge answered on the cell.
    pub challenge: ChallengeIndex,
}

/// What a move did to the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// A chain of correct answers joins two opposite corners.
    Won {
        /// The winning chain, corner to corner.
        path: Vec<Coordinate>,
    },
    /// No winning chain can be completed anymore.
    Lost,
    /// The game goes on.
    Continue,
}

impl MoveOutcome {
    /// True for `Won` and `Lost`.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Continue)
    }

    /// The state to tear the game down with, if decided.
    pub fn final_state(&self) -> Option<PlayState> {
        match self {
            Self::Won { .. } => Some(PlayState::JustWon),
            Self::Lost => Some(PlayState::JustLost),
            Self::Continue => None,
        }
    }
}

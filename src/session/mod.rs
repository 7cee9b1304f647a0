//! Game session: board lifecycle, move rules and scoring.
//!
//! A [`GameSession`] deals boards from a [`kwanduh_inventory::ChallengeInventory`],
//! applies answered moves, classifies each move with the path rules from
//! [`kwanduh_board`] and returns unplayed challenges when a game ends.

pub mod contracts;
mod error;
mod game;
mod types;

pub use contracts::{AdjacentToPlayed, CellIsPlayable, LegalMove, MoveViolation, StartsInCorner};
pub use error::SessionError;
pub use game::GameSession;
pub use types::{GameMove, MoveOutcome, PlayState};

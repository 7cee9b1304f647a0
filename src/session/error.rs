//! Session error types.

use super::contracts::MoveViolation;
use super::types::PlayState;
use derive_more::{Display, From};
use kwanduh_board::{Coordinate, GeneratorError};
use kwanduh_inventory::AllocationError;

/// Failures surfaced by [`super::GameSession`] operations.
///
/// Inventory failures pass through unchanged inside `Allocation`.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum SessionError {
    /// The inventory refused the request.
    #[display("Allocation failed: {}", _0)]
    #[from]
    Allocation(AllocationError),

    /// The layout settings are invalid.
    #[display("Layout generation failed: {}", _0)]
    #[from]
    Layout(GeneratorError),

    /// Board size outside the playable range.
    #[display("Board size {} is outside {}..={}", _0, crate::MIN_BOARD_SIZE, crate::MAX_BOARD_SIZE)]
    InvalidBoardSize(usize),

    /// A game is already being played.
    #[display("A game is already in progress")]
    GameInProgress,

    /// The operation needs a live game.
    #[display("No game in progress (state is {})", _0)]
    NotPlaying(PlayState),

    /// The game was decided by the previous move and awaits teardown.
    #[display("The game is already decided")]
    GameDecided,

    /// Coordinate off the board.
    #[display("Cell {} is off the board", _0)]
    OutOfBounds(Coordinate),

    /// The move breaks a legality rule.
    #[display("Illegal move: {}", _0)]
    #[from]
    IllegalMove(MoveViolation),

    /// A restored grid does not match the board size.
    #[display("Grid {} is {}x{}, board size is {}", grid, found, found, expected)]
    MalformedGrid {
        /// Which grid.
        grid: &'static str,
        /// Board size.
        expected: usize,
        /// Grid side length.
        found: usize,
    },

    /// Teardown was asked for a state a game cannot end in.
    #[display("{} is not a final state", _0)]
    InvalidFinalState(PlayState),

    /// Content has not been loaded yet.
    #[display("Engine is not ready")]
    NotReady,
}

impl std::error::Error for SessionError {}

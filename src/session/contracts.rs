//! Move legality as preconditions.
//!
//! Each rule is a small checker; [`LegalMove`] composes them. The session
//! runs [`LegalMove`] before touching the inventory, and `legal_moves`
//! enumerates the cells that pass it.

use super::GameSession;
use derive_more::Display;
use kwanduh_board::{CellGrid, Coordinate, GameCellState, has_adjacent_neighbor, is_corner_cell};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const PLAYED: [GameCellState; 2] = [
    GameCellState::PlayedCorrectly,
    GameCellState::PlayedIncorrectly,
];

/// Why a cell cannot be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum MoveViolation {
    /// The cell is blocked.
    #[display("cell {} is blocked", _0)]
    CellBlocked(Coordinate),

    /// The cell was already answered.
    #[display("cell {} was already played", _0)]
    AlreadyPlayed(Coordinate),

    /// The first move of a game must be a corner.
    #[display("first move must be a corner, got {}", _0)]
    MustStartInCorner(Coordinate),

    /// The cell is off the board.
    #[display("cell {} is off the board", _0)]
    OffBoard(Coordinate),

    /// Later moves must be a corner or touch a played cell.
    #[display("cell {} is neither a corner nor next to a played cell", _0)]
    NotAdjacentToPlayed(Coordinate),
}

impl std::error::Error for MoveViolation {}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the cell is on the board and neither blocked nor played.
pub struct CellIsPlayable;

impl CellIsPlayable {
    /// Checks the cell state.
    #[instrument(skip(cells))]
    pub fn check(cells: &CellGrid, cell: Coordinate) -> Result<(), MoveViolation> {
        match cells.get(cell).ok_or(MoveViolation::OffBoard(cell))? {
            GameCellState::Blocked => Err(MoveViolation::CellBlocked(cell)),
            GameCellState::PlayedCorrectly | GameCellState::PlayedIncorrectly => {
                Err(MoveViolation::AlreadyPlayed(cell))
            }
            GameCellState::Unplayed => Ok(()),
        }
    }
}

/// Precondition: a game opens on a corner.
pub struct StartsInCorner;

impl StartsInCorner {
    /// Checks the opening move.
    #[instrument]
    pub fn check(move_number: usize, size: usize, cell: Coordinate) -> Result<(), MoveViolation> {
        if move_number == 0 && !is_corner_cell(cell, size) {
            Err(MoveViolation::MustStartInCorner(cell))
        } else {
            Ok(())
        }
    }
}

/// Precondition: after the opening, a move is a corner or touches a played cell.
pub struct AdjacentToPlayed;

impl AdjacentToPlayed {
    /// Checks continuation moves.
    #[instrument(skip(cells))]
    pub fn check(
        move_number: usize,
        cells: &CellGrid,
        cell: Coordinate,
    ) -> Result<(), MoveViolation> {
        if move_number == 0
            || is_corner_cell(cell, cells.size())
            || has_adjacent_neighbor(&PLAYED, cells, cell)
        {
            Ok(())
        } else {
            Err(MoveViolation::NotAdjacentToPlayed(cell))
        }
    }
}

/// Composite precondition: all move rules hold.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for playing `cell`.
    #[instrument(skip(session))]
    pub fn check(session: &GameSession, cell: Coordinate) -> Result<(), MoveViolation> {
        let cells = session.cell_state();
        CellIsPlayable::check(cells, cell)?;
        StartsInCorner::check(*session.move_number(), cells.size(), cell)?;
        AdjacentToPlayed::check(*session.move_number(), cells, cell)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> CellGrid {
        text.parse().unwrap()
    }

    #[test]
    fn test_blocked_and_played_cells_rejected() {
        let cells = grid("O # .\n. X .\n. . .");
        assert_eq!(
            CellIsPlayable::check(&cells, Coordinate::new(0, 1)),
            Err(MoveViolation::CellBlocked(Coordinate::new(0, 1)))
        );
        assert_eq!(
            CellIsPlayable::check(&cells, Coordinate::new(0, 0)),
            Err(MoveViolation::AlreadyPlayed(Coordinate::new(0, 0)))
        );
        assert_eq!(
            CellIsPlayable::check(&cells, Coordinate::new(1, 1)),
            Err(MoveViolation::AlreadyPlayed(Coordinate::new(1, 1)))
        );
        assert!(CellIsPlayable::check(&cells, Coordinate::new(2, 2)).is_ok());
        assert_eq!(
            CellIsPlayable::check(&cells, Coordinate::new(3, 0)),
            Err(MoveViolation::OffBoard(Coordinate::new(3, 0)))
        );
    }

    #[test]
    fn test_legal_move_rejects_off_board_cell() {
        let session = GameSession::new();
        assert_eq!(
            LegalMove::check(&session, Coordinate::new(0, 0)),
            Err(MoveViolation::OffBoard(Coordinate::new(0, 0)))
        );
        assert_eq!(
            LegalMove::check(&session, Coordinate::new(9, 9)),
            Err(MoveViolation::OffBoard(Coordinate::new(9, 9)))
        );
    }

    #[test]
    fn test_opening_must_be_corner() {
        assert!(StartsInCorner::check(0, 4, Coordinate::new(0, 3)).is_ok());
        assert_eq!(
            StartsInCorner::check(0, 4, Coordinate::new(1, 1)),
            Err(MoveViolation::MustStartInCorner(Coordinate::new(1, 1)))
        );
        assert!(StartsInCorner::check(1, 4, Coordinate::new(1, 1)).is_ok());
    }

    #[test]
    fn test_continuation_needs_corner_or_played_neighbor() {
        let cells = grid(". . . .\n. . . .\n. . . .\n. . . X");
        // Next to the wrong answer in the corner.
        assert!(AdjacentToPlayed::check(1, &cells, Coordinate::new(2, 2)).is_ok());
        // Any other corner.
        assert!(AdjacentToPlayed::check(1, &cells, Coordinate::new(0, 0)).is_ok());
        assert_eq!(
            AdjacentToPlayed::check(1, &cells, Coordinate::new(1, 1)),
            Err(MoveViolation::NotAdjacentToPlayed(Coordinate::new(1, 1)))
        );
    }
}

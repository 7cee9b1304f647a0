//! Win detection: a chain of correct answers joining opposite corners.

use super::search::shortest_path;
use crate::corners::DIAGONALS;
use crate::types::{CellGrid, GameCellState};
use crate::Coordinate;
use tracing::{debug, instrument};

/// Finds a winning path, if one exists.
///
/// The top-left to bottom-right diagonal is tried first, then top-right to
/// bottom-left. A diagonal is only searched when both of its corners were
/// answered correctly. The returned path runs corner to corner and is
/// shortest by hop count over 8-connected `PlayedCorrectly` cells.
///
/// Boards of size 0 or 1 never have a winning path.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn winning_path(grid: &CellGrid) -> Option<Vec<Coordinate>> {
    let size = grid.size();
    if size <= 1 {
        return None;
    }

    let correct = |state: GameCellState| state == GameCellState::PlayedCorrectly;
    for (from, to) in DIAGONALS {
        let start = from.coordinate(size);
        let end = to.coordinate(size);
        if !correct(grid[start]) || !correct(grid[end]) {
            continue;
        }
        if let Some(path) = shortest_path(grid, start, end, correct) {
            debug!(%from, %to, length = path.len(), "Winning path found");
            return Some(path);
        }
    }

    None
}

/// True if [`winning_path`] finds a path.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn is_winning_path(grid: &CellGrid) -> bool {
    winning_path(grid).is_some()
}

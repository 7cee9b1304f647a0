//! Whether a win is still reachable.

use super::search::shortest_path;
use crate::corners::{DIAGONALS, SAME_SIDE_PAIRS};
use crate::types::{CellGrid, GameCellState};
use tracing::{debug, instrument};

/// True if two corners sharing a board edge were both answered incorrectly.
///
/// Either diagonal needs one corner from every edge, so a lost edge rules out
/// both diagonals at once.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn has_losing_corner_condition(grid: &CellGrid) -> bool {
    let size = grid.size();
    if size <= 1 {
        return false;
    }

    SAME_SIDE_PAIRS.iter().any(|&(a, b)| {
        grid[a.coordinate(size)] == GameCellState::PlayedIncorrectly
            && grid[b.coordinate(size)] == GameCellState::PlayedIncorrectly
    })
}

/// True if some diagonal could still be joined through unplayed or correct cells.
///
/// This is a reachability check only; it says nothing about whether the
/// player will actually answer the remaining cells correctly.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn is_possible_winning_path(grid: &CellGrid) -> bool {
    let size = grid.size();
    if size <= 1 {
        return false;
    }
    if has_losing_corner_condition(grid) {
        debug!("Losing corner condition");
        return false;
    }

    DIAGONALS.iter().any(|&(from, to)| {
        let start = from.coordinate(size);
        let end = to.coordinate(size);
        grid[start].is_traversable()
            && grid[end].is_traversable()
            && shortest_path(grid, start, end, GameCellState::is_traversable).is_some()
    })
}

//! Neighborhood queries used by move legality.

use crate::types::{CellGrid, Coordinate, GameCellState};
use tracing::instrument;

/// True if any of the eight neighbors of `cell` is in one of `states` and not blocked.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn has_adjacent_neighbor(states: &[GameCellState], grid: &CellGrid, cell: Coordinate) -> bool {
    cell.neighbors(grid.size()).any(|neighbor| {
        let state = grid[neighbor];
        state != GameCellState::Blocked && states.contains(&state)
    })
}

/// Number of unplayed cells touching at least one correctly answered cell.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn number_of_possible_moves(grid: &CellGrid) -> usize {
    grid.iter()
        .filter(|&(coord, state)| {
            *state == GameCellState::Unplayed
                && has_adjacent_neighbor(&[GameCellState::PlayedCorrectly], grid, coord)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYED: [GameCellState; 2] = [
        GameCellState::PlayedCorrectly,
        GameCellState::PlayedIncorrectly,
    ];

    #[test]
    fn test_neighbor_in_requested_state() {
        let grid: CellGrid = "X . .\n. . .\n. . .".parse().unwrap();
        assert!(has_adjacent_neighbor(&PLAYED, &grid, Coordinate::new(1, 1)));
        assert!(!has_adjacent_neighbor(&PLAYED, &grid, Coordinate::new(2, 2)));
    }

    #[test]
    fn test_blocked_never_counts() {
        let grid: CellGrid = "# .\n. .".parse().unwrap();
        assert!(!has_adjacent_neighbor(
            &[GameCellState::Blocked],
            &grid,
            Coordinate::new(1, 1)
        ));
    }

    #[test]
    fn test_number_of_possible_moves() {
        let grid: CellGrid = "O . .\n. # .\n. . X".parse().unwrap();
        // (0,1) and (1,0) touch the correct corner; (1,1) is blocked.
        assert_eq!(number_of_possible_moves(&grid), 2);
        assert_eq!(number_of_possible_moves(&CellGrid::new(3)), 0);
    }
}

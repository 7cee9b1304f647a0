//! Breadth-first search between two cells.

use crate::types::{CellGrid, Coordinate, GameCellState};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{instrument, trace};

/// Shortest 8-connected path from `start` to `goal` through cells accepted by `passable`.
///
/// Both endpoints must already satisfy `passable`; the caller checks them.
/// Neighbors are explored in [`crate::DIRECTIONS`] order, so ties between
/// equally short paths resolve the same way every time.
#[instrument(skip(grid, passable))]
pub(crate) fn shortest_path(
    grid: &CellGrid,
    start: Coordinate,
    goal: Coordinate,
    passable: impl Fn(GameCellState) -> bool,
) -> Option<Vec<Coordinate>> {
    let size = grid.size();
    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut parent: HashMap<Coordinate, Coordinate> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&previous) = parent.get(&cursor) {
                path.push(previous);
                cursor = previous;
            }
            path.reverse();
            trace!(hops = path.len(), "Path found");
            return Some(path);
        }

        for next in current.neighbors(size) {
            if passable(grid[next]) && visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_equals_goal() {
        let grid: CellGrid = "O .\n. .".parse().unwrap();
        let start = Coordinate::new(0, 0);
        let path = shortest_path(&grid, start, start, |s| s == GameCellState::PlayedCorrectly);
        assert_eq!(path, Some(vec![start]));
    }

    #[test]
    fn test_prefers_diagonal_shortcut() {
        let grid: CellGrid = "O O O\nO O O\nO O O".parse().unwrap();
        let path = shortest_path(
            &grid,
            Coordinate::new(0, 0),
            Coordinate::new(2, 2),
            |s| s == GameCellState::PlayedCorrectly,
        )
        .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_blocked_region_has_no_path() {
        let grid: CellGrid = "O # .\n# # .\n. . O".parse().unwrap();
        let path = shortest_path(
            &grid,
            Coordinate::new(0, 0),
            Coordinate::new(2, 2),
            GameCellState::is_traversable,
        );
        assert_eq!(path, None);
    }
}

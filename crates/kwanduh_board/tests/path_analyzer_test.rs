//! Tests for winning-path and feasibility analysis.

use kwanduh_board::{
    CellGrid, Coordinate, GameCellState, has_losing_corner_condition, is_possible_winning_path,
    is_winning_path, winning_path,
};

#[test]
fn test_main_diagonal_of_four_wins() {
    let mut grid = CellGrid::new(4);
    for i in 0..4 {
        grid[Coordinate::new(i, i)] = GameCellState::PlayedCorrectly;
    }

    let path = winning_path(&grid).expect("diagonal should win");
    assert_eq!(path.len(), 4);
    assert_eq!(
        path,
        (0..4).map(|i| Coordinate::new(i, i)).collect::<Vec<_>>()
    );
}

#[test]
fn test_same_left_edge_misses_cannot_win() {
    let mut grid = CellGrid::new(4);
    grid[Coordinate::new(0, 0)] = GameCellState::PlayedIncorrectly;
    grid[Coordinate::new(3, 0)] = GameCellState::PlayedIncorrectly;
    assert!(!is_possible_winning_path(&grid));

    // Nothing else on the board can rescue it.
    for coord in grid.coordinates().collect::<Vec<_>>() {
        if grid[coord] == GameCellState::Unplayed {
            grid[coord] = GameCellState::PlayedCorrectly;
        }
    }
    assert!(has_losing_corner_condition(&grid));
    assert!(!is_possible_winning_path(&grid));
}

#[test]
fn test_queries_are_pure() {
    let grid: CellGrid = "\
        O . # .
        O X . .
        . O . .
        # . O O"
        .parse()
        .unwrap();
    let snapshot = grid.clone();

    assert_eq!(is_winning_path(&grid), is_winning_path(&grid));
    assert_eq!(
        is_possible_winning_path(&grid),
        is_possible_winning_path(&grid)
    );
    assert_eq!(winning_path(&grid), winning_path(&grid));
    assert_eq!(grid, snapshot);
}

#[test]
fn test_win_implies_possible_win() {
    let grid: CellGrid = "\
        O X .
        X O .
        . X O"
        .parse()
        .unwrap();
    assert!(is_winning_path(&grid));
    assert!(is_possible_winning_path(&grid));
}

#[test]
fn test_blocked_corner_rules_out_its_diagonal() {
    let grid: CellGrid = "\
        # . .
        . . .
        . . #"
        .parse()
        .unwrap();
    // The other diagonal is still open.
    assert!(is_possible_winning_path(&grid));

    let grid: CellGrid = "\
        # . #
        . . .
        # . #"
        .parse()
        .unwrap();
    assert!(!is_possible_winning_path(&grid));
}

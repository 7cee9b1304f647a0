//! Board geometry for kwanduh.
//!
//! A kwanduh board is an N×N grid. Each cell is unplayed, blocked, or
//! answered (correctly or not). A game is won by a chain of correct answers
//! joining two diagonally opposite corners. This crate holds the pure
//! parts of that:
//!
//! - **Types**: [`Coordinate`], [`Grid`], [`GameCellState`]
//! - **Corners**: [`Corner`] and the corner-cell helpers
//! - **Rules**: winning-path search, feasibility and adjacency queries
//! - **Generator**: randomized blocked-cell layouts under fairness caps

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod corners;
mod generator;
pub mod rules;
mod types;

pub use corners::{
    Corner, DIAGONALS, SAME_SIDE_PAIRS, corner_cells, is_adjacent_to_corner_cell,
    is_corner_cell, left_hand_corner_cell, opposite_corner_cell, right_hand_corner_cell,
};
pub use generator::{
    BlockLimits, GeneratorError, MatrixConfig, generate_blocked_layout, repair_corners,
};
pub use rules::{
    has_adjacent_neighbor, has_losing_corner_condition, is_possible_winning_path,
    is_winning_path, number_of_possible_moves, winning_path,
};
pub use types::{CellGrid, Coordinate, DIRECTIONS, GameCellState, Grid, GridError, ORTHOGONAL};

//! Corner geometry.
//!
//! Every game starts in a corner and every winning path joins two
//! diagonally opposite corners, so the corners get their own type.

use crate::types::Coordinate;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use tracing::instrument;

/// One of the four board corners.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, strum::Display,
)]
pub enum Corner {
    /// Row 0, column 0.
    TopLeft,
    /// Row 0, last column.
    TopRight,
    /// Last row, column 0.
    BottomLeft,
    /// Last row, last column.
    BottomRight,
}

/// The two diagonals a winning path may join, in evaluation order.
pub const DIAGONALS: [(Corner, Corner); 2] = [
    (Corner::TopLeft, Corner::BottomRight),
    (Corner::TopRight, Corner::BottomLeft),
];

/// Corner pairs sharing a board edge: left, top, right, bottom.
pub const SAME_SIDE_PAIRS: [(Corner, Corner); 4] = [
    (Corner::TopLeft, Corner::BottomLeft),
    (Corner::TopLeft, Corner::TopRight),
    (Corner::TopRight, Corner::BottomRight),
    (Corner::BottomLeft, Corner::BottomRight),
];

impl Corner {
    /// Position of this corner on a board of `size` (`size` must be at least 1).
    pub fn coordinate(self, size: usize) -> Coordinate {
        let last = size.saturating_sub(1);
        match self {
            Corner::TopLeft => Coordinate::new(0, 0),
            Corner::TopRight => Coordinate::new(0, last),
            Corner::BottomLeft => Coordinate::new(last, 0),
            Corner::BottomRight => Coordinate::new(last, last),
        }
    }

    /// The corner at `coord`, if any. On a 1×1 board the single cell reports as top-left.
    pub fn from_coordinate(coord: Coordinate, size: usize) -> Option<Corner> {
        Corner::iter().find(|corner| size > 0 && corner.coordinate(size) == coord)
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::BottomRight => Corner::TopLeft,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
        }
    }

    /// The corner reached by turning left along an edge.
    pub fn left_hand(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopRight,
            Corner::TopRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::BottomRight,
        }
    }

    /// The corner reached by turning right along an edge.
    pub fn right_hand(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::TopRight,
            Corner::BottomRight => Corner::BottomLeft,
            Corner::TopRight => Corner::BottomRight,
            Corner::BottomLeft => Corner::TopLeft,
        }
    }
}

/// Corner coordinates of a board of `size`, in [`Corner`] declaration order.
pub fn corner_cells(size: usize) -> impl Iterator<Item = Coordinate> {
    Corner::iter().map(move |corner| corner.coordinate(size))
}

/// True if `coord` is one of the four corners.
#[instrument]
pub fn is_corner_cell(coord: Coordinate, size: usize) -> bool {
    Corner::from_coordinate(coord, size).is_some()
}

/// The corner diagonally opposite `coord`, or `None` if `coord` is not a corner.
#[instrument]
pub fn opposite_corner_cell(coord: Coordinate, size: usize) -> Option<Coordinate> {
    Corner::from_coordinate(coord, size).map(|corner| corner.opposite().coordinate(size))
}

/// The left-hand neighbor corner of `coord`, or `None` if `coord` is not a corner.
#[instrument]
pub fn left_hand_corner_cell(coord: Coordinate, size: usize) -> Option<Coordinate> {
    Corner::from_coordinate(coord, size).map(|corner| corner.left_hand().coordinate(size))
}

/// The right-hand neighbor corner of `coord`, or `None` if `coord` is not a corner.
#[instrument]
pub fn right_hand_corner_cell(coord: Coordinate, size: usize) -> Option<Coordinate> {
    Corner::from_coordinate(coord, size).map(|corner| corner.right_hand().coordinate(size))
}

/// True if `coord` touches (8-directionally) any corner.
#[instrument]
pub fn is_adjacent_to_corner_cell(coord: Coordinate, size: usize) -> bool {
    size > 0 && corner_cells(size).any(|corner| corner.is_adjacent(coord))
}

//! Core grid types: cell states, coordinates and the square `Grid<T>`.

use derive_more::Display;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use strum::EnumIter;
use tracing::instrument;

/// Neighbor offsets in search order: right, down, left, up, then the four diagonals.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// The four orthogonal offsets (first half of [`DIRECTIONS`]).
pub const ORTHOGONAL: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

// ─────────────────────────────────────────────────────────────
//  Cell State
// ─────────────────────────────────────────────────────────────

/// State of a single board cell.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum GameCellState {
    /// Not yet answered; may still be claimed.
    #[default]
    Unplayed,
    /// Inert for the whole game and never tied to a challenge.
    Blocked,
    /// Answered correctly.
    PlayedCorrectly,
    /// Answered incorrectly.
    PlayedIncorrectly,
}

impl GameCellState {
    /// Single-character rendering used by `Display` and by the text grid parser.
    pub fn symbol(self) -> char {
        match self {
            GameCellState::Unplayed => '.',
            GameCellState::Blocked => '#',
            GameCellState::PlayedCorrectly => 'O',
            GameCellState::PlayedIncorrectly => 'X',
        }
    }

    /// Inverse of [`GameCellState::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(GameCellState::Unplayed),
            '#' => Some(GameCellState::Blocked),
            'O' => Some(GameCellState::PlayedCorrectly),
            'X' => Some(GameCellState::PlayedIncorrectly),
            _ => None,
        }
    }

    /// True once an answer has been recorded for the cell.
    pub fn is_played(self) -> bool {
        matches!(
            self,
            GameCellState::PlayedCorrectly | GameCellState::PlayedIncorrectly
        )
    }

    /// Cells a future winning path could still run through.
    pub fn is_traversable(self) -> bool {
        matches!(
            self,
            GameCellState::Unplayed | GameCellState::PlayedCorrectly
        )
    }
}

// ─────────────────────────────────────────────────────────────
//  Coordinate
// ─────────────────────────────────────────────────────────────

/// A (row, column) position on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    derive_new::new,
)]
#[display("({}, {})", row, col)]
pub struct Coordinate {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
}

impl Coordinate {
    /// Returns the coordinate shifted by the given offset, if it stays on a board of `size`.
    pub fn offset_by(self, d_row: isize, d_col: isize, size: usize) -> Option<Coordinate> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let moved = Coordinate { row, col };
        moved.in_bounds(size).then_some(moved)
    }

    /// True if the coordinate lies on a board of `size`.
    pub fn in_bounds(self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// The up-to-eight neighbors on a board of `size`, in [`DIRECTIONS`] order.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Coordinate> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset_by(dr, dc, size))
    }

    /// The up-to-four edge-sharing neighbors on a board of `size`.
    pub fn orthogonal_neighbors(self, size: usize) -> impl Iterator<Item = Coordinate> {
        ORTHOGONAL
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset_by(dr, dc, size))
    }

    /// True if `other` is one of the eight cells surrounding `self`.
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// On the top-left to bottom-right diagonal.
    pub fn on_main_diagonal(self) -> bool {
        self.row == self.col
    }

    /// On the top-right to bottom-left diagonal of a board of `size`.
    pub fn on_anti_diagonal(self, size: usize) -> bool {
        size > 0 && self.row + self.col == size - 1
    }
}

// ─────────────────────────────────────────────────────────────
//  Grid
// ─────────────────────────────────────────────────────────────

/// Error building a grid from nested rows or text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GridError {
    /// A row's length does not match the number of rows.
    #[display("Row {} has {} cells, expected {}", row, found, expected)]
    RaggedRow {
        /// Offending row index.
        row: usize,
        /// Cells required per row.
        expected: usize,
        /// Cells actually present.
        found: usize,
    },

    /// A character in a text grid is not a known cell symbol.
    #[display("Unknown cell symbol {:?}", _0)]
    UnknownSymbol(char),
}

impl std::error::Error for GridError {}

/// A square N×N grid stored row-major.
///
/// Serialized as a list of rows so persisted boards read naturally in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

/// The board's cell-state grid.
pub type CellGrid = Grid<GameCellState>;

impl<T: Clone> Grid<T> {
    /// Creates a grid of `size`×`size` cells all set to `value`.
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            cells: vec![value; size * size],
        }
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a grid of `size`×`size` default cells.
    pub fn new(size: usize) -> Self {
        Self::filled(size, T::default())
    }
}

impl<T> Grid<T> {
    /// Builds a grid from nested rows, rejecting ragged input.
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(GridError::RaggedRow {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self { size, cells })
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the cell at `coord`, or `None` when out of bounds.
    pub fn get(&self, coord: Coordinate) -> Option<&T> {
        coord
            .in_bounds(self.size)
            .then(|| &self.cells[coord.row * self.size + coord.col])
    }

    /// Mutable access to the cell at `coord`.
    pub fn get_mut(&mut self, coord: Coordinate) -> Option<&mut T> {
        if coord.in_bounds(self.size) {
            Some(&mut self.cells[coord.row * self.size + coord.col])
        } else {
            None
        }
    }

    /// Replaces the cell at `coord`, returning the previous value.
    pub fn set(&mut self, coord: Coordinate, value: T) -> Option<T> {
        self.get_mut(coord)
            .map(|cell| std::mem::replace(cell, value))
    }

    /// All coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<T> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coordinate { row, col }))
    }

    /// All coordinates in column-major order (down each column, then across).
    pub fn coordinates_column_major(&self) -> impl Iterator<Item = Coordinate> + use<T> {
        let size = self.size;
        (0..size).flat_map(move |col| (0..size).map(move |row| Coordinate { row, col }))
    }

    /// Iterates `(coordinate, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &T)> {
        let size = self.size.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (Coordinate::new(i / size, i % size), value))
    }

    /// Row slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Number of cells matching `predicate`.
    pub fn count(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        self.cells.iter().filter(|value| predicate(value)).count()
    }

    /// Builds a new grid by applying `f` to every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            size: self.size,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T> Index<Coordinate> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coordinate) -> &T {
        assert!(
            coord.in_bounds(self.size),
            "coordinate {} outside {}x{} grid",
            coord,
            self.size,
            self.size
        );
        &self.cells[coord.row * self.size + coord.col]
    }
}

impl<T> IndexMut<Coordinate> for Grid<T> {
    fn index_mut(&mut self, coord: Coordinate) -> &mut T {
        assert!(
            coord.in_bounds(self.size),
            "coordinate {} outside {}x{} grid",
            coord,
            self.size,
            self.size
        );
        &mut self.cells[coord.row * self.size + coord.col]
    }
}

impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(D::Error::custom)
    }
}

impl std::fmt::Display for CellGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Parses the `Display` form: one line per row, whitespace between symbols optional.
impl FromStr for CellGrid {
    type Err = GridError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| GameCellState::from_symbol(c).ok_or(GridError::UnknownSymbol(c)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Grid::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_clip_at_edges() {
        let corner = Coordinate::new(0, 0);
        let found: Vec<_> = corner.neighbors(4).collect();
        assert_eq!(
            found,
            vec![
                Coordinate::new(0, 1),
                Coordinate::new(1, 0),
                Coordinate::new(1, 1)
            ]
        );
        assert_eq!(Coordinate::new(1, 1).neighbors(4).count(), 8);
        assert_eq!(Coordinate::new(1, 1).orthogonal_neighbors(4).count(), 4);
    }

    #[test]
    fn test_is_adjacent() {
        let c = Coordinate::new(2, 2);
        assert!(c.is_adjacent(Coordinate::new(1, 3)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coordinate::new(0, 2)));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let result = Grid::from_rows(vec![vec![1, 2], vec![3]]);
        assert_eq!(
            result,
            Err(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_parse_and_display() {
        let grid: CellGrid = "O . #\n. X .\n# . O".parse().unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid[Coordinate::new(1, 1)], GameCellState::PlayedIncorrectly);
        assert_eq!(grid.to_string(), "O . #\n. X .\n# . O\n");
    }

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        let result: Result<CellGrid, _> = "O ?\n. .".parse();
        assert_eq!(result, Err(GridError::UnknownSymbol('?')));
    }

    #[test]
    fn test_serializes_as_rows() {
        let grid: CellGrid = "O .\n# X".parse().unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(
            json,
            r#"[["playedCorrectly","unplayed"],["blocked","playedIncorrectly"]]"#
        );
        let back: CellGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_column_major_order() {
        let grid: Grid<u8> = Grid::new(2);
        let order: Vec<_> = grid.coordinates_column_major().collect();
        assert_eq!(
            order,
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(1, 0),
                Coordinate::new(0, 1),
                Coordinate::new(1, 1)
            ]
        );
    }
}

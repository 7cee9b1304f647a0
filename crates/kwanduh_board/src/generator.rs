//! Randomized blocked-cell layouts.
//!
//! The generator is a greedy heuristic, not an exact solver. It places
//! blocks in shuffled order while soft caps (per row, per column, per
//! diagonal, clustering) allow it, forces extra blocks if the minimum was
//! not reached, and finally repairs corners so every corner keeps enough
//! open neighbors to start a game from. When the minimum-count fallback
//! fires the soft caps may be exceeded; when the corner repair fires the
//! total may drop below the minimum.

use crate::corners::{corner_cells, is_corner_cell};
use crate::types::{CellGrid, Coordinate, GameCellState};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Percentage knobs for the blocked-cell generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Upper bound on blocked cells, as a percentage of N².
    pub max_blocked_percent: u32,
    /// Lower bound on blocked cells, as a percentage of N².
    pub min_blocked_percent: u32,
    /// Cap on blocked cells in any single row or column, as a percentage of N.
    pub max_blocked_per_row_col: u32,
    /// Cap on blocked cells on each main diagonal, as a percentage of N.
    pub max_blocked_per_diagonal: u32,
    /// Minimum unplayed 8-neighbors every corner must keep.
    pub corners_require_adjacent_unplayed: usize,
    /// Cap on orthogonally touching blocked pairs, as a percentage of N². Boards above 3×3 only.
    pub max_adjacent_blocked_percent: u32,
}

impl MatrixConfig {
    /// Tighter bounds used for 3×3 boards.
    pub fn small_board() -> Self {
        Self {
            max_blocked_percent: 25,
            min_blocked_percent: 10,
            max_blocked_per_row_col: 70,
            max_blocked_per_diagonal: 30,
            corners_require_adjacent_unplayed: 1,
            max_adjacent_blocked_percent: 10,
        }
    }

    /// Bounds used for every board larger than 3×3.
    pub fn large_board() -> Self {
        Self {
            max_blocked_percent: 40,
            min_blocked_percent: 20,
            max_blocked_per_row_col: 50,
            max_blocked_per_diagonal: 40,
            corners_require_adjacent_unplayed: 2,
            max_adjacent_blocked_percent: 10,
        }
    }

    /// Built-in configuration for a board of `size`.
    #[instrument]
    pub fn for_board_size(size: usize) -> Self {
        if size <= 3 {
            Self::small_board()
        } else {
            Self::large_board()
        }
    }

    /// Rejects configurations the generator cannot honor.
    #[instrument]
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let percents = [
            ("max_blocked_percent", self.max_blocked_percent),
            ("min_blocked_percent", self.min_blocked_percent),
            ("max_blocked_per_row_col", self.max_blocked_per_row_col),
            ("max_blocked_per_diagonal", self.max_blocked_per_diagonal),
            (
                "max_adjacent_blocked_percent",
                self.max_adjacent_blocked_percent,
            ),
        ];
        if let Some((field, value)) = percents.into_iter().find(|&(_, value)| value > 100) {
            return Err(GeneratorError::PercentOutOfRange { field, value });
        }
        if self.min_blocked_percent > self.max_blocked_percent {
            return Err(GeneratorError::MinExceedsMax {
                min: self.min_blocked_percent,
                max: self.max_blocked_percent,
            });
        }
        if self.corners_require_adjacent_unplayed > 3 {
            return Err(GeneratorError::CornerRequirement(
                self.corners_require_adjacent_unplayed,
            ));
        }
        Ok(())
    }

    /// Converts the percentages into absolute cell counts for a board of `size`.
    pub fn limits(&self, size: usize) -> BlockLimits {
        let total = size * size;
        let percent_of = |n: usize, pct: u32| n * pct as usize / 100;
        let rounded = |n: usize, pct: u32| (n * pct as usize + 50) / 100;
        BlockLimits {
            max_blocked: rounded(total, self.max_blocked_percent),
            min_blocked: rounded(total, self.min_blocked_percent),
            per_row_col: percent_of(size, self.max_blocked_per_row_col),
            per_diagonal: percent_of(size, self.max_blocked_per_diagonal),
            max_adjacent: percent_of(total, self.max_adjacent_blocked_percent),
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self::large_board()
    }
}

/// Absolute counts derived from a [`MatrixConfig`] for one board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLimits {
    /// Greedy placement stops here.
    pub max_blocked: usize,
    /// Forced placement tops up to here.
    pub min_blocked: usize,
    /// Per row and per column.
    pub per_row_col: usize,
    /// Per main diagonal.
    pub per_diagonal: usize,
    /// Orthogonally touching blocked pairs.
    pub max_adjacent: usize,
}

/// Invalid generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GeneratorError {
    /// A percentage field exceeds 100.
    #[display("{} must be at most 100, got {}", field, value)]
    PercentOutOfRange {
        /// Field name.
        field: &'static str,
        /// Supplied value.
        value: u32,
    },

    /// The minimum blocked percentage is above the maximum.
    #[display("min_blocked_percent {} exceeds max_blocked_percent {}", min, max)]
    MinExceedsMax {
        /// Supplied minimum.
        min: u32,
        /// Supplied maximum.
        max: u32,
    },

    /// A corner has at most three neighbors.
    #[display("corners_require_adjacent_unplayed must be at most 3, got {}", _0)]
    CornerRequirement(usize),
}

impl std::error::Error for GeneratorError {}

// ─────────────────────────────────────────────────────────────
//  Generation
// ─────────────────────────────────────────────────────────────

/// Generates a grid of `Unplayed` and `Blocked` cells for a board of `size`.
///
/// Corners are never blocked, and after the repair pass every corner has at
/// least `corners_require_adjacent_unplayed` unplayed neighbors (as many as
/// it has, on boards too small to satisfy the requirement).
#[instrument(skip(rng))]
pub fn generate_blocked_layout<R: Rng + ?Sized>(
    size: usize,
    config: &MatrixConfig,
    rng: &mut R,
) -> Result<CellGrid, GeneratorError> {
    config.validate()?;

    let mut grid = CellGrid::new(size);
    if size == 0 {
        return Ok(grid);
    }

    let limits = config.limits(size);
    debug!(?limits, "Derived block limits");

    let mut pool: Vec<Coordinate> = grid.coordinates().collect();
    pool.shuffle(rng);

    let mut blocked = 0;
    let mut touching_pairs = 0;
    for &coord in &pool {
        if blocked >= limits.max_blocked {
            break;
        }
        if !placement_allowed(&grid, coord, &limits, touching_pairs) {
            continue;
        }
        grid[coord] = GameCellState::Blocked;
        blocked += 1;
        if size > 3 {
            touching_pairs += blocked_orthogonal_neighbors(&grid, coord);
        }
    }

    if blocked < limits.min_blocked {
        debug!(
            blocked,
            min = limits.min_blocked,
            "Soft caps left layout short, forcing blocks"
        );
        pool.shuffle(rng);
        while blocked < limits.min_blocked {
            match pool.pop() {
                Some(coord) if is_corner_cell(coord, size) => continue,
                Some(coord) if grid[coord] == GameCellState::Blocked => continue,
                Some(coord) => {
                    grid[coord] = GameCellState::Blocked;
                    blocked += 1;
                }
                None => {
                    warn!(
                        blocked,
                        min = limits.min_blocked,
                        "Ran out of cells before reaching minimum"
                    );
                    break;
                }
            }
        }
    }

    let freed = repair_corners(&mut grid, config.corners_require_adjacent_unplayed);
    debug!(
        blocked = blocked - freed,
        freed,
        "Blocked layout generated"
    );
    Ok(grid)
}

fn placement_allowed(
    grid: &CellGrid,
    coord: Coordinate,
    limits: &BlockLimits,
    touching_pairs: usize,
) -> bool {
    let size = grid.size();
    if is_corner_cell(coord, size) {
        return false;
    }

    let is_blocked = |c: Coordinate| grid[c] == GameCellState::Blocked;
    let row_blocked = (0..size)
        .filter(|&col| is_blocked(Coordinate::new(coord.row, col)))
        .count();
    let col_blocked = (0..size)
        .filter(|&row| is_blocked(Coordinate::new(row, coord.col)))
        .count();
    if row_blocked >= limits.per_row_col || col_blocked >= limits.per_row_col {
        return false;
    }

    if coord.on_main_diagonal() {
        let on_diagonal = (0..size)
            .filter(|&i| is_blocked(Coordinate::new(i, i)))
            .count();
        if on_diagonal >= limits.per_diagonal {
            return false;
        }
    }
    if coord.on_anti_diagonal(size) {
        let on_diagonal = (0..size)
            .filter(|&i| is_blocked(Coordinate::new(i, size - 1 - i)))
            .count();
        if on_diagonal >= limits.per_diagonal {
            return false;
        }
    }

    size <= 3 || touching_pairs + blocked_orthogonal_neighbors(grid, coord) <= limits.max_adjacent
}

fn blocked_orthogonal_neighbors(grid: &CellGrid, coord: Coordinate) -> usize {
    coord
        .orthogonal_neighbors(grid.size())
        .filter(|&c| grid[c] == GameCellState::Blocked)
        .count()
}

/// Unblocks neighbors of each corner until it has `required` unplayed neighbors.
///
/// Returns how many cells were unblocked.
#[instrument(skip(grid), fields(size = grid.size()))]
pub fn repair_corners(grid: &mut CellGrid, required: usize) -> usize {
    let size = grid.size();
    let corners: Vec<Coordinate> = corner_cells(size).collect();
    let mut freed = 0;

    for corner in corners {
        for neighbor in corner.neighbors(size) {
            let open = corner
                .neighbors(size)
                .filter(|&c| grid[c] == GameCellState::Unplayed)
                .count();
            if open >= required {
                break;
            }
            if grid[neighbor] == GameCellState::Blocked {
                grid[neighbor] = GameCellState::Unplayed;
                freed += 1;
                debug!(%corner, %neighbor, "Unblocked corner neighbor");
            }
        }
    }

    freed
}

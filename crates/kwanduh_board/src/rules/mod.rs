//! Path analysis over a board of cell states.
//!
//! Everything here is a pure function of the grid it is handed: no
//! state is kept between calls, so the same grid always yields the
//! same answer.

pub mod adjacency;
pub mod feasibility;
mod search;
pub mod win;

pub use adjacency::{has_adjacent_neighbor, number_of_possible_moves};
pub use feasibility::{has_losing_corner_condition, is_possible_winning_path};
pub use win::{is_winning_path, winning_path};

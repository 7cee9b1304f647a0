//! Kwanduh - a grid trivia board game engine
//!
//! Players answer trivia challenges dealt onto an N×N board and win by
//! joining two diagonally opposite corners with a chain of correct answers.
//!
//! # Architecture
//!
//! - **Board** ([`kwanduh_board`]): grid types, path rules, blocked-cell generator
//! - **Inventory** ([`kwanduh_inventory`]): challenge statuses and per-topic counters
//! - **Session**: board lifecycle, move contracts, scoring
//! - **Engine**: inventory, session and random source behind one handle
//! - **Store**: JSON snapshots with major-version discard
//!
//! # Example
//!
//! ```
//! use kwanduh::{Engine, GameConfig, MoveOutcome};
//! use kwanduh_board::Coordinate;
//! use kwanduh_inventory::seed_play_data;
//! use std::time::Duration;
//!
//! let data = seed_play_data(&["History", "Science"], 20);
//! let config = GameConfig::default().with_seed(Some(42));
//! let mut engine = Engine::from_config(&data, &config);
//!
//! engine.start_game(4, &[]).unwrap();
//! let corner = Coordinate::new(0, 0);
//! let answer = engine.challenge_at(corner).unwrap().correct.clone();
//! let outcome = engine.play(corner, &answer, Duration::from_secs(3)).unwrap();
//! assert_eq!(outcome, MoveOutcome::Continue);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod engine;
pub mod session;
mod store;

pub use config::{
    ConfigError, Difficulty, GameConfig, LayoutPolicy, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
    ScoringConfig,
};
pub use engine::{Engine, EngineHandle, EngineSnapshot, RestoreError, SNAPSHOT_VERSION};
pub use session::{
    GameMove, GameSession, LegalMove, MoveOutcome, MoveViolation, PlayState, SessionError,
};
pub use store::{STATE_FILE, SnapshotStore, StoreError};

//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use kwanduh_board::MatrixConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Smallest board a game can be played on.
pub const MIN_BOARD_SIZE: usize = 3;
/// Largest board a game can be played on.
pub const MAX_BOARD_SIZE: usize = 8;

// ─────────────────────────────────────────────────────────────
//  Difficulty & Scoring
// ─────────────────────────────────────────────────────────────

/// Difficulty level; sets the base score once a game has completed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// No base score.
    Easy,
    /// Base score of 5.
    #[default]
    Normal,
    /// Base score of 10.
    Hard,
}

impl Difficulty {
    /// Score granted before any bonus or penalty.
    pub fn base_score(self) -> i64 {
        match self {
            Self::Easy => 0,
            Self::Normal => 5,
            Self::Hard => 10,
        }
    }
}

/// Bonus and penalty weights for the running score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Added per game won.
    pub bonus_per_win: i64,
    /// Subtracted per game lost.
    pub penalty_per_loss: i64,
    /// Added per correct answer.
    pub bonus_per_right: i64,
    /// Subtracted per wrong answer.
    pub penalty_per_wrong: i64,
    /// Subtracted per replaced challenge.
    pub penalty_per_replaced: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            bonus_per_win: 10,
            penalty_per_loss: 2,
            bonus_per_right: 1,
            penalty_per_wrong: 1,
            penalty_per_replaced: 1,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Layout Policy
// ─────────────────────────────────────────────────────────────

/// Which generator settings apply to which board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Used for boards of size 3 and below.
    pub small_board: MatrixConfig,
    /// Used for every larger board.
    pub large_board: MatrixConfig,
}

impl LayoutPolicy {
    /// Settings for a board of `size`.
    pub fn for_size(&self, size: usize) -> &MatrixConfig {
        if size <= MIN_BOARD_SIZE {
            &self.small_board
        } else {
            &self.large_board
        }
    }
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            small_board: MatrixConfig::small_board(),
            large_board: MatrixConfig::large_board(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Game Config
// ─────────────────────────────────────────────────────────────

/// Everything a player can tune without touching content.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Board side length.
    #[serde(default = "default_board_size")]
    board_size: usize,

    /// Topics in play; empty means every topic in the content.
    #[serde(default)]
    topics: Vec<String>,

    /// Seed for a reproducible random source.
    #[serde(default)]
    seed: Option<u64>,

    /// Difficulty level.
    #[serde(default)]
    difficulty: Difficulty,

    /// Score weights.
    #[serde(default)]
    scoring: ScoringConfig,

    /// Generator settings per board size.
    #[serde(default)]
    layout: LayoutPolicy,

    /// Content file; seed content is used when absent.
    #[serde(default)]
    content_path: Option<PathBuf>,

    /// Directory the snapshot store writes into.
    #[serde(default = "default_state_dir")]
    state_dir: PathBuf,
}

#[instrument]
fn default_board_size() -> usize {
    4
}

#[instrument]
fn default_state_dir() -> PathBuf {
    PathBuf::from(".kwanduh")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: default_board_size(),
            topics: Vec::new(),
            seed: None,
            difficulty: Difficulty::default(),
            scoring: ScoringConfig::default(),
            layout: LayoutPolicy::default(),
            content_path: None,
            state_dir: default_state_dir(),
        }
    }
}

impl GameConfig {
    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content), fields(bytes = content.len()))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        debug!(board_size = config.board_size, difficulty = %config.difficulty, "Config parsed");
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(board_size = config.board_size, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Checks board size bounds and both generator settings.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::new(format!(
                "board_size {} must be between {} and {}",
                self.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        self.layout
            .small_board
            .validate()
            .map_err(|e| ConfigError::new(format!("small_board: {}", e)))?;
        self.layout
            .large_board
            .validate()
            .map_err(|e| ConfigError::new(format!("large_board: {}", e)))?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new config error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

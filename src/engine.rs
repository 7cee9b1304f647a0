//! The engine: inventory, session and random source owned together.
//!
//! Callers drive a run of games through an [`Engine`]. Before content is
//! loaded they hold an [`EngineHandle::NotReady`] and every operation
//! answers [`SessionError::NotReady`].

use crate::config::{Difficulty, GameConfig, ScoringConfig};
use crate::session::{GameSession, MoveOutcome, PlayState, SessionError};
use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use kwanduh_board::Coordinate;
use kwanduh_inventory::{
    Challenge, ChallengeIndex, ChallengeInventory, InventorySnapshot, PlayData, SnapshotError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Version stamped into every snapshot.
pub const SNAPSHOT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything mutable about an engine, ready for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Package version that wrote the snapshot.
    pub version: String,
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Challenge statuses, counters and answer log.
    pub inventory: InventorySnapshot,
    /// Board and counters.
    pub session: GameSession,
}

/// A snapshot that cannot be turned back into an engine.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum RestoreError {
    /// The inventory half does not fit the content.
    #[display("Inventory snapshot rejected: {}", _0)]
    #[from]
    Inventory(SnapshotError),

    /// The session half is malformed.
    #[display("Session snapshot rejected: {}", _0)]
    #[from]
    Session(SessionError),

    /// Session and inventory are each valid but disagree.
    #[display("Session disagrees with inventory: {:?}", _0)]
    Diverged(Vec<String>),
}

impl std::error::Error for RestoreError {}

/// Owns the inventory, session and random source for one player.
#[derive(Debug)]
pub struct Engine<R = StdRng> {
    inventory: ChallengeInventory,
    session: GameSession,
    rng: R,
    scoring: ScoringConfig,
    difficulty: Difficulty,
}

impl Engine<StdRng> {
    /// Builds a fresh engine seeded from the config, or from entropy.
    #[instrument(skip(play_data, config))]
    pub fn from_config(play_data: &PlayData, config: &GameConfig) -> Self {
        Self::new(play_data, config, rng_for(config))
    }

    /// Restores an engine from a snapshot, seeding like [`Engine::from_config`].
    #[instrument(skip(play_data, snapshot, config))]
    pub fn restore_from_config(
        play_data: &PlayData,
        snapshot: EngineSnapshot,
        config: &GameConfig,
    ) -> Result<Self, RestoreError> {
        Self::restore(play_data, snapshot, config, rng_for(config))
    }
}

fn rng_for(config: &GameConfig) -> StdRng {
    match config.seed() {
        Some(seed) => {
            debug!(seed, "Seeded random source");
            StdRng::seed_from_u64(*seed)
        }
        None => StdRng::from_os_rng(),
    }
}

impl<R: Rng> Engine<R> {
    /// Builds a fresh engine over `play_data`.
    #[instrument(skip(play_data, config, rng))]
    pub fn new(play_data: &PlayData, config: &GameConfig, rng: R) -> Self {
        let inventory = ChallengeInventory::new(play_data);
        info!(challenges = inventory.len(), "Engine created");
        Self {
            inventory,
            session: GameSession::with_layouts(*config.layout()),
            rng,
            scoring: *config.scoring(),
            difficulty: *config.difficulty(),
        }
    }

    /// Rebuilds an engine from a snapshot taken over the same content.
    ///
    /// # Errors
    ///
    /// Rejects an inventory that does not fit `play_data`, a session whose
    /// grids are malformed, and a pair that disagree about any cell or counter.
    #[instrument(skip(play_data, snapshot, config, rng), fields(version = %snapshot.version))]
    pub fn restore(
        play_data: &PlayData,
        snapshot: EngineSnapshot,
        config: &GameConfig,
        rng: R,
    ) -> Result<Self, RestoreError> {
        let inventory = ChallengeInventory::from_snapshot(play_data, snapshot.inventory)?;
        let mut session = snapshot.session;
        session.check_shape()?;
        session.set_layouts(*config.layout());

        let issues = session.check_against_inventory(&inventory);
        if !issues.is_empty() {
            warn!(?issues, "Restored session disagrees with inventory");
            return Err(RestoreError::Diverged(
                issues.into_iter().map(|issue| issue.description).collect(),
            ));
        }
        info!(
            game_number = session.game_number(),
            play_state = %session.play_state(),
            "Engine restored"
        );
        Ok(Self {
            inventory,
            session,
            rng,
            scoring: *config.scoring(),
            difficulty: *config.difficulty(),
        })
    }

    /// Deals a new board, abandoning any game still in progress.
    ///
    /// An empty `topics` slice means every topic in the content.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, size: usize, topics: &[String]) -> Result<(), SessionError> {
        if *self.session.play_state() == PlayState::PlayingNow {
            info!("Abandoning game in progress");
            self.session
                .teardown_after_game(&mut self.inventory, PlayState::JustAbandoned)?;
        }
        let topics = if topics.is_empty() {
            self.inventory.topic_names()
        } else {
            topics.to_vec()
        };
        self.session
            .setup_for_new_game(&mut self.inventory, size, &topics, &mut self.rng)
    }

    /// Answers `cell`; a decided game is torn down before returning.
    #[instrument(skip(self, answer))]
    pub fn play(
        &mut self,
        cell: Coordinate,
        answer: &str,
        elapsed: Duration,
    ) -> Result<MoveOutcome, SessionError> {
        let outcome = self
            .session
            .apply_move(&mut self.inventory, cell, answer, elapsed)?;
        self.check_consistency();
        if let Some(final_state) = outcome.final_state() {
            self.session
                .teardown_after_game(&mut self.inventory, final_state)?;
        }
        Ok(outcome)
    }

    /// Spends a gimmee on `cell`. `Ok(None)` when none are left.
    #[instrument(skip(self))]
    pub fn replace(&mut self, cell: Coordinate) -> Result<Option<ChallengeIndex>, SessionError> {
        self.session.request_replacement(&mut self.inventory, cell)
    }

    /// Ends the live game in `final_state`.
    #[instrument(skip(self))]
    pub fn finish(&mut self, final_state: PlayState) -> Result<usize, SessionError> {
        self.session
            .teardown_after_game(&mut self.inventory, final_state)
    }

    fn check_consistency(&self) {
        let issues = self.session.check_against_inventory(&self.inventory);
        if !issues.is_empty() {
            error!(?issues, "Session and inventory diverged");
            debug_assert!(issues.is_empty(), "session/inventory divergence: {:?}", issues);
        }
    }

    /// Current score under the configured weights and difficulty.
    pub fn score(&self) -> u64 {
        self.session.total_score(&self.scoring, self.difficulty)
    }

    /// The challenge bound to `cell`, if any.
    pub fn challenge_at(&self, cell: Coordinate) -> Option<&Challenge> {
        self.session
            .challenge_at(cell)
            .and_then(|index| self.inventory.challenge(index))
    }

    /// The inventory.
    pub fn inventory(&self) -> &ChallengeInventory {
        &self.inventory
    }

    /// The session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Grants extra gimmees.
    pub fn add_gimmees(&mut self, count: usize) {
        self.session.add_gimmees(count);
    }

    /// Captures the mutable state.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            saved_at: Utc::now(),
            inventory: self.inventory.snapshot(),
            session: self.session.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Handle
// ─────────────────────────────────────────────────────────────

/// An engine that may not exist yet.
#[derive(Debug)]
pub enum EngineHandle<R = StdRng> {
    /// Content has not been loaded.
    NotReady,
    /// The engine is live.
    Ready(Box<Engine<R>>),
}

impl<R> Default for EngineHandle<R> {
    fn default() -> Self {
        Self::NotReady
    }
}

impl<R> EngineHandle<R> {
    /// Installs `engine`, replacing any previous one.
    pub fn load(&mut self, engine: Engine<R>) {
        *self = Self::Ready(Box::new(engine));
    }

    /// True once an engine is installed.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The engine, or `NotReady`.
    pub fn ready(&self) -> Result<&Engine<R>, SessionError> {
        match self {
            Self::Ready(engine) => Ok(&**engine),
            Self::NotReady => Err(SessionError::NotReady),
        }
    }

    /// The engine mutably, or `NotReady`.
    pub fn ready_mut(&mut self) -> Result<&mut Engine<R>, SessionError> {
        match self {
            Self::Ready(engine) => Ok(&mut **engine),
            Self::NotReady => Err(SessionError::NotReady),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwanduh_inventory::{ChallengeStatus, seed_play_data};

    fn engine(seed: u64) -> (Engine, PlayData) {
        let data = seed_play_data(&["History", "Science", "Music"], 30);
        let config = GameConfig::default().with_seed(Some(seed));
        (Engine::from_config(&data, &config), data)
    }

    #[test]
    fn test_handle_not_ready() {
        let mut handle: EngineHandle = EngineHandle::default();
        assert!(!handle.is_ready());
        assert!(matches!(handle.ready(), Err(SessionError::NotReady)));
        assert!(matches!(handle.ready_mut(), Err(SessionError::NotReady)));

        let (engine, _) = engine(1);
        handle.load(engine);
        assert!(handle.ready().is_ok());
    }

    #[test]
    fn test_start_game_uses_all_topics_when_none_given() {
        let (mut engine, _) = engine(2);
        engine.start_game(4, &[]).unwrap();
        assert_eq!(engine.session().topics_in_play().len(), 3);
    }

    #[test]
    fn test_start_game_abandons_running_game() {
        let (mut engine, _) = engine(3);
        engine.start_game(4, &[]).unwrap();
        engine.start_game(5, &[]).unwrap();
        assert_eq!(*engine.session().game_number(), 1);
        assert_eq!(*engine.session().board_size(), 5);
        let open = engine
            .session()
            .cell_state()
            .count(|s| *s == kwanduh_board::GameCellState::Unplayed);
        assert_eq!(engine.inventory().count(ChallengeStatus::Allocated), open);
    }

    #[test]
    fn test_snapshot_restores_same_state() {
        let (mut engine, data) = engine(4);
        engine.start_game(3, &[]).unwrap();
        let corner = Coordinate::new(0, 0);
        let answer = engine.challenge_at(corner).unwrap().correct.clone();
        engine.play(corner, &answer, Duration::from_secs(4)).unwrap();

        let snapshot = engine.snapshot();
        let restored = Engine::restore_from_config(&data, snapshot.clone(), &GameConfig::default())
            .unwrap();
        assert_eq!(restored.session(), engine.session());
        assert_eq!(restored.inventory().snapshot(), snapshot.inventory);
    }

    #[test]
    fn test_restore_rejects_mismatched_grids() {
        let (mut engine, data) = engine(5);
        engine.start_game(4, &[]).unwrap();
        let mut snapshot = engine.snapshot();
        let mut json = serde_json::to_value(&snapshot.session).unwrap();
        json["board"] = serde_json::json!([[null, null, null], [null, null, null], [null, null, null]]);
        snapshot.session = serde_json::from_value(json).unwrap();

        let err = Engine::restore_from_config(&data, snapshot, &GameConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RestoreError::Session(SessionError::MalformedGrid {
                grid: "board",
                expected: 4,
                found: 3,
            })
        );
    }

    #[test]
    fn test_restore_rejects_session_without_its_allocations() {
        let (fresh, data) = engine(6);
        let (mut live, _) = engine(6);
        live.start_game(4, &[]).unwrap();
        let mut snapshot = live.snapshot();
        snapshot.inventory = fresh.snapshot().inventory;

        let err = Engine::restore_from_config(&data, snapshot, &GameConfig::default()).unwrap_err();
        assert!(matches!(err, RestoreError::Diverged(issues) if !issues.is_empty()));
    }
}

//! The game session: one board at a time over a shared inventory.

use super::contracts::{CellIsPlayable, LegalMove, MoveViolation};
use super::error::SessionError;
use super::types::{GameMove, MoveOutcome, PlayState};
use crate::config::{Difficulty, LayoutPolicy, MAX_BOARD_SIZE, MIN_BOARD_SIZE, ScoringConfig};
use derive_getters::Getters;
use kwanduh_board::{
    CellGrid, Coordinate, GameCellState, Grid, generate_blocked_layout, is_possible_winning_path,
    winning_path,
};
use kwanduh_inventory::{
    AllocationError, AnswerDetails, ChallengeIndex, ChallengeInventory, ChallengeStatus,
    InvariantViolation,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Board state, counters and lifecycle for a player's run of games.
///
/// The session never owns the inventory; every operation that touches
/// challenge statuses borrows it. Setup and teardown are the only places
/// challenges enter or leave the board.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSession {
    /// Side length of the current board.
    board_size: usize,
    /// Challenge bound to each cell; `None` for blocked cells.
    board: Grid<Option<ChallengeIndex>>,
    /// Play state of each cell.
    cell_state: CellGrid,
    /// Move number each cell was played on.
    move_index: Grid<Option<usize>>,
    /// Challenges swapped out of each cell, oldest first.
    replaced: Grid<Vec<ChallengeIndex>>,
    /// Cells on the winning chain, once there is one.
    on_win_path: Grid<bool>,
    /// Topics the current board was dealt from.
    topics_in_play: Vec<String>,
    /// Lifecycle state.
    play_state: PlayState,
    /// True once the live game has been won or lost.
    decided: bool,
    /// Replacement tokens available.
    gimmees: usize,
    /// True until the first board is dealt.
    very_first_game: bool,
    /// Completed games.
    game_number: usize,
    /// Moves played on the current board.
    move_number: usize,
    /// Games won.
    won_count: usize,
    /// Games lost.
    lost_count: usize,
    /// Correct answers across all games.
    right_count: usize,
    /// Wrong answers across all games.
    wrong_count: usize,
    /// Replacements across all games.
    replaced_count: usize,
    /// Most recent move on the current board.
    last_move: Option<Coordinate>,
    /// Answer time across all games.
    total_time: Duration,
    #[serde(skip)]
    #[getter(skip)]
    layouts: LayoutPolicy,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::with_layouts(LayoutPolicy::default())
    }
}

impl GameSession {
    /// Creates a session that has not dealt a board yet.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session using `layouts` for board generation.
    #[instrument]
    pub fn with_layouts(layouts: LayoutPolicy) -> Self {
        Self {
            board_size: 0,
            board: Grid::new(0),
            cell_state: Grid::new(0),
            move_index: Grid::new(0),
            replaced: Grid::new(0),
            on_win_path: Grid::new(0),
            topics_in_play: Vec::new(),
            play_state: PlayState::InitializingApp,
            decided: false,
            gimmees: 0,
            very_first_game: true,
            game_number: 0,
            move_number: 0,
            won_count: 0,
            lost_count: 0,
            right_count: 0,
            wrong_count: 0,
            replaced_count: 0,
            last_move: None,
            total_time: Duration::ZERO,
            layouts,
        }
    }

    /// Replaces the generator settings; they are not persisted with the session.
    pub fn set_layouts(&mut self, layouts: LayoutPolicy) {
        self.layouts = layouts;
    }

    /// Checks that a deserialized session is well formed.
    ///
    /// The board size must be 0 before the first deal and a playable size
    /// after it, and every per-cell grid must share that size.
    #[instrument(skip(self), fields(board_size = self.board_size))]
    pub fn check_shape(&self) -> Result<(), SessionError> {
        let size = self.board_size;
        let dealt = self.play_state != PlayState::InitializingApp;
        if (dealt || size != 0) && !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(SessionError::InvalidBoardSize(size));
        }

        let grids = [
            ("board", self.board.size()),
            ("cell_state", self.cell_state.size()),
            ("move_index", self.move_index.size()),
            ("replaced", self.replaced.size()),
            ("on_win_path", self.on_win_path.size()),
        ];
        match grids.into_iter().find(|&(_, found)| found != size) {
            Some((grid, found)) => Err(SessionError::MalformedGrid {
                grid,
                expected: size,
                found,
            }),
            None => Ok(()),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Lifecycle
    // ─────────────────────────────────────────────────────────────

    /// Deals a fresh `size`×`size` board from `topics`.
    ///
    /// Blocks cells with the generator, allocates one challenge per open
    /// cell and places them in column-major order. On any failure the
    /// session is left exactly as it was.
    #[instrument(skip(self, inventory, rng))]
    pub fn setup_for_new_game<R: Rng + ?Sized>(
        &mut self,
        inventory: &mut ChallengeInventory,
        size: usize,
        topics: &[String],
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if self.play_state == PlayState::PlayingNow {
            warn!("Setup requested while a game is live");
            return Err(SessionError::GameInProgress);
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(SessionError::InvalidBoardSize(size));
        }

        let layout = generate_blocked_layout(size, self.layouts.for_size(size), rng)?;
        let blocked = layout.count(|state| *state == GameCellState::Blocked);
        let picked = inventory.allocate(topics, size * size - blocked, rng)?;

        let mut board = Grid::new(size);
        let mut picked = picked.into_iter();
        for cell in layout.coordinates_column_major() {
            if layout[cell] != GameCellState::Blocked {
                board[cell] = picked.next();
            }
        }

        self.board_size = size;
        self.board = board;
        self.cell_state = layout;
        self.move_index = Grid::new(size);
        self.replaced = Grid::new(size);
        self.on_win_path = Grid::new(size);
        self.topics_in_play = topics.to_vec();
        self.play_state = PlayState::PlayingNow;
        self.decided = false;
        self.move_number = 0;
        self.last_move = None;

        if self.very_first_game {
            self.add_gimmees(size - 1);
            self.very_first_game = false;
        }

        info!(
            size,
            blocked,
            game_number = self.game_number,
            gimmees = self.gimmees,
            "New game dealt"
        );
        Ok(())
    }

    /// Answers the challenge on `cell` and classifies the result.
    ///
    /// Legality is checked before anything changes. The inventory records
    /// the answer first; the board follows only if that succeeded.
    #[instrument(skip(self, inventory, answer))]
    pub fn apply_move(
        &mut self,
        inventory: &mut ChallengeInventory,
        cell: Coordinate,
        answer: &str,
        elapsed: Duration,
    ) -> Result<MoveOutcome, SessionError> {
        self.require_live(cell)?;
        LegalMove::check(self, cell)?;

        let index = self.board[cell].ok_or(MoveViolation::CellBlocked(cell))?;
        let correct = inventory
            .challenge(index)
            .map(|challenge| challenge.is_correct(answer))
            .ok_or(AllocationError::InvalidIndex(index))?;

        let details = AnswerDetails::new(
            answer.to_string(),
            elapsed,
            self.game_number,
            self.move_number + 1,
            cell.row,
            cell.col,
        );
        inventory.mark_answered(index, correct, details)?;

        self.move_number += 1;
        self.move_index[cell] = Some(self.move_number);
        self.last_move = Some(cell);
        self.total_time += elapsed;
        if correct {
            self.cell_state[cell] = GameCellState::PlayedCorrectly;
            self.right_count += 1;
        } else {
            self.cell_state[cell] = GameCellState::PlayedIncorrectly;
            self.wrong_count += 1;
        }

        let outcome = self.classify();
        debug!(%cell, correct, move_number = self.move_number, ?outcome, "Move applied");
        Ok(outcome)
    }

    fn classify(&mut self) -> MoveOutcome {
        if let Some(path) = winning_path(&self.cell_state) {
            for &cell in &path {
                self.on_win_path[cell] = true;
            }
            self.decided = true;
            self.won_count += 1;
            info!(length = path.len(), "Game won");
            MoveOutcome::Won { path }
        } else if !is_possible_winning_path(&self.cell_state) {
            self.decided = true;
            self.lost_count += 1;
            info!("Game lost");
            MoveOutcome::Lost
        } else {
            MoveOutcome::Continue
        }
    }

    /// Spends a gimmee to swap the challenge on an unplayed `cell`.
    ///
    /// Returns `Ok(None)` without touching anything when no gimmee is left.
    /// Replacements stay within the original challenge's topic.
    #[instrument(skip(self, inventory))]
    pub fn request_replacement(
        &mut self,
        inventory: &mut ChallengeInventory,
        cell: Coordinate,
    ) -> Result<Option<ChallengeIndex>, SessionError> {
        self.require_live(cell)?;
        CellIsPlayable::check(&self.cell_state, cell)?;

        if self.gimmees == 0 {
            debug!("No gimmees left");
            return Ok(None);
        }

        let old = self.board[cell].ok_or(MoveViolation::CellBlocked(cell))?;
        let new = inventory.replace(old)?;

        self.board[cell] = Some(new);
        self.replaced[cell].push(old);
        self.replaced_count += 1;
        self.gimmees -= 1;
        info!(%cell, old, new, gimmees = self.gimmees, "Challenge replaced");
        Ok(Some(new))
    }

    /// Ends the live game in `final_state` and returns unplayed challenges to reserve.
    ///
    /// The game counter only moves when the number of recycled challenges
    /// differs from the cell count, so a board dealt and torn down with every
    /// cell unplayed and none blocked does not count.
    ///
    /// Returns how many challenges were recycled.
    #[instrument(skip(self, inventory))]
    pub fn teardown_after_game(
        &mut self,
        inventory: &mut ChallengeInventory,
        final_state: PlayState,
    ) -> Result<usize, SessionError> {
        if !final_state.is_final() {
            return Err(SessionError::InvalidFinalState(final_state));
        }
        if self.play_state != PlayState::PlayingNow {
            return Err(SessionError::NotPlaying(self.play_state));
        }

        let unplayed: Vec<ChallengeIndex> = self
            .cell_state
            .iter()
            .filter(|(_, state)| **state == GameCellState::Unplayed)
            .filter_map(|(cell, _)| self.board[cell])
            .collect();
        inventory.deallocate(&unplayed)?;

        self.play_state = final_state;
        self.decided = false;
        self.last_move = None;
        if unplayed.len() != self.board_size * self.board_size {
            self.game_number += 1;
        }

        info!(
            %final_state,
            recycled = unplayed.len(),
            game_number = self.game_number,
            "Game torn down"
        );
        Ok(unplayed.len())
    }

    fn require_live(&self, cell: Coordinate) -> Result<(), SessionError> {
        if self.play_state != PlayState::PlayingNow {
            return Err(SessionError::NotPlaying(self.play_state));
        }
        if self.decided {
            return Err(SessionError::GameDecided);
        }
        if !cell.in_bounds(self.board_size) {
            return Err(SessionError::OutOfBounds(cell));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Challenge bound to `cell`, if any.
    pub fn challenge_at(&self, cell: Coordinate) -> Option<ChallengeIndex> {
        self.board.get(cell).copied().flatten()
    }

    /// Cells the player may pick next; empty unless a game is live and undecided.
    #[instrument(skip(self))]
    pub fn legal_moves(&self) -> Vec<Coordinate> {
        if self.play_state != PlayState::PlayingNow || self.decided {
            return Vec::new();
        }
        self.cell_state
            .coordinates()
            .filter(|&cell| LegalMove::check(self, cell).is_ok())
            .collect()
    }

    /// Played cells of the current board in the order they were played.
    pub fn move_history(&self) -> Vec<GameMove> {
        let mut moves: Vec<GameMove> = self
            .move_index
            .iter()
            .filter_map(|(coordinate, number)| {
                Some(GameMove {
                    coordinate,
                    move_number: (*number)?,
                    state: self.cell_state[coordinate],
                    challenge: self.board[coordinate]?,
                })
            })
            .collect();
        moves.sort_by_key(|m| m.move_number);
        moves
    }

    /// The moves on the winning chain, in play order.
    pub fn winning_path_moves(&self) -> Vec<GameMove> {
        self.move_history()
            .into_iter()
            .filter(|m| self.on_win_path[m.coordinate])
            .collect()
    }

    /// Grants `count` more replacement tokens.
    #[instrument(skip(self))]
    pub fn add_gimmees(&mut self, count: usize) {
        self.gimmees += count;
        debug!(gimmees = self.gimmees, "Gimmees added");
    }

    /// Running score: nothing until a game has completed, never negative.
    #[instrument(skip(self, scoring))]
    pub fn total_score(&self, scoring: &ScoringConfig, difficulty: Difficulty) -> u64 {
        if self.game_number == 0 {
            return 0;
        }
        let total = difficulty.base_score()
            + self.won_count as i64 * scoring.bonus_per_win
            - self.lost_count as i64 * scoring.penalty_per_loss
            + self.right_count as i64 * scoring.bonus_per_right
            - self.wrong_count as i64 * scoring.penalty_per_wrong
            - self.replaced_count as i64 * scoring.penalty_per_replaced;
        total.max(0) as u64
    }

    /// Compares the board and answer counters with the inventory.
    ///
    /// While a game is live an unplayed cell must hold an allocated
    /// challenge; after teardown it must hold a reserve one. Played cells
    /// must match their answer in both cases.
    #[instrument(skip(self, inventory))]
    pub fn check_against_inventory(&self, inventory: &ChallengeInventory) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        let right = inventory.count(ChallengeStatus::PlayedCorrectly);
        if right != self.right_count {
            violations.push(InvariantViolation::new(format!(
                "inventory has {} correct answers, session has {}",
                right, self.right_count
            )));
        }
        let wrong = inventory.count(ChallengeStatus::PlayedIncorrectly);
        if wrong != self.wrong_count {
            violations.push(InvariantViolation::new(format!(
                "inventory has {} wrong answers, session has {}",
                wrong, self.wrong_count
            )));
        }

        if self.play_state == PlayState::InitializingApp {
            return violations;
        }
        let unplayed_status = if self.play_state == PlayState::PlayingNow {
            ChallengeStatus::Allocated
        } else {
            ChallengeStatus::InReserve
        };

        for (cell, state) in self.cell_state.iter() {
            let expected = match state {
                GameCellState::Blocked => continue,
                GameCellState::Unplayed => unplayed_status,
                GameCellState::PlayedCorrectly => ChallengeStatus::PlayedCorrectly,
                GameCellState::PlayedIncorrectly => ChallengeStatus::PlayedIncorrectly,
            };
            let found = self.board[cell].and_then(|index| inventory.status(index));
            if found != Some(expected) {
                violations.push(InvariantViolation::new(format!(
                    "cell {} is {} but its challenge is {:?}",
                    cell, state, found
                )));
            }
        }

        if !violations.is_empty() {
            warn!(count = violations.len(), "Session disagrees with inventory");
        }
        violations
    }
}

//! Kwanduh - command-line driver
//!
//! Plays simulated games, previews layouts and reports saved statistics.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use kwanduh::{Engine, EngineHandle, GameConfig, MoveOutcome, PlayState, SnapshotStore};
use kwanduh_board::{GameCellState, generate_blocked_layout};
use kwanduh_inventory::{DEFAULT_TOPICS, PlayData, seed_play_data};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Placeholder challenges per topic when no content file is configured.
const SEED_CHALLENGES_PER_TOPIC: usize = 60;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = GameConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Play {
            size,
            topics,
            seed,
            games,
            accuracy,
            replace_rate,
            fresh,
        } => {
            let mut config = config;
            if let Some(size) = size {
                config = config.with_board_size(size);
            }
            if !topics.is_empty() {
                config = config.with_topics(topics);
            }
            if seed.is_some() {
                config = config.with_seed(seed);
            }
            config.validate()?;
            run_play(&config, games, accuracy, replace_rate, fresh)
        }
        Command::Layout { size, seed } => run_layout(&config, size, seed),
        Command::Stats => run_stats(&config),
        Command::Reset => run_reset(&config),
    }
}

#[instrument]
fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kwanduh=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Tracing initialized");
}

/// Loads the configured content file, or placeholder content.
#[instrument(skip(config))]
fn load_content(config: &GameConfig) -> Result<PlayData> {
    match config.content_path() {
        Some(path) => Ok(PlayData::from_file(path)?),
        None => {
            info!("No content file configured, using placeholder topics");
            Ok(seed_play_data(&DEFAULT_TOPICS, SEED_CHALLENGES_PER_TOPIC))
        }
    }
}

fn player_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_os_rng(),
    }
}

/// Plays `games` games with a simulated player, then saves.
#[instrument(skip(config))]
fn run_play(
    config: &GameConfig,
    games: usize,
    accuracy: f64,
    replace_rate: f64,
    fresh: bool,
) -> Result<()> {
    let data = load_content(config)?;
    let store = SnapshotStore::new(config.state_dir());

    let stored = if fresh { None } else { store.load()? };
    let engine = match stored {
        Some(snapshot) => match Engine::restore_from_config(&data, snapshot, config) {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "Saved state rejected, starting fresh");
                Engine::from_config(&data, config)
            }
        },
        None => Engine::from_config(&data, config),
    };
    let mut handle = EngineHandle::default();
    handle.load(engine);
    let engine = handle.ready_mut()?;

    let mut player = player_rng(*config.seed());

    for game in 1..=games {
        let size = *config.board_size();
        engine.start_game(size, config.topics()).with_context(|| {
            format!(
                "could not start a {}x{} game for topics {:?}",
                size,
                size,
                config.topics()
            )
        })?;

        let final_state = play_one(engine, &mut player, accuracy, replace_rate)?;
        let session = engine.session();
        println!("Game {} ({}):", game, final_state);
        print!("{}", session.cell_state());
        let path = session.winning_path_moves();
        if !path.is_empty() {
            let cells: Vec<String> = path.iter().map(|m| m.coordinate.to_string()).collect();
            println!("Winning path: {}", cells.join(" "));
        }
        println!();
    }

    store.save(&engine.snapshot())?;
    let session = engine.session();
    println!(
        "Games: {}  Won: {}  Lost: {}  Right: {}  Wrong: {}  Gimmees: {}",
        session.game_number(),
        session.won_count(),
        session.lost_count(),
        session.right_count(),
        session.wrong_count(),
        session.gimmees()
    );
    println!("Score: {}", engine.score());
    Ok(())
}

/// Plays one dealt board to the end and returns how it ended.
#[instrument(skip_all)]
fn play_one(
    engine: &mut Engine,
    player: &mut StdRng,
    accuracy: f64,
    replace_rate: f64,
) -> Result<PlayState> {
    loop {
        let legal = engine.session().legal_moves();
        let Some(&cell) = legal.choose(player) else {
            warn!("No legal move left, abandoning");
            engine.finish(PlayState::JustAbandoned)?;
            return Ok(PlayState::JustAbandoned);
        };

        if *engine.session().gimmees() > 0 && player.random_bool(replace_rate) {
            engine.replace(cell)?;
        }

        let challenge = engine
            .challenge_at(cell)
            .with_context(|| format!("no challenge on {}", cell))?;
        let answer = if player.random_bool(accuracy) {
            challenge.correct.clone()
        } else {
            challenge
                .answers
                .iter()
                .find(|choice| **choice != challenge.correct)
                .cloned()
                .unwrap_or_default()
        };
        let elapsed = Duration::from_millis(player.random_range(1_000..15_000));

        match engine.play(cell, &answer, elapsed)? {
            MoveOutcome::Won { .. } => return Ok(PlayState::JustWon),
            MoveOutcome::Lost => return Ok(PlayState::JustLost),
            MoveOutcome::Continue => {}
        }
    }
}

/// Prints one generated layout.
#[instrument(skip(config))]
fn run_layout(config: &GameConfig, size: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = player_rng(seed);
    let layout = generate_blocked_layout(size, config.layout().for_size(size), &mut rng)?;
    print!("{}", layout);
    println!(
        "{} of {} cells blocked",
        layout.count(|state| *state == GameCellState::Blocked),
        size * size
    );
    Ok(())
}

/// Prints per-topic counters from the saved state.
#[instrument(skip(config))]
fn run_stats(config: &GameConfig) -> Result<()> {
    let store = SnapshotStore::new(config.state_dir());
    let Some(snapshot) = store.load()? else {
        println!("No saved games in {}", store.path().display());
        return Ok(());
    };
    let data = load_content(config)?;
    let engine = Engine::restore_from_config(&data, snapshot, config)?;

    println!(
        "{:<16} {:>6} {:>6} {:>6} {:>6} {:>8}",
        "topic", "free", "alloc", "right", "wrong", "replaced"
    );
    for topic in engine.inventory().topics() {
        println!(
            "{:<16} {:>6} {:>6} {:>6} {:>6} {:>8}",
            topic.name(),
            topic.free_count(),
            topic.alloc_count(),
            topic.right_count(),
            topic.wrong_count(),
            topic.replaced_count()
        );
    }

    let session = engine.session();
    println!();
    println!(
        "Games: {}  Won: {}  Lost: {}  Score: {}",
        session.game_number(),
        session.won_count(),
        session.lost_count(),
        engine.score()
    );
    println!("Time answering: {}s", session.total_time().as_secs());
    Ok(())
}

/// Deletes the saved state.
#[instrument(skip(config))]
fn run_reset(config: &GameConfig) -> Result<()> {
    let store = SnapshotStore::new(config.state_dir());
    store.clear()?;
    println!("Removed {}", store.path().display());
    Ok(())
}

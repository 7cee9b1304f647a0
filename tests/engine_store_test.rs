//! Engine runs persisted through the snapshot store.

use kwanduh::{Engine, GameConfig, MoveOutcome, PlayState, SnapshotStore};
use kwanduh_board::GameCellState;
use kwanduh_inventory::{ChallengeStatus, PlayData, seed_play_data};
use std::time::Duration;

fn content() -> PlayData {
    seed_play_data(&["History", "Science", "Geography"], 60)
}

fn config(seed: u64) -> GameConfig {
    GameConfig::default().with_seed(Some(seed))
}

/// Answers every legal move correctly until the game ends.
fn win_or_lose(engine: &mut Engine) -> MoveOutcome {
    loop {
        let cell = engine.session().legal_moves()[0];
        let answer = engine.challenge_at(cell).unwrap().correct.clone();
        let outcome = engine.play(cell, &answer, Duration::from_secs(1)).unwrap();
        if outcome.is_decided() {
            return outcome;
        }
    }
}

#[test]
fn test_engine_tears_down_decided_games() {
    let data = content();
    let mut engine = Engine::from_config(&data, &config(7));
    engine.start_game(4, &[]).unwrap();
    let outcome = win_or_lose(&mut engine);

    let expected = outcome.final_state().unwrap();
    assert_eq!(*engine.session().play_state(), expected);
    assert_eq!(engine.inventory().count(ChallengeStatus::Allocated), 0);
    assert_eq!(*engine.session().game_number(), 1);
    assert!(engine.score() > 0);
}

#[test]
fn test_same_seed_deals_same_board() {
    let data = content();
    let mut a = Engine::from_config(&data, &config(11));
    let mut b = Engine::from_config(&data, &config(11));
    a.start_game(6, &[]).unwrap();
    b.start_game(6, &[]).unwrap();
    assert_eq!(a.session().cell_state(), b.session().cell_state());
    assert_eq!(a.session().board(), b.session().board());
}

#[test]
fn test_snapshot_survives_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let data = content();

    let mut engine = Engine::from_config(&data, &config(3));
    engine.start_game(5, &[]).unwrap();
    win_or_lose(&mut engine);
    engine.start_game(3, &[]).unwrap();
    store.save(&engine.snapshot()).unwrap();

    let loaded = store.load().unwrap().expect("snapshot was saved");
    let restored = Engine::restore_from_config(&data, loaded, &config(3)).unwrap();
    assert_eq!(restored.session(), engine.session());
    assert_eq!(restored.inventory().snapshot(), engine.inventory().snapshot());
    assert_eq!(restored.score(), engine.score());
    assert_eq!(*restored.session().play_state(), PlayState::PlayingNow);
}

#[test]
fn test_restored_engine_keeps_playing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let data = content();

    let mut engine = Engine::from_config(&data, &config(21));
    engine.start_game(4, &[]).unwrap();
    store.save(&engine.snapshot()).unwrap();

    let loaded = store.load().unwrap().unwrap();
    let mut restored = Engine::restore_from_config(&data, loaded, &config(22)).unwrap();
    let outcome = win_or_lose(&mut restored);
    assert!(outcome.is_decided());
    assert!(restored.inventory().verify().is_empty());
}

#[test]
fn test_other_major_version_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let data = content();

    let engine = Engine::from_config(&data, &config(5));
    let mut snapshot = engine.snapshot();
    snapshot.version = "999.0.0".to_string();
    store.save(&snapshot).unwrap();

    assert!(store.load().unwrap().is_none());
    assert!(!store.path().exists());
}

#[test]
fn test_snapshot_from_other_content_is_rejected() {
    let data = content();
    let mut engine = Engine::from_config(&data, &config(8));
    engine.start_game(3, &[]).unwrap();
    let snapshot = engine.snapshot();

    let other = seed_play_data(&["History"], 10);
    assert!(Engine::restore_from_config(&other, snapshot, &config(8)).is_err());
}

#[test]
fn test_replacement_through_engine() {
    let data = content();
    let mut engine = Engine::from_config(&data, &config(13));
    engine.start_game(4, &[]).unwrap();
    let cell = engine.session().legal_moves()[0];
    let before = engine.challenge_at(cell).unwrap().id.clone();

    let replaced = engine.replace(cell).unwrap();
    assert!(replaced.is_some());
    let after = engine.challenge_at(cell).unwrap();
    assert_ne!(after.id, before);
    assert_eq!(engine.inventory().count(ChallengeStatus::Abandoned), 1);
    assert_eq!(engine.session().cell_state()[cell], GameCellState::Unplayed);
}

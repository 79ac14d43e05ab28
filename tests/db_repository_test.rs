//! Tests for the SQLite game store.

use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use tempfile::NamedTempFile;

use scorebook::{GameStore, SqliteStore};
use scorebook_core::{
    AtBatInput, CorrectionKind, Game, GameStatus, LineupPlayer, LogEntry, Pitch, Position, Side,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SqliteStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let store = SqliteStore::new(db_path).expect("Failed to create store");
    store.run_migrations().expect("Migrations failed");
    (db_file, store)
}

/// Scheduled game with three players a side.
fn new_game() -> Game {
    let mut game = Game::new("tigers", "Bears", false, Utc::now());
    for (side, prefix) in [(Side::Home, "Home"), (Side::Away, "Away")] {
        for i in 1..=3 {
            let position = if i == 1 { Position::Pitcher } else { Position::Bench };
            game.add_to_lineup(side, LineupPlayer::ad_hoc(format!("{prefix} {i}"), None, position))
                .expect("Add failed");
        }
    }
    game
}

#[test]
fn test_create_and_load_game() {
    let (_db, store) = setup_test_db();
    let game = new_game();
    store.create_game(&game).expect("Create failed");

    let loaded = store
        .load_game(game.id())
        .expect("Load failed")
        .expect("Game missing");
    assert_eq!(loaded.id(), game.id());
    assert_eq!(loaded.team_id(), "tigers");
    assert_eq!(loaded.opponent(), "Bears");
    assert_eq!(*loaded.status(), GameStatus::Scheduled);
    assert_eq!(loaded.lineups(), game.lineups());
    assert!(loaded.state().is_none());
}

#[test]
fn test_load_unknown_game_is_none() {
    let (_db, store) = setup_test_db();
    assert!(store.load_game("no-such-game").expect("Query failed").is_none());
}

#[test]
fn test_duplicate_game_id_fails() {
    let (_db, store) = setup_test_db();
    let game = new_game();
    store.create_game(&game).expect("First create failed");
    assert!(store.create_game(&game).is_err(), "Duplicate id should fail");
}

#[test]
fn test_commit_at_bats_persists_log_and_state() {
    let (_db, store) = setup_test_db();
    let mut game = new_game();
    store.create_game(&game).expect("Create failed");
    game.start().expect("Start failed");
    store.save_game(&game).expect("Save failed");

    let start = Utc::now();
    let mut ids = Vec::new();
    for (i, result) in ["single", "homerun", "strikeout"].into_iter().enumerate() {
        let recorded = game
            .record_at_bat(AtBatInput::result(result), start + Duration::seconds(i as i64))
            .expect("At-bat rejected");
        ids.push(recorded.entry.id().clone());
        store.commit_at_bat(&game, &recorded.entry).expect("Commit failed");
    }

    let log = store.read_event_log(game.id()).expect("Read failed");
    let stored: Vec<_> = log.entries().iter().map(|e| e.id().clone()).collect();
    assert_eq!(stored, ids);

    let loaded = store
        .load_game(game.id())
        .expect("Load failed")
        .expect("Game missing");
    assert_eq!(*loaded.status(), GameStatus::InProgress);
    assert_eq!(loaded.score(), game.score());
    assert_eq!(*loaded.score().team(), 2);
    assert_eq!(loaded.state(), game.state());
}

#[test]
fn test_corrections_are_stored_in_order() {
    let (_db, store) = setup_test_db();
    let mut game = new_game();
    game.start().expect("Start failed");
    store.create_game(&game).expect("Create failed");

    let first = game
        .record_at_bat(AtBatInput::result("homerun"), Utc::now())
        .expect("At-bat rejected");
    store.commit_at_bat(&game, &first.entry).expect("Commit failed");
    let correction = game
        .correct_at_bat(first.entry.id(), CorrectionKind::Void, Utc::now())
        .expect("Correction rejected");
    store.commit_at_bat(&game, &correction.entry).expect("Commit failed");

    let log = store.read_event_log(game.id()).expect("Read failed");
    assert_eq!(log.len(), 2);
    assert!(matches!(log.entries()[1], LogEntry::Correction(_)));
    assert!(log.effective_at_bats().is_empty());

    let loaded = store
        .load_game(game.id())
        .expect("Load failed")
        .expect("Game missing");
    assert_eq!(*loaded.score().team(), 0);
}

#[test]
fn test_entry_for_unknown_game_fails() {
    let (_db, store) = setup_test_db();
    let mut game = new_game();
    game.start().expect("Start failed");
    let recorded = game
        .record_at_bat(AtBatInput::result("walk"), Utc::now())
        .expect("At-bat rejected");
    // Game row was never created
    assert!(store.append_entry(game.id(), &recorded.entry).is_err());
}

#[test]
fn test_replace_game_state_keeps_live_count() {
    let (_db, store) = setup_test_db();
    let mut game = new_game();
    game.start().expect("Start failed");
    store.create_game(&game).expect("Create failed");

    game.record_pitch(Pitch::Ball).expect("Pitch rejected");
    game.record_pitch(Pitch::Strike).expect("Pitch rejected");
    let state = game.state().expect("No state").clone();
    store.replace_game_state(game.id(), &state).expect("Replace failed");

    let loaded = store
        .load_game(game.id())
        .expect("Load failed")
        .expect("Game missing");
    let loaded_state = loaded.state().expect("No state");
    assert_eq!((*loaded_state.balls(), *loaded_state.strikes()), (1, 1));
}

#[test]
fn test_list_games_in_creation_order() {
    let (_db, store) = setup_test_db();
    let first = Game::new("tigers", "Bears", true, Utc::now() - Duration::hours(2));
    let second = Game::new("tigers", "Lions", false, Utc::now());
    store.create_game(&second).expect("Create failed");
    store.create_game(&first).expect("Create failed");

    let headers = store.list_games().expect("List failed");
    let opponents: Vec<&str> = headers.iter().map(|h| h.opponent().as_str()).collect();
    assert_eq!(opponents, vec!["Bears", "Lions"]);
    assert!(*headers[0].is_home_team());
}

#[test]
fn test_migrations_are_idempotent() {
    let (_db, store) = setup_test_db();
    assert_eq!(store.run_migrations().expect("Second run failed"), 0);
}

#[test]
fn test_gapped_stored_lineup_orders_load_as_sequence() {
    let (db, store) = setup_test_db();
    let game = new_game();
    store.create_game(&game).expect("Create failed");

    // Rewrite the stored home lineup with gaps, as an older writer might have
    let mut lineups = serde_json::to_value(game.lineups()).expect("Encode failed");
    let home = lineups["home"].as_array_mut().expect("Home entries");
    for (entry, order) in home.iter_mut().zip([3, 7, 12]) {
        entry["order"] = serde_json::json!(order);
    }
    let mut conn = SqliteConnection::establish(db.path().to_str().expect("Invalid path"))
        .expect("Connect failed");
    diesel::sql_query("UPDATE games SET lineups = ? WHERE id = ?")
        .bind::<Text, _>(lineups.to_string())
        .bind::<Text, _>(game.id().clone())
        .execute(&mut conn)
        .expect("Update failed");

    let loaded = store
        .load_game(game.id())
        .expect("Load failed")
        .expect("Game missing");
    let orders: Vec<u32> = loaded.lineups().home.entries().iter().map(|e| *e.order()).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(loaded.lineups(), game.lineups());
    assert!(loaded.verify().is_ok());
}

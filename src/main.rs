//! Scorebook - command-line scorekeeper
//!
//! Imports scripted games into SQLite and prints box scores and summaries.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use scorebook::{
    GameScript, RenderOptions, ScorebookConfig, ScorekeeperService, SqliteStore, render_box_score,
    render_game_list, render_summary,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = ScorebookConfig::load(&cli.config)?;
    if let Some(db_path) = cli.db_path.clone() {
        config = config.with_db_path(db_path);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = SqliteStore::new(config.db_path().clone())?;
    let options = RenderOptions::new(*config.scheduled_innings(), config.team_name().clone());

    match cli.command {
        Command::InitDb => init_db(&store),
        Command::Import { script } => import(store, &script, &options),
        Command::List => list(store),
        Command::BoxScore { game_id, json } => box_score(store, &game_id, json, &options),
        Command::Summary { game_id, json } => summary(store, &game_id, json, &options),
    }
}

/// Create the database schema
#[instrument(skip(store), fields(db_path = %store.db_path()))]
fn init_db(store: &SqliteStore) -> Result<()> {
    let applied = store.run_migrations()?;
    info!(applied, "Database ready");
    println!("Database ready at {} ({} migrations applied)", store.db_path(), applied);
    Ok(())
}

/// Replay a scripted game into the database
#[instrument(skip(store, options))]
fn import(store: SqliteStore, path: &std::path::Path, options: &RenderOptions) -> Result<()> {
    store.run_migrations()?;
    let script = GameScript::from_file(path)
        .with_context(|| format!("Failed to load script {}", path.display()))?;
    let service = ScorekeeperService::new(store);
    let (game, events) = script.replay(&service)?;
    info!(game_id = %game.id(), events = events.len(), "Import complete");
    println!("Imported game {}", game.id());
    print!("{}", render_summary(&service.summary(game.id())?, options));
    Ok(())
}

/// List stored games
#[instrument(skip(store))]
fn list(store: SqliteStore) -> Result<()> {
    let service = ScorekeeperService::new(store);
    print!("{}", render_game_list(&service.list_games()?));
    Ok(())
}

/// Print a box score
#[instrument(skip(store, options))]
fn box_score(store: SqliteStore, game_id: &str, json: bool, options: &RenderOptions) -> Result<()> {
    let service = ScorekeeperService::new(store);
    let box_score = service.box_score(game_id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&box_score)?);
    } else {
        print!("{}", render_box_score(&box_score, options));
    }
    Ok(())
}

/// Print a game summary
#[instrument(skip(store, options))]
fn summary(store: SqliteStore, game_id: &str, json: bool, options: &RenderOptions) -> Result<()> {
    let service = ScorekeeperService::new(store);
    let summary = service.summary(game_id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary, options));
    }
    Ok(())
}

//! Command-line interface for scorebook.

use clap::{Parser, Subcommand};

/// Scorebook - baseball and softball game scoring
#[derive(Parser, Debug)]
#[command(name = "scorebook")]
#[command(about = "Event-sourced baseball/softball scorekeeping", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "scorebook.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Database file (overrides config and SCOREBOOK_DB)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and apply migrations
    InitDb,

    /// Create a game from a JSON script and replay its at-bats
    Import {
        /// Path to the script file
        script: std::path::PathBuf,
    },

    /// List stored games
    List,

    /// Print the box score of a game
    BoxScore {
        /// Game id
        game_id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the summary of a game
    Summary {
        /// Game id
        game_id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

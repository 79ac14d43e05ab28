//! Scorebook library - persistence, service and rendering for game scoring
//!
//! Wraps the pure `scorebook_core` crate with the collaborators a host
//! needs to keep score for real.
//!
//! # Architecture
//!
//! - **Store**: [`GameStore`] trait with SQLite and in-memory implementations
//! - **Service**: single-writer scorekeeping over a store
//! - **Config**: TOML settings with environment overrides
//! - **Render**: plain-text box scores and summaries
//!
//! # Example
//!
//! ```
//! use scorebook::{InMemoryStore, ScorekeeperService};
//! use scorebook_core::{AtBatInput, LineupPlayer, Position, Side};
//!
//! # fn example() -> Result<(), scorebook::ServiceError> {
//! let service = ScorekeeperService::new(InMemoryStore::new());
//! let game = service.create_game("tigers", "Bears", true)?;
//! service.add_to_lineup(game.id(), Side::Home, LineupPlayer::ad_hoc("Pat", None, Position::Pitcher))?;
//! service.add_to_lineup(game.id(), Side::Away, LineupPlayer::ad_hoc("Sam", None, Position::Catcher))?;
//! service.start_game(game.id())?;
//! service.record_at_bat(game.id(), AtBatInput::result("walk"))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod render;
mod script;
mod service;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, DB_PATH_ENV, ScorebookConfig};

// Crate-level exports - Database
pub use db::{DbError, GameRow, LogEntryRow, MIGRATIONS, NewGameRow, NewLogEntryRow, SqliteStore};

// Crate-level exports - Store
pub use store::{GameStore, InMemoryStore};

// Crate-level exports - Service
pub use service::{ScorekeeperService, ServiceError};

// Crate-level exports - Scripts
pub use script::{GameScript, ScriptError, ScriptPlayer, ScriptedAtBat};

// Crate-level exports - Rendering
pub use render::{RenderOptions, render_box_score, render_game_list, render_summary};

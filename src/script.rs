//! Game scripts: a JSON description of lineups and at-bats replayed
//! through the service, used by the `import` command.

use chrono::{DateTime, Utc};
use scorebook_core::{AtBatInput, EntrySource, Game, GameEvent, LineupPlayer, Position, Side};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::service::{ScorekeeperService, ServiceError};
use crate::store::GameStore;

/// One lineup entry in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptPlayer {
    /// Roster id. Omit for an untracked player.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Jersey number.
    #[serde(default)]
    pub jersey_number: Option<String>,
    /// Fielding position.
    #[serde(default = "bench")]
    pub position: Position,
}

fn bench() -> Position {
    Position::Bench
}

impl ScriptPlayer {
    fn into_lineup_player(self) -> LineupPlayer {
        match self.id {
            Some(id) => LineupPlayer {
                player_id: id,
                source: EntrySource::Roster,
                name: self.name,
                jersey_number: self.jersey_number,
                position: self.position,
            },
            None => LineupPlayer::ad_hoc(self.name, self.jersey_number, self.position),
        }
    }
}

/// One scripted at-bat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedAtBat {
    /// What the scorekeeper entered.
    #[serde(flatten)]
    pub input: AtBatInput,
    /// When it happened; defaults to import time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A whole game as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScript {
    /// Scorekeeping team id.
    pub team: String,
    /// Opponent name.
    pub opponent: String,
    /// Whether the team is home.
    #[serde(default)]
    pub is_home_team: bool,
    /// Home lineup in batting order.
    #[serde(default)]
    pub home: Vec<ScriptPlayer>,
    /// Away lineup in batting order.
    #[serde(default)]
    pub away: Vec<ScriptPlayer>,
    /// At-bats in order.
    #[serde(default)]
    pub at_bats: Vec<ScriptedAtBat>,
    /// Whether to mark the game completed afterwards.
    #[serde(default = "default_true")]
    pub complete: bool,
}

fn default_true() -> bool {
    true
}

/// Reading or replaying a script failed.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ScriptError {
    /// File could not be read.
    #[display("Failed to read script: {}", _0)]
    #[from]
    Io(std::io::Error),
    /// File is not a valid script.
    #[display("Invalid script: {}", _0)]
    #[from]
    Json(serde_json::Error),
    /// A scripted step was rejected.
    #[display("Step {} failed: {}", step, source)]
    Step {
        /// 1-based at-bat index, or 0 for setup.
        step: usize,
        /// Underlying failure.
        source: ServiceError,
    },
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Step { source, .. } => Some(source),
        }
    }
}

impl GameScript {
    /// Reads a script from a JSON file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let script: Self = serde_json::from_str(&content)?;
        debug!(at_bats = script.at_bats.len(), "Script parsed");
        Ok(script)
    }

    /// Creates the game and replays every step through the service.
    ///
    /// Returns the final game and every event emitted along the way.
    #[instrument(skip(self, service), fields(team = %self.team, opponent = %self.opponent))]
    pub fn replay<S: GameStore>(self, service: &ScorekeeperService<S>) -> Result<(Game, Vec<GameEvent>), ScriptError> {
        let setup = |source: ServiceError| ScriptError::Step { step: 0, source };
        let game = service
            .create_game(&self.team, &self.opponent, self.is_home_team)
            .map_err(setup)?;
        let game_id = game.id().clone();

        for (side, players) in [(Side::Home, self.home), (Side::Away, self.away)] {
            for player in players {
                service
                    .add_to_lineup(&game_id, side, player.into_lineup_player())
                    .map_err(setup)?;
            }
        }

        let mut events = service.start_game(&game_id).map_err(setup)?;
        let total = self.at_bats.len();
        for (i, step) in self.at_bats.into_iter().enumerate() {
            let timestamp = step.timestamp.unwrap_or_else(Utc::now);
            let recorded = service
                .record_at_bat_at(&game_id, step.input, timestamp)
                .map_err(|source| ScriptError::Step { step: i + 1, source })?;
            events.extend(recorded.events);
        }
        if self.complete {
            events.extend(service.end_game(&game_id).map_err(|source| ScriptError::Step { step: total + 1, source })?);
        }

        let game = service.game(&game_id).map_err(setup)?;
        info!(game_id = %game_id, at_bats = total, events = events.len(), "Script replayed");
        Ok((game, events))
    }
}

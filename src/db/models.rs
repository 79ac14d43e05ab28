//! Database rows and their conversion to scoring types.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use scorebook_core::{Game, GameHeader, GameState, GameStatus, Lineups, LogEntry};
use std::str::FromStr;
use tracing::instrument;

use crate::db::{DbError, schema};

/// Stored game: header columns plus JSON lineups and state snapshot.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: String,
    team_id: String,
    opponent: String,
    is_home_team: bool,
    status: String,
    lineups: String,
    game_state: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl GameRow {
    /// Decodes the header columns.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored status is not a known value.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn header(&self) -> Result<GameHeader, DbError> {
        let status = GameStatus::from_str(&self.status)
            .map_err(|_| DbError::new(format!("Invalid game status: '{}'", self.status)))?;
        Ok(GameHeader::new(
            self.id.clone(),
            self.team_id.clone(),
            self.opponent.clone(),
            self.is_home_team,
            status,
            self.created_at.and_utc(),
        ))
    }

    /// Decodes the stored lineups. Batting orders read back as 1..n.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn decode_lineups(&self) -> Result<Lineups, DbError> {
        Ok(serde_json::from_str(&self.lineups)?)
    }

    /// Decodes the stored state snapshot, if any.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn decode_state(&self) -> Result<Option<GameState>, DbError> {
        self.game_state
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(DbError::from)
    }
}

/// Insertable and updatable game row.
#[derive(Debug, Clone, Insertable, AsChangeset, new)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct NewGameRow {
    id: String,
    team_id: String,
    opponent: String,
    is_home_team: bool,
    status: String,
    lineups: String,
    game_state: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewGameRow {
    /// Encodes a game's header, lineups and snapshot.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        let game_state = game.state().map(serde_json::to_string).transpose()?;
        Ok(Self::new(
            game.id().clone(),
            game.team_id().clone(),
            game.opponent().clone(),
            *game.is_home_team(),
            game.status().to_string(),
            serde_json::to_string(game.lineups())?,
            game_state,
            game.created_at().naive_utc(),
            Utc::now().naive_utc(),
        ))
    }
}

/// Stored log entry.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::log_entries)]
pub struct LogEntryRow {
    id: String,
    game_id: String,
    seq: i32,
    payload: String,
    recorded_at: NaiveDateTime,
}

impl LogEntryRow {
    /// Decodes the stored entry.
    #[instrument(skip(self), fields(entry_id = %self.id, seq = self.seq))]
    pub fn decode(&self) -> Result<LogEntry, DbError> {
        serde_json::from_str(&self.payload)
            .map_err(|e| DbError::corrupt_entry(&self.game_id, self.seq, e))
    }
}

/// Insertable log entry.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::log_entries)]
pub struct NewLogEntryRow {
    id: String,
    game_id: String,
    seq: i32,
    payload: String,
    recorded_at: NaiveDateTime,
}

impl NewLogEntryRow {
    /// Encodes a log entry at position `seq`.
    #[instrument(skip(entry), fields(entry_id = %entry.id()))]
    pub fn from_entry(game_id: &str, seq: i32, entry: &LogEntry) -> Result<Self, DbError> {
        Ok(Self::new(
            entry.id().clone(),
            game_id.to_string(),
            seq,
            serde_json::to_string(entry)?,
            entry.timestamp().naive_utc(),
        ))
    }
}

//! Diesel-backed game store.

use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use scorebook_core::{EventLog, Game, GameHeader, GameState, LogEntry};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRow, LogEntryRow, MIGRATIONS, NewGameRow, NewLogEntryRow, schema};
use crate::store::GameStore;

/// Game store backed by a SQLite file.
///
/// Each at-bat commit appends the log entry and replaces the state
/// snapshot inside one transaction.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Creates a store for the database at the given path.
    ///
    /// Use `":memory:"` only for single-connection experiments; every
    /// operation opens a fresh connection.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating SqliteStore");
        Ok(Self { db_path })
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection with foreign keys enforced.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    fn next_seq(conn: &mut SqliteConnection, game_id: &str) -> Result<i32, DbError> {
        let count: i64 = schema::log_entries::table
            .filter(schema::log_entries::game_id.eq(game_id))
            .count()
            .get_result(conn)?;
        i32::try_from(count)
            .map_err(|_| DbError::new(format!("Log for game {} is too long", game_id)))
    }

    fn insert_entry(conn: &mut SqliteConnection, game_id: &str, entry: &LogEntry) -> Result<i32, DbError> {
        let seq = Self::next_seq(conn, game_id)?;
        let row = NewLogEntryRow::from_entry(game_id, seq, entry)?;
        diesel::insert_into(schema::log_entries::table)
            .values(&row)
            .execute(conn)?;
        Ok(seq)
    }

    fn update_game(conn: &mut SqliteConnection, row: &NewGameRow, game_id: &str) -> Result<(), DbError> {
        let updated = diesel::update(schema::games::table.find(game_id))
            .set(row)
            .execute(conn)?;
        if updated == 0 {
            return Err(DbError::game_missing(game_id));
        }
        Ok(())
    }
}

impl GameStore for SqliteStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn create_game(&self, game: &Game) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let row = NewGameRow::from_game(game)?;
        conn.transaction::<_, DbError, _>(|conn| {
            diesel::insert_into(schema::games::table)
                .values(&row)
                .execute(conn)?;
            for entry in game.score_details().at_bats().entries() {
                Self::insert_entry(conn, game.id(), entry)?;
            }
            Ok(())
        })?;
        info!(game_id = %game.id(), "Game created");
        Ok(())
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), status = %game.status()))]
    fn save_game(&self, game: &Game) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let row = NewGameRow::from_game(game)?;
        Self::update_game(&mut conn, &row, game.id())?;
        debug!("Game saved");
        Ok(())
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id()))]
    fn append_entry(&self, game_id: &str, entry: &LogEntry) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let seq = conn.transaction::<_, DbError, _>(|conn| Self::insert_entry(conn, game_id, entry))?;
        debug!(seq, "Log entry appended");
        Ok(())
    }

    #[instrument(skip(self, state))]
    fn replace_game_state(&self, game_id: &str, state: &GameState) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let snapshot = serde_json::to_string(state)?;
        let updated = diesel::update(schema::games::table.find(game_id))
            .set((
                schema::games::game_state.eq(Some(snapshot)),
                schema::games::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DbError::game_missing(game_id));
        }
        debug!("State snapshot replaced");
        Ok(())
    }

    #[instrument(skip(self, game, entry), fields(game_id = %game.id(), entry_id = %entry.id()))]
    fn commit_at_bat(&self, game: &Game, entry: &LogEntry) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let row = NewGameRow::from_game(game)?;
        let seq = conn.transaction::<_, DbError, _>(|conn| {
            let seq = Self::insert_entry(conn, game.id(), entry)?;
            Self::update_game(conn, &row, game.id())?;
            Ok(seq)
        })?;
        info!(seq, "Log entry and snapshot committed");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read_event_log(&self, game_id: &str) -> Result<EventLog, DbError> {
        let mut conn = self.connection()?;
        let rows = schema::log_entries::table
            .filter(schema::log_entries::game_id.eq(game_id))
            .order(schema::log_entries::seq.asc())
            .select(LogEntryRow::as_select())
            .load(&mut conn)?;
        let entries = rows
            .iter()
            .map(LogEntryRow::decode)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "Event log loaded");
        Ok(EventLog::from_entries(entries))
    }

    #[instrument(skip(self))]
    fn load_game(&self, game_id: &str) -> Result<Option<Game>, DbError> {
        let mut conn = self.connection()?;
        let row = schema::games::table
            .find(game_id)
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            debug!("Game not found");
            return Ok(None);
        };
        let log = self.read_event_log(game_id)?;
        let game = Game::restore(row.header()?, row.decode_lineups()?, log, row.decode_state()?);
        debug!(entries = game.score_details().at_bats().len(), "Game loaded");
        Ok(Some(game))
    }

    #[instrument(skip(self))]
    fn list_games(&self) -> Result<Vec<GameHeader>, DbError> {
        let mut conn = self.connection()?;
        let rows = schema::games::table
            .order(schema::games::created_at.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;
        let mut headers = Vec::with_capacity(rows.len());
        for row in &rows {
            match row.header() {
                Ok(header) => headers.push(header),
                Err(e) => warn!(game_id = %row.id(), error = %e, "Skipping unreadable game row"),
            }
        }
        info!(count = headers.len(), "Games listed");
        Ok(headers)
    }
}

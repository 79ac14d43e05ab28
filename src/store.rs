//! Persistence collaborator for games and their event logs.

use scorebook_core::{EventLog, Game, GameHeader, GameId, GameState, LogEntry, Lineups};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use crate::db::DbError;

/// Storage for games, keyed by game id.
///
/// Implementations must make [`GameStore::commit_at_bat`] atomic: either
/// the entry and the new snapshot are both stored or neither is.
pub trait GameStore {
    /// Stores a new game with its lineups, snapshot and any log entries.
    fn create_game(&self, game: &Game) -> Result<(), DbError>;

    /// Overwrites a game's header, lineups and snapshot.
    fn save_game(&self, game: &Game) -> Result<(), DbError>;

    /// Appends one entry to a game's log.
    fn append_entry(&self, game_id: &str, entry: &LogEntry) -> Result<(), DbError>;

    /// Replaces a game's state snapshot.
    fn replace_game_state(&self, game_id: &str, state: &GameState) -> Result<(), DbError>;

    /// Appends an entry and saves the game in one atomic write.
    fn commit_at_bat(&self, game: &Game, entry: &LogEntry) -> Result<(), DbError>;

    /// Reads a game's full log in append order.
    fn read_event_log(&self, game_id: &str) -> Result<EventLog, DbError>;

    /// Loads a game with derived stats recomputed. `None` if unknown.
    fn load_game(&self, game_id: &str) -> Result<Option<Game>, DbError>;

    /// Lists every stored game, oldest first.
    fn list_games(&self) -> Result<Vec<GameHeader>, DbError>;
}

#[derive(Debug, Clone)]
struct StoredGame {
    header: GameHeader,
    lineups: Lineups,
    state: Option<GameState>,
    log: EventLog,
}

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    games: Mutex<HashMap<GameId, StoredGame>>,
    order: Mutex<Vec<GameId>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating InMemoryStore");
        Self::default()
    }

    fn games(&self) -> Result<MutexGuard<'_, HashMap<GameId, StoredGame>>, DbError> {
        self.games
            .lock()
            .map_err(|_| DbError::new("In-memory store lock poisoned"))
    }

    #[track_caller]
    fn not_found(game_id: &str) -> DbError {
        DbError::game_missing(game_id)
    }
}

impl GameStore for InMemoryStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn create_game(&self, game: &Game) -> Result<(), DbError> {
        let mut games = self.games()?;
        if games.contains_key(game.id()) {
            return Err(DbError::new(format!("Game already exists: {}", game.id())));
        }
        games.insert(
            game.id().clone(),
            StoredGame {
                header: game.header(),
                lineups: game.lineups().clone(),
                state: game.state().cloned(),
                log: game.score_details().at_bats().clone(),
            },
        );
        self.order
            .lock()
            .map_err(|_| DbError::new("In-memory store lock poisoned"))?
            .push(game.id().clone());
        debug!("Game stored");
        Ok(())
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn save_game(&self, game: &Game) -> Result<(), DbError> {
        let mut games = self.games()?;
        let stored = games.get_mut(game.id()).ok_or_else(|| Self::not_found(game.id()))?;
        stored.header = game.header();
        stored.lineups = game.lineups().clone();
        stored.state = game.state().cloned();
        Ok(())
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id()))]
    fn append_entry(&self, game_id: &str, entry: &LogEntry) -> Result<(), DbError> {
        let mut games = self.games()?;
        let stored = games.get_mut(game_id).ok_or_else(|| Self::not_found(game_id))?;
        let mut entries = stored.log.entries().to_vec();
        entries.push(entry.clone());
        stored.log = EventLog::from_entries(entries);
        Ok(())
    }

    #[instrument(skip(self, state))]
    fn replace_game_state(&self, game_id: &str, state: &GameState) -> Result<(), DbError> {
        let mut games = self.games()?;
        let stored = games.get_mut(game_id).ok_or_else(|| Self::not_found(game_id))?;
        stored.state = Some(state.clone());
        Ok(())
    }

    #[instrument(skip(self, game, entry), fields(game_id = %game.id(), entry_id = %entry.id()))]
    fn commit_at_bat(&self, game: &Game, entry: &LogEntry) -> Result<(), DbError> {
        // One guard covers both writes.
        let mut games = self.games()?;
        let stored = games.get_mut(game.id()).ok_or_else(|| Self::not_found(game.id()))?;
        let mut entries = stored.log.entries().to_vec();
        entries.push(entry.clone());
        stored.log = EventLog::from_entries(entries);
        stored.header = game.header();
        stored.lineups = game.lineups().clone();
        stored.state = game.state().cloned();
        debug!(entries = stored.log.len(), "At-bat committed");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read_event_log(&self, game_id: &str) -> Result<EventLog, DbError> {
        let games = self.games()?;
        games
            .get(game_id)
            .map(|g| g.log.clone())
            .ok_or_else(|| Self::not_found(game_id))
    }

    #[instrument(skip(self))]
    fn load_game(&self, game_id: &str) -> Result<Option<Game>, DbError> {
        let games = self.games()?;
        Ok(games.get(game_id).map(|stored| {
            Game::restore(
                stored.header.clone(),
                stored.lineups.clone(),
                stored.log.clone(),
                stored.state.clone(),
            )
        }))
    }

    #[instrument(skip(self))]
    fn list_games(&self) -> Result<Vec<GameHeader>, DbError> {
        let games = self.games()?;
        let order = self
            .order
            .lock()
            .map_err(|_| DbError::new("In-memory store lock poisoned"))?;
        Ok(order
            .iter()
            .filter_map(|id| games.get(id).map(|g| g.header.clone()))
            .collect())
    }
}

//! Scorekeeping business logic layer.
//!
//! [`ScorekeeperService`] is the single writer for each game: every
//! mutating call takes that game's lock, loads the authoritative copy,
//! applies the transition and persists the result before releasing.

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use scorebook_core::{
    AtBatInput, BoxScore, CorrectionKind, CountStatus, Direction, EntryStatus, Game, GameEvent,
    GameHeader, GameId, GameSummary, LineupPlayer, Pitch, Recorded, RosterPlayer, ScoringError, Side,
    build_box_score, build_game_summary,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use crate::db::DbError;
use crate::store::GameStore;

/// Failure of a service operation.
#[derive(Debug, Display, From)]
pub enum ServiceError {
    /// The scoring core rejected the operation.
    #[display("{}", _0)]
    #[from]
    Scoring(ScoringError),

    /// The store failed.
    #[display("{}", _0)]
    #[from]
    Db(DbError),

    /// No game with this id.
    #[display("Game not found: {}", _0)]
    NotFound(GameId),

    /// A previous writer panicked while holding the game's lock.
    #[display("Lock poisoned for game {}", _0)]
    LockPoisoned(GameId),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scoring(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::NotFound(_) | Self::LockPoisoned(_) => None,
        }
    }
}

/// Service layer for scorekeeping.
///
/// Wraps a [`GameStore`] with per-game serialization so that a
/// load-transition-commit sequence never interleaves with another writer.
#[derive(Debug)]
pub struct ScorekeeperService<S> {
    store: S,
    locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl<S: GameStore> ScorekeeperService<S> {
    /// Creates a service backed by the given store.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Self {
        info!("Creating ScorekeeperService");
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock_for(&self, game_id: &str) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| ServiceError::LockPoisoned(game_id.to_string()))?;
        Ok(locks.entry(game_id.to_string()).or_default().clone())
    }

    /// Runs `f` against the stored game while holding its lock.
    fn with_game<T>(
        &self,
        game_id: &str,
        f: impl FnOnce(&mut Game) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let lock = self.lock_for(game_id)?;
        let result = match lock.lock() {
            Ok(_guard) => self
                .store
                .load_game(game_id)
                .map_err(ServiceError::from)
                .and_then(|game| game.ok_or_else(|| ServiceError::NotFound(game_id.to_string())))
                .and_then(|mut game| f(&mut game)),
            Err(_) => Err(ServiceError::LockPoisoned(game_id.to_string())),
        };
        self.release(game_id, lock);
        result
    }

    /// Drops the game's lock entry once no other caller holds it.
    fn release(&self, game_id: &str, lock: Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            warn!(game_id, "Lock table poisoned, keeping entry");
            return;
        };
        drop(lock);
        if locks.get(game_id).is_some_and(|held| Arc::strong_count(held) == 1) {
            locks.remove(game_id);
            debug!(game_id, remaining = locks.len(), "Released game lock");
        }
    }

    /// Runs a status or lineup change and saves the game.
    fn update<T>(
        &self,
        game_id: &str,
        f: impl FnOnce(&mut Game) -> Result<T, ScoringError>,
    ) -> Result<(T, Game), ServiceError> {
        self.with_game(game_id, |game| {
            let out = f(game)?;
            self.store.save_game(game)?;
            Ok((out, game.clone()))
        })
    }

    // ── Games ────────────────────────────────────────────────

    /// Creates and stores a scheduled game.
    #[instrument(skip(self))]
    pub fn create_game(&self, team_id: &str, opponent: &str, is_home_team: bool) -> Result<Game, ServiceError> {
        let game = Game::new(team_id, opponent, is_home_team, Utc::now());
        self.store.create_game(&game)?;
        info!(game_id = %game.id(), "Game scheduled");
        Ok(game)
    }

    /// Loads a game.
    #[instrument(skip(self))]
    pub fn game(&self, game_id: &str) -> Result<Game, ServiceError> {
        self.store
            .load_game(game_id)?
            .ok_or_else(|| ServiceError::NotFound(game_id.to_string()))
    }

    /// Lists stored games.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<GameHeader>, ServiceError> {
        Ok(self.store.list_games()?)
    }

    // ── Lineups ──────────────────────────────────────────────

    /// Adds a player to one side's lineup.
    #[instrument(skip(self, player), fields(player_id = %player.player_id))]
    pub fn add_to_lineup(&self, game_id: &str, side: Side, player: LineupPlayer) -> Result<Game, ServiceError> {
        Ok(self.update(game_id, |g| g.add_to_lineup(side, player))?.1)
    }

    /// Adds a tracked roster player to one side's lineup.
    #[instrument(skip(self, player), fields(player_id = %player.id()))]
    pub fn add_roster_player(&self, game_id: &str, side: Side, player: &RosterPlayer) -> Result<Game, ServiceError> {
        self.add_to_lineup(game_id, side, LineupPlayer::from_roster(player))
    }

    /// Removes a player from one side's lineup.
    #[instrument(skip(self))]
    pub fn remove_from_lineup(&self, game_id: &str, side: Side, player_id: &str) -> Result<Game, ServiceError> {
        Ok(self.update(game_id, |g| g.remove_from_lineup(side, player_id))?.1)
    }

    /// Moves a player one slot up or down.
    #[instrument(skip(self))]
    pub fn move_in_lineup(
        &self,
        game_id: &str,
        side: Side,
        player_id: &str,
        direction: Direction,
    ) -> Result<Game, ServiceError> {
        Ok(self.update(game_id, |g| g.move_in_lineup(side, player_id, direction))?.1)
    }

    /// Marks a player active or inactive.
    #[instrument(skip(self))]
    pub fn set_lineup_status(
        &self,
        game_id: &str,
        side: Side,
        player_id: &str,
        status: EntryStatus,
    ) -> Result<Game, ServiceError> {
        Ok(self.update(game_id, |g| g.set_lineup_status(side, player_id, status))?.1)
    }

    // ── Lifecycle ────────────────────────────────────────────

    /// Starts a scheduled game.
    #[instrument(skip(self))]
    pub fn start_game(&self, game_id: &str) -> Result<Vec<GameEvent>, ServiceError> {
        Ok(self.update(game_id, Game::start)?.0)
    }

    /// Ends an in-progress game.
    #[instrument(skip(self))]
    pub fn end_game(&self, game_id: &str) -> Result<Vec<GameEvent>, ServiceError> {
        Ok(self.update(game_id, Game::end)?.0)
    }

    /// Cancels a scheduled or in-progress game.
    #[instrument(skip(self))]
    pub fn cancel_game(&self, game_id: &str) -> Result<Vec<GameEvent>, ServiceError> {
        Ok(self.update(game_id, Game::cancel)?.0)
    }

    // ── Scoring ──────────────────────────────────────────────

    /// Records an at-bat stamped with the current time.
    #[instrument(skip(self, input), fields(result = %input.result))]
    pub fn record_at_bat(&self, game_id: &str, input: AtBatInput) -> Result<Recorded, ServiceError> {
        self.record_at_bat_at(game_id, input, Utc::now())
    }

    /// Records an at-bat with an explicit timestamp.
    ///
    /// The log entry and the new state snapshot are committed together. If
    /// the commit fails nothing is stored and the caller should reload.
    #[instrument(skip(self, input), fields(result = %input.result))]
    pub fn record_at_bat_at(
        &self,
        game_id: &str,
        input: AtBatInput,
        timestamp: DateTime<Utc>,
    ) -> Result<Recorded, ServiceError> {
        self.with_game(game_id, |game| {
            let recorded = game.record_at_bat(input, timestamp)?;
            if let Err(e) = self.store.commit_at_bat(game, &recorded.entry) {
                warn!(error = %e, "Commit failed, at-bat not stored");
                return Err(e.into());
            }
            debug!(events = recorded.events.len(), "At-bat committed");
            Ok(recorded)
        })
    }

    /// Applies one pitch to the live count.
    #[instrument(skip(self))]
    pub fn record_pitch(&self, game_id: &str, pitch: Pitch) -> Result<CountStatus, ServiceError> {
        self.with_game(game_id, |game| {
            let status = game.record_pitch(pitch)?;
            if let Some(state) = game.state() {
                self.store.replace_game_state(game.id(), state)?;
            }
            Ok(status)
        })
    }

    /// Voids or replaces an earlier at-bat.
    #[instrument(skip(self, target, kind), fields(target_id = %target))]
    pub fn correct_at_bat(&self, game_id: &str, target: &str, kind: CorrectionKind) -> Result<Recorded, ServiceError> {
        self.with_game(game_id, |game| {
            let recorded = game.correct_at_bat(target, kind, Utc::now())?;
            self.store.commit_at_bat(game, &recorded.entry)?;
            Ok(recorded)
        })
    }

    // ── Projections ──────────────────────────────────────────

    /// Box score for a game.
    #[instrument(skip(self))]
    pub fn box_score(&self, game_id: &str) -> Result<BoxScore, ServiceError> {
        Ok(build_box_score(&self.game(game_id)?))
    }

    /// Summary for a game.
    #[instrument(skip(self))]
    pub fn summary(&self, game_id: &str) -> Result<GameSummary, ServiceError> {
        Ok(build_game_summary(&self.game(game_id)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::thread;

    fn tracked(service: &ScorekeeperService<InMemoryStore>) -> usize {
        service.locks.lock().map(|locks| locks.len()).unwrap_or(usize::MAX)
    }

    #[test]
    fn test_lock_entries_released_after_each_call() {
        let service = ScorekeeperService::new(InMemoryStore::new());
        let game = service.create_game("tigers", "Bears", true).unwrap();
        service
            .add_to_lineup(game.id(), Side::Home, LineupPlayer::ad_hoc("Ace", None, scorebook_core::Position::Pitcher))
            .unwrap();
        service.start_game(game.id()).unwrap();
        service.record_pitch(game.id(), Pitch::Ball).unwrap();
        assert_eq!(tracked(&service), 0);

        // Failed calls release too
        assert!(service.record_at_bat("missing", AtBatInput::result("single")).is_err());
        assert!(service.record_at_bat(game.id(), AtBatInput::result("bunt")).is_err());
        assert_eq!(tracked(&service), 0);
    }

    #[test]
    fn test_lock_table_empty_after_concurrent_writers() {
        let service = Arc::new(ScorekeeperService::new(InMemoryStore::new()));
        let ids: Vec<GameId> = (0..3)
            .map(|_| service.create_game("tigers", "Bears", false).unwrap().id().clone())
            .collect();
        for id in &ids {
            service.start_game(id).unwrap();
        }

        let handles: Vec<_> = ids
            .iter()
            .flat_map(|id| (0..2).map(move |_| id.clone()))
            .map(|id| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    for _ in 0..5 {
                        service.record_pitch(&id, Pitch::Foul).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracked(&service), 0);
    }
}

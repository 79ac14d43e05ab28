//! The game aggregate root.
//!
//! A [`Game`] owns its lineups, its event log and everything derived from
//! them. Every mutating operation checks the game's status first, applies
//! pure transitions, recomputes derived stats and returns the
//! [`GameEvent`]s the host should publish.

use crate::aggregate::{Aggregate, ErrorsBySide, InningScore, PitchingLine, PlayerGameStats, aggregate};
use crate::error::{InvalidStateError, ScoringError, ValidationError};
use crate::event::{AtBatEvent, AtBatResult, Correction, CorrectionKind, LogEntry, RunnerMove};
use crate::invariants::{GameInvariants, InvariantSet};
use crate::lineup::{Direction, EntryStatus, Lineup, LineupPlayer, Lineups};
use crate::log::EventLog;
use crate::position::Position;
use crate::rules::{CountStatus, Pitch};
use crate::state::{self, GameState};
use crate::types::{EventId, GameId, Half, PlayerId, PlayerRef, Side};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Status
// ─────────────────────────────────────────────────────────────

/// Lifecycle status of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Created, not yet started.
    #[default]
    Scheduled,
    /// Being scored.
    InProgress,
    /// Ended by the scorekeeper. Terminal.
    Completed,
    /// Called off. Terminal.
    Cancelled,
}

impl GameStatus {
    /// Checks whether no further scoring is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

// ─────────────────────────────────────────────────────────────
//  Score and details
// ─────────────────────────────────────────────────────────────

/// Runs for the scorekeeping team and its opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
pub struct Score {
    team: u32,
    opponent: u32,
}

/// Derived scoring detail kept alongside the game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetails {
    inning_scores: Vec<InningScore>,
    player_stats: BTreeMap<PlayerId, PlayerGameStats>,
    pitching: BTreeMap<PlayerId, PitchingLine>,
    errors: ErrorsBySide,
    at_bats: EventLog,
    game_state: Option<GameState>,
}

/// Persisted identity and status of a game, without lineups or log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct GameHeader {
    id: GameId,
    team_id: String,
    opponent: String,
    is_home_team: bool,
    status: GameStatus,
    created_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────
//  Inputs and outputs
// ─────────────────────────────────────────────────────────────

/// What the scorekeeper entered for one at-bat.
///
/// Omitted batter, pitcher and count fields are filled from the live state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtBatInput {
    /// Result label, e.g. `"single"` or `"fieldersChoice"`.
    pub result: String,
    /// Runs batted in.
    #[serde(default)]
    pub rbi: u32,
    /// Errors charged on the play.
    #[serde(default)]
    pub errors: u32,
    /// Balls at the time of the result.
    #[serde(default)]
    pub balls: Option<u8>,
    /// Strikes at the time of the result.
    #[serde(default)]
    pub strikes: Option<u8>,
    /// Fouls during the at-bat.
    #[serde(default)]
    pub fouls: Option<u32>,
    /// Batter, when not the one due up.
    #[serde(default)]
    pub batter: Option<PlayerRef>,
    /// Pitcher, when not the fielding side's current pitcher.
    #[serde(default)]
    pub pitcher: Option<PlayerRef>,
    /// Manual runner overrides.
    #[serde(default)]
    pub advancement: Vec<RunnerMove>,
}

impl AtBatInput {
    /// Input with only a result label.
    pub fn result(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            ..Self::default()
        }
    }

    /// Sets runs batted in.
    pub fn with_rbi(mut self, rbi: u32) -> Self {
        self.rbi = rbi;
        self
    }

    /// Sets errors on the play.
    pub fn with_errors(mut self, errors: u32) -> Self {
        self.errors = errors;
        self
    }

    /// Names the batter explicitly.
    pub fn with_batter(mut self, batter: PlayerRef) -> Self {
        self.batter = Some(batter);
        self
    }

    /// Names the pitcher explicitly.
    pub fn with_pitcher(mut self, pitcher: PlayerRef) -> Self {
        self.pitcher = Some(pitcher);
        self
    }

    /// Adds manual runner overrides.
    pub fn with_advancement(mut self, advancement: Vec<RunnerMove>) -> Self {
        self.advancement = advancement;
        self
    }
}

/// Domain notification emitted by a game operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// Game moved to in-progress.
    GameStarted {
        /// Game id.
        game_id: GameId,
    },
    /// An at-bat was appended to the log.
    AtBatRecorded {
        /// Game id.
        game_id: GameId,
        /// New log entry id.
        event_id: EventId,
        /// Batter.
        player_id: PlayerId,
        /// Recorded result.
        result: AtBatResult,
    },
    /// Runs crossed the plate on a play.
    RunsScored {
        /// Game id.
        game_id: GameId,
        /// Batting side.
        side: Side,
        /// Runners who scored, in order.
        runners: Vec<PlayerId>,
    },
    /// Third out recorded.
    HalfInningEnded {
        /// Game id.
        game_id: GameId,
        /// Inning that half belonged to.
        inning: u32,
        /// Half that ended.
        half: Half,
    },
    /// A correction was appended to the log.
    AtBatCorrected {
        /// Game id.
        game_id: GameId,
        /// Corrected at-bat.
        target: EventId,
        /// Correction entry id.
        correction_id: EventId,
    },
    /// Game marked completed.
    GameEnded {
        /// Game id.
        game_id: GameId,
        /// Final score.
        score: Score,
    },
    /// Game called off.
    GameCancelled {
        /// Game id.
        game_id: GameId,
    },
}

/// Result of a successful log-appending operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    /// Entry appended to the log; the host persists it.
    pub entry: LogEntry,
    /// Notifications for the host to publish.
    pub events: Vec<GameEvent>,
}

// ─────────────────────────────────────────────────────────────
//  Game
// ─────────────────────────────────────────────────────────────

/// Aggregate root for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    id: GameId,
    team_id: String,
    opponent: String,
    is_home_team: bool,
    status: GameStatus,
    score: Score,
    lineups: Lineups,
    score_details: ScoreDetails,
    created_at: DateTime<Utc>,
}

impl Game {
    /// Creates a scheduled game with empty lineups.
    #[instrument(skip(team_id, opponent), fields(team_id = %team_id.as_ref(), opponent = %opponent.as_ref()))]
    pub fn new(team_id: impl AsRef<str>, opponent: impl AsRef<str>, is_home_team: bool, created_at: DateTime<Utc>) -> Self {
        let game = Self {
            id: uuid::Uuid::new_v4().to_string(),
            team_id: team_id.as_ref().to_string(),
            opponent: opponent.as_ref().to_string(),
            is_home_team,
            status: GameStatus::Scheduled,
            score: Score::default(),
            lineups: Lineups::default(),
            score_details: ScoreDetails::default(),
            created_at,
        };
        info!(game_id = %game.id, "Game created");
        game
    }

    /// Rebuilds a game from persisted parts, recomputing derived stats.
    ///
    /// An in-progress game without a stored snapshot has its state rebuilt
    /// by replaying the log.
    #[instrument(skip_all, fields(game_id = %header.id, entries = log.len()))]
    pub fn restore(header: GameHeader, lineups: Lineups, log: EventLog, game_state: Option<GameState>) -> Self {
        let mut game = Self {
            id: header.id,
            team_id: header.team_id,
            opponent: header.opponent,
            is_home_team: header.is_home_team,
            status: header.status,
            score: Score::default(),
            lineups,
            score_details: ScoreDetails {
                at_bats: log,
                game_state,
                ..ScoreDetails::default()
            },
            created_at: header.created_at,
        };
        if game.status == GameStatus::InProgress && game.score_details.game_state.is_none() {
            warn!("Missing state snapshot, replaying log");
            game.rebuild_state();
        }
        game.refresh_derived();
        game
    }

    /// Identity and status, for persistence.
    pub fn header(&self) -> GameHeader {
        GameHeader::new(
            self.id.clone(),
            self.team_id.clone(),
            self.opponent.clone(),
            self.is_home_team,
            self.status,
            self.created_at,
        )
    }

    /// Side the scorekeeping team plays as.
    pub fn team_side(&self) -> Side {
        if self.is_home_team { Side::Home } else { Side::Away }
    }

    /// Live state, present once the game has started.
    pub fn state(&self) -> Option<&GameState> {
        self.score_details.game_state.as_ref()
    }

    /// Effective at-bats (corrections applied).
    pub fn effective_at_bats(&self) -> Vec<AtBatEvent> {
        self.score_details.at_bats.effective_at_bats()
    }

    /// Full aggregate of the effective log.
    pub fn aggregate(&self) -> Aggregate {
        aggregate(&self.effective_at_bats())
    }

    /// Checks the game-level invariants.
    pub fn verify(&self) -> Result<(), ScoringError> {
        GameInvariants::check_all(self).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            ScoringError::InvariantViolation(descriptions)
        })
    }

    #[track_caller]
    fn ensure(&self, allowed: &[GameStatus], operation: &'static str) -> Result<(), ScoringError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            warn!(game_id = %self.id, status = %self.status, operation, "Operation refused");
            Err(InvalidStateError::new(self.id.clone(), self.status, operation).into())
        }
    }

    // ── Lineups ──────────────────────────────────────────────

    /// Appends a player to one side's lineup.
    ///
    /// # Errors
    ///
    /// [`ScoringError::InvalidState`] on a completed or cancelled game;
    /// [`ScoringError::Validation`] for a duplicate or unnamed player.
    #[instrument(skip(self, player), fields(game_id = %self.id, player_id = %player.player_id))]
    pub fn add_to_lineup(&mut self, side: Side, player: LineupPlayer) -> Result<(), ScoringError> {
        self.ensure(&[GameStatus::Scheduled, GameStatus::InProgress], "edit lineup of")?;
        let lineup = self.lineups.get(side).clone().add_player(player)?;
        self.set_lineup(side, lineup);
        Ok(())
    }

    /// Removes a player from one side's lineup and renumbers the rest.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn remove_from_lineup(&mut self, side: Side, player_id: &str) -> Result<(), ScoringError> {
        self.ensure(&[GameStatus::Scheduled, GameStatus::InProgress], "edit lineup of")?;
        let lineup = self.lineups.get(side).clone().remove_player(player_id);
        self.set_lineup(side, lineup);
        Ok(())
    }

    /// Moves a player one slot up or down. A move past either end is a no-op.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn move_in_lineup(&mut self, side: Side, player_id: &str, direction: Direction) -> Result<(), ScoringError> {
        self.ensure(&[GameStatus::Scheduled, GameStatus::InProgress], "edit lineup of")?;
        let lineup = self.lineups.get(side).clone().move_player(player_id, direction);
        self.set_lineup(side, lineup);
        Ok(())
    }

    /// Changes a player's fielding position.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn set_lineup_position(&mut self, side: Side, player_id: &str, position: Position) -> Result<(), ScoringError> {
        self.ensure(&[GameStatus::Scheduled, GameStatus::InProgress], "edit lineup of")?;
        let lineup = self.lineups.get(side).clone().set_position(player_id, position);
        self.set_lineup(side, lineup);
        Ok(())
    }

    /// Marks a player active or inactive in the batting order.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn set_lineup_status(&mut self, side: Side, player_id: &str, status: EntryStatus) -> Result<(), ScoringError> {
        self.ensure(&[GameStatus::Scheduled, GameStatus::InProgress], "edit lineup of")?;
        let lineup = self.lineups.get(side).clone().set_status(player_id, status);
        self.set_lineup(side, lineup);
        Ok(())
    }

    fn set_lineup(&mut self, side: Side, lineup: Lineup) {
        *self.lineups.get_mut(side) = lineup;
        if let Some(state) = &self.score_details.game_state {
            self.score_details.game_state = Some(state.resync(&self.lineups));
        }
    }

    // ── Lifecycle ────────────────────────────────────────────

    /// Starts a scheduled game: top of the first, nobody out.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn start(&mut self) -> Result<Vec<GameEvent>, ScoringError> {
        self.ensure(&[GameStatus::Scheduled], "start")?;
        self.status = GameStatus::InProgress;
        self.score_details.game_state = Some(GameState::start(&self.lineups));
        info!(game_id = %self.id, "Game started");
        Ok(vec![GameEvent::GameStarted {
            game_id: self.id.clone(),
        }])
    }

    /// Ends an in-progress game. The live state is kept as the final snapshot.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn end(&mut self) -> Result<Vec<GameEvent>, ScoringError> {
        self.ensure(&[GameStatus::InProgress], "end")?;
        self.status = GameStatus::Completed;
        info!(game_id = %self.id, team = self.score.team, opponent = self.score.opponent, "Game ended");
        Ok(vec![GameEvent::GameEnded {
            game_id: self.id.clone(),
            score: self.score,
        }])
    }

    /// Cancels a scheduled or in-progress game.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn cancel(&mut self) -> Result<Vec<GameEvent>, ScoringError> {
        self.ensure(&[GameStatus::Scheduled, GameStatus::InProgress], "cancel")?;
        self.status = GameStatus::Cancelled;
        info!(game_id = %self.id, "Game cancelled");
        Ok(vec![GameEvent::GameCancelled {
            game_id: self.id.clone(),
        }])
    }

    // ── Scoring ──────────────────────────────────────────────

    /// Records an at-bat against the live state.
    ///
    /// The batter defaults to the one due up, the pitcher to the fielding
    /// side's current pitcher and the count to the live count.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::InvalidState`] unless the game is in progress.
    /// - [`ScoringError::Validation`] for an unknown result label, a missing
    ///   batter or pitcher, or overrides that do not fit the bases.
    ///
    /// On error the game is unchanged.
    #[instrument(skip(self, input), fields(game_id = %self.id, result = %input.result))]
    pub fn record_at_bat(&mut self, input: AtBatInput, timestamp: DateTime<Utc>) -> Result<Recorded, ScoringError> {
        self.ensure(&[GameStatus::InProgress], "record an at-bat in")?;
        let result = AtBatResult::parse(&input.result)?;
        let current = self.live_state();

        let batter = match input.batter {
            Some(batter) => {
                if current.current_batter_id().as_deref().is_some_and(|due| due != batter.id) {
                    warn!(due = ?current.current_batter_id(), batter = %batter.id, "Batter differs from due-up slot");
                }
                batter
            }
            None => current
                .current_batter_id()
                .as_deref()
                .and_then(|id| self.lineups.find(id))
                .map(|e| e.player_ref())
                .ok_or_else(|| ValidationError::new("No batter due up; name the batter"))?,
        };
        let pitcher = input
            .pitcher
            .or_else(|| current.current_pitcher().cloned())
            .ok_or_else(|| ValidationError::new("No pitcher for the fielding side; name the pitcher"))?;

        let event = AtBatEvent::new(
            self.id.clone(),
            batter,
            pitcher,
            *current.current_inning(),
            current.half(),
            result,
            timestamp,
        )
        .with_count(
            input.balls.unwrap_or(*current.balls()),
            input.strikes.unwrap_or(*current.strikes()),
            input.fouls.unwrap_or(*current.fouls()),
        )
        .with_rbi(input.rbi)
        .with_errors(input.errors)
        .with_advancement(input.advancement);

        let transition = state::record_at_bat(&current, &self.lineups, &event)?;
        self.score_details.at_bats.append_at_bat(event.clone())?;
        self.score_details.game_state = Some(transition.state);
        self.refresh_derived();

        let mut events = vec![GameEvent::AtBatRecorded {
            game_id: self.id.clone(),
            event_id: event.id().clone(),
            player_id: event.player_id().clone(),
            result,
        }];
        if !transition.runs_scored.is_empty() {
            events.push(GameEvent::RunsScored {
                game_id: self.id.clone(),
                side: transition.batting_side,
                runners: transition.runs_scored,
            });
        }
        if transition.half_inning_ended {
            events.push(GameEvent::HalfInningEnded {
                game_id: self.id.clone(),
                inning: *event.inning(),
                half: *event.half(),
            });
        }

        info!(event_id = %event.id(), team = self.score.team, opponent = self.score.opponent, "At-bat recorded");
        Ok(Recorded {
            entry: LogEntry::AtBat(event),
            events,
        })
    }

    /// Applies one pitch to the live count.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn record_pitch(&mut self, pitch: Pitch) -> Result<CountStatus, ScoringError> {
        self.ensure(&[GameStatus::InProgress], "record a pitch in")?;
        let (next, status) = state::record_pitch(&self.live_state(), pitch);
        self.score_details.game_state = Some(next);
        Ok(status)
    }

    /// Voids or replaces an earlier at-bat with a compensating log entry.
    ///
    /// Allowed while in progress and after completion. The live state is
    /// rebuilt by replaying the corrected log, which resets the live count.
    /// A correction that would leave a later at-bat after the third out of
    /// the half it was recorded in is rejected and the game is unchanged.
    #[instrument(skip(self, target, kind), fields(game_id = %self.id, target_id = %target))]
    pub fn correct_at_bat(
        &mut self,
        target: &str,
        kind: CorrectionKind,
        timestamp: DateTime<Utc>,
    ) -> Result<Recorded, ScoringError> {
        self.ensure(&[GameStatus::InProgress, GameStatus::Completed], "correct an at-bat in")?;
        let correction = Correction::new(target, kind, timestamp);
        let mut log = self.score_details.at_bats.clone();
        log.append_correction(correction.clone())?;
        let rebuilt = state::replay_strict(&self.lineups, &log.effective_at_bats())?;
        self.score_details.at_bats = log;
        self.score_details.game_state = Some(rebuilt);
        self.refresh_derived();

        info!(target_id = %target, correction_id = %correction.id(), "At-bat corrected");
        let events = vec![GameEvent::AtBatCorrected {
            game_id: self.id.clone(),
            target: target.to_string(),
            correction_id: correction.id().clone(),
        }];
        Ok(Recorded {
            entry: LogEntry::Correction(correction),
            events,
        })
    }

    fn live_state(&self) -> GameState {
        self.score_details
            .game_state
            .clone()
            .unwrap_or_else(|| GameState::start(&self.lineups))
    }

    fn rebuild_state(&mut self) {
        let effective = self.effective_at_bats();
        self.score_details.game_state = Some(state::replay(&self.lineups, &effective));
    }

    /// Recomputes score, line score and stats from the effective log.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn refresh_derived(&mut self) {
        let agg = self.aggregate();
        let side = self.team_side();
        self.score = Score::new(agg.runs(side), agg.runs(side.opponent()));
        self.score_details.inning_scores = agg.inning_scores(side);
        self.score_details.errors = agg.errors_by_defense;
        self.score_details.player_stats = agg.player_stats;
        self.score_details.pitching = agg.pitching;
        debug!(team = self.score.team, opponent = self.score.opponent, "Derived stats refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_game() -> Game {
        let mut game = Game::new("team-1", "Rivals", true, Utc::now());
        for (side, prefix) in [(Side::Home, "h"), (Side::Away, "a")] {
            for i in 1..=3 {
                let position = if i == 1 { Position::Pitcher } else { Position::Bench };
                let player = LineupPlayer::ad_hoc(format!("{prefix}{i}"), None, position);
                game.add_to_lineup(side, player).unwrap();
            }
        }
        game
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut game = ready_game();
        assert!(game.end().unwrap_err().is_invalid_state());
        game.start().unwrap();
        assert_eq!(game.status, GameStatus::InProgress);
        assert!(game.start().unwrap_err().is_invalid_state());
        game.end().unwrap();
        assert_eq!(game.status, GameStatus::Completed);
        assert!(game.cancel().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_record_requires_in_progress() {
        let mut game = ready_game();
        let err = game.record_at_bat(AtBatInput::result("single"), Utc::now()).unwrap_err();
        assert!(err.is_invalid_state());
        assert!(game.score_details.at_bats.is_empty());
    }

    #[test]
    fn test_unknown_result_leaves_game_unchanged() {
        let mut game = ready_game();
        game.start().unwrap();
        let before = game.clone();
        let err = game.record_at_bat(AtBatInput::result("triple play"), Utc::now()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(game, before);
    }

    #[test]
    fn test_homerun_scores_and_emits_events() {
        let mut game = ready_game();
        game.start().unwrap();
        let recorded = game
            .record_at_bat(AtBatInput::result("homerun").with_rbi(1), Utc::now())
            .unwrap();
        assert_eq!(recorded.events.len(), 2);
        assert!(matches!(recorded.events[1], GameEvent::RunsScored { side: Side::Away, .. }));
        // Team is home, so the away run is the opponent's
        assert_eq!(game.score, Score::new(0, 1));
        assert!(game.verify().is_ok());
    }

    #[test]
    fn test_void_correction_rebuilds_state() {
        let mut game = ready_game();
        game.start().unwrap();
        let recorded = game.record_at_bat(AtBatInput::result("double"), Utc::now()).unwrap();
        let target = recorded.entry.id().clone();
        game.correct_at_bat(&target, CorrectionKind::Void, Utc::now()).unwrap();

        let state = game.state().unwrap();
        assert!(state.bases().is_empty());
        assert_eq!(state.current_batter_id().as_deref(), game.lineups.away.at_order(1).map(|e| e.player_id().as_str()));
        assert!(game.score_details.player_stats.is_empty());
    }

    fn record_all(game: &mut Game, results: &[&str]) -> Vec<String> {
        results
            .iter()
            .map(|result| {
                let recorded = game.record_at_bat(AtBatInput::result(*result), Utc::now()).unwrap();
                recorded.entry.id().clone()
            })
            .collect()
    }

    #[test]
    fn test_voiding_third_out_keeps_later_at_bats_in_their_half() {
        let mut game = ready_game();
        game.start().unwrap();
        let ids = record_all(&mut game, &["strikeout", "strikeout", "strikeout", "single"]);
        let h1 = game.lineups.home.at_order(1).unwrap().player_id().clone();

        game.correct_at_bat(&ids[2], CorrectionKind::Void, Utc::now()).unwrap();

        let state = game.state().unwrap();
        assert_eq!(*state.current_inning(), 1);
        assert_eq!(state.half(), Half::Bottom);
        assert_eq!(*state.outs(), 0);
        assert_eq!(state.bases().first.as_ref(), Some(&h1));
        assert_eq!(state.batting_side(), Side::Home);
        assert!(game.verify().is_ok());
    }

    #[test]
    fn test_correction_overfilling_a_half_is_rejected() {
        let mut game = ready_game();
        game.start().unwrap();
        let ids = record_all(&mut game, &["single", "strikeout", "strikeout", "strikeout", "walk"]);
        let before = game.clone();

        let err = game
            .correct_at_bat(
                &ids[0],
                CorrectionKind::Replace {
                    result: AtBatResult::Strikeout,
                    rbi: 0,
                    errors: 0,
                },
                Utc::now(),
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(game, before);
    }

    #[test]
    fn test_cannot_edit_lineup_after_cancel() {
        let mut game = ready_game();
        game.cancel().unwrap();
        let err = game
            .add_to_lineup(Side::Home, LineupPlayer::ad_hoc("late", None, Position::Bench))
            .unwrap_err();
        assert!(err.is_invalid_state());
    }
}

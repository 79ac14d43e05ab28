//! At-bat events and the other entries of a game's event log.
//!
//! Events are domain facts, not side effects. Once appended to the log
//! they are never mutated; mistakes are fixed by appending a
//! [`Correction`] that voids or replaces an earlier at-bat.

use crate::error::ValidationError;
use crate::types::{Base, EventId, GameId, Half, PlayerId, PlayerRef};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Result
// ─────────────────────────────────────────────────────────────

/// Outcome recorded for an at-bat. Closed set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum AtBatResult {
    /// One-base hit.
    Single,
    /// Two-base hit.
    Double,
    /// Three-base hit.
    Triple,
    /// Four-base hit; the batter always scores.
    Homerun,
    /// Third strike.
    Strikeout,
    /// Base on balls.
    Walk,
    /// Batter hit by a pitch.
    HitByPitch,
    /// Sacrifice: batter out, runners advance one base.
    Sacrifice,
    /// Batter reaches while a forced runner is retired.
    FieldersChoice,
    /// Batter reaches on a fielding error.
    #[serde(rename = "error")]
    #[strum(serialize = "error")]
    ReachedOnError,
    /// Caught fly ball.
    FlyOut,
    /// Ground ball out.
    GroundOut,
    /// Batter retired at first.
    OutAtFirst,
    /// Batter retired at second.
    OutAtSecond,
    /// Batter retired at third.
    OutAtThird,
    /// Batter retired at home.
    OutAtHome,
    /// Foul ball; the at-bat continues.
    Foul,
}

impl AtBatResult {
    /// Parses a result label, rejecting anything outside the closed set.
    #[instrument]
    pub fn parse(label: &str) -> Result<Self, ValidationError> {
        Self::from_str(label.trim())
            .map_err(|_| ValidationError::new(format!("Unknown at-bat result '{}'", label)))
    }

    /// Bases gained by a hit (1-4), `None` for non-hits.
    pub fn hit_bases(self) -> Option<u8> {
        match self {
            Self::Single => Some(1),
            Self::Double => Some(2),
            Self::Triple => Some(3),
            Self::Homerun => Some(4),
            _ => None,
        }
    }

    /// Checks whether this result is a hit.
    pub fn is_hit(self) -> bool {
        self.hit_bases().is_some()
    }

    /// Checks whether this result records an out.
    pub fn is_out(self) -> bool {
        matches!(
            self,
            Self::Strikeout
                | Self::FlyOut
                | Self::GroundOut
                | Self::Sacrifice
                | Self::FieldersChoice
                | Self::OutAtFirst
                | Self::OutAtSecond
                | Self::OutAtThird
                | Self::OutAtHome
        )
    }

    /// Checks whether the batter is the player put out.
    pub fn retires_batter(self) -> bool {
        self.is_out() && self != Self::FieldersChoice
    }

    /// Checks whether the batter is awarded first and runners only move when forced.
    pub fn forces_runners(self) -> bool {
        matches!(
            self,
            Self::Walk | Self::HitByPitch | Self::ReachedOnError | Self::FieldersChoice
        )
    }

    /// Checks whether the result ends the batter's plate appearance.
    pub fn ends_plate_appearance(self) -> bool {
        self != Self::Foul
    }

    /// Checks whether the plate appearance counts as an official at-bat.
    pub fn is_official_at_bat(self) -> bool {
        self.ends_plate_appearance()
            && !matches!(self, Self::Walk | Self::HitByPitch | Self::Sacrifice)
    }
}

// ─────────────────────────────────────────────────────────────
//  Manual advancement
// ─────────────────────────────────────────────────────────────

/// Where a runner starts a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerOrigin {
    /// The batter.
    Batter,
    /// Runner on a base.
    #[serde(untagged)]
    Base(Base),
}

impl RunnerOrigin {
    /// Base number the runner starts from (batter is 0).
    pub fn number(self) -> u8 {
        match self {
            Self::Batter => 0,
            Self::Base(base) => base.number(),
        }
    }
}

/// Where a runner ends a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerDestination {
    /// Crossed the plate.
    Home,
    /// Put out.
    Out,
    /// Safe on a base.
    #[serde(untagged)]
    Base(Base),
}

/// Scorekeeper override for one runner on an exceptional play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct RunnerMove {
    /// Runner's starting point.
    pub from: RunnerOrigin,
    /// Runner's end point.
    pub to: RunnerDestination,
}

// ─────────────────────────────────────────────────────────────
//  At-bat event
// ─────────────────────────────────────────────────────────────

/// One recorded at-bat result. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct AtBatEvent {
    id: EventId,
    game_id: GameId,
    player_id: PlayerId,
    player_name: String,
    inning: u32,
    half: Half,
    pitcher_id: PlayerId,
    pitcher_name: String,
    balls: u8,
    strikes: u8,
    fouls: u32,
    result: AtBatResult,
    rbi: u32,
    errors: u32,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    advancement: Vec<RunnerMove>,
}

impl AtBatEvent {
    /// Creates an event with a fresh id, a 0-0 count and no RBI or errors.
    #[instrument(skip(game_id, batter, pitcher), fields(batter = %batter.id, pitcher = %pitcher.id))]
    pub fn new(
        game_id: impl Into<GameId>,
        batter: PlayerRef,
        pitcher: PlayerRef,
        inning: u32,
        half: Half,
        result: AtBatResult,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            game_id: game_id.into(),
            player_id: batter.id,
            player_name: batter.name,
            inning,
            half,
            pitcher_id: pitcher.id,
            pitcher_name: pitcher.name,
            balls: 0,
            strikes: 0,
            fouls: 0,
            result,
            rbi: 0,
            errors: 0,
            timestamp,
            advancement: Vec::new(),
        }
    }

    /// Sets the count at the time of the result.
    pub fn with_count(mut self, balls: u8, strikes: u8, fouls: u32) -> Self {
        self.balls = balls;
        self.strikes = strikes;
        self.fouls = fouls;
        self
    }

    /// Sets runs batted in.
    pub fn with_rbi(mut self, rbi: u32) -> Self {
        self.rbi = rbi;
        self
    }

    /// Sets errors charged on the play.
    pub fn with_errors(mut self, errors: u32) -> Self {
        self.errors = errors;
        self
    }

    /// Sets manual runner overrides.
    pub fn with_advancement(mut self, advancement: Vec<RunnerMove>) -> Self {
        self.advancement = advancement;
        self
    }

    /// Replaces the event id.
    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the batter as a player reference.
    pub fn batter(&self) -> PlayerRef {
        PlayerRef::new(self.player_id.clone(), self.player_name.clone())
    }

    /// Returns the pitcher as a player reference.
    pub fn pitcher(&self) -> PlayerRef {
        PlayerRef::new(self.pitcher_id.clone(), self.pitcher_name.clone())
    }

    /// Returns a copy with the outcome fields replaced, keeping identity.
    pub(crate) fn amended(&self, result: AtBatResult, rbi: u32, errors: u32) -> Self {
        let mut amended = self.clone();
        amended.result = result;
        amended.rbi = rbi;
        amended.errors = errors;
        amended.advancement.clear();
        amended
    }
}

impl std::fmt::Display for AtBatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}: {} ({}-{})",
            self.half, self.inning, self.player_name, self.result, self.balls, self.strikes
        )
    }
}

// ─────────────────────────────────────────────────────────────
//  Corrections
// ─────────────────────────────────────────────────────────────

/// What a correction does to its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CorrectionKind {
    /// The target at-bat never happened.
    Void,
    /// The target at-bat had a different outcome.
    Replace {
        /// Corrected result.
        result: AtBatResult,
        /// Corrected RBI.
        rbi: u32,
        /// Corrected errors.
        errors: u32,
    },
}

/// Compensating log entry that voids or replaces an earlier at-bat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    id: EventId,
    target: EventId,
    kind: CorrectionKind,
    timestamp: DateTime<Utc>,
}

impl Correction {
    /// Creates a correction with a fresh id.
    #[instrument(skip(target, kind), fields(target_id = %target.as_ref()))]
    pub fn new(target: impl AsRef<str>, kind: CorrectionKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            target: target.as_ref().to_string(),
            kind,
            timestamp,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Log entry
// ─────────────────────────────────────────────────────────────

/// A single entry in a game's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LogEntry {
    /// A recorded at-bat.
    AtBat(AtBatEvent),
    /// A correction of an earlier at-bat.
    Correction(Correction),
}

impl LogEntry {
    /// Id of the entry.
    pub fn id(&self) -> &EventId {
        match self {
            LogEntry::AtBat(event) => event.id(),
            LogEntry::Correction(correction) => correction.id(),
        }
    }

    /// Time the entry was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::AtBat(event) => *event.timestamp(),
            LogEntry::Correction(correction) => *correction.timestamp(),
        }
    }
}

//! Error types for scoring operations.

use crate::game::GameStatus;
use crate::types::{GameId, PlayerId};
use derive_more::{Display, Error, From};
use tracing::instrument;

/// Malformed input: unknown result, missing batter/pitcher, impossible advancement.
#[derive(Debug, Clone, Display, Error)]
#[display("Validation error: {} at {}:{}", message, file, line)]
pub struct ValidationError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ValidationError {
    /// Creates a new validation error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Operation attempted against a game whose status does not allow it.
#[derive(Debug, Clone, Display, Error)]
#[display(
    "Invalid state: cannot {} game {} while {} at {}:{}",
    operation,
    game_id,
    status,
    file,
    line
)]
pub struct InvalidStateError {
    /// Game the operation targeted.
    pub game_id: GameId,
    /// Status the game was in.
    pub status: GameStatus,
    /// Operation that was refused.
    pub operation: &'static str,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl InvalidStateError {
    /// Creates a new invalid-state error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(game_id: GameId, status: GameStatus, operation: &'static str) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            game_id,
            status,
            operation,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The event log references a player who is in neither lineup.
///
/// Reported alongside results rather than returned as a failure: the
/// player's stats are still computed but left out of team groupings.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[display("Consistency error: player {} ({}) is not in either lineup", player_id, player_name)]
pub struct ConsistencyError {
    /// Player missing from the lineups.
    pub player_id: PlayerId,
    /// Name recorded on the player's at-bats.
    pub player_name: String,
}

impl ConsistencyError {
    /// Creates a new consistency report.
    pub fn new(player_id: PlayerId, player_name: String) -> Self {
        Self {
            player_id,
            player_name,
        }
    }
}

/// Failure of a mutating scoring operation.
#[derive(Debug, Clone, Display, From)]
pub enum ScoringError {
    /// Input was rejected; state is unchanged.
    #[display("{}", _0)]
    #[from]
    Validation(ValidationError),

    /// Game status forbids the operation; state is unchanged.
    #[display("{}", _0)]
    #[from]
    InvalidState(InvalidStateError),

    /// A postcondition failed after a transition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl ScoringError {
    /// Shorthand for a [`ValidationError`] at the caller's location.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(message))
    }

    /// Checks whether this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Checks whether this is an invalid-state failure.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl std::error::Error for ScoringError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::InvalidState(e) => Some(e),
            Self::InvariantViolation(_) => None,
        }
    }
}

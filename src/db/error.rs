//! Persistence error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure reading or writing games and their logs, with the location
/// where it was raised.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new database error with caller location tracking.
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

    /// A write targeted a game with no stored row.
    #[track_caller]
    pub fn game_missing(game_id: &str) -> Self {
        Self::new(format!("No stored game with id {}", game_id))
    }

    /// A log row could not be decoded back into an entry.
    #[track_caller]
    pub fn corrupt_entry(game_id: &str, seq: i32, reason: impl std::fmt::Display) -> Self {
        Self::new(format!("Log entry {} of game {} is unreadable: {}", seq, game_id, reason))
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Snapshot JSON is invalid: {}", err))
    }
}

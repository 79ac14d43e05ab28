//! Scorebook core - baseball and softball game scoring
//!
//! Pure scoring logic with no I/O. Everything here is a synchronous
//! transition or projection; the host supplies persistence and
//! serialization of writers.
//!
//! # Architecture
//!
//! - **Event log**: append-only at-bats and corrections per game
//! - **State machine**: count, outs, bases and inning driven by at-bats
//! - **Aggregator**: batting, pitching and line-score stats from the log
//! - **Lineups**: ordered batting order per side
//! - **Projections**: box score and game summary
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use scorebook_core::{AtBatInput, Game, LineupPlayer, Position, Side};
//!
//! let mut game = Game::new("tigers", "Bears", true, Utc::now());
//! game.add_to_lineup(Side::Home, LineupPlayer::ad_hoc("Pat", None, Position::Pitcher))?;
//! game.add_to_lineup(Side::Away, LineupPlayer::ad_hoc("Sam", None, Position::Pitcher))?;
//! game.start()?;
//! game.record_at_bat(AtBatInput::result("single"), Utc::now())?;
//! assert_eq!(game.state().map(|s| *s.outs()), Some(0));
//! # Ok::<(), scorebook_core::ScoringError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod aggregate;
mod contracts;
mod error;
mod event;
mod game;
mod invariants;
mod lineup;
mod log;
mod position;
mod projection;
mod rules;
mod state;
mod types;

// Crate-level exports - Shared types
pub use types::{Base, Bases, BySide, EventId, GameId, Half, PlayerId, PlayerRef, Side};
pub use position::Position;

// Crate-level exports - Errors
pub use error::{ConsistencyError, InvalidStateError, ScoringError, ValidationError};

// Crate-level exports - Event log
pub use event::{
    AtBatEvent, AtBatResult, Correction, CorrectionKind, LogEntry, RunnerDestination, RunnerMove,
    RunnerOrigin,
};
pub use log::EventLog;

// Crate-level exports - Rules and state machine
pub use rules::{
    BALLS_FOR_WALK, CountStatus, OUTS_PER_HALF, Pitch, PlayResult, STRIKES_FOR_OUT, apply_pitch, play,
    play_lenient,
};
pub use state::{GameState, Transition, record_at_bat, record_pitch, replay, replay_strict};

// Crate-level exports - Lineups
pub use lineup::{
    Direction, EntrySource, EntryStatus, Lineup, LineupEntry, LineupPlayer, Lineups, RosterPlayer,
};

// Crate-level exports - Stats
pub use aggregate::{
    Aggregate, ErrorsBySide, InningLine, InningScore, PitchingLine, PlayerGameStats, SideGrouping,
    aggregate, format_ratio,
};

// Crate-level exports - Game aggregate
pub use game::{AtBatInput, Game, GameEvent, GameHeader, GameStatus, Recorded, Score, ScoreDetails};

// Crate-level exports - Projections
pub use projection::{
    BoxLine, BoxScore, BoxTotals, ExtraBaseHitLine, ExtraBaseHits, GameOutcome, GameSummary, Rhe,
    TeamBox, build_box_score, build_game_summary,
};

// Crate-level exports - Contracts and invariants
pub use contracts::{Contract, CountPossible, ParticipantsNamed, RecordAtBatContract, SameHalfInning};
pub use invariants::{
    AtBatsExcludeFreePassesInvariant, BasesDistinctInvariant, CountInRangeInvariant, GameInvariants,
    GameStateInvariants, HitsAddUpInvariant, InningsMatchScoreInvariant, Invariant, InvariantSet,
    InvariantViolation, LineupOrderInvariant, LineupsContiguousInvariant, OutsInRangeInvariant,
};

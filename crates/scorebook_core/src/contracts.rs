//! Contract-based validation for scoring transitions.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P(state, event)} record_at_bat {Q(before, after)}.

use crate::error::{ScoringError, ValidationError};
use crate::event::AtBatEvent;
use crate::invariants::{GameStateInvariants, InvariantSet};
use crate::rules::{BALLS_FOR_WALK, STRIKES_FOR_OUT};
use crate::state::GameState;
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), ScoringError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), ScoringError>;
}

// ─────────────────────────────────────────────────────────────
//  At-bat Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the event names a batter and a pitcher.
pub struct ParticipantsNamed;

impl ParticipantsNamed {
    /// Checks the batter and pitcher ids.
    #[instrument(skip(event))]
    pub fn check(event: &AtBatEvent) -> Result<(), ValidationError> {
        if event.player_id().trim().is_empty() {
            return Err(ValidationError::new("At-bat is missing a batter"));
        }
        if event.pitcher_id().trim().is_empty() {
            return Err(ValidationError::new("At-bat is missing a pitcher"));
        }
        Ok(())
    }
}

/// Precondition: the recorded count is possible (0-3 balls, 0-2 strikes).
pub struct CountPossible;

impl CountPossible {
    /// Checks the recorded count.
    #[instrument(skip(event))]
    pub fn check(event: &AtBatEvent) -> Result<(), ValidationError> {
        if *event.balls() >= BALLS_FOR_WALK || *event.strikes() >= STRIKES_FOR_OUT {
            return Err(ValidationError::new(format!(
                "Impossible count {}-{}",
                event.balls(),
                event.strikes()
            )));
        }
        Ok(())
    }
}

/// Precondition: the event belongs to the half-inning being played.
pub struct SameHalfInning;

impl SameHalfInning {
    /// Checks the event's inning and half against the state.
    #[instrument(skip(state, event))]
    pub fn check(state: &GameState, event: &AtBatEvent) -> Result<(), ValidationError> {
        if *event.inning() != *state.current_inning() || *event.half() != state.half() {
            return Err(ValidationError::new(format!(
                "At-bat for {} {} does not match current {} {}",
                event.half(),
                event.inning(),
                state.half(),
                state.current_inning()
            )));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  At-bat Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for recording an at-bat.
///
/// Preconditions:
/// - Batter and pitcher are named
/// - Count is possible
/// - Event belongs to the current half-inning
///
/// Postconditions:
/// - Outs stay within 0-2
/// - Count stays within range
/// - No runner occupies two bases
pub struct RecordAtBatContract;

impl Contract<GameState, AtBatEvent> for RecordAtBatContract {
    fn pre(state: &GameState, event: &AtBatEvent) -> Result<(), ScoringError> {
        ParticipantsNamed::check(event)?;
        CountPossible::check(event)?;
        SameHalfInning::check(state, event)?;
        Ok(())
    }

    fn post(_before: &GameState, after: &GameState) -> Result<(), ScoringError> {
        GameStateInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            ScoringError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

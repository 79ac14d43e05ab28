//! First-class invariants for scoring state.
//!
//! Invariants are logical properties that must hold after every
//! transition. They are checked by contract postconditions in debug
//! builds and are testable on their own.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        collect(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        collect(violations)
    }
}

pub mod bases_distinct;
pub mod hits_add_up;
pub mod innings_match_score;
pub mod lineup_order;
pub mod outs_in_range;

pub use bases_distinct::BasesDistinctInvariant;
pub use hits_add_up::{AtBatsExcludeFreePassesInvariant, HitsAddUpInvariant};
pub use innings_match_score::{InningsMatchScoreInvariant, LineupsContiguousInvariant};
pub use lineup_order::LineupOrderInvariant;
pub use outs_in_range::{CountInRangeInvariant, OutsInRangeInvariant};

/// Every invariant of the live game state.
pub type GameStateInvariants = (
    OutsInRangeInvariant,
    CountInRangeInvariant,
    BasesDistinctInvariant,
);

/// Every invariant of the game aggregate.
pub type GameInvariants = (InningsMatchScoreInvariant, LineupsContiguousInvariant);

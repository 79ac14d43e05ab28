//! Outs and count invariants: outs stay within 0-2 between plays and the
//! count never shows ball four or strike three.

use super::Invariant;
use crate::rules::{BALLS_FOR_WALK, OUTS_PER_HALF, STRIKES_FOR_OUT};
use crate::state::GameState;

/// Invariant: outs are 0, 1 or 2.
///
/// The third out flips the half in the same transition, so a stored
/// state never shows three.
pub struct OutsInRangeInvariant;

impl Invariant<GameState> for OutsInRangeInvariant {
    fn holds(state: &GameState) -> bool {
        *state.outs() < OUTS_PER_HALF
    }

    fn description() -> &'static str {
        "Outs are always 0, 1 or 2"
    }
}

/// Invariant: balls are 0-3 and strikes are 0-2.
pub struct CountInRangeInvariant;

impl Invariant<GameState> for CountInRangeInvariant {
    fn holds(state: &GameState) -> bool {
        *state.balls() < BALLS_FOR_WALK && *state.strikes() < STRIKES_FOR_OUT
    }

    fn description() -> &'static str {
        "Count stays within 0-3 balls and 0-2 strikes"
    }
}

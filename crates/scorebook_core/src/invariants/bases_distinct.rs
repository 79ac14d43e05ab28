//! Bases invariant: a runner stands on at most one base.

use super::Invariant;
use crate::state::GameState;
use std::collections::HashSet;

/// Invariant: no player occupies two bases at once.
pub struct BasesDistinctInvariant;

impl Invariant<GameState> for BasesDistinctInvariant {
    fn holds(state: &GameState) -> bool {
        let runners = state.bases().runners();
        let distinct: HashSet<_> = runners.iter().map(|(_, id)| *id).collect();
        distinct.len() == runners.len()
    }

    fn description() -> &'static str {
        "A runner occupies at most one base"
    }
}

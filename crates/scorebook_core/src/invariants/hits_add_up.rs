//! Stat line invariants.

use super::Invariant;
use crate::aggregate::PlayerGameStats;

/// Invariant: hits equal singles + doubles + triples + homeruns.
pub struct HitsAddUpInvariant;

impl Invariant<PlayerGameStats> for HitsAddUpInvariant {
    fn holds(stats: &PlayerGameStats) -> bool {
        stats.hits == stats.singles + stats.doubles + stats.triples + stats.homeruns
    }

    fn description() -> &'static str {
        "Hits equal singles + doubles + triples + homeruns"
    }
}

/// Invariant: walks, hit-by-pitches and sacrifices are not official at-bats.
///
/// Every plate appearance is either an official at-bat or one of those
/// three, so their sum must equal the plate appearances.
pub struct AtBatsExcludeFreePassesInvariant;

impl Invariant<PlayerGameStats> for AtBatsExcludeFreePassesInvariant {
    fn holds(stats: &PlayerGameStats) -> bool {
        stats.at_bats + stats.walks + stats.hit_by_pitch + stats.sacrifices
            == stats.plate_appearances
    }

    fn description() -> &'static str {
        "At-bats exclude walks, hit-by-pitches and sacrifices"
    }
}

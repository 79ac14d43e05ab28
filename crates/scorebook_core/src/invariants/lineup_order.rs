//! Lineup invariant: orders are exactly 1..=n.

use super::Invariant;
use crate::lineup::Lineup;

/// Invariant: `order` values form the sequence 1..=n with no gaps or duplicates.
pub struct LineupOrderInvariant;

impl Invariant<Lineup> for LineupOrderInvariant {
    fn holds(lineup: &Lineup) -> bool {
        let mut orders: Vec<u32> = lineup.entries().iter().map(|e| *e.order()).collect();
        orders.sort_unstable();
        orders.iter().enumerate().all(|(i, order)| *order == i as u32 + 1)
    }

    fn description() -> &'static str {
        "Lineup orders are exactly 1..=n"
    }
}

//! Game invariant: the line score adds up to the score.

use super::Invariant;
use crate::game::Game;

/// Invariant: the inning-by-inning runs sum to the game score for both teams.
pub struct InningsMatchScoreInvariant;

impl Invariant<Game> for InningsMatchScoreInvariant {
    fn holds(game: &Game) -> bool {
        let innings = game.score_details().inning_scores();
        let team: u32 = innings.iter().map(|i| i.team).sum();
        let opponent: u32 = innings.iter().map(|i| i.opponent).sum();
        team == *game.score().team() && opponent == *game.score().opponent()
    }

    fn description() -> &'static str {
        "Inning scores sum to the final score"
    }
}

/// Invariant: both lineups keep contiguous batting orders.
pub struct LineupsContiguousInvariant;

impl Invariant<Game> for LineupsContiguousInvariant {
    fn holds(game: &Game) -> bool {
        use super::LineupOrderInvariant;
        LineupOrderInvariant::holds(&game.lineups().home)
            && LineupOrderInvariant::holds(&game.lineups().away)
    }

    fn description() -> &'static str {
        "Both lineups number their entries 1..=n"
    }
}

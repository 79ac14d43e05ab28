//! Read-only views of a game for display.
//!
//! Projections never fail. A game with empty lineups or no at-bats gives
//! zeroed totals and placeholder values.

use crate::aggregate::{InningScore, PitchingLine, PlayerGameStats};
use crate::error::ConsistencyError;
use crate::game::{Game, GameStatus, Score};
use crate::position::Position;
use crate::types::{GameId, PlayerId, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

// ─────────────────────────────────────────────────────────────
//  Box score
// ─────────────────────────────────────────────────────────────

/// One batter's row in the box score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxLine {
    /// Batting order slot.
    pub order: u32,
    /// Player id.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Jersey number, if known.
    pub jersey_number: Option<String>,
    /// Fielding position.
    pub position: Position,
    /// Batting line (zeroed if the player has not batted).
    pub stats: PlayerGameStats,
}

/// Column totals for one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxTotals {
    /// At-bats.
    pub at_bats: u32,
    /// Runs.
    pub runs: u32,
    /// Hits.
    pub hits: u32,
    /// Runs batted in.
    pub rbi: u32,
    /// Walks.
    pub walks: u32,
    /// Strikeouts.
    pub strikeouts: u32,
}

impl BoxTotals {
    fn add(&mut self, stats: &PlayerGameStats) {
        self.at_bats += stats.at_bats;
        self.runs += stats.runs;
        self.hits += stats.hits;
        self.rbi += stats.rbi;
        self.walks += stats.walks;
        self.strikeouts += stats.strikeouts;
    }
}

/// Extra-base hit tally for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraBaseHitLine {
    /// Display name.
    pub name: String,
    /// Doubles.
    pub doubles: u32,
    /// Triples.
    pub triples: u32,
    /// Home runs.
    pub homeruns: u32,
}

/// Extra-base hits for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraBaseHits {
    /// Total doubles.
    pub doubles: u32,
    /// Total triples.
    pub triples: u32,
    /// Total home runs.
    pub homeruns: u32,
    /// Players with at least one extra-base hit, in batting order.
    pub players: Vec<ExtraBaseHitLine>,
}

/// One side of the box score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBox {
    /// Team label.
    pub name: String,
    /// Home or away.
    pub side: Side,
    /// Batting rows in lineup order.
    pub lines: Vec<BoxLine>,
    /// Column totals.
    pub totals: BoxTotals,
    /// Doubles, triples and home runs.
    pub extra_base_hits: ExtraBaseHits,
    /// This side's pitchers.
    pub pitching: Vec<PitchingLine>,
}

/// Full box score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxScore {
    /// Game id.
    pub game_id: GameId,
    /// The scorekeeping team.
    pub team: TeamBox,
    /// The opponent.
    pub opponent: TeamBox,
    /// Runs by inning from the team's point of view.
    pub line_score: Vec<InningScore>,
    /// Players who batted but are in neither lineup.
    pub unassigned: Vec<ConsistencyError>,
}

/// Builds the box score for a game.
///
/// Batting rows come from each side's lineup, so a player who has not
/// batted yet shows a zeroed line. Players in the log but in neither
/// lineup are listed in [`BoxScore::unassigned`] and left out of totals.
#[instrument(skip(game), fields(game_id = %game.id()))]
pub fn build_box_score(game: &Game) -> BoxScore {
    let details = game.score_details();
    let team_side = game.team_side();

    let team_box = |side: Side, name: &str| -> TeamBox {
        let lines: Vec<BoxLine> = game
            .lineups()
            .get(side)
            .entries()
            .iter()
            .map(|entry| BoxLine {
                order: *entry.order(),
                player_id: entry.player_id().clone(),
                name: entry.name().clone(),
                jersey_number: entry.jersey_number().clone(),
                position: *entry.position(),
                stats: details
                    .player_stats()
                    .get(entry.player_id())
                    .cloned()
                    .unwrap_or_else(|| PlayerGameStats::empty(entry.player_id().clone(), entry.name().clone())),
            })
            .collect();

        let mut totals = BoxTotals::default();
        let mut extra_base_hits = ExtraBaseHits::default();
        for line in &lines {
            totals.add(&line.stats);
            let s = &line.stats;
            extra_base_hits.doubles += s.doubles;
            extra_base_hits.triples += s.triples;
            extra_base_hits.homeruns += s.homeruns;
            if s.doubles + s.triples + s.homeruns > 0 {
                extra_base_hits.players.push(ExtraBaseHitLine {
                    name: line.name.clone(),
                    doubles: s.doubles,
                    triples: s.triples,
                    homeruns: s.homeruns,
                });
            }
        }

        let pitching = details
            .pitching()
            .values()
            .filter(|p| p.side == Some(side))
            .cloned()
            .collect();

        TeamBox {
            name: name.to_string(),
            side,
            lines,
            totals,
            extra_base_hits,
            pitching,
        }
    };

    let unassigned = game.aggregate().group_by_side(game.lineups()).unassigned;
    let box_score = BoxScore {
        game_id: game.id().clone(),
        team: team_box(team_side, game.team_id().as_str()),
        opponent: team_box(team_side.opponent(), game.opponent().as_str()),
        line_score: details.inning_scores().clone(),
        unassigned,
    };
    debug!(
        team_rows = box_score.team.lines.len(),
        opponent_rows = box_score.opponent.lines.len(),
        "Box score built"
    );
    box_score
}

// ─────────────────────────────────────────────────────────────
//  Summary
// ─────────────────────────────────────────────────────────────

/// Result from the scorekeeping team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// Team scored more.
    #[strum(to_string = "W")]
    Win,
    /// Opponent scored more.
    #[strum(to_string = "L")]
    Loss,
    /// Equal totals.
    #[strum(to_string = "T")]
    Tie,
}

impl GameOutcome {
    /// Strictly greater wins, equal ties.
    pub fn from_score(score: &Score) -> Self {
        use std::cmp::Ordering;
        match score.team().cmp(score.opponent()) {
            Ordering::Greater => Self::Win,
            Ordering::Less => Self::Loss,
            Ordering::Equal => Self::Tie,
        }
    }
}

/// Runs, hits and errors for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rhe {
    /// Runs.
    pub runs: u32,
    /// Hits.
    pub hits: u32,
    /// Errors committed in the field.
    pub errors: u32,
}

/// One-glance summary of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// Game id.
    pub game_id: GameId,
    /// Team label.
    pub team: String,
    /// Opponent label.
    pub opponent: String,
    /// Whether the team batted last.
    pub is_home_team: bool,
    /// Game status.
    pub status: GameStatus,
    /// Final (or current) score, summed from the line score.
    pub score: Score,
    /// Win, loss or tie.
    pub outcome: GameOutcome,
    /// Team runs, hits and errors.
    pub team_rhe: Rhe,
    /// Opponent runs, hits and errors.
    pub opponent_rhe: Rhe,
    /// Runs by inning from the team's point of view.
    pub inning_scores: Vec<InningScore>,
    /// Seconds between the first and last recorded at-bat.
    pub duration_seconds: Option<i64>,
}

impl GameSummary {
    /// Duration as `h:mm:ss`, or `--` with fewer than one at-bat.
    pub fn duration_display(&self) -> String {
        match self.duration_seconds {
            Some(secs) => {
                let secs = secs.max(0);
                format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
            }
            None => "--".to_string(),
        }
    }
}

/// Builds the game summary.
#[instrument(skip(game), fields(game_id = %game.id()))]
pub fn build_game_summary(game: &Game) -> GameSummary {
    let details = game.score_details();
    let innings = details.inning_scores();
    let score = Score::new(
        innings.iter().map(|i| i.team).sum(),
        innings.iter().map(|i| i.opponent).sum(),
    );

    let team_side = game.team_side();
    let mut hits = [0u32; 2];
    for event in game.effective_at_bats() {
        if event.result().is_hit() {
            let slot = usize::from(event.half().batting_side() != team_side);
            hits[slot] += 1;
        }
    }
    let errors = details.errors();
    let errors_by = |side: Side| match side {
        Side::Home => errors.home,
        Side::Away => errors.away,
    };

    let duration_seconds = details
        .at_bats()
        .time_span()
        .map(|(first, last)| (last - first).num_seconds());

    let summary = GameSummary {
        game_id: game.id().clone(),
        team: game.team_id().clone(),
        opponent: game.opponent().clone(),
        is_home_team: *game.is_home_team(),
        status: *game.status(),
        score,
        outcome: GameOutcome::from_score(&score),
        team_rhe: Rhe {
            runs: *score.team(),
            hits: hits[0],
            errors: errors_by(team_side),
        },
        opponent_rhe: Rhe {
            runs: *score.opponent(),
            hits: hits[1],
            errors: errors_by(team_side.opponent()),
        },
        inning_scores: innings.clone(),
        duration_seconds,
    };
    debug!(outcome = %summary.outcome, "Summary built");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_empty_game_projects_to_zeroes() {
        let game = Game::new("team", "opp", false, Utc::now());
        let box_score = build_box_score(&game);
        assert!(box_score.team.lines.is_empty());
        assert_eq!(box_score.team.totals, BoxTotals::default());
        assert!(box_score.line_score.is_empty());

        let summary = build_game_summary(&game);
        assert_eq!(summary.outcome, GameOutcome::Tie);
        assert_eq!(summary.duration_display(), "--");
        assert_eq!(summary.team_rhe, Rhe::default());
    }

    #[test]
    fn test_outcome_from_score() {
        assert_eq!(GameOutcome::from_score(&Score::new(3, 2)), GameOutcome::Win);
        assert_eq!(GameOutcome::from_score(&Score::new(2, 3)), GameOutcome::Loss);
        assert_eq!(GameOutcome::from_score(&Score::new(4, 4)), GameOutcome::Tie);
    }

    #[test]
    fn test_duration_display() {
        let game = Game::new("team", "opp", false, Utc::now());
        let mut summary = build_game_summary(&game);
        summary.duration_seconds = Some(5025);
        assert_eq!(summary.duration_display(), "1:23:45");
    }
}

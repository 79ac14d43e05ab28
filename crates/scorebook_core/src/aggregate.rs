//! Derived statistics.
//!
//! [`aggregate`] folds an at-bat sequence into per-player batting lines,
//! per-pitcher lines and an inning-by-inning line score. It is a pure
//! function: the same events always give the same output.

use crate::error::ConsistencyError;
use crate::event::{AtBatEvent, AtBatResult};
use crate::lineup::Lineups;
use crate::rules::{self, OUTS_PER_HALF};
use crate::types::{Bases, Half, PlayerId, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Ratios
// ─────────────────────────────────────────────────────────────

/// Formats a rate stat to three decimals in scorebook style.
///
/// A zero denominator gives `.000`; values of one or more keep the
/// leading digit (`1.000`).
pub fn format_ratio(numerator: u32, denominator: u32) -> String {
    if denominator == 0 {
        return ".000".to_string();
    }
    let thousandths = (u64::from(numerator) * 1000 + u64::from(denominator) / 2) / u64::from(denominator);
    if thousandths >= 1000 {
        format!("{}.{:03}", thousandths / 1000, thousandths % 1000)
    } else {
        format!(".{:03}", thousandths)
    }
}

// ─────────────────────────────────────────────────────────────
//  Player batting line
// ─────────────────────────────────────────────────────────────

/// Batting line for one player in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameStats {
    /// Player id.
    pub player_id: PlayerId,
    /// Name as recorded on the player's at-bats.
    pub player_name: String,
    /// Completed plate appearances.
    pub plate_appearances: u32,
    /// Official at-bats (excludes walks, hit-by-pitches, sacrifices).
    pub at_bats: u32,
    /// Hits of any kind.
    pub hits: u32,
    /// One-base hits.
    pub singles: u32,
    /// Two-base hits.
    pub doubles: u32,
    /// Three-base hits.
    pub triples: u32,
    /// Home runs.
    pub homeruns: u32,
    /// Times the player crossed the plate.
    pub runs: u32,
    /// Runs batted in.
    pub rbi: u32,
    /// Bases on balls.
    pub walks: u32,
    /// Times hit by a pitch.
    pub hit_by_pitch: u32,
    /// Sacrifices.
    pub sacrifices: u32,
    /// Strikeouts.
    pub strikeouts: u32,
    /// Errors recorded on the player's at-bats.
    pub errors: u32,
}

impl PlayerGameStats {
    /// Zeroed line for a player.
    pub fn empty(player_id: impl Into<PlayerId>, player_name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            ..Self::default()
        }
    }

    fn count(&mut self, event: &AtBatEvent) {
        let result = *event.result();
        self.rbi += event.rbi();
        self.errors += event.errors();
        if !result.ends_plate_appearance() {
            return;
        }
        self.plate_appearances += 1;
        if result.is_official_at_bat() {
            self.at_bats += 1;
        }
        match result {
            AtBatResult::Single => self.singles += 1,
            AtBatResult::Double => self.doubles += 1,
            AtBatResult::Triple => self.triples += 1,
            AtBatResult::Homerun => self.homeruns += 1,
            AtBatResult::Walk => self.walks += 1,
            AtBatResult::HitByPitch => self.hit_by_pitch += 1,
            AtBatResult::Sacrifice => self.sacrifices += 1,
            AtBatResult::Strikeout => self.strikeouts += 1,
            _ => {}
        }
        if result.is_hit() {
            self.hits += 1;
        }
    }

    /// Total bases from hits.
    pub fn total_bases(&self) -> u32 {
        self.singles + 2 * self.doubles + 3 * self.triples + 4 * self.homeruns
    }

    /// Batting average (`.000` with no at-bats).
    pub fn batting_average(&self) -> String {
        format_ratio(self.hits, self.at_bats)
    }

    /// On-base percentage: (H + BB + HBP) / (AB + BB + HBP + SAC).
    pub fn on_base_percentage(&self) -> String {
        format_ratio(
            self.hits + self.walks + self.hit_by_pitch,
            self.at_bats + self.walks + self.hit_by_pitch + self.sacrifices,
        )
    }

    /// Slugging percentage: total bases / at-bats.
    pub fn slugging(&self) -> String {
        format_ratio(self.total_bases(), self.at_bats)
    }
}

// ─────────────────────────────────────────────────────────────
//  Pitching line
// ─────────────────────────────────────────────────────────────

/// Pitching line for one pitcher in one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingLine {
    /// Pitcher id.
    pub pitcher_id: PlayerId,
    /// Name as recorded on the at-bats.
    pub pitcher_name: String,
    /// Side the pitcher fielded for.
    pub side: Option<Side>,
    /// Completed plate appearances against.
    pub batters_faced: u32,
    /// Outs recorded while pitching.
    pub outs_recorded: u32,
    /// Hits allowed.
    pub hits: u32,
    /// Runs allowed.
    pub runs: u32,
    /// Walks allowed.
    pub walks: u32,
    /// Strikeouts.
    pub strikeouts: u32,
}

impl PitchingLine {
    /// Innings pitched in scorebook notation ("5.2" is five and two thirds).
    pub fn innings_pitched(&self) -> String {
        let outs = self.outs_recorded;
        let per = u32::from(OUTS_PER_HALF);
        format!("{}.{}", outs / per, outs % per)
    }
}

// ─────────────────────────────────────────────────────────────
//  Line score
// ─────────────────────────────────────────────────────────────

/// Runs by each side in one inning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningLine {
    /// Inning number (1-based).
    pub inning: u32,
    /// Runs by the visiting side (top half).
    pub away: u32,
    /// Runs by the home side (bottom half).
    pub home: u32,
}

impl InningLine {
    /// Runs by `side`.
    pub fn runs(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// Runs per inning from one team's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningScore {
    /// Inning number (1-based).
    pub inning: u32,
    /// Runs by the scorekeeping team.
    pub team: u32,
    /// Runs by the opponent.
    pub opponent: u32,
}

// ─────────────────────────────────────────────────────────────
//  Aggregate
// ─────────────────────────────────────────────────────────────

/// Everything derived from an at-bat sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// Batting lines keyed by player id.
    pub player_stats: BTreeMap<PlayerId, PlayerGameStats>,
    /// Pitching lines keyed by pitcher id.
    pub pitching: BTreeMap<PlayerId, PitchingLine>,
    /// Line score, one entry per inning from the first to the last played.
    pub inning_lines: Vec<InningLine>,
    /// Errors charged against each side's defense.
    pub errors_by_defense: ErrorsBySide,
}

/// Fielding errors committed by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorsBySide {
    /// Errors by the home defense.
    pub home: u32,
    /// Errors by the visiting defense.
    pub away: u32,
}

/// Stats split by lineup membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideGrouping {
    /// Home lineup in batting order (zeroed lines for players yet to bat).
    pub home: Vec<PlayerGameStats>,
    /// Away lineup in batting order.
    pub away: Vec<PlayerGameStats>,
    /// Players in the log who are in neither lineup.
    pub unassigned: Vec<ConsistencyError>,
}

impl Aggregate {
    /// Total runs by `side`.
    pub fn runs(&self, side: Side) -> u32 {
        self.inning_lines.iter().map(|l| l.runs(side)).sum()
    }

    /// Line score from the scorekeeping team's point of view.
    pub fn inning_scores(&self, team_side: Side) -> Vec<InningScore> {
        self.inning_lines
            .iter()
            .map(|l| InningScore {
                inning: l.inning,
                team: l.runs(team_side),
                opponent: l.runs(team_side.opponent()),
            })
            .collect()
    }

    /// Splits batting lines by lineup.
    ///
    /// Players who batted but appear in neither lineup keep their stats in
    /// [`Aggregate::player_stats`] and are reported as [`ConsistencyError`]s
    /// instead of being counted toward either side.
    #[instrument(skip(self, lineups))]
    pub fn group_by_side(&self, lineups: &Lineups) -> SideGrouping {
        let side_lines = |side: Side| -> Vec<PlayerGameStats> {
            lineups
                .get(side)
                .entries()
                .iter()
                .map(|entry| {
                    self.player_stats
                        .get(entry.player_id())
                        .cloned()
                        .unwrap_or_else(|| PlayerGameStats::empty(entry.player_id().clone(), entry.name().clone()))
                })
                .collect()
        };

        let unassigned: Vec<ConsistencyError> = self
            .player_stats
            .values()
            .filter(|s| lineups.side_of(&s.player_id).is_none())
            .map(|s| ConsistencyError::new(s.player_id.clone(), s.player_name.clone()))
            .collect();
        for issue in &unassigned {
            warn!(player_id = %issue.player_id, "Excluding player outside both lineups from team totals");
        }

        SideGrouping {
            home: side_lines(Side::Home),
            away: side_lines(Side::Away),
            unassigned,
        }
    }
}

/// Derives batting lines, pitching lines and the line score from at-bats.
///
/// Events are replayed half-inning by half-inning (keyed by each event's
/// recorded inning and half) with the same advancement rules the live
/// state machine uses, so runs are credited to the runners who scored.
#[instrument(skip(events), fields(count = events.len()))]
pub fn aggregate(events: &[AtBatEvent]) -> Aggregate {
    let mut out = Aggregate::default();
    let mut current: Option<(u32, Half)> = None;
    let mut bases = Bases::empty();
    let mut outs: u8 = 0;
    let mut max_inning = 0;

    for event in events {
        let key = (*event.inning(), *event.half());
        if current != Some(key) {
            current = Some(key);
            bases = Bases::empty();
            outs = 0;
        }
        max_inning = max_inning.max(*event.inning());
        let batting = event.half().batting_side();
        let result = *event.result();

        out.player_stats
            .entry(event.player_id().clone())
            .or_insert_with(|| PlayerGameStats::empty(event.player_id().clone(), event.player_name().clone()))
            .count(event);

        match batting.opponent() {
            Side::Home => out.errors_by_defense.home += event.errors(),
            Side::Away => out.errors_by_defense.away += event.errors(),
        }

        if !result.ends_plate_appearance() {
            continue;
        }

        if outs >= OUTS_PER_HALF {
            // Log kept going after three outs in this half; treat as a fresh frame.
            debug!(inning = key.0, half = %key.1, "Extra at-bat after third out");
            outs = 0;
            bases = Bases::empty();
        }

        let play = rules::play_lenient(outs, &bases, event);

        for runner in &play.runs {
            out.player_stats
                .entry(runner.clone())
                .or_insert_with(|| PlayerGameStats::empty(runner.clone(), runner.clone()))
                .runs += 1;
        }

        let line = inning_line(&mut out.inning_lines, *event.inning());
        match batting {
            Side::Home => line.home += play.runs.len() as u32,
            Side::Away => line.away += play.runs.len() as u32,
        }

        let pitching = out
            .pitching
            .entry(event.pitcher_id().clone())
            .or_insert_with(|| PitchingLine {
                pitcher_id: event.pitcher_id().clone(),
                pitcher_name: event.pitcher_name().clone(),
                side: Some(batting.opponent()),
                ..PitchingLine::default()
            });
        pitching.batters_faced += 1;
        pitching.outs_recorded += u32::from(play.outs_recorded);
        pitching.runs += play.runs.len() as u32;
        if result.is_hit() {
            pitching.hits += 1;
        }
        match result {
            AtBatResult::Walk => pitching.walks += 1,
            AtBatResult::Strikeout => pitching.strikeouts += 1,
            _ => {}
        }

        outs = play.outs;
        bases = play.bases;
    }

    // Fill innings with no scoring so the line score has no holes.
    for inning in 1..=max_inning {
        inning_line(&mut out.inning_lines, inning);
    }
    out.inning_lines.sort_by_key(|l| l.inning);

    debug!(
        players = out.player_stats.len(),
        innings = out.inning_lines.len(),
        "Aggregated event log"
    );
    out
}

fn inning_line(lines: &mut Vec<InningLine>, inning: u32) -> &mut InningLine {
    let index = match lines.iter().position(|l| l.inning == inning) {
        Some(index) => index,
        None => {
            lines.push(InningLine {
                inning,
                ..InningLine::default()
            });
            lines.len() - 1
        }
    };
    &mut lines[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(0, 0), ".000");
        assert_eq!(format_ratio(1, 4), ".250");
        assert_eq!(format_ratio(1, 3), ".333");
        assert_eq!(format_ratio(2, 3), ".667");
        assert_eq!(format_ratio(3, 3), "1.000");
        assert_eq!(format_ratio(7, 2), "3.500");
    }

    #[test]
    fn test_innings_pitched_notation() {
        let line = PitchingLine {
            outs_recorded: 17,
            ..PitchingLine::default()
        };
        assert_eq!(line.innings_pitched(), "5.2");
    }

    #[test]
    fn test_empty_log_aggregates_to_nothing() {
        let agg = aggregate(&[]);
        assert!(agg.player_stats.is_empty());
        assert!(agg.inning_lines.is_empty());
        assert_eq!(agg.runs(Side::Home), 0);
    }
}

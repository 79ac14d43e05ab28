//! Plain-text rendering of box scores and summaries.

use scorebook_core::{BoxScore, GameHeader, GameSummary, InningScore, TeamBox};
use std::fmt::Write;
use tracing::instrument;

/// Text layout options.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct RenderOptions {
    /// Minimum innings shown in the line score; extra innings widen it.
    pub scheduled_innings: u32,
    /// Label for the scorekeeping team instead of its id.
    pub team_name: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(9, None)
    }
}

impl RenderOptions {
    fn team_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.team_name.as_deref().unwrap_or(fallback)
    }
}

/// Line score padded to the scheduled innings. Unplayed innings show `-`.
fn line_score(out: &mut String, innings: &[InningScore], team: &str, opponent: &str, options: &RenderOptions, team_first: bool) {
    let played = innings.iter().map(|i| i.inning).max().unwrap_or(0);
    let width = played.max(options.scheduled_innings);
    let runs_for = |i: &InningScore, for_team: bool| if for_team { i.team } else { i.opponent };

    let _ = write!(out, "{:<16}", "");
    for inning in 1..=width {
        let _ = write!(out, "{:>3}", inning);
    }
    let _ = writeln!(out, "{:>5}", "R");

    let rows = if team_first { [(team, true), (opponent, false)] } else { [(opponent, false), (team, true)] };
    for (label, for_team) in rows {
        let _ = write!(out, "{:<16}", truncate(label, 15));
        for inning in 1..=width {
            let _ = match innings.iter().find(|i| i.inning == inning) {
                Some(score) => write!(out, "{:>3}", runs_for(score, for_team)),
                None => write!(out, "{:>3}", "-"),
            };
        }
        let total: u32 = innings.iter().map(|i| runs_for(i, for_team)).sum();
        let _ = writeln!(out, "{:>5}", total);
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn batting_table(out: &mut String, team: &TeamBox, label: &str) {
    let _ = writeln!(out, "{} ({})", label, team.side);
    let _ = writeln!(
        out,
        "{:>2} {:<20} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>6}",
        "#", "Batter", "POS", "AB", "R", "H", "RBI", "BB", "SO", "AVG"
    );
    for line in &team.lines {
        let s = &line.stats;
        let _ = writeln!(
            out,
            "{:>2} {:<20} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>6}",
            line.order,
            truncate(&line.name, 20),
            line.position,
            s.at_bats,
            s.runs,
            s.hits,
            s.rbi,
            s.walks,
            s.strikeouts,
            s.batting_average()
        );
    }
    let t = &team.totals;
    let _ = writeln!(
        out,
        "{:>2} {:<20} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3}",
        "", "Totals", "", t.at_bats, t.runs, t.hits, t.rbi, t.walks, t.strikeouts
    );

    let xbh = &team.extra_base_hits;
    let tally = |pick: fn(&scorebook_core::ExtraBaseHitLine) -> u32| -> String {
        xbh.players
            .iter()
            .filter(|p| pick(p) > 0)
            .map(|p| if pick(p) > 1 { format!("{} {}", p.name, pick(p)) } else { p.name.clone() })
            .collect::<Vec<_>>()
            .join(", ")
    };
    if xbh.doubles > 0 {
        let _ = writeln!(out, "2B: {}", tally(|p| p.doubles));
    }
    if xbh.triples > 0 {
        let _ = writeln!(out, "3B: {}", tally(|p| p.triples));
    }
    if xbh.homeruns > 0 {
        let _ = writeln!(out, "HR: {}", tally(|p| p.homeruns));
    }

    if !team.pitching.is_empty() {
        let _ = writeln!(out, "{:<23} {:>4} {:>3} {:>3} {:>3} {:>3}", "Pitcher", "IP", "H", "R", "BB", "SO");
        for p in &team.pitching {
            let _ = writeln!(
                out,
                "{:<23} {:>4} {:>3} {:>3} {:>3} {:>3}",
                truncate(&p.pitcher_name, 23),
                p.innings_pitched(),
                p.hits,
                p.runs,
                p.walks,
                p.strikeouts
            );
        }
    }
}

/// Renders a box score.
#[instrument(skip(box_score, options), fields(game_id = %box_score.game_id))]
pub fn render_box_score(box_score: &BoxScore, options: &RenderOptions) -> String {
    let mut out = String::new();
    let team = options.team_label(&box_score.team.name);
    let opponent = box_score.opponent.name.as_str();
    let team_first = box_score.team.side == scorebook_core::Side::Away;

    line_score(&mut out, &box_score.line_score, team, opponent, options, team_first);
    let _ = writeln!(out);

    let (first, first_label, second, second_label) = if team_first {
        (&box_score.team, team, &box_score.opponent, opponent)
    } else {
        (&box_score.opponent, opponent, &box_score.team, team)
    };
    batting_table(&mut out, first, first_label);
    let _ = writeln!(out);
    batting_table(&mut out, second, second_label);

    if !box_score.unassigned.is_empty() {
        let _ = writeln!(out);
        for issue in &box_score.unassigned {
            let _ = writeln!(out, "Note: {} batted but is in neither lineup", issue.player_name);
        }
    }
    out
}

/// Renders a one-glance summary.
#[instrument(skip(summary, options), fields(game_id = %summary.game_id))]
pub fn render_summary(summary: &GameSummary, options: &RenderOptions) -> String {
    let mut out = String::new();
    let team = options.team_label(&summary.team);
    let venue = if summary.is_home_team { "vs" } else { "at" };
    let _ = writeln!(
        out,
        "{} {} {} {}-{} ({}, {})",
        summary.outcome,
        venue,
        summary.opponent,
        summary.score.team(),
        summary.score.opponent(),
        summary.status,
        summary.duration_display()
    );
    let _ = writeln!(out);
    line_score(&mut out, &summary.inning_scores, team, &summary.opponent, options, !summary.is_home_team);
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<16}{:>3}{:>3}{:>3}", "", "R", "H", "E");
    for (label, rhe) in [(team, &summary.team_rhe), (summary.opponent.as_str(), &summary.opponent_rhe)] {
        let _ = writeln!(out, "{:<16}{:>3}{:>3}{:>3}", truncate(label, 15), rhe.runs, rhe.hits, rhe.errors);
    }
    out
}

/// Renders a list of games.
#[instrument(skip(games), fields(count = games.len()))]
pub fn render_game_list(games: &[GameHeader]) -> String {
    let mut out = String::new();
    if games.is_empty() {
        let _ = writeln!(out, "No games.");
        return out;
    }
    for game in games {
        let venue = if *game.is_home_team() { "vs" } else { "at" };
        let _ = writeln!(
            out,
            "{}  {}  {} {} {}  [{}]",
            game.id(),
            game.created_at().format("%Y-%m-%d"),
            game.team_id(),
            venue,
            game.opponent(),
            game.status()
        );
    }
    out
}

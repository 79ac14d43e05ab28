//! Tests for box score and summary projections.

use chrono::{DateTime, Duration, TimeZone, Utc};
use scorebook_core::{
    AtBatInput, Base, EntrySource, Game, GameInvariants, GameOutcome, GameStatus, InvariantSet, LineupPlayer,
    Position, RunnerDestination, RunnerMove, RunnerOrigin, Score, Side, build_box_score, build_game_summary,
};

fn first_pitch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 2, 18, 0, 0).single().expect("Valid time")
}

fn player(id: &str, position: Position) -> LineupPlayer {
    LineupPlayer {
        player_id: id.to_string(),
        source: EntrySource::Roster,
        name: id.to_uppercase(),
        jersey_number: Some(id[1..].to_string()),
        position,
    }
}

/// Home team game with nine-player lineups; `h1` and `a1` pitch.
fn game() -> Game {
    let mut game = Game::new("tigers", "Bears", true, first_pitch());
    for (side, prefix) in [(Side::Home, "h"), (Side::Away, "a")] {
        for i in 1..=9 {
            let position = if i == 1 { Position::Pitcher } else { Position::Bench };
            game.add_to_lineup(side, player(&format!("{prefix}{i}"), position))
                .expect("Add failed");
        }
    }
    game.start().expect("Start failed");
    game
}

/// Bears score two in the top of the first, Tigers one in the bottom.
fn one_inning() -> Game {
    let mut game = game();
    let plays = [
        AtBatInput::result("single"),
        AtBatInput::result("homerun").with_rbi(2),
        AtBatInput::result("strikeout"),
        AtBatInput::result("strikeout"),
        AtBatInput::result("strikeout"),
        AtBatInput::result("double"),
        AtBatInput::result("triple").with_rbi(1),
        AtBatInput::result("flyOut"),
        AtBatInput::result("groundOut"),
        AtBatInput::result("strikeout"),
    ];
    for (i, input) in plays.into_iter().enumerate() {
        game.record_at_bat(input, first_pitch() + Duration::minutes(i as i64))
            .expect("At-bat rejected");
    }
    game
}

#[test]
fn test_box_score_totals() {
    let game = one_inning();
    let box_score = build_box_score(&game);

    assert_eq!(box_score.team.side, Side::Home);
    assert_eq!(box_score.team.lines.len(), 9);
    let team = box_score.team.totals;
    assert_eq!(
        (team.at_bats, team.runs, team.hits, team.rbi, team.strikeouts),
        (5, 1, 2, 1, 1)
    );

    let opponent = box_score.opponent.totals;
    assert_eq!(
        (opponent.at_bats, opponent.runs, opponent.hits, opponent.rbi, opponent.strikeouts),
        (5, 2, 2, 2, 3)
    );
    assert!(box_score.unassigned.is_empty());
}

#[test]
fn test_box_score_rows_follow_lineup() {
    let game = one_inning();
    let box_score = build_box_score(&game);
    let orders: Vec<u32> = box_score.team.lines.iter().map(|l| l.order).collect();
    assert_eq!(orders, (1..=9).collect::<Vec<_>>());

    // Players yet to bat still get a zeroed row
    let h9 = &box_score.team.lines[8];
    assert_eq!(h9.player_id, "h9");
    assert_eq!(h9.stats.plate_appearances, 0);
    assert_eq!(h9.jersey_number.as_deref(), Some("9"));
}

#[test]
fn test_extra_base_hits_by_side() {
    let box_score = build_box_score(&one_inning());
    let team = &box_score.team.extra_base_hits;
    assert_eq!((team.doubles, team.triples, team.homeruns), (1, 1, 0));
    assert_eq!(team.players.len(), 2);
    assert_eq!(team.players[0].name, "H1");

    let opponent = &box_score.opponent.extra_base_hits;
    assert_eq!(opponent.homeruns, 1);
    assert_eq!(opponent.players.len(), 1);
}

#[test]
fn test_pitching_lines_by_side() {
    let box_score = build_box_score(&one_inning());
    let pitching = &box_score.team.pitching;
    assert_eq!(pitching.len(), 1);
    let h1 = &pitching[0];
    assert_eq!(h1.pitcher_id, "h1");
    assert_eq!((h1.batters_faced, h1.outs_recorded, h1.hits, h1.runs, h1.strikeouts), (5, 3, 2, 2, 3));
    assert_eq!(h1.innings_pitched(), "1.0");

    assert_eq!(box_score.opponent.pitching[0].pitcher_id, "a1");
}

#[test]
fn test_line_score_from_team_view() {
    let box_score = build_box_score(&one_inning());
    assert_eq!(box_score.line_score.len(), 1);
    assert_eq!(box_score.line_score[0].team, 1);
    assert_eq!(box_score.line_score[0].opponent, 2);
}

#[test]
fn test_summary() {
    let mut game = one_inning();
    game.end().expect("End failed");
    let summary = build_game_summary(&game);

    assert_eq!(summary.status, GameStatus::Completed);
    assert_eq!(summary.score, Score::new(1, 2));
    assert_eq!(summary.outcome, GameOutcome::Loss);
    assert_eq!(summary.outcome.to_string(), "L");
    assert_eq!((summary.team_rhe.runs, summary.team_rhe.hits, summary.team_rhe.errors), (1, 2, 0));
    assert_eq!((summary.opponent_rhe.runs, summary.opponent_rhe.hits), (2, 2));
    assert_eq!(summary.duration_seconds, Some(540));
    assert_eq!(summary.duration_display(), "0:09:00");
}

#[test]
fn test_summary_of_empty_game() {
    let game = game();
    let summary = build_game_summary(&game);
    assert_eq!(summary.score, Score::new(0, 0));
    assert_eq!(summary.outcome, GameOutcome::Tie);
    assert!(summary.inning_scores.is_empty());
    assert_eq!(summary.duration_display(), "--");
}

#[test]
fn test_game_invariants_hold_after_scoring() {
    let game = one_inning();
    assert!(GameInvariants::check_all(&game).is_ok());
    assert!(game.verify().is_ok());
}

#[test]
fn test_error_counts_toward_fielding_side() {
    let mut game = game();
    game.record_at_bat(AtBatInput::result("error").with_errors(1), first_pitch())
        .expect("At-bat rejected");
    let summary = build_game_summary(&game);
    // Visitors batted, so the error is on the home (team) defense
    assert_eq!(summary.team_rhe.errors, 1);
    assert_eq!(summary.opponent_rhe.errors, 0);
    assert_eq!(summary.team_rhe.hits + summary.opponent_rhe.hits, 0);
}

#[test]
fn test_run_before_non_force_third_out_is_on_the_scoreboard() {
    let mut game = game();
    let plays = [
        AtBatInput::result("triple"),
        AtBatInput::result("strikeout"),
        AtBatInput::result("strikeout"),
        AtBatInput::result("walk"),
        AtBatInput::result("single")
            .with_rbi(1)
            .with_advancement(vec![RunnerMove::new(RunnerOrigin::Base(Base::First), RunnerDestination::Out)]),
    ];
    for (i, input) in plays.into_iter().enumerate() {
        game.record_at_bat(input, first_pitch() + Duration::minutes(i as i64))
            .expect("At-bat rejected");
    }

    assert_eq!(*game.score(), Score::new(0, 1));
    let box_score = build_box_score(&game);
    assert_eq!(box_score.line_score[0].opponent, 1);
    assert_eq!(box_score.opponent.totals.runs, 1);
    assert_eq!(box_score.team.pitching[0].outs_recorded, 3);
    assert!(game.verify().is_ok());
}

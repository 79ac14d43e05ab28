//! Tests for the at-bat state machine.

use chrono::Utc;
use scorebook_core::{
    AtBatEvent, AtBatResult, Base, CountStatus, EntrySource, GameState, Half, Lineup, LineupPlayer,
    Lineups, OutsInRangeInvariant, Invariant, Pitch, Position, RunnerDestination, RunnerMove, RunnerOrigin,
    record_at_bat, record_pitch,
};

fn lineup(prefix: &str, n: usize) -> Lineup {
    let mut lineup = Lineup::new();
    for i in 1..=n {
        let position = if i == 1 { Position::Pitcher } else { Position::Bench };
        lineup = lineup
            .add_player(LineupPlayer {
                player_id: format!("{prefix}{i}"),
                source: EntrySource::Roster,
                name: format!("{prefix} {i}"),
                jersey_number: Some(i.to_string()),
                position,
            })
            .expect("Add failed");
    }
    lineup
}

fn lineups() -> Lineups {
    Lineups::new(lineup("h", 9), lineup("a", 9))
}

/// Builds an event for whoever is due up against the current pitcher.
fn due_up(state: &GameState, lineups: &Lineups, result: AtBatResult) -> AtBatEvent {
    let batter = state
        .current_batter_id()
        .as_deref()
        .and_then(|id| lineups.find(id))
        .expect("No batter due")
        .player_ref();
    let pitcher = state.current_pitcher().cloned().expect("No pitcher");
    AtBatEvent::new(
        "game",
        batter,
        pitcher,
        *state.current_inning(),
        state.half(),
        result,
        Utc::now(),
    )
    .with_count(*state.balls(), *state.strikes(), *state.fouls())
}

fn apply(state: GameState, lineups: &Lineups, results: &[AtBatResult]) -> GameState {
    results.iter().fold(state, |state, result| {
        let event = due_up(&state, lineups, *result);
        record_at_bat(&state, lineups, &event).expect("At-bat rejected").state
    })
}

#[test]
fn test_single_single_homerun_scores_three() {
    let lineups = lineups();
    let mut state = GameState::start(&lineups);
    let mut runs = 0;
    for result in [AtBatResult::Single, AtBatResult::Single, AtBatResult::Homerun] {
        let event = due_up(&state, &lineups, result);
        let transition = record_at_bat(&state, &lineups, &event).expect("At-bat rejected");
        runs += transition.runs_scored.len();
        state = transition.state;
    }

    assert_eq!(runs, 3);
    assert!(state.bases().is_empty());
    assert_eq!(*state.outs(), 0);
    assert_eq!(state.half(), Half::Top);
    assert_eq!(state.current_batter_id().as_deref(), Some("a4"));
}

#[test]
fn test_three_strikeouts_flip_half() {
    let lineups = lineups();
    let mut state = GameState::start(&lineups);

    for expected_outs in 1..=2u8 {
        let event = due_up(&state, &lineups, AtBatResult::Strikeout);
        state = record_at_bat(&state, &lineups, &event).expect("At-bat rejected").state;
        assert_eq!(*state.outs(), expected_outs);
        assert!(*state.is_top_half());
    }

    // Work a count before the third strikeout
    let (counted, _) = record_pitch(&state, Pitch::Ball);
    let (counted, _) = record_pitch(&counted, Pitch::Strike);
    let event = due_up(&counted, &lineups, AtBatResult::Strikeout);
    let transition = record_at_bat(&counted, &lineups, &event).expect("At-bat rejected");
    let state = transition.state;

    assert!(transition.half_inning_ended);
    assert_eq!(transition.outs_recorded, 1);
    assert_eq!(*state.outs(), 0);
    assert!(!*state.is_top_half());
    assert_eq!(*state.current_inning(), 1);
    assert!(state.bases().is_empty());
    assert_eq!((*state.balls(), *state.strikes(), *state.fouls()), (0, 0, 0));
    assert_eq!(state.current_batter_id().as_deref(), Some("h1"));
    assert_eq!(state.current_pitcher_id().as_deref(), Some("a1"));
}

#[test]
fn test_bottom_half_third_out_advances_inning() {
    let lineups = lineups();
    let k = AtBatResult::Strikeout;
    let state = apply(GameState::start(&lineups), &lineups, &[k, k, k, k, k, k]);
    assert_eq!(*state.current_inning(), 2);
    assert!(*state.is_top_half());
    // Away resumes with its fourth batter
    assert_eq!(state.current_batter_id().as_deref(), Some("a4"));
}

#[test]
fn test_walk_forces_only_when_forced() {
    let lineups = lineups();
    // a1 doubles, a2 walks: runner on second is not forced
    let state = apply(
        GameState::start(&lineups),
        &lineups,
        &[AtBatResult::Double, AtBatResult::Walk],
    );
    assert_eq!(state.bases().first.as_deref(), Some("a2"));
    assert_eq!(state.bases().second.as_deref(), Some("a1"));
    assert!(state.bases().third.is_none());

    // a3 walks: both runners forced
    let state = apply(state, &lineups, &[AtBatResult::HitByPitch]);
    assert_eq!(state.bases().first.as_deref(), Some("a3"));
    assert_eq!(state.bases().second.as_deref(), Some("a2"));
    assert_eq!(state.bases().third.as_deref(), Some("a1"));

    // a4 walks with the bases loaded: a1 scores
    let event = due_up(&state, &lineups, AtBatResult::Walk);
    let transition = record_at_bat(&state, &lineups, &event).expect("At-bat rejected");
    assert_eq!(transition.runs_scored, vec!["a1".to_string()]);
    assert_eq!(transition.state.bases().runner_count(), 3);
}

#[test]
fn test_fielders_choice_retires_lead_forced_runner() {
    let lineups = lineups();
    let state = apply(GameState::start(&lineups), &lineups, &[AtBatResult::Single]);
    let state = apply(state, &lineups, &[AtBatResult::FieldersChoice]);
    assert_eq!(*state.outs(), 1);
    assert_eq!(state.bases().first.as_deref(), Some("a2"));
    assert!(state.bases().second.is_none());
}

#[test]
fn test_fielders_choice_with_empty_bases_retires_batter() {
    let lineups = lineups();
    let state = apply(GameState::start(&lineups), &lineups, &[AtBatResult::FieldersChoice]);
    assert_eq!(*state.outs(), 1);
    assert!(state.bases().is_empty());
}

#[test]
fn test_sacrifice_advances_runners_and_retires_batter() {
    let lineups = lineups();
    let state = apply(
        GameState::start(&lineups),
        &lineups,
        &[AtBatResult::Double, AtBatResult::Sacrifice],
    );
    assert_eq!(*state.outs(), 1);
    assert_eq!(state.bases().third.as_deref(), Some("a1"));
    assert!(state.bases().first.is_none());
}

#[test]
fn test_no_run_scores_on_third_out() {
    let lineups = lineups();
    let state = apply(
        GameState::start(&lineups),
        &lineups,
        &[AtBatResult::Triple, AtBatResult::Strikeout, AtBatResult::Strikeout],
    );
    assert_eq!(*state.outs(), 2);

    // Sacrifice fly would score a1, but it is the third out
    let event = due_up(&state, &lineups, AtBatResult::Sacrifice).with_rbi(1);
    let transition = record_at_bat(&state, &lineups, &event).expect("At-bat rejected");
    assert!(transition.half_inning_ended);
    assert!(transition.runs_scored.is_empty());
}

#[test]
fn test_run_scores_when_trailing_runner_makes_third_out() {
    let lineups = lineups();
    let state = apply(
        GameState::start(&lineups),
        &lineups,
        &[AtBatResult::Triple, AtBatResult::Strikeout, AtBatResult::Strikeout, AtBatResult::Walk],
    );
    assert_eq!(state.bases().third.as_deref(), Some("a1"));
    assert_eq!(state.bases().first.as_deref(), Some("a4"));

    // a1 crosses before a4 is thrown out going first to third
    let event = due_up(&state, &lineups, AtBatResult::Single)
        .with_rbi(1)
        .with_advancement(vec![RunnerMove::new(
            RunnerOrigin::Base(Base::First),
            RunnerDestination::Out,
        )]);
    let transition = record_at_bat(&state, &lineups, &event).expect("At-bat rejected");
    assert!(transition.half_inning_ended);
    assert_eq!(transition.runs_scored, vec!["a1".to_string()]);
    assert_eq!(transition.state.half(), Half::Bottom);
}

#[test]
fn test_override_runner_thrown_out_advancing() {
    let lineups = lineups();
    let state = apply(GameState::start(&lineups), &lineups, &[AtBatResult::Single]);
    let event = due_up(&state, &lineups, AtBatResult::Single).with_advancement(vec![RunnerMove::new(
        RunnerOrigin::Base(Base::First),
        RunnerDestination::Out,
    )]);
    let state = record_at_bat(&state, &lineups, &event).expect("At-bat rejected").state;
    assert_eq!(*state.outs(), 1);
    assert_eq!(state.bases().first.as_deref(), Some("a2"));
    assert_eq!(state.bases().runner_count(), 1);
}

#[test]
fn test_override_on_empty_base_is_rejected_without_change() {
    let lineups = lineups();
    let state = GameState::start(&lineups);
    let event = due_up(&state, &lineups, AtBatResult::Single).with_advancement(vec![RunnerMove::new(
        RunnerOrigin::Base(Base::Second),
        RunnerDestination::Home,
    )]);
    let before = state.clone();
    let err = record_at_bat(&state, &lineups, &event).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(state, before);
}

#[test]
fn test_missing_batter_is_rejected() {
    let lineups = lineups();
    let state = GameState::start(&lineups);
    let event = AtBatEvent::new(
        "game",
        scorebook_core::PlayerRef::new(String::new(), String::new()),
        state.current_pitcher().cloned().expect("No pitcher"),
        1,
        Half::Top,
        AtBatResult::Single,
        Utc::now(),
    );
    assert!(record_at_bat(&state, &lineups, &event).unwrap_err().is_validation());
}

#[test]
fn test_pitch_count_reports_terminal_counts() {
    let lineups = lineups();
    let mut state = GameState::start(&lineups);
    for _ in 0..3 {
        let (next, status) = record_pitch(&state, Pitch::Ball);
        assert_eq!(status, CountStatus::InProgress);
        state = next;
    }
    let (_, status) = record_pitch(&state, Pitch::Ball);
    assert_eq!(status, CountStatus::Walk);

    let (state, _) = record_pitch(&state, Pitch::Foul);
    let (state, _) = record_pitch(&state, Pitch::Foul);
    let (state, _) = record_pitch(&state, Pitch::Foul);
    assert_eq!(*state.strikes(), 2);
    assert_eq!(*state.fouls(), 3);
    let (_, status) = record_pitch(&state, Pitch::Strike);
    assert_eq!(status, CountStatus::Strikeout);
}

#[test]
fn test_outs_stay_in_range_through_a_long_sequence() {
    let lineups = lineups();
    let mut state = GameState::start(&lineups);
    let cycle = [
        AtBatResult::Single,
        AtBatResult::GroundOut,
        AtBatResult::Walk,
        AtBatResult::FieldersChoice,
        AtBatResult::Double,
        AtBatResult::FlyOut,
        AtBatResult::ReachedOnError,
        AtBatResult::OutAtHome,
    ];
    for result in cycle.iter().cycle().take(60) {
        let event = due_up(&state, &lineups, *result);
        state = record_at_bat(&state, &lineups, &event).expect("At-bat rejected").state;
        assert!(OutsInRangeInvariant::holds(&state));
    }
}

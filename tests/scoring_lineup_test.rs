//! Tests for lineup editing.

use scorebook_core::{
    Direction, EntrySource, EntryStatus, Invariant, Lineup, LineupOrderInvariant, LineupPlayer, Position,
    RosterPlayer,
};

fn player(id: &str) -> LineupPlayer {
    LineupPlayer {
        player_id: id.to_string(),
        source: EntrySource::Roster,
        name: id.to_uppercase(),
        jersey_number: None,
        position: Position::Bench,
    }
}

fn lineup_of(ids: &[&str]) -> Lineup {
    ids.iter()
        .try_fold(Lineup::new(), |lineup, id| lineup.add_player(player(id)))
        .expect("Add failed")
}

fn order(lineup: &Lineup) -> Vec<(String, u32)> {
    lineup
        .entries()
        .iter()
        .map(|e| (e.player_id().clone(), *e.order()))
        .collect()
}

#[test]
fn test_add_assigns_next_order() {
    let lineup = lineup_of(&["a", "b", "c"]);
    assert_eq!(
        order(&lineup),
        vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 3)]
    );
    assert!(lineup.entries().iter().all(|e| *e.status() == EntryStatus::Active));
}

#[test]
fn test_duplicate_player_rejected() {
    let lineup = lineup_of(&["a"]);
    assert!(lineup.add_player(player("a")).is_err());
}

#[test]
fn test_remove_middle_renumbers_preserving_order() {
    let lineup = lineup_of(&["a", "b", "c"]).remove_player("b");
    assert_eq!(order(&lineup), vec![("a".into(), 1), ("c".into(), 2)]);
    assert!(LineupOrderInvariant::holds(&lineup));
}

#[test]
fn test_remove_unknown_player_is_noop() {
    let lineup = lineup_of(&["a", "b"]);
    assert_eq!(lineup.clone().remove_player("zz"), lineup);
}

#[test]
fn test_move_swaps_adjacent() {
    let lineup = lineup_of(&["a", "b", "c"]).move_player("c", Direction::Up);
    assert_eq!(
        order(&lineup),
        vec![("a".into(), 1), ("c".into(), 2), ("b".into(), 3)]
    );
}

#[test]
fn test_move_at_boundary_is_noop() {
    let lineup = lineup_of(&["a", "b", "c"]);
    assert_eq!(lineup.clone().move_player("a", Direction::Up), lineup);
    assert_eq!(lineup.clone().move_player("c", Direction::Down), lineup);
}

#[test]
fn test_orders_stay_a_permutation_under_edits() {
    let mut lineup = lineup_of(&["a", "b", "c", "d", "e", "f"]);
    let edits: [(&str, Option<Direction>); 8] = [
        ("c", Some(Direction::Up)),
        ("a", Some(Direction::Down)),
        ("f", None),
        ("b", Some(Direction::Down)),
        ("e", Some(Direction::Down)),
        ("a", None),
        ("d", Some(Direction::Up)),
        ("zz", None),
    ];
    for (id, edit) in edits {
        lineup = match edit {
            Some(direction) => lineup.move_player(id, direction),
            None => lineup.remove_player(id),
        };
        assert!(LineupOrderInvariant::holds(&lineup), "after editing {id}");
    }
    assert_eq!(lineup.len(), 4);
}

#[test]
fn test_inactive_entries_are_skipped() {
    let lineup = lineup_of(&["a", "b", "c"]).set_status("b", EntryStatus::Inactive);
    assert_eq!(lineup.next_after(1), Some(3));
    assert_eq!(lineup.next_after(3), Some(1));

    let lineup = lineup.set_status("a", EntryStatus::Inactive);
    assert_eq!(lineup.leadoff(), Some(3));
}

#[test]
fn test_pitcher_lookup_follows_position() {
    let lineup = lineup_of(&["a", "b"]).set_position("b", Position::Pitcher);
    assert_eq!(lineup.pitcher().map(|e| e.player_id().as_str()), Some("b"));
}

#[test]
fn test_roster_and_ad_hoc_entries() {
    let roster = RosterPlayer::new(
        "r-1".to_string(),
        "Riley".to_string(),
        Some("00".to_string()),
        vec![Position::Shortstop, Position::SecondBase],
    );
    let from_roster = LineupPlayer::from_roster(&roster);
    assert_eq!(from_roster.source, EntrySource::Roster);
    assert_eq!(from_roster.position, Position::Shortstop);
    assert_eq!(from_roster.jersey_number.as_deref(), Some("00"));

    let first = LineupPlayer::ad_hoc("Visitor", None, Position::Catcher);
    let second = LineupPlayer::ad_hoc("Visitor", None, Position::Catcher);
    assert_eq!(first.source, EntrySource::AdHoc);
    assert_ne!(first.player_id, second.player_id);

    let lineup = Lineup::new()
        .add_player(from_roster)
        .and_then(|l| l.add_player(first))
        .and_then(|l| l.add_player(second))
        .expect("Add failed");
    assert_eq!(lineup.len(), 3);
}

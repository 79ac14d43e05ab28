//! Live in-game state and the at-bat transition.
//!
//! [`record_at_bat`] is the only way the situation on the field changes
//! between plate appearances. It takes the current state by reference and
//! returns the next one, so a rejected event leaves the caller's state
//! untouched.

use crate::contracts::{Contract, RecordAtBatContract};
use crate::error::{ScoringError, ValidationError};
use crate::event::AtBatEvent;
use crate::lineup::Lineups;
use crate::rules::{self, CountStatus, Pitch, PlayResult};
use crate::types::{Bases, BySide, Half, PlayerId, PlayerRef, Side};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Situation on the field for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    current_inning: u32,
    is_top_half: bool,
    outs: u8,
    balls: u8,
    strikes: u8,
    fouls: u32,
    bases: Bases,
    current_batter_id: Option<PlayerId>,
    current_pitcher_id: Option<PlayerId>,
    /// Lineup order due up next for each side.
    due_up: BySide<Option<u32>>,
    /// Pitcher currently assigned to each side.
    pitchers: BySide<Option<PlayerRef>>,
}

/// Outcome of a successful [`record_at_bat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the at-bat.
    pub state: GameState,
    /// Side that was batting.
    pub batting_side: Side,
    /// Runners who scored, in order.
    pub runs_scored: Vec<PlayerId>,
    /// Outs recorded on the play.
    pub outs_recorded: u8,
    /// Whether the play ended the half-inning.
    pub half_inning_ended: bool,
}

impl GameState {
    /// State at first pitch: top of the first, nobody out, bases empty.
    ///
    /// The away leadoff hitter is up and the home pitcher (the lineup's `P`
    /// entry, if any) is on the mound.
    #[instrument(skip(lineups), fields(home = lineups.home.len(), away = lineups.away.len()))]
    pub fn start(lineups: &Lineups) -> Self {
        let due_up = BySide::new(lineups.home.leadoff(), lineups.away.leadoff());
        let pitchers = BySide::new(
            lineups.home.pitcher().map(|e| e.player_ref()),
            lineups.away.pitcher().map(|e| e.player_ref()),
        );
        let mut state = Self {
            current_inning: 1,
            is_top_half: true,
            outs: 0,
            balls: 0,
            strikes: 0,
            fouls: 0,
            bases: Bases::empty(),
            current_batter_id: None,
            current_pitcher_id: None,
            due_up,
            pitchers,
        };
        state.sync_participants(lineups);
        info!(batter = ?state.current_batter_id, pitcher = ?state.current_pitcher_id, "Game state initialized");
        state
    }

    /// Current half.
    pub fn half(&self) -> Half {
        if self.is_top_half { Half::Top } else { Half::Bottom }
    }

    /// Side at bat.
    pub fn batting_side(&self) -> Side {
        self.half().batting_side()
    }

    /// Side in the field.
    pub fn fielding_side(&self) -> Side {
        self.half().fielding_side()
    }

    /// The fielding side's pitcher.
    pub fn current_pitcher(&self) -> Option<&PlayerRef> {
        self.pitchers.get(self.fielding_side()).as_ref()
    }

    /// Lineup order due up for `side`.
    pub fn due_up_for(&self, side: Side) -> Option<u32> {
        *self.due_up.get(side)
    }

    /// Re-aligns due-up slots and participants after a lineup edit.
    ///
    /// A due-up slot that no longer exists or now holds an inactive entry
    /// moves to the next active entry at or after it. A side with no
    /// pitcher yet picks up its lineup's `P` entry. Count, outs and bases
    /// are kept.
    #[instrument(skip(self, lineups))]
    pub fn resync(&self, lineups: &Lineups) -> Self {
        let mut next = self.clone();
        for side in [Side::Home, Side::Away] {
            let lineup = lineups.get(side);
            let due = match self.due_up_for(side) {
                Some(order) => match lineup.at_order(order) {
                    Some(entry) if entry.is_active() => Some(order),
                    _ => lineup.next_after(order.saturating_sub(1)),
                },
                None => lineup.leadoff(),
            };
            *next.due_up.get_mut(side) = due;
            if next.pitchers.get(side).is_none() {
                *next.pitchers.get_mut(side) = lineup.pitcher().map(|e| e.player_ref());
            }
        }
        next.sync_participants(lineups);
        debug!(batter = ?next.current_batter_id, "Participants resynced after lineup change");
        next
    }

    fn reset_count(&mut self) {
        self.balls = 0;
        self.strikes = 0;
        self.fouls = 0;
    }

    fn sync_participants(&mut self, lineups: &Lineups) {
        let batting = self.batting_side();
        self.current_batter_id = self
            .due_up_for(batting)
            .and_then(|order| lineups.get(batting).at_order(order))
            .map(|e| e.player_id().clone());
        self.current_pitcher_id = self.current_pitcher().map(|p| p.id.clone());
    }

    fn end_half(&mut self) {
        if self.is_top_half {
            self.is_top_half = false;
        } else {
            self.is_top_half = true;
            self.current_inning += 1;
        }
        self.outs = 0;
        self.bases.clear();
        self.reset_count();
    }

    /// Order following the batter who just hit, for the batting side.
    fn next_due(&self, lineups: &Lineups, side: Side, batter_id: &str) -> Option<u32> {
        let lineup = lineups.get(side);
        let from = lineup
            .entry(batter_id)
            .map(|e| *e.order())
            .or_else(|| {
                warn!(batter_id, "Batter not in lineup, advancing from the due-up slot");
                self.due_up_for(side)
            })?;
        lineup.next_after(from)
    }
}

/// Records a completed at-bat (or a foul) against the current state.
///
/// Applies the result's advancement rules and any manual overrides,
/// records outs, flips the half on the third out, resets the count for
/// the next batter and moves the batting order along.
///
/// # Errors
///
/// Returns [`ScoringError::Validation`] if the event is missing a batter
/// or pitcher, carries an impossible count, belongs to another half, or
/// its overrides do not fit the bases. The input state is never modified.
#[instrument(skip(state, lineups, event), fields(event_id = %event.id(), result = %event.result()))]
pub fn record_at_bat(
    state: &GameState,
    lineups: &Lineups,
    event: &AtBatEvent,
) -> Result<Transition, ScoringError> {
    RecordAtBatContract::pre(state, event)?;
    let play = rules::play(state.outs, &state.bases, event)?;
    let transition = apply(state, lineups, event, play);

    #[cfg(debug_assertions)]
    RecordAtBatContract::post(state, &transition.state)?;

    Ok(transition)
}

/// Replays at-bats from the start state, tolerating overrides that no
/// longer fit (used after a correction changes earlier plays).
///
/// Each event is applied in the half-inning it was recorded in. A half
/// left short of three outs is closed when the log moves past it, and an
/// at-bat logged after its half already has three outs reopens that half
/// with the bases cleared, matching how the stats aggregator counts it.
#[instrument(skip(lineups, events), fields(count = events.len()))]
pub fn replay(lineups: &Lineups, events: &[AtBatEvent]) -> GameState {
    let mut state = GameState::start(lineups);
    for event in events {
        if let Err(e) = state.enter_frame(lineups, event) {
            warn!(error = %e, "Reopening a half-inning that already had three outs");
            state.reopen_frame(lineups, event);
        }
        let play = rules::play_lenient(state.outs, &state.bases, event);
        state = apply(&state, lineups, event, play).state;
    }
    debug!(inning = state.current_inning, half = %state.half(), outs = state.outs, "Replay complete");
    state
}

/// Like [`replay`], but refuses a log where an at-bat falls after the third
/// out of its own half-inning.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first at-bat that no longer fits
/// the half it was recorded in.
#[instrument(skip(lineups, events), fields(count = events.len()))]
pub fn replay_strict(lineups: &Lineups, events: &[AtBatEvent]) -> Result<GameState, ValidationError> {
    let mut state = GameState::start(lineups);
    for event in events {
        state.enter_frame(lineups, event)?;
        let play = rules::play_lenient(state.outs, &state.bases, event);
        state = apply(&state, lineups, event, play).state;
    }
    Ok(state)
}

/// Ordinal of a half-inning: top of the first is 2, bottom of the first 3.
fn frame(inning: u32, half: Half) -> u32 {
    inning.saturating_mul(2) + u32::from(half == Half::Bottom)
}

impl GameState {
    /// Closes half-innings until the state is in the event's frame.
    fn enter_frame(&mut self, lineups: &Lineups, event: &AtBatEvent) -> Result<(), ValidationError> {
        let target = frame(*event.inning(), *event.half());
        if target < frame(self.current_inning, self.half()) {
            return Err(ValidationError::new(format!(
                "At-bat {} falls after the third out of the {} of inning {}",
                event.id(),
                event.half(),
                event.inning()
            )));
        }
        while frame(self.current_inning, self.half()) < target {
            debug!(inning = self.current_inning, half = %self.half(), outs = self.outs, "Closing short half-inning");
            self.end_half();
            self.sync_participants(lineups);
        }
        Ok(())
    }

    fn reopen_frame(&mut self, lineups: &Lineups, event: &AtBatEvent) {
        self.current_inning = *event.inning();
        self.is_top_half = *event.half() == Half::Top;
        self.outs = 0;
        self.bases.clear();
        self.reset_count();
        self.sync_participants(lineups);
    }
}

fn apply(state: &GameState, lineups: &Lineups, event: &AtBatEvent, play: PlayResult) -> Transition {
    let mut next = state.clone();
    let batting_side = state.batting_side();

    // The event names the pitcher actually throwing; keep it for the fielding side.
    let pitcher = event.pitcher();
    if !pitcher.id.is_empty() {
        *next.pitchers.get_mut(state.fielding_side()) = Some(pitcher);
    }

    if !event.result().ends_plate_appearance() {
        let ((balls, strikes, fouls), _) =
            rules::apply_pitch(state.balls, state.strikes, state.fouls, Pitch::Foul);
        next.balls = balls;
        next.strikes = strikes;
        next.fouls = fouls;
        next.current_batter_id = Some(event.player_id().clone());
        next.current_pitcher_id = next.current_pitcher().map(|p| p.id.clone());
        debug!(strikes, fouls, "Foul recorded, at-bat continues");
        return Transition {
            state: next,
            batting_side,
            runs_scored: Vec::new(),
            outs_recorded: 0,
            half_inning_ended: false,
        };
    }

    next.reset_count();
    *next.due_up.get_mut(batting_side) = state.next_due(lineups, batting_side, event.player_id());

    let half_inning_ended = play.half_over();
    if half_inning_ended {
        next.end_half();
        info!(
            inning = next.current_inning,
            half = %next.half(),
            negated = play.runs_negated,
            "Half-inning over"
        );
    } else {
        next.outs = play.outs;
        next.bases = play.bases;
    }
    next.sync_participants(lineups);

    debug!(
        runs = play.runs.len(),
        outs = next.outs,
        batter = ?next.current_batter_id,
        "At-bat applied"
    );

    Transition {
        state: next,
        batting_side,
        runs_scored: play.runs,
        outs_recorded: play.outs_recorded,
        half_inning_ended,
    }
}

/// Applies a single pitch to the live count.
///
/// Returns the updated state and whether the count now calls for a walk or
/// strikeout to be recorded.
#[instrument(skip(state))]
pub fn record_pitch(state: &GameState, pitch: Pitch) -> (GameState, CountStatus) {
    let ((balls, strikes, fouls), status) =
        rules::apply_pitch(state.balls, state.strikes, state.fouls, pitch);
    let mut next = state.clone();
    next.balls = balls;
    next.strikes = strikes;
    next.fouls = fouls;
    debug!(balls, strikes, fouls, ?status, "Pitch recorded");
    (next, status)
}

#[cfg(test)]
impl GameState {
    /// Test hook for corrupting state in invariant tests.
    pub(crate) fn set_outs_unchecked(&mut self, outs: u8) {
        self.outs = outs;
    }

    /// Test hook for corrupting state in invariant tests.
    pub(crate) fn bases_mut(&mut self) -> &mut Bases {
        &mut self.bases
    }
}

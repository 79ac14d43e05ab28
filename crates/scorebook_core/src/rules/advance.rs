//! Base advancement for a completed plate appearance.

use super::OUTS_PER_HALF;
use crate::error::ValidationError;
use crate::event::{AtBatEvent, AtBatResult, RunnerDestination, RunnerMove, RunnerOrigin};
use crate::types::{Base, Bases, PlayerId};
use tracing::{debug, instrument, warn};

/// What one play did to the half-inning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayResult {
    /// Base occupancy after the play (empty when the half ended).
    pub bases: Bases,
    /// Outs after the play, 0-3. Three means the half-inning is over.
    pub outs: u8,
    /// Outs recorded by this play (never more than were left in the half).
    pub outs_recorded: u8,
    /// Runners who crossed the plate, in order.
    pub runs: Vec<PlayerId>,
    /// Players put out on the play.
    pub retired: Vec<PlayerId>,
    /// Runs that reached home but were wiped out by a third out made on
    /// the batter-runner or a forced runner.
    pub runs_negated: usize,
}

impl PlayResult {
    fn unchanged(outs: u8, bases: &Bases) -> Self {
        Self {
            bases: bases.clone(),
            outs,
            outs_recorded: 0,
            runs: Vec::new(),
            retired: Vec::new(),
            runs_negated: 0,
        }
    }

    /// Checks whether the play ended the half-inning.
    pub fn half_over(&self) -> bool {
        self.outs >= OUTS_PER_HALF
    }
}

/// Applies an event's result (and any manual overrides) to the bases.
///
/// # Errors
///
/// Returns [`ValidationError`] if an override names an empty base, sends
/// a runner backwards, or leaves two runners on one base.
#[instrument(skip(bases, event), fields(result = %event.result()))]
pub fn play(outs_before: u8, bases: &Bases, event: &AtBatEvent) -> Result<PlayResult, ValidationError> {
    resolve(
        outs_before,
        bases,
        event.player_id(),
        *event.result(),
        event.advancement(),
    )
}

/// Like [`play`], but falls back to the default rule when the overrides no
/// longer fit the bases (replays after a correction).
#[instrument(skip(bases, event), fields(result = %event.result()))]
pub fn play_lenient(outs_before: u8, bases: &Bases, event: &AtBatEvent) -> PlayResult {
    match play(outs_before, bases, event) {
        Ok(result) => result,
        Err(e) => {
            warn!(event_id = %event.id(), error = %e, "Ignoring runner overrides that do not fit the bases");
            resolve(outs_before, bases, event.player_id(), *event.result(), &[])
                .unwrap_or_else(|_| PlayResult::unchanged(outs_before, bases))
        }
    }
}

fn resolve(
    outs_before: u8,
    bases: &Bases,
    batter: &PlayerId,
    result: AtBatResult,
    overrides: &[RunnerMove],
) -> Result<PlayResult, ValidationError> {
    if !result.ends_plate_appearance() {
        return Ok(PlayResult::unchanged(outs_before, bases));
    }

    let mut moves = default_moves(bases, batter, result);
    let overridden: Vec<RunnerOrigin> = overrides.iter().map(|mv| mv.from).collect();

    for mv in overrides {
        let safe = matches!(mv.to, RunnerDestination::Base(_) | RunnerDestination::Home);
        if safe && destination_number(mv.to) < mv.from.number() {
            return Err(ValidationError::new(format!(
                "Runner cannot move backwards from {:?} to {:?}",
                mv.from, mv.to
            )));
        }
        let slot = moves
            .iter_mut()
            .find(|(origin, _, _)| *origin == mv.from)
            .ok_or_else(|| ValidationError::new(format!("No runner on {:?} to move", mv.from)))?;
        slot.2 = mv.to;
    }

    // Outs by rule (the batter-runner, or the runner forced out on a
    // fielder's choice) wipe out runs on a third out; a runner thrown out
    // advancing on an override does not.
    let force_out = result.retires_batter()
        || moves.iter().any(|(origin, _, to)| {
            matches!(to, RunnerDestination::Out)
                && (*origin == RunnerOrigin::Batter || !overridden.contains(origin))
        });

    settle(outs_before, moves, force_out)
}

/// Default destination for every occupant, lead runner first, batter last.
fn default_moves(
    bases: &Bases,
    batter: &PlayerId,
    result: AtBatResult,
) -> Vec<(RunnerOrigin, PlayerId, RunnerDestination)> {
    let forced = forced_bases(bases);
    let mut moves: Vec<(RunnerOrigin, PlayerId, RunnerDestination)> = bases
        .runners()
        .into_iter()
        .map(|(base, runner)| {
            let to = if let Some(n) = result.hit_bases() {
                advance(base.number(), n)
            } else if result.forces_runners() {
                if forced.contains(&base) {
                    advance(base.number(), 1)
                } else {
                    RunnerDestination::Base(base)
                }
            } else if result == AtBatResult::Sacrifice {
                advance(base.number(), 1)
            } else {
                RunnerDestination::Base(base)
            };
            (RunnerOrigin::Base(base), runner.clone(), to)
        })
        .collect();

    let batter_to = if let Some(n) = result.hit_bases() {
        advance(0, n)
    } else if result.retires_batter() {
        RunnerDestination::Out
    } else {
        RunnerDestination::Base(Base::First)
    };
    moves.push((RunnerOrigin::Batter, batter.clone(), batter_to));

    if result == AtBatResult::FieldersChoice {
        // Lead forced runner is retired; with nobody forced the batter is.
        let lead_forced = forced.iter().max().copied();
        let target = lead_forced.map_or(RunnerOrigin::Batter, RunnerOrigin::Base);
        if let Some(slot) = moves.iter_mut().find(|(origin, _, _)| *origin == target) {
            slot.2 = RunnerDestination::Out;
        }
    }

    moves
}

/// Bases whose runner must advance when the batter takes first.
fn forced_bases(bases: &Bases) -> Vec<Base> {
    let mut forced = Vec::new();
    for base in Base::ALL {
        if bases.is_occupied(base) {
            forced.push(base);
        } else {
            break;
        }
    }
    forced
}

fn advance(from: u8, by: u8) -> RunnerDestination {
    match Base::from_number(from + by) {
        Some(base) => RunnerDestination::Base(base),
        None => RunnerDestination::Home,
    }
}

fn destination_number(to: RunnerDestination) -> u8 {
    match to {
        RunnerDestination::Base(base) => base.number(),
        RunnerDestination::Home => 4,
        RunnerDestination::Out => 0,
    }
}

fn settle(
    outs_before: u8,
    moves: Vec<(RunnerOrigin, PlayerId, RunnerDestination)>,
    force_out: bool,
) -> Result<PlayResult, ValidationError> {
    let mut bases = Bases::empty();
    let mut runs = Vec::new();
    let mut retired = Vec::new();

    for (origin, runner, to) in moves {
        match to {
            RunnerDestination::Home => runs.push(runner),
            RunnerDestination::Out => retired.push(runner),
            RunnerDestination::Base(base) => {
                if let Some(other) = bases.set(base, runner.clone()) {
                    return Err(ValidationError::new(format!(
                        "Runners {} and {} cannot both stand on {:?} (from {:?})",
                        other, runner, base, origin
                    )));
                }
            }
        }
    }

    let outs_after = outs_before.saturating_add(retired.len() as u8);
    if outs_after >= OUTS_PER_HALF {
        let negated = if force_out { runs.len() } else { 0 };
        debug!(negated, force_out, "Third out recorded on the play");
        if force_out {
            runs.clear();
        }
        return Ok(PlayResult {
            bases: Bases::empty(),
            outs: OUTS_PER_HALF,
            outs_recorded: OUTS_PER_HALF.saturating_sub(outs_before),
            runs_negated: negated,
            runs,
            retired,
        });
    }

    Ok(PlayResult {
        bases,
        outs: outs_after,
        outs_recorded: retired.len() as u8,
        runs,
        retired,
        runs_negated: 0,
    })
}

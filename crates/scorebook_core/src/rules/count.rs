//! Ball/strike/foul count rules.

use super::{BALLS_FOR_WALK, STRIKES_FOR_OUT};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A single pitch outcome tracked between recorded at-bats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Pitch {
    /// Pitch outside the zone, not swung at.
    Ball,
    /// Called or swinging strike.
    Strike,
    /// Foul ball.
    Foul,
}

/// Where the count stands after a pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountStatus {
    /// At-bat continues.
    InProgress,
    /// Fourth ball: the scorekeeper should record a walk.
    Walk,
    /// Third strike: the scorekeeper should record a strikeout.
    Strikeout,
}

/// Applies a pitch to a count, returning the new `(balls, strikes, fouls)`.
///
/// The count never leaves 0-3 balls and 0-2 strikes. The pitch that would
/// make ball four or strike three is reported through [`CountStatus`]
/// instead, leaving the terminal result to the recorded at-bat. A foul with
/// two strikes only adds to the foul tally.
#[instrument]
pub fn apply_pitch(balls: u8, strikes: u8, fouls: u32, pitch: Pitch) -> ((u8, u8, u32), CountStatus) {
    match pitch {
        Pitch::Ball if balls + 1 >= BALLS_FOR_WALK => ((balls, strikes, fouls), CountStatus::Walk),
        Pitch::Ball => ((balls + 1, strikes, fouls), CountStatus::InProgress),
        Pitch::Strike if strikes + 1 >= STRIKES_FOR_OUT => {
            ((balls, strikes, fouls), CountStatus::Strikeout)
        }
        Pitch::Strike => ((balls, strikes + 1, fouls), CountStatus::InProgress),
        Pitch::Foul => {
            let strikes = (strikes + 1).min(STRIKES_FOR_OUT - 1);
            ((balls, strikes, fouls + 1), CountStatus::InProgress)
        }
    }
}

//! Scoring rules.
//!
//! Pure functions that decide what a result does to the bases, the outs
//! and the count. Rules are separated from the state machine so the
//! aggregator can replay the same logic over a log without a live game.

pub mod advance;
pub mod count;

pub use advance::{PlayResult, play, play_lenient};
pub use count::{CountStatus, Pitch, apply_pitch};

/// Outs that end a half-inning.
pub const OUTS_PER_HALF: u8 = 3;

/// Balls that earn a walk.
pub const BALLS_FOR_WALK: u8 = 4;

/// Strikes that retire the batter.
pub const STRIKES_FOR_OUT: u8 = 3;

//! Core domain types shared by every scoring component.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Unique identifier for a player (roster-backed or ad-hoc placeholder).
pub type PlayerId = String;

/// Unique identifier for a game.
pub type GameId = String;

/// Unique identifier for an entry in a game's event log.
pub type EventId = String;

/// Half of an inning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Half {
    /// Visiting team bats.
    Top,
    /// Home team bats.
    Bottom,
}

impl Half {
    /// Returns the other half.
    pub fn flip(self) -> Self {
        match self {
            Half::Top => Half::Bottom,
            Half::Bottom => Half::Top,
        }
    }

    /// Side at bat during this half.
    pub fn batting_side(self) -> Side {
        match self {
            Half::Top => Side::Away,
            Half::Bottom => Side::Home,
        }
    }

    /// Side in the field during this half.
    pub fn fielding_side(self) -> Side {
        self.batting_side().opponent()
    }
}

/// One of the two teams in a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Home team (bats in the bottom half).
    Home,
    /// Visiting team (bats in the top half).
    Away,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A pair of values, one per side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BySide<T> {
    /// Value for the home side.
    pub home: T,
    /// Value for the away side.
    pub away: T,
}

impl<T> BySide<T> {
    /// Creates a pair from both values.
    pub fn new(home: T, away: T) -> Self {
        Self { home, away }
    }

    /// Returns the value for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Returns a mutable reference to the value for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

/// A base a runner can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    /// First base.
    First,
    /// Second base.
    Second,
    /// Third base.
    Third,
}

impl Base {
    /// All bases from first to third.
    pub const ALL: [Base; 3] = [Base::First, Base::Second, Base::Third];

    /// Base number (1-3).
    pub fn number(self) -> u8 {
        match self {
            Base::First => 1,
            Base::Second => 2,
            Base::Third => 3,
        }
    }

    /// Base for a number, `None` outside 1-3.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Base::First),
            2 => Some(Base::Second),
            3 => Some(Base::Third),
            _ => None,
        }
    }
}

/// Base occupancy: which player (if any) stands on each base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bases {
    /// Runner on first.
    pub first: Option<PlayerId>,
    /// Runner on second.
    pub second: Option<PlayerId>,
    /// Runner on third.
    pub third: Option<PlayerId>,
}

impl Bases {
    /// Creates empty bases.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the runner on `base`.
    pub fn get(&self, base: Base) -> Option<&PlayerId> {
        match base {
            Base::First => self.first.as_ref(),
            Base::Second => self.second.as_ref(),
            Base::Third => self.third.as_ref(),
        }
    }

    fn slot_mut(&mut self, base: Base) -> &mut Option<PlayerId> {
        match base {
            Base::First => &mut self.first,
            Base::Second => &mut self.second,
            Base::Third => &mut self.third,
        }
    }

    /// Places `runner` on `base`, returning whoever stood there before.
    pub fn set(&mut self, base: Base, runner: PlayerId) -> Option<PlayerId> {
        self.slot_mut(base).replace(runner)
    }

    /// Removes and returns the runner on `base`.
    pub fn take(&mut self, base: Base) -> Option<PlayerId> {
        self.slot_mut(base).take()
    }

    /// Checks whether `base` is occupied.
    pub fn is_occupied(&self, base: Base) -> bool {
        self.get(base).is_some()
    }

    /// Checks whether all bases are empty.
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none()
    }

    /// Number of runners on base.
    pub fn runner_count(&self) -> usize {
        Base::ALL.iter().filter(|b| self.is_occupied(**b)).count()
    }

    /// Occupied bases with their runners, lead runner first.
    pub fn runners(&self) -> Vec<(Base, &PlayerId)> {
        Base::ALL
            .iter()
            .rev()
            .filter_map(|b| self.get(*b).map(|r| (*b, r)))
            .collect()
    }

    /// Removes every runner.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        *self = Self::empty();
    }
}

/// Minimal reference to a player taking part in a play.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct PlayerRef {
    /// Player id.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_flip_and_sides() {
        assert_eq!(Half::Top.flip(), Half::Bottom);
        assert_eq!(Half::Top.batting_side(), Side::Away);
        assert_eq!(Half::Bottom.batting_side(), Side::Home);
        assert_eq!(Half::Bottom.fielding_side(), Side::Away);
    }

    #[test]
    fn test_runners_lead_first() {
        let mut bases = Bases::empty();
        bases.set(Base::First, "a".to_string());
        bases.set(Base::Third, "c".to_string());
        let runners = bases.runners();
        assert_eq!(runners.len(), 2);
        assert_eq!(runners[0].0, Base::Third);
        assert_eq!(runners[1].0, Base::First);
        assert_eq!(bases.runner_count(), 2);
    }

    #[test]
    fn test_clear_empties_bases() {
        let mut bases = Bases::empty();
        bases.set(Base::Second, "b".to_string());
        bases.clear();
        assert!(bases.is_empty());
    }
}

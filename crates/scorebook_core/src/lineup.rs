//! Batting lineups.
//!
//! A lineup is an ordered list of entries whose `order` values are always
//! exactly `1..=n`. Every edit consumes the lineup and returns the edited
//! one, so a half-applied edit can never be observed.

use crate::error::ValidationError;
use crate::position::Position;
use crate::types::{BySide, PlayerId, PlayerRef, Side};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Roster collaborator input
// ─────────────────────────────────────────────────────────────

/// A tracked player as supplied by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    id: PlayerId,
    name: String,
    jersey_number: Option<String>,
    positions: Vec<Position>,
}

// ─────────────────────────────────────────────────────────────
//  Entries
// ─────────────────────────────────────────────────────────────

/// Where a lineup entry's player comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntrySource {
    /// A tracked roster player; the id is the roster id.
    Roster,
    /// An untracked opponent; the id is a locally generated placeholder.
    AdHoc,
}

/// Whether an entry currently takes turns at bat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryStatus {
    /// Bats in turn.
    #[default]
    Active,
    /// Skipped when the batting order advances.
    Inactive,
}

/// A player about to be added to a lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupPlayer {
    /// Roster id or placeholder id.
    pub player_id: PlayerId,
    /// Roster-backed or ad-hoc.
    pub source: EntrySource,
    /// Display name.
    pub name: String,
    /// Jersey number, kept as text ("00" is a valid number).
    pub jersey_number: Option<String>,
    /// Position for this game.
    pub position: Position,
}

impl LineupPlayer {
    /// Builds an entry for a roster player at their primary position.
    #[instrument(skip(player), fields(player_id = %player.id()))]
    pub fn from_roster(player: &RosterPlayer) -> Self {
        Self {
            player_id: player.id().clone(),
            source: EntrySource::Roster,
            name: player.name().clone(),
            jersey_number: player.jersey_number().clone(),
            position: player.positions().first().copied().unwrap_or(Position::Bench),
        }
    }

    /// Builds an entry for an untracked opponent with a fresh placeholder id.
    #[instrument(skip(name), fields(name = %name.as_ref()))]
    pub fn ad_hoc(name: impl AsRef<str>, jersey_number: Option<String>, position: Position) -> Self {
        Self {
            player_id: uuid::Uuid::new_v4().to_string(),
            source: EntrySource::AdHoc,
            name: name.as_ref().to_string(),
            jersey_number,
            position,
        }
    }

    /// Overrides the position.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// One batting slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct LineupEntry {
    player_id: PlayerId,
    source: EntrySource,
    name: String,
    jersey_number: Option<String>,
    position: Position,
    order: u32,
    status: EntryStatus,
}

impl LineupEntry {
    fn from_player(player: LineupPlayer, order: u32) -> Self {
        Self {
            player_id: player.player_id,
            source: player.source,
            name: player.name,
            jersey_number: player.jersey_number,
            position: player.position,
            order,
            status: EntryStatus::Active,
        }
    }

    /// Returns the entry as a player reference.
    pub fn player_ref(&self) -> PlayerRef {
        PlayerRef::new(self.player_id.clone(), self.name.clone())
    }

    /// Checks whether the entry takes turns at bat.
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }
}

/// Direction for [`Lineup::move_player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Toward order 1.
    Up,
    /// Toward the end of the lineup.
    Down,
}

// ─────────────────────────────────────────────────────────────
//  Lineup
// ─────────────────────────────────────────────────────────────

/// Ordered batting lineup for one side.
///
/// Stored as a bare list of entries; loading goes through
/// [`Lineup::from_entries`] so orders always read back as 1..n.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineupEntry>", into = "Vec<LineupEntry>")]
pub struct Lineup {
    entries: Vec<LineupEntry>,
}

impl From<Vec<LineupEntry>> for Lineup {
    fn from(entries: Vec<LineupEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Lineup> for Vec<LineupEntry> {
    fn from(lineup: Lineup) -> Self {
        lineup.entries
    }
}

impl Lineup {
    /// Creates an empty lineup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a lineup from stored entries, renumbering by stored order.
    #[instrument(skip(entries), fields(count = entries.len()))]
    pub fn from_entries(mut entries: Vec<LineupEntry>) -> Self {
        entries.sort_by_key(|e| e.order);
        let mut lineup = Self { entries };
        lineup.renumber();
        lineup
    }

    /// Entries in batting order.
    pub fn entries(&self) -> &[LineupEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the lineup has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks whether the player is in this lineup.
    pub fn contains(&self, player_id: &str) -> bool {
        self.entry(player_id).is_some()
    }

    /// Finds a player's entry.
    pub fn entry(&self, player_id: &str) -> Option<&LineupEntry> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }

    /// Finds the entry batting at `order`.
    pub fn at_order(&self, order: u32) -> Option<&LineupEntry> {
        self.entries.iter().find(|e| e.order == order)
    }

    /// The entry playing pitcher, if any.
    pub fn pitcher(&self) -> Option<&LineupEntry> {
        self.entries.iter().find(|e| e.position == Position::Pitcher)
    }

    /// Order of the first active entry (the leadoff hitter).
    pub fn leadoff(&self) -> Option<u32> {
        self.next_active(0)
    }

    /// Order of the next active entry after `order`, wrapping from last to first.
    ///
    /// Falls back to the next entry regardless of status when nobody is active.
    pub fn next_after(&self, order: u32) -> Option<u32> {
        if self.entries.is_empty() {
            return None;
        }
        self.next_active(order).or_else(|| {
            let n = self.entries.len() as u32;
            Some(order % n + 1)
        })
    }

    fn next_active(&self, order: u32) -> Option<u32> {
        let n = self.entries.len();
        let start = order as usize % n.max(1);
        (0..n)
            .map(|i| &self.entries[(start + i) % n])
            .find(|e| e.is_active())
            .map(|e| e.order)
    }

    /// Appends a player at the next order slot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the player is already in the lineup or has an empty id.
    #[instrument(skip(self, player), fields(player_id = %player.player_id))]
    pub fn add_player(mut self, player: LineupPlayer) -> Result<Self, ValidationError> {
        if player.player_id.trim().is_empty() {
            return Err(ValidationError::new("Lineup entry requires a player id"));
        }
        if self.contains(&player.player_id) {
            return Err(ValidationError::new(format!(
                "Player {} is already in the lineup",
                player.player_id
            )));
        }
        let order = self.entries.len() as u32 + 1;
        info!(order, name = %player.name, "Adding player to lineup");
        self.entries.push(LineupEntry::from_player(player, order));
        Ok(self)
    }

    /// Removes a player and renumbers the rest to `1..=n`.
    ///
    /// Removing a player who is not in the lineup leaves it unchanged.
    #[instrument(skip(self))]
    pub fn remove_player(mut self, player_id: &str) -> Self {
        let before = self.entries.len();
        self.entries.retain(|e| e.player_id != player_id);
        if self.entries.len() == before {
            warn!(player_id, "Player not in lineup, nothing removed");
            return self;
        }
        self.renumber();
        info!(player_id, remaining = self.entries.len(), "Removed player from lineup");
        self
    }

    /// Swaps a player with the adjacent entry.
    ///
    /// Moving the first entry up or the last entry down is a no-op.
    #[instrument(skip(self))]
    pub fn move_player(mut self, player_id: &str, direction: Direction) -> Self {
        let Some(index) = self.entries.iter().position(|e| e.player_id == player_id) else {
            warn!(player_id, "Player not in lineup, nothing moved");
            return self;
        };
        let other = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.entries.len() => index + 1,
            _ => {
                debug!(player_id, ?direction, "Move at lineup boundary ignored");
                return self;
            }
        };
        self.entries.swap(index, other);
        self.renumber();
        debug!(player_id, ?direction, "Moved player");
        self
    }

    /// Changes a player's position.
    #[instrument(skip(self))]
    pub fn set_position(mut self, player_id: &str, position: Position) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.player_id == player_id) {
            entry.position = position;
        }
        self
    }

    /// Changes a player's status.
    #[instrument(skip(self))]
    pub fn set_status(mut self, player_id: &str, status: EntryStatus) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.player_id == player_id) {
            entry.status = status;
        }
        self
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.order = i as u32 + 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Both sides
// ─────────────────────────────────────────────────────────────

/// The two independent lineups of a game.
pub type Lineups = BySide<Lineup>;

impl Lineups {
    /// Which side's lineup the player is in.
    pub fn side_of(&self, player_id: &str) -> Option<Side> {
        if self.home.contains(player_id) {
            Some(Side::Home)
        } else if self.away.contains(player_id) {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Finds a player's entry in either lineup.
    pub fn find(&self, player_id: &str) -> Option<&LineupEntry> {
        self.home.entry(player_id).or_else(|| self.away.entry(player_id))
    }
}

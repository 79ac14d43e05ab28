//! Append-only event log for one game.

use crate::error::ValidationError;
use crate::event::{AtBatEvent, Correction, CorrectionKind, LogEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Ordered, append-only sequence of log entries.
///
/// Entries are never removed or rewritten. The effective at-bat sequence
/// is derived by folding corrections over the raw at-bats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from persisted entries, in their stored order.
    #[instrument(skip(entries), fields(count = entries.len()))]
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// Returns all entries in order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries (at-bats and corrections).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an at-bat.
    #[instrument(skip(self, event), fields(event_id = %event.id()))]
    pub fn append_at_bat(&mut self, event: AtBatEvent) -> Result<(), ValidationError> {
        if self.contains(event.id()) {
            return Err(ValidationError::new(format!(
                "Event {} is already in the log",
                event.id()
            )));
        }
        self.entries.push(LogEntry::AtBat(event));
        Ok(())
    }

    /// Appends a correction after checking that its target can be corrected.
    #[instrument(skip(self, correction), fields(target_id = %correction.target()))]
    pub fn append_correction(&mut self, correction: Correction) -> Result<(), ValidationError> {
        self.validate_correction(&correction)?;
        self.entries.push(LogEntry::Correction(correction));
        Ok(())
    }

    /// Checks that the correction targets a recorded, not yet voided at-bat.
    #[instrument(skip(self, correction))]
    pub fn validate_correction(&self, correction: &Correction) -> Result<(), ValidationError> {
        let target = correction.target();
        let recorded = self
            .entries
            .iter()
            .any(|e| matches!(e, LogEntry::AtBat(ev) if ev.id() == target));
        if !recorded {
            return Err(ValidationError::new(format!(
                "Correction target {} is not a recorded at-bat",
                target
            )));
        }
        if self.voided_ids().contains(target.as_str()) {
            return Err(ValidationError::new(format!(
                "At-bat {} has already been voided",
                target
            )));
        }
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    fn voided_ids(&self) -> HashSet<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LogEntry::Correction(c) if *c.kind() == CorrectionKind::Void => {
                    Some(c.target().as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Raw at-bats in recorded order, ignoring corrections.
    pub fn recorded_at_bats(&self) -> impl Iterator<Item = &AtBatEvent> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::AtBat(event) => Some(event),
            LogEntry::Correction(_) => None,
        })
    }

    /// At-bats with every correction applied, in recorded order.
    ///
    /// Voided at-bats are dropped; replaced at-bats keep their id, batter,
    /// pitcher, inning and timestamp with the corrected outcome. When the
    /// same at-bat is replaced more than once the latest replacement wins.
    #[instrument(skip(self), fields(entries = self.entries.len()))]
    pub fn effective_at_bats(&self) -> Vec<AtBatEvent> {
        let mut voided = HashSet::new();
        let mut replaced: HashMap<&str, &CorrectionKind> = HashMap::new();
        for entry in &self.entries {
            if let LogEntry::Correction(c) = entry {
                match c.kind() {
                    CorrectionKind::Void => {
                        voided.insert(c.target().as_str());
                    }
                    kind @ CorrectionKind::Replace { .. } => {
                        replaced.insert(c.target().as_str(), kind);
                    }
                }
            }
        }

        let effective: Vec<AtBatEvent> = self
            .recorded_at_bats()
            .filter(|e| !voided.contains(e.id().as_str()))
            .map(|e| match replaced.get(e.id().as_str()) {
                Some(CorrectionKind::Replace {
                    result,
                    rbi,
                    errors,
                }) => e.amended(*result, *rbi, *errors),
                _ => e.clone(),
            })
            .collect();

        debug!(
            effective = effective.len(),
            voided = voided.len(),
            replaced = replaced.len(),
            "Resolved effective at-bats"
        );
        effective
    }

    /// Timestamps of the first and last effective at-bat.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let events = self.effective_at_bats();
        let first = events.iter().map(|e| *e.timestamp()).min()?;
        let last = events.iter().map(|e| *e.timestamp()).max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AtBatResult;
    use crate::types::{Half, PlayerRef};

    fn event(result: AtBatResult) -> AtBatEvent {
        AtBatEvent::new(
            "g1",
            PlayerRef::new("b1".to_string(), "Batter".to_string()),
            PlayerRef::new("p1".to_string(), "Pitcher".to_string()),
            1,
            Half::Top,
            result,
            Utc::now(),
        )
    }

    #[test]
    fn test_append_rejects_duplicate_id() {
        let mut log = EventLog::new();
        let e = event(AtBatResult::Single);
        log.append_at_bat(e.clone()).unwrap();
        assert!(log.append_at_bat(e).is_err());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_void_drops_event_from_effective_sequence() {
        let mut log = EventLog::new();
        let first = event(AtBatResult::Single);
        let second = event(AtBatResult::Walk);
        let target = first.id().clone();
        log.append_at_bat(first).unwrap();
        log.append_at_bat(second).unwrap();
        log.append_correction(Correction::new(&target, CorrectionKind::Void, Utc::now()))
            .unwrap();

        let effective = log.effective_at_bats();
        assert_eq!(effective.len(), 1);
        assert_eq!(*effective[0].result(), AtBatResult::Walk);
        // History itself is untouched
        assert_eq!(log.recorded_at_bats().count(), 2);
    }

    #[test]
    fn test_replace_keeps_identity() {
        let mut log = EventLog::new();
        let first = event(AtBatResult::Single);
        let target = first.id().clone();
        log.append_at_bat(first).unwrap();
        let kind = CorrectionKind::Replace {
            result: AtBatResult::Double,
            rbi: 1,
            errors: 0,
        };
        log.append_correction(Correction::new(&target, kind, Utc::now()))
            .unwrap();

        let effective = log.effective_at_bats();
        assert_eq!(effective[0].id(), &target);
        assert_eq!(*effective[0].result(), AtBatResult::Double);
        assert_eq!(*effective[0].rbi(), 1);
    }

    #[test]
    fn test_correction_of_unknown_or_voided_target_fails() {
        let mut log = EventLog::new();
        assert!(
            log.append_correction(Correction::new("nope", CorrectionKind::Void, Utc::now()))
                .is_err()
        );

        let e = event(AtBatResult::Single);
        let target = e.id().clone();
        log.append_at_bat(e).unwrap();
        log.append_correction(Correction::new(&target, CorrectionKind::Void, Utc::now()))
            .unwrap();
        assert!(
            log.append_correction(Correction::new(&target, CorrectionKind::Void, Utc::now()))
                .is_err()
        );
    }

    #[test]
    fn test_time_span_empty_log() {
        assert!(EventLog::new().time_span().is_none());
    }
}

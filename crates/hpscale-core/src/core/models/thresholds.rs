use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ThresholdError {
    #[error("Threshold table is locked; E*(L={length}) cannot be changed")]
    Locked { length: usize },

    #[error("Threshold table is not locked; run the pilot phase to completion first")]
    NotLocked,

    #[error("No locked threshold for length {0}")]
    MissingLength(usize),

    #[error("Threshold for length {0} was already recorded")]
    Duplicate(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableState {
    Unlocked,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ThresholdStatus {
    Calibrated,
    Degenerate { reason: String },
}

impl ThresholdStatus {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, ThresholdStatus::Degenerate { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdEntry {
    pub length: usize,
    pub energy: i32,
    pub status: ThresholdStatus,
}

impl ThresholdEntry {
    /// A trial succeeds when its best energy reaches the threshold.
    #[inline]
    pub fn is_success(&self, energy: i32) -> bool {
        energy <= self.energy
    }
}

/// Success thresholds E*(L), written during the pilot phase and then locked.
///
/// The table is a two-state machine: entries may only be inserted while
/// `Unlocked`, and validation may only read from it once `Locked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    state: TableState,
    entries: BTreeMap<usize, ThresholdEntry>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self {
            state: TableState::Unlocked,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn from_parts(state: TableState, entries: Vec<ThresholdEntry>) -> Result<Self, ThresholdError> {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry)?;
        }
        table.state = state;
        Ok(table)
    }

    pub fn insert(&mut self, entry: ThresholdEntry) -> Result<(), ThresholdError> {
        if self.state == TableState::Locked {
            return Err(ThresholdError::Locked {
                length: entry.length,
            });
        }
        if self.entries.contains_key(&entry.length) {
            return Err(ThresholdError::Duplicate(entry.length));
        }
        self.entries.insert(entry.length, entry);
        Ok(())
    }

    /// A fresh unlocked table carrying this table's entries unchanged.
    ///
    /// Locked tables are never reopened; new lengths are calibrated into the
    /// successor, which is then locked in turn.
    pub fn successor(&self) -> Self {
        Self {
            state: TableState::Unlocked,
            entries: self.entries.clone(),
        }
    }

    pub fn lock(&mut self) {
        self.state = TableState::Locked;
    }

    #[inline]
    pub fn state(&self) -> TableState {
        self.state
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state == TableState::Locked
    }

    /// Looks up E*(L) regardless of state; for reporting only.
    pub fn get(&self, length: usize) -> Option<&ThresholdEntry> {
        self.entries.get(&length)
    }

    /// Looks up E*(L) for scoring trials; fails while the table is unlocked.
    pub fn locked_entry(&self, length: usize) -> Result<&ThresholdEntry, ThresholdError> {
        if !self.is_locked() {
            return Err(ThresholdError::NotLocked);
        }
        self.entries
            .get(&length)
            .ok_or(ThresholdError::MissingLength(length))
    }

    /// Checks that every requested length can be scored.
    pub fn ensure_covers(&self, lengths: &[usize]) -> Result<(), ThresholdError> {
        for &length in lengths {
            self.locked_entry(length)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ThresholdEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(length: usize, energy: i32) -> ThresholdEntry {
        ThresholdEntry {
            length,
            energy,
            status: ThresholdStatus::Calibrated,
        }
    }

    #[test]
    fn unlocked_table_rejects_lookups_for_scoring() {
        let mut table = ThresholdTable::new();
        table.insert(entry(20, -12)).unwrap();
        assert_eq!(table.locked_entry(20), Err(ThresholdError::NotLocked));
        assert_eq!(table.ensure_covers(&[20]), Err(ThresholdError::NotLocked));
        assert_eq!(table.get(20).map(|e| e.energy), Some(-12));
    }

    #[test]
    fn locked_table_rejects_inserts() {
        let mut table = ThresholdTable::new();
        table.insert(entry(20, -12)).unwrap();
        table.lock();
        assert_eq!(
            table.insert(entry(30, -15)),
            Err(ThresholdError::Locked { length: 30 })
        );
        assert_eq!(table.locked_entry(20).unwrap().energy, -12);
    }

    #[test]
    fn ensure_covers_reports_missing_length() {
        let mut table = ThresholdTable::new();
        table.insert(entry(20, -12)).unwrap();
        table.lock();
        assert_eq!(
            table.ensure_covers(&[20, 30]),
            Err(ThresholdError::MissingLength(30))
        );
    }

    #[test]
    fn successor_keeps_entries_and_leaves_original_locked() {
        let mut table = ThresholdTable::new();
        table.insert(entry(8, -3)).unwrap();
        table.lock();

        let mut next = table.successor();
        assert!(!next.is_locked());
        next.insert(entry(10, -4)).unwrap();
        assert_eq!(next.insert(entry(8, -9)), Err(ThresholdError::Duplicate(8)));
        next.lock();

        assert_eq!(next.locked_entry(8), table.locked_entry(8));
        assert_eq!(next.locked_entry(10).unwrap().energy, -4);
        assert!(table.is_locked());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_lengths_are_rejected() {
        let mut table = ThresholdTable::new();
        table.insert(entry(20, -12)).unwrap();
        assert_eq!(
            table.insert(entry(20, -13)),
            Err(ThresholdError::Duplicate(20))
        );
    }

    #[test]
    fn success_is_at_or_below_threshold() {
        let e = entry(20, -12);
        assert!(e.is_success(-12));
        assert!(e.is_success(-13));
        assert!(!e.is_success(-11));
    }
}

//! Recently looked-up places

use serde::{Deserialize, Serialize};

use crate::models::SelectedPlaceData;

/// Maximum number of places kept in history
pub const HISTORY_LIMIT: usize = 10;

/// Most-recent-first list of looked-up places, unique by DigiPIN
///
/// Persisted as a plain list; loading one goes through [`LookupHistory::from_entries`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SelectedPlaceData>", into = "Vec<SelectedPlaceData>")]
pub struct LookupHistory {
    entries: Vec<SelectedPlaceData>,
}

impl LookupHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from a previously persisted list, enforcing the invariants
    pub fn from_entries(entries: impl IntoIterator<Item = SelectedPlaceData>) -> Self {
        let mut history = Self::new();
        let entries: Vec<_> = entries.into_iter().collect();
        // Oldest first so the newest ends up at the front
        for place in entries.into_iter().rev() {
            history.push(place);
        }
        history
    }

    /// Record a lookup, moving an existing entry with the same DigiPIN to the front
    pub fn push(&mut self, place: SelectedPlaceData) {
        self.entries.retain(|p| p.digi_pin != place.digi_pin);
        self.entries.insert(0, place);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn entries(&self) -> &[SelectedPlaceData] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<SelectedPlaceData>> for LookupHistory {
    fn from(entries: Vec<SelectedPlaceData>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<LookupHistory> for Vec<SelectedPlaceData> {
    fn from(history: LookupHistory) -> Self {
        history.entries
    }
}

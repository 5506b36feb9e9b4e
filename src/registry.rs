//! Per-droplet emission configuration, keyed by pool slot.
use hashbrown::HashMap;

use crate::config::EmissionConfig;
use crate::droplet::SlotId;

/// Maps each droplet in flight to the configuration that launched it.
///
/// Entries are inserted on emit and taken exactly once when the flight ends,
/// which is what keeps a collision from being processed twice.
#[derive(Debug, Default)]
pub struct EmissionRegistry {
    entries: HashMap<SlotId, EmissionConfig>,
}

impl EmissionRegistry {
    /// Records `config` for `slot`, replacing any stale entry.
    pub fn insert(&mut self, slot: SlotId, config: EmissionConfig) {
        self.entries.insert(slot, config);
    }

    /// Removes and returns the entry for `slot`.
    pub fn take(&mut self, slot: SlotId) -> Option<EmissionConfig> {
        self.entries.remove(&slot)
    }

    /// Whether `slot` has an entry.
    #[must_use]
    pub fn contains(&self, slot: SlotId) -> bool {
        self.entries.contains_key(&slot)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

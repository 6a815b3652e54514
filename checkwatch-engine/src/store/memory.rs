//! In-memory value store.

use std::collections::BTreeMap;

use checkwatch_types::{StoreEntry, StoreSnapshot};

use super::ValueStore;

/// A value store that lives only as long as the process.
///
/// Useful for tests and for callers that persist state themselves through
/// [`MemoryStore::snapshot`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoreEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoreEntry)> {
        self.entries.iter()
    }

    /// The versioned, serializable form of this store.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.entries.clone())
    }
}

impl From<StoreSnapshot> for MemoryStore {
    fn from(snapshot: StoreSnapshot) -> Self {
        Self {
            entries: snapshot.entries,
        }
    }
}

impl ValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoreEntry> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: &str, entry: StoreEntry) {
        self.entries.insert(key.to_string(), entry);
    }
}

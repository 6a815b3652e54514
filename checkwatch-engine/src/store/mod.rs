//! Value stores holding the previous sample of every counter.
//!
//! A store is owned by exactly one rate engine during a run. Entries are
//! created on first observation, overwritten on every observation and
//! never deleted.

mod file;
mod memory;

pub use file::{FileStore, StoreFormat};
pub use memory::MemoryStore;

use checkwatch_types::StoreEntry;

/// Durable key-value state surviving across runs.
pub trait ValueStore {
    /// The previous entry stored under `key`, if any.
    fn get(&self, key: &str) -> Option<StoreEntry>;

    /// Replace the entry stored under `key`.
    fn set(&mut self, key: &str, entry: StoreEntry);
}

impl<S: ValueStore + ?Sized> ValueStore for &mut S {
    fn get(&self, key: &str) -> Option<StoreEntry> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, entry: StoreEntry) {
        (**self).set(key, entry)
    }
}

impl<S: ValueStore + ?Sized> ValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<StoreEntry> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, entry: StoreEntry) {
        (**self).set(key, entry)
    }
}

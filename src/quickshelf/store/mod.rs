//! # Storage Layer
//!
//! Persistence for the item collection. Two pieces:
//!
//! - The [`KeyValue`] trait: the contract QuickShelf needs from a flat
//!   key-value area (`get`/`set` of strings). Abstracting it keeps the core
//!   testable with [`memory::InMemoryStore`] and leaves room for other
//!   backends without touching any logic above.
//! - [`ItemStore`]: the JSON codec over one fixed key. The whole collection
//!   is serialized as a single JSON array and overwritten on every save;
//!   there is no per-item record.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one file per key under a root
//!   directory, written atomically (temp file + rename)
//! - [`memory::InMemoryStore`]: in-memory storage for testing, no persistence
//!
//! ## Failure Behavior
//!
//! `save` either replaces the persisted value completely or leaves the
//! previous value intact; a reader never sees a half-written list. `load`
//! treats a missing, unreadable, or corrupt value as an empty collection —
//! an unreadable store is indistinguishable from "never used" and must not
//! stop the user from adding items. Those fallbacks are logged, not raised.

use crate::error::Result;
use crate::model::Item;

pub mod fs;
pub mod memory;

/// The single key the serialized collection lives under.
pub const STORAGE_KEY: &str = "quickshelf_items";

/// Abstract interface to a durable key-value area.
pub trait KeyValue {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// JSON persistence of the full item collection under [`STORAGE_KEY`].
pub struct ItemStore<K: KeyValue> {
    kv: K,
}

impl<K: KeyValue> ItemStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Serialize and overwrite the whole collection. On failure the previous
    /// persisted value is still intact.
    pub fn save(&mut self, items: &[Item]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.kv.set(STORAGE_KEY, &json)
    }

    /// The persisted collection. Missing, unreadable, and corrupt values all
    /// degrade to empty.
    pub fn load(&self) -> Vec<Item> {
        let json = match self.kv.get(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("could not read item store, starting empty: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&json) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("stored item list is corrupt, starting empty: {e}");
                Vec::new()
            }
        }
    }
}

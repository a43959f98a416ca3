//! Persistent key-value storage behind every directory.
//!
//! Each directory owns one fixed key and mirrors its whole collection there as
//! JSON after every mutation. Writes are best effort: a failure is logged and
//! the in-memory state stays authoritative.

pub mod memory;
pub mod schema;
pub mod sqlite;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage keys, one per directory plus the two session entries.
pub mod keys {
    pub const USERS: &str = "familyUsers";
    pub const PHOTOS: &str = "familyPhotos";
    pub const HERO: &str = "heroContent";
    pub const TIMELINE: &str = "timelineEvents";
    pub const SETTINGS: &str = "appSettings";
    pub const AUTH_FLAG: &str = "isFamilyAuth";
    pub const CURRENT_USER: &str = "currentUser";
}

/// A local string-to-string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
pub fn save<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Startup read that treats unreadable data as absent.
pub(crate) fn load_or_warn<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match load(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to load from store, using defaults");
            None
        }
    }
}

/// Write-through after a mutation. Never fails the caller.
pub(crate) fn persist<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = save(store, key, value) {
        tracing::warn!(key, error = %e, "failed to save to store");
    }
}

pub(crate) fn forget(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "failed to remove from store");
    }
}

//! Persistent key-value storage
//!
//! The timer treats storage as an opaque, asynchronous, best-effort
//! collaborator: string keys, JSON string values.

pub mod file_store;
pub mod memory_store;

use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Key holding the session log, most recent first
pub const SESSIONS_KEY: &str = "focus_sessions_v1";
/// Key holding the snapshot of a running timer
pub const TIMER_STATE_KEY: &str = "focus_timer_state_v1";

/// Asynchronous string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<(), StoreError>>;

    /// Delete a value. Removing a missing key succeeds.
    fn remove<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), StoreError>>;
}

/// Read and decode a JSON value
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value, replacing whatever was stored
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}

// Key-value storage
// Storage seam shared by the log store, the execution cache and the config store

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{HookdeskError, HookdeskResult};

/// String key-value storage scope.
///
/// Writes are synchronous. Implementations must be safe to share between
/// threads; callers hold them as `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> HookdeskResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> HookdeskResult<()>;

    fn remove(&self, key: &str) -> HookdeskResult<()>;
}

/// In-memory storage scope
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> HookdeskResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| HookdeskError::Storage(format!("Failed to read memory store: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> HookdeskResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| HookdeskError::Storage(format!("Failed to write memory store: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> HookdeskResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| HookdeskError::Storage(format!("Failed to write memory store: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

/// Decode a JSON value stored under `key`.
///
/// `Ok(None)` when nothing is stored, `Err(Corrupt)` when the stored text
/// does not decode as `T`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> HookdeskResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| HookdeskError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Encode `value` as JSON and store it under `key`
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> HookdeskResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

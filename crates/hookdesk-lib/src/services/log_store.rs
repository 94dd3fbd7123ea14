// Automation Log Store
// Bounded, newest-first history of webhook dispatch attempts

use chrono::Utc;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::error::{HookdeskError, HookdeskResult};
use crate::models::webhook_log::{NewWebhookLog, WebhookLogEntry, WebhookLogStats};
use crate::utils::store::{load_json, save_json, KeyValueStore};

/// Storage key for the persisted log list
pub const LOG_STORAGE_KEY: &str = "webhook_logs";

/// Maximum entries kept; the oldest are evicted first
pub const MAX_LOG_ENTRIES: usize = 500;

/// Receives one entry per dispatch attempt
pub trait LogSink: Send + Sync {
    fn record(&self, entry: NewWebhookLog) -> WebhookLogEntry;
}

/// Automation log backed by a session-scoped store
pub struct WebhookLogStore {
    storage: Arc<dyn KeyValueStore>,
    entries: RwLock<Vec<WebhookLogEntry>>,
    capacity: usize,
}

impl WebhookLogStore {
    /// Create the store, restoring a previously persisted list if present
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(storage, MAX_LOG_ENTRIES)
    }

    fn with_capacity(storage: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        let mut restored = match load_json::<Vec<WebhookLogEntry>>(storage.as_ref(), LOG_STORAGE_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                log::warn!("[webhook-log] Discarding persisted log: {}", e);
                Vec::new()
            }
        };
        restored.truncate(capacity);

        Self {
            storage,
            entries: RwLock::new(restored),
            capacity,
        }
    }

    /// Stamp, prepend and persist an entry
    pub fn add_log(&self, entry: NewWebhookLog) -> WebhookLogEntry {
        let stamped = WebhookLogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            url: entry.url,
            event_name: entry.event_name,
            payload_summary: entry.payload_summary,
            status_code: entry.status_code,
            response_summary: entry.response_summary,
            is_error: entry.is_error,
        };

        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("[webhook-log] Log lock poisoned, entry not kept: {}", e);
                return stamped;
            }
        };
        entries.insert(0, stamped.clone());
        entries.truncate(self.capacity);

        // Persist under the write lock; memory stays authoritative if the write fails
        if let Err(e) = save_json(self.storage.as_ref(), LOG_STORAGE_KEY, &*entries) {
            log::warn!("[webhook-log] Failed to persist log: {}", e);
        }
        drop(entries);

        stamped
    }

    /// Empty the list and remove the persisted copy
    pub fn clear_logs(&self) -> HookdeskResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| HookdeskError::Storage(format!("Log lock poisoned: {}", e)))?;
        entries.clear();
        self.storage.remove(LOG_STORAGE_KEY)?;
        drop(entries);
        log::info!("[webhook-log] Cleared automation log");
        Ok(())
    }

    /// Full list, newest first
    pub fn logs(&self) -> Vec<WebhookLogEntry> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-insensitive match on url, event name and summaries
    pub fn search(&self, query: &str) -> Vec<WebhookLogEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.logs();
        }

        self.logs()
            .into_iter()
            .filter(|entry| {
                entry.url.to_lowercase().contains(&needle)
                    || entry.event_name.to_lowercase().contains(&needle)
                    || entry.payload_summary.to_lowercase().contains(&needle)
                    || entry.response_summary.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<WebhookLogEntry> {
        self.logs().into_iter().filter(|entry| entry.is_error).collect()
    }

    pub fn stats(&self) -> WebhookLogStats {
        let entries = self.logs();
        let error_count = entries.iter().filter(|entry| entry.is_error).count();
        WebhookLogStats {
            total: entries.len(),
            success_count: entries.len() - error_count,
            error_count,
        }
    }
}

impl LogSink for WebhookLogStore {
    fn record(&self, entry: NewWebhookLog) -> WebhookLogEntry {
        self.add_log(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::store::MemoryStore;

    fn entry(event: &str, is_error: bool) -> NewWebhookLog {
        NewWebhookLog {
            url: "https://example.com/hook".to_string(),
            event_name: event.to_string(),
            payload_summary: "{\"foo\":\"bar\"}".to_string(),
            status_code: if is_error { None } else { Some(200) },
            response_summary: if is_error { "connection refused".into() } else { "ok".into() },
            is_error,
        }
    }

    #[test]
    fn test_add_log_prepends_and_stamps() {
        let store = WebhookLogStore::new(Arc::new(MemoryStore::new()));

        let first = store.add_log(entry("first", false));
        let second = store.add_log(entry("second", true));

        let logs = store.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].event_name, "second");
        assert_eq!(logs[1].event_name, "first");
        assert_ne!(first.id, second.id);
        assert!(!first.id.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = WebhookLogStore::new(Arc::new(MemoryStore::new()));

        for i in 0..=MAX_LOG_ENTRIES {
            store.add_log(entry(&format!("event-{}", i), false));
        }

        let logs = store.logs();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].event_name, format!("event-{}", MAX_LOG_ENTRIES));
        assert_eq!(logs[MAX_LOG_ENTRIES - 1].event_name, "event-1");
        assert!(logs.iter().all(|e| e.event_name != "event-0"));
    }

    #[test]
    fn test_persists_and_restores() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        {
            let store = WebhookLogStore::new(storage.clone());
            store.add_log(entry("kept", false));
        }

        let restored = WebhookLogStore::new(storage);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.logs()[0].event_name, "kept");
    }

    #[test]
    fn test_concurrent_adds_keep_stored_copy_complete() {
        for _ in 0..100 {
            let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
            let store = Arc::new(WebhookLogStore::new(storage.clone()));

            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let store = store.clone();
                    std::thread::spawn(move || {
                        store.add_log(entry(&format!("event-{}", i), false));
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let stored: Vec<WebhookLogEntry> =
                load_json(storage.as_ref(), LOG_STORAGE_KEY).unwrap().unwrap();
            assert_eq!(stored.len(), store.len());
            assert_eq!(stored, store.logs());
        }
    }

    #[test]
    fn test_clear_removes_persisted_copy() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let store = WebhookLogStore::new(storage.clone());
        store.add_log(entry("gone", false));
        assert!(storage.get(LOG_STORAGE_KEY).unwrap().is_some());

        store.clear_logs().unwrap();

        assert!(store.is_empty());
        assert!(storage.get(LOG_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_persisted_log_is_discarded() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(LOG_STORAGE_KEY, "[{\"broken\":").unwrap();

        let store = WebhookLogStore::new(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_search_failures_and_stats() {
        let store = WebhookLogStore::new(Arc::new(MemoryStore::new()));
        store.add_log(entry("lead.created", false));
        store.add_log(entry("payment.link", true));
        store.add_log(entry("lead.updated", false));

        assert_eq!(store.search("LEAD").len(), 2);
        assert_eq!(store.search("refused").len(), 1);
        assert_eq!(store.search("  ").len(), 3);
        assert_eq!(store.failures().len(), 1);

        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.error_count, 1);
    }
}

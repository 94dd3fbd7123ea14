// Configuration Store
// In-memory webhook settings, persisted on every change and observable by subscribers

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::watch;

use crate::error::{HookdeskError, HookdeskResult};
use crate::models::config::{
    AutomationChannel, ChannelReadiness, ConfigField, ConnectionStatus, ConnectionTestState,
    ReadinessIssue, WebhookConfig, WebhookConfigPatch,
};
use crate::utils::store::{load_json, save_json, KeyValueStore};

/// Storage key for the flat configuration record
pub const CONFIG_STORAGE_KEY: &str = "webhook_config";

pub struct ConfigStore {
    storage: Arc<dyn KeyValueStore>,
    current: watch::Sender<WebhookConfig>,
    /// Held across read, merge, save and publish
    update_lock: Mutex<()>,
    test_states: RwLock<HashMap<ConfigField, ConnectionTestState>>,
}

impl ConfigStore {
    /// Load the persisted record; absent or corrupt data starts from defaults
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let config = match load_json::<WebhookConfig>(storage.as_ref(), CONFIG_STORAGE_KEY) {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                log::warn!("[config] Using default configuration: {}", e);
                WebhookConfig::default()
            }
        };

        let (current, _) = watch::channel(config);

        Self {
            storage,
            current,
            update_lock: Mutex::new(()),
            test_states: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of the current record
    pub fn config(&self) -> WebhookConfig {
        self.current.borrow().clone()
    }

    /// Receiver notified after every successful change
    pub fn subscribe(&self) -> watch::Receiver<WebhookConfig> {
        self.current.subscribe()
    }

    /// Shallow-merge `patch`, persist, then publish.
    ///
    /// Connection-test state of every field carried by the patch resets to
    /// idle.
    pub fn set_config(&self, patch: WebhookConfigPatch) -> HookdeskResult<WebhookConfig> {
        let _guard = self
            .update_lock
            .lock()
            .map_err(|e| HookdeskError::Storage(format!("Config lock poisoned: {}", e)))?;

        let mut next = self.config();
        let touched = patch.apply(&mut next);
        if touched.is_empty() {
            return Ok(next);
        }

        save_json(self.storage.as_ref(), CONFIG_STORAGE_KEY, &next)?;
        self.current.send_replace(next.clone());

        if let Ok(mut states) = self.test_states.write() {
            for field in &touched {
                states.remove(field);
            }
        }

        log::info!(
            "[config] Updated {} field(s): {}",
            touched.len(),
            touched
                .iter()
                .map(ConfigField::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(next)
    }

    /// Restore defaults and drop the persisted copy
    pub fn reset(&self) -> HookdeskResult<()> {
        let _guard = self
            .update_lock
            .lock()
            .map_err(|e| HookdeskError::Storage(format!("Config lock poisoned: {}", e)))?;

        self.storage.remove(CONFIG_STORAGE_KEY)?;
        self.current.send_replace(WebhookConfig::default());
        if let Ok(mut states) = self.test_states.write() {
            states.clear();
        }
        log::info!("[config] Configuration reset to defaults");
        Ok(())
    }

    pub fn is_field_configured(&self, field: ConfigField) -> bool {
        self.current.borrow().is_field_configured(field)
    }

    /// Same check by wire name; unknown names are not configured
    pub fn is_field_name_configured(&self, name: &str) -> bool {
        name.parse::<ConfigField>()
            .map(|field| self.is_field_configured(field))
            .unwrap_or(false)
    }

    /// Single readiness check for a channel.
    ///
    /// Reasons are reported in order: endpoint, key, enable flag.
    pub fn readiness(&self, channel: AutomationChannel) -> ChannelReadiness {
        let config = self.current.borrow();

        let issue = if !config.is_field_configured(channel.endpoint_field()) {
            Some(ReadinessIssue::MissingEndpoint)
        } else if channel
            .key_field()
            .is_some_and(|key| !config.is_field_configured(key))
        {
            Some(ReadinessIssue::MissingKey)
        } else if !config.flag(channel.enabled_field()) {
            Some(ReadinessIssue::Disabled)
        } else {
            None
        };

        ChannelReadiness {
            channel,
            ready: issue.is_none(),
            issue,
        }
    }

    /// Trimmed endpoint URL for a channel
    pub fn endpoint(&self, channel: AutomationChannel) -> String {
        self.current
            .borrow()
            .text(channel.endpoint_field())
            .trim()
            .to_string()
    }

    /// Channel key when the channel has one, otherwise the shared token
    pub fn bearer_token(&self, channel: AutomationChannel) -> Option<String> {
        let config = self.current.borrow();
        let token = match channel.key_field() {
            Some(key) => config.text(key),
            None => config.auth_token.clone(),
        };
        let token = token.trim().to_string();
        (!token.is_empty()).then_some(token)
    }

    // ========================================================================
    // Connection test state
    // ========================================================================

    pub fn connection_test_state(&self, field: ConfigField) -> ConnectionTestState {
        self.test_states
            .read()
            .ok()
            .and_then(|states| states.get(&field).copied())
            .unwrap_or_default()
    }

    /// idle/success/error -> testing
    pub fn begin_connection_test(&self, field: ConfigField) {
        if let Ok(mut states) = self.test_states.write() {
            states.insert(field, ConnectionTestState::Testing);
        }
    }

    /// testing -> success/error. Ignored when the field was edited meanwhile.
    pub fn finish_connection_test(&self, field: ConfigField, status: ConnectionStatus) {
        if let Ok(mut states) = self.test_states.write() {
            if states.get(&field) != Some(&ConnectionTestState::Testing) {
                log::debug!("[config] Dropping stale connection test result for {}", field);
                return;
            }
            let next = match status {
                ConnectionStatus::Connected => ConnectionTestState::Success,
                ConnectionStatus::Error => ConnectionTestState::Error,
            };
            states.insert(field, next);
        }
    }
}

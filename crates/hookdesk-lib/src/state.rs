// Application state
// Services shared by every command, wired over one storage backend

use std::sync::Arc;

use crate::error::{HookdeskError, HookdeskResult};
use crate::repositories::StorageRepository;
use crate::services::webhook_sender::http_client;
use crate::services::{
    ConfigStore, WebhookDispatcher, WebhookLogStore, WebhookSender, WorkflowExecutionCache,
    WorkflowRunner,
};
use crate::utils::database::{open_default_database, Database};
use crate::utils::store::{KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub logs: Arc<WebhookLogStore>,
    pub executions: Arc<WorkflowExecutionCache>,
    pub sender: Arc<WebhookSender>,
    pub runner: Arc<WorkflowRunner>,
}

impl AppState {
    /// Wire the services over a local scope (config, executions) and a
    /// session scope (automation log)
    pub fn with_storage(
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        client: reqwest::Client,
    ) -> Self {
        let config = Arc::new(ConfigStore::new(local.clone()));
        let logs = Arc::new(WebhookLogStore::new(session));
        let executions = Arc::new(WorkflowExecutionCache::new(local));
        let sender = Arc::new(WebhookSender::with_client(client, logs.clone()));
        let dispatcher: Arc<dyn WebhookDispatcher> = sender.clone();
        let runner = Arc::new(WorkflowRunner::new(
            config.clone(),
            dispatcher,
            executions.clone(),
        ));

        Self {
            config,
            logs,
            executions,
            sender,
            runner,
        }
    }

    /// Nothing persisted beyond the process
    pub fn in_memory() -> HookdeskResult<Self> {
        Ok(Self::with_storage(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            http_client()?,
        ))
    }

    /// Both scopes in `db`
    pub fn open(db: Database) -> HookdeskResult<Self> {
        log::info!("[storage] Using database at {}", db.path().display());
        Ok(Self::with_storage(
            Arc::new(StorageRepository::local(db.clone())),
            Arc::new(StorageRepository::session(db)),
            http_client()?,
        ))
    }

    /// Database in the application data directory
    pub fn open_default() -> HookdeskResult<Self> {
        let db = open_default_database().map_err(HookdeskError::Storage)?;
        Self::open(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{WebhookConfig, WebhookConfigPatch};
    use crate::models::webhook_log::NewWebhookLog;
    use tempfile::tempdir;

    fn entry() -> NewWebhookLog {
        NewWebhookLog {
            url: "https://example.com/hook".to_string(),
            event_name: "lead.created".to_string(),
            payload_summary: "{}".to_string(),
            status_code: Some(200),
            response_summary: "ok".to_string(),
            is_error: false,
        }
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hookdesk.db");

        {
            let state = AppState::open(Database::new(path.clone()).unwrap()).unwrap();
            state
                .config
                .set_config(WebhookConfigPatch {
                    auth_token: Some("token".to_string()),
                    ..Default::default()
                })
                .unwrap();
            state.logs.add_log(entry());
        }

        let state = AppState::open(Database::new(path).unwrap()).unwrap();
        assert_eq!(state.config.config().auth_token, "token");
        assert_eq!(state.logs.len(), 1);
    }

    #[test]
    fn test_in_memory_starts_empty() {
        let state = AppState::in_memory().unwrap();
        assert!(state.logs.is_empty());
        assert_eq!(state.config.config(), WebhookConfig::default());
    }
}

// Per-Workflow Execution Cache
// Last-write-wins slot per workflow name

use std::sync::Arc;

use crate::error::HookdeskResult;
use crate::models::workflow::WorkflowExecution;
use crate::utils::store::{load_json, save_json, KeyValueStore};

/// Storage key suffix for a workflow's last execution
pub const LAST_EXECUTION_SUFFIX: &str = "_lastExecution";

/// Storage key for `workflow_name`
pub fn execution_key(workflow_name: &str) -> String {
    format!("{}{}", workflow_name, LAST_EXECUTION_SUFFIX)
}

/// Last execution per workflow, persisted in local storage
pub struct WorkflowExecutionCache {
    storage: Arc<dyn KeyValueStore>,
}

impl WorkflowExecutionCache {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Overwrite the slot for `workflow_name`
    pub fn save_workflow_execution(
        &self,
        workflow_name: &str,
        execution: &WorkflowExecution,
    ) -> HookdeskResult<()> {
        save_json(self.storage.as_ref(), &execution_key(workflow_name), execution)?;
        log::debug!(
            "[workflow] Saved last execution for '{}' ({:?})",
            workflow_name,
            execution.result.status
        );
        Ok(())
    }

    /// Typed read: `Ok(None)` when absent, `Err(Corrupt)` when undecodable
    pub fn load_last_workflow_execution(
        &self,
        workflow_name: &str,
    ) -> HookdeskResult<Option<WorkflowExecution>> {
        load_json(self.storage.as_ref(), &execution_key(workflow_name))
    }

    /// Last execution, or `None` if absent or corrupt
    pub fn get_last_workflow_execution(&self, workflow_name: &str) -> Option<WorkflowExecution> {
        match self.load_last_workflow_execution(workflow_name) {
            Ok(execution) => execution,
            Err(e) => {
                log::warn!(
                    "[workflow] Ignoring unreadable execution for '{}': {}",
                    workflow_name,
                    e
                );
                None
            }
        }
    }
}

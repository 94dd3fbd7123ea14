// Workflow data models
// Named, manually triggered business actions and their last execution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::config::AutomationChannel;

/// Status of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Success,
    Error,
    Pending,
}

/// Outcome reported for one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub action_id: String,
    pub status: WorkflowStatus,
    pub message: String,
    pub data_logged: bool,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

/// Last execution of a workflow, one slot per workflow name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub timestamp: DateTime<Utc>,
    pub result: WorkflowResult,
}

impl WorkflowExecution {
    pub fn new(result: WorkflowResult) -> Self {
        Self {
            timestamp: Utc::now(),
            result,
        }
    }
}

/// A workflow the dashboard can run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub name: String,
    pub description: String,
    pub channel: AutomationChannel,
    pub event_name: String,
    /// Base payload; caller data is merged over it
    pub payload: serde_json::Value,
}

impl WorkflowDefinition {
    pub fn new(
        name: &str,
        description: &str,
        channel: AutomationChannel,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            channel,
            event_name: event_name.to_string(),
            payload,
        }
    }
}

/// Workflow card data: definition plus its last run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub workflow: WorkflowDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_execution: Option<WorkflowExecution>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_wire_shape() {
        let execution = WorkflowExecution::new(WorkflowResult {
            action_id: "a-1".to_string(),
            status: WorkflowStatus::Pending,
            message: "queued".to_string(),
            data_logged: false,
            next_steps: vec!["wait".to_string()],
        });

        let json = serde_json::to_value(&execution).unwrap();
        assert_eq!(json["result"]["action_id"], "a-1");
        assert_eq!(json["result"]["status"], "pending");
        assert_eq!(json["result"]["data_logged"], false);
        assert_eq!(json["result"]["next_steps"][0], "wait");
        assert!(json["timestamp"].is_string());
    }
}

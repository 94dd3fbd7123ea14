// Workflow commands
// Run catalog workflows and read their last execution

use serde_json::Value;

use crate::models::workflow::{WorkflowExecution, WorkflowSummary};
use crate::services::workflow_runner::{catalog, find_workflow};
use crate::state::AppState;

/// Run a workflow by name. A channel that is not ready still returns an
/// execution, with status `error`.
pub async fn run_workflow(
    state: &AppState,
    name: String,
    data: Option<Value>,
) -> Result<WorkflowExecution, String> {
    let workflow = find_workflow(&name)?;
    Ok(state.runner.run(&workflow, data).await?)
}

/// Catalog with each workflow's last execution
pub async fn list_workflows(state: &AppState) -> Result<Vec<WorkflowSummary>, String> {
    Ok(catalog()
        .into_iter()
        .map(|workflow| {
            let last_execution = state.executions.get_last_workflow_execution(&workflow.name);
            WorkflowSummary {
                workflow,
                last_execution,
            }
        })
        .collect())
}

pub async fn get_last_workflow_execution(
    state: &AppState,
    name: String,
) -> Result<Option<WorkflowExecution>, String> {
    Ok(state.executions.get_last_workflow_execution(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::WebhookConfigPatch;
    use crate::models::workflow::WorkflowStatus;
    use crate::test_support::{direct_client, spawn_endpoint};
    use crate::utils::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::with_storage(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            direct_client(),
        )
    }

    #[tokio::test]
    async fn test_run_and_list() {
        let state = state();
        let endpoint = spawn_endpoint(201, "created").await;
        state
            .config
            .set_config(WebhookConfigPatch {
                email_webhook_url: Some(endpoint.url.clone()),
                email_api_key: Some("mail".into()),
                email_automation_enabled: Some(true),
                ..Default::default()
            })
            .unwrap();

        let execution = run_workflow(
            &state,
            "Client Onboarding Email".into(),
            Some(json!({"to": "client@example.com"})),
        )
        .await
        .unwrap();
        assert_eq!(execution.result.status, WorkflowStatus::Success);

        let summaries = list_workflows(&state).await.unwrap();
        assert_eq!(summaries.len(), catalog().len());
        let onboarding = summaries
            .iter()
            .find(|s| s.workflow.name == "Client Onboarding Email")
            .unwrap();
        assert_eq!(onboarding.last_execution.as_ref(), Some(&execution));
        assert!(summaries
            .iter()
            .filter(|s| s.workflow.name != "Client Onboarding Email")
            .all(|s| s.last_execution.is_none()));

        assert_eq!(
            get_last_workflow_execution(&state, "Client Onboarding Email".into())
                .await
                .unwrap(),
            Some(execution)
        );
    }

    #[tokio::test]
    async fn test_unknown_workflow() {
        let state = state();
        let err = run_workflow(&state, "Launch Rockets".into(), None)
            .await
            .unwrap_err();
        assert_eq!(err, "Workflow not found: Launch Rockets");
        assert_eq!(
            get_last_workflow_execution(&state, "Launch Rockets".into())
                .await
                .unwrap(),
            None
        );
    }
}

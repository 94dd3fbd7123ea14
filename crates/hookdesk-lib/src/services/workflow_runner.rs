// Workflow Runner
// Runs a catalog workflow: readiness check, dispatch, last-execution record

use serde_json::{json, Map, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{HookdeskError, HookdeskResult};
use crate::models::config::{AutomationChannel, ReadinessIssue};
use crate::models::workflow::{
    WorkflowDefinition, WorkflowExecution, WorkflowResult, WorkflowStatus,
};
use crate::services::config_store::ConfigStore;
use crate::services::execution_cache::WorkflowExecutionCache;
use crate::services::webhook_sender::{WebhookDispatcher, WebhookRequest};

/// Workflows offered on the dashboard
pub fn catalog() -> Vec<WorkflowDefinition> {
    vec![
        WorkflowDefinition::new(
            "New Lead Submission",
            "Forward a captured lead to the lead intake endpoint",
            AutomationChannel::Leads,
            "lead.created",
            json!({ "source": "dashboard", "stage": "new" }),
        ),
        WorkflowDefinition::new(
            "Payment Link Created",
            "Ask the payment provider to issue a payment link",
            AutomationChannel::Payments,
            "payment.link_created",
            json!({ "currency": "USD", "provider": "default" }),
        ),
        WorkflowDefinition::new(
            "Client Onboarding Email",
            "Send the onboarding email sequence to a new client",
            AutomationChannel::Email,
            "email.onboarding",
            json!({ "template": "client_onboarding" }),
        ),
        WorkflowDefinition::new(
            "WhatsApp Follow-up",
            "Queue a WhatsApp follow-up message",
            AutomationChannel::Whatsapp,
            "whatsapp.follow_up",
            json!({ "template": "follow_up" }),
        ),
        WorkflowDefinition::new(
            "Team Slack Alert",
            "Post an alert to the team Slack channel",
            AutomationChannel::Slack,
            "slack.alert",
            json!({ "text": "New activity on the dashboard" }),
        ),
        WorkflowDefinition::new(
            "CRM Contact Sync",
            "Push dashboard contacts to the CRM",
            AutomationChannel::CrmSync,
            "crm.contact_sync",
            json!({ "mode": "incremental" }),
        ),
        WorkflowDefinition::new(
            "Weekly Analytics Report",
            "Request the weekly analytics report",
            AutomationChannel::Analytics,
            "analytics.weekly_report",
            json!({ "period": "weekly" }),
        ),
    ]
}

/// Look up a catalog workflow by exact name
pub fn find_workflow(name: &str) -> HookdeskResult<WorkflowDefinition> {
    catalog()
        .into_iter()
        .find(|workflow| workflow.name == name)
        .ok_or_else(|| HookdeskError::WorkflowNotFound(name.to_string()))
}

/// Body sent for a run: base payload, caller data on top, then identity fields
pub fn build_payload(workflow: &WorkflowDefinition, extra: Option<Value>) -> Value {
    let mut payload = match &workflow.payload {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other.clone());
            map
        }
    };

    match extra {
        Some(Value::Object(extra)) => payload.extend(extra),
        Some(Value::Null) | None => {}
        Some(other) => {
            payload.insert("data".to_string(), other);
        }
    }

    payload.insert("event".to_string(), Value::from(workflow.event_name.clone()));
    payload.insert("workflow".to_string(), Value::from(workflow.name.clone()));
    Value::Object(payload)
}

fn not_ready_step(channel: AutomationChannel, issue: ReadinessIssue) -> String {
    match issue {
        ReadinessIssue::MissingEndpoint => {
            format!("Set {} in the webhook settings", channel.endpoint_field())
        }
        ReadinessIssue::MissingKey => match channel.key_field() {
            Some(key) => format!("Set {} in the webhook settings", key),
            None => "Add the API key for this channel".to_string(),
        },
        ReadinessIssue::Disabled => {
            format!("Turn on {} in the webhook settings", channel.enabled_field())
        }
    }
}

pub struct WorkflowRunner {
    config: Arc<ConfigStore>,
    dispatcher: Arc<dyn WebhookDispatcher>,
    executions: Arc<WorkflowExecutionCache>,
}

impl WorkflowRunner {
    pub fn new(
        config: Arc<ConfigStore>,
        dispatcher: Arc<dyn WebhookDispatcher>,
        executions: Arc<WorkflowExecutionCache>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            executions,
        }
    }

    /// Run `workflow` once and record the outcome as its last execution.
    ///
    /// A channel that is not ready produces an error execution without any
    /// dispatch. Concurrent runs are independent.
    pub async fn run(
        &self,
        workflow: &WorkflowDefinition,
        extra: Option<Value>,
    ) -> HookdeskResult<WorkflowExecution> {
        let channel = workflow.channel;
        let action_id = Uuid::new_v4().to_string();

        let readiness = self.config.readiness(channel);
        if let Some(issue) = readiness.issue {
            log::warn!(
                "[workflow] '{}' skipped: channel {} is {}",
                workflow.name,
                channel,
                issue
            );

            let execution = WorkflowExecution::new(WorkflowResult {
                action_id,
                status: WorkflowStatus::Error,
                message: format!(
                    "{} was not sent: channel '{}' is not ready ({})",
                    workflow.name, channel, issue
                ),
                data_logged: false,
                next_steps: vec![not_ready_step(channel, issue)],
            });
            self.executions
                .save_workflow_execution(&workflow.name, &execution)?;
            return Ok(execution);
        }

        log::info!("[workflow] Running '{}' ({})", workflow.name, action_id);

        let request = WebhookRequest::new(
            &self.config.endpoint(channel),
            &workflow.event_name,
            build_payload(workflow, extra),
        )
        .with_bearer_token(self.config.bearer_token(channel));

        let dispatch = self.dispatcher.dispatch(request).await;

        let result = if dispatch.ok {
            WorkflowResult {
                action_id,
                status: WorkflowStatus::Success,
                message: match dispatch.status {
                    Some(status) => format!("{} sent (HTTP {})", workflow.name, status),
                    None => format!("{} sent", workflow.name),
                },
                data_logged: true,
                next_steps: vec!["Review the delivery in the automation log".to_string()],
            }
        } else {
            let reason = match dispatch.status {
                Some(status) => format!("HTTP {}", status),
                None => dispatch.body.clone(),
            };
            WorkflowResult {
                action_id,
                status: WorkflowStatus::Error,
                message: format!("{} failed: {}", workflow.name, reason),
                data_logged: false,
                next_steps: vec![
                    format!("Test the connection to {}", channel.endpoint_field()),
                    "Run the workflow again once the endpoint responds".to_string(),
                ],
            }
        };

        log::info!(
            "[workflow] '{}' finished: {:?}",
            workflow.name,
            result.status
        );

        let execution = WorkflowExecution::new(result);
        self.executions
            .save_workflow_execution(&workflow.name, &execution)?;
        Ok(execution)
    }

    /// Look up `name` in the catalog and run it
    pub async fn run_by_name(
        &self,
        name: &str,
        extra: Option<Value>,
    ) -> HookdeskResult<WorkflowExecution> {
        let workflow = find_workflow(name)?;
        self.run(&workflow, extra).await
    }
}

use std::time::Instant;

use hookdesk_lib::commands::{config, webhook, workflow};
use hookdesk_lib::models::config::{ConfigField, ConfigValue, WebhookConfig};
use hookdesk_lib::models::webhook_log::WebhookLogEntry;
use hookdesk_lib::models::workflow::WorkflowExecution;
use hookdesk_lib::utils::text::mask_secret;
use hookdesk_lib::AppState;

use crate::cli::{Commands, ConfigAction};

pub struct CommandRunner {
    state: AppState,
}

impl CommandRunner {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn run_command(&self, command: Commands) -> Result<(), String> {
        let start = Instant::now();

        let result = match command {
            Commands::Run { workflow, data } => self.run_workflow(workflow, data).await,
            Commands::Test { url, field } => self.test_connection(url, field).await,
            Commands::Logs {
                search,
                errors,
                clear,
            } => self.logs(search, errors, clear).await,
            Commands::Config { action } => self.config(action).await,
            Commands::Last { workflow } => self.last_execution(workflow).await,
            Commands::Workflows => self.list_workflows().await,
        };

        log::debug!("Command completed in {:.2}s", start.elapsed().as_secs_f64());
        result
    }

    async fn run_workflow(&self, name: String, data: Option<String>) -> Result<(), String> {
        let data = data
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|e| format!("--data is not valid JSON: {}", e))?;

        let execution = workflow::run_workflow(&self.state, name, data).await?;
        print_execution(&execution);
        Ok(())
    }

    async fn test_connection(&self, url: String, field: Option<String>) -> Result<(), String> {
        let result = config::test_webhook_connection(&self.state, url, field).await?;
        println!(
            "{:?} in {}ms{}{}",
            result.status,
            result.response_time_ms,
            result
                .status_code
                .map(|code| format!(" (HTTP {})", code))
                .unwrap_or_default(),
            result
                .error
                .map(|error| format!(": {}", error))
                .unwrap_or_default(),
        );
        Ok(())
    }

    async fn logs(&self, search: Option<String>, errors: bool, clear: bool) -> Result<(), String> {
        if clear {
            webhook::clear_webhook_logs(&self.state).await?;
            println!("Automation log cleared");
            return Ok(());
        }

        let mut entries = match search {
            Some(query) => webhook::search_webhook_logs(&self.state, query).await?,
            None => webhook::get_webhook_logs(&self.state).await?,
        };
        if errors {
            entries.retain(|entry| entry.is_error);
        }

        for entry in &entries {
            print_log_entry(entry);
        }

        let stats = webhook::get_webhook_log_stats(&self.state).await?;
        println!(
            "{} shown, {} total ({} ok, {} failed)",
            entries.len(),
            stats.total,
            stats.success_count,
            stats.error_count
        );
        Ok(())
    }

    async fn config(&self, action: ConfigAction) -> Result<(), String> {
        match action {
            ConfigAction::Show => {
                let current = config::get_webhook_config(&self.state).await?;
                print_config(&current);
            }
            ConfigAction::Set { field, value } => {
                let updated =
                    config::set_webhook_config_field(&self.state, field.clone(), value).await?;
                let field: ConfigField = field.parse()?;
                println!("{} = {}", field, display_value(field, updated.get(field)));
            }
            ConfigAction::Reset => {
                config::reset_webhook_config(&self.state).await?;
                println!("Webhook settings reset to defaults");
            }
            ConfigAction::Check => {
                for readiness in config::check_channel_readiness(&self.state, None).await? {
                    match readiness.issue {
                        None => println!("{:<10} ready", readiness.channel),
                        Some(issue) => println!("{:<10} {}", readiness.channel, issue),
                    }
                }
            }
        }
        Ok(())
    }

    async fn last_execution(&self, name: String) -> Result<(), String> {
        match workflow::get_last_workflow_execution(&self.state, name.clone()).await? {
            Some(execution) => print_execution(&execution),
            None => println!("'{}' has not run yet", name),
        }
        Ok(())
    }

    async fn list_workflows(&self) -> Result<(), String> {
        for summary in workflow::list_workflows(&self.state).await? {
            let last = summary
                .last_execution
                .map(|execution| {
                    format!(
                        "{:?} at {}",
                        execution.result.status,
                        execution.timestamp.to_rfc3339()
                    )
                })
                .unwrap_or_else(|| "never run".to_string());
            println!(
                "{:<26} [{}] {} ({})",
                summary.workflow.name, summary.workflow.channel, summary.workflow.description, last
            );
        }
        Ok(())
    }
}

fn display_value(field: ConfigField, value: ConfigValue) -> String {
    match value {
        ConfigValue::Flag(flag) => flag.to_string(),
        ConfigValue::Text(text) if field.is_secret() => mask_secret(&text),
        ConfigValue::Text(text) => text,
    }
}

fn print_config(config: &WebhookConfig) {
    for field in ConfigField::ALL {
        println!("{:<28} {}", field, display_value(field, config.get(field)));
    }
}

fn print_execution(execution: &WorkflowExecution) {
    let result = &execution.result;
    println!(
        "{:?}: {} (action {}, {})",
        result.status,
        result.message,
        result.action_id,
        execution.timestamp.to_rfc3339()
    );
    for step in &result.next_steps {
        println!("  - {}", step);
    }
}

fn print_log_entry(entry: &WebhookLogEntry) {
    println!(
        "{} {} {} {} -> {}",
        entry.timestamp.to_rfc3339(),
        if entry.is_error { "ERR" } else { "OK " },
        entry
            .status_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "---".to_string()),
        entry.event_name,
        entry.url
    );
    if entry.is_error && !entry.response_summary.is_empty() {
        println!("    {}", entry.response_summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_are_masked() {
        assert_eq!(
            display_value(ConfigField::AuthToken, ConfigValue::Text("abcdefgh".into())),
            "****efgh"
        );
        assert_eq!(
            display_value(ConfigField::LeadWebhookUrl, ConfigValue::Text("https://x".into())),
            "https://x"
        );
        assert_eq!(
            display_value(ConfigField::CrmSyncEnabled, ConfigValue::Flag(true)),
            "true"
        );
    }

    #[tokio::test]
    async fn test_unready_workflow_still_succeeds_as_command() {
        let runner = CommandRunner::new(AppState::in_memory().unwrap());
        let result = runner
            .run_command(Commands::Run {
                workflow: "Team Slack Alert".to_string(),
                data: None,
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bad_data_is_rejected() {
        let runner = CommandRunner::new(AppState::in_memory().unwrap());
        let err = runner
            .run_command(Commands::Run {
                workflow: "Team Slack Alert".to_string(),
                data: Some("{oops".to_string()),
            })
            .await
            .unwrap_err();
        assert!(err.contains("--data"));
    }
}

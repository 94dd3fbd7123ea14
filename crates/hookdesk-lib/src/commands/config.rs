// Webhook configuration commands
// Read, edit and test the webhook settings

use crate::models::config::{
    AutomationChannel, ChannelReadiness, ConfigField, ConnectionStatus, ConnectionTestResult,
    ConnectionTestState, WebhookConfig, WebhookConfigPatch,
};
use crate::services::connection_test::test_connection;
use crate::state::AppState;

/// Get the current webhook configuration
pub async fn get_webhook_config(state: &AppState) -> Result<WebhookConfig, String> {
    Ok(state.config.config())
}

/// Merge a partial configuration and return the result
pub async fn update_webhook_config(
    state: &AppState,
    patch: WebhookConfigPatch,
) -> Result<WebhookConfig, String> {
    Ok(state.config.set_config(patch)?)
}

/// Set one field from its raw text form
pub async fn set_webhook_config_field(
    state: &AppState,
    field: String,
    value: String,
) -> Result<WebhookConfig, String> {
    let field: ConfigField = field.parse()?;
    let patch = WebhookConfigPatch::from_field(field, &value)?;
    Ok(state.config.set_config(patch)?)
}

/// Restore every field to its default and forget test states
pub async fn reset_webhook_config(state: &AppState) -> Result<WebhookConfig, String> {
    state.config.reset()?;
    Ok(state.config.config())
}

pub async fn is_field_configured(state: &AppState, field: String) -> Result<bool, String> {
    Ok(state.config.is_field_name_configured(&field))
}

/// Readiness of one channel, or of every channel when none is given
pub async fn check_channel_readiness(
    state: &AppState,
    channel: Option<String>,
) -> Result<Vec<ChannelReadiness>, String> {
    match channel {
        Some(name) => {
            let channel: AutomationChannel = name.parse()?;
            Ok(vec![state.config.readiness(channel)])
        }
        None => Ok(AutomationChannel::ALL
            .iter()
            .map(|channel| state.config.readiness(*channel))
            .collect()),
    }
}

/// POST a test payload to `url`.
///
/// When `field` names the endpoint being edited, its test state moves
/// through testing to success or error.
pub async fn test_webhook_connection(
    state: &AppState,
    url: String,
    field: Option<String>,
) -> Result<ConnectionTestResult, String> {
    let field = field.map(|name| name.parse::<ConfigField>()).transpose()?;

    if let Some(field) = field {
        state.config.begin_connection_test(field);
    }

    let result = match url::Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
            test_connection(state.sender.client(), parsed.as_str()).await
        }
        Ok(parsed) => invalid_url_result(format!("Unsupported scheme: {}", parsed.scheme())),
        Err(e) => invalid_url_result(format!("Invalid URL: {}", e)),
    };

    if let Some(field) = field {
        state.config.finish_connection_test(field, result.status);
    }

    Ok(result)
}

fn invalid_url_result(error: String) -> ConnectionTestResult {
    log::warn!("[config] Connection test skipped: {}", error);
    ConnectionTestResult {
        status: ConnectionStatus::Error,
        status_code: None,
        error: Some(error),
        response_time_ms: 0,
    }
}

pub async fn get_connection_test_state(
    state: &AppState,
    field: String,
) -> Result<ConnectionTestState, String> {
    let field: ConfigField = field.parse()?;
    Ok(state.config.connection_test_state(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ReadinessIssue;
    use crate::test_support::{direct_client, spawn_endpoint};
    use crate::utils::store::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::with_storage(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            direct_client(),
        )
    }

    #[tokio::test]
    async fn test_update_and_read_back() {
        let state = state();
        let patch: WebhookConfigPatch =
            serde_json::from_str(r#"{"slackWebhookUrl":"https://hooks.slack.test"}"#).unwrap();

        update_webhook_config(&state, patch).await.unwrap();
        set_webhook_config_field(&state, "slackNotificationsEnabled".into(), "on".into())
            .await
            .unwrap();

        let config = get_webhook_config(&state).await.unwrap();
        assert_eq!(config.slack_webhook_url, "https://hooks.slack.test");
        assert!(config.slack_notifications_enabled);
        assert!(is_field_configured(&state, "slackWebhookUrl".into()).await.unwrap());
        assert!(!is_field_configured(&state, "madeUp".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_reset_clears_settings() {
        let state = state();
        set_webhook_config_field(&state, "authToken".into(), "secret".into())
            .await
            .unwrap();

        let config = reset_webhook_config(&state).await.unwrap();

        assert_eq!(config, WebhookConfig::default());
        assert!(!is_field_configured(&state, "authToken".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_field_errors_are_strings() {
        let state = state();

        let err = set_webhook_config_field(&state, "madeUp".into(), "x".into())
            .await
            .unwrap_err();
        assert!(err.contains("madeUp"));

        let err = set_webhook_config_field(&state, "crmSyncEnabled".into(), "maybe".into())
            .await
            .unwrap_err();
        assert!(err.contains("crmSyncEnabled"));
    }

    #[tokio::test]
    async fn test_readiness_for_all_channels() {
        let state = state();

        let all = check_channel_readiness(&state, None).await.unwrap();
        assert_eq!(all.len(), AutomationChannel::ALL.len());
        assert!(all
            .iter()
            .all(|r| r.issue == Some(ReadinessIssue::MissingEndpoint)));

        let one = check_channel_readiness(&state, Some("email".into()))
            .await
            .unwrap();
        assert_eq!(one[0].channel, AutomationChannel::Email);

        assert!(check_channel_readiness(&state, Some("fax".into()))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_connection_updates_field_state() {
        let state = state();
        let endpoint = spawn_endpoint(200, "ok").await;

        let result = test_webhook_connection(
            &state,
            endpoint.url.clone(),
            Some("leadWebhookUrl".into()),
        )
        .await
        .unwrap();

        assert_eq!(result.status, ConnectionStatus::Connected);
        assert_eq!(
            get_connection_test_state(&state, "leadWebhookUrl".into())
                .await
                .unwrap(),
            ConnectionTestState::Success
        );
        assert!(state.logs.is_empty());
        assert_eq!(endpoint.requests()[0].json()["type"], "test");
    }

    #[tokio::test]
    async fn test_connection_rejects_bad_url_without_request() {
        let state = state();

        let result = test_webhook_connection(&state, "ftp://files.test".into(), None)
            .await
            .unwrap();
        assert_eq!(result.status, ConnectionStatus::Error);
        assert_eq!(result.status_code, None);

        let result = test_webhook_connection(
            &state,
            "not a url".into(),
            Some("crmSyncWebhookUrl".into()),
        )
        .await
        .unwrap();
        assert_eq!(result.status, ConnectionStatus::Error);
        assert_eq!(
            state.config.connection_test_state(ConfigField::CrmSyncWebhookUrl),
            ConnectionTestState::Error
        );
    }
}

// Webhook commands
// Direct dispatch and the automation log

use serde_json::Value;

use crate::error::HookdeskError;
use crate::models::webhook_log::{DispatchResult, WebhookLogEntry, WebhookLogStats};
use crate::services::webhook_sender::WebhookRequest;
use crate::state::AppState;

/// Reject anything that is not an absolute http(s) URL
fn validate_webhook_url(url: &str) -> Result<(), HookdeskError> {
    let parsed = url::Url::parse(url).map_err(|e| HookdeskError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HookdeskError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}

/// POST `payload` to `url` once and record it in the automation log.
/// HTTP and transport failures come back in the result.
pub async fn send_webhook(
    state: &AppState,
    url: String,
    payload: Value,
    bearer_token: Option<String>,
    event_name: String,
) -> Result<DispatchResult, String> {
    let url = url.trim().to_string();
    validate_webhook_url(&url)?;

    let request =
        WebhookRequest::new(&url, &event_name, payload).with_bearer_token(bearer_token);
    Ok(state.sender.send(request).await)
}

/// Automation log, newest first
pub async fn get_webhook_logs(state: &AppState) -> Result<Vec<WebhookLogEntry>, String> {
    Ok(state.logs.logs())
}

pub async fn get_failed_webhook_logs(state: &AppState) -> Result<Vec<WebhookLogEntry>, String> {
    Ok(state.logs.failures())
}

pub async fn search_webhook_logs(
    state: &AppState,
    query: String,
) -> Result<Vec<WebhookLogEntry>, String> {
    Ok(state.logs.search(&query))
}

pub async fn get_webhook_log_stats(state: &AppState) -> Result<WebhookLogStats, String> {
    Ok(state.logs.stats())
}

pub async fn clear_webhook_logs(state: &AppState) -> Result<(), String> {
    Ok(state.logs.clear_logs()?)
}

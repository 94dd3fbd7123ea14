// Outbound Webhook Sender
// Single best-effort JSON POST per call, logged whatever the outcome

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{HookdeskError, HookdeskResult};
use crate::models::webhook_log::{DispatchResult, NewWebhookLog};
use crate::services::log_store::LogSink;
use crate::utils::text::summarize;

/// One outbound webhook call
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    pub url: String,
    pub payload: Value,
    /// Sent as `Authorization: Bearer <token>` when non-empty
    pub bearer_token: Option<String>,
    pub event_name: String,
}

impl WebhookRequest {
    pub fn new(url: &str, event_name: &str, payload: Value) -> Self {
        Self {
            url: url.to_string(),
            payload,
            bearer_token: None,
            event_name: event_name.to_string(),
        }
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }
}

/// Anything that can deliver a [`WebhookRequest`]
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    async fn dispatch(&self, request: WebhookRequest) -> DispatchResult;
}

/// Build the request body: caller payload plus `timestamp` in epoch millis.
///
/// Object payloads get the timestamp merged in (overriding a caller
/// `timestamp`); anything else is wrapped as `{ "data": ..., "timestamp": ... }`.
pub fn build_body(payload: Value, timestamp_ms: i64) -> Value {
    let mut body = match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    body.insert("timestamp".to_string(), Value::from(timestamp_ms));
    Value::Object(body)
}

/// Describe a transport failure for the caller and the log
fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_builder() {
        format!("Invalid request: {}", e)
    } else {
        e.to_string()
    }
}

/// HTTP client with the library defaults for timeouts and redirects
pub fn http_client() -> HookdeskResult<Client> {
    Client::builder()
        .build()
        .map_err(|e| HookdeskError::HttpClient(e.to_string()))
}

/// Webhook sender over reqwest
pub struct WebhookSender {
    client: Client,
    log_sink: Arc<dyn LogSink>,
}

impl WebhookSender {
    /// Create a sender with the client's default timeouts
    pub fn new(log_sink: Arc<dyn LogSink>) -> HookdeskResult<Self> {
        Ok(Self::with_client(http_client()?, log_sink))
    }

    pub fn with_client(client: Client, log_sink: Arc<dyn LogSink>) -> Self {
        Self { client, log_sink }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// POST the request once. Never fails: transport and HTTP errors are
    /// reported in the result and recorded in the log.
    pub async fn send(&self, request: WebhookRequest) -> DispatchResult {
        let body = build_body(request.payload, Utc::now().timestamp_millis());
        let body_text = body.to_string();

        log::info!(
            "[webhook] Sending '{}' to {}",
            request.event_name,
            request.url
        );

        let mut builder = self
            .client
            .post(&request.url)
            .header("Content-Type", "application/json")
            .body(body_text.clone());

        if let Some(token) = request
            .bearer_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let result = match builder.send().await {
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_else(|e| {
                    log::warn!("[webhook] Failed to read response body: {}", e);
                    String::new()
                });

                log::info!(
                    "[webhook] Response from {}: {} (success={})",
                    request.url,
                    status.as_u16(),
                    status.is_success()
                );

                DispatchResult {
                    ok: status.is_success(),
                    status: Some(status.as_u16()),
                    body: text,
                }
            }
            Err(e) => {
                let message = describe_transport_error(&e);
                log::warn!("[webhook] Request to {} failed: {}", request.url, message);

                DispatchResult {
                    ok: false,
                    status: None,
                    body: message,
                }
            }
        };

        self.log_sink.record(NewWebhookLog {
            url: request.url,
            event_name: request.event_name,
            payload_summary: summarize(&body_text),
            status_code: result.status,
            response_summary: summarize(&result.body),
            is_error: !result.ok,
        });

        result
    }
}

#[async_trait]
impl WebhookDispatcher for WebhookSender {
    async fn dispatch(&self, request: WebhookRequest) -> DispatchResult {
        self.send(request).await
    }
}

// Webhook log models
// One entry per outbound dispatch attempt

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded dispatch attempt. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub event_name: String,
    /// Request body, truncated to 200 characters
    pub payload_summary: String,
    /// `None` when no response was received
    pub status_code: Option<u16>,
    /// Response body or transport error, truncated to 200 characters
    pub response_summary: String,
    pub is_error: bool,
}

/// Entry as produced by the sender, before the log store stamps it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebhookLog {
    pub url: String,
    pub event_name: String,
    pub payload_summary: String,
    pub status_code: Option<u16>,
    pub response_summary: String,
    pub is_error: bool,
}

/// Counts for the log overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookLogStats {
    pub total: usize,
    pub success_count: usize,
    pub error_count: usize,
}

/// Structured result of a single webhook POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// Mirrors the HTTP 2xx range
    pub ok: bool,
    /// `None` on network failure
    pub status: Option<u16>,
    /// Response text, or the error message on network failure
    pub body: String,
}

// Connection test for configured endpoints
// Sends a marker payload and reports whether the endpoint accepted it

use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use std::time::Instant;

use crate::models::config::{ConnectionStatus, ConnectionTestResult};

/// POST `{ "type": "test", "timestamp": <epoch ms> }` to `url`.
///
/// 2xx is `connected`; any other status and any transport error is `error`.
/// Tests are not written to the automation log.
pub async fn test_connection(client: &Client, url: &str) -> ConnectionTestResult {
    let start = Instant::now();
    let payload = json!({
        "type": "test",
        "timestamp": Utc::now().timestamp_millis(),
    });

    log::info!("[config] Testing connection to {}", url);

    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .body(payload.to_string())
        .send()
        .await;

    let response_time_ms = start.elapsed().as_millis() as u64;

    match response {
        Ok(response) => {
            let status_code = response.status().as_u16();
            let success = response.status().is_success();
            log::info!(
                "[config] Connection test response: {} ({}ms)",
                status_code,
                response_time_ms
            );

            ConnectionTestResult {
                status: if success {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Error
                },
                status_code: Some(status_code),
                error: if success {
                    None
                } else {
                    Some(format!("HTTP {}", status_code))
                },
                response_time_ms,
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timed out".to_string()
            } else if e.is_connect() {
                "Connection failed".to_string()
            } else {
                e.to_string()
            };
            log::warn!("[config] Connection test error: {} ({}ms)", error, response_time_ms);

            ConnectionTestResult {
                status: ConnectionStatus::Error,
                status_code: None,
                error: Some(error),
                response_time_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{direct_client, spawn_endpoint, unreachable_url};

    #[tokio::test]
    async fn test_connected_on_success() {
        let endpoint = spawn_endpoint(200, "pong").await;

        let result = test_connection(&direct_client(), &endpoint.url).await;

        assert_eq!(result.status, ConnectionStatus::Connected);
        assert_eq!(result.status_code, Some(200));
        assert_eq!(result.error, None);

        let body = endpoint.requests()[0].json();
        assert_eq!(body["type"], "test");
        assert!(body["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn test_error_on_http_failure() {
        let endpoint = spawn_endpoint(404, "nope").await;

        let result = test_connection(&direct_client(), &endpoint.url).await;

        assert_eq!(result.status, ConnectionStatus::Error);
        assert_eq!(result.status_code, Some(404));
        assert_eq!(result.error.as_deref(), Some("HTTP 404"));
    }

    #[tokio::test]
    async fn test_error_on_transport_failure() {
        let url = unreachable_url().await;

        let result = test_connection(&direct_client(), &url).await;

        assert_eq!(result.status, ConnectionStatus::Error);
        assert_eq!(result.status_code, None);
        assert!(result.error.is_some());
    }
}

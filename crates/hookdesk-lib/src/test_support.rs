// Local webhook endpoints for dispatch tests

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};

/// Request as seen by the local endpoint
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct EndpointState {
    status: StatusCode,
    reply: String,
    captured: Mutex<Vec<CapturedRequest>>,
}

/// Running endpoint answering every POST with a fixed status and body
pub struct TestEndpoint {
    pub url: String,
    state: Arc<EndpointState>,
}

impl TestEndpoint {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.captured.lock().unwrap().clone()
    }
}

async fn capture(
    State(state): State<Arc<EndpointState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };

    state.captured.lock().unwrap().push(CapturedRequest {
        content_type: header("content-type"),
        authorization: header("authorization"),
        body,
    });

    (state.status, state.reply.clone())
}

/// Bind an endpoint on 127.0.0.1 with an ephemeral port
pub async fn spawn_endpoint(status: u16, reply: &str) -> TestEndpoint {
    let state = Arc::new(EndpointState {
        status: StatusCode::from_u16(status).unwrap(),
        reply: reply.to_string(),
        captured: Mutex::new(Vec::new()),
    });

    let router = Router::new()
        .route("/hook", post(capture))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    TestEndpoint {
        url: format!("http://{}/hook", addr),
        state,
    }
}

/// URL of a port nothing listens on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/hook", addr)
}

/// HTTP client that never routes through an environment proxy
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

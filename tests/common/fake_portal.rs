//! Fake NMDC portal search API for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `POST /{entity}/search`, records every request body and
//! query string, and answers with the configured reply.
//!
//! # Example
//!
//! ```rust,no_run
//! let portal = FakePortal::start().await.unwrap();
//! portal.reply_with(200, r#"{"results":[{"id":"s1","name":"Soil"}]}"#).await;
//! let client = SearchClient::new(portal.base_url()).unwrap();
//! ```

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One request as the portal saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub entity: String,
    pub query_string: Option<String>,
    pub body: serde_json::Value,
}

struct PortalState {
    status: u16,
    body: String,
    requests: Vec<RecordedRequest>,
}

impl Default for PortalState {
    fn default() -> Self {
        Self {
            status: 200,
            body: r#"{"count":0,"results":[]}"#.to_string(),
            requests: Vec::new(),
        }
    }
}

/// Handle to the running fake portal.
pub struct FakePortal {
    addr: SocketAddr,
    state: Arc<Mutex<PortalState>>,
}

impl FakePortal {
    /// Start the fake portal on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(PortalState::default()));

        let app = Router::new()
            .route("/api/{entity}/search", post(search))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL to hand to `SearchClient` (e.g. `http://127.0.0.1:PORT/api`).
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Status and raw body returned for every subsequent request.
    pub async fn reply_with(&self, status: u16, body: &str) {
        let mut state = self.state.lock().await;
        state.status = status;
        state.body = body.to_string();
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Body of the only request received. Panics otherwise.
    pub async fn single_request(&self) -> RecordedRequest {
        let requests = self.requests().await;
        assert_eq!(requests.len(), 1, "expected exactly one portal request");
        requests.into_iter().next().unwrap()
    }
}

async fn search(
    Path(entity): Path<String>,
    RawQuery(query_string): RawQuery,
    State(state): State<Arc<Mutex<PortalState>>>,
    body: Bytes,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.requests.push(RecordedRequest {
        entity,
        query_string,
        body,
    });
    let status = StatusCode::from_u16(state.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

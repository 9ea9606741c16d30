//! HTTP front end: accepts simple search parameters, normalizes the
//! environment term, and forwards the query to the portal.

use axum::{
    extract::{Path, Query as QueryParams, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use nmdc_client::{ClientError, EntityType, SearchClient, SearchResponse};
use nmdc_core::{OntologyError, Query, QueryBuilder, TermNormalizer, ENV_BROAD_SCALE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Table the environment condition targets.
pub const BIOSAMPLE_TABLE: &str = "biosample";
/// Table the omics-type condition targets.
pub const OMICS_PROCESSING_TABLE: &str = "omics_processing";

/// Shared handler state. Cloned per request.
#[derive(Debug, Clone)]
pub struct AppState {
    normalizer: Arc<TermNormalizer>,
    client: SearchClient,
}

impl AppState {
    pub fn new(normalizer: Arc<TermNormalizer>, client: SearchClient) -> Self {
        Self { normalizer, client }
    }

    pub fn normalizer(&self) -> &Arc<TermNormalizer> {
        &self.normalizer
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }
}

/// Query-string parameters accepted by both search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub environment: Option<String>,
    #[serde(rename = "omicsType", alias = "omics_type")]
    pub omics_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    pub name: String,
}

/// Response body: the portal hits reduced to `id` and `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultResponse {
    pub results: Vec<SearchResultItem>,
}

impl From<SearchResponse> for SearchResultResponse {
    fn from(response: SearchResponse) -> Self {
        Self {
            results: response
                .results
                .into_iter()
                .map(|r| SearchResultItem { id: r.id, name: r.name })
                .collect(),
        }
    }
}

/// Build the portal query for the given parameters. Empty values are
/// treated as absent.
pub fn build_query(environment: Option<&str>, omics_type: Option<&str>) -> Query {
    let mut builder = QueryBuilder::new();
    if let Some(env) = environment.filter(|v| !v.is_empty()) {
        builder = builder.add_condition("==", ENV_BROAD_SCALE, env, BIOSAMPLE_TABLE);
    }
    if let Some(omics) = omics_type.filter(|v| !v.is_empty()) {
        builder = builder.add_condition("==", "omics_type", omics, OMICS_PROCESSING_TABLE);
    }
    builder.build()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Client(#[from] ClientError),

    /// The blocking normalization task panicked or was cancelled.
    #[error("normalization task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Client(ClientError::InvalidEntityType(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Client(ClientError::RemoteSearch { status: remote, .. }) => {
                tracing::error!(remote_status = remote, "{self}");
            }
            _ if status.is_server_error() => tracing::error!("{self}"),
            _ => tracing::debug!("{self}"),
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// `/study/search`, `/biosample/search` and `/healthz`. Any other entity
/// segment is answered with 400.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/{entity}/search", get(search_handler))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn search_handler(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<SearchResultResponse>, ApiError> {
    let entity: EntityType = entity.parse()?;
    run_search(&state, entity, params).await.map(Json)
}

/// Build, normalize and post one search.
pub async fn run_search(
    state: &AppState,
    entity: EntityType,
    params: SearchParams,
) -> Result<SearchResultResponse, ApiError> {
    let query = build_query(params.environment.as_deref(), params.omics_type.as_deref());
    let query = normalize_blocking(Arc::clone(&state.normalizer), query).await?;
    tracing::info!(
        %entity,
        query = %serde_json::to_string(&query).unwrap_or_default(),
        "normalized query"
    );
    let response = state.client.search(entity, &query).await?;
    Ok(response.into())
}

/// Normalization may load the ontology on first use, so it runs off the
/// async workers.
pub async fn normalize_blocking(
    normalizer: Arc<TermNormalizer>,
    mut query: Query,
) -> Result<Query, ApiError> {
    let query = tokio::task::spawn_blocking(move || {
        normalizer.normalize(&mut query).map(|_| query)
    })
    .await??;
    Ok(query)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "nmdc server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

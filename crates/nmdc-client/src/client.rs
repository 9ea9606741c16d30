//! HTTP client for the portal's `/{entity}/search` endpoints.

use crate::error::{ClientError, Result};
use crate::types::{EntityType, SearchResponse};
use nmdc_core::config::PortalSettings;
use nmdc_core::Query;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts queries to the portal. Cheap to clone; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    offset: u32,
    limit: u32,
}

impl SearchClient {
    /// Client for `base_url` (e.g. `https://data.microbiomedata.org/api`) with
    /// the first page of ten results and a 30 s request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), 0, 10, DEFAULT_TIMEOUT)
    }

    pub fn from_settings(settings: &PortalSettings) -> Result<Self> {
        Self::build(
            settings.base_url.clone(),
            settings.offset,
            settings.limit,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn build(base_url: String, offset: u32, limit: u32, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            offset,
            limit,
        })
    }

    pub fn with_page(mut self, offset: u32, limit: u32) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full search URL for `entity`, paging parameters included.
    pub fn endpoint(&self, entity: EntityType) -> String {
        format!(
            "{}/{}/search?offset={}&limit={}",
            self.base_url, entity, self.offset, self.limit
        )
    }

    /// Post `query` to the search endpoint of `entity`.
    pub async fn search(&self, entity: EntityType, query: &Query) -> Result<SearchResponse> {
        let url = self.endpoint(entity);
        tracing::info!(%entity, %url, conditions = query.len(), "posting portal search");

        let response = self.http.post(&url).json(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%entity, status = status.as_u16(), "portal search failed");
            return Err(ClientError::RemoteSearch {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(ClientError::Decode)
    }

    /// Like [`search`](Self::search) but takes the entity by name. Unknown
    /// names fail before any request is made.
    pub async fn search_named(&self, entity: &str, query: &Query) -> Result<SearchResponse> {
        let entity: EntityType = entity.parse()?;
        self.search(entity, query).await
    }
}

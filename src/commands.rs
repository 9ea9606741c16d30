//! Entry points behind the `nmdc` subcommands.

use crate::server::{self, AppState, SearchParams};
use anyhow::Context;
use nmdc_client::{EntityType, SearchClient, SearchResponse};
use nmdc_core::config::Config;
use nmdc_core::{OntologyAdapter, Resolution, TermNormalizer};
use serde::Serialize;
use std::sync::Arc;

/// Build the normalizer described by the `[ontology]` section. The provider
/// is loaded here only when `eager` is set.
pub fn build_normalizer(config: &Config) -> anyhow::Result<Arc<TermNormalizer>> {
    let settings = &config.ontology;
    let adapter = Arc::new(OntologyAdapter::new(settings.selector.clone()));
    if settings.eager {
        adapter
            .provider()
            .with_context(|| format!("loading ontology {:?}", settings.selector))?;
        tracing::info!(selector = %settings.selector, "ontology loaded");
    }
    let normalizer = TermNormalizer::from_settings(adapter, settings)
        .context("invalid [ontology] ecosystem_root")?;
    Ok(Arc::new(normalizer))
}

pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let normalizer = build_normalizer(config)?;
    let client = SearchClient::from_settings(&config.portal).context("building portal client")?;
    Ok(AppState::new(normalizer, client))
}

/// `nmdc serve`
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = build_state(config)?;
    server::serve(state, &config.bind_addr()).await
}

/// One line of `nmdc normalize` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTerm {
    pub raw: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

/// `nmdc normalize`: resolve each raw value independently. Unmatched values
/// come back unchanged.
pub fn normalize_terms(
    normalizer: &TermNormalizer,
    values: &[String],
) -> anyhow::Result<Vec<NormalizedTerm>> {
    values
        .iter()
        .map(|raw| {
            let resolution = normalizer.resolve(raw)?;
            Ok(NormalizedTerm {
                raw: raw.clone(),
                value: resolution
                    .as_ref()
                    .map_or_else(|| raw.clone(), |r| r.label.clone()),
                resolution,
            })
        })
        .collect()
}

/// `nmdc search`: one request against the portal. With `normalize` off the
/// environment value is sent verbatim.
pub async fn search(
    state: &AppState,
    entity: EntityType,
    params: SearchParams,
    normalize: bool,
) -> anyhow::Result<SearchResponse> {
    let mut query =
        server::build_query(params.environment.as_deref(), params.omics_type.as_deref());
    if normalize {
        query = server::normalize_blocking(Arc::clone(state.normalizer()), query).await?;
    }
    tracing::debug!(query = %serde_json::to_string(&query)?, "posting search");
    Ok(state.client().search(entity, &query).await?)
}

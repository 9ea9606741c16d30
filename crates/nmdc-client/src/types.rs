//! Entity types and portal response shapes.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Searchable portal entity. Each has its own search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Study,
    Biosample,
}

impl EntityType {
    pub const ALL: [EntityType; 2] = [EntityType::Study, EntityType::Biosample];

    /// Path segment used in the portal URL.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Study => "study",
            EntityType::Biosample => "biosample",
        }
    }
}

impl FromStr for EntityType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(EntityType::Study),
            "biosample" => Ok(EntityType::Biosample),
            other => Err(ClientError::InvalidEntityType(other.to_string())),
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a portal search response. Fields beyond `results` are kept
/// verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One portal hit. Only `id` and `name` are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

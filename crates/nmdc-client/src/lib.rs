//! nmdc-client: search client for the NMDC data portal API.
//!
//! [`SearchClient`] posts a [`Query`](nmdc_core::Query) to the portal's
//! `/{entity}/search` endpoint and hands back the decoded response. There is
//! no retry and no caching; every failure is returned to the caller.

pub mod client;
pub mod error;
pub mod types;

pub use client::SearchClient;
pub use error::ClientError;
pub use types::{EntityType, SearchResponse, SearchResult};

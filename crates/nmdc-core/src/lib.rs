//! nmdc-core: query model and environment-term normalization for nmdc.
//!
//! This crate holds everything between a caller's raw search request and the
//! body posted to the NMDC portal:
//!
//! ```text
//! QueryBuilder ──► Query ──► TermNormalizer ──► Query (canonical labels)
//!                                 │
//!                                 ├──► OntologyAdapter ──► provider (builtin / OBO)
//!                                 └──► redundancy filter
//! ```
//!
//! Normalization is synchronous and allocation-light; the only shared state
//! is the memoized provider inside [`OntologyAdapter`].

pub mod config;
pub mod error;
pub mod normalizer;
pub mod ontology;
pub mod redundancy;
pub mod types;

pub use error::{OntologyError, Result};
pub use normalizer::{
    normalize, NormalizeReport, Resolution, Resolved, TermNormalizer, Unresolved,
    ECOSYSTEM_ROOT, ENV_BROAD_SCALE,
};
pub use ontology::OntologyAdapter;
pub use redundancy::filter_most_specific;
pub use types::{Condition, InvalidTermId, MatchMode, Query, QueryBuilder, Relation, TermId};

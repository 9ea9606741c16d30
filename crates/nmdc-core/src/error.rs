//! Error types for ontology access and normalization.

use crate::types::TermId;

pub type Result<T> = std::result::Result<T, OntologyError>;

#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// The provider named by `selector` could not be constructed.
    #[error("failed to initialise ontology provider {selector:?}: {reason}")]
    AdapterInit { selector: String, reason: String },

    /// The provider was built but lacks a capability the normalizer needs.
    #[error("ontology provider {selector:?} does not support {capability}")]
    AdapterTypeMismatch {
        selector: String,
        capability: &'static str,
    },

    #[error("term not found: {0}")]
    NotFound(TermId),

    /// Malformed ontology source. `line` is 1-based.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl OntologyError {
    pub(crate) fn init(selector: &str, reason: impl std::fmt::Display) -> Self {
        OntologyError::AdapterInit {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for failures of the ontology infrastructure itself, as opposed to
    /// a lookup that found nothing.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            OntologyError::AdapterInit { .. } | OntologyError::AdapterTypeMismatch { .. }
        )
    }
}

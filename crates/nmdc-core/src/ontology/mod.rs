//! Ontology access: capability traits, providers, and the memoizing adapter.
//!
//! A provider is anything that can walk the concept hierarchy
//! ([`GraphTraversal`]) and look concepts up by text ([`TextSearch`]). The
//! normalizer needs both, so it only ever sees an [`OntologyProvider`].
//!
//! Providers are named by a selector string `<scheme>:<rest>`:
//!
//! | Selector | Provider | Capabilities |
//! |----------|----------|--------------|
//! | `builtin:envo` | bundled ENVO biome slice | graph + search |
//! | `obo:<path>` | OBO flat file | graph + search |
//! | `edges:<path>` | `child<TAB>parent` is-a list | graph only |
//!
//! Descendant sets are reflexive: a root is always a member of its own
//! descendant set.

mod adapter;
pub mod builtin;
pub mod edges;
mod index;
mod memory;
pub mod obo;

pub use adapter::OntologyAdapter;
pub use edges::EdgeListOntology;
pub use index::{fold, TermIndex};
pub use memory::{MemoryOntology, MemoryOntologyBuilder};

use crate::error::{OntologyError, Result};
use crate::types::{MatchMode, Relation, TermId};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Hierarchy traversal.
pub trait GraphTraversal: Send + Sync {
    /// Every concept reachable from `root` by following `relation` downwards,
    /// including `root` itself.
    fn descendants(&self, root: &TermId, relation: Relation) -> Result<BTreeSet<TermId>>;

    /// True if `term` sits at or below `ancestor`.
    fn is_descendant(&self, term: &TermId, ancestor: &TermId, relation: Relation) -> Result<bool> {
        Ok(self.descendants(ancestor, relation)?.contains(term))
    }
}

/// Text lookup over labels and aliases.
pub trait TextSearch: Send + Sync {
    fn search(&self, text: &str, mode: MatchMode) -> Result<BTreeSet<TermId>>;

    /// Canonical display label. Fails with [`OntologyError::NotFound`] for
    /// unknown (or unlabelled) terms.
    fn label(&self, term: &TermId) -> Result<String>;
}

/// A provider the normalizer can use: traversal plus search.
pub trait OntologyProvider: GraphTraversal + TextSearch {}

impl<T: GraphTraversal + TextSearch> OntologyProvider for T {}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Parsed form of a provider selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSelector {
    Builtin(String),
    Obo(PathBuf),
    Edges(PathBuf),
}

impl FromStr for ProviderSelector {
    type Err = OntologyError;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| OntologyError::init(s, "selector must look like <scheme>:<source>"))?;
        if rest.is_empty() {
            return Err(OntologyError::init(s, "selector has an empty source"));
        }
        match scheme {
            "builtin" => Ok(ProviderSelector::Builtin(rest.to_string())),
            "obo" => Ok(ProviderSelector::Obo(PathBuf::from(rest))),
            "edges" => Ok(ProviderSelector::Edges(PathBuf::from(rest))),
            other => Err(OntologyError::init(
                s,
                format!("unknown provider scheme {other:?}"),
            )),
        }
    }
}

/// A constructed provider, tagged with what it can do.
pub enum ProviderHandle {
    Full(Arc<dyn OntologyProvider>),
    GraphOnly(Arc<dyn GraphTraversal>),
}

impl ProviderHandle {
    pub fn supports_search(&self) -> bool {
        matches!(self, ProviderHandle::Full(_))
    }
}

/// Construct the provider named by `selector`. I/O and parse failures are
/// reported as [`OntologyError::AdapterInit`].
pub fn open(selector: &str) -> Result<ProviderHandle> {
    let handle = match selector.parse::<ProviderSelector>()? {
        ProviderSelector::Builtin(name) => {
            let ontology = builtin::load(&name).map_err(|e| OntologyError::init(selector, e))?;
            ProviderHandle::Full(Arc::new(ontology))
        }
        ProviderSelector::Obo(path) => {
            let ontology = obo::load(&path).map_err(|e| OntologyError::init(selector, e))?;
            ProviderHandle::Full(Arc::new(ontology))
        }
        ProviderSelector::Edges(path) => {
            let ontology = edges::load(&path).map_err(|e| OntologyError::init(selector, e))?;
            ProviderHandle::GraphOnly(Arc::new(ontology))
        }
    };
    Ok(handle)
}

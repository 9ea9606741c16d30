//! [`OntologyAdapter`]: lazily constructed, memoized provider handle.
//!
//! The adapter is shared across requests behind an `Arc`. The first call that
//! needs the provider builds it from the selector; concurrent first callers
//! block on the same initialization instead of racing. A failed build is
//! returned to the caller and the cell is left unset. The adapter never
//! retries on its own; a new build is attempted only when a caller asks for
//! the provider again.

use super::{open, GraphTraversal, OntologyProvider, ProviderHandle, TextSearch};
use crate::error::{OntologyError, Result};
use crate::types::{MatchMode, Relation, TermId};
use once_cell::sync::OnceCell;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

const INJECTED: &str = "injected";

type ScopeCache = HashMap<(TermId, Relation), Arc<BTreeSet<TermId>>>;

pub struct OntologyAdapter {
    selector: String,
    provider: OnceCell<Arc<dyn OntologyProvider>>,
    scopes: Mutex<ScopeCache>,
}

impl OntologyAdapter {
    /// Adapter that builds its provider from `selector` on first use.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            provider: OnceCell::new(),
            scopes: Mutex::new(HashMap::new()),
        }
    }

    /// Adapter over an already constructed provider.
    pub fn from_provider<P: OntologyProvider + 'static>(provider: P) -> Self {
        Self::from_shared(Arc::new(provider))
    }

    pub fn from_shared(provider: Arc<dyn OntologyProvider>) -> Self {
        Self {
            selector: INJECTED.to_string(),
            provider: OnceCell::with_value(provider),
            scopes: Mutex::new(HashMap::new()),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.get().is_some()
    }

    /// The provider, constructing it on first call.
    pub fn provider(&self) -> Result<&Arc<dyn OntologyProvider>> {
        self.provider.get_or_try_init(|| {
            tracing::info!(selector = %self.selector, "initialising ontology provider");
            match open(&self.selector) {
                Ok(ProviderHandle::Full(provider)) => Ok(provider),
                Ok(ProviderHandle::GraphOnly(_)) => Err(OntologyError::AdapterTypeMismatch {
                    selector: self.selector.clone(),
                    capability: "text search",
                }),
                Err(e) => {
                    tracing::error!(selector = %self.selector, error = %e, "ontology provider failed to initialise");
                    Err(e)
                }
            }
        })
    }

    /// Memoized descendant set of `root`. Computed once per adapter and
    /// shared read-only afterwards.
    pub fn scope(&self, root: &TermId, relation: Relation) -> Result<Arc<BTreeSet<TermId>>> {
        let key = (root.clone(), relation);
        if let Some(hit) = self.lock_scopes().get(&key) {
            return Ok(Arc::clone(hit));
        }
        let computed = Arc::new(self.provider()?.descendants(root, relation)?);
        tracing::debug!(root = %root, %relation, size = computed.len(), "computed ontology scope");
        Ok(Arc::clone(
            self.lock_scopes().entry(key).or_insert(computed),
        ))
    }

    fn lock_scopes(&self) -> std::sync::MutexGuard<'_, ScopeCache> {
        self.scopes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GraphTraversal for OntologyAdapter {
    fn descendants(&self, root: &TermId, relation: Relation) -> Result<BTreeSet<TermId>> {
        self.provider()?.descendants(root, relation)
    }
}

impl TextSearch for OntologyAdapter {
    fn search(&self, text: &str, mode: MatchMode) -> Result<BTreeSet<TermId>> {
        self.provider()?.search(text, mode)
    }

    fn label(&self, term: &TermId) -> Result<String> {
        self.provider()?.label(term)
    }
}

impl std::fmt::Debug for OntologyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyAdapter")
            .field("selector", &self.selector)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

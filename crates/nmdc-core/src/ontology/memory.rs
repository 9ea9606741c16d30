//! In-memory ontology: term records, child adjacency per relation, and a
//! [`TermIndex`] over labels and synonyms. Both the OBO loader and the
//! bundled slice produce one of these.

use super::index::TermIndex;
use super::{GraphTraversal, TextSearch};
use crate::error::{OntologyError, Result};
use crate::types::{MatchMode, Relation, TermId};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

pub(crate) type Children = HashMap<TermId, BTreeSet<TermId>>;

#[derive(Debug, Clone, Default)]
struct TermRecord {
    label: Option<String>,
    synonyms: Vec<String>,
}

#[derive(Debug)]
pub struct MemoryOntology {
    terms: BTreeMap<TermId, TermRecord>,
    children: HashMap<Relation, Children>,
    index: TermIndex,
}

impl MemoryOntology {
    pub fn builder() -> MemoryOntologyBuilder {
        MemoryOntologyBuilder::default()
    }

    /// Number of terms with a record (labelled or not).
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &TermId) -> bool {
        self.terms.contains_key(term)
    }

    pub fn terms(&self) -> impl Iterator<Item = &TermId> {
        self.terms.keys()
    }

    pub fn label_of(&self, term: &TermId) -> Option<&str> {
        self.terms.get(term).and_then(|r| r.label.as_deref())
    }

    pub fn synonyms(&self, term: &TermId) -> &[String] {
        self.terms
            .get(term)
            .map(|r| r.synonyms.as_slice())
            .unwrap_or(&[])
    }

    pub fn index(&self) -> &TermIndex {
        &self.index
    }
}

impl GraphTraversal for MemoryOntology {
    fn descendants(&self, root: &TermId, relation: Relation) -> Result<BTreeSet<TermId>> {
        Ok(match self.children.get(&relation) {
            Some(children) => walk_down(children, root),
            None => BTreeSet::from([root.clone()]),
        })
    }
}

impl TextSearch for MemoryOntology {
    fn search(&self, text: &str, mode: MatchMode) -> Result<BTreeSet<TermId>> {
        Ok(self.index.search(text, mode))
    }

    fn label(&self, term: &TermId) -> Result<String> {
        self.terms
            .get(term)
            .and_then(|r| r.label.clone())
            .ok_or_else(|| OntologyError::NotFound(term.clone()))
    }
}

/// Breadth-first walk over a child adjacency map. Reflexive and cycle-safe.
pub(crate) fn walk_down(children: &Children, root: &TermId) -> BTreeSet<TermId> {
    let mut seen = BTreeSet::from([root.clone()]);
    let mut queue = VecDeque::from([root.clone()]);
    while let Some(current) = queue.pop_front() {
        let Some(kids) = children.get(&current) else {
            continue;
        };
        for kid in kids {
            if seen.insert(kid.clone()) {
                queue.push_back(kid.clone());
            }
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Fluent builder for [`MemoryOntology`].
///
/// ```rust
/// use nmdc_core::ontology::{GraphTraversal, MemoryOntology};
/// use nmdc_core::{Relation, TermId};
///
/// let biome: TermId = "ENVO:00000428".parse().unwrap();
/// let forest: TermId = "ENVO:01000174".parse().unwrap();
/// let ontology = MemoryOntology::builder()
///     .term(biome.clone(), "biome")
///     .term(forest.clone(), "forest biome")
///     .synonym(&forest, "forest")
///     .edge(forest.clone(), Relation::IsA, biome.clone())
///     .build()
///     .unwrap();
/// assert!(ontology.is_descendant(&forest, &biome, Relation::IsA).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryOntologyBuilder {
    terms: BTreeMap<TermId, TermRecord>,
    children: HashMap<Relation, Children>,
}

impl MemoryOntologyBuilder {
    /// Add a term or replace the label of an existing one.
    pub fn term(mut self, id: TermId, label: impl Into<String>) -> Self {
        self.terms.entry(id).or_default().label = Some(label.into());
        self
    }

    pub fn synonym(mut self, id: &TermId, synonym: impl Into<String>) -> Self {
        self.terms
            .entry(id.clone())
            .or_default()
            .synonyms
            .push(synonym.into());
        self
    }

    /// Record `child <relation> parent`, e.g. `forest biome is_a biome`.
    pub fn edge(mut self, child: TermId, relation: Relation, parent: TermId) -> Self {
        self.children
            .entry(relation)
            .or_default()
            .entry(parent)
            .or_default()
            .insert(child);
        self
    }

    pub fn build(self) -> Result<MemoryOntology> {
        let index = TermIndex::build(self.terms.iter().map(|(id, record)| {
            (id, record.label.as_deref(), record.synonyms.as_slice())
        }))?;
        Ok(MemoryOntology {
            terms: self.terms,
            children: self.children,
            index,
        })
    }
}

//! Tab-separated is-a edge lists (`child<TAB>parent`, `#` comments).
//!
//! These carry no labels, so the provider only implements
//! [`GraphTraversal`]. The adapter refuses it as a normalizer backend.

use super::memory::{walk_down, Children};
use super::GraphTraversal;
use crate::error::{OntologyError, Result};
use crate::types::{Relation, TermId};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Default)]
pub struct EdgeListOntology {
    children: Children,
}

impl EdgeListOntology {
    pub fn parse(source: &str) -> Result<Self> {
        let mut children = Children::new();
        for (i, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split('\t');
            let (Some(child), Some(parent), None) = (cols.next(), cols.next(), cols.next()) else {
                return Err(OntologyError::Parse {
                    line: i + 1,
                    message: "expected two tab-separated columns".to_string(),
                });
            };
            let parse = |s: &str| {
                s.trim().parse::<TermId>().map_err(|e| OntologyError::Parse {
                    line: i + 1,
                    message: e.to_string(),
                })
            };
            children
                .entry(parse(parent)?)
                .or_default()
                .insert(parse(child)?);
        }
        Ok(Self { children })
    }

    pub fn edge_count(&self) -> usize {
        self.children.values().map(BTreeSet::len).sum()
    }
}

impl GraphTraversal for EdgeListOntology {
    fn descendants(&self, root: &TermId, relation: Relation) -> Result<BTreeSet<TermId>> {
        Ok(match relation {
            Relation::IsA => walk_down(&self.children, root),
            Relation::PartOf => BTreeSet::from([root.clone()]),
        })
    }
}

pub fn load(path: &Path) -> Result<EdgeListOntology> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        OntologyError::init(&path.display().to_string(), format!("cannot read: {e}"))
    })?;
    EdgeListOntology::parse(&source)
}

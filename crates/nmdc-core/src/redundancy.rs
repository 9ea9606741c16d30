//! Redundancy filter: keep only the most specific terms of a candidate set.

use crate::error::Result;
use crate::ontology::GraphTraversal;
use crate::types::{Relation, TermId};
use std::collections::BTreeSet;

/// Drop every term that is a strict ancestor of another term in `terms`.
///
/// One descendant walk per candidate, so this is meant for the small sets a
/// label search returns. Members of a `relation` cycle are ancestors of each
/// other and are all dropped.
pub fn filter_most_specific<G>(
    graph: &G,
    terms: &BTreeSet<TermId>,
    relation: Relation,
) -> Result<BTreeSet<TermId>>
where
    G: GraphTraversal + ?Sized,
{
    let mut kept = BTreeSet::new();
    for candidate in terms {
        let below = graph.descendants(candidate, relation)?;
        let has_descendant_in_set = terms
            .iter()
            .any(|other| other != candidate && below.contains(other));
        if !has_descendant_in_set {
            kept.insert(candidate.clone());
        }
    }
    Ok(kept)
}

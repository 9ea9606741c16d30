//! Term normalizer: rewrites free-text environment values to canonical
//! ontology labels.
//!
//! For each condition on the environment field, matching modes are tried in
//! [`MatchMode::PRECEDENCE`] order. The first mode whose hits intersect the
//! ecosystem scope wins: the hits are reduced to their most specific members,
//! the smallest term ID among those is chosen, and its label replaces the raw
//! value. Values that never land in scope are left as they are.

use crate::error::{OntologyError, Result};
use crate::ontology::{OntologyAdapter, TextSearch};
use crate::redundancy::filter_most_specific;
use crate::types::{InvalidTermId, MatchMode, Query, Relation, TermId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Portal field carrying the broad-scale environment of a biosample.
pub const ENV_BROAD_SCALE: &str = "env_broad_scale";

/// ENVO `biome`; its is-a descendants form the ecosystem scope.
pub const ECOSYSTEM_ROOT: &str = "ENVO:00000428";

/// A raw value resolved to an in-scope concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub term: TermId,
    pub label: String,
    pub mode: MatchMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    /// Position of the condition in the query.
    pub index: usize,
    pub raw: String,
    #[serde(flatten)]
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unresolved {
    pub index: usize,
    pub raw: String,
}

/// What [`TermNormalizer::normalize`] did to a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub resolved: Vec<Resolved>,
    pub unresolved: Vec<Unresolved>,
}

impl NormalizeReport {
    /// Conditions whose value actually changed.
    pub fn changed(&self) -> impl Iterator<Item = &Resolved> {
        self.resolved
            .iter()
            .filter(|r| r.raw != r.resolution.label)
    }
}

pub struct TermNormalizer {
    ontology: Arc<OntologyAdapter>,
    field: String,
    root: TermId,
    relation: Relation,
}

impl TermNormalizer {
    /// Normalizer for `env_broad_scale` scoped to the ENVO biome subtree.
    pub fn new(ontology: Arc<OntologyAdapter>) -> Self {
        Self {
            ontology,
            field: ENV_BROAD_SCALE.to_string(),
            root: default_root(),
            relation: Relation::IsA,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_ecosystem_root(mut self, root: TermId) -> Self {
        self.root = root;
        self
    }

    /// Build from the `[ontology]` config section.
    pub fn from_settings(
        ontology: Arc<OntologyAdapter>,
        settings: &crate::config::OntologySettings,
    ) -> std::result::Result<Self, InvalidTermId> {
        Ok(Self::new(ontology)
            .with_field(settings.field.clone())
            .with_ecosystem_root(settings.ecosystem_root.parse()?))
    }

    pub fn ontology(&self) -> &Arc<OntologyAdapter> {
        &self.ontology
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn ecosystem_root(&self) -> &TermId {
        &self.root
    }

    pub fn ecosystem_scope(&self) -> Result<Arc<BTreeSet<TermId>>> {
        self.ontology.scope(&self.root, self.relation)
    }

    /// Resolve a single raw value. `Ok(None)` means no in-scope match.
    pub fn resolve(&self, raw: &str) -> Result<Option<Resolution>> {
        let scope = self.ecosystem_scope()?;
        self.resolve_in(raw, &scope)
    }

    /// Rewrite every condition on the configured field in place. Each
    /// condition is resolved on its own; conditions sharing a raw value reuse
    /// one lookup. Only ontology infrastructure failures are errors.
    pub fn normalize(&self, query: &mut Query) -> Result<NormalizeReport> {
        let mut report = NormalizeReport::default();
        let targets: Vec<usize> = query
            .conditions
            .iter()
            .enumerate()
            .filter(|(_, c)| c.field == self.field)
            .map(|(i, _)| i)
            .collect();
        if targets.is_empty() {
            return Ok(report);
        }

        let scope = self.ecosystem_scope()?;
        let mut memo: HashMap<String, Option<Resolution>> = HashMap::new();

        for index in targets {
            let raw = query.conditions[index].value.clone();
            let resolution = match memo.get(&raw) {
                Some(hit) => hit.clone(),
                None => {
                    let found = self.resolve_in(&raw, &scope)?;
                    memo.insert(raw.clone(), found.clone());
                    found
                }
            };
            match resolution {
                Some(resolution) => {
                    tracing::debug!(
                        index,
                        raw = %raw,
                        term = %resolution.term,
                        label = %resolution.label,
                        mode = %resolution.mode,
                        "normalized environment term"
                    );
                    query.conditions[index].value = resolution.label.clone();
                    report.resolved.push(Resolved {
                        index,
                        raw,
                        resolution,
                    });
                }
                None => {
                    tracing::debug!(index, raw = %raw, "no in-scope match; value left as is");
                    report.unresolved.push(Unresolved { index, raw });
                }
            }
        }
        Ok(report)
    }

    fn resolve_in(&self, raw: &str, scope: &BTreeSet<TermId>) -> Result<Option<Resolution>> {
        for mode in MatchMode::PRECEDENCE {
            let hits = self.ontology.search(raw, mode)?;
            let in_scope: BTreeSet<TermId> = hits.intersection(scope).cloned().collect();
            if in_scope.is_empty() {
                tracing::trace!(raw, %mode, hits = hits.len(), "no in-scope hits");
                continue;
            }
            let specific = filter_most_specific(self.ontology.as_ref(), &in_scope, self.relation)?;
            if specific.len() > 1 {
                tracing::debug!(raw, %mode, candidates = specific.len(), "tie between most specific terms; taking smallest id");
            }
            for term in specific {
                match self.ontology.label(&term) {
                    Ok(label) if !label.is_empty() => {
                        return Ok(Some(Resolution { term, label, mode }));
                    }
                    Ok(_) | Err(OntologyError::NotFound(_)) => {
                        tracing::warn!(raw, term = %term, "matched term has no label; skipping");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for TermNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermNormalizer")
            .field("ontology", &self.ontology)
            .field("field", &self.field)
            .field("root", &self.root)
            .finish()
    }
}

/// One-shot normalization with the default field and scope.
pub fn normalize(query: &mut Query, ontology: Arc<OntologyAdapter>) -> Result<NormalizeReport> {
    TermNormalizer::new(ontology).normalize(query)
}

fn default_root() -> TermId {
    TermId::from_static(ECOSYSTEM_ROOT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::MemoryOntology;
    use crate::types::QueryBuilder;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> TermId {
        s.parse().unwrap()
    }

    // biome
    // ├── terrestrial ecosystem  (syn: terrestrial)
    // │   ├── forest ecosystem   (syn: woodland)
    // │   └── soil ecosystem     (syn: soil)
    // └── aquatic ecosystem
    //     ├── marine ecosystem   (syn: sea water body)
    //     └── lake ecosystem     (syn: lake)
    // lake (outside scope)
    fn adapter() -> Arc<OntologyAdapter> {
        let biome = id("ENVO:00000428");
        let terr = id("ENVO:10000001");
        let forest = id("ENVO:10000002");
        let soil = id("ENVO:10000003");
        let aquatic = id("ENVO:10000004");
        let marine = id("ENVO:10000005");
        let lake_eco = id("ENVO:10000006");
        let lake = id("ENVO:20000001");
        let o = MemoryOntology::builder()
            .term(biome.clone(), "biome")
            .term(terr.clone(), "terrestrial ecosystem")
            .synonym(&terr, "terrestrial")
            .term(forest.clone(), "forest ecosystem")
            .synonym(&forest, "woodland")
            .term(soil.clone(), "soil ecosystem")
            .synonym(&soil, "soil")
            .term(aquatic.clone(), "aquatic ecosystem")
            .term(marine.clone(), "marine ecosystem")
            .synonym(&marine, "sea water body")
            .term(lake_eco.clone(), "lake ecosystem")
            .synonym(&lake_eco, "lake")
            .term(lake.clone(), "lake")
            .edge(terr.clone(), Relation::IsA, biome.clone())
            .edge(forest, Relation::IsA, terr.clone())
            .edge(soil, Relation::IsA, terr)
            .edge(aquatic.clone(), Relation::IsA, biome)
            .edge(marine, Relation::IsA, aquatic.clone())
            .edge(lake_eco, Relation::IsA, aquatic)
            .build()
            .unwrap();
        Arc::new(OntologyAdapter::from_provider(o))
    }

    fn env_query(values: &[&str]) -> Query {
        values
            .iter()
            .fold(QueryBuilder::new(), |qb, v| {
                qb.add_condition("==", ENV_BROAD_SCALE, *v, "biosample")
            })
            .build()
    }

    fn values(q: &Query) -> Vec<&str> {
        q.conditions.iter().map(|c| c.value.as_str()).collect()
    }

    #[test]
    fn exact_alias_resolves_to_label() {
        let mut q = env_query(&["terrestrial"]);
        let report = normalize(&mut q, adapter()).unwrap();
        assert_eq!(values(&q), ["terrestrial ecosystem"]);
        assert_eq!(report.resolved[0].resolution.mode, MatchMode::ExactAlias);
    }

    #[test]
    fn exact_label_wins_over_looser_modes() {
        // "lake" is the label of an out-of-scope term and a synonym of an
        // in-scope one: the label hit is out of scope, so the alias decides.
        let n = TermNormalizer::new(adapter());
        let r = n.resolve("lake").unwrap().unwrap();
        assert_eq!(r.label, "lake ecosystem");
        assert_eq!(r.mode, MatchMode::ExactAlias);

        let r = n.resolve("Soil Ecosystem").unwrap().unwrap();
        assert_eq!(r.mode, MatchMode::ExactLabel);
        assert_eq!(r.label, "soil ecosystem");
    }

    #[test]
    fn exact_label_beats_deeper_alias_match() {
        // X is labelled "forest"; Y sits below X and has "forest" as a
        // synonym. The alias pass alone would keep Y as the most specific.
        let root = id("ENVO:00000428");
        let x = id("ENVO:40000001");
        let y = id("ENVO:40000002");
        let o = MemoryOntology::builder()
            .term(root.clone(), "biome")
            .term(x.clone(), "forest")
            .term(y.clone(), "temperate forest")
            .synonym(&y, "forest")
            .edge(x.clone(), Relation::IsA, root)
            .edge(y.clone(), Relation::IsA, x.clone())
            .build()
            .unwrap();
        let n = TermNormalizer::new(Arc::new(OntologyAdapter::from_provider(o)));

        let alias_hits = n.ontology().search("forest", MatchMode::ExactAlias).unwrap();
        let specific = filter_most_specific(n.ontology().as_ref(), &alias_hits, Relation::IsA).unwrap();
        assert_eq!(specific.into_iter().collect::<Vec<_>>(), [y]);

        let r = n.resolve("forest").unwrap().unwrap();
        assert_eq!(r.term, x);
        assert_eq!(r.label, "forest");
        assert_eq!(r.mode, MatchMode::ExactLabel);
    }

    #[test]
    fn partial_alias_keeps_most_specific() {
        // "ecosystem" partially matches every ecosystem in scope; the leaves
        // survive and the smallest id among them is chosen.
        let r = TermNormalizer::new(adapter())
            .resolve("ecosystem")
            .unwrap()
            .unwrap();
        assert_eq!(r.mode, MatchMode::PartialAlias);
        assert_eq!(r.term, id("ENVO:10000002"));
        assert_eq!(r.label, "forest ecosystem");
    }

    #[test]
    fn unknown_value_passes_through() {
        let mut q = env_query(&["not_a_real_biome_xyz"]);
        let report = normalize(&mut q, adapter()).unwrap();
        assert_eq!(values(&q), ["not_a_real_biome_xyz"]);
        assert!(report.resolved.is_empty());
        assert_eq!(report.unresolved.len(), 1);
    }

    #[test]
    fn out_of_scope_only_match_passes_through() {
        let o = MemoryOntology::builder()
            .term(id("ENVO:00000428"), "biome")
            .term(id("X:1"), "volcano")
            .build()
            .unwrap();
        let mut q = env_query(&["volcano"]);
        normalize(&mut q, Arc::new(OntologyAdapter::from_provider(o))).unwrap();
        assert_eq!(values(&q), ["volcano"]);
    }

    #[test]
    fn other_fields_are_never_touched() {
        let mut q = QueryBuilder::new()
            .add_condition("==", "omics_type", "terrestrial", "omics_processing")
            .add_condition("==", ENV_BROAD_SCALE, "soil", "biosample")
            .add_condition("==", "env_local_scale", "lake", "biosample")
            .build();
        normalize(&mut q, adapter()).unwrap();
        assert_eq!(values(&q), ["terrestrial", "soil ecosystem", "lake"]);
    }

    #[test]
    fn duplicate_raw_values_are_each_resolved() {
        let mut q = env_query(&["soil", "woodland", "soil"]);
        let report = normalize(&mut q, adapter()).unwrap();
        assert_eq!(
            values(&q),
            ["soil ecosystem", "forest ecosystem", "soil ecosystem"]
        );
        let indices: Vec<usize> = report.resolved.iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let adapter = adapter();
        let mut once = env_query(&["terrestrial", "lake", "ecosystem", "nonsense"]);
        normalize(&mut once, Arc::clone(&adapter)).unwrap();
        let mut twice = once.clone();
        let report = normalize(&mut twice, adapter).unwrap();
        assert_eq!(once, twice);
        assert_eq!(report.changed().count(), 0);
    }

    #[test]
    fn query_without_env_terms_never_touches_the_ontology() {
        let adapter = Arc::new(OntologyAdapter::new("obo:/missing.obo"));
        let mut q = QueryBuilder::new()
            .add_condition("==", "omics_type", "Proteomics", "omics_processing")
            .build();
        normalize(&mut q, Arc::clone(&adapter)).unwrap();
        assert!(!adapter.is_initialized());
    }

    #[test]
    fn init_failure_propagates() {
        let adapter = Arc::new(OntologyAdapter::new("obo:/missing.obo"));
        let mut q = env_query(&["soil"]);
        let err = normalize(&mut q, adapter).unwrap_err();
        assert!(err.is_infrastructure());
        assert_eq!(values(&q), ["soil"]);
    }

    #[test]
    fn custom_field_and_root() {
        let n = TermNormalizer::new(adapter())
            .with_field("env_medium")
            .with_ecosystem_root(id("ENVO:10000004"));
        let mut q = QueryBuilder::new()
            .add_condition("==", "env_medium", "terrestrial", "biosample")
            .add_condition("==", "env_medium", "lake", "biosample")
            .add_condition("==", ENV_BROAD_SCALE, "soil", "biosample")
            .build();
        n.normalize(&mut q).unwrap();
        assert_eq!(values(&q), ["terrestrial", "lake ecosystem", "soil"]);
    }

    #[test]
    fn unlabelled_match_falls_through_to_next_mode() {
        let root = id("ENVO:00000428");
        let bare = id("ENVO:30000001");
        let named = id("ENVO:30000002");
        let o = MemoryOntology::builder()
            .term(root.clone(), "biome")
            .synonym(&bare, "peat")
            .term(named.clone(), "peatland biome")
            .edge(bare, Relation::IsA, root.clone())
            .edge(named, Relation::IsA, root)
            .build()
            .unwrap();
        let n = TermNormalizer::new(Arc::new(OntologyAdapter::from_provider(o)));
        let r = n.resolve("peat").unwrap().unwrap();
        assert_eq!(r.label, "peatland biome");
        assert_eq!(r.mode, MatchMode::PartialAlias);
    }
}

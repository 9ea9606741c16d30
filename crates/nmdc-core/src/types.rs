//! Core types for nmdc-core.
//!
//! This module defines the query model sent to the portal ([`Condition`],
//! [`Query`], [`QueryBuilder`]) and the ontology vocabulary shared by the
//! adapter and the normalizer ([`TermId`], [`Relation`], [`MatchMode`]).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Table a condition applies to when the caller does not name one.
pub const DEFAULT_TABLE: &str = "study";

// ---------------------------------------------------------------------------
// Query model
// ---------------------------------------------------------------------------

/// One `field <op> value` constraint against a portal table.
///
/// `value` holds raw user text until the normalizer rewrites it to a
/// canonical ontology label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub op: String,
    pub field: String,
    pub value: String,
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Condition {
    /// Build a condition. An empty `table` falls back to [`DEFAULT_TABLE`].
    pub fn new(
        op: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        let table = table.into();
        Self {
            op: op.into(),
            field: field.into(),
            value: value.into(),
            table: if table.is_empty() { default_table() } else { table },
        }
    }
}

/// Ordered list of conditions. Serializes to the portal's
/// `{"conditions": [...]}` request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub conditions: Vec<Condition>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Conditions constraining `field`, in insertion order.
    pub fn conditions_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Condition> {
        self.conditions.iter().filter(move |c| c.field == field)
    }
}

/// Append-only builder for a [`Query`].
///
/// ```rust
/// use nmdc_core::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .add_condition("==", "env_broad_scale", "terrestrial", "biosample")
///     .add_study_condition("==", "name", "soil")
///     .build();
/// assert_eq!(query.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_condition(
        mut self,
        op: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        self.query
            .conditions
            .push(Condition::new(op, field, value, table));
        self
    }

    /// Same as [`add_condition`](Self::add_condition) against the default table.
    pub fn add_study_condition(
        self,
        op: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.add_condition(op, field, value, DEFAULT_TABLE)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn build(self) -> Query {
        self.query
    }
}

// ---------------------------------------------------------------------------
// Ontology vocabulary
// ---------------------------------------------------------------------------

/// Compact identifier (`PREFIX:LOCAL`) of one ontology concept, e.g.
/// `ENVO:00000428`. Ordering is lexicographic on the full string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermId(String);

impl TermId {
    /// For identifiers fixed in source. Skips validation.
    pub(crate) fn from_static(id: &'static str) -> Self {
        TermId(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Vocabulary prefix (`ENVO` in `ENVO:00000428`).
    pub fn prefix(&self) -> &str {
        self.0.split_once(':').map(|(p, _)| p).unwrap_or("")
    }

    /// Local code (`00000428` in `ENVO:00000428`).
    pub fn local(&self) -> &str {
        self.0.split_once(':').map(|(_, l)| l).unwrap_or("")
    }
}

/// Error returned when a string is not a `PREFIX:LOCAL` identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid term id {0:?}: expected PREFIX:LOCAL")]
pub struct InvalidTermId(pub String);

impl FromStr for TermId {
    type Err = InvalidTermId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((prefix, local))
                if !prefix.is_empty()
                    && !local.is_empty()
                    && !s.chars().any(char::is_whitespace) =>
            {
                Ok(TermId(s.to_string()))
            }
            _ => Err(InvalidTermId(s.to_string())),
        }
    }
}

impl TryFrom<String> for TermId {
    type Error = InvalidTermId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TermId> for String {
    fn from(id: TermId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hierarchy relation followed when computing descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// `rdfs:subClassOf`: "is a kind of".
    IsA,
    /// `BFO:0000050`: "part of".
    PartOf,
}

impl Relation {
    pub fn curie(self) -> &'static str {
        match self {
            Relation::IsA => "rdfs:subClassOf",
            Relation::PartOf => "BFO:0000050",
        }
    }

    /// Map an OBO `relationship:` tag name to a relation we traverse.
    pub fn from_obo_name(name: &str) -> Option<Self> {
        match name {
            "is_a" | "rdfs:subClassOf" => Some(Relation::IsA),
            "part_of" | "BFO:0000050" => Some(Relation::PartOf),
            _ => None,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::IsA => write!(f, "is_a"),
            Relation::PartOf => write!(f, "part_of"),
        }
    }
}

/// How raw text is compared against concept labels and aliases.
///
/// Variants are declared from most to least precise; [`MatchMode::PRECEDENCE`]
/// is the order the normalizer tries them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    /// Text equals the concept's label.
    ExactLabel,
    /// Text equals the label or one of the synonyms.
    ExactAlias,
    /// Text occurs inside the label or one of the synonyms.
    PartialAlias,
}

impl MatchMode {
    pub const PRECEDENCE: [MatchMode; 3] = [
        MatchMode::ExactLabel,
        MatchMode::ExactAlias,
        MatchMode::PartialAlias,
    ];
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::ExactLabel => write!(f, "EXACT_LABEL"),
            MatchMode::ExactAlias => write!(f, "EXACT_ALIAS"),
            MatchMode::PartialAlias => write!(f, "PARTIAL_ALIAS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Test builders for queries.

use nmdc_core::{Query, QueryBuilder, ENV_BROAD_SCALE};

/// Query with one `env_broad_scale == v` biosample condition per value.
pub fn env_query(values: &[&str]) -> Query {
    values
        .iter()
        .fold(QueryBuilder::new(), |qb, v| {
            qb.add_condition("==", ENV_BROAD_SCALE, *v, "biosample")
        })
        .build()
}

/// The environment query plus an unrelated study-name condition carrying the
/// same text, for checking field selectivity.
pub fn mixed_query(environment: &str) -> Query {
    QueryBuilder::new()
        .add_condition("==", ENV_BROAD_SCALE, environment, "biosample")
        .add_condition("==", "omics_type", "Metagenome", "omics_processing")
        .add_study_condition("==", "name", environment)
        .build()
}

/// Condition values in order.
pub fn values(query: &Query) -> Vec<&str> {
    query.conditions.iter().map(|c| c.value.as_str()).collect()
}

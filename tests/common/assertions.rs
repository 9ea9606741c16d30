//! Domain-specific assertion macros for nmdc harnesses.

/// Assert the value of the condition at `index`.
///
/// ```rust
/// assert_condition_value!(query, 0, "terrestrial ecosystem");
/// ```
#[macro_export]
macro_rules! assert_condition_value {
    ($query:expr, $index:expr, $value:expr) => {{
        let query: &nmdc_core::Query = &$query;
        let index: usize = $index;
        let expected: &str = $value;
        match query.conditions.get(index) {
            Some(c) if c.value == expected => {}
            Some(c) => panic!(
                "assert_condition_value! failed:\n  conditions[{}] ({} on {})\n  expected: {:?}\n  actual:   {:?}",
                index, c.field, c.table, expected, c.value
            ),
            None => panic!(
                "assert_condition_value! failed: no condition at index {} (query has {})",
                index,
                query.conditions.len()
            ),
        }
    }};
}

/// Assert that two queries differ only in condition values: same length,
/// and the same `op`, `field` and `table` at every position.
#[macro_export]
macro_rules! assert_same_shape {
    ($before:expr, $after:expr) => {{
        let before: &nmdc_core::Query = &$before;
        let after: &nmdc_core::Query = &$after;
        ::std::assert_eq!(
            before.conditions.len(),
            after.conditions.len(),
            "assert_same_shape! failed: condition count changed"
        );
        for (i, (b, a)) in before.conditions.iter().zip(&after.conditions).enumerate() {
            assert!(
                b.op == a.op && b.field == a.field && b.table == a.table,
                "assert_same_shape! failed at conditions[{}]:\n  before: {:?}\n  after:  {:?}",
                i,
                b,
                a
            );
        }
    }};
}

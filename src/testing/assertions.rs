//! Assertions for join output.
//!
//! Co-group output order is not defined across keys, so most of these compare rows as
//! multisets.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

fn counts<T: Eq + Hash>(rows: &[T]) -> HashMap<&T, usize> {
    let mut m = HashMap::new();
    for r in rows {
        *m.entry(r).or_insert(0) += 1;
    }
    m
}

/// Assert element-by-element equality, order included.
///
/// Useful within a single key, where join rows have a defined order.
///
/// # Panics
///
/// Panics on a length mismatch or at the first differing index.
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a, e, "Mismatch at index {i}:\n  Full expected: {expected:?}\n  Full actual: {actual:?}");
    }
}

/// Assert that two row sets are equal as multisets (order ignored,
/// duplicates counted).
///
/// # Panics
///
/// Panics if a row occurs a different number of times on each side.
///
/// # Example
///
/// ```
/// use ironbeam_join::testing::assert_rows_unordered_equal;
///
/// assert_rows_unordered_equal(&[(1, 'a'), (2, 'b'), (1, 'a')], &[(2, 'b'), (1, 'a'), (1, 'a')]);
/// ```
pub fn assert_rows_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Row count mismatch:\n  Expected: {}\n  Actual: {}\n  Expected rows: {expected:?}\n  Actual rows: {actual:?}",
        expected.len(),
        actual.len()
    );

    let a = counts(actual);
    let e = counts(expected);
    if a != e {
        let missing: Vec<_> = e
            .iter()
            .filter(|(row, n)| a.get(*row) != Some(n))
            .map(|(row, _)| *row)
            .collect();
        let extra: Vec<_> = a
            .iter()
            .filter(|(row, n)| e.get(*row) != Some(n))
            .map(|(row, _)| *row)
            .collect();
        panic!(
            "Row content mismatch:\n  Rows with wrong multiplicity (expected side): {missing:?}\n  Rows with wrong multiplicity (actual side): {extra:?}"
        );
    }
}

/// Assert that every key appears exactly once, as co-group output requires.
///
/// # Panics
///
/// Panics on the first duplicated key.
pub fn assert_unique_keys<K: Debug + Eq + Hash, V>(rows: &[(K, V)]) {
    let mut seen = HashSet::new();
    for (k, _) in rows {
        assert!(seen.insert(k), "Key {k:?} appears more than once");
    }
}

/// Count rows per key, ordered by key.
#[must_use]
pub fn rows_per_key<K: Ord + Clone, V>(rows: &[(K, V)]) -> BTreeMap<K, usize> {
    let mut m = BTreeMap::new();
    for (k, _) in rows {
        *m.entry(k.clone()).or_insert(0) += 1;
    }
    m
}

//! Property-based tests for the join variants.
//!
//! Each join is compared against a nested-loop reference over small key
//! domains, so keys collide often and one-sided keys are common.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};

use ironbeam_join::*;
use proptest::prelude::*;

type Rows = Vec<(u8, u16)>;

fn arb_rows() -> impl Strategy<Value = Rows> {
    prop::collection::vec((0u8..5, 0u16..50), 0..12)
}

fn sorted<T: Ord>(mut v: Vec<T>) -> Vec<T> {
    v.sort();
    v
}

fn matches(rows: &Rows, k: u8) -> Vec<u16> {
    rows.iter().filter(|r| r.0 == k).map(|r| r.1).collect()
}

fn reference_inner(a: &Rows, b: &Rows) -> Vec<(u8, (u16, u16))> {
    let mut out = Vec::new();
    for &(k, v) in a {
        for w in matches(b, k) {
            out.push((k, (v, w)));
        }
    }
    out
}

fn reference_left(a: &Rows, b: &Rows) -> Vec<(u8, (u16, Option<u16>))> {
    let mut out = Vec::new();
    for &(k, v) in a {
        let ws = matches(b, k);
        if ws.is_empty() {
            out.push((k, (v, None)));
        }
        out.extend(ws.into_iter().map(|w| (k, (v, Some(w)))));
    }
    out
}

fn sources(a: Rows, b: Rows) -> (Pipeline, PCollection<(u8, u16)>, PCollection<(u8, u16)>) {
    let p = Pipeline::with_options(
        PipelineOptions::default().with_chained_cogroups(ChainedCoGroupCheck::Off),
    );
    let ca = from_vec(&p, a);
    let cb = from_vec(&p, b);
    (p, ca, cb)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, ..ProptestConfig::default() })]

    #[test]
    fn inner_matches_nested_loop(a in arb_rows(), b in arb_rows()) {
        let expected = sorted(reference_inner(&a, &b));
        let (_p, ca, cb) = sources(a, b);
        let joined = join::inner("inner", &ca, &cb).expect("build");

        prop_assert_eq!(joined.clone().collect_seq_sorted().expect("seq"), expected.clone());
        prop_assert_eq!(joined.collect_par_sorted(Some(2), Some(3)).expect("par"), expected);
    }

    #[test]
    fn inner_row_count_is_product_per_key(a in arb_rows(), b in arb_rows()) {
        let (_p, ca, cb) = sources(a.clone(), b.clone());
        let rows = join::inner("inner", &ca, &cb).expect("build").collect_seq().expect("run");

        let mut per_key: BTreeMap<u8, usize> = BTreeMap::new();
        for (k, _) in &rows {
            *per_key.entry(*k).or_default() += 1;
        }
        for k in 0u8..5 {
            let n = matches(&a, k).len() * matches(&b, k).len();
            prop_assert_eq!(per_key.get(&k).copied().unwrap_or(0), n);
        }
    }

    #[test]
    fn left_covers_every_left_value(a in arb_rows(), b in arb_rows()) {
        let expected = sorted(reference_left(&a, &b));
        let (_p, ca, cb) = sources(a, b);
        let rows = join::left("left", &ca, &cb).expect("build").collect_par_sorted(None, Some(4)).expect("run");
        prop_assert_eq!(rows, expected);
    }

    #[test]
    fn right_mirrors_left(a in arb_rows(), b in arb_rows()) {
        let expected: Vec<(u8, (Option<u16>, u16))> = sorted(
            reference_left(&b, &a)
                .into_iter()
                .map(|(k, (w, v))| (k, (v, w)))
                .collect(),
        );
        let (_p, ca, cb) = sources(a, b);
        let rows = join::right("right", &ca, &cb).expect("build").collect_seq_sorted().expect("run");
        prop_assert_eq!(rows, expected);
    }

    #[test]
    fn outer_is_left_union_unmatched_right(a in arb_rows(), b in arb_rows()) {
        let (_p, ca, cb) = sources(a, b);
        let left = join::left("left", &ca, &cb).expect("build").collect_seq().expect("run");
        let right = join::right("right", &ca, &cb).expect("build").collect_seq().expect("run");
        let outer = join::outer("outer", &ca, &cb).expect("build").collect_par_sorted(None, None).expect("run");

        let mut expected: Vec<(u8, (Option<u16>, Option<u16>))> = left
            .into_iter()
            .map(|(k, (v, w))| (k, (Some(v), w)))
            .collect();
        expected.extend(
            right
                .into_iter()
                .filter(|(_, (v, _))| v.is_none())
                .map(|(k, (v, w))| (k, (v, Some(w)))),
        );
        prop_assert_eq!(outer, sorted(expected));
    }

    #[test]
    fn cogroup_has_one_record_per_key(a in arb_rows(), b in arb_rows()) {
        let keys: BTreeSet<u8> = a.iter().chain(&b).map(|r| r.0).collect();
        let (_p, ca, cb) = sources(a.clone(), b.clone());
        let rows = join::cogroup("cg", &ca, &cb).expect("build").collect_par(None, Some(3)).expect("run");

        prop_assert_eq!(rows.len(), keys.len());
        let seen: BTreeSet<u8> = rows.iter().map(|r| r.0).collect();
        prop_assert_eq!(&seen, &keys);
        for (k, (vs, ws)) in rows {
            prop_assert_eq!(sorted(vs), sorted(matches(&a, k)));
            prop_assert_eq!(sorted(ws), sorted(matches(&b, k)));
        }
    }

    #[test]
    fn empty_side_per_variant(a in arb_rows()) {
        let (_p, ca, empty) = sources(a.clone(), Vec::new());

        prop_assert!(join::inner("inner", &ca, &empty).expect("build").collect_seq().expect("run").is_empty());
        prop_assert!(join::right("right", &ca, &empty).expect("build").collect_seq().expect("run").is_empty());

        let left = join::left("left", &ca, &empty).expect("build").collect_seq_sorted().expect("run");
        let all_absent: Vec<(u8, (u16, Option<u16>))> = a.iter().map(|&(k, v)| (k, (v, None))).collect();
        prop_assert_eq!(left, sorted(all_absent));

        let outer = join::outer("outer", &empty, &ca).expect("build").collect_seq_sorted().expect("run");
        let right_only: Vec<(u8, (Option<u16>, Option<u16>))> =
            a.iter().map(|&(k, v)| (k, (None, Some(v)))).collect();
        prop_assert_eq!(outer, sorted(right_only));
    }
}

//! Tests for the pipeline graph and the element-wise transforms joins build on.

use anyhow::Result;
use ironbeam_join::testing::*;
use ironbeam_join::*;

#[test]
fn test_pipeline_default() {
    let p = TestPipeline::new();
    assert_eq!(p.node_count(), 0);
    assert_eq!(p.edge_count(), 0);
    assert_eq!(p.options(), &PipelineOptions::default());
}

#[test]
fn test_pipeline_clone_shares_graph() {
    let p1 = TestPipeline::new();
    let _data = from_vec(&p1, vec![1, 2, 3]);

    let p2 = p1.clone();
    let _more = from_vec(&p2, vec![4]);
    assert_eq!(p1.node_count(), 2);
    assert_eq!(p2.node_count(), 2);
}

#[test]
fn test_pipeline_edges() {
    let p = TestPipeline::new();
    let data = from_vec(&p, vec![1, 2, 3]);
    let _filtered = data.map(|x: &i32| x * 2).filter(|x: &i32| *x > 2);

    assert_eq!(p.node_count(), 3);
    assert_eq!(p.edge_count(), 2);
}

#[test]
fn test_node_ids_are_distinct() {
    let p = TestPipeline::new();
    let a = from_vec(&p, vec![1u8]);
    let b = a.clone().map(|x: &u8| x + 1);
    assert_ne!(a.node_id(), b.node_id());
    assert!(b.node_id().raw() > a.node_id().raw());
}

#[test]
fn test_map_filter_flat_map() -> Result<()> {
    let p = TestPipeline::new();
    let words = from_vec(&p, vec!["a b".to_string(), "c".to_string(), String::new()]);
    let out = words
        .flat_map(|s: &String| s.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|s: &String| s != "b")
        .map(|s: &String| s.to_uppercase());

    assert_eq!(out.collect_seq()?, vec!["A".to_string(), "C".to_string()]);
    Ok(())
}

#[test]
fn test_from_iter() -> Result<()> {
    let p = TestPipeline::new();
    let squares = from_iter(&p, (1..=4).map(|i: u32| i * i));
    assert_eq!(squares.collect_seq()?, vec![1, 4, 9, 16]);
    Ok(())
}

#[test]
fn test_key_by_and_group_by_key() -> Result<()> {
    let p = TestPipeline::new();
    let nums = from_iter(&p, 1..=10u32);
    let grouped = nums
        .key_by(|n: &u32| n % 3)
        .filter_values(|n: &u32| *n != 9)
        .group_by_key()
        .map_values(|vs: &Vec<u32>| {
            let mut vs = vs.clone();
            vs.sort_unstable();
            vs
        });

    assert_eq!(
        grouped.collect_par_sorted(Some(2), Some(4))?,
        vec![(0, vec![3, 6]), (1, vec![1, 4, 7, 10]), (2, vec![2, 5, 8])]
    );
    Ok(())
}

#[test]
fn test_seq_and_par_agree() -> Result<()> {
    let p = TestPipeline::new();
    let data = from_iter(&p, 0..1000u32);
    let out = data.map(|x: &u32| x * 3).filter(|x: &u32| x % 2 == 0);

    let seq = out.clone().collect_seq()?;
    let par = out.collect_par(Some(4), Some(7))?;
    // Partitioned execution preserves source order for element-wise stages.
    assert_collections_equal(&par, &seq);
    assert_eq!(seq.len(), 500);
    Ok(())
}

#[test]
fn test_empty_source() -> Result<()> {
    let p = TestPipeline::new();
    let empty = from_vec(&p, Vec::<(u8, u8)>::new());
    assert!(empty.clone().collect_par(None, None)?.is_empty());
    assert!(empty.group_by_key().collect_seq()?.is_empty());
    Ok(())
}

#[test]
fn test_rows_per_key_helper() -> Result<()> {
    let p = TestPipeline::new();
    let a = from_vec(&p, vec![(1u8, 'a'), (1, 'b'), (2, 'c')]);
    let b = from_vec(&p, vec![(1u8, 'x'), (1, 'y'), (2, 'z')]);
    let rows = a.join_inner("ab", &b)?.collect_par(None, Some(2))?;

    let counts = rows_per_key(&rows);
    assert_eq!(counts.get(&1), Some(&4));
    assert_eq!(counts.get(&2), Some(&1));
    Ok(())
}

//! The shared co-group kernel.
//!
//! Every join variant is the same graph: capture each input's sub-plan, tag
//! the rows, group them with a [`CoGroupByKey`], and call a per-key expansion
//! that pushes output rows. Only the expansion differs between variants.

use super::chain::{CollectionState, check_chained};
use super::grouping::CoGroupByKey;
use super::optional::SideMode;
use crate::error::{JoinError, JoinResult};
use crate::node::{MergeFn, Node};
use crate::planner::build_plan;
use crate::type_token::{Partition, VecOps, downcast_vec, vec_ops_for};
use crate::{NodeId, PCollection, Pipeline, RFBound};
use anyhow::{Result, anyhow};
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::Arc;

/// A value tagged with the input it came from.
pub(crate) enum Tagged<A, B, C = Infallible> {
    A(A),
    B(B),
    C(C),
}

/// Split one key's per-tag slots back into typed vectors.
fn untag<A, B, C>(slots: Vec<Vec<Tagged<A, B, C>>>) -> (Vec<A>, Vec<B>, Vec<C>) {
    let (mut a, mut b, mut c) = (Vec::new(), Vec::new(), Vec::new());
    for v in slots.into_iter().flatten() {
        match v {
            Tagged::A(x) => a.push(x),
            Tagged::B(x) => b.push(x),
            Tagged::C(x) => c.push(x),
        }
    }
    (a, b, c)
}

/// Emit one row per (left, right) pair of a key group.
///
/// The right side drives the outer loop and the left side is re-read from the
/// group for every right value.
pub(crate) fn expand_pairs<K, V, W, L, R>(
    key: &K,
    left: &[V],
    right: &[W],
    out: &mut Vec<(K, (L::Item, R::Item))>,
) where
    K: Clone,
    V: Clone + 'static,
    W: Clone + 'static,
    L: SideMode<V>,
    R: SideMode<W>,
{
    for w in R::values(right) {
        for v in L::values(left) {
            out.push((key.clone(), (v, w.clone())));
        }
    }
}

/// One input of a co-group being built.
struct Input<'a> {
    pipeline: &'a Pipeline,
    id: NodeId,
    state: CollectionState,
    ops: Arc<dyn VecOps>,
}

impl<'a> Input<'a> {
    fn of<K: RFBound, V: RFBound>(c: &'a PCollection<(K, V)>) -> Self {
        Self {
            pipeline: &c.pipeline,
            id: c.id,
            state: c.state,
            ops: vec_ops_for::<(K, V)>(),
        }
    }
}

/// Check for chaining, capture sub-plans and insert the co-group node.
///
/// Nothing is added to the graph when the check or a capture fails.
fn insert_cogroup<Out: RFBound>(
    name: &str,
    inputs: Vec<Input<'_>>,
    exec: MergeFn,
) -> JoinResult<PCollection<Out>> {
    let pipeline = inputs[0].pipeline.clone();
    let states: Vec<CollectionState> = inputs.iter().map(|i| i.state).collect();
    check_chained(name, &states, pipeline.options().chained_cogroups)?;

    let mut chains = Vec::with_capacity(inputs.len());
    let mut input_ops = Vec::with_capacity(inputs.len());
    for input in inputs {
        let plan = build_plan(input.pipeline, input.id).map_err(|source| JoinError::Plan {
            transform: name.to_string(),
            source,
        })?;
        chains.push(Arc::new(plan.chain));
        input_ops.push(input.ops);
    }

    let id = pipeline.insert_node(Node::CoGroup {
        name: Arc::from(name),
        inputs: chains,
        input_ops,
        exec,
        out_ops: vec_ops_for::<Out>(),
    });
    tracing::debug!(transform = name, node = id.raw(), "added co-group");
    Ok(PCollection::new(
        pipeline,
        id,
        CollectionState::default().after_cogroup(),
    ))
}

fn take_inputs<const N: usize>(parts: Vec<Partition>, name: &str) -> Result<[Partition; N]> {
    let got = parts.len();
    parts
        .try_into()
        .map_err(|_| anyhow!("co-group `{name}`: expected {N} inputs, got {got}"))
}

/// Two-way co-group; `expand` is called once per distinct key.
pub(crate) fn cogroup2<K, V, W, Out, G, F>(
    name: &str,
    left: &PCollection<(K, V)>,
    right: &PCollection<(K, W)>,
    grouper: G,
    expand: F,
) -> JoinResult<PCollection<Out>>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
    Out: RFBound,
    G: CoGroupByKey + Clone,
    F: Fn(K, Vec<V>, Vec<W>, &mut Vec<Out>) + Send + Sync + 'static,
{
    let label: Arc<str> = Arc::from(name);
    let exec: MergeFn = Arc::new(move |parts: Vec<Partition>| -> Result<Partition> {
        let [l, r] = take_inputs::<2>(parts, &label)?;
        let l = downcast_vec::<(K, V)>(l, &label)?;
        let r = downcast_vec::<(K, W)>(r, &label)?;

        let tagged: Vec<Vec<(K, Tagged<V, W>)>> = vec![
            l.into_iter().map(|(k, v)| (k, Tagged::A(v))).collect(),
            r.into_iter().map(|(k, w)| (k, Tagged::B(w))).collect(),
        ];

        let mut out: Vec<Out> = Vec::new();
        for (k, slots) in grouper.co_group_by_key(tagged) {
            let (vs, ws, _) = untag(slots);
            expand(k, vs, ws, &mut out);
        }
        Ok(Box::new(out) as Partition)
    });

    insert_cogroup(name, vec![Input::of(left), Input::of(right)], exec)
}

/// Three-way co-group in a single grouping pass.
pub(crate) fn cogroup3<K, A, B, C, Out, G, F>(
    name: &str,
    a: &PCollection<(K, A)>,
    b: &PCollection<(K, B)>,
    c: &PCollection<(K, C)>,
    grouper: G,
    expand: F,
) -> JoinResult<PCollection<Out>>
where
    K: RFBound + Eq + Hash,
    A: RFBound,
    B: RFBound,
    C: RFBound,
    Out: RFBound,
    G: CoGroupByKey + Clone,
    F: Fn(K, Vec<A>, Vec<B>, Vec<C>, &mut Vec<Out>) + Send + Sync + 'static,
{
    let label: Arc<str> = Arc::from(name);
    let exec: MergeFn = Arc::new(move |parts: Vec<Partition>| -> Result<Partition> {
        let [pa, pb, pc] = take_inputs::<3>(parts, &label)?;
        let tagged: Vec<Vec<(K, Tagged<A, B, C>)>> = vec![
            downcast_vec::<(K, A)>(pa, &label)?
                .into_iter()
                .map(|(k, v)| (k, Tagged::A(v)))
                .collect(),
            downcast_vec::<(K, B)>(pb, &label)?
                .into_iter()
                .map(|(k, v)| (k, Tagged::B(v)))
                .collect(),
            downcast_vec::<(K, C)>(pc, &label)?
                .into_iter()
                .map(|(k, v)| (k, Tagged::C(v)))
                .collect(),
        ];

        let mut out: Vec<Out> = Vec::new();
        for (k, slots) in grouper.co_group_by_key(tagged) {
            let (va, vb, vc) = untag(slots);
            expand(k, va, vb, vc, &mut out);
        }
        Ok(Box::new(out) as Partition)
    });

    insert_cogroup(
        name,
        vec![Input::of(a), Input::of(b), Input::of(c)],
        exec,
    )
}

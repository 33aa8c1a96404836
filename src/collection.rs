use crate::join::CollectionState;
use crate::node::{DynOp, Node};
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::runner::{ExecMode, Runner};
use crate::type_token::{Partition, TypeTag, downcast_vec, vec_ops_for};
use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;

/// Bound every element type must satisfy: shareable across worker threads and
/// encodable (the serde bounds stand in for a coder).
pub trait RFBound: 'static + Send + Sync + Clone + Serialize + DeserializeOwned {}
impl<T> RFBound for T where T: 'static + Send + Sync + Clone + Serialize + DeserializeOwned {}

/// A lazily evaluated collection of `T` inside a [`Pipeline`].
///
/// The handle is cheap to clone and never mutated: every transform returns a
/// new handle. Besides the node id it carries a [`CollectionState`] that joins
/// use to spot chained co-groups.
#[derive(Clone)]
pub struct PCollection<T> {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
    pub(crate) state: CollectionState,
    _t: PhantomData<T>,
}

impl<T> PCollection<T> {
    pub(crate) fn new(pipeline: Pipeline, id: NodeId, state: CollectionState) -> Self {
        Self {
            pipeline,
            id,
            state,
            _t: PhantomData,
        }
    }

    /// The pipeline this collection belongs to.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Graph node producing this collection.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Chain-detection state carried by this handle.
    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.state
    }

    /// Append `node` downstream of this collection.
    ///
    /// `state` is the state of the resulting handle: element-wise transforms
    /// pass the current one through, shuffles start fresh.
    pub(crate) fn then<O>(self, node: Node, state: CollectionState) -> PCollection<O> {
        let id = self.pipeline.insert_node(node);
        self.pipeline.connect(self.id, id);
        PCollection::new(self.pipeline, id, state)
    }
}

/// Create a collection from an in-memory vector.
pub fn from_vec<T>(p: &Pipeline, data: Vec<T>) -> PCollection<T>
where
    T: RFBound,
{
    let id = p.insert_node(Node::Source {
        payload: Arc::new(data),
        vec_ops: vec_ops_for::<T>(),
        elem_tag: TypeTag::of::<T>(),
    });
    PCollection::new(p.clone(), id, CollectionState::default())
}

/// Create a collection from any owned iterator.
pub fn from_iter<T, I>(p: &Pipeline, iter: I) -> PCollection<T>
where
    T: RFBound,
    I: IntoIterator<Item = T>,
{
    from_vec(p, iter.into_iter().collect::<Vec<T>>())
}

// ---- Stateless DynOps ----

pub(crate) struct MapOp<I, O, F>(pub F, pub PhantomData<(I, O)>);
impl<I, O, F> DynOp for MapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> O + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let v = downcast_vec::<I>(input, "map")?;
        let out: Vec<O> = v.iter().map(|i| self.0(i)).collect();
        Ok(Box::new(out) as Partition)
    }

    fn label(&self) -> &'static str {
        "map"
    }
}

pub(crate) struct FilterOp<T, P>(pub P, pub PhantomData<T>);
impl<T, P> DynOp for FilterOp<T, P>
where
    T: RFBound,
    P: Send + Sync + Fn(&T) -> bool + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let v = downcast_vec::<T>(input, "filter")?;
        Ok(Box::new(v.into_iter().filter(|t| self.0(t)).collect::<Vec<T>>()) as Partition)
    }

    fn label(&self) -> &'static str {
        "filter"
    }
}

pub(crate) struct FlatMapOp<I, O, F>(pub F, pub PhantomData<(I, O)>);
impl<I, O, F> DynOp for FlatMapOp<I, O, F>
where
    I: RFBound,
    O: RFBound,
    F: Send + Sync + Fn(&I) -> Vec<O> + 'static,
{
    fn apply(&self, input: Partition) -> Result<Partition> {
        let v = downcast_vec::<I>(input, "flat_map")?;
        let mut out: Vec<O> = Vec::new();
        for i in &v {
            out.extend(self.0(i));
        }
        Ok(Box::new(out) as Partition)
    }

    fn label(&self) -> &'static str {
        "flat_map"
    }
}

impl<T: RFBound> PCollection<T> {
    /// Transform each element.
    #[must_use]
    pub fn map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        let op: Arc<dyn DynOp> = Arc::new(MapOp::<T, O, F>(f, PhantomData));
        let state = self.state;
        self.then(Node::Stateless(vec![op]), state)
    }

    /// Keep elements matching `pred`.
    #[must_use]
    pub fn filter<F>(self, pred: F) -> PCollection<T>
    where
        F: 'static + Send + Sync + Fn(&T) -> bool,
    {
        let op: Arc<dyn DynOp> = Arc::new(FilterOp::<T, F>(pred, PhantomData));
        let state = self.state;
        self.then(Node::Stateless(vec![op]), state)
    }

    /// Transform each element into zero or more outputs.
    #[must_use]
    pub fn flat_map<O, F>(self, f: F) -> PCollection<O>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&T) -> Vec<O>,
    {
        let op: Arc<dyn DynOp> = Arc::new(FlatMapOp::<T, O, F>(f, PhantomData));
        let state = self.state;
        self.then(Node::Stateless(vec![op]), state)
    }

    /// Execute on the current thread and return every element.
    ///
    /// # Errors
    /// Propagates planning and execution failures.
    pub fn collect_seq(self) -> Result<Vec<T>> {
        Runner {
            mode: ExecMode::Sequential,
            ..Default::default()
        }
        .run_collect::<T>(&self.pipeline, self.id)
    }

    /// Execute on a rayon pool and return every element.
    ///
    /// `threads` sizes a dedicated pool (the global pool when `None`);
    /// `partitions` overrides the runner's default split.
    ///
    /// # Errors
    /// Propagates planning and execution failures.
    pub fn collect_par(self, threads: Option<usize>, partitions: Option<usize>) -> Result<Vec<T>> {
        Runner {
            mode: ExecMode::Parallel {
                threads,
                partitions,
            },
            ..Default::default()
        }
        .run_collect::<T>(&self.pipeline, self.id)
    }
}

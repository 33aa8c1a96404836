//! Graph nodes.
//!
//! A node is a type-erased step. The typed builder methods on
//! [`PCollection`](crate::PCollection) close over their element types and hand
//! the runner closures that operate on [`Partition`]s.

use crate::type_token::{Partition, TypeTag, VecOps};
use anyhow::Result;
use std::any::Any;
use std::sync::Arc;

/// A per-partition, element-wise operation.
pub trait DynOp: Send + Sync {
    /// Transform one partition.
    ///
    /// # Errors
    /// Fails if the partition is not the element type the op was built for.
    fn apply(&self, input: Partition) -> Result<Partition>;

    /// Short label used in runner logs.
    fn label(&self) -> &'static str;
}

pub(crate) type LocalFn = Arc<dyn Fn(Partition) -> Result<Partition> + Send + Sync>;
pub(crate) type MergeFn = Arc<dyn Fn(Vec<Partition>) -> Result<Partition> + Send + Sync>;

#[derive(Clone)]
pub enum Node {
    Source {
        payload: Arc<dyn Any + Send + Sync>,
        vec_ops: Arc<dyn VecOps>,
        elem_tag: TypeTag,
    },
    Stateless(Vec<Arc<dyn DynOp>>),

    /// GroupByKey: `local` turns a `Vec<(K, V)>` partition into a
    /// `HashMap<K, Vec<V>>`; `merge` folds those into `Vec<(K, Vec<V>)>`.
    GroupByKey { local: LocalFn, merge: MergeFn },

    /// N-way co-group. Each entry of `inputs` is a self-contained sub-plan
    /// (starting at a source or another co-group) producing the keyed rows
    /// for one tag; `input_ops[i]` stitches that sub-plan's partitions
    /// together. `exec` receives one coalesced partition per tag, in tag
    /// order, and returns the expanded rows. `out_ops` lets the runner
    /// re-split the result for downstream parallel stages.
    CoGroup {
        name: Arc<str>,
        inputs: Vec<Arc<Vec<Node>>>,
        input_ops: Vec<Arc<dyn VecOps>>,
        exec: MergeFn,
        out_ops: Arc<dyn VecOps>,
    },
}

impl Node {
    /// Short human-readable kind, for logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Source { .. } => "Source",
            Node::Stateless(_) => "Stateless",
            Node::GroupByKey { .. } => "GroupByKey",
            Node::CoGroup { .. } => "CoGroup",
        }
    }

    /// Whether the node starts a linear chain (has no upstream edge).
    pub(crate) fn is_root(&self) -> bool {
        matches!(self, Node::Source { .. } | Node::CoGroup { .. })
    }
}

//! Identifiers for nodes in a [`Pipeline`](crate::pipeline::Pipeline) graph.
//!
//! Ids are handed out sequentially on insertion. The planner walks edges by
//! id when it linearizes the ancestry of a collection.

/// Unique numeric identifier for a node in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

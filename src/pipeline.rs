use crate::node::Node;
use crate::node_id::NodeId;
use crate::options::PipelineOptions;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Container for a computation graph.
///
/// Cloning a `Pipeline` is cheap; clones share the same graph and options.
#[derive(Clone, Default)]
pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
    options: Arc<PipelineOptions>,
}

#[derive(Default)]
pub(crate) struct PipelineInner {
    pub next_id: u64,
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl Pipeline {
    /// Create an empty pipeline using `options`.
    #[must_use]
    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            inner: Arc::default(),
            options: Arc::new(options),
        }
    }

    /// Options shared by every transform on this pipeline.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Number of nodes currently in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Number of edges currently in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.lock().edges.len()
    }

    fn lock(&self) -> MutexGuard<'_, PipelineInner> {
        // Graph mutations are single inserts; a poisoned guard still holds a consistent graph.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.lock();
        let id = NodeId::new(g.next_id);
        g.next_id += 1;
        g.nodes.insert(id, node);
        id
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        self.lock().edges.push((from, to));
    }

    pub(crate) fn snapshot(&self) -> (HashMap<NodeId, Node>, Vec<(NodeId, NodeId)>) {
        let g = self.lock();
        (g.nodes.clone(), g.edges.clone())
    }
}

//! Plan construction.
//!
//! The planner turns the ancestry of a collection into a **linear chain** that
//! starts at a root node (a source or a co-group, which owns its input
//! sub-plans) and ends at the requested node. Adjacent `Stateless` blocks are
//! fused so the runner applies them in a single pass per partition.
//!
//! Co-group construction uses the same routine to capture each input's
//! sub-plan at the moment the join is built.

use crate::node::{DynOp, Node};
use crate::{NodeId, Pipeline};
use anyhow::{Result, anyhow, bail};
use std::sync::Arc;

/// A linearized execution chain, root first.
pub(crate) struct Plan {
    pub chain: Vec<Node>,
}

/// Walk back from `terminal` to its root and fuse stateless runs.
///
/// # Errors
/// Fails if the graph references a missing node or the walk does not end at a
/// source or co-group.
pub(crate) fn build_plan(p: &Pipeline, terminal: NodeId) -> Result<Plan> {
    let (mut nodes, edges) = p.snapshot();
    let mut chain = Vec::<Node>::new();
    let mut cur = terminal;
    loop {
        let n = nodes
            .remove(&cur)
            .ok_or_else(|| anyhow!("missing node {cur:?}"))?;
        let is_root = n.is_root();
        chain.push(n);
        if is_root {
            break;
        }
        match edges.iter().find(|(_, to)| *to == cur) {
            Some((from, _)) => cur = *from,
            None => bail!("node {cur:?} has no upstream and is not a source"),
        }
    }
    chain.reverse();

    let before = chain.len();
    let chain = fuse_stateless(chain);
    tracing::trace!(
        terminal = terminal.raw(),
        nodes = before,
        stages = chain.len(),
        "built plan"
    );
    Ok(Plan { chain })
}

fn fuse_stateless(chain: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(chain.len());
    for node in chain {
        match node {
            Node::Stateless(more) => {
                if let Some(Node::Stateless(acc)) = out.last_mut() {
                    acc.extend(more);
                } else {
                    out.push(Node::Stateless(more));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Total number of element-wise ops in a plan, for logging.
pub(crate) fn stateless_ops(chain: &[Node]) -> usize {
    chain
        .iter()
        .map(|n| match n {
            Node::Stateless(ops) => ops.len(),
            _ => 0,
        })
        .sum()
}

/// Labels of fused ops in a stateless stage.
pub(crate) fn op_labels(ops: &[Arc<dyn DynOp>]) -> Vec<&'static str> {
    ops.iter().map(|op| op.label()).collect()
}

//! Executes linearized plans.
//!
//! A plan starts at a root node. For a `Source` the payload is split into
//! partitions; for a `CoGroup` each input sub-plan is executed recursively
//! (concurrently in parallel mode), coalesced, and handed to the co-group's
//! `exec`. Stateless stages then run per partition, and a `GroupByKey` folds
//! per-partition maps into one partition.

use crate::node::Node;
use crate::pipeline::Pipeline;
use crate::planner::{build_plan, op_labels, stateless_ops};
use crate::type_token::{Partition, VecOps, downcast_vec};
use crate::NodeId;
use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
pub enum ExecMode {
    Sequential,
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

pub struct Runner {
    pub mode: ExecMode,
    pub default_partitions: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel {
                threads: None,
                partitions: None,
            },
            default_partitions: 2 * num_cpus::get().max(2),
        }
    }
}

/// Per-run settings threaded through recursive sub-plan execution.
#[derive(Clone, Copy)]
struct ExecCtx {
    partitions: usize,
    parallel: bool,
}

impl Runner {
    /// Plan and execute the ancestry of `terminal`, returning its elements.
    ///
    /// # Errors
    /// Fails on planning errors, type mismatches between stages, or a failed
    /// thread-pool build.
    pub fn run_collect<T: 'static + Send + Sync + Clone>(
        &self,
        p: &Pipeline,
        terminal: NodeId,
    ) -> Result<Vec<T>> {
        let plan = build_plan(p, terminal)?;
        tracing::debug!(
            terminal = terminal.raw(),
            stages = plan.chain.len(),
            stateless_ops = stateless_ops(&plan.chain),
            mode = ?self.mode,
            "running plan"
        );

        let parts = match self.mode {
            ExecMode::Sequential => exec_chain(
                &plan.chain,
                ExecCtx {
                    partitions: 1,
                    parallel: false,
                },
            )?,
            ExecMode::Parallel {
                threads,
                partitions,
            } => {
                let ctx = ExecCtx {
                    partitions: partitions.unwrap_or(self.default_partitions).max(1),
                    parallel: true,
                };
                match threads {
                    Some(t) => rayon::ThreadPoolBuilder::new()
                        .num_threads(t)
                        .build()
                        .context("building rayon pool")?
                        .install(|| exec_chain(&plan.chain, ctx))?,
                    None => exec_chain(&plan.chain, ctx)?,
                }
            }
        };

        let mut out = Vec::<T>::new();
        for part in parts {
            out.extend(downcast_vec::<T>(part, "terminal")?);
        }
        Ok(out)
    }
}

fn exec_chain(chain: &[Node], ctx: ExecCtx) -> Result<Vec<Partition>> {
    let Some((root, rest)) = chain.split_first() else {
        bail!("empty plan");
    };

    let mut parts = exec_root(root, ctx)?;

    for node in rest {
        parts = match node {
            Node::Stateless(ops) => {
                tracing::trace!(ops = ?op_labels(ops), partitions = parts.len(), "stateless stage");
                let apply = |chunk: Partition| ops.iter().try_fold(chunk, |acc, op| op.apply(acc));
                if ctx.parallel {
                    parts.into_par_iter().map(apply).collect::<Result<Vec<_>>>()?
                } else {
                    parts.into_iter().map(apply).collect::<Result<Vec<_>>>()?
                }
            }
            Node::GroupByKey { local, merge } => {
                let locals = if ctx.parallel {
                    parts
                        .into_par_iter()
                        .map(|chunk| local(chunk))
                        .collect::<Result<Vec<_>>>()?
                } else {
                    parts
                        .into_iter()
                        .map(|chunk| local(chunk))
                        .collect::<Result<Vec<_>>>()?
                };
                vec![merge(locals)?]
            }
            Node::Source { .. } | Node::CoGroup { .. } => {
                bail!("unexpected {} in the middle of a plan", node.kind())
            }
        };
    }
    Ok(parts)
}

fn exec_root(root: &Node, ctx: ExecCtx) -> Result<Vec<Partition>> {
    match root {
        Node::Source {
            payload,
            vec_ops,
            elem_tag,
        } => {
            let len = vec_ops.len(payload.as_ref()).unwrap_or(0);
            let n = ctx.partitions.min(len.max(1));
            vec_ops
                .split(payload.as_ref(), n)
                .ok_or_else(|| anyhow!("source payload is not a Vec<{}>", elem_tag.name))
        }
        Node::CoGroup {
            name,
            inputs,
            input_ops,
            exec,
            out_ops,
        } => {
            let run_input = |(sub, ops): (&Arc<Vec<Node>>, &Arc<dyn VecOps>)| -> Result<Partition> {
                let parts = exec_chain(sub, ctx)?;
                ops.concat(parts).ok_or_else(|| {
                    anyhow!(
                        "co-group `{name}`: input is not a Vec<{}>",
                        ops.elem_tag().name
                    )
                })
            };
            let tagged = if ctx.parallel {
                inputs
                    .par_iter()
                    .zip(input_ops.par_iter())
                    .map(run_input)
                    .collect::<Result<Vec<_>>>()?
            } else {
                inputs
                    .iter()
                    .zip(input_ops.iter())
                    .map(run_input)
                    .collect::<Result<Vec<_>>>()?
            };

            let out = exec(tagged).with_context(|| format!("co-group `{name}`"))?;
            let rows = out_ops.len(out.as_ref()).unwrap_or(0);
            tracing::debug!(transform = %name, inputs = inputs.len(), rows, "co-group finished");

            if ctx.partitions > 1 && rows > 1 {
                out_ops
                    .split(out.as_ref(), ctx.partitions.min(rows))
                    .ok_or_else(|| anyhow!("co-group `{name}`: unexpected output type"))
            } else {
                Ok(vec![out])
            }
        }
        Node::Stateless(_) | Node::GroupByKey { .. } => {
            bail!("plan must start with a Source or CoGroup, found {}", root.kind())
        }
    }
}

//! Testing utilities for join pipelines.
//!
//! - [`TestPipeline`]: a [`Pipeline`] wrapper with graph inspection helpers
//! - Assertions for comparing join output regardless of row order
//! - [`LogCapture`]: capture `tracing` output emitted while building a pipeline
//!
//! ```no_run
//! use ironbeam_join::*;
//! use ironbeam_join::testing::*;
//!
//! #[test]
//! fn inner_join() -> anyhow::Result<()> {
//!     let p = TestPipeline::new();
//!     let a = from_vec(&p, vec![(1u8, 'a')]);
//!     let b = from_vec(&p, vec![(1u8, 'b')]);
//!     let rows = join::inner("ab", &a, &b)?.collect_seq()?;
//!     assert_rows_unordered_equal(&rows, &[(1, ('a', 'b'))]);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod logs;

pub use assertions::*;
pub use logs::*;

use crate::{ChainedCoGroupCheck, Pipeline, PipelineOptions};

/// A test-focused wrapper around [`Pipeline`].
#[derive(Clone)]
pub struct TestPipeline {
    pipeline: Pipeline,
}

impl TestPipeline {
    /// Create a test pipeline with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::default(),
        }
    }

    /// Create a test pipeline with the given chained co-group check.
    #[must_use]
    pub fn with_chained_cogroups(check: ChainedCoGroupCheck) -> Self {
        Self {
            pipeline: Pipeline::with_options(
                PipelineOptions::default().with_chained_cogroups(check),
            ),
        }
    }

    /// Print the node and edge counts of the graph.
    pub fn debug_print_graph(&self) {
        println!("Pipeline Graph:");
        println!("  Nodes: {}", self.pipeline.node_count());
        println!("  Edges: {}", self.pipeline.edge_count());
    }
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestPipeline {
    type Target = Pipeline;

    fn deref(&self) -> &Self::Target {
        &self.pipeline
    }
}

impl AsRef<Pipeline> for TestPipeline {
    fn as_ref(&self) -> &Pipeline {
        &self.pipeline
    }
}

//! Errors raised while building co-group and join transforms.

use thiserror::Error;

/// Result type alias for join construction.
pub type JoinResult<T> = std::result::Result<T, JoinError>;

/// Errors that can occur while adding a co-group or join to a pipeline.
///
/// Execution-time failures are not represented here; they surface as
/// `anyhow::Error` from the collect methods.
#[derive(Debug, Error)]
pub enum JoinError {
    /// An input is itself the output of a co-group and the pipeline is
    /// configured with [`ChainedCoGroupCheck::Error`](crate::ChainedCoGroupCheck::Error).
    #[error(
        "chained co-group detected in `{transform}`: an input was produced by another co-group; \
         use a multi-way co-group (cogroup3/inner3) to group all inputs in a single shuffle"
    )]
    ChainedJoinDetected {
        /// Name of the rejected transform.
        transform: String,
    },

    /// The sub-plan of an input could not be captured.
    #[error("cannot build input plan for `{transform}`")]
    Plan {
        /// Name of the transform being built.
        transform: String,
        /// Underlying planner failure.
        #[source]
        source: anyhow::Error,
    },
}

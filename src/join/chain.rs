//! Chained co-group detection.
//!
//! Every collection handle carries a [`CollectionState`]. Co-group outputs are
//! marked `post_cogroup`; element-wise transforms pass the mark along. When a
//! new co-group sees a marked input it reacts according to the pipeline's
//! [`ChainedCoGroupCheck`].

use crate::error::{JoinError, JoinResult};
use crate::options::ChainedCoGroupCheck;

/// Metadata carried alongside a collection handle.
///
/// Values are never mutated in place; transforms compute the state of their
/// output from the state of their input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollectionState {
    post_cogroup: bool,
}

impl CollectionState {
    /// Whether the collection was produced by a co-group with no shuffle since.
    #[must_use]
    pub fn is_post_cogroup(self) -> bool {
        self.post_cogroup
    }

    /// State of a co-group's output.
    #[must_use]
    pub fn after_cogroup(self) -> Self {
        Self { post_cogroup: true }
    }
}

/// Apply the chained co-group diagnostic for the transform `name`.
///
/// Logs at most one warning per call, independent of how many inputs are marked.
///
/// # Errors
/// Returns [`JoinError::ChainedJoinDetected`] when an input is marked and
/// `check` is [`ChainedCoGroupCheck::Error`].
pub(crate) fn check_chained(
    name: &str,
    inputs: &[CollectionState],
    check: ChainedCoGroupCheck,
) -> JoinResult<()> {
    let chained = inputs.iter().filter(|s| s.is_post_cogroup()).count();
    if chained == 0 {
        return Ok(());
    }
    match check {
        ChainedCoGroupCheck::Off => Ok(()),
        ChainedCoGroupCheck::Warning => {
            tracing::warn!(
                transform = name,
                chained_inputs = chained,
                "chained co-group detected: an input was produced by another co-group; \
                 use a multi-way co-group (cogroup3/inner3) to group all inputs in a single shuffle"
            );
            Ok(())
        }
        ChainedCoGroupCheck::Error => Err(JoinError::ChainedJoinDetected {
            transform: name.to_string(),
        }),
    }
}

//! # ironbeam-join
//!
//! Co-group based joins for batch pipelines in the style of Apache Beam.
//!
//! A [`Pipeline`] holds a lazily evaluated graph; a [`PCollection<T>`] is a
//! handle to one node of it. Keyed collections (`PCollection<(K, V)>`) can be
//! joined with the operations in [`join`], all of which run through a single
//! co-group-by-key pass followed by a per-key expansion.
//!
//! ## Joins
//! - [`join::cogroup`] / [`PCollection::cogroup`] - every value per key from both sides
//! - [`join::inner`] / [`PCollection::join_inner`] - inner join
//! - [`join::left`] / [`PCollection::join_left`] - left outer join
//! - [`join::right`] / [`PCollection::join_right`] - right outer join
//! - [`join::outer`] / [`PCollection::join_outer`] - full outer join
//! - [`join::cogroup3`], [`join::inner3`] - three inputs, one shuffle
//!
//! ## Chained co-groups
//! Joining the output of a join shuffles the intermediate result a second
//! time. Collections remember whether they came out of a co-group, and the
//! pipeline's [`PipelineOptions::chained_cogroups`] decides whether such a
//! chain is ignored, logged with `tracing`, or rejected with
//! [`JoinError::ChainedJoinDetected`].
//!
//! ```
//! use ironbeam_join::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let p = Pipeline::with_options(
//!     PipelineOptions::default().with_chained_cogroups(ChainedCoGroupCheck::Error),
//! );
//! let users = from_vec(&p, vec![(1u32, "Alice".to_string()), (2, "Bob".to_string())]);
//! let scores = from_vec(&p, vec![(1u32, 95u32), (3, 92)]);
//! let teams = from_vec(&p, vec![(1u32, "red".to_string())]);
//!
//! let joined = users.join_inner("users_scores", &scores)?;
//! assert!(joined.join_inner("with_teams", &teams).is_err());
//!
//! let all = join::inner3("users_scores_teams", &users, &scores, &teams)?;
//! assert_eq!(
//!     all.collect_seq()?,
//!     vec![(1, ("Alice".to_string(), 95, "red".to_string()))]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Execution
//! - [`collect_seq`](PCollection::collect_seq) - single-threaded
//! - [`collect_par`](PCollection::collect_par) - rayon, partitioned
//!
//! Both produce the same multiset of rows; only order may differ.

pub mod collection;
pub mod error;
pub mod join;
pub(crate) mod node;
pub mod node_id;
pub mod options;
pub mod pipeline;
pub(crate) mod planner;
pub mod runner;
pub mod testing;
pub mod type_token;
pub(crate) mod helpers;

pub use collection::{PCollection, RFBound, from_iter, from_vec};
pub use error::{JoinError, JoinResult};
pub use join::{CoGroupJoin, CollectionState};
pub use node_id::NodeId;
pub use options::{ChainedCoGroupCheck, PipelineOptions};
pub use pipeline::Pipeline;
pub use runner::{ExecMode, Runner};
pub use type_token::Partition;

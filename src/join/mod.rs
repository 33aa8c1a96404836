//! Joins built directly on a co-group-by-key primitive.
//!
//! All variants share one kernel: both inputs are tagged, grouped by key in a
//! single [`CoGroupByKey`] pass, and each key group is expanded into output
//! rows.
//!
//! | Operation | Output element |
//! |---|---|
//! | [`cogroup`] | `(K, (Vec<V>, Vec<W>))`, one per key of either side |
//! | [`inner`] | `(K, (V, W))` |
//! | [`left`] | `(K, (V, Option<W>))` |
//! | [`right`] | `(K, (Option<V>, W))` |
//! | [`outer`] | `(K, (Option<V>, Option<W>))` |
//! | [`cogroup3`] | `(K, (Vec<A>, Vec<B>, Vec<C>))` |
//! | [`inner3`] | `(K, (A, B, C))` |
//!
//! ## Row order
//! Within a key, rows are emitted with the **right** side in the outer loop and
//! the **left** side in the inner loop: for right values `[p, q]` and left
//! values `[a, b]` the order is `(a, p), (b, p), (a, q), (b, q)`. Across keys
//! there is no defined order.
//!
//! ## Option wrapping
//! In the one-sided variants the optional side goes through
//! [`OrAbsent`]: each value becomes `Some(v)`, and a side with no values for
//! the key contributes a single `None`. A driving-side value is therefore never
//! dropped, and a key missing from the driving side emits nothing.
//!
//! ## Chained co-groups
//! Every output is marked as co-group output (see [`CollectionState`]).
//! Joining a marked collection again is reported according to
//! [`PipelineOptions::chained_cogroups`](crate::PipelineOptions): a warning,
//! nothing, or [`JoinError::ChainedJoinDetected`](crate::JoinError). Prefer
//! [`cogroup3`]/[`inner3`] to group three inputs in one pass.
//!
//! ```
//! use ironbeam_join::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let p = Pipeline::default();
//! let a = from_vec(&p, vec![(1u32, "a".to_string()), (1, "b".to_string()), (2, "x".to_string())]);
//! let b = from_vec(&p, vec![(1u32, "p".to_string())]);
//!
//! let joined = join::left("users_left_orders", &a, &b)?;
//! assert_eq!(
//!     joined.collect_seq_sorted()?,
//!     vec![
//!         (1, ("a".to_string(), Some("p".to_string()))),
//!         (1, ("b".to_string(), Some("p".to_string()))),
//!         (2, ("x".to_string(), None)),
//!     ]
//! );
//! # Ok(())
//! # }
//! ```

mod chain;
mod grouping;
mod kernel;
mod optional;

pub use chain::CollectionState;
pub use grouping::{CoGroupByKey, HashCoGroup, PartitionedCoGroup};
pub use optional::OrAbsent;

use crate::error::JoinResult;
use crate::{PCollection, RFBound};
use kernel::{cogroup2, expand_pairs};
use optional::{Optional, Required};
use std::hash::Hash;

/// Join builder bound to a grouping strategy.
///
/// The free functions in this module use [`HashCoGroup`]; build a
/// `CoGroupJoin` with [`CoGroupJoin::using`] to swap in another
/// [`CoGroupByKey`].
///
/// ```
/// use ironbeam_join::*;
/// use ironbeam_join::join::{CoGroupJoin, PartitionedCoGroup};
///
/// # fn main() -> anyhow::Result<()> {
/// let p = Pipeline::default();
/// let a = from_vec(&p, vec![("k".to_string(), 1u8)]);
/// let b = from_vec(&p, vec![("k".to_string(), 2u8)]);
/// let out = CoGroupJoin::using(PartitionedCoGroup::new(8))
///     .inner("ab", &a, &b)?
///     .collect_par(None, None)?;
/// assert_eq!(out, vec![("k".to_string(), (1, 2))]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CoGroupJoin<G = HashCoGroup> {
    grouper: G,
}

impl CoGroupJoin {
    /// Builder using [`HashCoGroup`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: CoGroupByKey + Clone> CoGroupJoin<G> {
    /// Builder using `grouper`.
    #[must_use]
    pub fn using(grouper: G) -> Self {
        Self { grouper }
    }

    /// One record per distinct key in `a` ∪ `b`, holding every value from each
    /// side (an empty vector for a side without the key).
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    #[allow(clippy::type_complexity)]
    pub fn cogroup<K, V, W>(
        &self,
        name: &str,
        a: &PCollection<(K, V)>,
        b: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (Vec<V>, Vec<W>))>>
    where
        K: RFBound + Eq + Hash,
        V: RFBound,
        W: RFBound,
    {
        cogroup2(name, a, b, self.grouper.clone(), |k, vs, ws, out| {
            out.push((k, (vs, ws)));
        })
    }

    /// Per-key cross product of `a` and `b`.
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn inner<K, V, W>(
        &self,
        name: &str,
        a: &PCollection<(K, V)>,
        b: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (V, W))>>
    where
        K: RFBound + Eq + Hash,
        V: RFBound,
        W: RFBound,
    {
        cogroup2(name, a, b, self.grouper.clone(), |k, vs, ws, out| {
            expand_pairs::<_, _, _, Required, Required>(&k, &vs, &ws, out);
        })
    }

    /// Every value of `a`, paired with each matching `b` value or once with
    /// `None`.
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn left<K, V, W>(
        &self,
        name: &str,
        a: &PCollection<(K, V)>,
        b: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (V, Option<W>))>>
    where
        K: RFBound + Eq + Hash,
        V: RFBound,
        W: RFBound,
    {
        cogroup2(name, a, b, self.grouper.clone(), |k, vs, ws, out| {
            expand_pairs::<_, _, _, Required, Optional>(&k, &vs, &ws, out);
        })
    }

    /// Every value of `b`, paired with each matching `a` value or once with
    /// `None`.
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn right<K, V, W>(
        &self,
        name: &str,
        a: &PCollection<(K, V)>,
        b: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (Option<V>, W))>>
    where
        K: RFBound + Eq + Hash,
        V: RFBound,
        W: RFBound,
    {
        cogroup2(name, a, b, self.grouper.clone(), |k, vs, ws, out| {
            expand_pairs::<_, _, _, Optional, Required>(&k, &vs, &ws, out);
        })
    }

    /// Full outer join: both sides option-wrapped.
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    #[allow(clippy::type_complexity)]
    pub fn outer<K, V, W>(
        &self,
        name: &str,
        a: &PCollection<(K, V)>,
        b: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (Option<V>, Option<W>))>>
    where
        K: RFBound + Eq + Hash,
        V: RFBound,
        W: RFBound,
    {
        cogroup2(name, a, b, self.grouper.clone(), |k, vs, ws, out| {
            expand_pairs::<_, _, _, Optional, Optional>(&k, &vs, &ws, out);
        })
    }

    /// Three-way co-group in one grouping pass.
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    #[allow(clippy::type_complexity)]
    pub fn cogroup3<K, A, B, C>(
        &self,
        name: &str,
        a: &PCollection<(K, A)>,
        b: &PCollection<(K, B)>,
        c: &PCollection<(K, C)>,
    ) -> JoinResult<PCollection<(K, (Vec<A>, Vec<B>, Vec<C>))>>
    where
        K: RFBound + Eq + Hash,
        A: RFBound,
        B: RFBound,
        C: RFBound,
    {
        kernel::cogroup3(name, a, b, c, self.grouper.clone(), |k, va, vb, vc, out| {
            out.push((k, (va, vb, vc)));
        })
    }

    /// Three-way inner join in one grouping pass. `c` drives the outermost
    /// loop and `a` the innermost.
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn inner3<K, A, B, C>(
        &self,
        name: &str,
        a: &PCollection<(K, A)>,
        b: &PCollection<(K, B)>,
        c: &PCollection<(K, C)>,
    ) -> JoinResult<PCollection<(K, (A, B, C))>>
    where
        K: RFBound + Eq + Hash,
        A: RFBound,
        B: RFBound,
        C: RFBound,
    {
        kernel::cogroup3(name, a, b, c, self.grouper.clone(), |k, va, vb, vc, out| {
            for z in &vc {
                for y in &vb {
                    for x in &va {
                        out.push((k.clone(), (x.clone(), y.clone(), z.clone())));
                    }
                }
            }
        })
    }
}

/// [`CoGroupJoin::cogroup`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
#[allow(clippy::type_complexity)]
pub fn cogroup<K, V, W>(
    name: &str,
    a: &PCollection<(K, V)>,
    b: &PCollection<(K, W)>,
) -> JoinResult<PCollection<(K, (Vec<V>, Vec<W>))>>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
{
    CoGroupJoin::new().cogroup(name, a, b)
}

/// [`CoGroupJoin::inner`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
pub fn inner<K, V, W>(
    name: &str,
    a: &PCollection<(K, V)>,
    b: &PCollection<(K, W)>,
) -> JoinResult<PCollection<(K, (V, W))>>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
{
    CoGroupJoin::new().inner(name, a, b)
}

/// [`CoGroupJoin::left`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
pub fn left<K, V, W>(
    name: &str,
    a: &PCollection<(K, V)>,
    b: &PCollection<(K, W)>,
) -> JoinResult<PCollection<(K, (V, Option<W>))>>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
{
    CoGroupJoin::new().left(name, a, b)
}

/// [`CoGroupJoin::right`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
pub fn right<K, V, W>(
    name: &str,
    a: &PCollection<(K, V)>,
    b: &PCollection<(K, W)>,
) -> JoinResult<PCollection<(K, (Option<V>, W))>>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
{
    CoGroupJoin::new().right(name, a, b)
}

/// [`CoGroupJoin::outer`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
#[allow(clippy::type_complexity)]
pub fn outer<K, V, W>(
    name: &str,
    a: &PCollection<(K, V)>,
    b: &PCollection<(K, W)>,
) -> JoinResult<PCollection<(K, (Option<V>, Option<W>))>>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
    W: RFBound,
{
    CoGroupJoin::new().outer(name, a, b)
}

/// [`CoGroupJoin::cogroup3`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
#[allow(clippy::type_complexity)]
pub fn cogroup3<K, A, B, C>(
    name: &str,
    a: &PCollection<(K, A)>,
    b: &PCollection<(K, B)>,
    c: &PCollection<(K, C)>,
) -> JoinResult<PCollection<(K, (Vec<A>, Vec<B>, Vec<C>))>>
where
    K: RFBound + Eq + Hash,
    A: RFBound,
    B: RFBound,
    C: RFBound,
{
    CoGroupJoin::new().cogroup3(name, a, b, c)
}

/// [`CoGroupJoin::inner3`] with [`HashCoGroup`].
///
/// # Errors
/// See [`JoinError`](crate::JoinError).
pub fn inner3<K, A, B, C>(
    name: &str,
    a: &PCollection<(K, A)>,
    b: &PCollection<(K, B)>,
    c: &PCollection<(K, C)>,
) -> JoinResult<PCollection<(K, (A, B, C))>>
where
    K: RFBound + Eq + Hash,
    A: RFBound,
    B: RFBound,
    C: RFBound,
{
    CoGroupJoin::new().inner3(name, a, b, c)
}

impl<K, V> PCollection<(K, V)>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
{
    /// Co-group with `other`. See [`cogroup`].
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    #[allow(clippy::type_complexity)]
    pub fn cogroup<W: RFBound>(
        &self,
        name: &str,
        other: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (Vec<V>, Vec<W>))>> {
        cogroup(name, self, other)
    }

    /// Inner join with `other`. See [`inner`].
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn join_inner<W: RFBound>(
        &self,
        name: &str,
        other: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (V, W))>> {
        inner(name, self, other)
    }

    /// Left outer join with `other`. See [`left`].
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn join_left<W: RFBound>(
        &self,
        name: &str,
        other: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (V, Option<W>))>> {
        left(name, self, other)
    }

    /// Right outer join with `other`. See [`right`].
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    pub fn join_right<W: RFBound>(
        &self,
        name: &str,
        other: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (Option<V>, W))>> {
        right(name, self, other)
    }

    /// Full outer join with `other`. See [`outer`].
    ///
    /// # Errors
    /// See [`JoinError`](crate::JoinError).
    #[allow(clippy::type_complexity)]
    pub fn join_outer<W: RFBound>(
        &self,
        name: &str,
        other: &PCollection<(K, W)>,
    ) -> JoinResult<PCollection<(K, (Option<V>, Option<W>))>> {
        outer(name, self, other)
    }
}

//! Type tags and type-erased vector helpers.
//!
//! The runner moves data between nodes as opaque [`Partition`]s. Sources and
//! co-group nodes carry a [`VecOps`] so the runner can split partitions and
//! stitch them back together without knowing the element type.

use anyhow::{Result, anyhow};
use std::any::{Any, TypeId, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

/// A partition buffer carried between nodes at runtime.
///
/// Always a boxed `Vec<T>` for some element type `T` (or a node-private
/// intermediate such as a per-partition hash map inside a group-by-key).
pub type Partition = Box<dyn Any + Send + Sync>;

/// A lightweight runtime type tag, used in error messages when a partition
/// does not have the shape a node expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Type-erased helpers for `Vec<T>`.
///
/// Every method returns `None` when the payload is not the `Vec<T>` the
/// implementor was built for.
pub trait VecOps: Send + Sync {
    /// Number of elements in `data`.
    fn len(&self, data: &dyn Any) -> Option<usize>;

    /// Split `data` into at most `n` contiguous, order-preserving chunks.
    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>>;

    /// Concatenate partitions (in order) into one.
    fn concat(&self, parts: Vec<Partition>) -> Option<Partition>;

    /// Tag of the element type this implementation handles.
    fn elem_tag(&self) -> TypeTag;
}

/// Concrete `VecOps` for a specific `T`.
pub struct VecOpsImpl<T: Clone + Send + Sync + 'static>(PhantomData<T>);

impl<T: Clone + Send + Sync + 'static> VecOps for VecOpsImpl<T> {
    fn len(&self, data: &dyn Any) -> Option<usize> {
        data.downcast_ref::<Vec<T>>().map(Vec::len)
    }

    fn split(&self, data: &dyn Any, n: usize) -> Option<Vec<Partition>> {
        let v = data.downcast_ref::<Vec<T>>()?;
        let len = v.len();

        if n <= 1 || len <= 1 {
            return Some(vec![Box::new(v.clone())]);
        }

        let chunk = len.div_ceil(n);
        let parts = v
            .chunks(chunk)
            .map(|c| Box::new(c.to_vec()) as Partition)
            .collect();
        Some(parts)
    }

    fn concat(&self, parts: Vec<Partition>) -> Option<Partition> {
        let mut out: Vec<T> = Vec::new();
        for p in parts {
            let mut v = p.downcast::<Vec<T>>().ok()?;
            out.append(&mut v);
        }
        Some(Box::new(out) as Partition)
    }

    fn elem_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }
}

/// Create a type-erased `VecOps` for `Vec<T>`.
#[must_use]
pub fn vec_ops_for<T: Clone + Send + Sync + 'static>() -> Arc<dyn VecOps> {
    Arc::new(VecOpsImpl::<T>(PhantomData))
}

/// Downcast a partition to `Vec<T>`, naming `stage` in the error.
///
/// # Errors
/// Fails when the partition holds anything other than a `Vec<T>`.
pub(crate) fn downcast_vec<T: 'static>(part: Partition, stage: &str) -> Result<Vec<T>> {
    part.downcast::<Vec<T>>().map(|b| *b).map_err(|_| {
        anyhow!(
            "{stage}: expected partition of Vec<{}>",
            TypeTag::of::<T>().name
        )
    })
}

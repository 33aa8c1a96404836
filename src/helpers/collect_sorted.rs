//! Collect-and-sort helpers.
//!
//! Co-group output order depends on grouping and partitioning, so tests and
//! final sinks that want stable output sort after collecting.

use crate::{PCollection, RFBound};
use anyhow::Result;

impl<T: RFBound + Ord> PCollection<T> {
    /// Collect sequentially and sort.
    ///
    /// # Errors
    /// Propagates any error from [`PCollection::collect_seq`].
    ///
    /// # Example
    /// ```
    /// use ironbeam_join::*;
    ///
    /// let p = Pipeline::default();
    /// let data = from_vec(&p, vec![3, 1, 2]);
    /// assert_eq!(data.collect_seq_sorted().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn collect_seq_sorted(self) -> Result<Vec<T>> {
        let mut v = self.collect_seq()?;
        v.sort();
        Ok(v)
    }

    /// Collect in parallel and sort.
    ///
    /// # Errors
    /// Propagates any error from [`PCollection::collect_par`].
    pub fn collect_par_sorted(
        self,
        threads: Option<usize>,
        partitions: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut v = self.collect_par(threads, partitions)?;
        v.sort();
        Ok(v)
    }
}

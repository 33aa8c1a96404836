//! Side iteration for the join kernel.
//!
//! A required side yields its values as-is. An optional side is wrapped in
//! [`OrAbsent`], which yields `Some(v)` per value or a single `None` when there
//! are no values, so a one-sided join still emits one row per driving value.

use std::iter::FusedIterator;

/// Lazy adapter: `Some(v)` for every item, or exactly one `None` if the inner
/// iterator is empty.
///
/// Single pass. To iterate again, build a new `OrAbsent` over a fresh inner
/// iterator.
///
/// ```
/// use ironbeam_join::join::OrAbsent;
///
/// let present: Vec<_> = OrAbsent::new([1, 2].into_iter()).collect();
/// assert_eq!(present, vec![Some(1), Some(2)]);
///
/// let absent: Vec<Option<i32>> = OrAbsent::new(std::iter::empty()).collect();
/// assert_eq!(absent, vec![None]);
/// ```
#[derive(Clone, Debug)]
pub struct OrAbsent<I> {
    inner: I,
    seen_any: bool,
    done: bool,
}

impl<I: Iterator> OrAbsent<I> {
    /// Wrap `inner`.
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            seen_any: false,
            done: false,
        }
    }
}

impl<I: Iterator> Iterator for OrAbsent<I> {
    type Item = Option<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(v) = self.inner.next() {
            self.seen_any = true;
            return Some(Some(v));
        }
        self.done = true;
        if self.seen_any { None } else { Some(None) }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let (lo, hi) = self.inner.size_hint();
        if self.seen_any {
            (lo, hi)
        } else {
            // An empty inner still produces the one `None`.
            (lo.max(1), hi.map(|h| h.max(1)))
        }
    }
}

impl<I: Iterator> FusedIterator for OrAbsent<I> {}

/// How the kernel iterates one side of a key group.
pub(crate) trait SideMode<V: Clone + 'static> {
    type Item: Clone;

    /// A fresh pass over `values`.
    fn values<'a>(values: &'a [V]) -> impl Iterator<Item = Self::Item> + 'a;
}

/// Every value, unwrapped. An empty side produces nothing.
pub(crate) struct Required;

/// Every value as `Some`, or one `None` for an empty side.
pub(crate) struct Optional;

impl<V: Clone + 'static> SideMode<V> for Required {
    type Item = V;

    fn values<'a>(values: &'a [V]) -> impl Iterator<Item = Self::Item> + 'a {
        values.iter().cloned()
    }
}

impl<V: Clone + 'static> SideMode<V> for Optional {
    type Item = Option<V>;

    fn values<'a>(values: &'a [V]) -> impl Iterator<Item = Self::Item> + 'a {
        OrAbsent::new(values.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yields_single_none_then_stops() {
        let mut it = OrAbsent::new(std::iter::empty::<u8>());
        assert_eq!(it.size_hint(), (1, Some(1)));
        assert_eq!(it.next(), Some(None));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn non_empty_never_yields_none_marker() {
        let out: Vec<_> = OrAbsent::new(vec!["a", "b", "c"].into_iter()).collect();
        assert_eq!(out, vec![Some("a"), Some("b"), Some("c")]);
    }

    #[test]
    fn consumes_inner_in_one_pass() {
        let mut pulls = 0;
        let inner = (0..3).inspect(|_| pulls += 1);
        let out: Vec<_> = OrAbsent::new(inner).collect();
        assert_eq!(out.len(), 3);
        assert_eq!(pulls, 3);
    }

    #[test]
    fn side_modes() {
        let empty: [u8; 0] = [];
        assert_eq!(<Required as SideMode<u8>>::values(&empty).count(), 0);
        assert_eq!(
            <Optional as SideMode<u8>>::values(&empty).collect::<Vec<_>>(),
            vec![None]
        );
        assert_eq!(
            <Optional as SideMode<u8>>::values(&[7, 8]).collect::<Vec<_>>(),
            vec![Some(7), Some(8)]
        );
    }
}

//! The co-group-by-key primitive.
//!
//! The join kernel never groups rows itself. It tags its inputs, hands them to
//! a [`CoGroupByKey`] implementation, and expands whatever groups come back.
//! Any grouping strategy that honours the contract below can be plugged in
//! through [`CoGroupJoin::using`](super::CoGroupJoin::using).

use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash, RandomState};

/// Groups N tagged keyed inputs by key.
///
/// `inputs[i]` holds the rows for tag `i`. The result contains exactly one
/// entry per distinct key seen in any input; each entry's vector has one slot
/// per tag (so `inputs.len()` slots) holding every value that tag had for the
/// key, in input order. Tags with no values for the key get an empty slot.
/// The order of entries is up to the implementation.
pub trait CoGroupByKey: Send + Sync + 'static {
    fn co_group_by_key<K, T>(&self, inputs: Vec<Vec<(K, T)>>) -> Vec<(K, Vec<Vec<T>>)>
    where
        K: Eq + Hash + Clone + Send,
        T: Send;
}

/// Single-threaded hash grouping. Keys come back in first-seen order (tag 0
/// rows first, then tag 1, and so on).
#[derive(Clone, Copy, Debug, Default)]
pub struct HashCoGroup;

impl CoGroupByKey for HashCoGroup {
    fn co_group_by_key<K, T>(&self, inputs: Vec<Vec<(K, T)>>) -> Vec<(K, Vec<Vec<T>>)>
    where
        K: Eq + Hash + Clone + Send,
        T: Send,
    {
        group_tagged(inputs)
    }
}

/// Hash-partitions keys into buckets and groups the buckets concurrently on
/// the current rayon pool.
#[derive(Clone, Copy, Debug)]
pub struct PartitionedCoGroup {
    buckets: usize,
}

impl PartitionedCoGroup {
    /// Group with `buckets` hash buckets (at least one).
    #[must_use]
    pub fn new(buckets: usize) -> Self {
        Self {
            buckets: buckets.max(1),
        }
    }

    #[must_use]
    pub fn buckets(&self) -> usize {
        self.buckets
    }
}

impl Default for PartitionedCoGroup {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl CoGroupByKey for PartitionedCoGroup {
    fn co_group_by_key<K, T>(&self, inputs: Vec<Vec<(K, T)>>) -> Vec<(K, Vec<Vec<T>>)>
    where
        K: Eq + Hash + Clone + Send,
        T: Send,
    {
        let tags = inputs.len();
        let n = self.buckets;
        let hasher = RandomState::new();

        let mut shards: Vec<Vec<Vec<(K, T)>>> =
            (0..n).map(|_| (0..tags).map(|_| Vec::new()).collect()).collect();
        for (tag, rows) in inputs.into_iter().enumerate() {
            for (k, v) in rows {
                let bucket = (hasher.hash_one(&k) % n as u64) as usize;
                shards[bucket][tag].push((k, v));
            }
        }

        shards.into_par_iter().flat_map_iter(group_tagged).collect()
    }
}

fn group_tagged<K, T>(inputs: Vec<Vec<(K, T)>>) -> Vec<(K, Vec<Vec<T>>)>
where
    K: Eq + Hash + Clone,
{
    let tags = inputs.len();
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<Vec<T>>)> = Vec::new();
    for (tag, rows) in inputs.into_iter().enumerate() {
        for (k, v) in rows {
            let slot = match index.get(&k).copied() {
                Some(slot) => slot,
                None => {
                    index.insert(k.clone(), groups.len());
                    groups.push((k, (0..tags).map(|_| Vec::new()).collect()));
                    groups.len() - 1
                }
            };
            groups[slot].1[tag].push(v);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut groups: Vec<(u32, Vec<Vec<char>>)>) -> Vec<(u32, Vec<Vec<char>>)> {
        groups.sort_by_key(|g| g.0);
        groups
    }

    #[test]
    fn hash_groups_in_first_seen_order() {
        let out = HashCoGroup.co_group_by_key(vec![
            vec![(2, 'a'), (1, 'b'), (2, 'c')],
            vec![(3, 'x'), (1, 'y')],
        ]);
        assert_eq!(
            out,
            vec![
                (2, vec![vec!['a', 'c'], vec![]]),
                (1, vec![vec!['b'], vec!['y']]),
                (3, vec![vec![], vec!['x']]),
            ]
        );
    }

    #[test]
    fn partitioned_matches_hash_grouping() {
        let inputs = || {
            vec![
                (0..50u32).map(|i| (i % 7, 'l')).collect::<Vec<_>>(),
                (0..30u32).map(|i| (i % 11, 'r')).collect::<Vec<_>>(),
                vec![(100, 'z')],
            ]
        };
        let a = sorted(HashCoGroup.co_group_by_key(inputs()));
        let b = sorted(PartitionedCoGroup::new(4).co_group_by_key(inputs()));
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn no_inputs_no_groups() {
        let out: Vec<(u32, Vec<Vec<u8>>)> = PartitionedCoGroup::new(3).co_group_by_key(vec![vec![], vec![]]);
        assert!(out.is_empty());
    }
}

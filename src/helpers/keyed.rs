//! Keyed transforms: deriving keys, value-only transforms and group-by-key.
//!
//! Value-only transforms keep the input's [`CollectionState`]; no shuffle
//! happens between them and an upstream co-group, so a join right after them is
//! still a chained co-group. `group_by_key` is a shuffle of its own and starts
//! from a fresh state.

use crate::join::CollectionState;
use crate::node::Node;
use crate::type_token::{Partition, downcast_vec};
use crate::{PCollection, RFBound};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

impl<T: RFBound> PCollection<T> {
    /// Derive a key and produce `(K, T)`.
    #[must_use]
    pub fn key_by<K, F>(self, key_fn: F) -> PCollection<(K, T)>
    where
        K: RFBound + Eq + Hash,
        F: 'static + Send + Sync + Fn(&T) -> K,
    {
        self.map(move |t| (key_fn(t), t.clone()))
    }
}

impl<K, V> PCollection<(K, V)>
where
    K: RFBound + Eq + Hash,
    V: RFBound,
{
    /// Transform only the value of each pair.
    #[must_use]
    pub fn map_values<O, F>(self, f: F) -> PCollection<(K, O)>
    where
        O: RFBound,
        F: 'static + Send + Sync + Fn(&V) -> O,
    {
        self.map(move |kv: &(K, V)| (kv.0.clone(), f(&kv.1)))
    }

    /// Keep pairs whose value matches `pred`.
    #[must_use]
    pub fn filter_values<F>(self, pred: F) -> PCollection<(K, V)>
    where
        F: 'static + Send + Sync + Fn(&V) -> bool,
    {
        self.filter(move |kv: &(K, V)| pred(&kv.1))
    }

    /// Group values by key: `(K, V) -> (K, Vec<V>)`.
    #[must_use]
    pub fn group_by_key(self) -> PCollection<(K, Vec<V>)> {
        let local = Arc::new(|p: Partition| -> Result<Partition> {
            let kv = downcast_vec::<(K, V)>(p, "group_by_key")?;
            let mut m: HashMap<K, Vec<V>> = HashMap::new();
            for (k, v) in kv {
                m.entry(k).or_default().push(v);
            }
            Ok(Box::new(m) as Partition)
        });

        let merge = Arc::new(|parts: Vec<Partition>| -> Result<Partition> {
            let mut acc: HashMap<K, Vec<V>> = HashMap::new();
            for p in parts {
                let m = p
                    .downcast::<HashMap<K, Vec<V>>>()
                    .map_err(|_| anyhow!("group_by_key merge: unexpected partial result"))?;
                for (k, vs) in *m {
                    acc.entry(k).or_default().extend(vs);
                }
            }
            Ok(Box::new(acc.into_iter().collect::<Vec<(K, Vec<V>)>>()) as Partition)
        });

        self.then(Node::GroupByKey { local, merge }, CollectionState::default())
    }
}

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::OrderedSymbolTable;
use crate::error::{Error, Result};

/// `std::collections::BTreeMap` behind the symbol-table interface.
///
/// Serves as the oracle in differential tests and as the benchmark baseline.
/// `select` walks the map, so it is O(n).
pub struct StdBTreeMap<K: Ord, V> {
    inner: BTreeMap<K, V>,
}

impl<K: Ord, V> StdBTreeMap<K, V> {
    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.inner
    }
}

impl<K: Ord, V> OrderedSymbolTable for StdBTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.inner.remove(key)
    }

    fn delete_min(&mut self) -> Result<(K, V)> {
        self.inner.pop_first().ok_or(Error::empty("delete_min"))
    }

    fn delete_max(&mut self) -> Result<(K, V)> {
        self.inner.pop_last().ok_or(Error::empty("delete_max"))
    }

    fn min(&self) -> Result<&K> {
        self.inner.keys().next().ok_or(Error::empty("min"))
    }

    fn max(&self) -> Result<&K> {
        self.inner.keys().next_back().ok_or(Error::empty("max"))
    }

    fn floor(&self, key: &K) -> Option<&K> {
        self.inner.range::<K, _>(..=key).next_back().map(|(k, _)| k)
    }

    fn ceiling(&self, key: &K) -> Option<&K> {
        self.inner.range::<K, _>(key..).next().map(|(k, _)| k)
    }

    fn select(&self, index: usize) -> Result<&K> {
        let len = self.inner.len();
        self.inner
            .keys()
            .nth(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    fn rank(&self, key: &K) -> usize {
        self.inner.range::<K, _>(..key).count()
    }

    fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    fn keys_range(&self, lo: &K, hi: &K) -> impl Iterator<Item = &K> {
        // BTreeMap::range panics on inverted bounds.
        let hi = if lo > hi {
            Bound::Excluded(lo)
        } else {
            Bound::Included(hi)
        };
        self.inner
            .range::<K, _>((Bound::Included(lo), hi))
            .map(|(k, _)| k)
    }
}

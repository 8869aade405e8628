//! Persistent child map used by trie nodes

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An immutable, ordered map from symbol to child node
///
/// Every "modifying" method returns a new map. Entries are held behind `Arc`,
/// so a new version copies only the entry pointers and shares every child it
/// did not touch with the previous version. Iteration follows key order, which
/// keeps enumeration and encoding deterministic for a given content.
pub struct Children<K, N> {
    entries: Arc<BTreeMap<K, Arc<N>>>,
}

impl<K, N> Children<K, N> {
    pub fn new() -> Self {
        Children {
            entries: Arc::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(symbol, child)` pairs in symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &N)> {
        self.entries.iter().map(|(k, n)| (k, n.as_ref()))
    }

    pub fn values(&self) -> impl Iterator<Item = &N> {
        self.entries.values().map(|n| n.as_ref())
    }

    /// The entry with the smallest symbol
    pub fn first(&self) -> Option<(&K, &N)> {
        self.entries.iter().next().map(|(k, n)| (k, n.as_ref()))
    }
}

impl<K: Ord + Clone, N> Children<K, N> {
    /// A map holding exactly one entry
    pub fn single(key: K, node: N) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key, Arc::new(node));
        Children {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, key: &K) -> Option<&N> {
        self.entries.get(key).map(|n| n.as_ref())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Return a new map with `key` bound to `node`
    pub fn setting(&self, key: K, node: N) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(key, Arc::new(node));
        Children {
            entries: Arc::new(entries),
        }
    }

    /// Return a new map without `key`; shares storage if `key` is absent
    pub fn deleting(&self, key: &K) -> Self {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        entries.remove(key);
        Children {
            entries: Arc::new(entries),
        }
    }

    /// Union of two maps; `combine(left, right)` resolves keys present in both
    pub fn merge<F>(&self, other: &Self, mut combine: F) -> Self
    where
        F: FnMut(&N, &N) -> N,
    {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut entries = (*self.entries).clone();
        for (key, right) in other.entries.iter() {
            let merged = match entries.get(key) {
                Some(left) => Arc::new(combine(left, right)),
                None => Arc::clone(right),
            };
            entries.insert(key.clone(), merged);
        }
        Children {
            entries: Arc::new(entries),
        }
    }
}

impl<K: Ord, N> FromIterator<(K, N)> for Children<K, N> {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        Children {
            entries: Arc::new(iter.into_iter().map(|(k, n)| (k, Arc::new(n))).collect()),
        }
    }
}

impl<K, N> Clone for Children<K, N> {
    fn clone(&self) -> Self {
        Children {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K, N> Default for Children<K, N> {
    fn default() -> Self {
        Children::new()
    }
}

impl<K: PartialEq, N: PartialEq> PartialEq for Children<K, N> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries) || self.entries == other.entries
    }
}

impl<K: Eq, N: Eq> Eq for Children<K, N> {}

impl<K: fmt::Debug, N: fmt::Debug> fmt::Debug for Children<K, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

//! Root container: the public key/value trie

use super::{Children, TrieNode};
use crate::model::{Hash, Symbol};
use crate::Result;
use serde::Serialize;

/// A persistent map from symbol sequences to values
///
/// The root holds one branch per distinct leading symbol. Every operation
/// returns a new trie and leaves `self` untouched; unaffected branches are
/// shared between the two versions. The empty key sequence is never
/// addressable: looking it up yields `None` and storing or deleting it is a
/// no-op.
#[derive(Debug, PartialEq, Eq)]
pub struct TrieMapping<K, V> {
    children: Children<K, TrieNode<K, V>>,
}

impl<K, V> TrieMapping<K, V> {
    /// Create an empty trie
    pub fn new() -> Self {
        TrieMapping {
            children: Children::new(),
        }
    }

    pub fn from_children(children: Children<K, TrieNode<K, V>>) -> Self {
        TrieMapping { children }
    }

    /// Root branches keyed by leading symbol
    pub fn children(&self) -> &Children<K, TrieNode<K, V>> {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit every stored entry in key order
    pub fn walk<'a, F>(&'a self, mut visit: F)
    where
        K: Clone,
        F: FnMut(&[K], &'a V),
    {
        let mut path = Vec::new();
        for root in self.children.values() {
            root.walk(&mut path, &mut visit);
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize
    where
        K: Clone,
    {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// All stored key sequences, in key order
    pub fn key_sets(&self) -> Vec<Vec<K>>
    where
        K: Clone,
    {
        let mut keys = Vec::new();
        self.walk(|path, _| keys.push(path.to_vec()));
        keys
    }

    /// All stored values, in key order
    pub fn values(&self) -> Vec<V>
    where
        K: Clone,
        V: Clone,
    {
        let mut values = Vec::new();
        self.walk(|_, value| values.push(value.clone()));
        values
    }

    /// All stored `(key, value)` pairs, in key order
    pub fn elements(&self) -> Vec<(Vec<K>, V)>
    where
        K: Clone,
        V: Clone,
    {
        let mut elements = Vec::new();
        self.walk(|path, value| elements.push((path.to_vec(), value.clone())));
        elements
    }

    /// Check that every branch is keyed by its first symbol and is in
    /// canonical form
    pub fn is_canonical(&self) -> bool
    where
        K: PartialEq,
    {
        self.children
            .iter()
            .all(|(key, root)| root.prefix().first() == Some(key) && root.is_canonical())
    }
}

impl<K: Symbol, V: Clone> TrieMapping<K, V> {
    fn changing(&self, key: &K, node: Option<TrieNode<K, V>>) -> Self {
        let children = match node {
            Some(node) => self.children.setting(key.clone(), node),
            None => self.children.deleting(key),
        };
        TrieMapping { children }
    }

    /// The branch starting with `key`
    pub fn root(&self, key: &K) -> Option<&TrieNode<K, V>> {
        self.children.get(key)
    }

    /// Look up the value stored at exactly `keys`
    pub fn get(&self, keys: &[K]) -> Option<&V> {
        let first = keys.first()?;
        self.root(first)?.get(keys)
    }

    pub fn contains(&self, keys: &[K]) -> bool {
        self.get(keys).is_some()
    }

    /// Return a trie with `value` stored at `keys`
    pub fn setting(&self, keys: &[K], value: V) -> Self {
        let Some(first) = keys.first() else {
            return self.clone();
        };
        let node = match self.root(first) {
            Some(root) => root.setting(keys, value),
            None => TrieNode::leaf(keys.to_vec(), value),
        };
        self.changing(first, Some(node))
    }

    /// Return a trie without the value at `keys`
    pub fn deleting(&self, keys: &[K]) -> Self {
        let Some(first) = keys.first() else {
            return self.clone();
        };
        match self.root(first) {
            Some(root) => self.changing(first, root.deleting(keys)),
            None => self.clone(),
        }
    }

    /// Keep only the branch reachable by `keys`, plus values stored on the
    /// path leading to it
    pub fn including(&self, keys: &[K]) -> Self {
        let Some(first) = keys.first() else {
            return self.clone();
        };
        match self.root(first).and_then(|root| root.including(keys)) {
            Some(node) => TrieMapping::from_children(Children::single(first.clone(), node)),
            None => TrieMapping::new(),
        }
    }

    /// Remove the branch reachable by `keys`
    pub fn excluding(&self, keys: &[K]) -> Self {
        let Some(first) = keys.first() else {
            return TrieMapping::new();
        };
        match self.root(first) {
            Some(root) => self.changing(first, root.excluding(keys)),
            None => self.clone(),
        }
    }

    /// Everything stored below `keys`, re-rooted with `keys` stripped
    ///
    /// A value stored at exactly `keys` has no place in the result and is
    /// dropped.
    pub fn subtree(&self, keys: &[K]) -> Self {
        let Some(first) = keys.first() else {
            return self.clone();
        };
        self.root(first)
            .and_then(|root| root.subtree(keys))
            .map(TrieMapping::from_children)
            .unwrap_or_default()
    }

    /// Graft this whole trie underneath `keys`
    pub fn supertree(&self, keys: &[K]) -> Self {
        let Some(first) = keys.first() else {
            return self.clone();
        };
        let Some((_, only)) = self.children.first() else {
            return self.clone();
        };
        let root = if self.children.len() == 1 {
            only.extended(keys)
        } else {
            TrieNode::new(keys.to_vec(), None, self.children.clone())
        };
        TrieMapping::from_children(Children::single(first.clone(), root))
    }

    /// Union of two tries; values from `other` win on conflict
    pub fn overwrite(&self, other: &Self) -> Self {
        self.merge(other, |_, right| right.clone())
    }

    /// Union of two tries; `combine(left, right)` resolves keys stored in both
    pub fn merge<F>(&self, other: &Self, combine: F) -> Self
    where
        F: Fn(&V, &V) -> V,
    {
        let children = self
            .children
            .merge(&other.children, |left, right| left.merge(right, &combine));
        TrieMapping { children }
    }

    /// BLAKE3 digest of the encoded trie
    pub fn content_hash(&self) -> Result<Hash>
    where
        V: Serialize,
    {
        Hash::of(self)
    }
}

impl<K, V> Clone for TrieMapping<K, V> {
    fn clone(&self) -> Self {
        TrieMapping {
            children: self.children.clone(),
        }
    }
}

impl<K, V> Default for TrieMapping<K, V> {
    fn default() -> Self {
        TrieMapping::new()
    }
}

impl<K: Symbol, V: Clone> FromIterator<(Vec<K>, V)> for TrieMapping<K, V> {
    fn from_iter<I: IntoIterator<Item = (Vec<K>, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TrieMapping::new(), |trie, (keys, value)| trie.setting(&keys, value))
    }
}

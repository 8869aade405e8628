//! Trie node and the recursive prefix algorithms

use super::Children;
use crate::model::Symbol;

/// A node in the compressed prefix trie
///
/// Each node consumes a non-empty run of symbols (`prefix`) on the edge from
/// its parent. Children are keyed by the first symbol of their own prefix.
///
/// Nodes are kept in canonical form: a node without a value always has at
/// least two children. A value-less node with a single child is merged into
/// that child by concatenating the prefixes, so the same set of keys always
/// produces the same shape regardless of insertion or deletion order.
#[derive(Debug, PartialEq, Eq)]
pub struct TrieNode<K, V> {
    prefix: Vec<K>,
    value: Option<V>,
    children: Children<K, TrieNode<K, V>>,
}

impl<K: Clone, V: Clone> Clone for TrieNode<K, V> {
    fn clone(&self) -> Self {
        TrieNode {
            prefix: self.prefix.clone(),
            value: self.value.clone(),
            children: self.children.clone(),
        }
    }
}

impl<K, V> TrieNode<K, V> {
    pub fn prefix(&self) -> &[K] {
        &self.prefix
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &Children<K, TrieNode<K, V>> {
        &self.children
    }

    /// Check the canonical-form invariant for this node and all descendants
    pub fn is_canonical(&self) -> bool
    where
        K: PartialEq,
    {
        if self.prefix.is_empty() {
            return false;
        }
        if self.value.is_none() && self.children.len() < 2 {
            return false;
        }
        self.children
            .iter()
            .all(|(key, child)| child.prefix.first() == Some(key) && child.is_canonical())
    }

    /// Visit every stored `(key, value)` pair below this node in key order
    ///
    /// `path` holds the symbols consumed above this node; it is restored
    /// before returning.
    pub fn walk<'a, F>(&'a self, path: &mut Vec<K>, visit: &mut F)
    where
        K: Clone,
        F: FnMut(&[K], &'a V),
    {
        let depth = path.len();
        path.extend(self.prefix.iter().cloned());
        if let Some(value) = &self.value {
            visit(path.as_slice(), value);
        }
        for child in self.children.values() {
            child.walk(path, visit);
        }
        path.truncate(depth);
    }
}

impl<K: Symbol, V: Clone> TrieNode<K, V> {
    /// Build a node from its parts
    ///
    /// Callers are responsible for canonical form; the recursive operations
    /// below never produce a non-canonical node.
    pub(crate) fn new(prefix: Vec<K>, value: Option<V>, children: Children<K, TrieNode<K, V>>) -> Self {
        debug_assert!(!prefix.is_empty(), "trie node prefix must not be empty");
        TrieNode {
            prefix,
            value,
            children,
        }
    }

    /// A childless node holding a value
    pub(crate) fn leaf(prefix: Vec<K>, value: V) -> Self {
        TrieNode::new(prefix, Some(value), Children::new())
    }

    pub fn child(&self, key: &K) -> Option<&Self> {
        self.children.get(key)
    }

    fn with_prefix(&self, prefix: Vec<K>) -> Self {
        TrieNode::new(prefix, self.value.clone(), self.children.clone())
    }

    fn with_value(&self, value: Option<V>) -> Self {
        TrieNode::new(self.prefix.clone(), value, self.children.clone())
    }

    fn with_children(&self, children: Children<K, Self>) -> Self {
        TrieNode::new(self.prefix.clone(), self.value.clone(), children)
    }

    fn with_child(&self, key: K, child: Self) -> Self {
        self.with_children(self.children.setting(key, child))
    }

    /// This node re-rooted under a longer prefix
    pub(crate) fn extended(&self, head: &[K]) -> Self {
        self.with_prefix(concat(head, &self.prefix))
    }

    /// Restore canonical form after a value or child was removed
    ///
    /// A value-less node with no children vanishes; with one child it is
    /// merged into that child.
    fn collapsed(self) -> Option<Self> {
        if self.value.is_some() {
            return Some(self);
        }
        match self.children.len() {
            0 => None,
            1 => self
                .children
                .first()
                .map(|(_, only)| only.extended(&self.prefix)),
            _ => Some(self),
        }
    }

    /// Look up the value stored at exactly `keys`
    pub fn get(&self, keys: &[K]) -> Option<&V> {
        let suffix = keys.strip_prefix(self.prefix.as_slice())?;
        match suffix.first() {
            None => self.value.as_ref(),
            Some(first) => self.child(first)?.get(suffix),
        }
    }

    /// Return a node with `value` stored at `keys`
    ///
    /// `keys` must share at least its first symbol with this node's prefix.
    pub(crate) fn setting(&self, keys: &[K], value: V) -> Self {
        if let Some(suffix) = keys.strip_prefix(self.prefix.as_slice()) {
            let Some(first) = suffix.first() else {
                return self.with_value(Some(value));
            };
            let child = match self.child(first) {
                Some(child) => child.setting(suffix, value),
                None => TrieNode::leaf(suffix.to_vec(), value),
            };
            return self.with_child(first.clone(), child);
        }

        if let Some(rest) = self.prefix.strip_prefix(keys) {
            // keys end inside this node's prefix: split it
            let lower = self.with_prefix(rest.to_vec());
            return TrieNode::new(
                keys.to_vec(),
                Some(value),
                Children::single(rest[0].clone(), lower),
            );
        }

        let common = common_prefix_len(keys, &self.prefix);
        let new_rest = &keys[common..];
        let old_rest = &self.prefix[common..];
        let children = Children::single(
            new_rest[0].clone(),
            TrieNode::leaf(new_rest.to_vec(), value),
        )
        .setting(old_rest[0].clone(), self.with_prefix(old_rest.to_vec()));
        TrieNode::new(keys[..common].to_vec(), None, children)
    }

    /// Return this node without the value at `keys`, or `None` if nothing
    /// remains
    pub(crate) fn deleting(&self, keys: &[K]) -> Option<Self> {
        let Some(suffix) = keys.strip_prefix(self.prefix.as_slice()) else {
            return Some(self.clone());
        };
        let Some(first) = suffix.first() else {
            return self.with_value(None).collapsed();
        };
        let Some(child) = self.child(first) else {
            return Some(self.clone());
        };
        match child.deleting(suffix) {
            Some(updated) => Some(self.with_child(first.clone(), updated)),
            None => self.with_children(self.children.deleting(first)).collapsed(),
        }
    }

    /// Restrict this node to the branch reachable by `keys`
    ///
    /// Values stored on the path above `keys` are kept; siblings are dropped.
    pub(crate) fn including(&self, keys: &[K]) -> Option<Self> {
        if self.prefix.starts_with(keys) {
            return Some(self.clone());
        }
        let suffix = keys.strip_prefix(self.prefix.as_slice())?;
        let first = suffix.first()?;
        let included = self.child(first)?.including(suffix)?;
        self.with_children(Children::single(first.clone(), included))
            .collapsed()
    }

    /// Remove the branch reachable by `keys`, keeping everything else
    pub(crate) fn excluding(&self, keys: &[K]) -> Option<Self> {
        if self.prefix.starts_with(keys) {
            return None;
        }
        let Some(suffix) = keys.strip_prefix(self.prefix.as_slice()) else {
            return Some(self.clone());
        };
        let Some(first) = suffix.first() else {
            return Some(self.clone());
        };
        let Some(child) = self.child(first) else {
            return Some(self.clone());
        };
        match child.excluding(suffix) {
            Some(updated) => Some(self.with_child(first.clone(), updated)),
            None => self.with_children(self.children.deleting(first)).collapsed(),
        }
    }

    /// The child map found below `keys`, with `keys` stripped from every
    /// remaining prefix
    pub(crate) fn subtree(&self, keys: &[K]) -> Option<Children<K, Self>> {
        if let Some(rest) = self.prefix.strip_prefix(keys) {
            return Some(match rest.first() {
                None => self.children.clone(),
                Some(first) => Children::single(first.clone(), self.with_prefix(rest.to_vec())),
            });
        }
        let suffix = keys.strip_prefix(self.prefix.as_slice())?;
        let first = suffix.first()?;
        self.child(first)?.subtree(suffix)
    }

    /// Like [`subtree`](Self::subtree), also returning the cover in effect at
    /// `keys`
    ///
    /// `cover` is the value inherited from above. It is replaced by a node's
    /// own value whenever the path consumes that node entirely. When the path
    /// leaves the trie partway down, the result is an empty map carrying the
    /// cover accumulated up to that point.
    pub(crate) fn subtree_with_cover(&self, keys: &[K], cover: Option<&V>) -> (Children<K, Self>, Option<V>) {
        if let Some(rest) = self.prefix.strip_prefix(keys) {
            return match rest.first() {
                None => (
                    self.children.clone(),
                    self.value.as_ref().or(cover).cloned(),
                ),
                Some(first) => (
                    Children::single(first.clone(), self.with_prefix(rest.to_vec())),
                    cover.cloned(),
                ),
            };
        }
        let Some(suffix) = keys.strip_prefix(self.prefix.as_slice()) else {
            return (Children::new(), cover.cloned());
        };
        let cover = self.value.as_ref().or(cover);
        match suffix.first().and_then(|first| self.child(first)) {
            Some(child) => child.subtree_with_cover(suffix, cover),
            None => (Children::new(), cover.cloned()),
        }
    }

    /// Right-biased merge: values from `other` win where both sides have one
    pub(crate) fn overwrite(&self, other: &Self) -> Self {
        self.merge(other, &|_: &V, right: &V| right.clone())
    }

    /// Structural merge of two nodes sharing at least their first symbol
    ///
    /// `combine(left, right)` resolves paths that carry a value on both
    /// sides.
    pub(crate) fn merge<F>(&self, other: &Self, combine: &F) -> Self
    where
        F: Fn(&V, &V) -> V,
    {
        let common = common_prefix_len(&self.prefix, &other.prefix);
        let self_exhausted = common == self.prefix.len();
        let other_exhausted = common == other.prefix.len();

        match (self_exhausted, other_exhausted) {
            (true, true) => {
                let value = match (&self.value, &other.value) {
                    (Some(left), Some(right)) => Some(combine(left, right)),
                    (left, right) => right.as_ref().or(left.as_ref()).cloned(),
                };
                let children = self
                    .children
                    .merge(&other.children, |left, right| left.merge(right, combine));
                TrieNode::new(self.prefix.clone(), value, children)
            }
            (true, false) => {
                // other continues below self
                let rest = &other.prefix[common..];
                let pushed = other.with_prefix(rest.to_vec());
                let child = match self.child(&rest[0]) {
                    Some(existing) => existing.merge(&pushed, combine),
                    None => pushed,
                };
                self.with_child(rest[0].clone(), child)
            }
            (false, true) => {
                // self continues below other
                let rest = &self.prefix[common..];
                let pushed = self.with_prefix(rest.to_vec());
                let child = match other.child(&rest[0]) {
                    Some(existing) => pushed.merge(existing, combine),
                    None => pushed,
                };
                other.with_child(rest[0].clone(), child)
            }
            (false, false) => {
                let left_rest = &self.prefix[common..];
                let right_rest = &other.prefix[common..];
                let children = Children::single(
                    left_rest[0].clone(),
                    self.with_prefix(left_rest.to_vec()),
                )
                .setting(right_rest[0].clone(), other.with_prefix(right_rest.to_vec()));
                TrieNode::new(self.prefix[..common].to_vec(), None, children)
            }
        }
    }
}

/// Length of the longest common prefix of two symbol sequences
pub(crate) fn common_prefix_len<K: PartialEq>(a: &[K], b: &[K]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

fn concat<K: Clone>(head: &[K], tail: &[K]) -> Vec<K> {
    let mut joined = Vec::with_capacity(head.len() + tail.len());
    joined.extend_from_slice(head);
    joined.extend_from_slice(tail);
    joined
}

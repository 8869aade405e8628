//! Set semantics on top of the trie: unique groups and covered groups

use super::{CoveredTrie, TrieMapping};
use crate::model::{Hash, Symbol};
use crate::Result;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// The unit payload stored for every member of a set
///
/// Encodes as a non-null marker so that a present member can never be
/// confused with an absent value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Present,
}

/// A collection of distinct key sequences
pub trait UniqueGroup<K: Symbol>: Sized {
    fn contains(&self, keys: &[K]) -> bool;

    fn adding(&self, keys: &[K]) -> Self;

    fn removing(&self, keys: &[K]) -> Self;

    /// Every member, in key order
    fn to_array(&self) -> Vec<Vec<K>>;
}

/// A set of key sequences backed by a trie with [`Mark`] values
#[derive(Debug, PartialEq, Eq)]
pub struct TrieSet<K> {
    trie: TrieMapping<K, Mark>,
}

impl<K> TrieSet<K> {
    pub fn new() -> Self {
        TrieSet {
            trie: TrieMapping::new(),
        }
    }

    pub fn as_trie(&self) -> &TrieMapping<K, Mark> {
        &self.trie
    }

    pub fn into_trie(self) -> TrieMapping<K, Mark> {
        self.trie
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn len(&self) -> usize
    where
        K: Clone,
    {
        self.trie.len()
    }
}

impl<K: Symbol> TrieSet<K> {
    pub fn including(&self, keys: &[K]) -> Self {
        self.trie.including(keys).into()
    }

    pub fn excluding(&self, keys: &[K]) -> Self {
        self.trie.excluding(keys).into()
    }

    pub fn subtree(&self, keys: &[K]) -> Self {
        self.trie.subtree(keys).into()
    }

    pub fn supertree(&self, keys: &[K]) -> Self {
        self.trie.supertree(keys).into()
    }

    /// Members of either set
    pub fn union(&self, other: &Self) -> Self {
        self.trie.overwrite(&other.trie).into()
    }

    pub fn content_hash(&self) -> Result<Hash> {
        self.trie.content_hash()
    }
}

impl<K: Symbol> UniqueGroup<K> for TrieSet<K> {
    fn contains(&self, keys: &[K]) -> bool {
        self.trie.contains(keys)
    }

    fn adding(&self, keys: &[K]) -> Self {
        self.trie.setting(keys, Mark::Present).into()
    }

    fn removing(&self, keys: &[K]) -> Self {
        self.trie.deleting(keys).into()
    }

    fn to_array(&self) -> Vec<Vec<K>> {
        self.trie.key_sets()
    }
}

impl<K> From<TrieMapping<K, Mark>> for TrieSet<K> {
    fn from(trie: TrieMapping<K, Mark>) -> Self {
        TrieSet { trie }
    }
}

impl<K> Clone for TrieSet<K> {
    fn clone(&self) -> Self {
        TrieSet {
            trie: self.trie.clone(),
        }
    }
}

impl<K> Default for TrieSet<K> {
    fn default() -> Self {
        TrieSet::new()
    }
}

impl<K: Symbol> FromIterator<Vec<K>> for TrieSet<K> {
    fn from_iter<I: IntoIterator<Item = Vec<K>>>(iter: I) -> Self {
        iter.into_iter()
            .fold(TrieSet::new(), |set, keys| set.adding(&keys))
    }
}

impl<K: Symbol> Serialize for TrieSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.trie.serialize(serializer)
    }
}

impl<'de, K: Symbol> Deserialize<'de> for TrieSet<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        TrieMapping::<K, Mark>::deserialize(deserializer).map(TrieSet::from)
    }
}

/// A set whose root may itself be marked as covered
///
/// Used to answer "is this path covered by a marked ancestor". When the cover
/// is present, the empty key sequence counts as a member.
#[derive(Debug, PartialEq, Eq)]
pub struct CoveredSet<K> {
    inner: CoveredTrie<K, Mark>,
}

impl<K> CoveredSet<K> {
    pub fn new() -> Self {
        CoveredSet {
            inner: CoveredTrie::default(),
        }
    }

    pub fn as_covered(&self) -> &CoveredTrie<K, Mark> {
        &self.inner
    }

    pub fn has_cover(&self) -> bool {
        self.inner.cover().is_some()
    }
}

impl<K: Symbol> CoveredSet<K> {
    pub fn add_cover(&self) -> Self {
        self.inner.setting_cover(Mark::Present).into()
    }

    pub fn remove_cover(&self) -> Self {
        self.inner.clearing_cover().into()
    }

    /// Descend to `keys`, marking the result covered if any member on the
    /// way (or the root cover) marks it
    pub fn subtree_with_cover(&self, keys: &[K]) -> Self {
        self.inner.subtree_with_cover(keys).into()
    }

    /// Whether `keys` is a member or lies below one
    pub fn is_covered(&self, keys: &[K]) -> bool {
        self.inner.cover_at(keys).is_some()
    }

    /// Whether the immediate child `key` is itself a member
    pub fn contains_child(&self, key: &K) -> bool {
        self.inner.contains(key)
    }
}

impl<K: Symbol> UniqueGroup<K> for CoveredSet<K> {
    fn contains(&self, keys: &[K]) -> bool {
        self.inner.trie().contains(keys)
    }

    fn adding(&self, keys: &[K]) -> Self {
        self.inner.setting(keys, Mark::Present).into()
    }

    fn removing(&self, keys: &[K]) -> Self {
        self.inner.deleting(keys).into()
    }

    /// Every member in key order, preceded by the empty sequence when the
    /// root is covered
    fn to_array(&self) -> Vec<Vec<K>> {
        let mut members = Vec::new();
        if self.has_cover() {
            members.push(Vec::new());
        }
        members.extend(self.inner.trie().key_sets());
        members
    }
}

impl<K> From<CoveredTrie<K, Mark>> for CoveredSet<K> {
    fn from(inner: CoveredTrie<K, Mark>) -> Self {
        CoveredSet { inner }
    }
}

impl<K> From<TrieSet<K>> for CoveredSet<K> {
    fn from(set: TrieSet<K>) -> Self {
        CoveredTrie::from(set.into_trie()).into()
    }
}

impl<K> Clone for CoveredSet<K> {
    fn clone(&self) -> Self {
        CoveredSet {
            inner: self.inner.clone(),
        }
    }
}

impl<K> Default for CoveredSet<K> {
    fn default() -> Self {
        CoveredSet::new()
    }
}

impl<K: Symbol> Serialize for CoveredSet<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de, K: Symbol> Deserialize<'de> for CoveredSet<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        CoveredTrie::<K, Mark>::deserialize(deserializer).map(CoveredSet::from)
    }
}

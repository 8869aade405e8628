//! Covered lookup: values inherited from the nearest ancestor

use super::TrieMapping;
use crate::model::{Hash, Symbol};
use crate::Result;
use serde::{Deserialize, Serialize};

/// A trie paired with the cover in effect at its root
///
/// The cover is the value inherited from the nearest ancestor that carried
/// one. Descending with [`subtree_with_cover`](Self::subtree_with_cover)
/// replaces it with each fully traversed node's own value, so a value set at
/// `["foo"]` governs `["foo", "boo"]` until something deeper overrides it.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Symbol, V: Serialize",
    deserialize = "K: Symbol, V: Deserialize<'de> + Clone"
))]
pub struct CoveredTrie<K, V> {
    trie: TrieMapping<K, V>,
    #[serde(default)]
    cover: Option<V>,
}

impl<K, V> CoveredTrie<K, V> {
    pub fn new(trie: TrieMapping<K, V>, cover: Option<V>) -> Self {
        CoveredTrie { trie, cover }
    }

    pub fn trie(&self) -> &TrieMapping<K, V> {
        &self.trie
    }

    pub fn cover(&self) -> Option<&V> {
        self.cover.as_ref()
    }
}

impl<K: Symbol, V: Clone> CoveredTrie<K, V> {
    /// Descend to `keys`, carrying the governing cover along
    ///
    /// If the first symbol has no branch at all, the result is an empty trie
    /// with this trie's cover unchanged. If the path leaves the trie further
    /// down, the result is an empty trie with the cover accumulated up to
    /// that point. Empty `keys` return `self`.
    pub fn subtree_with_cover(&self, keys: &[K]) -> Self {
        let Some(first) = keys.first() else {
            return self.clone();
        };
        let Some(root) = self.trie.root(first) else {
            return CoveredTrie::new(TrieMapping::new(), self.cover.clone());
        };
        let (children, cover) = root.subtree_with_cover(keys, self.cover.as_ref());
        CoveredTrie::new(TrieMapping::from_children(children), cover)
    }

    /// The value governing `keys`
    pub fn cover_at(&self, keys: &[K]) -> Option<V> {
        self.subtree_with_cover(keys).cover
    }

    /// Whether the immediate child `key` stores a value of its own
    ///
    /// A deeper descendant starting with `key` does not count.
    pub fn contains(&self, key: &K) -> bool {
        self.trie.get(std::slice::from_ref(key)).is_some()
    }

    /// Store `value` at `keys`, keeping the cover
    pub fn setting(&self, keys: &[K], value: V) -> Self {
        CoveredTrie::new(self.trie.setting(keys, value), self.cover.clone())
    }

    /// Remove the value at `keys`, keeping the cover
    pub fn deleting(&self, keys: &[K]) -> Self {
        CoveredTrie::new(self.trie.deleting(keys), self.cover.clone())
    }

    pub fn setting_cover(&self, cover: V) -> Self {
        CoveredTrie::new(self.trie.clone(), Some(cover))
    }

    pub fn clearing_cover(&self) -> Self {
        CoveredTrie::new(self.trie.clone(), None)
    }

    /// Union of the tries; `other`'s values and cover win where present
    pub fn overwrite(&self, other: &Self) -> Self {
        CoveredTrie::new(
            self.trie.overwrite(&other.trie),
            other.cover.clone().or_else(|| self.cover.clone()),
        )
    }

    /// BLAKE3 digest of the encoded trie and cover
    pub fn content_hash(&self) -> Result<Hash>
    where
        V: Serialize,
    {
        Hash::of(self)
    }
}

impl<K, V: Clone> Clone for CoveredTrie<K, V> {
    fn clone(&self) -> Self {
        CoveredTrie {
            trie: self.trie.clone(),
            cover: self.cover.clone(),
        }
    }
}

impl<K, V> Default for CoveredTrie<K, V> {
    fn default() -> Self {
        CoveredTrie::new(TrieMapping::new(), None)
    }
}

impl<K, V> From<TrieMapping<K, V>> for CoveredTrie<K, V> {
    fn from(trie: TrieMapping<K, V>) -> Self {
        CoveredTrie::new(trie, None)
    }
}

//! Diff between two trie versions

use crate::model::Symbol;
use crate::trie::TrieMapping;
use std::cmp::Ordering;

/// One changed key between two versions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffEntry<K, V> {
    /// Key was added
    Added { key: Vec<K>, value: V },
    /// Key was removed
    Removed { key: Vec<K>, value: V },
    /// Key kept but its value changed
    Modified { key: Vec<K>, old: V, new: V },
}

impl<K, V> DiffEntry<K, V> {
    pub fn key(&self) -> &[K] {
        match self {
            DiffEntry::Added { key, .. } => key,
            DiffEntry::Removed { key, .. } => key,
            DiffEntry::Modified { key, .. } => key,
        }
    }
}

/// All changes between two versions, in key order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diff<K, V> {
    pub entries: Vec<DiffEntry<K, V>>,
}

impl<K, V> Diff<K, V> {
    pub fn new(entries: Vec<DiffEntry<K, V>>) -> Self {
        Diff { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn added_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Added { .. }))
            .count()
    }

    pub fn removed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Removed { .. }))
            .count()
    }

    pub fn modified_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, DiffEntry::Modified { .. }))
            .count()
    }

    /// Changes at or below `prefix`
    pub fn changes_under<'a>(&'a self, prefix: &'a [K]) -> impl Iterator<Item = &'a DiffEntry<K, V>>
    where
        K: PartialEq,
    {
        self.entries.iter().filter(move |e| e.key().starts_with(prefix))
    }
}

/// Compute the changes turning `old` into `new`
///
/// Both tries enumerate in key order, so the two entry lists are merged in a
/// single pass.
pub fn diff_tries<K, V>(old: &TrieMapping<K, V>, new: &TrieMapping<K, V>) -> Diff<K, V>
where
    K: Symbol,
    V: Clone + PartialEq,
{
    if old == new {
        return Diff::new(Vec::new());
    }

    let mut entries = Vec::new();
    let mut old_iter = old.elements().into_iter().peekable();
    let mut new_iter = new.elements().into_iter().peekable();

    loop {
        let order = match (old_iter.peek(), new_iter.peek()) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((old_key, _)), Some((new_key, _))) => old_key.cmp(new_key),
        };
        match order {
            Ordering::Less => {
                if let Some((key, value)) = old_iter.next() {
                    entries.push(DiffEntry::Removed { key, value });
                }
            }
            Ordering::Greater => {
                if let Some((key, value)) = new_iter.next() {
                    entries.push(DiffEntry::Added { key, value });
                }
            }
            Ordering::Equal => {
                if let (Some((key, old)), Some((_, new))) = (old_iter.next(), new_iter.next()) {
                    if old != new {
                        entries.push(DiffEntry::Modified { key, old, new });
                    }
                }
            }
        }
    }

    Diff::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diff_empty_to_non_empty() {
        let new = TrieMapping::new().setting(&path(&["a"]), 1);
        let diff = diff_tries(&TrieMapping::new(), &new);

        assert_eq!(diff.added_count(), 1);
        assert_eq!(diff.removed_count(), 0);
        assert_eq!(diff.modified_count(), 0);
    }

    #[test]
    fn test_diff_modification() {
        let old = TrieMapping::new()
            .setting(&path(&["a"]), 1)
            .setting(&path(&["a", "b"]), 2);
        let new = old.setting(&path(&["a", "b"]), 3);

        let diff = diff_tries(&old, &new);
        assert_eq!(
            diff.entries,
            vec![DiffEntry::Modified {
                key: path(&["a", "b"]),
                old: 2,
                new: 3
            }]
        );
    }

    #[test]
    fn test_diff_mixed_changes_in_key_order() {
        let old = TrieMapping::new()
            .setting(&path(&["a"]), 1)
            .setting(&path(&["b", "x"]), 2)
            .setting(&path(&["c"]), 3);
        let new = old
            .deleting(&path(&["a"]))
            .setting(&path(&["b", "y"]), 4)
            .setting(&path(&["c"]), 5);

        let diff = diff_tries(&old, &new);
        let keys: Vec<_> = diff.entries.iter().map(|e| e.key().to_vec()).collect();
        assert_eq!(keys, vec![path(&["a"]), path(&["b", "y"]), path(&["c"])]);
        assert_eq!(diff.removed_count(), 1);
        assert_eq!(diff.added_count(), 1);
        assert_eq!(diff.modified_count(), 1);
        assert_eq!(diff.changes_under(&path(&["b"])).count(), 1);
    }

    #[test]
    fn test_diff_same_tries() {
        let trie = TrieMapping::new().setting(&path(&["a"]), 1);
        assert!(diff_tries(&trie, &trie.clone()).is_empty());
    }
}

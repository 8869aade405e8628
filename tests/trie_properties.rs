//! Property-based tests for the trie engine
//!
//! Every property compares the trie against a `BTreeMap` model built from the
//! same operations.

use canopy::{CoveredTrie, TrieMapping};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

type Key = Vec<u8>;
type Trie = TrieMapping<u8, u32>;

// Short keys over a tiny alphabet so prefixes collide often
fn key_strategy() -> impl Strategy<Value = Key> {
    prop::collection::vec(0u8..3, 1..5)
}

fn entries_strategy() -> impl Strategy<Value = Vec<(Key, u32)>> {
    prop::collection::vec((key_strategy(), any::<u32>()), 0..24)
}

fn build(entries: &[(Key, u32)]) -> Trie {
    entries
        .iter()
        .fold(Trie::new(), |trie, (key, value)| trie.setting(key, *value))
}

fn model(entries: &[(Key, u32)]) -> BTreeMap<Key, u32> {
    entries.iter().cloned().collect()
}

fn as_map(trie: &Trie) -> BTreeMap<Key, u32> {
    trie.elements().into_iter().collect()
}

proptest! {
    #[test]
    fn prop_matches_model(entries in entries_strategy()) {
        let trie = build(&entries);
        let expected = model(&entries);

        prop_assert!(trie.is_canonical());
        prop_assert_eq!(trie.len(), expected.len());
        prop_assert_eq!(as_map(&trie), expected.clone());
        for (key, value) in &expected {
            prop_assert_eq!(trie.get(key), Some(value));
        }
    }

    #[test]
    fn prop_insertion_order_is_irrelevant(entries in entries_strategy()) {
        // Deduplicate first so the last write per key is the same either way
        let unique: Vec<(Key, u32)> = model(&entries).into_iter().collect();
        let forward = build(&unique);
        let reversed: Vec<_> = unique.iter().rev().cloned().collect();
        let backward = build(&reversed);

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.content_hash().unwrap(), backward.content_hash().unwrap());
        prop_assert_eq!(
            bincode::serialize(&forward).unwrap(),
            bincode::serialize(&backward).unwrap()
        );
    }

    #[test]
    fn prop_delete_matches_model(entries in entries_strategy(), doomed in prop::collection::vec(key_strategy(), 0..8)) {
        let mut expected = model(&entries);
        let mut trie = build(&entries);
        for key in &doomed {
            expected.remove(key);
            trie = trie.deleting(key);
            prop_assert!(trie.is_canonical());
        }
        prop_assert_eq!(as_map(&trie), expected.clone());

        // Same content built directly has the same shape
        let direct: Vec<_> = expected.into_iter().collect();
        prop_assert_eq!(trie, build(&direct));
    }

    #[test]
    fn prop_set_then_delete_absent_key_is_identity(entries in entries_strategy(), key in key_strategy(), value in any::<u32>()) {
        let trie = build(&entries);
        prop_assume!(trie.get(&key).is_none());
        prop_assert_eq!(trie.setting(&key, value).deleting(&key), trie);
    }

    #[test]
    fn prop_including_excluding_partition(entries in entries_strategy(), key in key_strategy()) {
        let trie = build(&entries);
        let inside = as_map(&trie.including(&key));
        let outside = as_map(&trie.excluding(&key));
        prop_assert!(trie.including(&key).is_canonical());
        prop_assert!(trie.excluding(&key).is_canonical());

        let union: BTreeSet<Key> = inside.keys().chain(outside.keys()).cloned().collect();
        let all: BTreeSet<Key> = as_map(&trie).into_keys().collect();
        prop_assert_eq!(union, all);

        // Only values stored on the path above an existing branch land on
        // both sides
        let shared: BTreeSet<Key> = inside.keys().filter(|k| outside.contains_key(*k)).cloned().collect();
        let branch_exists = as_map(&trie).keys().any(|k| k.starts_with(&key));
        let ancestors: BTreeSet<Key> = (1..key.len())
            .map(|n| key[..n].to_vec())
            .filter(|prefix| branch_exists && trie.get(prefix).is_some())
            .collect();
        prop_assert_eq!(shared, ancestors);
    }

    #[test]
    fn prop_subtree_supertree_roundtrip(entries in entries_strategy(), key in key_strategy()) {
        let trie = build(&entries);
        prop_assume!((1..=key.len()).all(|n| trie.get(&key[..n]).is_none()));

        let included = trie.including(&key);
        let regrown = included.subtree(&key).supertree(&key);
        prop_assert!(regrown.is_canonical());
        prop_assert_eq!(regrown, included);
    }

    #[test]
    fn prop_overwrite_matches_reinsertion(left in entries_strategy(), right in entries_strategy()) {
        let a = build(&left);
        let b = build(&right);
        let merged = a.overwrite(&b);
        let naive = b.elements().into_iter().fold(a.clone(), |t, (k, v)| t.setting(&k, v));

        prop_assert!(merged.is_canonical());
        prop_assert_eq!(&merged, &naive);
    }

    #[test]
    fn prop_merge_combines_shared_keys(left in entries_strategy(), right in entries_strategy()) {
        let a = build(&left);
        let b = build(&right);
        let merged = a.merge(&b, |l, r| l.wrapping_add(*r));

        let mut expected = as_map(&a);
        for (key, value) in as_map(&b) {
            expected
                .entry(key)
                .and_modify(|old| *old = old.wrapping_add(value))
                .or_insert(value);
        }
        prop_assert_eq!(as_map(&merged), expected);
    }

    #[test]
    fn prop_encoding_roundtrip(entries in entries_strategy(), cover in any::<Option<u32>>()) {
        let covered = CoveredTrie::new(build(&entries), cover);

        let json = serde_json::to_string(&covered).unwrap();
        let from_json: CoveredTrie<u8, u32> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&from_json, &covered);

        let bytes = bincode::serialize(&covered).unwrap();
        let from_bytes: CoveredTrie<u8, u32> = bincode::deserialize(&bytes).unwrap();
        prop_assert_eq!(from_bytes, covered);
    }

    #[test]
    fn prop_cover_is_nearest_valued_ancestor(entries in entries_strategy(), key in key_strategy(), root in any::<Option<u32>>()) {
        let trie = build(&entries);
        let covered = CoveredTrie::new(trie.clone(), root);

        let expected = (1..=key.len())
            .rev()
            .find_map(|n| trie.get(&key[..n]).copied())
            .or(root);
        prop_assert_eq!(covered.cover_at(&key), expected);
    }
}

#[test]
fn test_public_updates_keep_every_root_canonical() {
    let left = Trie::new().setting(&[], 7).setting(&[0, 1], 1).setting(&[0, 2], 2);
    let right = Trie::new().setting(&[1], 3).setting(&[2, 0], 4);
    assert!(left.get(&[]).is_none());

    let merged = left.merge(&right, |l, r| l + r).deleting(&[0, 1]).supertree(&[2]);
    assert!(merged.is_canonical());
    for (key, root) in merged.children().iter() {
        assert!(!root.prefix().is_empty());
        assert_eq!(root.prefix().first(), Some(key));
    }
    assert_eq!(merged.get(&[2, 0, 2]), Some(&2));
    assert_eq!(merged.get(&[2, 2, 0]), Some(&4));
}

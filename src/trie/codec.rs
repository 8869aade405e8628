//! Structured encoding of trie nodes and containers
//!
//! Encoded shapes:
//!
//! ```text
//! node    { "prefix": [hex, ...], "value": <value | null>, "children": { hex: node, ... } }
//! trie    { "children": { hex: node, ... } }
//! covered { "trie": trie, "cover": <value | null> }
//! ```
//!
//! Symbols are written as the hex of their byte encoding. Child maps are
//! written in symbol order, so equal content always encodes to equal bytes.
//! Decoding re-checks every node invariant and reports a corruption naming
//! the offending field.

use super::{Children, TrieMapping, TrieNode};
use crate::model::{decode_symbols, encode_symbols, Symbol};
use crate::Error;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

impl<K: Symbol, N: Serialize> Serialize for Children<K, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, node) in self.iter() {
            map.serialize_entry(&key.to_hex(), node)?;
        }
        map.end()
    }
}

impl<K: Symbol, V: Serialize> Serialize for TrieNode<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let prefix = encode_symbols(self.prefix());
        let mut state = serializer.serialize_struct("TrieNode", 3)?;
        state.serialize_field("prefix", &prefix)?;
        state.serialize_field("value", &self.value())?;
        state.serialize_field("children", self.children())?;
        state.end()
    }
}

impl<K: Symbol, V: Serialize> Serialize for TrieMapping<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TrieMapping", 1)?;
        state.serialize_field("children", self.children())?;
        state.end()
    }
}

/// Node as read from the wire, before symbols are decoded and checked
#[derive(Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
struct RawNode<V> {
    prefix: Vec<String>,
    #[serde(default)]
    value: Option<V>,
    #[serde(default)]
    children: BTreeMap<String, RawNode<V>>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
struct RawTrie<V> {
    #[serde(default)]
    children: BTreeMap<String, RawNode<V>>,
}

fn field_error(field: &str, err: Error) -> Error {
    match err {
        Error::Corruption(detail) => Error::Corruption(format!("{}: {}", field, detail)),
        other => other,
    }
}

fn decode_children<K: Symbol, V: Clone>(
    raw: BTreeMap<String, RawNode<V>>,
) -> crate::Result<Children<K, TrieNode<K, V>>> {
    let mut decoded = BTreeMap::new();
    for (spelling, node) in raw {
        let key = K::from_hex(&spelling).map_err(|e| field_error("children", e))?;
        let node = node.decode(&key)?;
        if decoded.insert(key, node).is_some() {
            return Err(Error::Corruption(format!(
                "children: duplicate symbol {:?}",
                spelling
            )));
        }
    }
    Ok(decoded.into_iter().collect())
}

/// Decode a JSON document of any nesting depth
///
/// Every trie node adds two levels of JSON nesting, so deep tries exceed
/// serde_json's default recursion limit. The limit is lifted here and the
/// stack grows on demand instead.
pub fn from_json<T: DeserializeOwned>(text: &str) -> crate::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

impl<V: Clone> RawNode<V> {
    fn decode<K: Symbol>(self, key: &K) -> crate::Result<TrieNode<K, V>> {
        let prefix: Vec<K> =
            decode_symbols(&self.prefix).map_err(|e| field_error("prefix", e))?;

        match prefix.first() {
            None => return Err(Error::Corruption("prefix: empty symbol sequence".into())),
            Some(first) if first != key => {
                return Err(Error::Corruption(format!(
                    "children: key {} does not match child prefix {}",
                    key.to_hex(),
                    first.to_hex()
                )))
            }
            Some(_) => {}
        }

        if self.value.is_none() && self.children.len() < 2 {
            return Err(Error::Corruption(format!(
                "children: node without value has {} children",
                self.children.len()
            )));
        }

        let children = decode_children(self.children)?;
        Ok(TrieNode::new(prefix, self.value, children))
    }
}

impl<'de, K, V> Deserialize<'de> for TrieNode<K, V>
where
    K: Symbol,
    V: Deserialize<'de> + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawNode::<V>::deserialize(deserializer)?;
        let first = raw
            .prefix
            .first()
            .ok_or_else(|| de::Error::custom(Error::Corruption("prefix: empty symbol sequence".into())))?;
        let key = K::from_hex(first)
            .map_err(|e| de::Error::custom(field_error("prefix", e)))?;
        raw.decode(&key).map_err(de::Error::custom)
    }
}

impl<'de, K, V> Deserialize<'de> for TrieMapping<K, V>
where
    K: Symbol,
    V: Deserialize<'de> + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTrie::<V>::deserialize(deserializer)?;
        decode_children(raw.children)
            .map(TrieMapping::from_children)
            .map_err(de::Error::custom)
    }
}

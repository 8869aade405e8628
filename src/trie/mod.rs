//! Persistent compressed prefix trie
//!
//! This implements an immutable radix trie where:
//! - Keys are sequences of [`Symbol`](crate::model::Symbol)s
//! - Runs of single-child nodes are compressed into one node prefix
//! - Every operation returns a new version sharing unchanged subtrees
//! - Equal content always has the same shape, encoding and hash

mod children;
mod codec;
mod covered;
mod group;
mod mapping;
mod node;

pub use children::Children;
pub use codec::from_json;
pub use covered::CoveredTrie;
pub use group::{CoveredSet, Mark, TrieSet, UniqueGroup};
pub use mapping::TrieMapping;
pub use node::TrieNode;

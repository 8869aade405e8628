//! # canopy
//!
//! A persistent compressed prefix trie with covered (inherited) lookup.
//!
//! Keys are sequences of symbols. Chains of single-child nodes collapse into
//! one node prefix, every update returns a new version that shares all
//! untouched subtrees with the old one, and equal content always has the same
//! shape, encoding and content hash.
//!
//! ## Core Concepts
//!
//! - **TrieMapping**: symbol sequences to values
//! - **CoveredTrie**: a mapping plus the value inherited from above its root
//! - **TrieSet / CoveredSet**: set views over the same structure
//! - **Queries**: bracket notation such as `{a{b,c},d}` building a set
//! - **Snapshots**: checksummed, compressed single-file persistence
//!
//! ## Example
//!
//! ```
//! use canopy::{CoveredTrie, TrieMapping};
//!
//! let path = |p: &[&str]| p.iter().map(|s| s.to_string()).collect::<Vec<_>>();
//!
//! let trie = TrieMapping::new()
//!     .setting(&path(&["docs"]), "public")
//!     .setting(&path(&["docs", "drafts"]), "private");
//! let covered = CoveredTrie::new(trie, None);
//!
//! assert_eq!(covered.cover_at(&path(&["docs", "guide"])), Some("public"));
//! assert_eq!(covered.cover_at(&path(&["docs", "drafts", "x"])), Some("private"));
//! ```

pub mod model;
pub mod ops;
pub mod query;
pub mod store;
pub mod trie;

mod error;

pub use error::{Error, Result};
pub use model::{Hash, Symbol};
pub use ops::{diff_tries, Diff, DiffEntry};
pub use query::parse_query;
pub use store::{read_snapshot, write_snapshot, BlobKind, Persist};
pub use trie::{
    from_json, CoveredSet, CoveredTrie, Mark, TrieMapping, TrieNode, TrieSet, UniqueGroup,
};

/// Snapshot format version
pub const VERSION: u32 = 1;

/// Magic bytes identifying a snapshot file
pub const MAGIC: &[u8; 8] = b"CANOPYDB";

//! Persistence for trie structures
//!
//! Structures are serialized with bincode, wrapped in a kind-tagged blob,
//! compressed with zstd and written behind a checksummed header.

mod blob;
mod snapshot;

pub use blob::{Blob, BlobKind};
pub use snapshot::{
    decode_snapshot, encode_snapshot, is_snapshot, read_snapshot, write_snapshot, Persist,
};

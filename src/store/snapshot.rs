//! Single-file snapshots of one trie structure
//!
//! File format:
//! ```text
//! [HEADER: 64 bytes]
//!   - magic: 8 bytes ("CANOPYDB")
//!   - version: 4 bytes (u32 LE)
//!   - kind: 1 byte
//!   - reserved: 3 bytes
//!   - payload_len: 8 bytes (u64 LE)
//!   - checksum: 32 bytes (blake3 of the payload)
//!   - reserved: 8 bytes
//!
//! [PAYLOAD: payload_len bytes]
//!   - compressed blob (kind byte + zstd frame of the bincode encoding)
//! ```

use crate::model::{Hash, Symbol};
use crate::store::blob::{Blob, BlobKind};
use crate::trie::{CoveredSet, CoveredTrie, TrieMapping, TrieSet};
use crate::{Error, Result, MAGIC, VERSION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

const HEADER_SIZE: usize = 64;

/// A structure that can be written to a snapshot file
pub trait Persist: Serialize + DeserializeOwned {
    const KIND: BlobKind;
}

impl<K: Symbol, V: Serialize + DeserializeOwned + Clone> Persist for TrieMapping<K, V> {
    const KIND: BlobKind = BlobKind::Trie;
}

impl<K: Symbol, V: Serialize + DeserializeOwned + Clone> Persist for CoveredTrie<K, V> {
    const KIND: BlobKind = BlobKind::Covered;
}

impl<K: Symbol> Persist for TrieSet<K> {
    const KIND: BlobKind = BlobKind::Set;
}

impl<K: Symbol> Persist for CoveredSet<K> {
    const KIND: BlobKind = BlobKind::CoveredSet;
}

/// Fixed-size file header
#[derive(Clone, Debug, PartialEq, Eq)]
struct Header {
    version: u32,
    kind: u8,
    payload_len: u64,
    checksum: Hash,
}

impl Header {
    fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0..8].copy_from_slice(MAGIC);
        header[8..12].copy_from_slice(&self.version.to_le_bytes());
        header[12] = self.kind;
        header[16..24].copy_from_slice(&self.payload_len.to_le_bytes());
        header[24..56].copy_from_slice(self.checksum.as_bytes());
        header
    }

    fn decode(header: &[u8; HEADER_SIZE]) -> Result<Self> {
        if &header[0..8] != MAGIC {
            return Err(Error::InvalidFile("invalid magic bytes".into()));
        }
        let mut checksum = [0u8; 32];
        checksum.copy_from_slice(&header[24..56]);
        Ok(Header {
            version: u32::from_le_bytes(field(header, 8)?),
            kind: header[12],
            payload_len: u64::from_le_bytes(field(header, 16)?),
            checksum: Hash::from_bytes(checksum),
        })
    }
}

/// Fixed-width little-endian field at `offset`
fn field<const N: usize>(header: &[u8], offset: usize) -> Result<[u8; N]> {
    header
        .get(offset..offset + N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| Error::Corruption(format!("header field at {} out of range", offset)))
}

/// Serialize `value` into a self-describing byte buffer
pub fn encode_snapshot<T: Persist>(value: &T) -> Result<Vec<u8>> {
    let blob = Blob::new(T::KIND, bincode::serialize(value)?);
    let payload = blob.compress()?;
    tracing::trace!(
        kind = %T::KIND,
        blob = %blob.hash().short(),
        raw = blob.size(),
        compressed = payload.len(),
        "encoded snapshot payload"
    );
    let header = Header {
        version: VERSION,
        kind: T::KIND.as_byte(),
        payload_len: payload.len() as u64,
        checksum: Hash::digest(&payload),
    };

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&header.encode());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Inverse of [`encode_snapshot`]; every header field is validated
pub fn decode_snapshot<T: Persist>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < HEADER_SIZE {
        if bytes.len() >= MAGIC.len() && &bytes[..MAGIC.len()] == MAGIC {
            return Err(Error::Corruption("truncated header".into()));
        }
        return Err(Error::InvalidFile("file too short for a snapshot".into()));
    }
    let (head, payload) = bytes.split_at(HEADER_SIZE);
    let head: [u8; HEADER_SIZE] = field(head, 0)?;
    let header = Header::decode(&head)?;

    if header.version != VERSION {
        return Err(Error::VersionMismatch {
            expected: VERSION,
            found: header.version,
        });
    }

    let kind = BlobKind::from_byte(header.kind)
        .ok_or_else(|| Error::Corruption(format!("invalid snapshot kind: {}", header.kind)))?;
    if kind != T::KIND {
        return Err(Error::KindMismatch {
            expected: T::KIND.to_string(),
            found: kind.to_string(),
        });
    }

    if payload.len() as u64 != header.payload_len {
        return Err(Error::Corruption(format!(
            "payload is {} bytes, header says {}",
            payload.len(),
            header.payload_len
        )));
    }
    if Hash::digest(payload) != header.checksum {
        return Err(Error::Corruption("checksum mismatch".into()));
    }

    let blob = Blob::decompress(payload)?;
    if blob.kind != kind {
        return Err(Error::Corruption(format!(
            "blob kind {} disagrees with header kind {}",
            blob.kind, kind
        )));
    }
    Ok(bincode::deserialize(&blob.data)?)
}

/// Write `value` to `path`, replacing any existing file
pub fn write_snapshot<T: Persist>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_snapshot(value)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;

    tracing::debug!(
        path = %path.display(),
        kind = %T::KIND,
        bytes = bytes.len(),
        "wrote snapshot"
    );
    Ok(())
}

/// Read a structure of type `T` back from `path`
pub fn read_snapshot<T: Persist>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    let value = decode_snapshot(&bytes).map_err(|err| {
        tracing::warn!(path = %path.display(), %err, "rejected snapshot");
        err
    })?;
    tracing::debug!(path = %path.display(), kind = %T::KIND, "read snapshot");
    Ok(value)
}

/// Whether `path` exists and starts with the snapshot magic
pub fn is_snapshot(path: impl AsRef<Path>) -> bool {
    fs::read(path)
        .map(|bytes| bytes.len() >= HEADER_SIZE && &bytes[..MAGIC.len()] == MAGIC)
        .unwrap_or(false)
}

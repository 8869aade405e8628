//! Blob - a typed, compressed chunk of serialized trie data

use crate::model::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which structure a blob holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobKind {
    /// A plain [`TrieMapping`](crate::trie::TrieMapping)
    Trie,
    /// A [`CoveredTrie`](crate::trie::CoveredTrie)
    Covered,
    /// A [`TrieSet`](crate::trie::TrieSet)
    Set,
    /// A [`CoveredSet`](crate::trie::CoveredSet)
    CoveredSet,
}

impl BlobKind {
    pub fn as_byte(&self) -> u8 {
        match self {
            BlobKind::Trie => 0,
            BlobKind::Covered => 1,
            BlobKind::Set => 2,
            BlobKind::CoveredSet => 3,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(BlobKind::Trie),
            1 => Some(BlobKind::Covered),
            2 => Some(BlobKind::Set),
            3 => Some(BlobKind::CoveredSet),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlobKind::Trie => "trie",
            BlobKind::Covered => "covered",
            BlobKind::Set => "set",
            BlobKind::CoveredSet => "covered-set",
        }
    }
}

impl fmt::Display for BlobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialized structure tagged with its kind
#[derive(Clone, Debug)]
pub struct Blob {
    pub kind: BlobKind,
    /// Uncompressed bincode bytes
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(kind: BlobKind, data: Vec<u8>) -> Self {
        Blob { kind, data }
    }

    /// Content hash; the kind byte takes part
    pub fn hash(&self) -> Hash {
        Hash::digest_many(&[&[self.kind.as_byte()], &self.data])
    }

    /// Kind byte followed by the zstd frame
    pub fn compress(&self) -> crate::Result<Vec<u8>> {
        let mut output = vec![self.kind.as_byte()];
        output.extend(zstd::encode_all(self.data.as_slice(), 3)?);
        Ok(output)
    }

    pub fn decompress(data: &[u8]) -> crate::Result<Self> {
        let (&tag, rest) = data
            .split_first()
            .ok_or_else(|| crate::Error::Corruption("empty blob data".into()))?;

        let kind = BlobKind::from_byte(tag)
            .ok_or_else(|| crate::Error::Corruption(format!("invalid blob kind: {}", tag)))?;

        let data = zstd::decode_all(rest)
            .map_err(|e| crate::Error::Corruption(format!("undecodable blob payload: {}", e)))?;

        Ok(Blob { kind, data })
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

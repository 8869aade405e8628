//! Key symbols and their byte/hex codec

use crate::{Error, Result};
use std::fmt::Debug;

/// One element of a key sequence
///
/// Symbols must be totally ordered so child maps iterate deterministically,
/// and must round-trip through bytes so prefixes can be persisted. The
/// encoded form of a symbol is the lowercase hex of [`Symbol::to_bytes`].
pub trait Symbol: Ord + Clone + Debug {
    /// Encode this symbol as bytes
    fn to_bytes(&self) -> Vec<u8>;

    /// Decode a symbol, or `None` if the bytes are not a valid encoding
    fn from_bytes(bytes: &[u8]) -> Option<Self>;

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| Error::Corruption(format!("invalid hex {:?}: {}", s, e)))?;
        Self::from_bytes(&bytes)
            .ok_or_else(|| Error::Corruption(format!("bytes {:?} are not a valid symbol", s)))
    }
}

/// Encode a symbol sequence as a list of hex strings
pub fn encode_symbols<K: Symbol>(symbols: &[K]) -> Vec<String> {
    symbols.iter().map(Symbol::to_hex).collect()
}

/// Decode a list of hex strings back into a symbol sequence
pub fn decode_symbols<K: Symbol>(encoded: &[String]) -> Result<Vec<K>> {
    encoded.iter().map(|s| K::from_hex(s)).collect()
}

macro_rules! impl_symbol_for_int {
    ($($t:ty),*) => {
        $(
            impl Symbol for $t {
                fn to_bytes(&self) -> Vec<u8> {
                    // Big-endian keeps byte order equal to numeric order
                    self.to_be_bytes().to_vec()
                }

                fn from_bytes(bytes: &[u8]) -> Option<Self> {
                    Some(<$t>::from_be_bytes(bytes.try_into().ok()?))
                }
            }
        )*
    };
}

impl_symbol_for_int!(u8, u16, u32, u64);

impl Symbol for char {
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = [0u8; 4];
        self.encode_utf8(&mut buf).as_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut chars = std::str::from_utf8(bytes).ok()?.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl Symbol for String {
    fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }
}

impl Symbol for Vec<u8> {
    fn to_bytes(&self) -> Vec<u8> {
        self.clone()
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Some(bytes.to_vec())
    }
}

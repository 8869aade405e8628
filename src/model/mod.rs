//! Core value types shared by the trie engine

mod hash;
mod symbol;

pub use hash::Hash;
pub use symbol::{decode_symbols, encode_symbols, Symbol};

//! Bracket notation for building sets of key sequences
//!
//! `{a{b,c},d}` describes the set `{[a, b], [a, c], [d]}`. Symbols are any
//! run of characters other than `{`, `}` and `,`; whitespace is ignored.

mod parser;
mod token;

pub use parser::parse_query;
pub use token::{combine_symbols, lex_characters, strip_whitespace, tokenize, Token};

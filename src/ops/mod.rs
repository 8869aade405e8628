//! Whole-trie operations built on the public API

mod diff;

pub use diff::{diff_tries, Diff, DiffEntry};

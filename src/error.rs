//! Error types for trie construction and decoding.

use thiserror::Error;

/// Errors produced by the trie codec.
///
/// All failures are deterministic functions of the input: the codec performs
/// no I/O, so there is nothing to retry. Either a well-formed trie/iterator
/// is produced or one of these errors is returned.
#[derive(Debug, Error)]
pub enum TrieError {
    /// The caller violated a builder precondition (e.g. unsorted keys).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The byte buffer is truncated or structurally inconsistent.
    #[error("corrupt trie data: {0}")]
    CorruptData(String),
}

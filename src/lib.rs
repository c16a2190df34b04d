//! Compact trie codec.
//!
//! `packtrie` turns a sorted sequence of (key, value-list) pairs into a
//! dense, self-delimiting binary blob, and reconstructs a lazily-navigable
//! radix trie from that blob without materializing it. It is the
//! representation a search/indexing subsystem uses to answer exact-lookup
//! and prefix-enumeration queries over large key sets (place names, tokens)
//! with minimal footprint.
//!
//! # Format
//!
//! Keys are sequences of [`TrieSymbol`]s. Each node packs its value count
//! and child count into a single header byte (escaping to explicit varints
//! when they saturate), followed by its own value records and one
//! descriptor per child in ascending discriminator order. Edge symbols are
//! stored as zigzag varint deltas: against the previous sibling's first
//! symbol across siblings, against the previous symbol within an edge.
//! Single-symbol edges whose delta fits in six bits collapse into the child
//! header byte entirely ("supershort"). Sibling deltas over real-world
//! alphabets cluster tightly, so almost every edge byte is small regardless
//! of the absolute alphabet size.
//!
//! The builder emits all of this in one streaming pass over the sorted
//! input by appending back-to-front and reversing once at the end; no
//! subtree size is ever computed ahead of writing.
//!
//! # Example
//!
//! ```rust
//! use packtrie::{
//!     encode_trie, for_each_with_values, read_trie, CodingParams, TrieEntry, U32ValueList,
//! };
//!
//! let entries = vec![
//!     TrieEntry::new(vec![65, 66], 7u32), // "AB"
//!     TrieEntry::new(vec![65, 67], 8u32), // "AC"
//! ];
//! let bytes = encode_trie::<U32ValueList>(&entries, CodingParams::default()).unwrap();
//!
//! let root = read_trie::<U32ValueList>(&bytes, CodingParams::default()).unwrap();
//! let mut seen = Vec::new();
//! for_each_with_values(&root, &mut |key: &[u32], values: &U32ValueList| {
//!     seen.push((key.to_vec(), values.values().to_vec()));
//! })
//! .unwrap();
//! assert_eq!(
//!     seen,
//!     vec![(vec![65, 66], vec![7]), (vec![65, 67], vec![8])]
//! );
//! ```
//!
//! The structure is write-once, read-many: nothing mutates the buffer after
//! construction, and iterators are self-contained borrows, so concurrent
//! readers need no coordination.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builder;
mod error;
mod reader;
mod stream;
mod values;
mod varint;

pub use builder::{build_trie, encode_trie, write_node, ChildDescriptor, TrieEntry};
pub use error::TrieError;
pub use reader::{find, for_each_with_prefix, for_each_with_values, read_trie, TrieIterator};
pub use stream::{ByteSink, ByteSource};
pub use values::{ByteValueList, CodingParams, U32ValueList, ValueList};
pub use varint::{
    read_varint, read_varuint, write_varint, write_varuint, zigzag_decode, zigzag_encode,
};

/// One unit of the key alphabet, after normalization.
///
/// The `u32` ordering is the ordering input keys must be sorted by.
pub type TrieSymbol = u32;

/// Baseline symbol seeding each node's cross-sibling delta chain.
pub const DEFAULT_SYMBOL: TrieSymbol = 0;

//! Pluggable value-list containers attached to trie nodes and leaves.
//!
//! The codec is agnostic to what a "value" means: a node's payload is
//! whatever a [`ValueList`] implementation serializes. Two deserialize modes
//! exist because the element count is sometimes known up front (a node's own
//! values, counted in its header) and sometimes inferred from the remaining
//! extent (a leaf child, whose extent is exactly its value bytes).

use crate::error::TrieError;
use crate::stream::{ByteSink, ByteSource};

/// Opaque configuration passed through to value-list (de)serialization.
///
/// The trie framing itself never inspects it; it exists so value codecs that
/// need shared parameters (e.g. an alphabet base offset) can receive them on
/// both the build and read paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CodingParams {
    base: u32,
}

impl CodingParams {
    /// Create parameters with the given base offset.
    pub fn new(base: u32) -> Self {
        Self { base }
    }

    /// The base offset.
    pub fn base(&self) -> u32 {
        self.base
    }
}

/// An ordered list of opaque value records attached to a node or leaf.
///
/// Implementations own their binary representation; the trie framing only
/// records the element count (for in-node lists) or the byte extent (for
/// leaves).
pub trait ValueList: Clone {
    /// The application-level record type.
    type Value: Clone;

    /// Create an empty list carrying `params`.
    fn with_params(params: CodingParams) -> Self;

    /// Replace the list contents.
    fn init(&mut self, values: Vec<Self::Value>);

    /// Number of records.
    fn len(&self) -> usize;

    /// Whether the list holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The records, in insertion order.
    fn values(&self) -> &[Self::Value];

    /// Append the binary representation of every record to `sink`.
    fn serialize(&self, sink: &mut ByteSink);

    /// Read exactly `count` records from `src`.
    fn deserialize_counted(
        src: &mut ByteSource<'_>,
        count: usize,
        params: CodingParams,
    ) -> Result<Self, TrieError>;

    /// Read records until `src` is exhausted.
    fn deserialize_remaining(
        src: &mut ByteSource<'_>,
        params: CodingParams,
    ) -> Result<Self, TrieError>;
}

/// Value list of fixed-width `u32` records, little-endian.
///
/// The standard instantiation for feature-id payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct U32ValueList {
    values: Vec<u32>,
}

impl U32ValueList {
    /// Create a list from its records.
    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }
}

impl ValueList for U32ValueList {
    type Value = u32;

    fn with_params(_params: CodingParams) -> Self {
        Self::default()
    }

    fn init(&mut self, values: Vec<u32>) {
        self.values = values;
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn values(&self) -> &[u32] {
        &self.values
    }

    fn serialize(&self, sink: &mut ByteSink) {
        for &value in &self.values {
            sink.write_u32(value);
        }
    }

    fn deserialize_counted(
        src: &mut ByteSource<'_>,
        count: usize,
        _params: CodingParams,
    ) -> Result<Self, TrieError> {
        if src.remaining() / 4 < count {
            return Err(TrieError::CorruptData(format!(
                "value count {} exceeds remaining extent",
                count
            )));
        }
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(src.read_u32()?);
        }
        Ok(Self { values })
    }

    fn deserialize_remaining(
        src: &mut ByteSource<'_>,
        _params: CodingParams,
    ) -> Result<Self, TrieError> {
        let mut values = Vec::with_capacity(src.remaining() / 4);
        while src.remaining() > 0 {
            values.push(src.read_u32()?);
        }
        Ok(Self { values })
    }
}

/// Value list of raw byte records.
///
/// One byte per record; useful for compact flags or as a building block for
/// blob payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteValueList {
    bytes: Vec<u8>,
}

impl ByteValueList {
    /// Create a list from its bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ValueList for ByteValueList {
    type Value = u8;

    fn with_params(_params: CodingParams) -> Self {
        Self::default()
    }

    fn init(&mut self, values: Vec<u8>) {
        self.bytes = values;
    }

    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn values(&self) -> &[u8] {
        &self.bytes
    }

    fn serialize(&self, sink: &mut ByteSink) {
        sink.write(&self.bytes);
    }

    fn deserialize_counted(
        src: &mut ByteSource<'_>,
        count: usize,
        _params: CodingParams,
    ) -> Result<Self, TrieError> {
        Ok(Self {
            bytes: src.read_bytes(count)?.to_vec(),
        })
    }

    fn deserialize_remaining(
        src: &mut ByteSource<'_>,
        _params: CodingParams,
    ) -> Result<Self, TrieError> {
        let n = src.remaining();
        Ok(Self {
            bytes: src.read_bytes(n)?.to_vec(),
        })
    }
}

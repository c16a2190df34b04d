//! Byte-level sink and source primitives.
//!
//! [`ByteSink`] is the append-only writer used by the builder; besides plain
//! appends it supports the reversed append the back-to-front construction
//! relies on. [`ByteSource`] is a bounds-checked forward reader over a byte
//! slice that always knows how many bytes remain, which is what makes
//! "deserialize until exhausted" value-list decoding possible.

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::TrieError;

/// Append-only byte buffer with position reporting.
#[derive(Debug, Default)]
pub struct ByteSink {
    bytes: Vec<u8>,
}

impl ByteSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn pos(&self) -> usize {
        self.bytes.len()
    }

    /// Append raw bytes.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append a single byte.
    #[inline]
    pub fn write_u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    /// Append a `u32` in little-endian byte order.
    #[inline]
    pub fn write_u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Append `bytes` in reverse order.
    ///
    /// The builder stages each node block forward in a scratch sink, then
    /// appends it reversed to the main stream; a single final reversal of
    /// the whole stream restores every block to forward order.
    #[inline]
    pub fn write_reversed(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes.iter().rev());
    }

    /// View of the bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the sink, returning the buffer.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Forward reader over a byte slice with remaining-size reporting.
///
/// Every read is bounds-checked; running past the end yields
/// [`TrieError::CorruptData`] rather than a panic or an out-of-bounds read.
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    data: &'a [u8],
}

impl<'a> ByteSource<'a> {
    /// Create a source over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Read one byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, TrieError> {
        self.data
            .read_u8()
            .map_err(|_| TrieError::CorruptData("unexpected end of data".to_string()))
    }

    /// Read a little-endian `u32`.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, TrieError> {
        self.data
            .read_u32::<LittleEndian>()
            .map_err(|_| TrieError::CorruptData("unexpected end of data".to_string()))
    }

    /// Read exactly `n` raw bytes, borrowing them from the underlying slice.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], TrieError> {
        if n > self.data.len() {
            return Err(TrieError::CorruptData(format!(
                "requested {} bytes with {} remaining",
                n,
                self.data.len()
            )));
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_positions_and_contents() {
        let mut sink = ByteSink::new();
        assert_eq!(sink.pos(), 0);
        sink.write_u8(1);
        sink.write(&[2, 3]);
        sink.write_u32(0x0807_0605);
        assert_eq!(sink.pos(), 7);
        assert_eq!(sink.into_bytes(), vec![1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn reversed_append() {
        let mut sink = ByteSink::new();
        sink.write_reversed(&[1, 2, 3]);
        sink.write_reversed(&[4, 5]);
        assert_eq!(sink.as_bytes(), &[3, 2, 1, 5, 4]);
    }

    #[test]
    fn source_reads_and_remaining() {
        let data = [9u8, 1, 0, 0, 0, 7, 8];
        let mut src = ByteSource::new(&data);
        assert_eq!(src.remaining(), 7);
        assert_eq!(src.read_u8().unwrap(), 9);
        assert_eq!(src.read_u32().unwrap(), 1);
        assert_eq!(src.read_bytes(2).unwrap(), &[7, 8]);
        assert_eq!(src.remaining(), 0);
        assert!(src.read_u8().is_err());
    }

    #[test]
    fn source_rejects_overread() {
        let mut src = ByteSource::new(&[1, 2]);
        assert!(src.read_u32().is_err());
        let mut src = ByteSource::new(&[1, 2]);
        assert!(src.read_bytes(3).is_err());
    }
}

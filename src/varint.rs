//! Variable-length integer and zigzag primitives.
//!
//! All counts, sizes and symbol deltas in the trie format are LEB128
//! varints: 7 bits per byte, low group first, high bit set on continuation
//! bytes. Values below 128 therefore occupy a single byte, which is the
//! common case for sibling and intra-edge symbol deltas over real-world
//! alphabets.
//!
//! Signed deltas are zigzag-mapped to unsigned first, so small magnitudes of
//! either sign stay in one byte.

use crate::error::TrieError;
use crate::stream::{ByteSink, ByteSource};

/// Map a signed integer to an unsigned one, interleaving signs:
/// `0, -1, 1, -2, 2, ...` becomes `0, 1, 2, 3, 4, ...`.
#[inline]
pub fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

/// Append `value` to `sink` as a LEB128 varint.
#[inline]
pub fn write_varuint(sink: &mut ByteSink, value: u64) {
    let mut val = value;
    while val >= 0x80 {
        sink.write_u8((val as u8) | 0x80);
        val >>= 7;
    }
    sink.write_u8(val as u8);
}

/// Read a LEB128 varint from `src`.
///
/// Fails with [`TrieError::CorruptData`] on a truncated or overlong
/// encoding (more than 10 bytes of continuation).
pub fn read_varuint(src: &mut ByteSource<'_>) -> Result<u64, TrieError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        if shift > 63 {
            return Err(TrieError::CorruptData("varint too long".to_string()));
        }
        let byte = src.read_u8()?;
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

/// Append a signed value as zigzag + varint.
#[inline]
pub fn write_varint(sink: &mut ByteSink, value: i64) {
    write_varuint(sink, zigzag_encode(value));
}

/// Read a zigzag + varint signed value.
#[inline]
pub fn read_varint(src: &mut ByteSource<'_>) -> Result<i64, TrieError> {
    Ok(zigzag_decode(read_varuint(src)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(v: u64) {
        let mut sink = ByteSink::new();
        write_varuint(&mut sink, v);
        let bytes = sink.into_bytes();
        let mut src = ByteSource::new(&bytes);
        assert_eq!(read_varuint(&mut src).unwrap(), v);
        assert_eq!(src.remaining(), 0);
    }

    #[test]
    fn zigzag_small_values() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(31), 62);
        assert_eq!(zigzag_encode(-32), 63);
        for v in -1000i64..1000 {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
        assert_eq!(zigzag_decode(zigzag_encode(i64::MIN)), i64::MIN);
        assert_eq!(zigzag_decode(zigzag_encode(i64::MAX)), i64::MAX);
    }

    #[test]
    fn varuint_single_byte_boundary() {
        let mut sink = ByteSink::new();
        write_varuint(&mut sink, 127);
        assert_eq!(sink.pos(), 1);
        let mut sink = ByteSink::new();
        write_varuint(&mut sink, 128);
        assert_eq!(sink.pos(), 2);
    }

    #[test]
    fn varuint_round_trips() {
        for v in [0, 1, 127, 128, 300, 16383, 16384, u64::from(u32::MAX), u64::MAX] {
            round_trip(v);
        }
    }

    #[test]
    fn varint_round_trips() {
        for v in [0i64, 1, -1, 63, -64, 64, -65, i64::from(i32::MIN), i64::from(i32::MAX)] {
            let mut sink = ByteSink::new();
            write_varint(&mut sink, v);
            let bytes = sink.into_bytes();
            let mut src = ByteSource::new(&bytes);
            assert_eq!(read_varint(&mut src).unwrap(), v);
        }
    }

    #[test]
    fn truncated_varuint_is_an_error() {
        let mut src = ByteSource::new(&[0x80]);
        assert!(read_varuint(&mut src).is_err());
    }

    #[test]
    fn overlong_varuint_is_an_error() {
        let bytes = [0x80u8; 11];
        let mut src = ByteSource::new(&bytes);
        assert!(read_varuint(&mut src).is_err());
    }
}

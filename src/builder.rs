//! Streaming trie construction.
//!
//! [`build_trie`] consumes a slice of key/value entries already sorted by
//! key and emits the node format in a single pass, without computing any
//! subtree size up front. The trick: output is appended *back-to-front*.
//! Each node's children are written (deepest first, highest sibling first),
//! then the node's own block is staged forward in a scratch buffer and
//! appended reversed. One reversal of the finished buffer — done by
//! [`encode_trie`] — yields the forward layout the reader consumes:
//! node block, then child subtrees in ascending sibling order, with the
//! last child delimited by the remainder of the parent's extent.
//!
//! Child subtree byte sizes fall out of sink positions as a by-product, so
//! no two-pass size computation or post-hoc patching is needed; construction
//! is `O(total key symbols)` plus the final `O(buffer)` reversal.

use crate::error::TrieError;
use crate::stream::ByteSink;
use crate::values::{CodingParams, ValueList};
use crate::varint::{write_varint, write_varuint, zigzag_encode};
use crate::{TrieSymbol, DEFAULT_SYMBOL};

/// One key/value input pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrieEntry<V> {
    /// The key, as normalized trie symbols.
    pub key: Vec<TrieSymbol>,
    /// The attached value record.
    pub value: V,
}

impl<V> TrieEntry<V> {
    /// Create an entry.
    pub fn new(key: Vec<TrieSymbol>, value: V) -> Self {
        Self { key, value }
    }
}

/// Transient per-child record consumed by [`write_node`].
///
/// `subtree_size` is the encoded byte length of the child's subtree (for a
/// leaf: its value bytes); the reader uses it to slice the child's extent
/// without descending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildDescriptor {
    /// Whether the child is terminal (no node header, values only).
    pub is_leaf: bool,
    /// Encoded byte length of the child's subtree.
    pub subtree_size: usize,
    /// Compressed path from this node to the child; never empty.
    pub edge: Vec<TrieSymbol>,
}

/// Emit one node block, forward, into `sink`.
///
/// Layout: a header byte packing `min(valueCount, 3)` into the two high bits
/// and `min(childCount, 63)` into the low six, escaped counts as varints,
/// the node's own value bytes, then one descriptor per child in the given
/// order. `baseline` seeds the cross-sibling delta chain ([`DEFAULT_SYMBOL`]
/// for every node the builder writes); after each child it becomes that
/// child's first edge symbol.
///
/// Per child: a header byte with the leaf flag in bit 7 and either a
/// supershort single-symbol zigzag delta embedded in the low six bits
/// (bit 6 set), or `edgeLen - 1` in the low six bits — escaping to 63 plus
/// an explicit varint when the edge runs to 64 symbols or more — followed by
/// one zigzag varint per edge symbol against the running baseline. Every
/// child but the last is then trailed by its subtree byte size.
pub fn write_node<L: ValueList>(
    sink: &mut ByteSink,
    baseline: TrieSymbol,
    values: &L,
    children: &[ChildDescriptor],
) -> Result<(), TrieError> {
    let value_count = values.len();
    let child_count = children.len();
    let header = ((value_count.min(3) as u8) << 6) | child_count.min(63) as u8;
    sink.write_u8(header);
    if value_count >= 3 {
        write_varuint(sink, value_count as u64);
    }
    if child_count >= 63 {
        write_varuint(sink, child_count as u64);
    }
    values.serialize(sink);

    let mut base = baseline;
    for (i, child) in children.iter().enumerate() {
        let Some(&first) = child.edge.first() else {
            return Err(TrieError::InvalidInput("empty edge".to_string()));
        };
        let mut header = if child.is_leaf { 0x80u8 } else { 0 };
        let diff0 = zigzag_encode(i64::from(first) - i64::from(base));
        if child.edge.len() == 1 && diff0 < 64 {
            header |= 0x40 | diff0 as u8;
            sink.write_u8(header);
        } else {
            let len_field = child.edge.len() - 1;
            if len_field < 63 {
                header |= len_field as u8;
                sink.write_u8(header);
            } else {
                header |= 63;
                sink.write_u8(header);
                write_varuint(sink, len_field as u64);
            }
            let mut run = base;
            for &sym in &child.edge {
                write_varint(sink, i64::from(sym) - i64::from(run));
                run = sym;
            }
        }
        base = first;
        if i + 1 < child_count {
            write_varuint(sink, child.subtree_size as u64);
        }
    }
    Ok(())
}

/// Build a trie from `entries` into `sink`, back-to-front.
///
/// `entries` must already be sorted by key under the symbol ordering;
/// duplicate keys are legal and their values are preserved in input order.
/// The bytes land in `sink` reversed — reverse the finished buffer once (or
/// use [`encode_trie`]) before handing it to the reader.
///
/// # Errors
///
/// [`TrieError::InvalidInput`] if the keys are out of order.
pub fn build_trie<L: ValueList>(
    sink: &mut ByteSink,
    entries: &[TrieEntry<L::Value>],
    params: CodingParams,
) -> Result<(), TrieError> {
    for pair in entries.windows(2) {
        if pair[1].key < pair[0].key {
            return Err(TrieError::InvalidInput(
                "keys must be sorted by symbol order".to_string(),
            ));
        }
    }
    write_subtree::<L>(sink, entries, 0, params)
}

/// Build a trie from `entries` and return the forward byte buffer.
pub fn encode_trie<L: ValueList>(
    entries: &[TrieEntry<L::Value>],
    params: CodingParams,
) -> Result<Vec<u8>, TrieError> {
    let mut sink = ByteSink::new();
    build_trie::<L>(&mut sink, entries, params)?;
    let mut bytes = sink.into_bytes();
    bytes.reverse();
    Ok(bytes)
}

/// Recursively emit the subtree over `entries`, all of which share a key
/// prefix of length `depth`. Entries whose keys end exactly at `depth`
/// become this node's own value-list; the rest are partitioned by their
/// symbol at `depth` into one child per distinct discriminator.
fn write_subtree<L: ValueList>(
    sink: &mut ByteSink,
    entries: &[TrieEntry<L::Value>],
    depth: usize,
    params: CodingParams,
) -> Result<(), TrieError> {
    // Sorted input puts keys that terminate here first.
    let terminal_len = entries.iter().take_while(|e| e.key.len() == depth).count();
    let (terminal, rest) = entries.split_at(terminal_len);

    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    while start < rest.len() {
        let sym = rest[start].key[depth];
        let mut end = start + 1;
        while end < rest.len() && rest[end].key[depth] == sym {
            end += 1;
        }
        groups.push((start, end));
        start = end;
    }

    // Children are appended highest-first so the final reversal leaves their
    // subtrees in ascending sibling order after the node block.
    let mut children = Vec::with_capacity(groups.len());
    for &(start, end) in groups.iter().rev() {
        let group = &rest[start..end];
        let mut edge = vec![group[0].key[depth]];
        let mut d = depth + 1;
        // Radix path compression: absorb levels while the group neither
        // terminates nor branches. Sorted order makes both checks O(1):
        // the shortest key is first and the discriminators are monotone,
        // so first/last agreement implies group-wide agreement.
        loop {
            if group[0].key.len() == d {
                break;
            }
            let sym = group[0].key[d];
            let last_key = &group[group.len() - 1].key;
            if last_key.len() <= d || last_key[d] != sym {
                break;
            }
            edge.push(sym);
            d += 1;
        }

        let all_terminal = group[group.len() - 1].key.len() == d;
        let pos = sink.pos();
        if all_terminal {
            // Leaf: value bytes only, no node header. The parent's size
            // bookkeeping is what delimits them on read.
            let mut list = L::with_params(params);
            list.init(group.iter().map(|e| e.value.clone()).collect());
            let mut block = ByteSink::new();
            list.serialize(&mut block);
            sink.write_reversed(block.as_bytes());
        } else {
            write_subtree::<L>(sink, group, d, params)?;
        }
        children.push(ChildDescriptor {
            is_leaf: all_terminal,
            subtree_size: sink.pos() - pos,
            edge,
        });
    }
    children.reverse();

    let mut list = L::with_params(params);
    list.init(terminal.iter().map(|e| e.value.clone()).collect());
    let mut block = ByteSink::new();
    write_node(&mut block, DEFAULT_SYMBOL, &list, &children)?;
    sink.write_reversed(block.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::U32ValueList;

    #[test]
    fn rejects_unsorted_keys() {
        let entries = vec![
            TrieEntry::new(vec![2], 0u32),
            TrieEntry::new(vec![1], 1),
        ];
        let result = encode_trie::<U32ValueList>(&entries, CodingParams::default());
        assert!(matches!(result, Err(TrieError::InvalidInput(_))));
    }

    #[test]
    fn accepts_duplicate_keys() {
        let entries = vec![
            TrieEntry::new(vec![1], 0u32),
            TrieEntry::new(vec![1], 1),
        ];
        assert!(encode_trie::<U32ValueList>(&entries, CodingParams::default()).is_ok());
    }

    #[test]
    fn empty_input_yields_bare_root_header() {
        let bytes = encode_trie::<U32ValueList>(&[], CodingParams::default()).unwrap();
        assert_eq!(bytes, vec![0x00]);
    }

    // Hand-checked layout for [("A", 0), ("AB", 1), ("B", 2)]: root with two
    // children; "A" is an inner node carrying value 0 and one leaf child
    // "B", the root's second child "B" is a supershort leaf.
    #[test]
    fn known_layout_a_ab_b() {
        let entries = vec![
            TrieEntry::new(vec![65], 0u32),
            TrieEntry::new(vec![65, 66], 1),
            TrieEntry::new(vec![66], 2),
        ];
        let bytes = encode_trie::<U32ValueList>(&entries, CodingParams::default()).unwrap();
        let expected = vec![
            0x02, // root: 0 values, 2 children
            0x00, 0x82, 0x01, // child "A": inner, 1-symbol edge, varint(zigzag(65))
            12,   // child "A": subtree size
            0xc2, // child "B": leaf, supershort, zigzag(66 - 65)
            0x41, // node "A": 1 value, 1 child
            0, 0, 0, 0, // node "A": value 0
            0x80, 0x84, 0x01, // node "A" child "B": leaf, varint(zigzag(66))
            1, 0, 0, 0, // leaf "AB": value 1
            2, 0, 0, 0, // leaf "B": value 2
        ];
        assert_eq!(bytes, expected);
    }
}

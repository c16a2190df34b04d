//! Lazy trie decoding and traversal.
//!
//! [`read_trie`] parses only the root node: its header, its own value-list
//! and each child's descriptor (leaf flag, decoded edge, subtree extent).
//! Non-leaf children are not descended into until [`TrieIterator::go_to_child`]
//! is called, so point lookups touch a handful of nodes regardless of trie
//! size. Iterators borrow the buffer and never mutate it; any number of
//! them can walk the same bytes concurrently.
//!
//! Delta baselines are decoded exactly as the builder emitted them: the
//! cross-sibling baseline starts at [`DEFAULT_SYMBOL`] for every node's
//! child list and resets to each child's first symbol, and a multi-symbol
//! edge runs its own intra-edge baseline. Both are plain locals of one
//! parse call; no state is shared across calls.

use crate::error::TrieError;
use crate::stream::ByteSource;
use crate::values::{CodingParams, ValueList};
use crate::varint::{read_varint, read_varuint, zigzag_decode};
use crate::{TrieSymbol, DEFAULT_SYMBOL};

fn corrupt(msg: impl Into<String>) -> TrieError {
    TrieError::CorruptData(msg.into())
}

/// Advance a running baseline by a decoded delta, rejecting results outside
/// the symbol range.
fn apply_delta(base: TrieSymbol, delta: i64) -> Result<TrieSymbol, TrieError> {
    i64::from(base)
        .checked_add(delta)
        .and_then(|v| TrieSymbol::try_from(v).ok())
        .ok_or_else(|| corrupt(format!("symbol delta out of range: base {base}, delta {delta}")))
}

#[derive(Clone, Debug)]
struct ChildRef {
    is_leaf: bool,
    edge: Vec<TrieSymbol>,
    offset: usize,
    len: usize,
}

/// A lazily-parsed handle onto one trie node.
#[derive(Clone, Debug)]
pub struct TrieIterator<'a, L: ValueList> {
    extent: &'a [u8],
    params: CodingParams,
    values: L,
    children: Vec<ChildRef>,
}

/// Parse the root node of a trie from its forward byte buffer.
///
/// `params` is handed through to value-list decoding; the framing itself
/// ignores it.
pub fn read_trie<L: ValueList>(
    buf: &[u8],
    params: CodingParams,
) -> Result<TrieIterator<'_, L>, TrieError> {
    TrieIterator::parse(buf, params)
}

impl<'a, L: ValueList> TrieIterator<'a, L> {
    fn parse(extent: &'a [u8], params: CodingParams) -> Result<Self, TrieError> {
        let mut src = ByteSource::new(extent);
        let header = src.read_u8()?;
        let mut value_count = u64::from(header >> 6);
        let mut child_count = u64::from(header & 0x3f);
        if value_count == 3 {
            value_count = read_varuint(&mut src)?;
        }
        if child_count == 63 {
            child_count = read_varuint(&mut src)?;
        }
        let value_count =
            usize::try_from(value_count).map_err(|_| corrupt("value count overflow"))?;
        let child_count =
            usize::try_from(child_count).map_err(|_| corrupt("child count overflow"))?;

        let values = L::deserialize_counted(&mut src, value_count, params)?;

        // Every child descriptor takes at least one byte.
        if child_count > src.remaining() {
            return Err(corrupt(format!(
                "child count {} exceeds remaining extent",
                child_count
            )));
        }
        let mut children: Vec<ChildRef> = Vec::with_capacity(child_count);
        let mut base = DEFAULT_SYMBOL;
        for i in 0..child_count {
            let header = src.read_u8()?;
            let is_leaf = header & 0x80 != 0;
            let mut edge: Vec<TrieSymbol>;
            if header & 0x40 != 0 {
                // Supershort: the single symbol's delta lives in the header.
                edge = vec![apply_delta(base, zigzag_decode(u64::from(header & 0x3f)))?];
            } else {
                let field = u64::from(header & 0x3f);
                let edge_len = if field == 63 {
                    read_varuint(&mut src)?
                        .checked_add(1)
                        .ok_or_else(|| corrupt("edge length overflow"))?
                } else {
                    field + 1
                };
                let edge_len =
                    usize::try_from(edge_len).map_err(|_| corrupt("edge length overflow"))?;
                // Every symbol takes at least one byte.
                if edge_len > src.remaining() {
                    return Err(corrupt(format!(
                        "edge length {} exceeds remaining extent",
                        edge_len
                    )));
                }
                edge = Vec::with_capacity(edge_len);
                let mut run = base;
                for _ in 0..edge_len {
                    run = apply_delta(run, read_varint(&mut src)?)?;
                    edge.push(run);
                }
            }
            if let Some(prev) = children.last() {
                if edge[0] <= prev.edge[0] {
                    return Err(corrupt("sibling discriminators out of order"));
                }
            }
            base = edge[0];
            // The last child has no size; it owns the rest of the extent.
            let len = if i + 1 < child_count {
                usize::try_from(read_varuint(&mut src)?)
                    .map_err(|_| corrupt("subtree size overflow"))?
            } else {
                0
            };
            children.push(ChildRef {
                is_leaf,
                edge,
                offset: 0,
                len,
            });
        }

        let mut offset = extent.len() - src.remaining();
        let child_count = children.len();
        for (i, child) in children.iter_mut().enumerate() {
            child.offset = offset;
            if i + 1 == child_count {
                child.len = extent.len() - offset;
            } else if offset
                .checked_add(child.len)
                .map_or(true, |end| end > extent.len())
            {
                return Err(corrupt("child extent out of bounds"));
            }
            offset += child.len;
        }

        Ok(Self {
            extent,
            params,
            values,
            children,
        })
    }

    /// Number of children of this node.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The decoded edge of child `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn child_edge(&self, i: usize) -> &[TrieSymbol] {
        &self.children[i].edge
    }

    /// Whether child `i` is a leaf.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn child_is_leaf(&self, i: usize) -> bool {
        self.children[i].is_leaf
    }

    /// This node's own value-list.
    pub fn values(&self) -> &L {
        &self.values
    }

    /// Descend into child `i`, parsing its node (or leaf values) on demand.
    pub fn go_to_child(&self, i: usize) -> Result<TrieIterator<'a, L>, TrieError> {
        let Some(child) = self.children.get(i) else {
            return Err(TrieError::InvalidInput(format!(
                "child index {} out of range ({} children)",
                i,
                self.children.len()
            )));
        };
        let extent = &self.extent[child.offset..child.offset + child.len];
        if child.is_leaf {
            let mut src = ByteSource::new(extent);
            let values = L::deserialize_remaining(&mut src, self.params)?;
            Ok(Self {
                extent,
                params: self.params,
                values,
                children: Vec::new(),
            })
        } else {
            Self::parse(extent, self.params)
        }
    }
}

/// Depth-first walk over the subtree under `iter`.
///
/// `visit` receives the full key (the symbols accumulated from `iter` down)
/// and the value-list of every node or leaf that carries values, in
/// ascending key order.
pub fn for_each_with_values<L, F>(iter: &TrieIterator<'_, L>, visit: &mut F) -> Result<(), TrieError>
where
    L: ValueList,
    F: FnMut(&[TrieSymbol], &L),
{
    let mut path = Vec::new();
    walk(iter, &mut path, visit)
}

fn walk<L, F>(
    iter: &TrieIterator<'_, L>,
    path: &mut Vec<TrieSymbol>,
    visit: &mut F,
) -> Result<(), TrieError>
where
    L: ValueList,
    F: FnMut(&[TrieSymbol], &L),
{
    if !iter.values().is_empty() {
        visit(path, iter.values());
    }
    for i in 0..iter.child_count() {
        let child = iter.go_to_child(i)?;
        let depth = path.len();
        path.extend_from_slice(iter.child_edge(i));
        walk(&child, path, visit)?;
        path.truncate(depth);
    }
    Ok(())
}

/// Point lookup: descend from `iter` following `key` exactly.
///
/// Returns the node whose accumulated path equals `key`, or `None` if the
/// key diverges from every edge or ends strictly inside one. An empty key
/// returns (a clone of) `iter` itself.
pub fn find<'a, L: ValueList>(
    iter: &TrieIterator<'a, L>,
    key: &[TrieSymbol],
) -> Result<Option<TrieIterator<'a, L>>, TrieError> {
    let mut cur = iter.clone();
    let mut pos = 0;
    while pos < key.len() {
        // Siblings are stored with strictly ascending first symbols.
        let Ok(i) = cur
            .children
            .binary_search_by_key(&key[pos], |c| c.edge[0])
        else {
            return Ok(None);
        };
        let edge = &cur.children[i].edge;
        if edge.len() > key.len() - pos || edge[..] != key[pos..pos + edge.len()] {
            return Ok(None);
        }
        pos += edge.len();
        cur = cur.go_to_child(i)?;
    }
    Ok(Some(cur))
}

/// Prefix enumeration: visit every key under `iter` that starts with
/// `prefix`, in ascending order.
///
/// The prefix may end inside an edge; the subtree below that edge is then
/// enumerated in full. Keys passed to `visit` are complete keys, not
/// suffixes.
pub fn for_each_with_prefix<L, F>(
    iter: &TrieIterator<'_, L>,
    prefix: &[TrieSymbol],
    visit: &mut F,
) -> Result<(), TrieError>
where
    L: ValueList,
    F: FnMut(&[TrieSymbol], &L),
{
    let mut cur = iter.clone();
    let mut path: Vec<TrieSymbol> = Vec::new();
    let mut pos = 0;
    while pos < prefix.len() {
        let Ok(i) = cur
            .children
            .binary_search_by_key(&prefix[pos], |c| c.edge[0])
        else {
            return Ok(());
        };
        let edge = cur.children[i].edge.clone();
        let remaining = prefix.len() - pos;
        if edge.len() >= remaining {
            if edge[..remaining] != prefix[pos..] {
                return Ok(());
            }
            path.extend_from_slice(&edge);
            let child = cur.go_to_child(i)?;
            return walk(&child, &mut path, visit);
        }
        if edge[..] != prefix[pos..pos + edge.len()] {
            return Ok(());
        }
        path.extend_from_slice(&edge);
        pos += edge.len();
        cur = cur.go_to_child(i)?;
    }
    walk(&cur, &mut path, visit)
}

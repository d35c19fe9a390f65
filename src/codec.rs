//! Binary persistence of forests.
//!
//! Layout (little-endian, pre-order):
//!
//! ```text
//! i32 root_count
//! root_count × Node
//!
//! Node := i32 vertex_count
//!         vertex_count × i32 vertex   (strictly ascending)
//!         f64 weight
//!         i32 child_count
//!         child_count × Node
//! ```
//!
//! Counts are signed 32-bit, so a forest with more than `i32::MAX` roots, or a
//! node with more than `i32::MAX` vertices or children, cannot be encoded.
//!
//! Decoding either yields a complete forest or an error; a rejected stream
//! never produces a partial forest. Decoded topology is taken as stored; use
//! [`verify`](crate::doctrine::verify) to check it against the doctrine.

use crate::config::ForestConfig;
use crate::core::{Forest, Hyperedge, Node};
use crate::doctrine::Doctrine;
use crate::error::{CodecError, ForestError};
use crate::normalize::{is_strictly_ascending, VertexId};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Smallest possible encoded node: one vertex, a weight and a child count.
const MIN_NODE_BYTES: usize = 4 + 4 + 8 + 4;

fn put_count(out: &mut Vec<u8>, count: usize, field: &'static str) -> Result<(), CodecError> {
    let count = i32::try_from(count).map_err(|_| CodecError::CountOverflow { field, count })?;
    out.extend_from_slice(&count.to_le_bytes());
    Ok(())
}

fn encode_node(out: &mut Vec<u8>, node: &Node) -> Result<(), CodecError> {
    put_count(out, node.vertices().len(), "vertex count")?;
    for v in node.vertices() {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.extend_from_slice(&node.weight().to_le_bytes());
    put_count(out, node.children().len(), "child count")
}

/// Encodes a forest.
///
/// The encoding is canonical: equal topology, sibling order, vertex sets and
/// weight bit patterns give equal bytes. Fails with
/// [`CodecError::CountOverflow`] when a count does not fit the format.
pub fn encode<D: Doctrine>(forest: &Forest<D>) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(4 + forest.len() * (MIN_NODE_BYTES + 8));
    put_count(&mut out, forest.root_count(), "root count")?;
    for node in forest.dfs() {
        encode_node(&mut out, node)?;
    }
    Ok(out)
}

/// Cursor over an encoded forest that tracks the byte offset for errors.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::Truncated {
                field,
                offset: self.offset,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn i32(&mut self, field: &'static str) -> Result<i32, CodecError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4, field)?);
        Ok(i32::from_le_bytes(buf))
    }

    fn f64(&mut self, field: &'static str) -> Result<f64, CodecError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, field)?);
        Ok(f64::from_le_bytes(buf))
    }

    fn count(&mut self, field: &'static str) -> Result<usize, CodecError> {
        let offset = self.offset;
        let value = self.i32(field)?;
        usize::try_from(value).map_err(|_| CodecError::NegativeCount {
            field,
            value,
            offset,
        })
    }

    /// Capacity hint for `count` nodes, bounded by what the input can hold.
    fn node_capacity(&self, count: usize) -> usize {
        count.min(self.remaining() / MIN_NODE_BYTES)
    }

    /// Reads one node header: its hyperedge and its child count.
    fn node(&mut self) -> Result<(Hyperedge, usize), CodecError> {
        let start = self.offset;
        let len = self.count("vertex count")?;
        if len == 0 {
            return Err(CodecError::EmptyHyperedge { offset: start });
        }
        let raw = self.take(len.saturating_mul(4), "vertices")?;
        let vertices: Vec<VertexId> = raw
            .chunks_exact(4)
            .map(|c| VertexId::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        if !is_strictly_ascending(&vertices) {
            return Err(CodecError::UnsortedVertices { offset: start });
        }
        let weight = self.f64("weight")?;
        let children = self.count("child count")?;
        Ok((Hyperedge::from_canonical(vertices, weight), children))
    }
}

/// A node whose children are still being decoded.
struct Pending {
    edge: Hyperedge,
    remaining: usize,
    children: Vec<Node>,
}

fn decode_roots(reader: &mut Reader<'_>) -> Result<Vec<Node>, CodecError> {
    let root_count = reader.count("root count")?;
    let mut roots = Vec::with_capacity(reader.node_capacity(root_count));
    let mut stack: Vec<Pending> = Vec::new();

    for _ in 0..root_count {
        let (edge, remaining) = reader.node()?;
        stack.push(Pending {
            children: Vec::with_capacity(reader.node_capacity(remaining)),
            edge,
            remaining,
        });
        while let Some(top) = stack.last_mut() {
            if top.remaining > 0 {
                top.remaining -= 1;
                let (edge, remaining) = reader.node()?;
                stack.push(Pending {
                    children: Vec::with_capacity(reader.node_capacity(remaining)),
                    edge,
                    remaining,
                });
                continue;
            }
            let Some(done) = stack.pop() else { break };
            let node = Node::with_children(done.edge, done.children);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => roots.push(node),
            }
        }
    }
    Ok(roots)
}

/// Decodes a forest, attaching `doctrine` and `config` to it.
///
/// Rejects an invalid `config` with [`ForestError::InvalidConfig`]. Rejects
/// truncated input, negative counts, nodes without vertices, vertex lists that
/// are not strictly ascending, and bytes after the last root with
/// [`ForestError::Codec`].
pub fn decode<D: Doctrine>(
    bytes: &[u8],
    doctrine: D,
    config: ForestConfig,
) -> Result<Forest<D>, ForestError> {
    config.validate()?;
    let mut reader = Reader::new(bytes);
    let result = decode_roots(&mut reader).and_then(|roots| match reader.remaining() {
        0 => Ok(roots),
        remaining => Err(CodecError::TrailingBytes { remaining }),
    });
    match result {
        Ok(roots) => Ok(Forest::from_roots(doctrine, config, roots)),
        Err(err) => {
            warn!("rejecting encoded forest ({} bytes): {}", bytes.len(), err);
            Err(err.into())
        }
    }
}

/// Writes the encoding of `forest` to `writer`.
///
/// Nothing is written when the forest exceeds the format's count limits.
pub fn write_to<D: Doctrine, W: Write>(forest: &Forest<D>, mut writer: W) -> Result<(), ForestError> {
    let bytes = encode(forest)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    debug!("wrote {} roots ({} bytes)", forest.root_count(), bytes.len());
    Ok(())
}

/// Reads a complete encoded forest from `reader`.
pub fn read_from<D: Doctrine, R: Read>(
    mut reader: R,
    doctrine: D,
    config: ForestConfig,
) -> Result<Forest<D>, ForestError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let forest = decode(&bytes, doctrine, config)?;
    debug!("read {} roots ({} bytes)", forest.root_count(), bytes.len());
    Ok(forest)
}

/// Saves `forest` to the file at `path`, replacing any existing file.
pub fn save<D: Doctrine, P: AsRef<Path>>(forest: &Forest<D>, path: P) -> Result<(), ForestError> {
    let file = File::create(path.as_ref())?;
    write_to(forest, BufWriter::new(file))
}

/// Loads a forest from the file at `path`.
pub fn load<D: Doctrine, P: AsRef<Path>>(
    path: P,
    doctrine: D,
    config: ForestConfig,
) -> Result<Forest<D>, ForestError> {
    let file = File::open(path.as_ref())?;
    read_from(BufReader::new(file), doctrine, config)
}

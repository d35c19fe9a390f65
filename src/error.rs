//! Error types for forest construction, persistence and verification.

use crate::doctrine::DoctrineError;
use thiserror::Error;

/// Result type alias using [`ForestError`].
pub type Result<T> = std::result::Result<T, ForestError>;

/// Crate-level error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ForestError {
    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A forest could not be encoded, or a byte stream could not be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Underlying I/O failure while saving or loading.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The forest violates the invariants of its dominance policy.
    #[error("invariant violated: {0}")]
    Invariant(#[from] DoctrineError),
}

impl ForestError {
    /// Create a new `InvalidConfig` error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Reasons a forest cannot be encoded or a byte stream is rejected by the
/// decoder.
///
/// Every decoder variant carries the byte offset at which the problem was
/// detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The stream ended inside a field.
    #[error("stream truncated while reading {field} at offset {offset}")]
    Truncated { field: &'static str, offset: usize },

    /// A count field holds a negative value.
    #[error("negative {field} ({value}) at offset {offset}")]
    NegativeCount {
        field: &'static str,
        value: i32,
        offset: usize,
    },

    /// A node without vertices; such nodes are never produced by insertion.
    #[error("hyperedge without vertices at offset {offset}")]
    EmptyHyperedge { offset: usize },

    /// The vertex list of a node is not strictly ascending.
    #[error("vertex list at offset {offset} is not strictly ascending")]
    UnsortedVertices { offset: usize },

    /// Bytes remain after the last root.
    #[error("{remaining} trailing bytes after the last root")]
    TrailingBytes { remaining: usize },

    /// A count is too large for its signed 32-bit field.
    #[error("{field} {count} exceeds the format limit of {}", i32::MAX)]
    CountOverflow { field: &'static str, count: usize },
}

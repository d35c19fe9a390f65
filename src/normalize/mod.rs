//! Vertex-set canonicalization.
//!
//! Every hyperedge stored in a forest carries its vertices as a strictly
//! ascending, duplicate-free sequence. The helpers in this module produce that
//! canonical form and implement the linear two-pointer set predicates that the
//! dominance policies and queries are built on.

pub mod vertex_set;

pub use vertex_set::{
    is_strict_subset, is_strictly_ascending, is_subset, normalize_vertices, overlap_ratio,
    overlap_size, VertexId,
};

//! Sorted vertex sequences and two-pointer set operations.
//!
//! All predicates assume their inputs are in canonical form (see
//! [`normalize_vertices`]) and run in `O(|a| + |b|)`.
//!
//! # Determinism
//! - Canonical form is unique per set: two canonical sequences are equal iff
//!   they denote the same set.
//! - Ordering is the natural `i32` order.

/// Identifier of a vertex. Matches the 32-bit signed field of the wire format.
pub type VertexId = i32;

/// Canonicalizes a raw vertex list: ascending order, duplicates removed.
///
/// An empty input yields an empty result.
pub fn normalize_vertices(raw: &[VertexId]) -> Vec<VertexId> {
    let mut out = raw.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// Returns `true` if the sequence is strictly ascending (canonical).
pub fn is_strictly_ascending(verts: &[VertexId]) -> bool {
    verts.windows(2).all(|w| w[0] < w[1])
}

/// Returns `true` if every vertex of `a` also occurs in `b` (`a ⊆ b`).
pub fn is_subset(a: &[VertexId], b: &[VertexId]) -> bool {
    if a.len() > b.len() {
        return false;
    }
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            i += 1;
            j += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            return false;
        }
    }
    i == a.len()
}

/// Returns `true` if `a ⊊ b`.
#[inline]
pub fn is_strict_subset(a: &[VertexId], b: &[VertexId]) -> bool {
    a.len() < b.len() && is_subset(a, b)
}

/// Size of the intersection `|a ∩ b|`.
pub fn overlap_size(a: &[VertexId], b: &[VertexId]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    count
}

/// Overlap coefficient `|a ∩ b| / min(|a|, |b|)`, in `[0, 1]`.
///
/// Returns `0.0` when either set is empty.
pub fn overlap_ratio(a: &[VertexId], b: &[VertexId]) -> f64 {
    let min_size = a.len().min(b.len());
    if min_size == 0 {
        return 0.0;
    }
    overlap_size(a, b) as f64 / min_size as f64
}

//! Core data structures of the hyperedge inclusion forest.
//!
//! A [`Forest`] owns an ordered list of root [`Node`]s; each node owns its
//! children by value, so every node has exactly one owner and restructuring is
//! a move between child vectors, never a copy.
//!
//! # Invariants
//! - Every stored [`Hyperedge`] is non-empty and in canonical form.
//! - For every parent `P` and child `C`, the forest's doctrine reports
//!   `P` dominates `C` (checked by [`verify`](crate::doctrine::verify)).
//! - Children keep insertion order; it carries no meaning beyond stable iteration.

use crate::config::ForestConfig;
use crate::doctrine::{Doctrine, SubsetPriority, WeightPriority};
use crate::error::ForestError;
use crate::normalize::{is_strictly_ascending, normalize_vertices, overlap_ratio, VertexId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A weighted set of vertices.
///
/// Identity is the vertex set alone: two hyperedges with the same vertices
/// compare equal regardless of weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperedge {
    vertices: Vec<VertexId>,
    weight: f64,
}

impl Hyperedge {
    /// Creates a hyperedge from an arbitrary vertex list, normalizing it.
    pub fn new(vertices: &[VertexId], weight: f64) -> Self {
        Self {
            vertices: normalize_vertices(vertices),
            weight,
        }
    }

    /// Wraps an already canonical vertex list.
    pub(crate) fn from_canonical(vertices: Vec<VertexId>, weight: f64) -> Self {
        debug_assert!(is_strictly_ascending(&vertices));
        Self { vertices, weight }
    }

    /// Canonical (ascending, duplicate-free) vertices.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Weight carried by this hyperedge.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the hyperedge has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub(crate) fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

impl PartialEq for Hyperedge {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for Hyperedge {}

impl Hash for Hyperedge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertices.hash(state);
    }
}

impl fmt::Display for Hyperedge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}} w={}", self.weight)
    }
}

/// A hyperedge together with the subtree it dominates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    edge: Hyperedge,
    children: Vec<Node>,
}

impl Node {
    /// Creates a detached, childless node.
    pub(crate) fn new(edge: Hyperedge) -> Self {
        Self {
            edge,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_children(edge: Hyperedge, children: Vec<Node>) -> Self {
        Self { edge, children }
    }

    /// The hyperedge stored at this node.
    #[inline]
    pub fn edge(&self) -> &Hyperedge {
        &self.edge
    }

    /// Shorthand for `self.edge().vertices()`.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        self.edge.vertices()
    }

    /// Shorthand for `self.edge().weight()`.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.edge.weight()
    }

    /// Direct children in insertion order.
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns `true` if the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in the subtree rooted here, including this node.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Height of the subtree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    pub(crate) fn edge_mut(&mut self) -> &mut Hyperedge {
        &mut self.edge
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    pub(crate) fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub(crate) fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }
}

// Chains may be arbitrarily deep, so subtrees are torn down with an explicit
// stack instead of the recursive drop glue of `Vec<Node>`.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Overlap coefficient of two nodes' vertex sets: `|A ∩ B| / min(|A|, |B|)`.
pub fn compute_overlap(a: &Node, b: &Node) -> f64 {
    overlap_ratio(a.vertices(), b.vertices())
}

/// Summary statistics of a forest.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForestStats {
    pub total_nodes: usize,
    pub num_roots: usize,
    pub max_depth: usize,
    pub max_weight: f64,
    pub min_weight: f64,
    pub avg_weight: f64,
    pub max_children: usize,
}

/// The hyperedge inclusion forest.
///
/// The dominance policy `D` is fixed at creation time, together with the
/// [`ForestConfig`] it reads its tolerances from.
#[derive(Debug, Clone)]
pub struct Forest<D> {
    roots: Vec<Node>,
    doctrine: D,
    config: ForestConfig,
}

impl<D: Doctrine> Forest<D> {
    /// Creates an empty forest with the default configuration.
    pub fn new(doctrine: D) -> Self {
        Self {
            roots: Vec::new(),
            doctrine,
            config: ForestConfig::default(),
        }
    }

    /// Creates an empty forest with a caller-supplied configuration.
    pub fn with_config(doctrine: D, config: ForestConfig) -> Result<Self, ForestError> {
        config.validate()?;
        Ok(Self {
            roots: Vec::new(),
            doctrine,
            config,
        })
    }

    pub(crate) fn from_roots(doctrine: D, config: ForestConfig, roots: Vec<Node>) -> Self {
        Self {
            roots,
            doctrine,
            config,
        }
    }

    /// The dominance policy of this forest.
    #[inline]
    pub fn doctrine(&self) -> &D {
        &self.doctrine
    }

    /// The configuration this forest was created with.
    #[inline]
    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Root nodes in order.
    #[inline]
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Number of roots.
    #[inline]
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` if the forest holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    /// Height of the tallest tree (0 for an empty forest).
    pub fn max_depth(&self) -> usize {
        self.roots.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Largest weight of any node (0.0 for an empty forest).
    pub fn max_weight(&self) -> f64 {
        self.weight_range().map(|(_, max)| max).unwrap_or(0.0)
    }

    /// Smallest weight of any node (0.0 for an empty forest).
    pub fn min_weight(&self) -> f64 {
        self.weight_range().map(|(min, _)| min).unwrap_or(0.0)
    }

    fn weight_range(&self) -> Option<(f64, f64)> {
        self.dfs().fold(None, |acc, node| {
            let w = node.weight();
            Some(match acc {
                None => (w, w),
                Some((min, max)) => (min.min(w), max.max(w)),
            })
        })
    }

    /// Collects [`ForestStats`] in a single traversal.
    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats {
            num_roots: self.roots.len(),
            max_depth: self.max_depth(),
            ..ForestStats::default()
        };
        let mut sum = 0.0;
        for node in self.bfs() {
            let w = node.weight();
            if stats.total_nodes == 0 {
                stats.max_weight = w;
                stats.min_weight = w;
            } else {
                stats.max_weight = stats.max_weight.max(w);
                stats.min_weight = stats.min_weight.min(w);
            }
            stats.total_nodes += 1;
            sum += w;
            stats.max_children = stats.max_children.max(node.children().len());
        }
        if stats.total_nodes > 0 {
            stats.avg_weight = sum / stats.total_nodes as f64;
        }
        stats
    }

    /// Splits the forest into its policy and its mutable root list.
    pub(crate) fn parts_mut(&mut self) -> (&D, &ForestConfig, &mut Vec<Node>) {
        (&self.doctrine, &self.config, &mut self.roots)
    }

    pub(crate) fn take_roots(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.roots)
    }
}

impl Forest<SubsetPriority> {
    /// Creates an empty forest ordered by pure set inclusion.
    pub fn subset_priority() -> Self {
        Self::new(SubsetPriority)
    }
}

impl Forest<WeightPriority> {
    /// Creates an empty forest ordered by weight first, subsets second.
    pub fn weight_priority() -> Self {
        Self::new(WeightPriority)
    }
}

impl<D: Doctrine + Default> Default for Forest<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

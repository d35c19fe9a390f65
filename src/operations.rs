//! Insertion into a hyperedge inclusion forest.
//!
//! Insertion keeps the dominance invariant of the forest's doctrine after
//! every call:
//! 1. The candidate is offered to each root in order. A root the candidate
//!    dominates (and admits) is detached and becomes the candidate's child
//!    ("adopted").
//! 2. A root that dominates (and admits) the candidate takes it into its
//!    subtree: the candidate is offered to that root's children the same way,
//!    adopting dominated children, and is attached at the deepest dominating
//!    node when no child takes it.
//! 3. A candidate no root takes becomes a new root.
//!
//! Doctrines that do not nest children may cap the chain depth through
//! [`Doctrine::chain_depth_limit`]; past the cap the candidate is attached to
//! the dominating node without descending further.
//!
//! Restructuring only moves existing nodes between child vectors; nodes are
//! never copied or recreated.

use crate::config::ForestConfig;
use crate::core::{Forest, Hyperedge, Node};
use crate::doctrine::{Doctrine, Dominance};
use crate::error::ForestError;
use crate::normalize::VertexId;
use log::trace;

/// How an existing node relates to a candidate at one level.
enum Relation {
    /// The node dominates and admits the candidate.
    Hosts,
    /// The candidate dominates and admits the node.
    Adopts,
    /// Neither side may sit under the other.
    Unrelated,
}

/// Insertion engine bound to one forest's policy.
struct Inserter<'a, D> {
    doctrine: &'a D,
    config: &'a ForestConfig,
}

impl<D: Doctrine> Inserter<'_, D> {
    fn relation(&self, node: &Node, candidate: &Node) -> Relation {
        let (doctrine, config) = (self.doctrine, self.config);
        match doctrine.compare(node.edge(), candidate.edge(), config) {
            Dominance::Dominates if doctrine.admits(node.edge(), candidate.edge(), config) => {
                Relation::Hosts
            }
            Dominance::DominatedBy if doctrine.admits(candidate.edge(), node.edge(), config) => {
                Relation::Adopts
            }
            _ => Relation::Unrelated,
        }
    }

    /// Settles `candidate` into `level` (a root list or a child list).
    ///
    /// Walks down one level per iteration, so chain length never grows the
    /// call stack. At each level the candidate adopts every sibling it
    /// dominates until some sibling hosts it; the host's children become the
    /// next level. With no host the candidate joins the current level.
    fn place(&self, mut level: &mut Vec<Node>, mut candidate: Node) {
        let limit = self.doctrine.chain_depth_limit(self.config);
        let mut depth = 1;
        loop {
            match self.find_host(level, &mut candidate) {
                Some(idx) if limit.map_or(true, |limit| depth < limit) => {
                    level = level[idx].children_mut();
                    depth += 1;
                }
                Some(idx) => {
                    trace!("chain depth {} reached under {}", depth, level[idx].edge());
                    level[idx].add_child(candidate);
                    return;
                }
                None => {
                    trace!("{} settles at depth {}", candidate.edge(), depth);
                    level.push(candidate);
                    return;
                }
            }
        }
    }

    /// Index of the node in `level` that hosts `candidate`, trying the
    /// doctrine's cluster target first. Nodes the candidate adopts on the way
    /// are moved under it.
    fn find_host(&self, level: &mut Vec<Node>, candidate: &mut Node) -> Option<usize> {
        if let Some(idx) = self.doctrine.cluster_target(level, candidate.edge(), self.config) {
            if matches!(self.relation(&level[idx], candidate), Relation::Hosts) {
                return Some(idx);
            }
        }
        let mut i = 0;
        while i < level.len() {
            match self.relation(&level[i], candidate) {
                Relation::Hosts => return Some(i),
                Relation::Adopts => {
                    // The next sibling shifts into slot `i`.
                    let adopted = level.remove(i);
                    trace!("{} adopts {}", candidate.edge(), adopted.edge());
                    candidate.add_child(adopted);
                }
                Relation::Unrelated => i += 1,
            }
        }
        None
    }
}

/// Places a detached node (and any subtree it carries) into the forest.
pub(crate) fn insert_node<D: Doctrine>(forest: &mut Forest<D>, candidate: Node) {
    let (doctrine, config, roots) = forest.parts_mut();
    Inserter { doctrine, config }.place(roots, candidate);
}

/// Inserts a hyperedge, normalizing its vertex list first.
///
/// Returns `false` (and leaves the forest untouched) when the vertex list is
/// empty.
pub fn insert_hyperedge<D: Doctrine>(
    forest: &mut Forest<D>,
    vertices: &[VertexId],
    weight: f64,
) -> bool {
    insert_edge(forest, Hyperedge::new(vertices, weight))
}

/// Inserts an already constructed hyperedge.
///
/// Returns `false` when the hyperedge is empty.
pub fn insert_edge<D: Doctrine>(forest: &mut Forest<D>, edge: Hyperedge) -> bool {
    if edge.is_empty() {
        trace!("ignoring empty hyperedge (w={})", edge.weight());
        return false;
    }
    trace!("inserting {} under {}", edge, forest.doctrine().name());
    insert_node(forest, Node::new(edge));
    true
}

/// Inserts hyperedges in iteration order. Returns how many were non-empty.
pub fn insert_batch<D, I>(forest: &mut Forest<D>, edges: I) -> usize
where
    D: Doctrine,
    I: IntoIterator<Item = Hyperedge>,
{
    let mut inserted = 0;
    for edge in edges {
        if insert_edge(forest, edge) {
            inserted += 1;
        }
    }
    inserted
}

/// Builds a forest from a set of hyperedges, inserting heaviest first.
///
/// Heaviest-first order lets dominant hyperedges settle as roots before the
/// lighter ones descend into them, which keeps weight-priority trees shallow.
pub fn build_bulk<D: Doctrine>(
    doctrine: D,
    config: ForestConfig,
    mut edges: Vec<Hyperedge>,
) -> Result<Forest<D>, ForestError> {
    let mut forest = Forest::with_config(doctrine, config)?;
    edges.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
    insert_batch(&mut forest, edges);
    Ok(forest)
}

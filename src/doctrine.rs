//! Dominance doctrines: the order relation that shapes a forest.
//!
//! A doctrine decides, for two hyperedges, which one must sit above the other
//! in a tree, or that they are incomparable and belong in separate branches:
//! - [`SubsetPriority`]: dominance is strict set inclusion; weight is payload.
//! - [`WeightPriority`]: the clearly heavier hyperedge dominates; similar
//!   weights fall back to inclusion, then to vertex count.
//!
//! Insertion and queries consult the doctrine of the forest they operate on,
//! so the same engine maintains either invariant.

use crate::config::ForestConfig;
use crate::core::{Forest, Hyperedge, Node};
use crate::fingerprint::HashValue;
use crate::normalize::{is_strict_subset, is_subset, overlap_ratio, VertexId};
use thiserror::Error;

/// Outcome of comparing hyperedge `a` against hyperedge `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dominance {
    /// `a` must be an ancestor of `b`.
    Dominates,
    /// `b` must be an ancestor of `a`.
    DominatedBy,
    /// Neither may be an ancestor of the other.
    Incomparable,
}

impl Dominance {
    /// The same relation seen from the other side.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Dominance::Dominates => Dominance::DominatedBy,
            Dominance::DominatedBy => Dominance::Dominates,
            Dominance::Incomparable => Dominance::Incomparable,
        }
    }
}

/// First invariant violation found while verifying a forest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DoctrineError {
    /// A parent does not dominate one of its children.
    #[error("parent {parent:?} does not dominate child {child:?} under {doctrine}")]
    NotDominated {
        doctrine: &'static str,
        parent: Vec<VertexId>,
        child: Vec<VertexId>,
    },
    /// A child is heavier than its parent beyond the configured tolerance.
    #[error("child {child:?} (w={child_weight}) is heavier than parent {parent:?} (w={parent_weight})")]
    WeightIncrease {
        parent: Vec<VertexId>,
        parent_weight: f64,
        child: Vec<VertexId>,
        child_weight: f64,
    },
    /// Two siblings (or two roots) are comparable under a nesting doctrine.
    #[error("siblings {first:?} and {second:?} are comparable under {doctrine}")]
    ComparableSiblings {
        doctrine: &'static str,
        first: Vec<VertexId>,
        second: Vec<VertexId>,
    },
}

/// A dominance policy.
///
/// `compare` is the only required method; the provided hooks refine how the
/// insertion engine and the queries use it.
pub trait Doctrine {
    /// Short stable name, used in diagnostics and fingerprints.
    fn name(&self) -> &'static str;

    /// Compares `a` against `b`.
    ///
    /// Implementations must be antisymmetric: `compare(a, b)` is
    /// `compare(b, a).reverse()`.
    fn compare(&self, a: &Hyperedge, b: &Hyperedge, config: &ForestConfig) -> Dominance;

    /// Whether a node holding `parent`, which dominates `child`, may host
    /// `child` inside its subtree. Returning `false` makes the insertion
    /// engine treat the pair as incomparable at that level.
    fn admits(&self, _parent: &Hyperedge, _child: &Hyperedge, _config: &ForestConfig) -> bool {
        true
    }

    /// Index of the node among `nodes` that insertion should try first.
    fn cluster_target(
        &self,
        _nodes: &[Node],
        _candidate: &Hyperedge,
        _config: &ForestConfig,
    ) -> Option<usize> {
        None
    }

    /// Whether every child's vertex set is a subset of its parent's.
    ///
    /// When `true`, containment searches may skip the subtree of any node that
    /// does not contain the query, and [`verify`] also requires siblings to be
    /// pairwise incomparable.
    fn nests_children(&self) -> bool {
        false
    }

    /// Deepest level at which a node still passes a candidate on to its
    /// children; at this level the candidate is attached to the node itself.
    ///
    /// `None` lets chains grow without bound.
    fn chain_depth_limit(&self, config: &ForestConfig) -> Option<usize> {
        Some(config.max_chain_depth)
    }

    /// Validates a single parent/child edge.
    fn validate_edge(
        &self,
        parent: &Hyperedge,
        child: &Hyperedge,
        config: &ForestConfig,
    ) -> Result<(), DoctrineError> {
        if self.compare(parent, child, config) == Dominance::Dominates {
            Ok(())
        } else {
            Err(DoctrineError::NotDominated {
                doctrine: self.name(),
                parent: parent.vertices().to_vec(),
                child: child.vertices().to_vec(),
            })
        }
    }

    /// Fingerprint of the policy together with the tolerances it reads.
    fn policy_fingerprint(&self, config: &ForestConfig) -> HashValue {
        crate::fingerprint::policy_fingerprint(self.name(), config)
    }
}

/// Dominance by strict set inclusion.
///
/// `A` dominates `B` iff `B ⊊ A`. Weight plays no role in the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubsetPriority;

impl Doctrine for SubsetPriority {
    fn name(&self) -> &'static str {
        "subset-priority"
    }

    fn compare(&self, a: &Hyperedge, b: &Hyperedge, _config: &ForestConfig) -> Dominance {
        subset_order(a.vertices(), b.vertices())
    }

    fn nests_children(&self) -> bool {
        true
    }

    // Capping a subset chain would leave comparable siblings behind.
    fn chain_depth_limit(&self, _config: &ForestConfig) -> Option<usize> {
        None
    }
}

/// Dominance by weight first, inclusion second.
///
/// - Weights outside the configured tolerance: the heavier side dominates.
/// - Similar weights: strict inclusion decides; failing that, the hyperedge
///   with more vertices dominates; a complete tie is incomparable.
///
/// A dominating node only hosts a candidate that it contains, or that has a
/// similar weight and overlaps it by at least `min_overlap_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightPriority;

impl Doctrine for WeightPriority {
    fn name(&self) -> &'static str {
        "weight-priority"
    }

    fn compare(&self, a: &Hyperedge, b: &Hyperedge, config: &ForestConfig) -> Dominance {
        let (wa, wb) = (a.weight(), b.weight());
        if !config.weights_similar(wa, wb) {
            if wa > wb {
                return Dominance::Dominates;
            }
            if wb > wa {
                return Dominance::DominatedBy;
            }
        }
        match subset_order(a.vertices(), b.vertices()) {
            Dominance::Incomparable => match a.len().cmp(&b.len()) {
                std::cmp::Ordering::Greater => Dominance::Dominates,
                std::cmp::Ordering::Less => Dominance::DominatedBy,
                std::cmp::Ordering::Equal => Dominance::Incomparable,
            },
            nested => nested,
        }
    }

    fn admits(&self, parent: &Hyperedge, child: &Hyperedge, config: &ForestConfig) -> bool {
        is_subset(child.vertices(), parent.vertices())
            || (config.weights_similar(parent.weight(), child.weight())
                && overlap_ratio(parent.vertices(), child.vertices()) >= config.min_overlap_ratio)
    }

    fn cluster_target(
        &self,
        nodes: &[Node],
        candidate: &Hyperedge,
        config: &ForestConfig,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, node) in nodes.iter().enumerate() {
            if !config.weights_similar(node.weight(), candidate.weight()) {
                continue;
            }
            let score = overlap_ratio(node.vertices(), candidate.vertices());
            if score < config.min_overlap_ratio || best.is_some_and(|(_, s)| score <= s) {
                continue;
            }
            if self.compare(node.edge(), candidate, config) == Dominance::Dominates {
                best = Some((idx, score));
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn validate_edge(
        &self,
        parent: &Hyperedge,
        child: &Hyperedge,
        config: &ForestConfig,
    ) -> Result<(), DoctrineError> {
        if child.weight() > parent.weight() && !config.weights_similar(parent.weight(), child.weight())
        {
            return Err(DoctrineError::WeightIncrease {
                parent: parent.vertices().to_vec(),
                parent_weight: parent.weight(),
                child: child.vertices().to_vec(),
                child_weight: child.weight(),
            });
        }
        if self.compare(parent, child, config) != Dominance::Dominates {
            return Err(DoctrineError::NotDominated {
                doctrine: self.name(),
                parent: parent.vertices().to_vec(),
                child: child.vertices().to_vec(),
            });
        }
        Ok(())
    }
}

/// Strict inclusion order between two canonical vertex sets.
fn subset_order(a: &[VertexId], b: &[VertexId]) -> Dominance {
    if is_strict_subset(b, a) {
        Dominance::Dominates
    } else if is_strict_subset(a, b) {
        Dominance::DominatedBy
    } else {
        Dominance::Incomparable
    }
}

/// Walks every parent/child edge and reports the first violation of the
/// forest's doctrine, in depth-first order.
///
/// Under a nesting doctrine the roots and every child list must also be
/// pairwise incomparable.
pub fn verify<D: Doctrine>(forest: &Forest<D>) -> Result<(), DoctrineError> {
    let doctrine = forest.doctrine();
    let config = forest.config();
    let separate_siblings = doctrine.nests_children();
    if separate_siblings {
        check_siblings(doctrine, forest.roots(), config)?;
    }
    let mut stack: Vec<&Node> = forest.roots().iter().rev().collect();
    while let Some(node) = stack.pop() {
        for child in node.children() {
            doctrine.validate_edge(node.edge(), child.edge(), config)?;
        }
        if separate_siblings {
            check_siblings(doctrine, node.children(), config)?;
        }
        stack.extend(node.children().iter().rev());
    }
    Ok(())
}

fn check_siblings<D: Doctrine>(
    doctrine: &D,
    siblings: &[Node],
    config: &ForestConfig,
) -> Result<(), DoctrineError> {
    for (i, first) in siblings.iter().enumerate() {
        for second in &siblings[i + 1..] {
            if doctrine.compare(first.edge(), second.edge(), config) != Dominance::Incomparable {
                return Err(DoctrineError::ComparableSiblings {
                    doctrine: doctrine.name(),
                    first: first.vertices().to_vec(),
                    second: second.vertices().to_vec(),
                });
            }
        }
    }
    Ok(())
}

/// Returns `true` if the forest satisfies its doctrine.
pub fn is_well_formed<D: Doctrine>(forest: &Forest<D>) -> bool {
    verify(forest).is_ok()
}

//! Read-only queries over a forest.
//!
//! Query vertex lists are normalized before use, so callers may pass
//! unsorted lists with duplicates. All results borrow from the forest.
//!
//! # Pruning
//! - Containment searches (`find_all_supersets`, `find_containing_vertices`,
//!   the superset extrema) skip the subtree of a node that does not contain the
//!   query, but only under doctrines whose children nest inside their parents.
//!   Otherwise they scan every node.
//! - Threshold searches stop at the first node lighter than the threshold.
//!   Under weight priority this is exact; under subset priority heavy nodes
//!   below a light ancestor are not reported.

use crate::core::{Forest, Node};
use crate::doctrine::Doctrine;
use crate::normalize::{is_subset, normalize_vertices, overlap_ratio, VertexId};

/// Pre-order walk that reports nodes satisfying `matches` and, when
/// `descend_on_miss` is `false`, skips the children of nodes that fail it.
fn collect_where<'a, F>(roots: &'a [Node], descend_on_miss: bool, matches: F) -> Vec<&'a Node>
where
    F: Fn(&Node) -> bool,
{
    let mut out = Vec::new();
    let mut stack: Vec<&Node> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        let hit = matches(node);
        if hit {
            out.push(node);
        }
        if hit || descend_on_miss {
            stack.extend(node.children().iter().rev());
        }
    }
    out
}

fn supersets_of<'a, D: Doctrine>(forest: &'a Forest<D>, query: &[VertexId]) -> Vec<&'a Node> {
    let query = normalize_vertices(query);
    let prune = forest.doctrine().nests_children();
    collect_where(forest.roots(), !prune, |node| is_subset(&query, node.vertices()))
}

/// Every node whose vertex set contains `query`.
pub fn find_all_supersets<'a, D: Doctrine>(forest: &'a Forest<D>, query: &[VertexId]) -> Vec<&'a Node> {
    supersets_of(forest, query)
}

/// Every node whose vertex set is contained in `query`. Always a full scan.
pub fn find_all_subsets<'a, D: Doctrine>(forest: &'a Forest<D>, query: &[VertexId]) -> Vec<&'a Node> {
    let query = normalize_vertices(query);
    collect_where(forest.roots(), true, |node| is_subset(node.vertices(), &query))
}

/// Every node that contains all of `vertices`.
pub fn find_containing_vertices<'a, D: Doctrine>(
    forest: &'a Forest<D>,
    vertices: &[VertexId],
) -> Vec<&'a Node> {
    supersets_of(forest, vertices)
}

/// The superset of `query` with the fewest vertices; the first in pre-order
/// wins ties.
pub fn find_minimal_superset<'a, D: Doctrine>(
    forest: &'a Forest<D>,
    query: &[VertexId],
) -> Option<&'a Node> {
    supersets_of(forest, query)
        .into_iter()
        .reduce(|best, node| if node.edge().len() < best.edge().len() { node } else { best })
}

/// The heaviest superset of `query`; the first in pre-order wins ties.
pub fn find_heaviest_superset<'a, D: Doctrine>(
    forest: &'a Forest<D>,
    query: &[VertexId],
) -> Option<&'a Node> {
    supersets_of(forest, query)
        .into_iter()
        .reduce(|best, node| if node.weight() > best.weight() { node } else { best })
}

/// The first `k` nodes in level order.
///
/// This equals the `k` heaviest nodes only when weights never increase from
/// parent to child and roots are ordered heaviest first; see
/// [`find_top_k_exact`] for the sorted variant.
pub fn find_top_k<D: Doctrine>(forest: &Forest<D>, k: usize) -> Vec<&Node> {
    forest.bfs().take(k).collect()
}

/// The `k` heaviest nodes, heaviest first; equal weights keep pre-order.
pub fn find_top_k_exact<D: Doctrine>(forest: &Forest<D>, k: usize) -> Vec<&Node> {
    if k == 0 {
        return Vec::new();
    }
    forest.by_weight().take(k).collect()
}

/// Nodes with weight `>= threshold` reachable without passing a lighter node.
pub fn collect_by_weight_threshold<D: Doctrine>(forest: &Forest<D>, threshold: f64) -> Vec<&Node> {
    collect_where(forest.roots(), false, |node| node.weight() >= threshold)
}

/// Number of nodes [`collect_by_weight_threshold`] would return.
pub fn count_by_weight_threshold<D: Doctrine>(forest: &Forest<D>, threshold: f64) -> usize {
    let mut count = 0;
    let mut stack: Vec<&Node> = forest.roots().iter().collect();
    while let Some(node) = stack.pop() {
        if node.weight() >= threshold {
            count += 1;
            stack.extend(node.children());
        }
    }
    count
}

/// Clusters visible at resolution `threshold`: every node of weight
/// `>= threshold` reached by a threshold-pruned walk, in pre-order.
pub fn get_clusters_by_weight<D: Doctrine>(forest: &Forest<D>, threshold: f64) -> Vec<&Node> {
    collect_by_weight_threshold(forest, threshold)
}

/// Nodes whose weight lies in `[min, max]`.
///
/// Subtrees under a node lighter than `min` are skipped; nodes heavier than
/// `max` are not reported but their children are still examined.
pub fn find_by_weight_range<D: Doctrine>(forest: &Forest<D>, min: f64, max: f64) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut stack: Vec<&Node> = forest.roots().iter().rev().collect();
    while let Some(node) = stack.pop() {
        let w = node.weight();
        if w < min {
            continue;
        }
        if w <= max {
            out.push(node);
        }
        stack.extend(node.children().iter().rev());
    }
    out
}

/// The `k` nodes with the highest overlap ratio against `query`, best first.
///
/// Overlap is not monotone along ancestry, so every node is scored. Ties keep
/// pre-order; zero-overlap nodes fill the result when fewer than `k` overlap.
pub fn find_k_most_similar<'a, D: Doctrine>(
    forest: &'a Forest<D>,
    query: &[VertexId],
    k: usize,
) -> Vec<&'a Node> {
    if k == 0 {
        return Vec::new();
    }
    let query = normalize_vertices(query);
    let mut scored: Vec<(f64, &Node)> = forest
        .dfs()
        .map(|node| (overlap_ratio(&query, node.vertices()), node))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(k).map(|(_, node)| node).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctrine::{SubsetPriority, WeightPriority};
    use crate::operations::insert_hyperedge;

    fn sets(nodes: &[&Node]) -> Vec<Vec<VertexId>> {
        nodes.iter().map(|n| n.vertices().to_vec()).collect()
    }

    /// `{1,2,3,4}` over `{1,2,3}` over `{1,2}`, plus a root `{2,9}`.
    fn nested() -> Forest<SubsetPriority> {
        let mut forest = Forest::new(SubsetPriority);
        insert_hyperedge(&mut forest, &[1, 2, 3, 4], 4.0);
        insert_hyperedge(&mut forest, &[1, 2], 2.0);
        insert_hyperedge(&mut forest, &[1, 2, 3], 3.0);
        insert_hyperedge(&mut forest, &[2, 9], 8.0);
        forest
    }

    #[test]
    fn supersets_and_subsets() {
        let forest = nested();
        assert_eq!(
            sets(&find_all_supersets(&forest, &[2, 1])),
            vec![vec![1, 2, 3, 4], vec![1, 2, 3], vec![1, 2]]
        );
        assert_eq!(sets(&find_all_supersets(&forest, &[2])).len(), 4);
        assert!(find_all_supersets(&forest, &[5]).is_empty());
        assert_eq!(
            sets(&find_all_subsets(&forest, &[1, 2, 3, 9])),
            vec![vec![1, 2, 3], vec![1, 2], vec![2, 9]]
        );
        assert_eq!(
            sets(&find_containing_vertices(&forest, &[3, 3])),
            vec![vec![1, 2, 3, 4], vec![1, 2, 3]]
        );
    }

    #[test]
    fn superset_extrema() {
        let forest = nested();
        assert_eq!(find_minimal_superset(&forest, &[2]).unwrap().vertices(), &[1, 2]);
        assert_eq!(find_heaviest_superset(&forest, &[2]).unwrap().vertices(), &[2, 9]);
        assert_eq!(find_heaviest_superset(&forest, &[1]).unwrap().vertices(), &[1, 2, 3, 4]);
        assert!(find_minimal_superset(&forest, &[42]).is_none());
    }

    #[test]
    fn top_k_level_order_and_exact() {
        let forest = nested();
        assert!(find_top_k(&forest, 0).is_empty());
        assert_eq!(
            sets(&find_top_k(&forest, 3)),
            vec![vec![1, 2, 3, 4], vec![2, 9], vec![1, 2, 3]]
        );
        assert_eq!(find_top_k(&forest, 99).len(), 4);
        assert_eq!(
            sets(&find_top_k_exact(&forest, 2)),
            vec![vec![2, 9], vec![1, 2, 3, 4]]
        );
        assert!(find_top_k(&Forest::new(SubsetPriority), 5).is_empty());
    }

    #[test]
    fn threshold_prunes_light_subtrees() {
        let forest = nested();
        assert_eq!(count_by_weight_threshold(&forest, 3.0), 3);
        assert_eq!(count_by_weight_threshold(&forest, 100.0), 0);
        assert_eq!(
            sets(&collect_by_weight_threshold(&forest, 3.5)),
            vec![vec![1, 2, 3, 4], vec![2, 9]]
        );
        assert_eq!(get_clusters_by_weight(&forest, 0.0).len(), forest.len());
    }

    #[test]
    fn weight_range_is_inclusive() {
        let forest = nested();
        assert_eq!(
            sets(&find_by_weight_range(&forest, 2.0, 3.0)),
            vec![vec![1, 2, 3], vec![1, 2]]
        );
        assert!(find_by_weight_range(&forest, 5.0, 1.0).is_empty());
    }

    #[test]
    fn k_most_similar_scans_everything() {
        let forest = nested();
        let hits = find_k_most_similar(&forest, &[9], 2);
        assert_eq!(hits[0].vertices(), &[2, 9]);
        assert_eq!(hits.len(), 2);
        assert!(find_k_most_similar(&forest, &[1], 0).is_empty());
        assert_eq!(find_k_most_similar(&forest, &[1], 10).len(), 4);
    }

    #[test]
    fn weight_priority_scans_without_nesting() {
        let mut forest = Forest::new(WeightPriority);
        insert_hyperedge(&mut forest, &[1, 2, 3, 4], 10.0);
        insert_hyperedge(&mut forest, &[3, 4, 9], 10.5);
        // `{3,4,9}` hangs below a node that does not contain vertex 9.
        assert_eq!(sets(&find_all_supersets(&forest, &[9])), vec![vec![3, 4, 9]]);
    }
}

//! Whole-forest maintenance passes.
//!
//! Each pass either rebuilds the forest through the insertion engine or cuts
//! subtrees out of it, so the dominance invariant holds afterwards.

use crate::core::{Forest, Node};
use crate::doctrine::Doctrine;
use crate::normalize::VertexId;
use crate::operations::insert_node;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Detaches every node of the forest, returning them childless in pre-order.
fn flatten<D: Doctrine>(forest: &mut Forest<D>) -> Vec<Node> {
    let mut out = Vec::with_capacity(forest.len());
    let mut stack: Vec<Node> = forest.take_roots();
    stack.reverse();
    while let Some(mut node) = stack.pop() {
        let mut children = node.take_children();
        children.reverse();
        stack.extend(children);
        out.push(node);
    }
    out
}

/// Reinserts detached nodes heaviest first; equal weights keep their order.
fn rebuild<D: Doctrine>(forest: &mut Forest<D>, mut nodes: Vec<Node>) {
    nodes.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
    for node in nodes {
        insert_node(forest, node);
    }
}

/// Rebuilds the forest by reinserting every node heaviest first.
///
/// The node set is unchanged; the shape usually gets shallower under weight
/// priority.
pub fn rebalance<D: Doctrine>(forest: &mut Forest<D>) {
    let before = (forest.root_count(), forest.max_depth());
    let nodes = flatten(forest);
    let total = nodes.len();
    rebuild(forest, nodes);
    debug!(
        "rebalanced {} nodes: roots {} -> {}, depth {} -> {}",
        total,
        before.0,
        forest.root_count(),
        before.1,
        forest.max_depth()
    );
}

/// Collapses nodes with identical vertex sets into one node each.
///
/// The surviving node is the first occurrence in pre-order; its weight becomes
/// the maximum (`keep_max`) or the mean of the group. Returns the number of
/// nodes removed. When anything was merged the forest is rebuilt, since the
/// removed nodes may have had children.
pub fn merge_duplicates<D: Doctrine>(forest: &mut Forest<D>, keep_max: bool) -> usize {
    let duplicates = {
        let mut seen: HashSet<&[VertexId]> = HashSet::new();
        forest.dfs().filter(|node| !seen.insert(node.vertices())).count()
    };
    if duplicates == 0 {
        return 0;
    }

    // Per kept node: (index into `kept`, weight accumulator, group size).
    let mut groups: HashMap<Vec<VertexId>, (usize, f64, usize)> = HashMap::new();
    let mut kept: Vec<Node> = Vec::new();
    for node in flatten(forest) {
        match groups.get_mut(node.vertices()) {
            Some((_, acc, n)) => {
                *acc = if keep_max { acc.max(node.weight()) } else { *acc + node.weight() };
                *n += 1;
            }
            None => {
                groups.insert(node.vertices().to_vec(), (kept.len(), node.weight(), 1));
                kept.push(node);
            }
        }
    }
    for (idx, acc, n) in groups.into_values() {
        let weight = if keep_max { acc } else { acc / n as f64 };
        kept[idx].edge_mut().set_weight(weight);
    }

    debug!(
        "merged {} duplicate nodes ({} distinct vertex sets, keep_max={})",
        duplicates,
        kept.len(),
        keep_max
    );
    rebuild(forest, kept);
    duplicates
}

/// Removes every node lighter than `threshold` together with its subtree.
///
/// Returns the total number of nodes removed, subtree members included.
pub fn prune_by_weight<D: Doctrine>(forest: &mut Forest<D>, threshold: f64) -> usize {
    let (_, _, roots) = forest.parts_mut();
    let mut removed = 0;
    let mut levels: Vec<&mut Vec<Node>> = vec![roots];
    while let Some(nodes) = levels.pop() {
        nodes.retain(|node| {
            let keep = node.weight() >= threshold;
            if !keep {
                removed += node.subtree_len();
            }
            keep
        });
        levels.extend(nodes.iter_mut().map(Node::children_mut));
    }
    debug!("pruned {} nodes below weight {}", removed, threshold);
    removed
}

/// Merges duplicates keeping the maximum weight, then rebalances.
pub fn optimize<D: Doctrine>(forest: &mut Forest<D>) {
    merge_duplicates(forest, true);
    rebalance(forest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForestConfig;
    use crate::core::Hyperedge;
    use crate::doctrine::{verify, SubsetPriority, WeightPriority};
    use crate::operations::{insert_batch, insert_hyperedge};

    #[test]
    fn rebalance_keeps_node_set() {
        let mut forest = Forest::new(WeightPriority);
        for i in 0..20 {
            insert_hyperedge(&mut forest, &[i, i + 1], f64::from(i));
        }
        let mut before: Vec<_> = forest.dfs().map(|n| n.vertices().to_vec()).collect();
        rebalance(&mut forest);
        let mut after: Vec<_> = forest.dfs().map(|n| n.vertices().to_vec()).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(verify(&forest).is_ok());
    }

    #[test]
    fn rebalance_empty_forest() {
        let mut forest = Forest::new(SubsetPriority);
        rebalance(&mut forest);
        assert!(forest.is_empty());
    }

    #[test]
    fn merge_keeps_max_or_mean() {
        let edges = || {
            vec![
                Hyperedge::new(&[1, 2], 2.0),
                Hyperedge::new(&[3], 1.0),
                Hyperedge::new(&[2, 1], 6.0),
            ]
        };

        let mut forest = Forest::new(SubsetPriority);
        insert_batch(&mut forest, edges());
        assert_eq!(forest.len(), 3);
        assert_eq!(merge_duplicates(&mut forest, true), 1);
        assert_eq!(forest.len(), 2);
        let merged = forest.dfs().find(|n| n.vertices() == [1, 2]).unwrap();
        assert_eq!(merged.weight(), 6.0);

        let mut forest = Forest::new(SubsetPriority);
        insert_batch(&mut forest, edges());
        assert_eq!(merge_duplicates(&mut forest, false), 1);
        let merged = forest.dfs().find(|n| n.vertices() == [1, 2]).unwrap();
        assert_eq!(merged.weight(), 4.0);
    }

    #[test]
    fn merge_without_duplicates_is_noop() {
        let mut forest = Forest::new(SubsetPriority);
        insert_hyperedge(&mut forest, &[1, 2, 3], 1.0);
        insert_hyperedge(&mut forest, &[1], 1.0);
        assert_eq!(merge_duplicates(&mut forest, true), 0);
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn merge_reattaches_children_of_removed_nodes() {
        let mut forest = Forest::new(SubsetPriority);
        insert_hyperedge(&mut forest, &[1, 2, 3], 1.0);
        insert_hyperedge(&mut forest, &[1, 2, 3], 5.0);
        insert_hyperedge(&mut forest, &[1], 1.0);
        assert_eq!(merge_duplicates(&mut forest, true), 1);
        assert_eq!(forest.root_count(), 1);
        assert_eq!(forest.roots()[0].weight(), 5.0);
        assert_eq!(forest.roots()[0].children()[0].vertices(), &[1]);
        assert!(verify(&forest).is_ok());
    }

    #[test]
    fn prune_counts_whole_subtrees() {
        let mut forest = Forest::new(SubsetPriority);
        insert_hyperedge(&mut forest, &[1, 2, 3], 10.0);
        insert_hyperedge(&mut forest, &[1, 2], 1.0);
        insert_hyperedge(&mut forest, &[1], 50.0);
        insert_hyperedge(&mut forest, &[3], 20.0);
        insert_hyperedge(&mut forest, &[9], 0.5);
        assert_eq!(forest.len(), 5);
        assert_eq!(prune_by_weight(&mut forest, 5.0), 3);
        assert_eq!(forest.len(), 2);
        assert!(forest.dfs().all(|n| n.weight() >= 5.0));
        assert_eq!(prune_by_weight(&mut forest, 0.0), 0);
    }

    #[test]
    fn optimize_merges_then_rebalances() {
        let config = ForestConfig::default();
        let mut forest = Forest::with_config(WeightPriority, config).unwrap();
        insert_hyperedge(&mut forest, &[1, 2], 1.0);
        insert_hyperedge(&mut forest, &[4, 5], 30.0);
        insert_hyperedge(&mut forest, &[1, 2], 3.0);
        optimize(&mut forest);
        assert_eq!(forest.len(), 2);
        assert!(verify(&forest).is_ok());
        assert_eq!(forest.by_weight().next().unwrap().vertices(), &[4, 5]);
    }
}

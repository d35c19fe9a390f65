//! Iteration over the nodes of a forest.
//!
//! Three orders are provided, both as borrowing iterators and as visitor
//! functions that stop as soon as the visitor returns [`ControlFlow::Break`]:
//! - breadth-first (level order, roots first, siblings in insertion order),
//! - depth-first pre-order,
//! - by weight, heaviest first (a stable sort of the pre-order sequence).

use crate::core::{Forest, Node};
use crate::doctrine::Doctrine;
use std::collections::VecDeque;
use std::ops::ControlFlow;

/// Level-order iterator.
#[derive(Debug, Clone)]
pub struct Bfs<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> Bfs<'a> {
    pub(crate) fn new(roots: &'a [Node]) -> Self {
        Self {
            queue: roots.iter().collect(),
        }
    }
}

impl<'a> Iterator for Bfs<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children());
        Some(node)
    }
}

/// Depth-first pre-order iterator.
#[derive(Debug, Clone)]
pub struct Dfs<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Dfs<'a> {
    pub(crate) fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Dfs<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

impl<D: Doctrine> Forest<D> {
    /// Nodes in level order.
    pub fn bfs(&self) -> Bfs<'_> {
        Bfs::new(self.roots())
    }

    /// Nodes in depth-first pre-order.
    pub fn dfs(&self) -> Dfs<'_> {
        Dfs::new(self.roots())
    }

    /// Every node, heaviest first. Equal weights keep pre-order.
    pub fn by_weight(&self) -> std::vec::IntoIter<&Node> {
        let mut nodes: Vec<&Node> = self.dfs().collect();
        nodes.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
        nodes.into_iter()
    }
}

fn visit_all<'a, I, F>(nodes: I, mut visit: F) -> ControlFlow<()>
where
    I: Iterator<Item = &'a Node>,
    F: FnMut(&Node) -> ControlFlow<()>,
{
    for node in nodes {
        visit(node)?;
    }
    ControlFlow::Continue(())
}

/// Visits nodes in level order until `visit` breaks.
pub fn traverse_bfs<D, F>(forest: &Forest<D>, visit: F) -> ControlFlow<()>
where
    D: Doctrine,
    F: FnMut(&Node) -> ControlFlow<()>,
{
    visit_all(forest.bfs(), visit)
}

/// Visits nodes in pre-order until `visit` breaks.
pub fn traverse_dfs<D, F>(forest: &Forest<D>, visit: F) -> ControlFlow<()>
where
    D: Doctrine,
    F: FnMut(&Node) -> ControlFlow<()>,
{
    visit_all(forest.dfs(), visit)
}

/// Visits nodes heaviest first until `visit` breaks.
pub fn traverse_by_weight<D, F>(forest: &Forest<D>, visit: F) -> ControlFlow<()>
where
    D: Doctrine,
    F: FnMut(&Node) -> ControlFlow<()>,
{
    visit_all(forest.by_weight(), visit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctrine::SubsetPriority;
    use crate::operations::insert_hyperedge;

    /// `{1,2,3}` over `{1,2}` over `{1}`, plus a separate root `{7}`.
    fn sample() -> Forest<SubsetPriority> {
        let mut forest = Forest::new(SubsetPriority);
        insert_hyperedge(&mut forest, &[1, 2, 3], 2.0);
        insert_hyperedge(&mut forest, &[7], 9.0);
        insert_hyperedge(&mut forest, &[1, 2], 5.0);
        insert_hyperedge(&mut forest, &[3], 1.0);
        insert_hyperedge(&mut forest, &[1], 5.0);
        forest
    }

    fn sets<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<Vec<i32>> {
        nodes.map(|n| n.vertices().to_vec()).collect()
    }

    #[test]
    fn bfs_is_level_order() {
        let forest = sample();
        assert_eq!(
            sets(forest.bfs()),
            vec![vec![1, 2, 3], vec![7], vec![1, 2], vec![3], vec![1]]
        );
    }

    #[test]
    fn dfs_is_pre_order() {
        let forest = sample();
        assert_eq!(
            sets(forest.dfs()),
            vec![vec![1, 2, 3], vec![1, 2], vec![1], vec![3], vec![7]]
        );
    }

    #[test]
    fn by_weight_is_stable_descending() {
        let forest = sample();
        assert_eq!(
            sets(forest.by_weight()),
            vec![vec![7], vec![1, 2], vec![1], vec![1, 2, 3], vec![3]]
        );
    }

    #[test]
    fn visitor_can_stop_early() {
        let forest = sample();
        let mut seen = 0;
        let flow = traverse_dfs(&forest, |_| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, 2);

        let mut all = 0;
        let flow = traverse_bfs(&forest, |_| {
            all += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(all, forest.len());
    }

    #[test]
    fn empty_forest_visits_nothing() {
        let forest = Forest::new(SubsetPriority);
        let mut calls = 0;
        let _ = traverse_by_weight(&forest, |_| {
            calls += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(calls, 0);
    }
}

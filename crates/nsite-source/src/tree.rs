//! In-memory content tree shared by the bundled sources.
//!
//! Nodes are stored in a flat `Vec` with children tracked by indices. This
//! provides:
//! - O(1) route lookups via `path_index` `HashMap`
//! - O(N) pre-order traversal without recursion over borrowed nodes

use std::collections::HashMap;
use std::sync::Arc;

use crate::node::{ContentNode, SnapshotNode};

/// Content tree with route lookups.
#[derive(Debug, Default)]
pub(crate) struct ContentTree {
    nodes: Vec<Arc<ContentNode>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
}

impl ContentTree {
    /// Create an empty tree.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build a tree from nested snapshot nodes.
    #[must_use]
    pub(crate) fn from_snapshot(roots: Vec<SnapshotNode>) -> Self {
        fn add(tree: &mut ContentTree, snapshot: SnapshotNode, parent: Option<usize>) {
            let idx = tree.insert(snapshot.node, parent);
            for child in snapshot.children {
                add(tree, child, Some(idx));
            }
        }

        let mut tree = Self::new();
        for root in roots {
            add(&mut tree, root, None);
        }
        tree
    }

    /// Insert a node under `parent` (or as a root) and return its index.
    ///
    /// When two nodes share a route, lookups resolve to the first one.
    pub(crate) fn insert(&mut self, node: ContentNode, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        if self.path_index.contains_key(&node.path) {
            tracing::warn!(path = %node.path, id = %node.id, "Duplicate route in content tree");
        } else {
            self.path_index.insert(node.path.clone(), idx);
        }
        self.nodes.push(Arc::new(node));
        self.children.push(Vec::new());
        match parent {
            Some(p) => self.children[p].push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    /// Index of the node at `path`.
    #[must_use]
    pub(crate) fn index_of(&self, path: &str) -> Option<usize> {
        self.path_index.get(path).copied()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in pre-order (parents before their children, siblings in order).
    #[must_use]
    pub(crate) fn preorder(&self) -> Vec<Arc<ContentNode>> {
        let mut ordered = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            ordered.push(Arc::clone(&self.nodes[idx]));
            stack.extend(self.children[idx].iter().rev());
        }
        ordered
    }

    /// Direct children of the node at `path`, in insertion order.
    #[must_use]
    pub(crate) fn children_of(&self, path: &str) -> Vec<Arc<ContentNode>> {
        self.index_of(path)
            .map(|idx| {
                self.children[idx]
                    .iter()
                    .map(|&c| Arc::clone(&self.nodes[c]))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rebuild the nested representation for export.
    #[must_use]
    pub(crate) fn to_snapshot(&self) -> Vec<SnapshotNode> {
        fn build(tree: &ContentTree, idx: usize) -> SnapshotNode {
            SnapshotNode {
                node: ContentNode::clone(&tree.nodes[idx]),
                children: tree.children[idx].iter().map(|&c| build(tree, c)).collect(),
            }
        }

        self.roots.iter().map(|&r| build(self, r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_tree() -> ContentTree {
        ContentTree::from_snapshot(vec![SnapshotNode {
            node: ContentNode::new("root", "about", "/about"),
            children: vec![
                SnapshotNode {
                    node: ContentNode::new("p", "portfolio", "/portfolio"),
                    children: vec![
                        SnapshotNode::leaf(ContentNode::new("p1", "one", "/portfolio/one")),
                        SnapshotNode::leaf(ContentNode::new("p2", "two", "/portfolio/two")),
                    ],
                },
                SnapshotNode::leaf(ContentNode::new("c", "contact", "/contact")),
            ],
        }])
    }

    fn paths(nodes: &[Arc<ContentNode>]) -> Vec<&str> {
        nodes.iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = ContentTree::new();

        assert_eq!(tree.len(), 0);
        assert!(tree.preorder().is_empty());
        assert!(tree.children_of("/").is_empty());
    }

    #[test]
    fn test_preorder_visits_parents_first() {
        let tree = sample_tree();

        assert_eq!(
            paths(&tree.preorder()),
            vec![
                "/about",
                "/portfolio",
                "/portfolio/one",
                "/portfolio/two",
                "/contact"
            ]
        );
    }

    #[test]
    fn test_children_of_returns_direct_children_in_order() {
        let tree = sample_tree();

        assert_eq!(
            paths(&tree.children_of("/portfolio")),
            vec!["/portfolio/one", "/portfolio/two"]
        );
        assert_eq!(
            paths(&tree.children_of("/about")),
            vec!["/portfolio", "/contact"]
        );
    }

    #[test]
    fn test_children_of_leaf_and_unknown() {
        let tree = sample_tree();

        assert!(tree.children_of("/contact").is_empty());
        assert!(tree.children_of("/missing").is_empty());
    }

    #[test]
    fn test_duplicate_route_resolves_to_first() {
        let mut tree = ContentTree::new();
        let first = tree.insert(ContentNode::new("a", "dup", "/dup"), None);
        tree.insert(ContentNode::new("b", "dup", "/dup"), None);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.index_of("/dup"), Some(first));
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_structure() {
        let tree = sample_tree();

        let rebuilt = ContentTree::from_snapshot(tree.to_snapshot());

        assert_eq!(paths(&rebuilt.preorder()), paths(&tree.preorder()));
    }
}

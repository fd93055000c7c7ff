//! Degree rule: how many children a node may hold and how insertion enforces it.
//!
//! A non-root node spends one degree slot on the edge to its parent, so it
//! may hold `max_degree - 1` children; the root may hold `max_degree`.
//!
//! Whether a node counts as the root is decided by structural equality with
//! the tree's root (equal keys, identical child handles), not by a flag.
//! Insertion re-wraps every existing child of the parent into a fresh node, so
//! handles to those children taken before the insertion go stale: they keep
//! their key and share the same grandchildren, but are no longer identical to
//! the node now living in the tree. Once either copy gains a child the two
//! stop being structurally equal as well.

use std::ops;

use tracing::{debug, instrument};

use crate::arena::{Node, NodeId, Tree};
use crate::errors::{TreeError, TreeResult};

impl ops::Index<NodeId> for Tree {
    type Output = Node;

    /// # Panics
    /// Panics if `idx` was not created by this tree.
    fn index(&self, idx: NodeId) -> &Node {
        match self.get_node(idx) {
            Some(node) => node,
            None => panic!("node handle {:?} does not belong to this tree", idx),
        }
    }
}

impl Tree {
    /// Identity-based structural equality.
    ///
    /// Two nodes are equal if they are the same node, or if they carry the
    /// same key and hold the very same child handles in the same order.
    /// Separately built but content-identical subtrees are not equal.
    pub fn structurally_eq(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get_node(a), self.get_node(b)) {
            (Some(x), Some(y)) => x.key == y.key && x.children() == y.children(),
            _ => false,
        }
    }

    /// True if `idx` is treated as the root by the capacity rule.
    pub fn is_root(&self, idx: NodeId) -> bool {
        self.structurally_eq(idx, self.root())
    }

    /// Maximum number of children `idx` may hold.
    pub fn child_limit(&self, idx: NodeId) -> usize {
        if self.is_root(idx) {
            self.max_degree()
        } else {
            self.max_degree().saturating_sub(1)
        }
    }

    /// A node is eligible if it is a leaf or can still take another child.
    pub fn is_eligible(&self, idx: NodeId) -> bool {
        self.get_node(idx)
            .map(|node| node.is_leaf() || node.children().len() + 2 <= self.max_degree())
            .unwrap_or(false)
    }

    /// Appends `child` as the last child of `parent` and returns `parent`.
    ///
    /// Fails with [`TreeError::DegreeLimitExceeded`] when `parent` is already
    /// at its limit; the tree is left untouched in that case.
    ///
    /// # Panics
    /// Panics if `parent` or `child` was not created by this tree, or if
    /// `parent` is reachable from `child` (including `child == parent`): the
    /// new edge would close a cycle.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, parent: NodeId, child: NodeId) -> TreeResult<NodeId> {
        if self.iter_from(child).any(|(idx, _)| idx == parent) {
            panic!(
                "inserting node {} below node {} would create a cycle",
                self[child].key, self[parent].key
            );
        }

        let child_key = self[child].key;
        let parent_key = self[parent].key;
        let len = self[parent].children().len();
        let max_degree = self.max_degree();

        let root_slot = len < max_degree && self.is_root(parent);
        if !(root_slot || len + 1 < max_degree) {
            let limit = self.child_limit(parent);
            debug!(parent_key, child_key, len, limit, "insertion rejected");
            return Err(TreeError::DegreeLimitExceeded {
                key: parent_key,
                children: len,
                limit,
            });
        }

        let current = self[parent].children().to_vec();
        let mut rewired = Vec::with_capacity(len + 1);
        for old in current {
            let node = &self[old];
            let key = node.key;
            let grandchildren = node.children().to_vec();
            rewired.push(self.new_node_with_children(key, &grandchildren));
        }
        rewired.push(child);

        if let Some(node) = self.get_node_mut(parent) {
            node.set_children(rewired);
        }
        debug!(parent_key, child_key, children = len + 1, "inserted");
        Ok(parent)
    }

    /// First live node (preorder) whose child count exceeds its limit.
    ///
    /// Limits here follow handle identity: only the tree's own root may hold
    /// `max_degree` children.
    #[instrument(level = "debug", skip(self))]
    pub fn check_capacity(&self) -> Option<NodeId> {
        let root = self.root();
        let max_degree = self.max_degree();
        self.iter()
            .find(|(idx, node)| {
                let limit = if *idx == root {
                    max_degree
                } else {
                    max_degree.saturating_sub(1)
                };
                node.children().len() > limit
            })
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_full_non_root_when_inserting_then_rejects_and_keeps_children() {
        let mut tree = Tree::new(3, 1);
        let parent = tree.new_node(2);
        let a = tree.new_node(3);
        let b = tree.new_node(4);
        let c = tree.new_node(5);
        tree.insert(parent, a).unwrap();
        tree.insert(parent, b).unwrap();
        let before = tree[parent].children().to_vec();

        let err = tree.insert(parent, c).unwrap_err();

        assert_eq!(
            err,
            TreeError::DegreeLimitExceeded {
                key: 2,
                children: 2,
                limit: 2
            }
        );
        assert_eq!(tree[parent].children(), before.as_slice());
    }

    #[test]
    fn given_root_when_inserting_then_accepts_max_degree_children() {
        let mut tree = Tree::new(3, 1);
        let root = tree.root();
        for key in 2..5 {
            let child = tree.new_node(key);
            assert_eq!(tree.insert(root, child), Ok(root));
        }
        let extra = tree.new_node(9);
        assert!(tree.insert(root, extra).is_err());
        assert_eq!(tree[root].children().len(), 3);
    }

    #[test]
    fn given_same_key_leaf_as_root_when_comparing_then_structurally_equal() {
        let mut tree = Tree::new(3, 1);
        let twin = tree.new_node(1);
        assert!(tree.is_root(twin));

        let child = tree.new_node(2);
        tree.insert(tree.root(), child).unwrap();
        assert!(!tree.is_root(twin));
    }

    #[test]
    fn given_foreign_handle_when_indexing_then_panics() {
        let mut other = Tree::new(3, 1);
        for key in 0..4 {
            other.new_node(key);
        }
        let foreign = other.new_node(42);
        let tree = Tree::new(3, 1);
        let result = std::panic::catch_unwind(|| tree[foreign].key);
        assert!(result.is_err());
    }
}

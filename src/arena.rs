use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

/// Handle to a node stored in a [`Tree`]'s arena.
///
/// Handle equality is node identity: two handles are equal only if they refer
/// to the same node object, never merely to nodes with equal content.
pub type NodeId = Index;

/// Tree vertex: a key plus an ordered sequence of child handles.
#[derive(Debug, Clone)]
pub struct Node {
    /// Display key, not required to be unique
    pub key: i64,
    /// Child handles in insertion order
    children: Vec<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn set_children(&mut self, children: Vec<NodeId>) {
        self.children = children;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Degree-bounded tree backed by a generational arena.
///
/// The arena owns every node created through the tree: the live nodes
/// reachable from the root, detached nodes waiting to be inserted, and stale
/// nodes left behind when insertion re-wraps a parent's children.
///
/// Nodes are never freed: each successful insertion allocates one fresh node
/// per existing child of the parent, and the replaced ones stay in the arena
/// as stale nodes. [`Tree::node_count`] therefore only grows.
#[derive(Debug)]
pub struct Tree {
    arena: Arena<Node>,
    root: NodeId,
    max_degree: usize,
}

impl Tree {
    #[instrument(level = "debug")]
    pub fn new(max_degree: usize, root_key: i64) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node {
            key: root_key,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            max_degree,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Creates a detached node without children.
    #[instrument(level = "trace", skip(self))]
    pub fn new_node(&mut self, key: i64) -> NodeId {
        self.arena.insert(Node {
            key,
            children: Vec::new(),
        })
    }

    /// Creates a detached node owning a copy of `children`.
    ///
    /// The capacity rule is not applied here; only `insert` enforces it.
    #[instrument(level = "trace", skip(self))]
    pub fn new_node_with_children(&mut self, key: i64, children: &[NodeId]) -> NodeId {
        self.arena.insert(Node {
            key,
            children: children.to_vec(),
        })
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&Node> {
        self.arena.get(idx)
    }

    pub(crate) fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    /// Key of `idx`, if it belongs to this tree.
    pub fn key(&self, idx: NodeId) -> Option<i64> {
        self.get_node(idx).map(|node| node.key)
    }

    /// Number of nodes held by the arena, including detached and stale ones.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Preorder iterator over the live tree.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Preorder iterator over the subtree rooted at `start`.
    pub fn iter_from(&self, start: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, start)
    }

    /// First live node in preorder carrying `key`.
    #[instrument(level = "debug", skip(self))]
    pub fn find(&self, key: i64) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.key == key)
            .map(|(idx, _)| idx)
    }

    /// Number of levels in the live tree; a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Keys of all live leaves, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_keys(&self) -> Vec<i64> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.key)
            .collect()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a Tree, start: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

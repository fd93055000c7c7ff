//! Capacity-aware nearest-node search.
//!
//! Depth-first preorder walk from a start vertex looking for the closest
//! eligible node (a leaf, or a node with room for one more child). Ties at
//! equal depth go to the node discovered first.

use itertools::Itertools;
use tracing::{instrument, trace};

use crate::arena::{NodeId, Tree};
use crate::errors::{TreeError, TreeResult};

/// Distance sentinel while no eligible node has been found.
pub const UNREACHABLE: usize = usize::MAX;

/// Outcome of [`Tree::nearest_eligible`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Vertex the search started at
    pub from: NodeId,
    /// Closest eligible node, None if there is none
    pub to: Option<NodeId>,
    /// Depth of `to` below `from`, [`UNREACHABLE`] if `to` is None
    pub min_distance: usize,
    /// Nodes from `from` to `to`, both inclusive
    pub path: Vec<NodeId>,
}

impl SearchResult {
    fn new(from: NodeId) -> Self {
        Self {
            from,
            to: None,
            min_distance: UNREACHABLE,
            path: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        self.to.is_some()
    }

    pub fn distance(&self) -> Option<usize> {
        self.to.map(|_| self.min_distance)
    }

    pub fn path_keys(&self, tree: &Tree) -> Vec<i64> {
        self.path.iter().filter_map(|&idx| tree.key(idx)).collect()
    }

    /// One-line description, e.g. `Distance from 1 to 2 is 1`.
    pub fn summary(&self, tree: &Tree) -> String {
        let from = fmt_key(tree, self.from);
        match self.to {
            Some(to) => format!(
                "Distance from {} to {} is {}",
                from,
                fmt_key(tree, to),
                self.min_distance
            ),
            None => format!("No eligible vertex reachable from {}", from),
        }
    }

    /// Path as `[1, 3, 5]`.
    pub fn path_string(&self, tree: &Tree) -> String {
        format!("[{}]", self.path_keys(tree).iter().join(", "))
    }
}

fn fmt_key(tree: &Tree, idx: NodeId) -> String {
    tree.key(idx)
        .map(|key| key.to_string())
        .unwrap_or_else(|| "?".to_string())
}

impl Tree {
    /// Finds the eligible node closest to `start`, together with the path to it.
    ///
    /// The walk keeps its own stack of `(node, depth)` frames; the current path
    /// is cut back to `depth` before each node is appended, so a recorded path
    /// only ever holds the lineage from `start` to its target. The subtree
    /// below a new best is not descended.
    ///
    /// Returns [`TreeError::InvalidStartVertex`] if `start` does not belong to
    /// this tree. Finding nothing is not an error: the result then has
    /// `to == None`.
    #[instrument(level = "debug", skip(self))]
    pub fn nearest_eligible(&self, start: NodeId) -> TreeResult<SearchResult> {
        if !self.contains(start) {
            return Err(TreeError::InvalidStartVertex);
        }

        let mut best = SearchResult::new(start);
        let mut path: Vec<NodeId> = Vec::new();
        let mut stack = vec![(start, 0usize)];

        while let Some((idx, depth)) = stack.pop() {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            path.truncate(depth);
            path.push(idx);

            if self.is_eligible(idx) && depth < best.min_distance {
                trace!(key = node.key, depth, "new best");
                best.min_distance = depth;
                best.to = Some(idx);
                best.path = path.clone();
                continue;
            }

            for &child in node.children().iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        Ok(best)
    }
}

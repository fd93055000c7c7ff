use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::arena::Tree;
use crate::errors::{LayoutError, LayoutResult};

/// One insertion request: attach a new node `child` below `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub parent: i64,
    pub child: i64,
}

impl Edge {
    pub fn new(parent: i64, child: i64) -> Self {
        Self { parent, child }
    }
}

impl From<(i64, i64)> for Edge {
    fn from((parent, child): (i64, i64)) -> Self {
        Self::new(parent, child)
    }
}

/// Builds a [`Tree`] from an ordered list of `(parent, child)` key pairs.
///
/// Each edge creates a fresh child node and inserts it under the first live
/// node, in preorder, whose key is `parent`. Edges are applied in order, so a
/// parent must already be in the tree when its edge comes up.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    max_degree: usize,
    root_key: i64,
    edges: Vec<Edge>,
}

impl TreeBuilder {
    pub fn new(max_degree: usize, root_key: i64) -> Self {
        Self {
            max_degree,
            root_key,
            edges: Vec::new(),
        }
    }

    pub fn edge(mut self, parent: i64, child: i64) -> Self {
        self.edges.push(Edge::new(parent, child));
        self
    }

    pub fn edges<I>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        self.edges.extend(edges.into_iter().map(Edge::from));
        self
    }

    #[instrument(level = "debug", skip(self), fields(edges = self.edges.len()))]
    pub fn build(&self) -> LayoutResult<Tree> {
        if self.max_degree == 0 {
            return Err(LayoutError::InvalidMaxDegree(self.max_degree));
        }

        let mut tree = Tree::new(self.max_degree, self.root_key);
        for edge in &self.edges {
            let parent = tree
                .find(edge.parent)
                .ok_or(LayoutError::UnknownParent(edge.parent))?;
            let child = tree.new_node(edge.child);
            tree.insert(parent, child)?;
            debug!(parent = edge.parent, child = edge.child, "edge applied");
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TreeError;

    #[test]
    fn given_edges_when_building_then_children_keep_order() {
        let tree = TreeBuilder::new(3, 1)
            .edges([(1, 2), (1, 3), (3, 4)])
            .build()
            .unwrap();
        assert_eq!(tree.render(), "1\n├── 2\n└── 3\n    └── 4\n");
    }

    #[test]
    fn given_missing_parent_when_building_then_fails() {
        let result = TreeBuilder::new(3, 1).edge(7, 2).build();
        assert_eq!(result.unwrap_err(), LayoutError::UnknownParent(7));
    }

    #[test]
    fn given_overfull_parent_when_building_then_propagates_degree_error() {
        let result = TreeBuilder::new(3, 1)
            .edges([(1, 2), (2, 3), (2, 4), (2, 5)])
            .build();
        assert_eq!(
            result.unwrap_err(),
            LayoutError::Tree(TreeError::DegreeLimitExceeded {
                key: 2,
                children: 2,
                limit: 2
            })
        );
    }

    #[test]
    fn given_zero_max_degree_when_building_then_rejected() {
        let result = TreeBuilder::new(0, 1).build();
        assert_eq!(result.unwrap_err(), LayoutError::InvalidMaxDegree(0));
    }
}

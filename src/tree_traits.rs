/*
ASCII rendering of degree-bounded trees.

termtree already draws the `├── ` / `│   ` / `└── ` prefixes, so rendering is
just a matter of mirroring the arena structure into a termtree::Tree.
 */
use termtree::Tree as Diagram;
use tracing::instrument;

use crate::arena::{NodeId, Tree};

pub trait TreeConvert {
    fn to_tree_string(&self) -> Diagram<String>;
}

impl TreeConvert for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Diagram<String> {
        self.subtree_diagram(self.root())
    }
}

impl Tree {
    /// Diagram of the subtree rooted at `idx`, unknown handles render as `?`.
    pub fn subtree_diagram(&self, idx: NodeId) -> Diagram<String> {
        match self.get_node(idx) {
            Some(node) => {
                let leaves: Vec<_> = node
                    .children()
                    .iter()
                    .map(|&child| self.subtree_diagram(child))
                    .collect();
                Diagram::new(node.key.to_string()).with_leaves(leaves)
            }
            None => Diagram::new("?".to_string()),
        }
    }

    /// Nested prefix-drawn listing of the subtree rooted at `idx`.
    pub fn deep_to_string(&self, idx: NodeId) -> String {
        self.subtree_diagram(idx).to_string()
    }

    /// Nested prefix-drawn listing of the whole tree.
    pub fn render(&self) -> String {
        self.to_tree_string().to_string()
    }
}

//! Degree-bounded trees with a capacity-aware nearest-node search.
//!
//! A [`Tree`] caps how many children each node may hold: the root up to
//! `max_degree`, every other node up to `max_degree - 1` (its parent edge
//! uses one degree slot). [`Tree::insert`] enforces the cap, and
//! [`Tree::nearest_eligible`] finds the closest node below a start vertex
//! that is a leaf or still has room for another child.
//!
//! ```
//! use degtree::Tree;
//!
//! let mut tree = Tree::new(3, 1);
//! let two = tree.new_node(2);
//! let three = tree.new_node(3);
//! tree.insert(tree.root(), two)?;
//! tree.insert(tree.root(), three)?;
//!
//! let result = tree.nearest_eligible(tree.root())?;
//! assert_eq!(result.summary(&tree), "Distance from 1 to 2 is 1");
//! # Ok::<(), degtree::TreeError>(())
//! ```

pub mod arena;
pub mod builder;
pub mod capacity;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exitcode;
pub mod search;
pub mod tree_traits;
pub mod util;

pub use arena::{Node, NodeId, Tree, TreeIterator};
pub use builder::{Edge, TreeBuilder};
pub use config::Settings;
pub use errors::{LayoutError, LayoutResult, TreeError, TreeResult};
pub use search::{SearchResult, UNREACHABLE};
pub use tree_traits::TreeConvert;

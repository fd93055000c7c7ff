use thiserror::Error;

/// Failures of the core tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("degree limit exceeded: node {key} already has {children} of {limit} allowed children")]
    DegreeLimitExceeded {
        key: i64,
        children: usize,
        limit: usize,
    },

    #[error("invalid start vertex")]
    InvalidStartVertex,
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Failures while building a tree from a declarative layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("no node with key {0} in the tree")]
    UnknownParent(i64),

    #[error("max_degree must be at least 1, got {0}")]
    InvalidMaxDegree(usize),
}

pub type LayoutResult<T> = Result<T, LayoutError>;

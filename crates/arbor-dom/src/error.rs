//! DOM operation errors

use thiserror::Error;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// Insertion would break the tree shape (cycles, leaf parents, document rules)
    #[error("Hierarchy request error: {0}")]
    HierarchyViolation(&'static str),

    /// Reference node is not a child of the given parent
    #[error("Node not found")]
    NotFound,

    /// Character offset past the end of the data
    #[error("Index {offset} is out of range (length {length})")]
    IndexSize { offset: usize, length: usize },

    /// Operation needs a parent but the node is detached
    #[error("Node has no parent")]
    NoParent,

    /// Node kind does not support the operation
    #[error("Invalid node type")]
    InvalidNodeType,

    /// Operation is not supported for this node
    #[error("Operation not supported")]
    NotSupported,

    /// Invalid namespace / qualified name combination
    #[error("Namespace error: {0}")]
    Namespace(&'static str),

    /// Name or token contains a forbidden character
    #[error("Invalid character in {0:?}")]
    InvalidCharacter(String),

    /// Malformed argument
    #[error("Syntax error: {0}")]
    Syntax(String),
}

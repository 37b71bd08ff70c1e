use thiserror::Error;

use crate::node::{Arity, NodeType};

/// Why a structural or payload edit was rejected. Whenever one of these is returned, the tree has
/// been left exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("node is not part of this formula")]
    NotInTree,

    #[error("child index {index} out of range for a container with {count} slots")]
    OutOfRange { index: usize, count: usize },

    #[error("a {arity:?} node cannot hold {given} children")]
    ArityMismatch { arity: Arity, given: usize },

    #[error("{0:?} nodes have no slots and cannot adopt a child")]
    CannotAdopt(NodeType),

    #[error("node has more than one populated child, so none can be kept")]
    AmbiguousChild,

    #[error("expected a {expected:?} node, found {found:?}")]
    WrongType { expected: NodeType, found: NodeType },

    #[error("{0:?} is not valid number text")]
    InvalidNumber(String),

    #[error("character position {0} is outside the node text")]
    InvalidPosition(usize),

    #[error("{0:?} nodes have a fixed number of slots")]
    NotFlex(NodeType),

    #[error("moving these nodes would make a node its own descendant")]
    WouldCycle,
}

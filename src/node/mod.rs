//! The expression tree.
//!
//! A [Formula] owns every node of one tree in an arena. Nodes are addressed by copyable [NodeId]
//! handles, and each node knows its parent, so the tree can be walked in both directions. A handle
//! to a node which has since been removed simply resolves to `None`.
//!
//! Containers always have every slot populated; a slot nobody has filled yet holds a placeholder
//! ([NodeType::Empty]) node. Unary and binary containers have a fixed number of slots, while flex
//! containers (function calls and argument lists) can grow and shrink.
//!
//! Editing at a cursor position is usually done through a
//! [NodeIterator](crate::nav::NodeIterator), which builds on the structural operations here.

mod kind;
mod slots;
mod formula;
mod text;

pub use kind::{Arity, NodeKind, NodeType, Variable};
pub use slots::{Container, Slots};
pub use formula::{Formula, Node, NodeId};
pub(crate) use formula::Vacancy;

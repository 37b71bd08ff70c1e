//! Editable formula trees.
//!
//! A [Formula] is an expression tree whose every slot is always populated, with placeholders
//! marking the places still waiting for input. A [NodeIterator] walks it step by step, visiting
//! containers once per [Phase](nav::Phase), and can edit the tree where it stands. A
//! [ScreenPosIterator] flattens the walk into the positions a text cursor can occupy, and the
//! [renderers] turn a formula into a kernel command or into MathML.

pub mod error;
pub mod node;
pub mod nav;
pub mod render;
pub mod renderers;

#[cfg(test)]
mod tests;

pub use crate::{
    error::NodeError,
    nav::{NodeIterator, ScreenPos, ScreenPosIterator, Step, Phase},
    node::{Formula, NodeId, NodeKind, NodeType, Variable},
    render::NodeVisitor,
    renderers::{KernelRenderer, MarkupRenderer},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

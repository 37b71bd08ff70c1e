//! Child slot arrangements of container nodes.

use super::{Arity, NodeId};

/// Read access to the children of a container node. Leaves have no slots at all, so they never
/// implement this; see [Node::container](super::Node::container).
pub trait Container {
    /// The number of slots this container has. Every slot is populated, placeholders included.
    fn child_count(&self) -> usize;

    /// The child in slot `index`, or `None` if there is no such slot.
    fn child(&self, index: usize) -> Option<NodeId>;

    /// The slot index which holds `child`.
    fn index_of(&self, child: NodeId) -> Option<usize> {
        (0..self.child_count()).find(|&i| self.child(i) == Some(child))
    }

    fn is_first_child(&self, child: NodeId) -> bool {
        self.child(0) == Some(child)
    }

    fn is_last_child(&self, child: NodeId) -> bool {
        self.child_count() > 0 && self.child(self.child_count() - 1) == Some(child)
    }

    /// The child in the slot after the one holding `child`.
    fn next_child(&self, child: NodeId) -> Option<NodeId> {
        self.index_of(child).and_then(|i| self.child(i + 1))
    }

    /// The child in the slot before the one holding `child`.
    fn previous_child(&self, child: NodeId) -> Option<NodeId> {
        self.index_of(child).and_then(|i| i.checked_sub(1)).and_then(|i| self.child(i))
    }
}

/// The owned slots of a container node.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Slots {
    Unary(NodeId),
    Binary(NodeId, NodeId),
    Flex(Vec<NodeId>),
}

impl Slots {
    /// Builds the slot arrangement for `arity` from a list of children. Returns `None` if the
    /// number of children does not fit, or if the arity is [Arity::Leaf].
    pub(crate) fn from_children(arity: Arity, children: &[NodeId]) -> Option<Slots> {
        match (arity, children) {
            (Arity::Unary, &[c]) => Some(Slots::Unary(c)),
            (Arity::Binary, &[l, r]) => Some(Slots::Binary(l, r)),
            (Arity::Flex, c) => Some(Slots::Flex(c.to_vec())),
            _ => None,
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Slots::Unary(_) => Arity::Unary,
            Slots::Binary(_, _) => Arity::Binary,
            Slots::Flex(_) => Arity::Flex,
        }
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        match self {
            Slots::Unary(c) => vec![*c],
            Slots::Binary(l, r) => vec![*l, *r],
            Slots::Flex(c) => c.clone(),
        }
    }

    /// Replaces the occupant of slot `index`, returning the previous one.
    pub(crate) fn set(&mut self, index: usize, child: NodeId) -> Option<NodeId> {
        let slot = match (self, index) {
            (Slots::Unary(c), 0) => c,
            (Slots::Binary(l, _), 0) => l,
            (Slots::Binary(_, r), 1) => r,
            (Slots::Flex(c), i) => c.get_mut(i)?,
            _ => return None,
        };
        Some(core::mem::replace(slot, child))
    }
}

impl Container for Slots {
    fn child_count(&self) -> usize {
        match self {
            Slots::Unary(_) => 1,
            Slots::Binary(_, _) => 2,
            Slots::Flex(c) => c.len(),
        }
    }

    fn child(&self, index: usize) -> Option<NodeId> {
        match (self, index) {
            (Slots::Unary(c), 0) => Some(*c),
            (Slots::Binary(l, _), 0) => Some(*l),
            (Slots::Binary(_, r), 1) => Some(*r),
            (Slots::Flex(c), i) => c.get(i).copied(),
            _ => None,
        }
    }
}

//! Editing a formula at the position of a [NodeIterator].
//!
//! Every edit operates on the *current node*: the node of the step most recently returned by a
//! move, or, on a fresh iterator, the node of the upcoming step. Afterwards the cursor sits at a
//! documented place, so edits can be chained. A rejected edit changes neither the tree nor the
//! cursor.

use core::ops::DerefMut;

use tracing::{debug, instrument};

use crate::error::NodeError;
use crate::node::{Formula, Node, NodeId, NodeKind, NodeType, Slots, Vacancy};
use super::{NodeIterator, Step};

impl<T: DerefMut<Target = Formula>> NodeIterator<T> {
    pub fn formula_mut(&mut self) -> &mut Formula {
        &mut self.formula
    }

    /// Creates a node and puts it into the tree at the current node C, by the first of these
    /// which applies:
    ///
    ///   1. If C is a placeholder, the new node replaces it.
    ///   2. If C is a container with a placeholder slot, the new node fills the placeholder
    ///      closest to the cursor, looking forwards first.
    ///   3. If C is an argument of a flex container, the new node is inserted next to it, `before`
    ///      or after it.
    ///   4. Otherwise the new node takes C's slot and C moves into the new node, into its last slot
    ///      if `before` is set and into its first slot if not. Leaves cannot adopt C, so this fails
    ///      for them.
    ///
    /// The cursor ends up immediately after the first step of the new node.
    #[instrument(level = "trace", skip(self, kind))]
    pub fn insert(&mut self, kind: impl Into<NodeKind>, before: bool) -> Result<NodeId, NodeError> {
        let kind = kind.into();
        let anchor = self.anchor();
        let current = anchor.node;
        let node = self.formula.node(current).ok_or(NodeError::NotInTree)?;

        let new = if node.is_placeholder() {
            self.formula.replace_node(current, kind)?
        } else if let Some(slot) = self.placeholder_slot(current, anchor.gap) {
            self.formula.replace_node(slot, kind)?
        } else if let Some(parent) = node.parent().filter(|&p| self.formula.node(p).is_some_and(Node::is_flex_node)) {
            let index = self.formula.index_in_parent(current).ok_or(NodeError::NotInTree)?;
            let index = if before { index } else { index + 1 };
            self.formula.insert_child(parent, index, &Formula::from_kind(kind))?
        } else {
            self.formula.wrap(current, kind, before)?
        };

        let first = self.formula.enter(new, true);
        self.settle_after(first);
        Ok(new)
    }

    /// Replaces `node` and its subtree with a fresh node.
    ///
    /// The cursor stays on the side it was moving from. After a forward move it ends up
    /// immediately after the last step of the new node; after a backward move, immediately before
    /// its first step, so that the next [next](NodeIterator::next) returns the new node.
    #[instrument(level = "trace", skip(self, kind))]
    pub fn replace(&mut self, node: NodeId, kind: impl Into<NodeKind>) -> Result<NodeId, NodeError> {
        let new = self.formula.replace_node(node, kind.into())?;
        self.settle_around(new);
        Ok(new)
    }

    /// Replaces `node` and its subtree with a copy of `tree`. The cursor is placed like
    /// [replace](NodeIterator::replace) places it.
    #[instrument(level = "trace", skip(self, tree))]
    pub fn graft(&mut self, node: NodeId, tree: &Formula) -> Result<NodeId, NodeError> {
        let new = self.formula.graft(node, tree)?;
        self.settle_around(new);
        Ok(new)
    }

    /// Removes the current node.
    ///
    /// With `keep_child`, a container gives up one of its children to take its place: a unary
    /// container its only child, a binary or flex container its only child which is not a
    /// placeholder. If it has no such child it is removed as usual, and if it has several the edit
    /// is rejected.
    ///
    /// Otherwise the node's slot gets a placeholder, or is removed entirely if it belongs to a flex
    /// container. The cursor ends up immediately after the last step of whatever now fills the
    /// slot, or, for a removed flex slot, after the step that came before the removed node.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, keep_child: bool) -> Result<(), NodeError> {
        let current = self.anchor().node;
        let node = self.formula.node(current).ok_or(NodeError::NotInTree)?;

        if keep_child {
            let keep = match node.container() {
                Some(Slots::Unary(child)) => Some(*child),
                Some(slots) => {
                    let populated = slots.to_vec().into_iter()
                        .filter(|&c| self.formula.node(c).is_some_and(|n| !n.is_placeholder()))
                        .collect::<Vec<_>>();
                    match populated[..] {
                        [] => None,
                        [only] => Some(only),
                        _ => {
                            debug!("rejected remove, more than one child to keep");
                            return Err(NodeError::AmbiguousChild);
                        }
                    }
                }
                None => None,
            };

            if let Some(keep) = keep {
                let kept = self.formula.splice(current, keep)?;
                let last = self.formula.enter(kept, false);
                self.settle_after(last);
                return Ok(());
            }
        }

        match self.formula.vacate(current)? {
            Vacancy::Filled(replacement) => {
                let last = self.formula.enter(replacement, false);
                self.settle_after(last);
            }
            Vacancy::Closed { parent, index } => {
                let preceding = match index.checked_sub(1).and_then(|i| self.formula.child(parent, i)) {
                    Some(sibling) => self.formula.enter(sibling, false),
                    None => self.formula.enter(parent, true),
                };
                self.settle_after(preceding);
            }
        }
        Ok(())
    }

    /// Appends a placeholder slot to the closest flex container of the given type which is the
    /// current node or one of its ancestors. Returns whether there was such a container. The cursor
    /// stays after the same step it was after.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_child_space(&mut self, node_type: NodeType) -> bool {
        let mut candidate = Some(self.anchor().node);
        while let Some(id) = candidate {
            let eligible = self.formula.node(id)
                .is_some_and(|n| n.is_flex_node() && n.node_type() == node_type);
            if eligible {
                break;
            }
            candidate = self.formula.parent(id);
        }
        let Some(flex) = candidate else {
            debug!("no eligible flex container");
            return false;
        };

        let before_cursor = self.step_before_cursor();
        let (last, backwards) = (self.last, self.backwards);
        if self.formula.push_placeholder(flex).is_err() {
            return false;
        }

        match before_cursor {
            Some(step) => self.upcoming = self.formula.step_after(step),
            None => self.upcoming = Some(self.formula.first_step()),
        }
        self.last = last;
        self.backwards = backwards;
        true
    }

    /// Moves the cursor past a node which was just put into the tree, keeping the direction of the
    /// last move.
    fn settle_around(&mut self, new: NodeId) {
        if self.backwards {
            let first = self.formula.enter(new, true);
            self.settle_before(first);
        } else {
            let last = self.formula.enter(new, false);
            self.settle_after(last);
        }
    }

    /// The step whose node edits apply to.
    fn anchor(&self) -> Step {
        self.last_step()
            .or(self.upcoming.filter(|s| self.formula.contains(s.node)))
            .unwrap_or_else(|| self.formula.last_step())
    }

    /// A placeholder child of `container`, preferring slots from `gap` onwards.
    fn placeholder_slot(&self, container: NodeId, gap: usize) -> Option<NodeId> {
        let children = self.formula.node(container)?.children();
        let is_placeholder = |&&c: &&NodeId| self.formula.node(c).is_some_and(Node::is_placeholder);

        children.iter().skip(gap).find(is_placeholder)
            .or_else(|| children.iter().take(gap).rev().find(is_placeholder))
            .copied()
    }
}

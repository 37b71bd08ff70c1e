//! Phase-annotated traversal of a [Formula], and cursors built on it.
//!
//! A depth-first walk visits each container several times: once in the [Phase::Left] phase
//! before its first child, once in the [Phase::Middle] phase between each pair of children, and
//! once in the [Phase::Right] phase after its last child. Leaves are visited once, in the
//! [Phase::Middle] phase. For example, `1 + 2` is walked as:
//!
//! ```text
//! +(Left)  1(Middle)  +(Middle)  2(Middle)  +(Right)
//! ```
//!
//! Each visit is a [Step]. The functions here compute neighbouring steps from the tree alone, so
//! they keep working after the tree has been edited, as long as the step's node still exists.

mod iterator;
mod edit;
mod screen;

pub use iterator::NodeIterator;
pub use screen::{locate, offset_of, ScreenPos, ScreenPosIterator};

use crate::node::{Formula, NodeId, NodeKind, NodeType};

#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum Phase {
    /// About to descend into the first child.
    Left,

    /// Between two children, or the only visit of a leaf.
    Middle,

    /// About to ascend back to the parent.
    Right,
}

/// One visit of a node during a walk.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct Step {
    pub node: NodeId,
    pub phase: Phase,

    /// The number of children of `node` already walked when this step is reached. Always 0 for
    /// leaves.
    pub gap: usize,
}

impl Step {
    pub fn new(node: NodeId, phase: Phase, gap: usize) -> Self {
        Self { node, phase, gap }
    }
}

impl Formula {
    /// The step at which a walk enters the subtree rooted at `id`: its first step when walking
    /// forwards, its last step when walking backwards.
    pub fn enter(&self, id: NodeId, forwards: bool) -> Step {
        match self.node(id) {
            Some(node) if node.is_container() => if forwards {
                Step::new(id, Phase::Left, 0)
            } else {
                Step::new(id, Phase::Right, node.child_count())
            },
            _ => Step::new(id, Phase::Middle, 0),
        }
    }

    pub fn first_step(&self) -> Step {
        self.enter(self.root(), true)
    }

    pub fn last_step(&self) -> Step {
        self.enter(self.root(), false)
    }

    /// The step following `step`, or `None` if it is the last step of the walk (or its node is no
    /// longer part of the tree).
    pub fn step_after(&self, step: Step) -> Option<Step> {
        let node = self.node(step.node)?;

        if node.is_container() {
            match step.phase {
                Phase::Left | Phase::Middle => {
                    let gap = if step.phase == Phase::Left { 0 } else { step.gap };
                    return Some(match self.child(step.node, gap) {
                        Some(child) => self.enter(child, true),
                        None => Step::new(step.node, Phase::Right, node.child_count()),
                    });
                }
                Phase::Right => (),
            }
        }

        self.ascend(step.node, true)
    }

    /// The step preceding `step`, or `None` if it is the first step of the walk (or its node is no
    /// longer part of the tree).
    pub fn step_before(&self, step: Step) -> Option<Step> {
        let node = self.node(step.node)?;

        if node.is_container() {
            match step.phase {
                Phase::Right | Phase::Middle => {
                    let gap = if step.phase == Phase::Right { node.child_count() } else { step.gap };
                    return Some(match gap.checked_sub(1).and_then(|i| self.child(step.node, i)) {
                        Some(child) => self.enter(child, false),
                        None => Step::new(step.node, Phase::Left, 0),
                    });
                }
                Phase::Left => (),
            }
        }

        self.ascend(step.node, false)
    }

    /// The step of the parent which follows (or precedes) the walk of `id`.
    fn ascend(&self, id: NodeId, forwards: bool) -> Option<Step> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        let count = self.child_count(parent);

        Some(if forwards {
            if index + 1 < count {
                Step::new(parent, Phase::Middle, index + 1)
            } else {
                Step::new(parent, Phase::Right, count)
            }
        } else if index > 0 {
            Step::new(parent, Phase::Middle, index)
        } else {
            Step::new(parent, Phase::Left, 0)
        })
    }

    /// Every step of the walk, from the first to the last.
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = vec![];
        let mut current = Some(self.first_step());
        while let Some(step) = current {
            steps.push(step);
            current = self.step_after(step);
        }
        steps
    }

    /// How many characters a cursor can be placed after while it is at `step`. Literals and
    /// variables expose their text at their single step, and functions expose their name at their
    /// [Phase::Left] step.
    pub fn sub_index_count(&self, step: Step) -> usize {
        match (self.kind(step.node), step.phase) {
            (Some(NodeKind::Number(_) | NodeKind::Variable(_)), _) => self.char_count(step.node),
            (Some(NodeKind::Function(_)), Phase::Left) => self.char_count(step.node),
            _ => 0,
        }
    }

    /// True if the node is of the given type.
    pub(crate) fn is_type(&self, id: NodeId, node_type: NodeType) -> bool {
        self.node_type(id) == Some(node_type)
    }
}

//! Cursor positions as the user sees them.
//!
//! Some steps own characters the cursor can move between, such as the digits of a number. The
//! positions of a step are the step itself, with no sub-index (before its first character), and
//! then one position after each of its characters. Walking every position of every step in order
//! yields one linear sequence, which lets a cursor offset be mapped to a place in the tree and
//! back.

use tracing::trace;

use crate::node::{Formula, NodeId};
use super::{NodeIterator, Step};

/// A position in the linear sequence of cursor positions.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub struct ScreenPos {
    /// The step this position belongs to. All positions of one step share it, so it groups
    /// positions which are displayed together.
    pub step: Step,

    /// `None` before the first character of the step, `Some(k)` after character `k`.
    pub sub_index: Option<usize>,
}

/// Counts through the sub-indices of one step.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
struct SubIndices {
    count: usize,
    current: Option<usize>,
}

impl SubIndices {
    fn at_start(count: usize) -> Self {
        Self { count, current: None }
    }

    fn at_end(count: usize) -> Self {
        Self { count, current: count.checked_sub(1) }
    }

    fn has_next(&self) -> bool {
        self.current.map_or(0, |k| k + 1) < self.count
    }

    fn has_previous(&self) -> bool {
        self.current.is_some()
    }

    fn next(&mut self) {
        self.current = Some(self.current.map_or(0, |k| k + 1));
    }

    fn previous(&mut self) {
        self.current = self.current.and_then(|k| k.checked_sub(1));
    }
}

/// Walks the cursor positions of a formula.
///
/// Unlike a [NodeIterator], this iterator is always *on* a position, starting on the first one,
/// and stops at the ends instead of wrapping around.
pub struct ScreenPosIterator<'a> {
    tree: NodeIterator<&'a Formula>,
    step: Step,
    sub: SubIndices,

    /// Whether the tree iterator's cursor is after `step` (true) or before it.
    forwards: bool,
}

#[allow(clippy::should_implement_trait)]
impl<'a> ScreenPosIterator<'a> {
    pub fn new(formula: &'a Formula) -> Self {
        let mut tree = NodeIterator::new(formula);
        let step = tree.next_step();
        let sub = SubIndices::at_start(formula.sub_index_count(step));
        Self { tree, step, sub, forwards: true }
    }

    pub fn position(&self) -> ScreenPos {
        ScreenPos { step: self.step, sub_index: self.sub.current }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn node(&self) -> NodeId {
        self.step.node
    }

    pub fn sub_index(&self) -> Option<usize> {
        self.sub.current
    }

    pub fn has_next(&self) -> bool {
        self.sub.has_next() || self.tree.formula().step_after(self.step).is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.sub.has_previous() || self.tree.formula().step_before(self.step).is_some()
    }

    /// Moves to the following position, or returns `None` if this is the last one.
    pub fn next(&mut self) -> Option<ScreenPos> {
        if self.sub.has_next() {
            self.sub.next();
            return Some(self.position());
        }

        if !self.forwards {
            // The tree cursor is before the current step, so step over it first
            self.tree.next_step();
            self.forwards = true;
        }
        if !self.tree.has_next() {
            return None;
        }

        self.step = self.tree.next_step();
        self.sub = SubIndices::at_start(self.tree.formula().sub_index_count(self.step));
        trace!(step = ?self.step, "entered step forwards");
        Some(self.position())
    }

    /// Moves to the preceding position, or returns `None` if this is the first one.
    pub fn previous(&mut self) -> Option<ScreenPos> {
        if self.sub.has_previous() {
            self.sub.previous();
            return Some(self.position());
        }

        if self.forwards {
            self.tree.previous_step();
            self.forwards = false;
        }
        if !self.tree.has_previous() {
            return None;
        }

        self.step = self.tree.previous_step();
        self.sub = SubIndices::at_end(self.tree.formula().sub_index_count(self.step));
        trace!(step = ?self.step, "entered step backwards");
        Some(self.position())
    }

    /// Moves onto the first position.
    pub fn to_front(&mut self) {
        self.tree.to_front();
        self.step = self.tree.next_step();
        self.sub = SubIndices::at_start(self.tree.formula().sub_index_count(self.step));
        self.forwards = true;
    }

    /// Moves onto the last position.
    pub fn to_back(&mut self) {
        self.tree.to_back();
        self.step = self.tree.previous_step();
        self.sub = SubIndices::at_end(self.tree.formula().sub_index_count(self.step));
        self.forwards = false;
    }
}

/// The position `offset` places after the first one, or `None` if there are not that many.
pub fn locate(formula: &Formula, offset: usize) -> Option<ScreenPos> {
    let mut iter = ScreenPosIterator::new(formula);
    for _ in 0..offset {
        iter.next()?;
    }
    Some(iter.position())
}

/// The inverse of [locate].
pub fn offset_of(formula: &Formula, position: ScreenPos) -> Option<usize> {
    let mut iter = ScreenPosIterator::new(formula);
    let mut offset = 0;
    loop {
        if iter.position() == position {
            return Some(offset);
        }
        iter.next()?;
        offset += 1;
    }
}

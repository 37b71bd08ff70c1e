use core::ops::Deref;

use tracing::trace;

use crate::node::{Formula, NodeId, NodeType};
use super::{Phase, Step};

/// A cursor over the steps of a [Formula] walk.
///
/// The cursor sits between two steps. [next](NodeIterator::next) returns the step after the
/// cursor and moves past it, [previous](NodeIterator::previous) returns the step before the
/// cursor and moves back past it, so calling one after the other returns the same node twice.
///
/// Moving past either end wraps around: `next` at the back returns the first step, and `previous`
/// at the front returns the last step. Check [has_next](NodeIterator::has_next) and
/// [has_previous](NodeIterator::has_previous) to stop at the ends instead.
///
/// Any number of iterators can read one formula at a time. An iterator over `&mut Formula` can also
/// edit the tree at its position, starting with [insert](NodeIterator::insert).
pub struct NodeIterator<T: Deref<Target = Formula>> {
    pub(super) formula: T,

    /// The step after the cursor, or `None` when the cursor is at the back.
    pub(super) upcoming: Option<Step>,

    /// The step most recently returned by a move.
    pub(super) last: Option<Step>,

    /// Whether that move went backwards, leaving the cursor before `last` rather than after it.
    pub(super) backwards: bool,
}

#[allow(clippy::should_implement_trait)]
impl<T: Deref<Target = Formula>> NodeIterator<T> {
    /// Creates an iterator positioned at the front of the walk.
    pub fn new(formula: T) -> Self {
        let upcoming = Some(formula.first_step());
        Self { formula, upcoming, last: None, backwards: false }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Consumes the iterator, handing back what it was built over.
    pub fn into_inner(self) -> T {
        self.formula
    }

    pub fn has_next(&self) -> bool {
        self.upcoming.is_some_and(|s| self.formula.contains(s.node))
    }

    pub fn has_previous(&self) -> bool {
        self.step_before_cursor().is_some()
    }

    /// Moves forwards one step and returns its node.
    pub fn next(&mut self) -> NodeId {
        self.next_step().node
    }

    /// Moves backwards one step and returns its node.
    pub fn previous(&mut self) -> NodeId {
        self.previous_step().node
    }

    /// Like [next](NodeIterator::next), but returns the whole step.
    pub fn next_step(&mut self) -> Step {
        let step = self.peek_next_step();
        self.upcoming = self.formula.step_after(step);
        self.last = Some(step);
        self.backwards = false;
        trace!(?step, "next");
        step
    }

    /// Like [previous](NodeIterator::previous), but returns the whole step.
    pub fn previous_step(&mut self) -> Step {
        let step = self.peek_previous_step();
        self.upcoming = Some(step);
        self.last = Some(step);
        self.backwards = true;
        trace!(?step, "previous");
        step
    }

    /// The step [next_step](NodeIterator::next_step) would return.
    pub fn peek_next_step(&self) -> Step {
        self.upcoming
            .filter(|s| self.formula.contains(s.node))
            .unwrap_or_else(|| self.formula.first_step())
    }

    /// The step [previous_step](NodeIterator::previous_step) would return.
    pub fn peek_previous_step(&self) -> Step {
        self.step_before_cursor().unwrap_or_else(|| self.formula.last_step())
    }

    pub fn peek_next(&self) -> NodeId {
        self.peek_next_step().node
    }

    pub fn peek_previous(&self) -> NodeId {
        self.peek_previous_step().node
    }

    pub fn to_front(&mut self) {
        self.upcoming = Some(self.formula.first_step());
        self.last = None;
        self.backwards = false;
    }

    pub fn to_back(&mut self) {
        self.upcoming = None;
        self.last = None;
        self.backwards = false;
    }

    /// Moves forwards until a node of the given type has been passed, so that a following
    /// [previous](NodeIterator::previous) returns it. If there is none, the iterator is left at
    /// the back and `false` is returned.
    pub fn find_next(&mut self, node_type: NodeType) -> bool {
        while self.has_next() {
            let node = self.next();
            if self.formula.is_type(node, node_type) {
                return true;
            }
        }
        false
    }

    /// Moves backwards until a node of the given type has been passed, so that a following
    /// [next](NodeIterator::next) returns it. If there is none, the iterator is left at the front
    /// and `false` is returned.
    pub fn find_previous(&mut self, node_type: NodeType) -> bool {
        while self.has_previous() {
            let node = self.previous();
            if self.formula.is_type(node, node_type) {
                return true;
            }
        }
        false
    }

    /// The step most recently returned by a move, if its node still exists.
    pub fn last_step(&self) -> Option<Step> {
        self.last.filter(|s| self.formula.contains(s.node))
    }

    /// The phase of the most recently returned step.
    pub fn phase(&self) -> Option<Phase> {
        self.last_step().map(|s| s.phase)
    }

    /// The node of the most recently returned step.
    pub fn node(&self) -> Option<NodeId> {
        self.last_step().map(|s| s.node)
    }

    /// The step immediately before the cursor, or `None` at the front.
    pub(super) fn step_before_cursor(&self) -> Option<Step> {
        match self.upcoming {
            Some(step) => self.formula.step_before(step),
            None => Some(self.formula.last_step()),
        }
    }

    /// Places the cursor immediately after `step`, as if `step` had just been returned by a
    /// forward move.
    pub(super) fn settle_after(&mut self, step: Step) {
        self.upcoming = self.formula.step_after(step);
        self.last = Some(step);
        self.backwards = false;
    }

    /// Places the cursor immediately before `step`, as if `step` had just been returned by a
    /// backward move.
    pub(super) fn settle_before(&mut self, step: Step) {
        self.upcoming = Some(step);
        self.last = Some(step);
        self.backwards = true;
    }

    /// Whether the most recent move went backwards.
    pub fn moved_backwards(&self) -> bool {
        self.backwards
    }
}

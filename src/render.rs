//! The visitor contract shared by all renderers.
//!
//! A rendering pass walks every step of a formula with a fresh [NodeIterator], and hands each
//! step to the [NodeVisitor] callback for the kind of node it belongs to. Containers are therefore
//! seen several times per pass, once per [Phase], and each callback decides what to emit for the
//! phase it is given. See [renderers](crate::renderers) for the concrete renderers.

use crate::nav::{NodeIterator, Phase, Step};
use crate::node::{Formula, NodeId, NodeKind, NodeType, Variable, Arity};

/// One step of a rendering pass, as seen by a visitor callback.
#[derive(Debug, Copy, Clone)]
pub struct Visit<'a> {
    pub formula: &'a Formula,
    pub step: Step,

    /// The root of the subtree being rendered.
    pub root: NodeId,
}

impl<'a> Visit<'a> {
    pub fn node(&self) -> NodeId {
        self.step.node
    }

    pub fn phase(&self) -> Phase {
        self.step.phase
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.formula.node_type(self.step.node)
    }

    /// The parent of the visited node within the rendered subtree.
    pub fn parent(&self) -> Option<NodeId> {
        if self.is_pass_root() {
            None
        } else {
            self.formula.parent(self.step.node)
        }
    }

    pub fn parent_type(&self) -> Option<NodeType> {
        self.parent().and_then(|p| self.formula.node_type(p))
    }

    pub fn index_in_parent(&self) -> Option<usize> {
        self.parent().and(self.formula.index_in_parent(self.step.node))
    }

    pub fn is_pass_root(&self) -> bool {
        self.step.node == self.root
    }

    /// True for the first step of the visited node: the only step of a leaf, or the left step of a
    /// container.
    pub fn is_first_visit(&self) -> bool {
        self.step == self.formula.enter(self.step.node, true)
    }

    /// True for the last step of the visited node.
    pub fn is_last_visit(&self) -> bool {
        self.step == self.formula.enter(self.step.node, false)
    }
}

/// Receives the steps of a rendering pass, one callback per kind of node.
pub trait NodeVisitor {
    /// Resets any state kept from a previous pass.
    fn begin(&mut self);

    /// Ends the pass and hands out its result.
    fn finish(&mut self) -> String;

    fn visit_number(&mut self, visit: &Visit, text: &str);
    fn visit_variable(&mut self, visit: &Visit, variable: &Variable);
    fn visit_empty(&mut self, visit: &Visit);

    /// Parentheses, square roots and negation.
    fn visit_unary(&mut self, visit: &Visit, node_type: NodeType);

    /// Infix operators and n-th roots.
    fn visit_binary(&mut self, visit: &Visit, node_type: NodeType);

    fn visit_function(&mut self, visit: &Visit, name: &str);
    fn visit_argument_list(&mut self, visit: &Visit);

    /// Renders a whole formula.
    fn render(&mut self, formula: &Formula) -> String where Self: Sized {
        self.begin();

        let root = formula.root();
        let mut iter = NodeIterator::new(formula);
        while iter.has_next() {
            let step = iter.next_step();
            dispatch(self, &Visit { formula, step, root });
        }

        self.finish()
    }

    /// Renders only the subtree rooted at `id`, as if it were a formula of its own. Returns `None`
    /// if `id` is not part of `formula`.
    fn render_subtree(&mut self, formula: &Formula, id: NodeId) -> Option<String> where Self: Sized {
        formula.node(id)?;
        self.begin();

        let last = formula.enter(id, false);
        let mut current = Some(formula.enter(id, true));
        while let Some(step) = current {
            dispatch(self, &Visit { formula, step, root: id });
            current = if step == last { None } else { formula.step_after(step) };
        }

        Some(self.finish())
    }
}

/// Invokes the callback matching the visited node.
pub fn dispatch(visitor: &mut impl NodeVisitor, visit: &Visit) {
    let Some(kind) = visit.formula.kind(visit.node()) else { return };

    match kind {
        NodeKind::Empty => visitor.visit_empty(visit),
        NodeKind::Number(text) => visitor.visit_number(visit, text),
        NodeKind::Variable(variable) => visitor.visit_variable(visit, variable),
        NodeKind::Function(name) => visitor.visit_function(visit, name),
        NodeKind::ArgumentList => visitor.visit_argument_list(visit),
        other => match other.node_type().arity() {
            Arity::Unary => visitor.visit_unary(visit, other.node_type()),
            _ => visitor.visit_binary(visit, other.node_type()),
        },
    }
}

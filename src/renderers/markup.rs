use std::collections::HashMap;

use crate::nav::Phase;
use crate::node::{Formula, NodeId, NodeType, Variable};
use crate::render::{NodeVisitor, Visit};

/// Placeholder glyph, a white square.
const PLACEHOLDER: &str = "&#9633;";

/// Only numeric character references are emitted, so the output is plain XML and needs no MathML
/// entity definitions.
const MIDDLE_DOT: &str = "&#183;";
const FUNCTION_APPLICATION: &str = "&#8289;";

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct MarkupSettings {
    /// Whether the output is enclosed in a `<math>` element.
    pub wrap_in_math: bool,
}

impl Default for MarkupSettings {
    fn default() -> Self {
        Self { wrap_in_math: true }
    }
}

/// The result of a markup pass, together with the node each `id` attribute refers to.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct MarkupOutput {
    pub markup: String,
    nodes: Vec<NodeId>,
}

impl MarkupOutput {
    /// The node which the given `id` attribute was emitted for.
    pub fn node(&self, id: usize) -> Option<NodeId> {
        id.checked_sub(1).and_then(|i| self.nodes.get(i)).copied()
    }

    /// The `id` attribute emitted for a node.
    pub fn id_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node).map(|i| i + 1)
    }
}

/// Renders a formula as presentation MathML. Every element emitted for a node carries that
/// node's `id`, numbered from 1 in the order nodes are first reached during the pass.
#[derive(Debug, Clone, Default)]
pub struct MarkupRenderer {
    pub settings: MarkupSettings,
    output: String,
    ids: HashMap<NodeId, usize>,
    nodes: Vec<NodeId>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Whether an operator must be fenced to keep its meaning inside its parent. Fractions, powers and
/// roots are laid out two-dimensionally, so they group their operands by themselves, except for
/// the base of a power.
fn needs_fence(visit: &Visit) -> bool {
    let (Some(node_type), Some(parent_type)) = (visit.node_type(), visit.parent_type()) else {
        return false;
    };
    let Some(own) = node_type.precedence().filter(|_| node_type != NodeType::Division) else {
        return false;
    };

    match parent_type {
        NodeType::Exponent => visit.index_in_parent() == Some(0),
        NodeType::Division => false,
        _ => parent_type.precedence().is_some_and(|parent| {
            own < parent
                || (own == parent && parent_type == NodeType::Minus && visit.index_in_parent() == Some(1))
        }),
    }
}

impl MarkupRenderer {
    pub fn new(settings: MarkupSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    /// Renders a formula, also returning which node each `id` attribute belongs to.
    pub fn render_with_lookup(&mut self, formula: &Formula) -> MarkupOutput {
        let markup = self.render(formula);
        MarkupOutput { markup, nodes: core::mem::take(&mut self.nodes) }
    }

    /// The id of the visited node, assigning the next one if the node has not been seen yet in
    /// this pass.
    fn id(&mut self, visit: &Visit) -> usize {
        let next = self.nodes.len() + 1;
        let id = *self.ids.entry(visit.node()).or_insert(next);
        if id == next {
            self.nodes.push(visit.node());
        }
        id
    }

    fn push(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn open_fence(&mut self, visit: &Visit, id: usize) {
        if needs_fence(visit) {
            self.push(&format!("<mrow id=\"{id}\"><mo id=\"{id}\">(</mo>"));
        }
    }

    fn close_fence(&mut self, visit: &Visit, id: usize) {
        if needs_fence(visit) {
            self.push(&format!("<mo id=\"{id}\">)</mo></mrow>"));
        }
    }

    /// Emits a container laid out as `element` with one `<mrow>` per operand.
    fn layout(&mut self, visit: &Visit, element: &str) {
        let id = self.id(visit);
        match visit.phase() {
            Phase::Left => {
                self.open_fence(visit, id);
                self.push(&format!("<{element} id=\"{id}\"><mrow>"));
            }
            Phase::Middle => self.push("</mrow><mrow>"),
            Phase::Right => {
                self.push(&format!("</mrow></{element}>"));
                self.close_fence(visit, id);
            }
        }
    }

    /// Emits a container as a row with an operator between its operands.
    fn infix(&mut self, visit: &Visit, operator: &str) {
        let id = self.id(visit);
        match visit.phase() {
            Phase::Left => {
                self.open_fence(visit, id);
                self.push(&format!("<mrow id=\"{id}\">"));
            }
            Phase::Middle => self.push(&format!("<mo id=\"{id}\">{operator}</mo>")),
            Phase::Right => {
                self.push("</mrow>");
                self.close_fence(visit, id);
            }
        }
    }
}

impl NodeVisitor for MarkupRenderer {
    fn begin(&mut self) {
        self.output.clear();
        self.ids.clear();
        self.nodes.clear();
        if self.settings.wrap_in_math {
            self.push("<math>");
        }
    }

    fn finish(&mut self) -> String {
        if self.settings.wrap_in_math {
            self.push("</math>");
        }
        core::mem::take(&mut self.output)
    }

    fn visit_number(&mut self, visit: &Visit, text: &str) {
        let id = self.id(visit);
        self.push(&format!("<mn id=\"{id}\">{}</mn>", escape(text)));
    }

    fn visit_variable(&mut self, visit: &Visit, variable: &Variable) {
        let id = self.id(visit);
        let name = escape(&variable.name);
        match &variable.subscript {
            Some(sub) => self.push(&format!(
                "<msub id=\"{id}\"><mi id=\"{id}\">{name}</mi><mi id=\"{id}\">{}</mi></msub>",
                escape(sub),
            )),
            None => self.push(&format!("<mi id=\"{id}\">{name}</mi>")),
        }
    }

    fn visit_empty(&mut self, visit: &Visit) {
        let id = self.id(visit);
        self.push(&format!("<mi id=\"{id}\">{PLACEHOLDER}</mi>"));
    }

    fn visit_unary(&mut self, visit: &Visit, node_type: NodeType) {
        let id = self.id(visit);
        match (node_type, visit.phase()) {
            (NodeType::Parenthesis, Phase::Left) => self.push(&format!(
                "<mfenced id=\"{id}\" open=\"(\" close=\")\" separators=\",\"><mrow>"
            )),
            (NodeType::Parenthesis, Phase::Right) => self.push("</mrow></mfenced>"),
            (NodeType::Sqrt, Phase::Left) => self.push(&format!("<msqrt id=\"{id}\">")),
            (NodeType::Sqrt, Phase::Right) => self.push("</msqrt>"),
            (_, Phase::Left) => {
                self.open_fence(visit, id);
                self.push(&format!("<mrow id=\"{id}\"><mo id=\"{id}\">-</mo>"));
            }
            (_, Phase::Right) => {
                self.push("</mrow>");
                self.close_fence(visit, id);
            }
            (_, Phase::Middle) => (),
        }
    }

    fn visit_binary(&mut self, visit: &Visit, node_type: NodeType) {
        match node_type {
            NodeType::Plus => self.infix(visit, "+"),
            NodeType::Minus => self.infix(visit, "-"),
            NodeType::Multiplication => self.infix(visit, MIDDLE_DOT),
            NodeType::Division => self.layout(visit, "mfrac"),
            NodeType::Exponent => self.layout(visit, "msup"),
            _ => self.layout(visit, "mroot"),
        }
    }

    fn visit_function(&mut self, visit: &Visit, name: &str) {
        let id = self.id(visit);
        match visit.phase() {
            Phase::Left => self.push(&format!(
                "<mrow id=\"{id}\"><mi mathvariant=\"italic\" id=\"{id}\">{}</mi><mo>{FUNCTION_APPLICATION}</mo>\
                 <mrow><mo id=\"{id}\">(</mo><mrow>",
                escape(name),
            )),
            Phase::Middle => self.push(&format!("</mrow><mo id=\"{id}\">,</mo><mrow>")),
            Phase::Right => self.push(&format!("</mrow><mo id=\"{id}\">)</mo></mrow></mrow>")),
        }
    }

    fn visit_argument_list(&mut self, visit: &Visit) {
        self.infix(visit, ",");
    }
}

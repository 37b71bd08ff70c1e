use core::fmt;

use crate::nav::Phase;
use crate::node::{Formula, NodeType, Variable};
use crate::render::{NodeVisitor, Visit};

/// How eagerly operands are wrapped in parentheses.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub enum ParenthesisStyle {
    /// Only where operator precedence or associativity would otherwise change the meaning.
    #[default]
    Minimal,

    /// Around every operand of an infix or prefix operator, leaves included.
    Conservative,
}

#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub struct KernelSettings {
    pub parentheses: ParenthesisStyle,
}

/// Renders a formula as a command for a computer algebra kernel, for example
/// `name(3,(5),6,7)+8`.
#[derive(Debug, Clone, Default)]
pub struct KernelRenderer {
    pub settings: KernelSettings,
    output: String,
}

impl KernelRenderer {
    pub fn new(settings: KernelSettings) -> Self {
        Self { settings, output: String::new() }
    }

    fn open(&mut self, visit: &Visit) {
        if needs_parentheses(visit, self.settings.parentheses) {
            self.output.push('(');
        }
    }

    fn close(&mut self, visit: &Visit) {
        if needs_parentheses(visit, self.settings.parentheses) {
            self.output.push(')');
        }
    }
}

/// Binding strength of a node in kernel syntax. An n-th root is written as a power, so it binds
/// like one.
fn precedence(node_type: NodeType) -> Option<u8> {
    match node_type {
        NodeType::Root => NodeType::Exponent.precedence(),
        other => other.precedence(),
    }
}

/// Whether the visited node must be wrapped in parentheses to keep its meaning inside its parent.
pub fn needs_parentheses(visit: &Visit, style: ParenthesisStyle) -> bool {
    let (Some(node_type), Some(parent_type)) = (visit.node_type(), visit.parent_type()) else {
        return false;
    };
    let Some(parent_precedence) = parent_type.precedence() else {
        return false;
    };

    match style {
        ParenthesisStyle::Conservative => node_type != NodeType::Empty,
        ParenthesisStyle::Minimal => {
            let Some(own) = precedence(node_type) else { return false };
            let index = visit.index_in_parent();

            let associates_wrongly = match parent_type {
                NodeType::Minus | NodeType::Division => index == Some(1),
                NodeType::Exponent => index == Some(0),
                _ => false,
            };
            own < parent_precedence || (own == parent_precedence && associates_wrongly)
        }
    }
}

impl NodeVisitor for KernelRenderer {
    fn begin(&mut self) {
        self.output.clear();
    }

    fn finish(&mut self) -> String {
        core::mem::take(&mut self.output)
    }

    fn visit_number(&mut self, visit: &Visit, text: &str) {
        self.open(visit);
        self.output.push_str(text);
        self.close(visit);
    }

    fn visit_variable(&mut self, visit: &Visit, variable: &Variable) {
        self.open(visit);
        self.output.push_str(&variable.stuffed());
        self.close(visit);
    }

    fn visit_empty(&mut self, _: &Visit) {}

    fn visit_unary(&mut self, visit: &Visit, node_type: NodeType) {
        match visit.phase() {
            Phase::Left => {
                self.open(visit);
                self.output.push_str(match node_type {
                    NodeType::Parenthesis => "(",
                    NodeType::Sqrt => "sqrt(",
                    _ => "-",
                });
            }
            Phase::Right => {
                if node_type != NodeType::UnaryMinus {
                    self.output.push(')');
                }
                self.close(visit);
            }
            Phase::Middle => (),
        }
    }

    fn visit_binary(&mut self, visit: &Visit, node_type: NodeType) {
        match visit.phase() {
            Phase::Left => {
                self.open(visit);
                if node_type == NodeType::Root {
                    self.output.push('(');
                }
            }
            Phase::Middle => self.output.push_str(match node_type {
                NodeType::Plus => "+",
                NodeType::Minus => "-",
                NodeType::Multiplication => "*",
                NodeType::Division => "/",
                NodeType::Exponent => "^",
                _ => ")^(1/(",
            }),
            Phase::Right => {
                if node_type == NodeType::Root {
                    self.output.push_str("))");
                }
                self.close(visit);
            }
        }
    }

    fn visit_function(&mut self, visit: &Visit, name: &str) {
        match visit.phase() {
            Phase::Left => {
                self.open(visit);
                self.output.push_str(name);
                self.output.push('(');
            }
            Phase::Middle => self.output.push(','),
            Phase::Right => {
                self.output.push(')');
                self.close(visit);
            }
        }
    }

    fn visit_argument_list(&mut self, visit: &Visit) {
        if visit.phase() == Phase::Middle {
            self.output.push(',');
        }
    }
}

/// Formats the formula in kernel syntax with default settings.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", KernelRenderer::default().render(self))
    }
}

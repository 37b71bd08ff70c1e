use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

use crate::{Formula, NodeId, nav::{Phase, Step}};

static TRACING: Once = Once::new();

/// Installs a subscriber printing to the test output, once per test binary. Honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

macro_rules! num {
    ($t:literal) => { crate::Formula::from_kind(crate::NodeKind::number(stringify!($t))) };
}

macro_rules! var {
    ($v:ident) => { crate::Formula::from_kind(crate::NodeKind::variable(stringify!($v))) };
}

macro_rules! empty {
    () => { crate::Formula::default() };
}

macro_rules! node {
    ($kind:expr $(, $child:expr)* $(,)?) => {
        crate::Formula::compose(crate::NodeKind::from($kind), vec![ $($child),* ]).unwrap()
    };
}

macro_rules! func {
    ($name:literal $(, $arg:expr)* $(,)?) => { node!(crate::NodeKind::function($name) $(, $arg)*) };
}

macro_rules! add { ($l:expr, $r:expr $(,)?) => { node!(crate::NodeType::Plus, $l, $r) }; }
macro_rules! sub { ($l:expr, $r:expr $(,)?) => { node!(crate::NodeType::Minus, $l, $r) }; }
macro_rules! mul { ($l:expr, $r:expr $(,)?) => { node!(crate::NodeType::Multiplication, $l, $r) }; }
macro_rules! div { ($l:expr, $r:expr $(,)?) => { node!(crate::NodeType::Division, $l, $r) }; }
macro_rules! pow { ($l:expr, $r:expr $(,)?) => { node!(crate::NodeType::Exponent, $l, $r) }; }
macro_rules! paren { ($c:expr $(,)?) => { node!(crate::NodeType::Parenthesis, $c) }; }
macro_rules! neg { ($c:expr $(,)?) => { node!(crate::NodeType::UnaryMinus, $c) }; }

macro_rules! kernel {
    ($f:expr, $style:ident) => {
        <crate::KernelRenderer as crate::NodeVisitor>::render(
            &mut crate::KernelRenderer::new(crate::renderers::KernelSettings {
                parentheses: crate::renderers::ParenthesisStyle::$style,
            }),
            &$f,
        )
    };

    ($f:expr) => { kernel!($f, Minimal) };
}

macro_rules! markup {
    ($f:expr) => {
        <crate::MarkupRenderer as crate::NodeVisitor>::render(
            &mut crate::MarkupRenderer::new(crate::renderers::MarkupSettings { wrap_in_math: false }),
            &$f,
        )
    };
}

/// The node found by following child indices down from the root.
pub fn at(formula: &Formula, path: &[usize]) -> NodeId {
    path.iter().fold(formula.root(), |node, &i| formula.child(node, i).unwrap())
}

/// Shorthand for building expected steps.
pub fn step(node: NodeId, phase: Phase, gap: usize) -> Step {
    Step::new(node, phase, gap)
}

/// Checks that every node's parent holds it in the slot it claims.
pub fn assert_links_consistent(formula: &Formula) {
    for id in formula.descendants(formula.root()) {
        let node = formula.node(id).unwrap();
        for (i, child) in node.children().into_iter().enumerate() {
            assert_eq!(formula.parent(child), Some(id));
            assert_eq!(formula.index_in_parent(child), Some(i));
        }
    }
    assert_eq!(formula.parent(formula.root()), None);
    assert_eq!(formula.descendants(formula.root()).len(), formula.node_count());
}

/// `f(x,(2+3))*4-1`, which has every kind of container the walk distinguishes.
pub fn complex_formula() -> Formula {
    sub!(
        mul!(
            func!("f", var!(x), paren!(add!(num!(2), num!(3)))),
            num!(4),
        ),
        num!(1),
    )
}

use crate::{Formula, NodeIterator, NodeType, nav::{Phase, Step}};
use super::util::{at, complex_formula, init_tracing, step};

fn forward_steps(formula: &Formula) -> Vec<Step> {
    let mut iter = NodeIterator::new(formula);
    let mut steps = vec![];
    while iter.has_next() {
        steps.push(iter.next_step());
    }
    steps
}

fn backward_steps(formula: &Formula) -> Vec<Step> {
    let mut iter = NodeIterator::new(formula);
    iter.to_back();
    let mut steps = vec![];
    while iter.has_previous() {
        steps.push(iter.previous_step());
    }
    steps
}

#[test]
fn test_binary_traversal() {
    init_tracing();

    let formula = add!(add!(num!(200.1), num!(3)), num!(90.365));
    let root = formula.root();
    let (inner, a, b, c) = (at(&formula, &[0]), at(&formula, &[0, 0]), at(&formula, &[0, 1]), at(&formula, &[1]));

    let expected = vec![
        step(root, Phase::Left, 0),
        step(inner, Phase::Left, 0),
        step(a, Phase::Middle, 0),
        step(inner, Phase::Middle, 1),
        step(b, Phase::Middle, 0),
        step(inner, Phase::Right, 2),
        step(root, Phase::Middle, 1),
        step(c, Phase::Middle, 0),
        step(root, Phase::Right, 2),
    ];
    assert_eq!(forward_steps(&formula), expected);
    assert_eq!(formula.steps(), expected);

    let mut reversed = expected.clone();
    reversed.reverse();
    assert_eq!(backward_steps(&formula), reversed);
}

#[test]
fn test_unset_slot_is_walked_as_placeholder() {
    // `+(+(200.1, <unset>), 90.365)`: the unset slot holds a placeholder, which is visited like
    // any other leaf, and the inner sum is left through its right step
    let formula = add!(add!(num!(200.1), empty!()), num!(90.365));
    let root = formula.root();
    let (inner, a, unset, b) = (at(&formula, &[0]), at(&formula, &[0, 0]), at(&formula, &[0, 1]), at(&formula, &[1]));

    let expected = vec![
        step(root, Phase::Left, 0),
        step(inner, Phase::Left, 0),
        step(a, Phase::Middle, 0),
        step(inner, Phase::Middle, 1),
        step(unset, Phase::Middle, 0),
        step(inner, Phase::Right, 2),
        step(root, Phase::Middle, 1),
        step(b, Phase::Middle, 0),
        step(root, Phase::Right, 2),
    ];
    assert_eq!(forward_steps(&formula), expected);

    let mut reversed = expected.clone();
    reversed.reverse();
    assert_eq!(backward_steps(&formula), reversed);

    let types = expected.iter().map(|s| formula.node_type(s.node).unwrap()).collect::<Vec<_>>();
    assert_eq!(types[4], NodeType::Empty);
}

#[test]
fn test_unary_and_flex_traversal() {
    let formula = paren!(num!(5));
    let (root, five) = (formula.root(), at(&formula, &[0]));
    assert_eq!(forward_steps(&formula), vec![
        step(root, Phase::Left, 0),
        step(five, Phase::Middle, 0),
        step(root, Phase::Right, 1),
    ]);

    let formula = func!("f", num!(1), num!(2), num!(3));
    let root = formula.root();
    let phases = forward_steps(&formula).into_iter()
        .filter(|s| s.node == root)
        .map(|s| (s.phase, s.gap))
        .collect::<Vec<_>>();
    assert_eq!(phases, vec![(Phase::Left, 0), (Phase::Middle, 1), (Phase::Middle, 2), (Phase::Right, 3)]);

    let formula = func!("f");
    let root = formula.root();
    assert_eq!(forward_steps(&formula), vec![step(root, Phase::Left, 0), step(root, Phase::Right, 0)]);

    let formula = num!(1);
    assert_eq!(forward_steps(&formula), vec![step(formula.root(), Phase::Middle, 0)]);
}

#[test]
fn test_traversal_is_deterministic_and_reversible() {
    let formula = complex_formula();

    let first = forward_steps(&formula);
    assert_eq!(first, forward_steps(&formula));
    assert_eq!(first.len(), 19);

    let mut backward = backward_steps(&formula);
    backward.reverse();
    assert_eq!(first, backward);
}

#[test]
fn test_next_then_previous_returns_same_node() {
    let formula = complex_formula();
    let mut iter = NodeIterator::new(&formula);

    iter.next();
    iter.next();
    let node = iter.next();
    assert_eq!(iter.previous(), node);
    assert_eq!(iter.next(), node);

    // Turning around at a container reports the same phase
    iter.to_front();
    let step = iter.next_step();
    assert_eq!(iter.previous_step(), step);
    assert_eq!(iter.phase(), Some(Phase::Left));
}

#[test]
fn test_wraparound() {
    let formula = add!(num!(1), num!(2));
    let root = formula.root();
    let mut iter = NodeIterator::new(&formula);

    assert!(!iter.has_previous());
    assert!(iter.has_next());

    // Past the front is the last step
    assert_eq!(iter.previous_step(), step(root, Phase::Right, 2));
    assert!(iter.has_next());
    assert!(iter.has_previous());

    iter.to_back();
    assert!(!iter.has_next());
    assert_eq!(iter.next_step(), step(root, Phase::Left, 0));
    assert!(iter.has_previous());
    assert_eq!(iter.next(), at(&formula, &[0]));
}

#[test]
fn test_peek() {
    let formula = add!(num!(1), num!(2));
    let root = formula.root();
    let one = at(&formula, &[0]);
    let mut iter = NodeIterator::new(&formula);

    assert_eq!(iter.peek_next(), root);
    assert_eq!(iter.peek_previous(), root);

    iter.next();
    assert_eq!(iter.peek_next(), one);
    assert_eq!(iter.peek_previous_step(), step(root, Phase::Left, 0));

    // Peeking does not move
    assert_eq!(iter.next(), one);
    assert_eq!(iter.node(), Some(one));
}

#[test]
fn test_find() {
    init_tracing();

    let formula = complex_formula();
    let plus = at(&formula, &[0, 0, 1, 0]);
    let mut iter = NodeIterator::new(&formula);

    assert!(iter.find_next(NodeType::Plus));
    assert_eq!(iter.previous(), plus);
    assert_eq!(iter.phase(), Some(Phase::Left));

    iter.to_back();
    assert!(iter.find_previous(NodeType::Variable));
    assert_eq!(iter.next(), at(&formula, &[0, 0, 0]));

    // Not found: ends up at the back
    iter.to_front();
    assert!(!iter.find_next(NodeType::Sqrt));
    assert!(!iter.has_next());
    assert!(iter.has_previous());

    assert!(!iter.find_previous(NodeType::Root));
    assert!(!iter.has_previous());
}

#[test]
fn test_sub_index_count() {
    let formula = add!(func!("sin", var!(x)), num!(3.25));
    let function = at(&formula, &[0]);

    let counts = formula.steps().into_iter()
        .map(|s| formula.sub_index_count(s))
        .collect::<Vec<_>>();
    // +L  sin(L  x  sin(R  +M  3.25  +R
    assert_eq!(counts, vec![0, 3, 1, 0, 0, 4, 0]);

    let right = formula.enter(function, false);
    assert_eq!(formula.sub_index_count(right), 0);
}

#[test]
fn test_stale_steps_end_the_walk() {
    let mut formula = add!(num!(1), num!(2));
    let one = at(&formula, &[0]);
    formula.delete(one).unwrap();

    let stale = step(one, Phase::Middle, 0);
    assert_eq!(formula.step_after(stale), None);
    assert_eq!(formula.step_before(stale), None);
}

use rstest::rstest;

use crate::{Formula, NodeIterator, NodeKind, NodeType, Variable};
use super::util::{assert_links_consistent, at, init_tracing};

/// Reads kernel syntax back into a formula, so that rendering can be checked against parsing.
/// Explicit parentheses become parenthesis nodes.
struct Parser {
    chars: Vec<char>,
    index: usize,
}

fn parse(input: &str) -> Option<Formula> {
    Parser { chars: input.chars().collect(), index: 0 }.parse()
}

impl Parser {
    fn parse(&mut self) -> Option<Formula> {
        let result = self.parse_level1()?;

        // Leftover input is an error
        if self.eoi() { Some(result) } else { None }
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn eoi(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn expect(&mut self, c: char) -> Option<()> {
        if self.current() == Some(c) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    fn binary(node_type: NodeType, left: Formula, right: Formula) -> Option<Formula> {
        Formula::compose(node_type.into(), vec![left, right]).ok()
    }

    fn parse_level1(&mut self) -> Option<Formula> {
        let mut out = self.parse_level2()?;

        while let Some(op @ ('+' | '-')) = self.current() {
            self.advance();
            let node_type = if op == '+' { NodeType::Plus } else { NodeType::Minus };
            out = Self::binary(node_type, out, self.parse_level2()?)?;
        }

        Some(out)
    }

    fn parse_level2(&mut self) -> Option<Formula> {
        let mut out = self.parse_level3()?;

        while let Some(op @ ('*' | '/')) = self.current() {
            self.advance();
            let node_type = if op == '*' { NodeType::Multiplication } else { NodeType::Division };
            out = Self::binary(node_type, out, self.parse_level3()?)?;
        }

        Some(out)
    }

    fn parse_level3(&mut self) -> Option<Formula> {
        if self.current() == Some('-') {
            self.advance();
            let operand = self.parse_level3()?;
            return Formula::compose(NodeType::UnaryMinus.into(), vec![operand]).ok();
        }

        self.parse_level4()
    }

    /// An atom, possibly raised to a power. Powers are right-associative and their exponent may be
    /// negated.
    fn parse_level4(&mut self) -> Option<Formula> {
        let base = self.parse_atom()?;

        if self.current() == Some('^') {
            self.advance();
            let exponent = self.parse_level3()?;
            return Self::binary(NodeType::Exponent, base, exponent);
        }

        Some(base)
    }

    fn parse_atom(&mut self) -> Option<Formula> {
        let c = self.current()?;

        if c == '(' {
            self.advance();
            let inner = self.parse_level1()?;
            self.expect(')')?;
            return Formula::compose(NodeType::Parenthesis.into(), vec![inner]).ok();
        }

        if c.is_ascii_digit() || c == '.' {
            let text = self.take_while(|c| c.is_ascii_digit() || c == '.');
            return Some(Formula::from_kind(NodeKind::number(&text)));
        }

        if c.is_alphabetic() || c == '_' {
            let name = self.take_while(|c| c.is_alphanumeric() || c == '_');
            if self.current() != Some('(') {
                return Some(Formula::from_kind(NodeKind::Variable(Variable::from_stuffed(&name))));
            }
            self.advance();

            if name == "sqrt" {
                let inner = self.parse_level1()?;
                self.expect(')')?;
                return Formula::compose(NodeType::Sqrt.into(), vec![inner]).ok();
            }

            let mut arguments = vec![];
            if self.current() != Some(')') {
                arguments.push(self.parse_level1()?);
                while self.current() == Some(',') {
                    self.advance();
                    arguments.push(self.parse_level1()?);
                }
            }
            self.expect(')')?;
            return Formula::compose(NodeKind::function(&name), arguments).ok();
        }

        None
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.current().filter(|&c| accept(c)) {
            text.push(c);
            self.advance();
        }
        text
    }
}

#[rstest]
#[case("3.452")]
#[case("1+2*x")]
#[case("2*(1+3)")]
#[case("f(1,((y)),a+2)")]
#[case("(1+2)+3")]
#[case("1-2-3")]
#[case("x--4")]
#[case("x^2")]
#[case("2^3^4")]
#[case("-x^2")]
#[case("sqrt(x)")]
#[case("x_1i")]
#[case("name(3,(5),6,7)+8")]
#[case("g()")]
fn test_render_then_parse(#[case] input: &str) {
    let formula = parse(input).unwrap();
    assert_eq!(kernel!(formula), input);
    assert_eq!(parse(&kernel!(formula)).unwrap(), formula);
}

#[test]
fn test_parsed_structure() {
    init_tracing();

    assert_eq!(parse("1-2-3").unwrap(), sub!(sub!(num!(1), num!(2)), num!(3)));
    assert_eq!(parse("2^3^4").unwrap(), pow!(num!(2), pow!(num!(3), num!(4))));
    assert_eq!(parse("1+2*x").unwrap(), add!(num!(1), mul!(num!(2), var!(x))));

    // A negative exponent needs parentheses once rendered
    let formula = parse("x^-2").unwrap();
    assert_eq!(formula, pow!(var!(x), neg!(num!(2))));
    assert_eq!(kernel!(formula), "x^(-2)");
    assert_eq!(parse("x^(-2)").unwrap(), pow!(var!(x), paren!(neg!(num!(2)))));
}

#[rstest]
#[case("")]
#[case("1+")]
#[case("(1")]
#[case("1)")]
#[case("f(1,")]
#[case("*2")]
fn test_parse_rejects(#[case] input: &str) {
    assert_eq!(parse(input), None);
}

#[test]
fn test_graft_parsed_result() {
    let mut formula = add!(func!("f", empty!()), num!(1));
    let placeholder = at(&formula, &[0, 0]);
    let parsed = parse("a*(b-c)").unwrap();

    let mut iter = NodeIterator::new(&mut formula);
    let grafted = iter.graft(placeholder, &parsed).unwrap();
    assert_eq!(iter.formula().parent(grafted), Some(at(iter.formula(), &[0])));

    let formula = iter.into_inner();
    assert_eq!(kernel!(formula), "f(a*(b-c))+1");
    assert_links_consistent(formula);
}

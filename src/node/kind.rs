//! Node discriminants and the payload each kind of node carries.

/// The discriminant of a node. Used wherever a kind of node is named without its payload, for
/// example when searching the tree or asking an iterator to create a node.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum NodeType {
    /// A placeholder which marks a slot still waiting for user input.
    Empty,

    /// A number literal, kept as text.
    Number,

    /// A variable name, optionally with a subscript.
    Variable,

    /// Explicit parentheses around one child.
    Parenthesis,

    /// A square root of one child.
    Sqrt,

    /// A negation of one child.
    UnaryMinus,

    Plus,
    Minus,
    Multiplication,
    Division,
    Exponent,

    /// An n-th root. The left slot is the radicand, the right slot the index.
    Root,

    /// A named function call, with one slot per argument.
    Function,

    /// A bare list of arguments, as produced when parsing a call before it is attached to a
    /// function.
    ArgumentList,
}

/// How many child slots a node of some type has.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum Arity {
    Leaf,
    Unary,
    Binary,
    Flex,
}

impl NodeType {
    pub fn arity(&self) -> Arity {
        match self {
            Self::Empty | Self::Number | Self::Variable => Arity::Leaf,
            Self::Parenthesis | Self::Sqrt | Self::UnaryMinus => Arity::Unary,
            Self::Plus | Self::Minus | Self::Multiplication | Self::Division | Self::Exponent
                | Self::Root => Arity::Binary,
            Self::Function | Self::ArgumentList => Arity::Flex,
        }
    }

    /// The number of slots a freshly created node of this type starts with. Flex nodes start with
    /// a single argument slot.
    pub fn initial_slots(&self) -> usize {
        match self.arity() {
            Arity::Leaf => 0,
            Arity::Unary | Arity::Flex => 1,
            Arity::Binary => 2,
        }
    }

    pub fn is_container(&self) -> bool {
        self.arity() != Arity::Leaf
    }

    /// Operations are containers which express a mathematical operation. Parentheses and bare
    /// argument lists only group other nodes, so they are containers but not operations.
    pub fn is_operation(&self) -> bool {
        self.is_container() && !matches!(self, Self::Parenthesis | Self::ArgumentList)
    }

    /// Binding strength of operators written infix (or prefix, for `UnaryMinus`). Returns `None`
    /// for everything which brings its own delimiters or is a leaf.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Self::Plus | Self::Minus => Some(1),
            Self::Multiplication | Self::Division => Some(2),
            Self::UnaryMinus => Some(3),
            Self::Exponent => Some(4),
            _ => None,
        }
    }

    /// Creates the default payload for a node of this type. Text payloads start empty.
    pub fn default_kind(&self) -> NodeKind {
        match self {
            Self::Empty => NodeKind::Empty,
            Self::Number => NodeKind::Number(String::new()),
            Self::Variable => NodeKind::Variable(Variable::default()),
            Self::Parenthesis => NodeKind::Parenthesis,
            Self::Sqrt => NodeKind::Sqrt,
            Self::UnaryMinus => NodeKind::UnaryMinus,
            Self::Plus => NodeKind::Plus,
            Self::Minus => NodeKind::Minus,
            Self::Multiplication => NodeKind::Multiplication,
            Self::Division => NodeKind::Division,
            Self::Exponent => NodeKind::Exponent,
            Self::Root => NodeKind::Root,
            Self::Function => NodeKind::Function(String::new()),
            Self::ArgumentList => NodeKind::ArgumentList,
        }
    }
}

/// A variable name with an optional subscript.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Variable {
    pub name: String,
    pub subscript: Option<String>,
}

impl Variable {
    /// Separates name and subscript in the kernel representation.
    pub const SUBSCRIPT_SEPARATOR: &'static str = "_1";

    pub fn new(name: &str) -> Self {
        Self { name: name.into(), subscript: None }
    }

    pub fn with_subscript(name: &str, subscript: &str) -> Self {
        Self { name: name.into(), subscript: Some(subscript.into()) }
    }

    /// The name as the kernel sees it. Underscores in the name are doubled so that the
    /// subscript separator can never be confused with name text.
    ///
    /// ```
    /// # use eqtree::node::Variable;
    /// assert_eq!(Variable::with_subscript("x_a", "i").stuffed(), "x__a_1i");
    /// ```
    pub fn stuffed(&self) -> String {
        let mut result = self.name.replace('_', "__");
        if let Some(sub) = &self.subscript {
            result.push_str(Self::SUBSCRIPT_SEPARATOR);
            result.push_str(sub);
        }
        result
    }

    /// Inverse of [stuffed](Variable::stuffed).
    pub fn from_stuffed(stuffed: &str) -> Self {
        let mut name = String::new();
        let mut chars = stuffed.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '_' {
                name.push(c);
                continue;
            }

            match chars.peek() {
                Some('_') => {
                    chars.next();
                    name.push('_');
                }
                Some('1') => {
                    chars.next();
                    return Self { name, subscript: Some(chars.collect()) };
                }
                _ => name.push('_'),
            }
        }

        Self { name, subscript: None }
    }

    /// Number of characters the user can place a cursor between.
    pub fn char_count(&self) -> usize {
        self.name.chars().count() + self.subscript.as_ref().map_or(0, |s| s.chars().count())
    }
}

/// The payload of a node. The discriminant of this enum is the node's [NodeType].
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum NodeKind {
    Empty,
    Number(String),
    Variable(Variable),
    Parenthesis,
    Sqrt,
    UnaryMinus,
    Plus,
    Minus,
    Multiplication,
    Division,
    Exponent,
    Root,
    Function(String),
    ArgumentList,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Empty => NodeType::Empty,
            Self::Number(_) => NodeType::Number,
            Self::Variable(_) => NodeType::Variable,
            Self::Parenthesis => NodeType::Parenthesis,
            Self::Sqrt => NodeType::Sqrt,
            Self::UnaryMinus => NodeType::UnaryMinus,
            Self::Plus => NodeType::Plus,
            Self::Minus => NodeType::Minus,
            Self::Multiplication => NodeType::Multiplication,
            Self::Division => NodeType::Division,
            Self::Exponent => NodeType::Exponent,
            Self::Root => NodeType::Root,
            Self::Function(_) => NodeType::Function,
            Self::ArgumentList => NodeType::ArgumentList,
        }
    }

    /// Shorthand for a number literal.
    pub fn number(text: &str) -> Self {
        Self::Number(text.into())
    }

    /// Shorthand for a variable without subscript.
    pub fn variable(name: &str) -> Self {
        Self::Variable(Variable::new(name))
    }

    /// Shorthand for a function with the given name.
    pub fn function(name: &str) -> Self {
        Self::Function(name.into())
    }
}

impl From<NodeType> for NodeKind {
    fn from(node_type: NodeType) -> Self {
        node_type.default_kind()
    }
}

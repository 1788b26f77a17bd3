//! AST (Abstract Syntax Tree) definitions for parsed expressions
//!
//! The tree is built bottom-up by the parser and handed to the caller, who
//! owns it from then on. Nodes own their children through `Box`; there is no
//! sharing between subtrees.

use crate::parser::lexer::Operator;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Byte offset into the source string
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// Numeric literal value. Integers and reals stay distinct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i64),
    Real(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            // Debug keeps a '.' or an exponent, so the text re-lexes as a real
            Literal::Real(x) => write!(f, "{:?}", x),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Plus => Some(BinOp::Add),
            Operator::Minus => Some(BinOp::Sub),
            Operator::Star => Some(BinOp::Mul),
            Operator::Slash => Some(BinOp::Div),
            Operator::Caret => Some(BinOp::Pow),
            Operator::Bang => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }
}

/// Prefix unary operators: a sign, or a named function applied to its operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Plus,
    Minus,
    Apply(String),
}

impl PrefixOp {
    pub fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Plus => Some(PrefixOp::Plus),
            Operator::Minus => Some(PrefixOp::Minus),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            PrefixOp::Plus => "+",
            PrefixOp::Minus => "-",
            PrefixOp::Apply(name) => name,
        }
    }
}

/// Postfix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Factorial, // x!
}

impl PostfixOp {
    pub fn from_operator(op: Operator) -> Option<Self> {
        match op {
            Operator::Bang => Some(PostfixOp::Factorial),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOp::Factorial => "!",
        }
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Variable(char),
    UnaryPrefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    UnaryPostfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn integer(value: i64) -> Self {
        Expr::Literal(Literal::Integer(value))
    }

    pub fn real(value: f64) -> Self {
        Expr::Literal(Literal::Real(value))
    }

    pub fn variable(name: char) -> Self {
        Expr::Variable(name)
    }

    pub fn prefix(op: PrefixOp, operand: Expr) -> Self {
        Expr::UnaryPrefix {
            op,
            operand: Box::new(operand),
        }
    }

    /// Function application: `name operand`
    pub fn apply(name: impl Into<String>, operand: Expr) -> Self {
        Expr::prefix(PrefixOp::Apply(name.into()), operand)
    }

    pub fn postfix(op: PostfixOp, operand: Expr) -> Self {
        Expr::UnaryPostfix {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Literals and variables
    pub fn is_atom(&self) -> bool {
        matches!(self, Expr::Literal(_) | Expr::Variable(_))
    }

    /// Height of the tree; an atom has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Literal(_) | Expr::Variable(_) => 1,
            Expr::UnaryPrefix { operand, .. } | Expr::UnaryPostfix { operand, .. } => {
                1 + operand.depth()
            }
            Expr::BinaryOp { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Expr::Literal(_) | Expr::Variable(_) => 1,
            Expr::UnaryPrefix { operand, .. } | Expr::UnaryPostfix { operand, .. } => {
                1 + operand.node_count()
            }
            Expr::BinaryOp { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Short description of this node alone, used by the tree outline.
    pub fn label(&self) -> String {
        match self {
            Expr::Literal(Literal::Integer(n)) => format!("Integer {}", n),
            Expr::Literal(Literal::Real(x)) => format!("Real {:?}", x),
            Expr::Variable(name) => format!("Variable {}", name),
            Expr::UnaryPrefix {
                op: PrefixOp::Apply(name),
                ..
            } => format!("Apply {}", name),
            Expr::UnaryPrefix { op, .. } => format!("Prefix {}", op.symbol()),
            Expr::UnaryPostfix { op, .. } => format!("Postfix {}", op.symbol()),
            Expr::BinaryOp { op, .. } => format!("Binary {}", op.symbol()),
        }
    }

    /// Indented outline of the tree, one node per line.
    ///
    /// ```text
    /// Binary +
    /// ├── Integer 2
    /// └── Binary *
    ///     ├── Integer 3
    ///     └── Integer 4
    /// ```
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label());
        out.push('\n');
        self.write_children(&mut out, "");
        out
    }

    fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Literal(_) | Expr::Variable(_) => Vec::new(),
            Expr::UnaryPrefix { operand, .. } | Expr::UnaryPostfix { operand, .. } => {
                vec![operand]
            }
            Expr::BinaryOp { left, right, .. } => vec![left, right],
        }
    }

    fn write_children(&self, out: &mut String, indent: &str) {
        let children = self.children();
        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate() {
            let (branch, continuation) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            out.push_str(indent);
            out.push_str(branch);
            out.push_str(&child.label());
            out.push('\n');
            child.write_children(out, &format!("{}{}", indent, continuation));
        }
    }
}

/// Renders the expression as infix text that parses back to an equal tree.
///
/// Compound operands are always parenthesized, so the output does not depend
/// on the precedence table. Negative literals built by hand render as a sign
/// applied to a literal and therefore do not round-trip.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::UnaryPrefix {
                op: PrefixOp::Apply(name),
                operand,
            } => {
                write!(f, "{} ", name)?;
                write_operand(f, operand)
            }
            Expr::UnaryPrefix { op, operand } => {
                write!(f, "{}", op.symbol())?;
                write_operand(f, operand)
            }
            Expr::UnaryPostfix { op, operand } => {
                write_operand(f, operand)?;
                write!(f, "{}", op.symbol())
            }
            Expr::BinaryOp { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    if expr.is_atom() {
        write!(f, "{}", expr)
    } else {
        write!(f, "({})", expr)
    }
}

//! Nested-sequence form of the tree
//!
//! Older consumers of this parser expect a generic nested list instead of a
//! typed tree:
//!
//! - binary node: `[left, op, right]`
//! - prefix node: `[op, operand]` (`op` is a sign or a function name)
//! - postfix node: `[operand, op]`
//! - literal or variable: the bare value
//!
//! [`Nested`] serializes to JSON as plain arrays, numbers and strings, so
//! `2 + 3 * 4` becomes `[2,"+",[3,"*",4]]`. Its `Display` impl prints the
//! list-literal form `[2, '+', [3, '*', 4]]`.

use crate::parser::ast::{BinOp, Expr, Literal, PostfixOp, PrefixOp};
use crate::parser::lexer::{is_name, Operator};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Atom {
    Integer(i64),
    Real(f64),
    /// Operator symbol, function name, or variable name
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested {
    Atom(Atom),
    Seq(Vec<Nested>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NestedError {
    #[error("'{0}' is not a variable name")]
    InvalidAtom(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("a sequence of {0} elements is not an expression")]
    InvalidShape(usize),
}

impl Nested {
    fn symbol(text: &str) -> Self {
        Nested::Atom(Atom::Symbol(text.to_string()))
    }

    fn as_symbol(&self) -> Option<&str> {
        match self {
            Nested::Atom(Atom::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    /// Rebuild the typed tree.
    ///
    /// Two-element sequences are read as postfix when the second element is
    /// `!`, otherwise as prefix.
    pub fn to_expr(&self) -> Result<Expr, NestedError> {
        match self {
            Nested::Atom(Atom::Integer(n)) => Ok(Expr::integer(*n)),
            Nested::Atom(Atom::Real(x)) => Ok(Expr::real(*x)),
            Nested::Atom(Atom::Symbol(name)) => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(Expr::variable(ch)),
                    _ => Err(NestedError::InvalidAtom(name.clone())),
                }
            }
            Nested::Seq(items) => match items.as_slice() {
                [left, op, right] => {
                    let symbol = op
                        .as_symbol()
                        .ok_or(NestedError::InvalidShape(items.len()))?;
                    let op = Operator::from_symbol(symbol)
                        .and_then(BinOp::from_operator)
                        .ok_or_else(|| NestedError::UnknownOperator(symbol.to_string()))?;
                    Ok(Expr::binary(op, left.to_expr()?, right.to_expr()?))
                }
                [operand, op] if op.as_symbol() == Some(PostfixOp::Factorial.symbol()) => {
                    Ok(Expr::postfix(PostfixOp::Factorial, operand.to_expr()?))
                }
                [op, operand] => {
                    let symbol = op
                        .as_symbol()
                        .ok_or(NestedError::InvalidShape(items.len()))?;
                    let op = match Operator::from_symbol(symbol) {
                        Some(op) => PrefixOp::from_operator(op)
                            .ok_or_else(|| NestedError::UnknownOperator(symbol.to_string()))?,
                        None if is_name(symbol) => PrefixOp::Apply(symbol.to_string()),
                        None => return Err(NestedError::UnknownOperator(symbol.to_string())),
                    };
                    Ok(Expr::prefix(op, operand.to_expr()?))
                }
                _ => Err(NestedError::InvalidShape(items.len())),
            },
        }
    }
}

impl fmt::Display for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Atom(Atom::Integer(n)) => write!(f, "{}", n),
            Nested::Atom(Atom::Real(x)) => write!(f, "{:?}", x),
            Nested::Atom(Atom::Symbol(s)) => write!(f, "'{}'", s),
            Nested::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl Expr {
    pub fn to_nested(&self) -> Nested {
        match self {
            Expr::Literal(Literal::Integer(n)) => Nested::Atom(Atom::Integer(*n)),
            Expr::Literal(Literal::Real(x)) => Nested::Atom(Atom::Real(*x)),
            Expr::Variable(name) => Nested::Atom(Atom::Symbol(name.to_string())),
            Expr::UnaryPrefix { op, operand } => {
                Nested::Seq(vec![Nested::symbol(op.symbol()), operand.to_nested()])
            }
            Expr::UnaryPostfix { op, operand } => {
                Nested::Seq(vec![operand.to_nested(), Nested::symbol(op.symbol())])
            }
            Expr::BinaryOp { op, left, right } => Nested::Seq(vec![
                left.to_nested(),
                Nested::symbol(op.symbol()),
                right.to_nested(),
            ]),
        }
    }
}

/// Serializes as the nested-sequence form.
impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_nested().serialize(serializer)
    }
}

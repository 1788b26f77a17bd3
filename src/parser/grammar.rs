//! Operator precedence table
//!
//! A [`Grammar`] is an ordered list of [`Level`]s, tightest-binding first. The
//! parser walks the list from the loosest level inward, so reordering levels
//! or changing their fixity changes how expressions group without touching the
//! parser itself.
//!
//! The standard table:
//!
//! | Level | Operators              | Fixity  | Associativity |
//! |-------|------------------------|---------|---------------|
//! | 1     | identifier application | prefix  | right         |
//! | 2     | `!`                    | postfix | left          |
//! | 3     | `^`                    | infix   | right         |
//! | 4     | `+` `-` (sign)         | prefix  | right         |
//! | 5     | `*` `/`                | infix   | left          |
//! | 6     | `+` `-`                | infix   | left          |
//!
//! Function application binds tighter than factorial (`sin x!` is
//! `(sin x)!`) and the sign binds looser than `^` (`-2^2` is `-(2^2)`).

use super::ast::{BinOp, PostfixOp, PrefixOp};
use super::lexer::{Operator, Token, TokenKind};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// Operator before its operand; chains nest to the right
    Prefix,
    /// Operator after its operand; chains nest to the left
    Postfix,
    Infix(Assoc),
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fixity::Prefix => write!(f, "prefix"),
            Fixity::Postfix => write!(f, "postfix"),
            Fixity::Infix(Assoc::Left) => write!(f, "left-associative infix"),
            Fixity::Infix(Assoc::Right) => write!(f, "right-associative infix"),
        }
    }
}

/// The operators recognized at one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorSet {
    /// Any bare name used as a function: an identifier, or a one-letter
    /// variable token in operator position
    Identifier,
    Symbols(Vec<Operator>),
}

impl OperatorSet {
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            OperatorSet::Identifier => {
                matches!(token.kind, TokenKind::Identifier | TokenKind::Variable)
            }
            OperatorSet::Symbols(ops) => token.operator().is_some_and(|op| ops.contains(&op)),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, OperatorSet::Symbols(ops) if ops.is_empty())
    }
}

/// One row of the precedence table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    operators: OperatorSet,
    fixity: Fixity,
}

impl Level {
    pub fn new(operators: OperatorSet, fixity: Fixity) -> Self {
        Self { operators, fixity }
    }

    /// `name operand`
    pub fn application() -> Self {
        Self::new(OperatorSet::Identifier, Fixity::Prefix)
    }

    pub fn prefix(ops: &[Operator]) -> Self {
        Self::new(OperatorSet::Symbols(ops.to_vec()), Fixity::Prefix)
    }

    pub fn postfix(ops: &[Operator]) -> Self {
        Self::new(OperatorSet::Symbols(ops.to_vec()), Fixity::Postfix)
    }

    pub fn infix_left(ops: &[Operator]) -> Self {
        Self::new(OperatorSet::Symbols(ops.to_vec()), Fixity::Infix(Assoc::Left))
    }

    pub fn infix_right(ops: &[Operator]) -> Self {
        Self::new(OperatorSet::Symbols(ops.to_vec()), Fixity::Infix(Assoc::Right))
    }

    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    pub fn fixity(&self) -> Fixity {
        self.fixity
    }

    pub fn associativity(&self) -> Assoc {
        match self.fixity {
            Fixity::Prefix => Assoc::Right,
            Fixity::Postfix => Assoc::Left,
            Fixity::Infix(assoc) => assoc,
        }
    }

    fn accepts(&self, op: Operator) -> bool {
        match self.fixity {
            Fixity::Prefix => PrefixOp::from_operator(op).is_some(),
            Fixity::Postfix => PostfixOp::from_operator(op).is_some(),
            Fixity::Infix(_) => BinOp::from_operator(op).is_some(),
        }
    }
}

/// Precedence table validation errors. Levels are numbered from 1, tightest first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("precedence table has no levels")]
    Empty,

    #[error("level {level} has no operators")]
    EmptyLevel { level: usize },

    #[error("level {level}: '{symbol}' cannot be used as a {fixity} operator")]
    InvalidOperator {
        level: usize,
        symbol: &'static str,
        fixity: Fixity,
    },

    #[error("level {level}: function application must be prefix, not {fixity}")]
    ApplicationNotPrefix { level: usize, fixity: Fixity },
}

/// Ordered precedence table, tightest-binding level first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    levels: Vec<Level>,
}

impl Grammar {
    /// Build a table from levels listed tightest first.
    pub fn new(levels: Vec<Level>) -> Result<Self, GrammarError> {
        if levels.is_empty() {
            return Err(GrammarError::Empty);
        }

        for (i, level) in levels.iter().enumerate() {
            let number = i + 1;
            if level.operators.is_empty() {
                return Err(GrammarError::EmptyLevel { level: number });
            }
            match &level.operators {
                OperatorSet::Identifier if level.fixity != Fixity::Prefix => {
                    return Err(GrammarError::ApplicationNotPrefix {
                        level: number,
                        fixity: level.fixity,
                    });
                }
                OperatorSet::Identifier => {}
                OperatorSet::Symbols(ops) => {
                    if let Some(op) = ops.iter().find(|op| !level.accepts(**op)) {
                        return Err(GrammarError::InvalidOperator {
                            level: number,
                            symbol: op.symbol(),
                            fixity: level.fixity,
                        });
                    }
                }
            }
        }

        Ok(Self { levels })
    }

    /// The six-level table described in the module docs.
    pub fn standard() -> Self {
        Self {
            levels: vec![
                Level::application(),
                Level::postfix(&[Operator::Bang]),
                Level::infix_right(&[Operator::Caret]),
                Level::prefix(&[Operator::Plus, Operator::Minus]),
                Level::infix_left(&[Operator::Star, Operator::Slash]),
                Level::infix_left(&[Operator::Plus, Operator::Minus]),
            ],
        }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Index of the loosest level, where a full expression starts
    pub fn loosest(&self) -> usize {
        self.levels.len() - 1
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::SourceLocation;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, SourceLocation::default())
    }

    #[test]
    fn test_standard_table_shape() {
        let grammar = Grammar::standard();
        let levels = grammar.levels();
        assert_eq!(levels.len(), 6);
        assert_eq!(grammar.loosest(), 5);
        assert_eq!(levels[0].operators(), &OperatorSet::Identifier);
        assert_eq!(levels[1].associativity(), Assoc::Left);
        assert_eq!(levels[2].associativity(), Assoc::Right);
        assert_eq!(levels[3].fixity(), Fixity::Prefix);
        assert_eq!(levels[5].fixity(), Fixity::Infix(Assoc::Left));
        assert_eq!(Grammar::default(), grammar);
    }

    #[test]
    fn test_standard_table_validates() {
        let grammar = Grammar::standard();
        assert_eq!(Grammar::new(grammar.levels().to_vec()), Ok(grammar));
    }

    #[test]
    fn test_operator_set_matching() {
        let names = OperatorSet::Identifier;
        assert!(names.matches(&token(TokenKind::Identifier, "sin")));
        assert!(names.matches(&token(TokenKind::Variable, "f")));
        assert!(!names.matches(&token(TokenKind::Integer, "1")));

        let signs = OperatorSet::Symbols(vec![Operator::Plus, Operator::Minus]);
        assert!(signs.matches(&token(TokenKind::Operator, "-")));
        assert!(!signs.matches(&token(TokenKind::Operator, "*")));
        assert!(!signs.matches(&token(TokenKind::Variable, "x")));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert_eq!(Grammar::new(Vec::new()), Err(GrammarError::Empty));
    }

    #[test]
    fn test_rejects_empty_level() {
        let err = Grammar::new(vec![Level::infix_left(&[])]).unwrap_err();
        assert_eq!(err, GrammarError::EmptyLevel { level: 1 });
    }

    #[test]
    fn test_rejects_operator_with_wrong_fixity() {
        let err = Grammar::new(vec![
            Level::postfix(&[Operator::Bang]),
            Level::prefix(&[Operator::Star]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            GrammarError::InvalidOperator {
                level: 2,
                symbol: "*",
                fixity: Fixity::Prefix,
            }
        );
        assert_eq!(
            err.to_string(),
            "level 2: '*' cannot be used as a prefix operator"
        );

        assert!(Grammar::new(vec![Level::infix_left(&[Operator::Bang])]).is_err());
    }

    #[test]
    fn test_rejects_postfix_application() {
        let level = Level::new(OperatorSet::Identifier, Fixity::Postfix);
        assert_eq!(
            Grammar::new(vec![level]),
            Err(GrammarError::ApplicationNotPrefix {
                level: 1,
                fixity: Fixity::Postfix,
            })
        );
    }
}

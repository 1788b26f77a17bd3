//! # Introduction
//!
//! exprtree turns an infix math expression such as `sin x! + 2^3^2` into a
//! typed syntax tree. The tree can be rendered back to infix text, printed as
//! an outline, or serialized to the nested-list form older consumers expect.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser (precedence table + packrat cache) → Expr
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the AST.
//! 2. [`nested`]: the `[left, op, right]` compatibility form, with serde support.
//! 3. [`ui`]: ratatui-based expression explorer; not part of the stable library API.
//!
//! ## Precedence
//!
//! Tightest first: function application (`sin x`), factorial (`!`), power
//! (`^`, right-associative), sign (`+x`, `-x`), `*` `/`, then `+` `-`. Note
//! that `sin x!` is `(sin x)!` and `-2^2` is `-(2^2)`. A custom table can be
//! supplied through [`Grammar::new`] and [`parse_expression_with`].
//!
//! Parsing is a pure function of its input; concurrent calls share nothing.

pub mod error;
pub mod logging;
pub mod nested;
pub mod parser;
pub mod ui;

pub use error::{Error, ErrorKind};
pub use nested::{Atom, Nested, NestedError};
pub use parser::ast::{BinOp, Expr, Literal, PostfixOp, PrefixOp, SourceLocation};
pub use parser::grammar::{Assoc, Fixity, Grammar, GrammarError, Level, OperatorSet};
pub use parser::lexer::{tokenize, LexError, Operator, Token, TokenKind};
pub use parser::parse::{ParseError, Parser, MAX_DEPTH};

/// Parse `expression` with the standard precedence table.
pub fn parse_expression(expression: &str) -> Result<Expr, Error> {
    parse_expression_with(expression, &Grammar::standard())
}

/// Parse `expression` with a caller-supplied precedence table.
pub fn parse_expression_with(expression: &str, grammar: &Grammar) -> Result<Expr, Error> {
    log::debug!("parsing {:?}", expression);
    let mut parser = Parser::new(expression, grammar)?;
    Ok(parser.parse()?)
}

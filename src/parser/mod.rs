//! Infix expression parser
//!
//! This module transforms expression text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`grammar`]: The operator precedence table that drives parsing
//! - [`parse`]: The [`parse::Parser`] and its error type
//! - `expressions`: One precedence-climbing rule per table level
//! - [`memo`]: Per-parse packrat cache and node arena
//! - [`ast`]: AST node definitions and the infix renderer
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing. Each level
//! of the [`grammar::Grammar`] table gets one rule, and every rule is memoized
//! by `(rule, token position)`, so backtracking never re-parses the same span
//! twice. The cache and arena belong to one parse and are dropped with it.

pub mod ast;
mod expressions;
pub mod grammar;
pub mod lexer;
pub mod memo;
pub mod parse;

//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, token helpers, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, helper methods, and coordination
//! - `expressions`: the level-by-level precedence climbing rules
//! - `memo`: the packrat cache and node arena the rules write into
//!
//! Rules may backtrack. When they do, the error reported to the caller is the
//! failure that got furthest into the input, which is almost always the one
//! the user cares about (`2+` reports the missing operand, not the dangling
//! `+`).

use super::ast::{Expr, SourceLocation};
use super::grammar::Grammar;
use super::lexer::{LexError, Lexer, Token, TokenKind};
use super::memo::{MemoStats, MemoTable, NodeArena, NodeId};
use thiserror::Error;

/// Most memoized rules that may be active on the call stack at once.
///
/// Every `(`, sign, application or `^` link costs one rule per table level
/// below it, so with the standard table this allows roughly 55 levels of
/// parentheses. Input nested deeper fails with a [`ParseError`].
pub const MAX_DEPTH: usize = 400;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    /// The construct the parser was looking for
    pub expected: String,
    /// The token actually found, as shown to the user
    pub found: String,
    /// Source text of the offending token (empty at end of input)
    pub found_text: String,
    pub location: SourceLocation,
}

/// Recursive descent parser driven by a [`Grammar`]
pub struct Parser<'g> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) grammar: &'g Grammar,
    pub(crate) memo: MemoTable,
    pub(crate) arena: NodeArena,
    /// Furthest failure seen so far, keyed by token index
    furthest: Option<(usize, ParseError)>,
    /// Memoized rules currently being evaluated
    pub(crate) depth: usize,
    /// Set once [`MAX_DEPTH`] is hit; every later rule fails with it
    pub(crate) too_deep: Option<ParseError>,
}

impl<'g> Parser<'g> {
    /// Tokenize `source` and prepare to parse it.
    pub fn new(source: &str, grammar: &'g Grammar) -> Result<Self, LexError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens, grammar))
    }

    /// Parse an existing token stream. An End token is appended if missing.
    pub fn from_tokens(mut tokens: Vec<Token>, grammar: &'g Grammar) -> Self {
        if !tokens.last().is_some_and(Token::is_end) {
            let location = tokens
                .last()
                .map(|t| {
                    let mut loc = t.location;
                    loc.offset += t.text.len();
                    loc.column += t.text.chars().count();
                    loc
                })
                .unwrap_or(SourceLocation::new(0, 1, 1));
            tokens.push(Token::new(TokenKind::End, "", location));
        }

        Self {
            tokens,
            position: 0,
            grammar,
            memo: MemoTable::default(),
            arena: NodeArena::default(),
            furthest: None,
            depth: 0,
            too_deep: None,
        }
    }

    /// Parse the whole token stream as one expression.
    ///
    /// Fails if any token is left over after the loosest level is done.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        self.position = 0;
        self.depth = 0;
        self.too_deep = None;
        self.furthest = None;
        self.memo = MemoTable::default();
        self.arena = NodeArena::default();
        let loosest = self.grammar.loosest();
        let result = self.parse_level(loosest);

        let stats = self.memo.stats();
        log::debug!(
            "parsed {} tokens: {} memo entries, {} hits, {} misses, {} nodes",
            self.tokens.len(),
            stats.entries,
            stats.hits,
            stats.misses,
            self.arena.len()
        );

        if let Some(err) = self.too_deep.take() {
            log::debug!("nesting limit of {} rules reached", MAX_DEPTH);
            return Err(err);
        }

        let root = match result {
            Ok(root) if self.peek().is_end() => root,
            Ok(_) => {
                let trailing = self.error("operator or end of input");
                return Err(self.prefer_furthest(trailing));
            }
            Err(err) => return Err(self.prefer_furthest(err)),
        };

        self.build(root)
    }

    /// Cache counters for the most recent [`Parser::parse`] call. Each call
    /// starts from an empty cache.
    pub fn memo_stats(&self) -> MemoStats {
        self.memo.stats()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn build(&mut self, root: NodeId) -> Result<Expr, ParseError> {
        match self.arena.build(root) {
            Some(expr) => Ok(expr),
            None => Err(self.error("a complete expression")),
        }
    }

    /// Every failure passes through [`Parser::error`], so the recorded
    /// furthest failure is at or beyond `err`.
    fn prefer_furthest(&self, err: ParseError) -> ParseError {
        match &self.furthest {
            Some((_, furthest)) => furthest.clone(),
            None => err,
        }
    }

    /// Build an error at the current token and remember it if it is the
    /// furthest failure so far.
    pub(crate) fn error(&mut self, expected: &str) -> ParseError {
        self.error_with_note(expected, None)
    }

    /// Like [`Parser::error`], with extra context appended to the message.
    pub(crate) fn error_with_note(&mut self, expected: &str, note: Option<&str>) -> ParseError {
        let token = self.peek();
        let mut message = format!("expected {}, found {}", expected, token);
        if let Some(note) = note {
            message.push(' ');
            message.push_str(note);
        }
        let err = ParseError {
            message,
            expected: expected.to_string(),
            found: token.to_string(),
            found_text: token.text.clone(),
            location: token.location,
        };

        let index = self.position;
        if self.furthest.as_ref().map_or(true, |(i, _)| index > *i) {
            self.furthest = Some((index, err.clone()));
        }
        err
    }

    /// The error for input nested past [`MAX_DEPTH`]. It is not recorded as
    /// a furthest failure; [`Parser::parse`] reports it directly.
    pub(crate) fn nesting_error(&self) -> ParseError {
        let token = self.peek();
        ParseError {
            message: format!("expression nested too deeply at {}", token),
            expected: "shallower nesting".to_string(),
            found: token.to_string(),
            found_text: token.text.clone(),
            location: token.location,
        }
    }

    // Token helpers

    /// Current token. The stream always ends with End, and the parser never
    /// advances past it.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{BinOp, PostfixOp, PrefixOp};
    use crate::parser::grammar::Level;
    use crate::parser::lexer::{tokenize, Operator};

    fn parse(source: &str) -> Result<Expr, ParseError> {
        let grammar = Grammar::standard();
        let mut parser = Parser::new(source, &grammar).unwrap();
        parser.parse()
    }

    #[test]
    fn test_parse_binary_precedence() {
        let expr = parse("1 + 2 * x").unwrap();
        assert_eq!(
            expr,
            Expr::binary(
                BinOp::Add,
                Expr::integer(1),
                Expr::binary(BinOp::Mul, Expr::integer(2), Expr::variable('x')),
            )
        );
    }

    #[test]
    fn test_from_tokens_appends_end() {
        let grammar = Grammar::standard();
        let mut tokens = tokenize("2 ^ 3").unwrap();
        tokens.pop();

        let mut parser = Parser::from_tokens(tokens, &grammar);
        let end = parser.tokens().last().unwrap();
        assert!(end.is_end());
        assert_eq!(end.position(), 5);
        assert_eq!(
            parser.parse().unwrap(),
            Expr::binary(BinOp::Pow, Expr::integer(2), Expr::integer(3))
        );
    }

    #[test]
    fn test_empty_token_stream() {
        let grammar = Grammar::standard();
        let mut parser = Parser::from_tokens(Vec::new(), &grammar);
        let err = parser.parse().unwrap_err();
        assert_eq!(err.found, "end of input");
        assert_eq!(err.expected, "operand");
    }

    #[test]
    fn test_furthest_failure_wins() {
        let err = parse("2+").unwrap_err();
        assert_eq!(err.expected, "operand");
        assert_eq!(err.found, "end of input");
        assert_eq!(err.location.offset, 2);
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse("2 3").unwrap_err();
        assert_eq!(err.expected, "operator or end of input");
        assert_eq!(err.found, "integer 3");
        assert_eq!(err.found_text, "3");
        assert_eq!(err.location.offset, 2);
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse("(2+3").unwrap_err();
        assert_eq!(err.expected, "')'");
        assert_eq!(err.location.offset, 4);
    }

    #[test]
    fn test_error_display() {
        let err = parse(")").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 1: expected operand, found ')'"
        );
    }

    #[test]
    fn test_memo_is_per_parser() {
        let grammar = Grammar::standard();
        let mut first = Parser::new("1+2", &grammar).unwrap();
        first.parse().unwrap();
        let second = Parser::new("1+2", &grammar).unwrap();
        assert!(first.memo_stats().entries > 0);
        assert_eq!(second.memo_stats().entries, 0);
    }

    #[test]
    fn test_custom_grammar() {
        // Conventional ordering: sign binds tighter than '^', factorial
        // tighter than application.
        let grammar = Grammar::new(vec![
            Level::postfix(&[Operator::Bang]),
            Level::application(),
            Level::prefix(&[Operator::Plus, Operator::Minus]),
            Level::infix_right(&[Operator::Caret]),
            Level::infix_left(&[Operator::Star, Operator::Slash]),
            Level::infix_left(&[Operator::Plus, Operator::Minus]),
        ])
        .unwrap();

        let mut parser = Parser::new("-2^2", &grammar).unwrap();
        assert_eq!(
            parser.parse().unwrap(),
            Expr::binary(
                BinOp::Pow,
                Expr::prefix(PrefixOp::Minus, Expr::integer(2)),
                Expr::integer(2),
            )
        );

        let mut parser = Parser::new("sin x!", &grammar).unwrap();
        assert_eq!(
            parser.parse().unwrap(),
            Expr::apply(
                "sin",
                Expr::postfix(PostfixOp::Factorial, Expr::variable('x')),
            )
        );
    }
}

//! Lexer (tokenizer) for infix expressions
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Whitespace is discarded; every other character must belong to a token or
//! lexing fails. The lexer never emits signed numbers: `2-3` is three tokens,
//! and sign handling belongs to the parser's unary rule.

use super::ast::{Literal, SourceLocation};
use std::fmt;
use thiserror::Error;

/// Token classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    Real,
    /// Exactly one letter
    Variable,
    /// Two or more word characters starting with a letter
    Identifier,
    Operator,
    LeftParen,
    RightParen,
    End,
}

/// Single-character operator symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /
    Caret, // ^
    Bang,  // !
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Operator::Plus),
            '-' => Some(Operator::Minus),
            '*' => Some(Operator::Star),
            '/' => Some(Operator::Slash),
            '^' => Some(Operator::Caret),
            '!' => Some(Operator::Bang),
            _ => None,
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::from_char(ch),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Caret => "^",
            Operator::Bang => "!",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A classified lexical unit
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact matched substring (empty for [`TokenKind::End`])
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// Byte offset of the token in the source
    pub fn position(&self) -> usize {
        self.location.offset
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn operator(&self) -> Option<Operator> {
        if self.kind == TokenKind::Operator {
            Operator::from_symbol(&self.text)
        } else {
            None
        }
    }

    /// Numeric value of an integer or real token.
    ///
    /// Returns `None` for other kinds and for values that do not fit
    /// (`i64` overflow, reals overflowing to infinity).
    pub fn literal(&self) -> Option<Literal> {
        match self.kind {
            TokenKind::Integer => self.text.parse::<i64>().ok().map(Literal::Integer),
            TokenKind::Real => self
                .text
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Literal::Real),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Integer => write!(f, "integer {}", self.text),
            TokenKind::Real => write!(f, "real {}", self.text),
            TokenKind::Variable => write!(f, "variable '{}'", self.text),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Operator => write!(f, "operator '{}'", self.text),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::End => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    /// First character that could not be tokenized
    pub offending: char,
    pub location: SourceLocation,
}

/// Characters allowed after the first letter of an identifier
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Whether `text` is a well-formed identifier or variable name
pub(crate) fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(is_word_char),
        _ => false,
    }
}

/// Tokenize `input` in one pass.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

/// Lexer for expression source text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The last token is always [`TokenKind::End`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::End, "", self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let start = self.position;
        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                return Ok(Token::new(TokenKind::End, "", loc));
            }
        };

        match ch {
            '0'..='9' => self.number_literal(start, loc),
            '.' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(start, loc)
            }
            'a'..='z' | 'A'..='Z' => Ok(self.word(start, loc)),
            '(' => {
                self.advance();
                Ok(Token::new(TokenKind::LeftParen, "(", loc))
            }
            ')' => {
                self.advance();
                Ok(Token::new(TokenKind::RightParen, ")", loc))
            }
            _ => match Operator::from_char(ch) {
                Some(op) => {
                    self.advance();
                    Ok(Token::new(TokenKind::Operator, op.symbol(), loc))
                }
                None => Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    offending: ch,
                    location: loc,
                }),
            },
        }
    }

    /// Real or integer literal. Reals need a fractional part, a leading dot,
    /// or an exponent; anything else is an integer.
    fn number_literal(&mut self, start: usize, loc: SourceLocation) -> Result<Token, LexError> {
        let mut kind = TokenKind::Integer;
        self.skip_digits();

        if self.peek() == Some('.') {
            // A leading dot only gets here when a digit follows it
            self.advance();
            self.skip_digits();
            kind = TokenKind::Real;
        }

        if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
            self.advance(); // 'e'
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.skip_digits();
            kind = TokenKind::Real;
        }

        let text: String = self.input[start..self.position].iter().collect();
        let token = Token::new(kind, text, loc);

        if token.literal().is_none() {
            let what = if kind == TokenKind::Integer {
                "Integer"
            } else {
                "Real"
            };
            return Err(LexError {
                message: format!("{} literal out of range: {}", what, token.text),
                offending: self.input[start],
                location: loc,
            });
        }

        Ok(token)
    }

    /// `e`, optional sign, then at least one digit
    fn exponent_follows(&self) -> bool {
        match self.peek_ahead(1) {
            Some('+' | '-') => self.peek_ahead(2).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    /// Variable (one letter) or identifier (a longer word)
    fn word(&mut self, start: usize, loc: SourceLocation) -> Token {
        self.advance();
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }

        let text: String = self.input[start..self.position].iter().collect();
        let kind = if self.position - start == 1 {
            TokenKind::Variable
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, text, loc)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        self.offset += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.offset, self.line, self.column)
    }
}

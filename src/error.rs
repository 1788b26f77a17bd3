//! Crate-level error type for [`parse_expression`](crate::parse_expression)

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::LexError;
use crate::parser::parse::ParseError;
use thiserror::Error;

/// Which pipeline stage failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex(_) => ErrorKind::Lex,
            Error::Parse(_) => ErrorKind::Parse,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Error::Lex(e) => e.location,
            Error::Parse(e) => e.location,
        }
    }

    /// The offending source text: the bad character, or the unexpected token
    /// (empty at end of input)
    pub fn offending(&self) -> String {
        match self {
            Error::Lex(e) => e.offending.to_string(),
            Error::Parse(e) => e.found_text.clone(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::Lex(e) => &e.message,
            Error::Parse(e) => &e.message,
        }
    }

    /// The error followed by the offending source line with a caret under
    /// the error column.
    ///
    /// ```text
    /// Parse error at line 1, column 3: expected operand, found end of input
    ///   2+
    ///     ^
    /// ```
    pub fn report(&self, source: &str) -> String {
        let location = self.location();
        let line = source
            .lines()
            .nth(location.line.saturating_sub(1))
            .unwrap_or("");
        let pad = " ".repeat(location.column.saturating_sub(1));
        format!("{}\n  {}\n  {}^", self, line, pad)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse_expression, ErrorKind};

    #[test]
    fn test_lex_error_accessors() {
        let err = parse_expression("2@3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lex);
        assert_eq!(err.offending(), "@");
        assert_eq!(err.location().offset, 1);
        assert_eq!(err.message(), "Unexpected character: '@'");
    }

    #[test]
    fn test_parse_error_accessors() {
        let err = parse_expression("2 + )").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.offending(), ")");
        assert_eq!(err.location().offset, 4);
    }

    #[test]
    fn test_report_points_at_column() {
        let err = parse_expression("2+").unwrap_err();
        assert_eq!(
            err.report("2+"),
            "Parse error at line 1, column 3: expected operand, found end of input\n  2+\n    ^"
        );
    }

    #[test]
    fn test_report_on_second_line() {
        let source = "1 +\n  2 $";
        let err = parse_expression(source).unwrap_err();
        let report = err.report(source);
        assert!(report.starts_with("Lexer error at line 2, column 5"));
        assert!(report.ends_with("\n    2 $\n      ^"));
    }
}

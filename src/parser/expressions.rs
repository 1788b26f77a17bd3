//! Expression parsing implementation
//!
//! One rule per precedence level, generic over the level's fixity. Each rule
//! parses operands with the next-tighter level (index - 1) and bottoms out in
//! [`Parser::parse_primary`]:
//!
//! - prefix: `op self | tighter`, so chains like `- - x` or `sin cos x` nest
//!   to the right
//! - postfix: `tighter op*`, nesting to the left (`x!!` is `(x!)!`)
//! - left infix: `tighter (op tighter)*`, folded left (`2-3-4` is `(2-3)-4`)
//! - right infix: `tighter (op self)?`, so `2^3^2` is `2^(3^2)`
//!
//! Every rule goes through the packrat cache. A rule that fails restores the
//! position it started from; an operator whose operand fails is left
//! unconsumed for an outer level (or the trailing-input check) to deal with.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{BinOp, PostfixOp, PrefixOp};
use crate::parser::grammar::{Assoc, Fixity, Level, OperatorSet};
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::memo::{MemoEntry, Node, NodeId, Rule};
use crate::parser::parse::{ParseError, Parser, MAX_DEPTH};

impl<'g> Parser<'g> {
    /// Parse at precedence level `level` (0 = tightest)
    pub(crate) fn parse_level(&mut self, level: usize) -> Result<NodeId, ParseError> {
        self.memoized(Rule::Level(level), |p| p.parse_level_uncached(level))
    }

    fn parse_level_uncached(&mut self, level: usize) -> Result<NodeId, ParseError> {
        let grammar = self.grammar;
        let row = &grammar.levels()[level];

        match row.fixity() {
            Fixity::Prefix => self.parse_prefix(level, row),
            Fixity::Postfix => self.parse_postfix(level, row),
            Fixity::Infix(Assoc::Left) => self.parse_infix_left(level, row),
            Fixity::Infix(Assoc::Right) => self.parse_infix_right(level, row),
        }
    }

    /// Operand of `level`: the next-tighter level, or a primary below level 0
    fn parse_operand(&mut self, level: usize) -> Result<NodeId, ParseError> {
        match level.checked_sub(1) {
            Some(tighter) => self.parse_level(tighter),
            None => self.parse_primary(),
        }
    }

    fn parse_prefix(&mut self, level: usize, row: &Level) -> Result<NodeId, ParseError> {
        let start = self.position;

        if row.operators().matches(self.peek()) {
            let op_token = self.advance();
            // A name followed by nothing usable is not an application; fall
            // back so a one-letter name can still be read as a variable.
            if let Ok(operand) = self.parse_level(level) {
                let op = self.prefix_op(row.operators(), &op_token)?;
                return Ok(self.arena.alloc(Node::Prefix(op, operand)));
            }
            self.position = start;
        }

        self.parse_operand(level)
    }

    fn parse_postfix(&mut self, level: usize, row: &Level) -> Result<NodeId, ParseError> {
        let mut operand = self.parse_operand(level)?;

        while row.operators().matches(self.peek()) {
            let op_token = self.advance();
            let op = op_token
                .operator()
                .and_then(PostfixOp::from_operator)
                .ok_or_else(|| self.error("postfix operator"))?;
            operand = self.arena.alloc(Node::Postfix(op, operand));
        }

        Ok(operand)
    }

    fn parse_infix_left(&mut self, level: usize, row: &Level) -> Result<NodeId, ParseError> {
        let mut left = self.parse_operand(level)?;

        while row.operators().matches(self.peek()) {
            let before = self.position;
            let op_token = self.advance();
            let right = match self.parse_operand(level) {
                Ok(right) => right,
                Err(_) => {
                    self.position = before;
                    break;
                }
            };
            let op = self.binary_op(&op_token)?;
            left = self.arena.alloc(Node::Binary(op, left, right));
        }

        Ok(left)
    }

    fn parse_infix_right(&mut self, level: usize, row: &Level) -> Result<NodeId, ParseError> {
        let left = self.parse_operand(level)?;

        if row.operators().matches(self.peek()) {
            let before = self.position;
            let op_token = self.advance();
            match self.parse_level(level) {
                Ok(right) => {
                    let op = self.binary_op(&op_token)?;
                    return Ok(self.arena.alloc(Node::Binary(op, left, right)));
                }
                Err(_) => self.position = before,
            }
        }

        Ok(left)
    }

    /// Primary operand: `( expr )`, real, integer, or variable
    pub(crate) fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        self.memoized(Rule::Primary, Self::parse_primary_uncached)
    }

    fn parse_primary_uncached(&mut self) -> Result<NodeId, ParseError> {
        match self.peek().kind {
            TokenKind::LeftParen => {
                let open = self.advance();
                let inner = self.parse_level(self.grammar.loosest())?;
                if !self.check(TokenKind::RightParen) {
                    let note = format!("to close '(' at column {}", open.location.column);
                    return Err(self.error_with_note("')'", Some(&note)));
                }
                self.advance();
                Ok(inner)
            }
            TokenKind::Real | TokenKind::Integer => {
                let literal = self.peek().literal().ok_or_else(|| self.error("number"))?;
                self.advance();
                Ok(self.arena.alloc(Node::Literal(literal)))
            }
            TokenKind::Variable => {
                let name = self.peek().text.chars().next();
                match name {
                    Some(name) => {
                        self.advance();
                        Ok(self.arena.alloc(Node::Variable(name)))
                    }
                    None => Err(self.error("operand")),
                }
            }
            _ => Err(self.error("operand")),
        }
    }

    /// Run `rule` through the packrat cache at the current position.
    fn memoized(
        &mut self,
        rule: Rule,
        parse: impl FnOnce(&mut Self) -> Result<NodeId, ParseError>,
    ) -> Result<NodeId, ParseError> {
        if let Some(err) = &self.too_deep {
            return Err(err.clone());
        }

        let start = self.position;
        if let Some(entry) = self.memo.get(rule, start) {
            self.position = entry.end;
            return entry.result;
        }

        if self.depth >= MAX_DEPTH {
            let err = self.nesting_error();
            self.too_deep = Some(err.clone());
            return Err(err);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        if result.is_err() {
            self.position = start;
        }
        self.memo.insert(
            rule,
            start,
            MemoEntry {
                result: result.clone(),
                end: self.position,
            },
        );
        result
    }

    fn prefix_op(
        &mut self,
        operators: &OperatorSet,
        token: &Token,
    ) -> Result<PrefixOp, ParseError> {
        let op = match operators {
            OperatorSet::Identifier => Some(PrefixOp::Apply(token.text.clone())),
            OperatorSet::Symbols(_) => token.operator().and_then(PrefixOp::from_operator),
        };
        op.ok_or_else(|| self.error("prefix operator"))
    }

    fn binary_op(&mut self, token: &Token) -> Result<BinOp, ParseError> {
        token
            .operator()
            .and_then(BinOp::from_operator)
            .ok_or_else(|| self.error("binary operator"))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{BinOp, Expr, PostfixOp, PrefixOp};
    use crate::parser::grammar::{Grammar, Level};
    use crate::parser::lexer::Operator;
    use crate::parser::parse::{Parser, MAX_DEPTH};

    fn parse(source: &str) -> Expr {
        let grammar = Grammar::standard();
        let mut parser = Parser::new(source, &grammar).unwrap();
        parser.parse().unwrap()
    }

    fn int(n: i64) -> Expr {
        Expr::integer(n)
    }

    fn var(name: char) -> Expr {
        Expr::variable(name)
    }

    #[test]
    fn test_left_associative_chain() {
        assert_eq!(
            parse("8 / 4 * 2"),
            Expr::binary(
                BinOp::Mul,
                Expr::binary(BinOp::Div, int(8), int(4)),
                int(2),
            )
        );
    }

    #[test]
    fn test_right_associative_power() {
        assert_eq!(
            parse("a^b^c"),
            Expr::binary(
                BinOp::Pow,
                var('a'),
                Expr::binary(BinOp::Pow, var('b'), var('c')),
            )
        );
    }

    #[test]
    fn test_nested_signs() {
        assert_eq!(
            parse("- -x"),
            Expr::prefix(PrefixOp::Minus, Expr::prefix(PrefixOp::Minus, var('x')))
        );
        assert_eq!(parse("+2"), Expr::prefix(PrefixOp::Plus, int(2)));
    }

    #[test]
    fn test_sign_in_multiplicative_operand() {
        assert_eq!(
            parse("2 * -3"),
            Expr::binary(BinOp::Mul, int(2), Expr::prefix(PrefixOp::Minus, int(3)))
        );
    }

    #[test]
    fn test_repeated_factorial() {
        assert_eq!(
            parse("3!!"),
            Expr::postfix(
                PostfixOp::Factorial,
                Expr::postfix(PostfixOp::Factorial, int(3)),
            )
        );
    }

    #[test]
    fn test_factorial_binds_tighter_than_power() {
        assert_eq!(
            parse("2^3!"),
            Expr::binary(
                BinOp::Pow,
                int(2),
                Expr::postfix(PostfixOp::Factorial, int(3)),
            )
        );
    }

    #[test]
    fn test_application() {
        assert_eq!(
            parse("sin cos x"),
            Expr::apply("sin", Expr::apply("cos", var('x')))
        );
        assert_eq!(
            parse("sin x + 1"),
            Expr::binary(BinOp::Add, Expr::apply("sin", var('x')), int(1))
        );
        assert_eq!(
            parse("log(x + 1)"),
            Expr::apply("log", Expr::binary(BinOp::Add, var('x'), int(1)))
        );
    }

    #[test]
    fn test_one_letter_function() {
        assert_eq!(parse("f x"), Expr::apply("f", var('x')));
        assert_eq!(parse("f(2)"), Expr::apply("f", int(2)));
        // Nothing to apply to: plain variable
        assert_eq!(parse("f + 1"), Expr::binary(BinOp::Add, var('f'), int(1)));
    }

    #[test]
    fn test_application_does_not_take_a_sign() {
        let grammar = Grammar::standard();
        let mut parser = Parser::new("sin -x", &grammar).unwrap();
        let err = parser.parse().unwrap_err();
        assert_eq!(err.found, "operator '-'");
        assert_eq!(err.location.offset, 4);
    }

    #[test]
    fn test_parentheses_reenter_loosest_level() {
        assert_eq!(parse("((1))"), int(1));
        assert_eq!(
            parse("-(2 + 3)!"),
            Expr::prefix(
                PrefixOp::Minus,
                Expr::postfix(
                    PostfixOp::Factorial,
                    Expr::binary(BinOp::Add, int(2), int(3)),
                ),
            )
        );
    }

    #[test]
    fn test_reals_keep_their_type() {
        assert_eq!(
            parse("1.5 * 2"),
            Expr::binary(BinOp::Mul, Expr::real(1.5), int(2))
        );
        assert_eq!(parse("2e3"), Expr::real(2000.0));
    }

    #[test]
    fn test_unclosed_paren_message_points_at_opener() {
        let grammar = Grammar::standard();
        let mut parser = Parser::new("3 * (1 + 2", &grammar).unwrap();
        let err = parser.parse().unwrap_err();
        assert_eq!(
            err.message,
            "expected ')', found end of input to close '(' at column 5"
        );
    }

    #[test]
    fn test_deep_nesting_stays_linear() {
        let depth = 40;
        let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        let grammar = Grammar::standard();
        let mut parser = Parser::new(&source, &grammar).unwrap();
        assert_eq!(parser.parse().unwrap(), var('x'));

        // At most one evaluation per (rule, position)
        let rules = grammar.levels().len() + 1;
        let stats = parser.memo_stats();
        assert!(stats.entries <= rules * parser.tokens().len());
        assert_eq!(stats.misses, stats.entries);
    }

    #[test]
    fn test_repeated_attempts_hit_the_cache() {
        // The sign appears at two levels, so after the loose sign fails the
        // tight one retries the same operand position.
        let grammar = Grammar::new(vec![
            Level::prefix(&[Operator::Minus]),
            Level::infix_right(&[Operator::Caret]),
            Level::prefix(&[Operator::Minus]),
        ])
        .unwrap();
        let mut parser = Parser::new("-", &grammar).unwrap();
        assert!(parser.parse().is_err());
        assert!(parser.memo_stats().hits > 0);
    }

    #[test]
    fn test_nesting_limit() {
        let grammar = Grammar::standard();
        // Each parenthesis costs one rule per level plus the primary; the
        // innermost name also tries itself as a function.
        let per_paren = grammar.levels().len() + 1;
        let fits = MAX_DEPTH / per_paren - 2;

        let source = format!("{}x{}", "(".repeat(fits), ")".repeat(fits));
        let mut parser = Parser::new(&source, &grammar).unwrap();
        assert_eq!(parser.parse().unwrap(), var('x'));

        let source = format!("{}x{}", "(".repeat(fits + 10), ")".repeat(fits + 10));
        let mut parser = Parser::new(&source, &grammar).unwrap();
        let err = parser.parse().unwrap_err();
        assert!(err.message.starts_with("expression nested too deeply"));
        assert_eq!(err.found_text, "(");
    }

    #[test]
    fn test_reparse_starts_fresh() {
        let grammar = Grammar::standard();
        let mut parser = Parser::new("(1 + 2) * 3", &grammar).unwrap();
        let first = parser.parse().unwrap();
        let stats = parser.memo_stats();
        assert_eq!(parser.parse().unwrap(), first);
        assert_eq!(parser.memo_stats(), stats);
    }
}

//! Packrat memoization
//!
//! Every grammar rule is cached by `(rule, token position)`, so a rule is
//! evaluated at most once per position no matter how often the parser
//! backtracks over it. Results are stored as [`NodeId`]s into a [`NodeArena`]
//! instead of owned trees: a cache hit hands back the id in constant time,
//! and the owned [`Expr`] is assembled once, after parsing succeeds.
//!
//! Both structures live inside one [`Parser`](super::parse::Parser) and are
//! dropped with it.

use super::ast::{BinOp, Expr, Literal, PostfixOp, PrefixOp};
use super::parse::ParseError;
use rustc_hash::FxHashMap;

/// Index of a node in the [`NodeArena`]
pub type NodeId = usize;

/// Arena form of [`Expr`], with children referenced by id
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Literal(Literal),
    Variable(char),
    Prefix(PrefixOp, NodeId),
    Postfix(PostfixOp, NodeId),
    Binary(BinOp, NodeId, NodeId),
}

#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Assemble the owned tree rooted at `id`.
    ///
    /// Ids always point at nodes allocated earlier, so this returns `None`
    /// only for an id this arena never handed out.
    pub(crate) fn build(&self, id: NodeId) -> Option<Expr> {
        let expr = match self.nodes.get(id)? {
            Node::Literal(lit) => Expr::Literal(*lit),
            Node::Variable(name) => Expr::Variable(*name),
            Node::Prefix(op, operand) => Expr::prefix(op.clone(), self.build(*operand)?),
            Node::Postfix(op, operand) => Expr::postfix(*op, self.build(*operand)?),
            Node::Binary(op, left, right) => {
                Expr::binary(*op, self.build(*left)?, self.build(*right)?)
            }
        };
        Some(expr)
    }
}

/// Grammar rules that get cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Rule {
    /// Index into the precedence table
    Level(usize),
    Primary,
}

#[derive(Debug, Clone)]
pub(crate) struct MemoEntry {
    pub(crate) result: Result<NodeId, ParseError>,
    /// Token position after the rule ran (the start position on failure)
    pub(crate) end: usize,
}

/// Cache counters, exposed for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub(crate) struct MemoTable {
    entries: FxHashMap<(Rule, usize), MemoEntry>,
    hits: usize,
    misses: usize,
}

impl MemoTable {
    pub(crate) fn get(&mut self, rule: Rule, position: usize) -> Option<MemoEntry> {
        match self.entries.get(&(rule, position)) {
            Some(entry) => {
                self.hits += 1;
                log::trace!("memo hit: {:?} at token {}", rule, position);
                Some(entry.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub(crate) fn insert(&mut self, rule: Rule, position: usize, entry: MemoEntry) {
        self.entries.insert((rule, position), entry);
    }

    pub(crate) fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_builds_owned_tree() {
        let mut arena = NodeArena::default();
        let two = arena.alloc(Node::Literal(Literal::Integer(2)));
        let x = arena.alloc(Node::Variable('x'));
        let pow = arena.alloc(Node::Binary(BinOp::Pow, two, x));
        let neg = arena.alloc(Node::Prefix(PrefixOp::Minus, pow));

        let expected = Expr::prefix(
            PrefixOp::Minus,
            Expr::binary(BinOp::Pow, Expr::integer(2), Expr::variable('x')),
        );
        assert_eq!(arena.build(neg), Some(expected));
        assert_eq!(arena.len(), 4);
        assert_eq!(arena.build(99), None);
    }

    #[test]
    fn test_memo_counts_hits_and_misses() {
        let mut memo = MemoTable::default();
        assert!(memo.get(Rule::Primary, 0).is_none());

        memo.insert(
            Rule::Primary,
            0,
            MemoEntry {
                result: Ok(7),
                end: 1,
            },
        );
        let entry = memo.get(Rule::Primary, 0).unwrap();
        assert_eq!(entry.result.unwrap(), 7);
        assert_eq!(entry.end, 1);

        // Same position, different rule
        assert!(memo.get(Rule::Level(0), 0).is_none());

        assert_eq!(
            memo.stats(),
            MemoStats {
                hits: 1,
                misses: 2,
                entries: 1,
            }
        );
    }
}

//! Ordered-choice parser producing a concrete syntax tree
//!
//! The parser matches a compiled [`Grammar`] against a token stream:
//! 1. Tokens whose category is in the ignored set (whitespace, comments) are
//!    dropped up front and never appear in the tree.
//! 2. A rule is matched by trying its productions in declaration order; the
//!    first production whose full symbol sequence matches wins and later
//!    alternatives are never reconsidered (deterministic ordered choice, not
//!    general ambiguous-CFG parsing).
//! 3. Within a production, symbols match left to right: a terminal consumes
//!    one token of the required category, a non-terminal recursively matches
//!    its own rule. A partial failure abandons only that production.
//! 4. The parse succeeds iff the start rule matches and consumes every
//!    remaining token.
//!
//! Declared variant order is therefore semantically significant, and
//! left-recursive rules are unsupported: a left-recursive non-terminal
//! re-enters itself at the same position and never terminates. That is a
//! grammar-authoring constraint, not something the matcher works around.

use crate::grammar::{Grammar, GrammarSymbol, ProductionRule, RuleId};
use crate::token::Token;
use serde::Serialize;
use std::fmt;

/// Errors that can occur during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No production of the start rule matches the full token stream.
    ///
    /// `position` is the furthest token index any match attempt reached;
    /// `found` is the token at that index, if the failure was not at end of
    /// input.
    Syntax {
        position: usize,
        found: Option<Token>,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax { position, found } => match found {
                Some(token) => write!(
                    f,
                    "syntax error at token {}: unexpected {}",
                    position, token
                ),
                None => write!(f, "syntax error at token {}: unexpected end of input", position),
            },
        }
    }
}

impl std::error::Error for ParseError {}

/// A child of a parse node: a consumed token or a nested sub-tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseChild {
    Token(Token),
    Node(ParseNode),
}

/// One node of the concrete syntax tree.
///
/// The children correspond to the matched production's symbols position for
/// position, so `children.len() == production.symbols.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseNode {
    pub production: ProductionRule,
    pub children: Vec<ParseChild>,
}

impl ParseNode {
    pub fn rule_name(&self) -> &str {
        &self.production.rule_name
    }

    pub fn variant(&self) -> &str {
        &self.production.variant
    }
}

/// Parse a token stream against a compiled grammar.
///
/// Tokens whose category appears in `ignored` are filtered out first. The
/// whole (filtered) stream must be consumed by the start rule; anything less
/// is a [`ParseError::Syntax`] carrying the furthest position reached.
pub fn parse(
    tokens: &[Token],
    grammar: &Grammar,
    ignored: &[&str],
) -> Result<ParseNode, ParseError> {
    let filtered: Vec<&Token> = tokens
        .iter()
        .filter(|token| !ignored.contains(&token.category.as_str()))
        .collect();

    let mut matcher = Matcher {
        grammar,
        tokens: &filtered,
        furthest: 0,
    };

    match matcher.match_rule(grammar.start_id(), 0) {
        Some((node, end)) if end == filtered.len() => Ok(node),
        Some((_, end)) => Err(syntax_error_at(&filtered, matcher.furthest.max(end))),
        None => Err(syntax_error_at(&filtered, matcher.furthest)),
    }
}

fn syntax_error_at(tokens: &[&Token], position: usize) -> ParseError {
    ParseError::Syntax {
        position,
        found: tokens.get(position).map(|token| (*token).clone()),
    }
}

/// One parse attempt over a fixed token stream.
///
/// `furthest` records the deepest token index any production attempt reached,
/// which is what gets reported when the whole parse fails.
struct Matcher<'a> {
    grammar: &'a Grammar,
    tokens: &'a [&'a Token],
    furthest: usize,
}

impl<'a> Matcher<'a> {
    fn match_rule(&mut self, id: RuleId, position: usize) -> Option<(ParseNode, usize)> {
        let grammar = self.grammar;
        for production in &grammar.rule(id).productions {
            if let Some(matched) = self.match_production(production, position) {
                return Some(matched);
            }
        }
        None
    }

    fn match_production(
        &mut self,
        production: &ProductionRule,
        start: usize,
    ) -> Option<(ParseNode, usize)> {
        let mut children = Vec::with_capacity(production.symbols.len());
        let mut position = start;

        for symbol in &production.symbols {
            match symbol {
                GrammarSymbol::Terminal(category) => match self.tokens.get(position) {
                    Some(token) if token.category == *category => {
                        children.push(ParseChild::Token((*token).clone()));
                        position += 1;
                    }
                    _ => {
                        self.furthest = self.furthest.max(position);
                        return None;
                    }
                },
                GrammarSymbol::NonTerminal(rule_id) => {
                    let (node, next) = self.match_rule(*rule_id, position)?;
                    children.push(ParseChild::Node(node));
                    position = next;
                }
            }
        }

        Some((
            ParseNode {
                production: production.clone(),
                children,
            },
            position,
        ))
    }
}

//! High-level engine tying the pipeline stages together
//!
//! [`Engine`] bundles a lexical ruleset, a compiled grammar, an attribute
//! grammar, and the set of token categories the parser should ignore. It
//! offers one method per pipeline depth:
//!
//! - [`Engine::tokenize`] — text to token stream
//! - [`Engine::parse`] — text to concrete syntax tree
//! - [`Engine::attribute`] — text to attributed tree
//! - [`Engine::evaluate`] — text to the root attribute value
//!
//! A configured engine is immutable: the same instance can process any
//! number of documents, from any number of threads, with no locking.
//!
//! # Examples
//!
//! ```no_run
//! use parsekit::{AttributeGrammar, AttributedChild, Engine, Grammar, LexicalRuleset, RuleDefinition};
//!
//! let rules = LexicalRuleset::new()
//!     .rule("number", r"[0-9]+").unwrap()
//!     .rule("whitespace", r"[ ]+").unwrap();
//! let grammar = Grammar::compile(
//!     &[RuleDefinition::new("Term").production("number", &["number"])],
//!     "Term",
//! ).unwrap();
//! let attributes = AttributeGrammar::new().action(
//!     "Term",
//!     "number",
//!     |children: &[AttributedChild<i64>]| children[0].token().unwrap().text.parse().unwrap(),
//! );
//!
//! let engine = Engine::new(rules, grammar, attributes).ignore(&["whitespace"]);
//! let value = engine.evaluate("42").unwrap();
//! assert_eq!(value, 42);
//! ```

use crate::attributes::{attribute, AttributeError, AttributeGrammar, AttributedNode};
use crate::grammar::{Grammar, GrammarError, RuleDefinition};
use crate::lexer::{LexError, LexicalRuleset};
use crate::parser::{parse, ParseError, ParseNode};
use crate::token::Token;
use std::fmt;

/// Errors from any stage of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Lex(LexError),
    Grammar(GrammarError),
    Parse(ParseError),
    Attribute(AttributeError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Lex(e) => write!(f, "lexer error: {}", e),
            EngineError::Grammar(e) => write!(f, "grammar error: {}", e),
            EngineError::Parse(e) => write!(f, "parser error: {}", e),
            EngineError::Attribute(e) => write!(f, "attribution error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<LexError> for EngineError {
    fn from(err: LexError) -> Self {
        EngineError::Lex(err)
    }
}

impl From<GrammarError> for EngineError {
    fn from(err: GrammarError) -> Self {
        EngineError::Grammar(err)
    }
}

impl From<ParseError> for EngineError {
    fn from(err: ParseError) -> Self {
        EngineError::Parse(err)
    }
}

impl From<AttributeError> for EngineError {
    fn from(err: AttributeError) -> Self {
        EngineError::Attribute(err)
    }
}

/// A fully configured front-end engine for one language.
pub struct Engine<V> {
    ruleset: LexicalRuleset,
    grammar: Grammar,
    attributes: AttributeGrammar<V>,
    ignored: Vec<String>,
}

impl<V> Engine<V> {
    /// Build an engine from already-constructed stage configurations.
    pub fn new(
        ruleset: LexicalRuleset,
        grammar: Grammar,
        attributes: AttributeGrammar<V>,
    ) -> Self {
        Engine {
            ruleset,
            grammar,
            attributes,
            ignored: Vec::new(),
        }
    }

    /// Build an engine from a raw grammar definition, compiling it with
    /// `start` as the start rule.
    pub fn from_definition(
        ruleset: LexicalRuleset,
        definition: &[RuleDefinition],
        start: &str,
        attributes: AttributeGrammar<V>,
    ) -> Result<Self, EngineError> {
        let grammar = Grammar::compile(definition, start)?;
        Ok(Engine::new(ruleset, grammar, attributes))
    }

    /// Set the token categories the parser drops before matching
    /// (whitespace, comments, and the like).
    pub fn ignore(mut self, categories: &[&str]) -> Self {
        self.ignored = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    /// The compiled grammar this engine parses with
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Tokenize a document.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, EngineError> {
        Ok(self.ruleset.tokenize(input)?)
    }

    /// Tokenize and parse a document into a concrete syntax tree.
    pub fn parse(&self, input: &str) -> Result<ParseNode, EngineError> {
        let tokens = self.ruleset.tokenize(input)?;
        let ignored: Vec<&str> = self.ignored.iter().map(|c| c.as_str()).collect();
        Ok(parse(&tokens, &self.grammar, &ignored)?)
    }

    /// Run the full pipeline, returning the attributed tree.
    pub fn attribute(&self, input: &str) -> Result<AttributedNode<V>, EngineError> {
        let tree = self.parse(input)?;
        Ok(attribute(&tree, &self.attributes)?)
    }

    /// Run the full pipeline, returning the root attribute value.
    pub fn evaluate(&self, input: &str) -> Result<V, EngineError> {
        Ok(self.attribute(input)?.value)
    }
}

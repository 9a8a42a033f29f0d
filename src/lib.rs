//! # parsekit
//!
//! A configurable lexing, parsing, and attribute-grammar engine.
//!
//! parsekit is a compiler front end that is configured with data instead of
//! code: a language is described by three declarative inputs, and the engine
//! runs the same pipeline for every language so described:
//!
//! 1. A [`lexer::LexicalRuleset`] of named regex rules turns raw text into a
//!    stream of [`token::Token`]s (maximum munch, with declaration order
//!    breaking ties).
//! 2. A compiled [`grammar::Grammar`] drives an ordered-choice matcher over
//!    the token stream, producing a concrete [`parser::ParseNode`] tree.
//! 3. An [`attributes::AttributeGrammar`] of semantic actions evaluates the
//!    parse tree bottom-up into an [`attributes::AttributedNode`] tree whose
//!    root value is the final result.
//!
//! The [`pipeline::Engine`] struct bundles all three stages behind a single
//! interface. A configured engine is immutable and can process any number of
//! documents, including concurrently from multiple threads.

pub mod attributes;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod token;

pub use attributes::{
    attribute, AttributeError, AttributeGrammar, AttributedChild, AttributedNode, SemanticAction,
};
pub use grammar::{
    Grammar, GrammarError, GrammarRule, GrammarSymbol, ProductionRule, RuleDefinition, RuleId,
};
pub use lexer::{LexError, LexicalRuleset, NEWLINE_CATEGORY};
pub use parser::{parse, ParseChild, ParseError, ParseNode};
pub use pipeline::{Engine, EngineError};
pub use token::{detokenize, Token};

//! Bottom-up attribute evaluation over parse trees
//!
//! An attribute grammar assigns one semantic action to every
//! `(rule name, variant)` pair the syntax grammar can produce. Evaluation is
//! a single post-order traversal: a node's children are attributed first
//! (tokens pass through unchanged), then the node's action is invoked with
//! the ordered, already-attributed children and its return value is stored
//! on the node. The root value is the engine's final output.
//!
//! Actions are expected to be pure functions of their children; the engine
//! does not memoize or re-run them. Dispatch is a table of boxed
//! [`SemanticAction`] objects built up front, keyed by rule name and
//! variant, so lookup per node is a plain map access.

use crate::grammar::ProductionRule;
use crate::parser::{ParseChild, ParseNode};
use crate::token::Token;
use std::collections::HashMap;
use std::fmt;

/// Errors that can occur during attribute evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// The attribute grammar has no action for a reachable rule/variant pair
    MissingSemanticRule { rule_name: String, variant: String },
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::MissingSemanticRule { rule_name, variant } => write!(
                f,
                "no semantic rule found for rule '{}' variant '{}'",
                rule_name, variant
            ),
        }
    }
}

impl std::error::Error for AttributeError {}

/// A child handed to a semantic action: a terminal token or an attributed
/// sub-tree. Order and arity mirror the matched production's symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributedChild<V> {
    Token(Token),
    Node(AttributedNode<V>),
}

impl<V> AttributedChild<V> {
    /// The child's computed value, if it is an attributed node
    pub fn value(&self) -> Option<&V> {
        match self {
            AttributedChild::Node(node) => Some(&node.value),
            AttributedChild::Token(_) => None,
        }
    }

    /// The child's token, if it is a terminal
    pub fn token(&self) -> Option<&Token> {
        match self {
            AttributedChild::Token(token) => Some(token),
            AttributedChild::Node(_) => None,
        }
    }
}

/// A parse node annotated with its computed attribute value.
///
/// The value is computed exactly once, strictly after all child values.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributedNode<V> {
    pub production: ProductionRule,
    pub value: V,
    pub children: Vec<AttributedChild<V>>,
}

impl<V> AttributedNode<V> {
    pub fn rule_name(&self) -> &str {
        &self.production.rule_name
    }

    pub fn variant(&self) -> &str {
        &self.production.variant
    }
}

/// A semantic action: computes one attribute value from a node's ordered,
/// already-attributed children.
///
/// Implemented for free by any matching closure.
pub trait SemanticAction<V>: Send + Sync {
    fn attribute(&self, children: &[AttributedChild<V>]) -> V;
}

impl<V, F> SemanticAction<V> for F
where
    F: Fn(&[AttributedChild<V>]) -> V + Send + Sync,
{
    fn attribute(&self, children: &[AttributedChild<V>]) -> V {
        self(children)
    }
}

/// Dispatch table from `(rule name, variant)` to semantic action.
///
/// Built once at configuration time and immutable afterwards; shareable
/// across threads.
pub struct AttributeGrammar<V> {
    actions: HashMap<(String, String), Box<dyn SemanticAction<V>>>,
}

impl<V> AttributeGrammar<V> {
    pub fn new() -> Self {
        AttributeGrammar {
            actions: HashMap::new(),
        }
    }

    /// Register the action for one rule/variant pair, replacing any
    /// previous registration for that pair.
    pub fn action<A>(mut self, rule_name: &str, variant: &str, action: A) -> Self
    where
        A: SemanticAction<V> + 'static,
    {
        self.actions.insert(
            (rule_name.to_string(), variant.to_string()),
            Box::new(action),
        );
        self
    }

    /// Look up the action for a rule/variant pair
    pub fn get(&self, rule_name: &str, variant: &str) -> Option<&dyn SemanticAction<V>> {
        self.actions
            .get(&(rule_name.to_string(), variant.to_string()))
            .map(|action| action.as_ref())
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<V> Default for AttributeGrammar<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Attribute a parse tree bottom-up.
///
/// Fails with [`AttributeError::MissingSemanticRule`] at the first node
/// whose rule/variant pair has no registered action; children are evaluated
/// before their parent, so the failure surfaces at the deepest unregistered
/// node encountered.
pub fn attribute<V>(
    node: &ParseNode,
    grammar: &AttributeGrammar<V>,
) -> Result<AttributedNode<V>, AttributeError> {
    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        match child {
            ParseChild::Token(token) => children.push(AttributedChild::Token(token.clone())),
            ParseChild::Node(sub) => children.push(AttributedChild::Node(attribute(sub, grammar)?)),
        }
    }

    let action = grammar
        .get(node.rule_name(), node.variant())
        .ok_or_else(|| AttributeError::MissingSemanticRule {
            rule_name: node.rule_name().to_string(),
            variant: node.variant().to_string(),
        })?;
    let value = action.attribute(&children);

    Ok(AttributedNode {
        production: node.production.clone(),
        value,
        children,
    })
}

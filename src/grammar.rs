//! Grammar definitions and the grammar compiler
//!
//! A grammar arrives as data: an ordered list of [`RuleDefinition`]s, each
//! mapping variant labels to ordered lists of symbol names. The compiler
//! resolves those names into a compiled [`Grammar`]:
//! - a symbol name whose first character is uppercase is a non-terminal
//!   reference, compiled recursively;
//! - any other symbol name is a terminal matching a token category.
//!
//! Rules can reference each other cyclically (self-recursion and mutual
//! recursion included), so the compiled form is a reference graph, not a
//! tree: rules live in an arena and [`GrammarSymbol::NonTerminal`] holds an
//! index into it. The compiler inserts a placeholder into its name-to-id map
//! before descending into a rule's productions, so a recurring name resolves
//! to the shared id instead of recompiling forever.
//!
//! Production order within a rule is declaration order and determines match
//! precedence in the parser, so definitions keep variants as an ordered list
//! of pairs rather than a map.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a compiled rule in a [`Grammar`]'s arena
pub type RuleId = usize;

/// Errors that can occur while compiling a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A production references a non-terminal with no definition
    UnknownRule { name: String },
    /// A production contains an empty symbol name
    EmptySymbol { rule: String },
    /// The raw definition could not be deserialized
    InvalidDefinition(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnknownRule { name } => {
                write!(f, "no grammar rule found with name '{}'", name)
            }
            GrammarError::EmptySymbol { rule } => {
                write!(f, "empty symbol name in productions of rule '{}'", rule)
            }
            GrammarError::InvalidDefinition(msg) => {
                write!(f, "invalid grammar definition: {}", msg)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// One symbol in a production: a terminal token category or a reference to
/// another compiled rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GrammarSymbol {
    Terminal(String),
    NonTerminal(RuleId),
}

/// One labeled alternative expansion of a grammar rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductionRule {
    /// Name of the rule this production belongs to
    pub rule_name: String,
    /// Label of this alternative within the rule
    pub variant: String,
    /// Ordered symbol sequence to match
    pub symbols: Vec<GrammarSymbol>,
}

/// A compiled grammar rule: a name plus its productions in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarRule {
    pub name: String,
    pub productions: Vec<ProductionRule>,
}

/// Raw, uncompiled definition of one grammar rule.
///
/// Variants are ordered `(label, symbol names)` pairs; the order is
/// significant (it is the parser's match precedence) and survives serde
/// round trips because the representation is a list, not a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub name: String,
    pub productions: Vec<(String, Vec<String>)>,
}

impl RuleDefinition {
    pub fn new(name: &str) -> Self {
        RuleDefinition {
            name: name.to_string(),
            productions: Vec::new(),
        }
    }

    /// Append a variant. Declaration order is match precedence.
    pub fn production(mut self, variant: &str, symbols: &[&str]) -> Self {
        self.productions.push((
            variant.to_string(),
            symbols.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }
}

/// A compiled grammar: an arena of rules plus the start rule's id.
///
/// Immutable after compilation and freely shareable across threads; the
/// cycle cache used during compilation is discarded once `compile` returns.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<GrammarRule>,
    index: HashMap<String, RuleId>,
    start: RuleId,
}

impl Grammar {
    /// Compile the rule named `start` and everything reachable from it.
    ///
    /// Fails fast with [`GrammarError::UnknownRule`] on a dangling
    /// non-terminal reference; no partial grammar is returned.
    pub fn compile(definition: &[RuleDefinition], start: &str) -> Result<Grammar, GrammarError> {
        let mut compiler = Compiler {
            definition,
            rules: Vec::new(),
            index: HashMap::new(),
        };
        let start_id = compiler.compile_rule(start)?;
        Ok(Grammar {
            rules: compiler.rules,
            index: compiler.index,
            start: start_id,
        })
    }

    /// Deserialize a JSON array of [`RuleDefinition`]s and compile it.
    pub fn from_json(json: &str, start: &str) -> Result<Grammar, GrammarError> {
        let definition: Vec<RuleDefinition> =
            serde_json::from_str(json).map_err(|e| GrammarError::InvalidDefinition(e.to_string()))?;
        Grammar::compile(&definition, start)
    }

    pub fn start_id(&self) -> RuleId {
        self.start
    }

    pub fn start_rule(&self) -> &GrammarRule {
        &self.rules[self.start]
    }

    pub fn rule(&self, id: RuleId) -> &GrammarRule {
        &self.rules[id]
    }

    /// Look up a compiled rule's id by name
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    /// Number of compiled rules (each name is compiled exactly once)
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Working state of one `compile` call
struct Compiler<'d> {
    definition: &'d [RuleDefinition],
    rules: Vec<GrammarRule>,
    index: HashMap<String, RuleId>,
}

impl<'d> Compiler<'d> {
    fn compile_rule(&mut self, name: &str) -> Result<RuleId, GrammarError> {
        // Already compiled, or currently compiling (cycle): share the id.
        if let Some(&id) = self.index.get(name) {
            return Ok(id);
        }

        let raw = self
            .definition
            .iter()
            .find(|rule| rule.name == name)
            .ok_or_else(|| GrammarError::UnknownRule {
                name: name.to_string(),
            })?;

        // Reserve the arena slot before descending so recursive references
        // resolve to this id instead of recompiling.
        let id = self.rules.len();
        self.rules.push(GrammarRule {
            name: name.to_string(),
            productions: Vec::new(),
        });
        self.index.insert(name.to_string(), id);

        let mut productions = Vec::with_capacity(raw.productions.len());
        for (variant, symbols) in &raw.productions {
            let mut compiled = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                compiled.push(self.compile_symbol(name, symbol)?);
            }
            productions.push(ProductionRule {
                rule_name: name.to_string(),
                variant: variant.clone(),
                symbols: compiled,
            });
        }
        self.rules[id].productions = productions;

        Ok(id)
    }

    fn compile_symbol(&mut self, rule: &str, symbol: &str) -> Result<GrammarSymbol, GrammarError> {
        let first = symbol.chars().next().ok_or_else(|| GrammarError::EmptySymbol {
            rule: rule.to_string(),
        })?;
        if first.is_uppercase() {
            // Capitalized names are non-terminal references by convention.
            Ok(GrammarSymbol::NonTerminal(self.compile_rule(symbol)?))
        } else {
            Ok(GrammarSymbol::Terminal(symbol.to_string()))
        }
    }
}

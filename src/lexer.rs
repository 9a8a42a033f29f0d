//! Maximum-munch lexer driven by a declarative ruleset
//!
//! The lexer is configured with an ordered list of named regex rules and
//! converts raw text into a token stream:
//! 1. At the current offset, every rule's pattern is tried, anchored so a
//!    match can only begin exactly at the offset.
//! 2. The longest match wins (maximum munch); on an equal-length tie the rule
//!    declared earliest wins, so declaration order is significant.
//! 3. The offset advances past the match and the loop repeats until the end
//!    of input. There is no backtracking: an emitted token is never
//!    reconsidered.
//!
//! Line/column bookkeeping is part of the contract: a match from the
//! distinguished [`NEWLINE_CATEGORY`] rule increments the line counter and
//! resets the column to zero; any other match advances the column by the
//! matched text's character count.

use crate::token::Token;
use regex::Regex;
use std::fmt;

/// Rule category with newline semantics for line/column tracking.
pub const NEWLINE_CATEGORY: &str = "newline";

/// Errors that can occur while building a ruleset or tokenizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No lexical rule matches the input at this byte offset
    InvalidCharacter {
        position: usize,
        line: usize,
        column: usize,
    },
    /// A rule's regex failed to compile
    InvalidPattern { category: String, message: String },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::InvalidCharacter {
                position,
                line,
                column,
            } => write!(
                f,
                "no lexical rule matches input at byte {} (line {}, column {})",
                position, line, column
            ),
            LexError::InvalidPattern { category, message } => {
                write!(f, "invalid pattern for rule '{}': {}", category, message)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// One named lexical rule: a token category and its compiled pattern.
///
/// The pattern is anchored at construction so it can only match at the
/// current lexing offset.
#[derive(Debug, Clone)]
struct LexicalRule {
    category: String,
    pattern: Regex,
}

/// An ordered set of lexical rules.
///
/// Rules are tried in the order they were added; that order is the tie-break
/// for equal-length matches. The ruleset is immutable once built and can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct LexicalRuleset {
    rules: Vec<LexicalRule>,
}

impl LexicalRuleset {
    pub fn new() -> Self {
        LexicalRuleset { rules: Vec::new() }
    }

    /// Add a rule, compiling and anchoring its pattern.
    ///
    /// The pattern is standard regex syntax; it is wrapped in `\A(?:...)` so
    /// matching never skips ahead in the input.
    pub fn rule(mut self, category: &str, pattern: &str) -> Result<Self, LexError> {
        let anchored = format!(r"\A(?:{})", pattern);
        let pattern = Regex::new(&anchored).map_err(|e| LexError::InvalidPattern {
            category: category.to_string(),
            message: e.to_string(),
        })?;
        self.rules.push(LexicalRule {
            category: category.to_string(),
            pattern,
        });
        Ok(self)
    }

    /// Number of configured rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Tokenize `input` completely.
    ///
    /// Returns the token sequence in source order; concatenating the tokens'
    /// texts reproduces `input` exactly. Fails with
    /// [`LexError::InvalidCharacter`] at the first offset where no rule
    /// produces a match. A rule that matches the empty string cannot make
    /// progress and is treated as non-matching at that offset.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut position = 0;
        let mut line = 1;
        let mut column = 0;

        while position < input.len() {
            let rest = &input[position..];
            // Maximum munch: keep the longest match; strict comparison keeps
            // the earliest-declared rule on ties.
            let mut best: Option<(&LexicalRule, &str)> = None;
            for rule in &self.rules {
                if let Some(found) = rule.pattern.find(rest) {
                    let text = found.as_str();
                    if text.is_empty() {
                        continue;
                    }
                    let is_longer = match &best {
                        Some((_, best_text)) => text.len() > best_text.len(),
                        None => true,
                    };
                    if is_longer {
                        best = Some((rule, text));
                    }
                }
            }

            let (rule, text) = match best {
                Some(found) => found,
                None => {
                    return Err(LexError::InvalidCharacter {
                        position,
                        line,
                        column,
                    })
                }
            };

            tokens.push(Token::new(&rule.category, text, line, column));

            if rule.category == NEWLINE_CATEGORY {
                line += 1;
                column = 0;
            } else {
                column += text.chars().count();
            }
            position += text.len();
        }

        Ok(tokens)
    }
}

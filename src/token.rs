//! Token types shared by every pipeline stage
//!
//! Tokens are produced once by the lexer and then flow unchanged through the
//! parser (as parse-tree leaves) and the attribute evaluator (passed verbatim
//! to semantic actions). A token records the category that matched it, the
//! exact matched text, and the line/column at which that text starts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single lexed token.
///
/// Line numbering starts at 1, column numbering at 0. The position is where
/// the token's text begins in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Name of the lexical rule that produced this token
    pub category: String,
    /// The exact matched source text
    pub text: String,
    /// 1-based source line of the first character
    pub line: usize,
    /// 0-based source column of the first character
    pub column: usize,
}

impl Token {
    pub fn new(category: &str, text: &str, line: usize, column: usize) -> Self {
        Token {
            category: category.to_string(),
            text: text.to_string(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({:?}) at {}:{}",
            self.category, self.text, self.line, self.column
        )
    }
}

/// Reassemble the source text from a token stream.
///
/// Lexing partitions the input completely, so concatenating every token's
/// text reproduces the original document byte for byte. Useful for
/// round-trip checks and tooling.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(&token.text);
    }
    result
}

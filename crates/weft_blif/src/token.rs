//! Tokens produced by the BLIF lexer.

use serde::{Deserialize, Serialize};
use weft_source::Span;

/// A token kind. Token text is recovered from the source through the span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// A word starting with `.`, such as `.model` or `.names`.
    Directive,
    /// Any other run of non-whitespace characters.
    Word,
    /// End of input.
    Eof,
}

/// A token with its location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind.
    pub kind: TokenKind,
    /// Byte range in the source file.
    pub span: Span,
}

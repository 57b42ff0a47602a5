//! Token types for the Evo lexer.

use evo_types::Span;
use std::fmt;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved form keyword
    /// (`if`, `let`, `def`, `lambda`).
    pub fn is_keyword(&self) -> bool {
        matches!(&self.kind, TokenKind::Symbol(s) if evo_types::is_keyword(s))
    }
}

/// Every token kind in Evo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// Operator names and identifiers: `+`, `>=`, `add`, `make-adder`
    Symbol(String),
    /// Base-10 integer literal with optional leading `-`: `42`, `-7`
    Integer(i64),
    /// `true` or `false`
    Boolean(bool),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Symbol(s) => f.write_str(s),
            TokenKind::Integer(n) => write!(f, "{n}"),
            TokenKind::Boolean(b) => write!(f, "{b}"),
        }
    }
}

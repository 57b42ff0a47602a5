//! Shared types for the Evo expression engine.
//!
//! This crate defines the AST node types, source spans and the boundary
//! error type used across the lexer, parser and evaluator.

mod error;
mod span;
pub mod ast;
pub mod stack;

pub use error::{ErrorCategory, ErrorCode, EvoError};
pub use span::{Position, SourceFile, Span};
pub use stack::ensure_sufficient_stack;

/// Result type used at the engine boundary.
pub type Result<T> = std::result::Result<T, EvoError>;

/// Reserved head symbols with a fixed-shape form.
pub const KEYWORDS: &[&str] = &["if", "let", "def", "function", "lambda"];

/// Returns `true` if `name` is a reserved form keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

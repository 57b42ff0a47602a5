//! Parser error type.

use evo_types::{ErrorCode, EvoError, Span};
use thiserror::Error;

/// Errors that can occur while building an expression from tokens.
///
/// Parsing stops at the first error; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token that cannot appear where it was found.
    #[error("unexpected '{found}', expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        span: Span,
    },

    /// The token stream ended before an expression was complete.
    #[error("unexpected end of input: {context}")]
    UnexpectedEof { context: String, span: Span },

    /// An unclosed `(` or a stray `)`.
    #[error("unbalanced parentheses: {detail}")]
    UnbalancedParens { detail: String, span: Span },

    /// A reserved form with the wrong number of parts.
    #[error("'{form}' expects {expected} operands, found {found}")]
    ArityMismatch {
        form: &'static str,
        expected: usize,
        found: usize,
        span: Span,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEof { span, .. }
            | Self::UnbalancedParens { span, .. }
            | Self::ArityMismatch { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedToken { .. } => ErrorCode::UNEXPECTED_TOKEN,
            Self::UnexpectedEof { .. } => ErrorCode::UNEXPECTED_EOF,
            Self::UnbalancedParens { .. } => ErrorCode::UNBALANCED_PARENS,
            Self::ArityMismatch { .. } => ErrorCode::FORM_ARITY_MISMATCH,
        }
    }
}

impl From<ParseError> for EvoError {
    fn from(err: ParseError) -> Self {
        EvoError::new(err.code(), err.to_string(), Some(err.span()))
    }
}

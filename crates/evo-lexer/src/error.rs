//! Lexer error type.

use evo_types::{ErrorCode, EvoError, Span};
use thiserror::Error;

/// Errors that can occur while lexing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A run of characters that cannot form any token.
    #[error("invalid token '{text}': {reason}")]
    InvalidToken {
        text: String,
        reason: String,
        span: Span,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            Self::InvalidToken { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidToken { .. } => ErrorCode::INVALID_TOKEN,
        }
    }
}

impl From<LexError> for EvoError {
    fn from(err: LexError) -> Self {
        EvoError::new(err.code(), err.to_string(), Some(err.span()))
    }
}

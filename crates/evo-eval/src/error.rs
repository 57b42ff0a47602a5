//! Runtime error types for the Evo evaluator.

use evo_types::{ErrorCode, EvoError, Span};
use thiserror::Error;

/// Evaluation error. Terminal for the expression being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unbound symbol '{name}'")]
    UnboundSymbol { name: String, span: Span },

    /// Wrong kind of value, including calling something that is not callable.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
        span: Span,
    },

    /// Argument count differs from the callee's parameter count.
    #[error("'{callee}' expects {expected} arguments, found {found}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("integer overflow in '{op}'")]
    IntegerOverflow { op: &'static str, span: Span },
}

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnboundSymbol { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::ArityMismatch { span, .. }
            | Self::DivisionByZero { span }
            | Self::IntegerOverflow { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnboundSymbol { .. } => ErrorCode::UNBOUND_SYMBOL,
            Self::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::ArityMismatch { .. } => ErrorCode::ARITY_MISMATCH,
            Self::DivisionByZero { .. } => ErrorCode::DIVISION_BY_ZERO,
            Self::IntegerOverflow { .. } => ErrorCode::INTEGER_OVERFLOW,
        }
    }
}

impl From<EvalError> for EvoError {
    fn from(err: EvalError) -> Self {
        EvoError::new(err.code(), err.to_string(), Some(err.span()))
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

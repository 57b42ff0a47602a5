use crate::{SourceFile, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage an error came from, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Lex,
    Parse,
    Eval,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex => write!(f, "lex"),
            Self::Parse => write!(f, "parse"),
            Self::Eval => write!(f, "eval"),
        }
    }
}

/// Stable numeric error code (E100–E399).
///
/// Codes are part of the boundary contract: hosts match on them, so an
/// existing code is never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Lex errors (E100–E199) ──
    pub const INVALID_TOKEN: Self = Self(100);

    // ── Parse errors (E200–E299) ──
    pub const UNEXPECTED_TOKEN: Self = Self(200);
    pub const UNEXPECTED_EOF: Self = Self(201);
    pub const UNBALANCED_PARENS: Self = Self(202);
    pub const FORM_ARITY_MISMATCH: Self = Self(203);

    // ── Eval errors (E300–E399) ──
    pub const UNBOUND_SYMBOL: Self = Self(300);
    pub const TYPE_MISMATCH: Self = Self(301);
    pub const ARITY_MISMATCH: Self = Self(302);
    pub const DIVISION_BY_ZERO: Self = Self(303);
    pub const INTEGER_OVERFLOW: Self = Self(304);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Lex,
            200..=299 => ErrorCategory::Parse,
            _ => ErrorCategory::Eval,
        }
    }

    /// Short kind name, e.g. `DivisionByZero`.
    pub fn kind(self) -> &'static str {
        match self {
            Self::INVALID_TOKEN => "InvalidToken",
            Self::UNEXPECTED_TOKEN => "UnexpectedToken",
            Self::UNEXPECTED_EOF => "UnexpectedEOF",
            Self::UNBALANCED_PARENS => "UnbalancedParens",
            Self::FORM_ARITY_MISMATCH | Self::ARITY_MISMATCH => "ArityMismatch",
            Self::UNBOUND_SYMBOL => "UnboundSymbol",
            Self::TYPE_MISMATCH => "TypeMismatch",
            Self::DIVISION_BY_ZERO => "DivisionByZero",
            Self::INTEGER_OVERFLOW => "IntegerOverflow",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// An error as it crosses the engine boundary.
///
/// Every lex, parse and eval failure is converted into this shape, so
/// callers can match on `code` rather than parse free-form messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvoError {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    /// Human-readable message.
    pub message: String,
    /// Where the error happened, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// The source line containing `span`, filled in by [`EvoError::with_source`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<String>,
}

impl EvoError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: None,
        }
    }

    /// Attach the offending source line, if the span points into `source`.
    pub fn with_source(mut self, source: &SourceFile) -> Self {
        if let Some(span) = self.span {
            self.source_line = source.line(span.start.line).map(String::from);
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        self.code.kind()
    }
}

impl fmt::Display for EvoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "{}: {} [{}] {}",
                span,
                self.code,
                self.kind(),
                self.message
            ),
            None => write!(f, "{} [{}] {}", self.code, self.kind(), self.message),
        }
    }
}

impl std::error::Error for EvoError {}

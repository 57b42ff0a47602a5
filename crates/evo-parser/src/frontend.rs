//! Source-level parser object: lexes, then parses with the configured
//! grammar.

use std::fmt;

use evo_lexer::{tokenize, Token};
use evo_types::ast::Expr;
use evo_types::{EvoError, SourceFile};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::extension::{GrammarExtension, LenientGrammar};
use crate::parser;

/// Parser settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Try the extended grammar before the strict one.
    pub enable_nlu: bool,
}

/// Parses source text into an expression, without evaluating it.
pub struct Parser {
    config: ParserConfig,
    extension: Box<dyn GrammarExtension>,
}

impl Parser {
    /// A parser using [`LenientGrammar`] as its extended front-end.
    pub fn new(config: ParserConfig) -> Self {
        Self::with_extension(config, Box::new(LenientGrammar))
    }

    pub fn with_extension(config: ParserConfig, extension: Box<dyn GrammarExtension>) -> Self {
        Self { config, extension }
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Parse `source`, which must hold exactly one expression.
    pub fn parse(&self, source: &str) -> Result<Expr, EvoError> {
        let tokens = tokenize(source).map_err(|e| with_source(e.into(), source))?;
        self.parse_tokens(&tokens)
            .map_err(|e| with_source(e.into(), source))
    }

    /// Parse `source` as zero or more top-level expressions.
    ///
    /// Only the strict grammar applies here.
    pub fn parse_program(&self, source: &str) -> Result<Vec<Expr>, EvoError> {
        let tokens = tokenize(source).map_err(|e| with_source(e.into(), source))?;
        parser::parse_program(&tokens).map_err(|e| with_source(e.into(), source))
    }

    /// Parse a token stream. With `enable_nlu` set, the extension runs
    /// first; if it fails the strict grammar's result is returned.
    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<Expr, ParseError> {
        if self.config.enable_nlu {
            match self.extension.parse(tokens) {
                Ok(expr) => {
                    tracing::debug!(extension = self.extension.name(), "extended grammar accepted input");
                    return Ok(expr);
                }
                Err(err) => {
                    tracing::trace!(extension = self.extension.name(), %err, "extended grammar failed, using strict grammar");
                }
            }
        }
        parser::parse(tokens)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.config)
            .field("extension", &self.extension.name())
            .finish()
    }
}

fn with_source(err: EvoError, source: &str) -> EvoError {
    err.with_source(&SourceFile::new("<input>", source))
}

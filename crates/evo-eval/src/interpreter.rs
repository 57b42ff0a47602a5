//! Interpreter sessions: a global frame that persists across calls.

use evo_parser::{Parser, ParserConfig};
use evo_types::{EvoError, SourceFile};
use serde::{Deserialize, Serialize};

use crate::builtins;
use crate::env::Environment;
use crate::error::EvalResult;
use crate::evaluator::eval;
use crate::value::Value;

/// Interpreter settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub parser: ParserConfig,
}

/// A stateful interpreter.
///
/// Owns one global frame. Bindings made by `def` persist across calls; a call
/// that fails leaves the global frame exactly as it was before the call.
#[derive(Debug)]
pub struct Interpreter {
    globals: Environment,
    parser: Parser,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        let globals = Environment::new();
        builtins::install(&globals);
        Self {
            globals,
            parser: Parser::new(config.parser),
        }
    }

    pub fn config(&self) -> InterpreterConfig {
        InterpreterConfig {
            parser: self.parser.config(),
        }
    }

    /// Evaluate one expression and render the result.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn execute(&mut self, source: &str) -> Result<String, EvoError> {
        self.eval(source).map(|value| value.to_string())
    }

    /// Evaluate one expression.
    pub fn eval(&mut self, source: &str) -> Result<Value, EvoError> {
        let expr = self.parser.parse(source)?;
        self.commit_or_rollback(source, |globals| eval(&expr, globals))
    }

    /// Evaluate every top-level form in `source` in order, returning the
    /// last value, or `None` if there were no forms.
    ///
    /// All forms succeed or none of their bindings are kept.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn run(&mut self, source: &str) -> Result<Option<Value>, EvoError> {
        let forms = self.parser.parse_program(source)?;
        self.commit_or_rollback(source, |globals| {
            let mut last = None;
            for form in &forms {
                last = Some(eval(form, globals)?);
            }
            Ok(last)
        })
    }

    /// Returns `true` if `name` is bound in the global frame.
    pub fn is_bound(&self, name: &str) -> bool {
        self.globals.is_bound(name)
    }

    fn commit_or_rollback<T>(
        &mut self,
        source: &str,
        body: impl FnOnce(&Environment) -> EvalResult<T>,
    ) -> Result<T, EvoError> {
        let snapshot = self.globals.snapshot();
        match body(&self.globals) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.globals.restore(snapshot);
                tracing::debug!(code = %err.code(), "evaluation failed, global bindings rolled back");
                Err(EvoError::from(err).with_source(&SourceFile::new("<input>", source)))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter {
    // Functions defined here capture the global frame. Break that cycle only
    // when no returned value can still reach the frame.
    fn drop(&mut self) {
        if !self.globals.release() {
            tracing::debug!("global frame still referenced, kept alive");
        }
    }
}

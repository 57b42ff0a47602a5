//! Evo tree-walking evaluator.
//!
//! Two entry points share one core: [`evaluate`] runs a single expression
//! in a fresh global frame, and [`Interpreter`] keeps its global frame
//! across calls.

mod builtins;
pub mod env;
mod error;
mod evaluator;
mod interpreter;
mod value;

pub use builtins::{BuiltinOp, BUILTIN_NAMES};
pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::{apply, eval};
pub use interpreter::{Interpreter, InterpreterConfig};
pub use value::{Closure, Value};

use evo_types::EvoError;

/// Evaluate one expression with no state carried in or out, and render the
/// result.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn evaluate(source: &str) -> Result<String, EvoError> {
    Interpreter::new().execute(source)
}

//! The Evo engine as a WASM module for JavaScript hosts.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { evaluate, EvoInterpreter, EvoParser } from 'evo-wasm';
//!
//! await init();
//!
//! evaluate("(+ 1 2)");                 // "3"
//!
//! const interp = new EvoInterpreter();
//! interp.execute("(def add (x y) (+ x y))");
//! interp.eval("(add 3 4)");            // 7
//!
//! const parser = new EvoParser(false);
//! JSON.parse(parser.parse("(* 3 4)")); // { kind: { call: ... }, span: ... }
//! ```
//!
//! Failures throw a JS `Error` whose message is the rendered error,
//! e.g. `1:1: E303 [DivisionByZero] division by zero`.

use evo_eval::{Interpreter, Value};
use evo_parser::{Parser, ParserConfig};
use evo_types::EvoError;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Evaluate one expression in a fresh environment and return the rendered
/// result.
#[wasm_bindgen]
pub fn evaluate(source: &str) -> Result<String, JsError> {
    Ok(evo_eval::evaluate(source)?)
}

/// Evaluate one expression in a fresh environment.
///
/// Never throws. Returns a JSON string, either `{"ok":"3"}` or
/// `{"error":{"code":303,"category":"eval","message":...}}`.
#[wasm_bindgen]
pub fn evaluate_json(source: &str) -> String {
    outcome_json(evo_eval::evaluate(source))
}

/// Return the engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// A stateful interpreter. Definitions persist across calls.
#[wasm_bindgen]
pub struct EvoInterpreter {
    inner: Interpreter,
}

#[wasm_bindgen]
impl EvoInterpreter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> EvoInterpreter {
        EvoInterpreter {
            inner: Interpreter::new(),
        }
    }

    /// Evaluate and return the rendered result.
    pub fn execute(&mut self, source: &str) -> Result<String, JsError> {
        Ok(self.inner.execute(source)?)
    }

    /// Evaluate and return the value itself: a number, a boolean, or
    /// `{ function: { name, arity } }`.
    ///
    /// Integers outside the JS safe-integer range cannot be represented and
    /// throw; `execute` returns them exactly.
    pub fn eval(&mut self, source: &str) -> Result<JsValue, JsError> {
        let value = self.inner.eval(source)?;
        to_js_value(&value)
    }

    /// Returns `true` if `name` is bound in this interpreter's globals.
    #[wasm_bindgen(js_name = isBound)]
    pub fn is_bound(&self, name: &str) -> bool {
        self.inner.is_bound(name)
    }
}

impl Default for EvoInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses without evaluating.
#[wasm_bindgen]
pub struct EvoParser {
    inner: Parser,
}

#[wasm_bindgen]
impl EvoParser {
    #[wasm_bindgen(constructor)]
    pub fn new(enable_nlu: bool) -> EvoParser {
        EvoParser {
            inner: Parser::new(ParserConfig { enable_nlu }),
        }
    }

    /// Parse one expression and return its AST as JSON text.
    pub fn parse(&self, source: &str) -> Result<String, JsError> {
        let expr = self.inner.parse(source)?;
        Ok(serde_json::to_string(&expr)?)
    }
}

// ── Host-independent helpers ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome {
    Ok(String),
    Error(EvoError),
}

fn outcome_json(result: Result<String, EvoError>) -> String {
    let outcome = match result {
        Ok(rendered) => Outcome::Ok(rendered),
        Err(err) => Outcome::Error(err),
    };
    serde_json::to_string(&outcome).unwrap_or_else(|e| {
        format!(r#"{{"error":{{"message":"serialization error: {e}"}}}}"#)
    })
}

fn to_js_value(value: &Value) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}

//! Builtin arithmetic and comparison operators.
//!
//! Every builtin takes exactly two integers. Arithmetic is checked: a result
//! outside `i64` is an `IntegerOverflow` error, never a wrapped value.

use evo_types::Span;

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

/// Every name bound in a fresh global frame. Aliases share an operator.
pub const BUILTIN_NAMES: &[(&str, BuiltinOp)] = &[
    ("+", BuiltinOp::Add),
    ("-", BuiltinOp::Sub),
    ("*", BuiltinOp::Mul),
    ("/", BuiltinOp::Div),
    ("=", BuiltinOp::Eq),
    ("==", BuiltinOp::Eq),
    ("!=", BuiltinOp::Ne),
    ("<>", BuiltinOp::Ne),
    ("<", BuiltinOp::Lt),
    (">", BuiltinOp::Gt),
    ("<=", BuiltinOp::Le),
    (">=", BuiltinOp::Ge),
];

impl BuiltinOp {
    pub const ARITY: usize = 2;

    /// Canonical spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            BuiltinOp::Add => "+",
            BuiltinOp::Sub => "-",
            BuiltinOp::Mul => "*",
            BuiltinOp::Div => "/",
            BuiltinOp::Eq => "=",
            BuiltinOp::Ne => "!=",
            BuiltinOp::Lt => "<",
            BuiltinOp::Gt => ">",
            BuiltinOp::Le => "<=",
            BuiltinOp::Ge => ">=",
        }
    }

    pub fn from_symbol(name: &str) -> Option<Self> {
        BUILTIN_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, op)| *op)
    }

    /// Apply to already-evaluated arguments. `span` is the call site.
    pub fn apply(self, args: &[Value], span: Span) -> EvalResult<Value> {
        let [lhs, rhs] = args else {
            return Err(EvalError::ArityMismatch {
                callee: self.symbol().to_string(),
                expected: Self::ARITY,
                found: args.len(),
                span,
            });
        };
        let a = expect_integer(lhs, span)?;
        let b = expect_integer(rhs, span)?;
        let overflow = || EvalError::IntegerOverflow {
            op: self.symbol(),
            span,
        };

        Ok(match self {
            BuiltinOp::Add => Value::Integer(a.checked_add(b).ok_or_else(overflow)?),
            BuiltinOp::Sub => Value::Integer(a.checked_sub(b).ok_or_else(overflow)?),
            BuiltinOp::Mul => Value::Integer(a.checked_mul(b).ok_or_else(overflow)?),
            BuiltinOp::Div => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero { span });
                }
                // Truncates toward zero; only `i64::MIN / -1` can overflow.
                Value::Integer(a.checked_div(b).ok_or_else(overflow)?)
            }
            BuiltinOp::Eq => Value::Boolean(a == b),
            BuiltinOp::Ne => Value::Boolean(a != b),
            BuiltinOp::Lt => Value::Boolean(a < b),
            BuiltinOp::Gt => Value::Boolean(a > b),
            BuiltinOp::Le => Value::Boolean(a <= b),
            BuiltinOp::Ge => Value::Boolean(a >= b),
        })
    }
}

fn expect_integer(value: &Value, span: Span) -> EvalResult<i64> {
    value.as_integer().ok_or_else(|| EvalError::TypeMismatch {
        expected: "integer",
        found: value.to_string(),
        span,
    })
}

/// Bind every builtin name in `env`.
pub fn install(env: &Environment) {
    for (name, op) in BUILTIN_NAMES {
        env.define(*name, Value::Builtin(*op));
    }
}

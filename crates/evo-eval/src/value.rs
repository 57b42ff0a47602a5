//! Runtime values.

use std::fmt;
use std::rc::Rc;

use evo_types::ast::Expr;
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::builtins::BuiltinOp;
use crate::env::Environment;

/// A value produced by evaluation.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    /// A user function from `def` or `lambda`.
    Function(Rc<Closure>),
    /// A builtin operator bound in every global frame.
    Builtin(BuiltinOp),
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Builtin(_))
    }
}

impl PartialEq for Value {
    /// Functions compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Function(closure) => write!(f, "{closure}"),
            Value::Builtin(op) => write!(f, "#<builtin {}>", op.symbol()),
        }
    }
}

/// Integers and booleans serialise as themselves; callables as
/// `{"function": {"name": ..., "arity": ...}}`.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Function(closure) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    "function",
                    &CallableInfo {
                        name: closure.name.as_deref(),
                        arity: closure.arity(),
                    },
                )?;
                map.end()
            }
            Value::Builtin(op) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    "function",
                    &CallableInfo {
                        name: Some(op.symbol()),
                        arity: BuiltinOp::ARITY,
                    },
                )?;
                map.end()
            }
        }
    }
}

struct CallableInfo<'a> {
    name: Option<&'a str>,
    arity: usize,
}

impl Serialize for CallableInfo<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CallableInfo", 2)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("arity", &self.arity)?;
        s.end()
    }
}

/// A function value: parameters, body and the frame it was created in.
pub struct Closure {
    /// `None` for a `lambda`.
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Expr,
    pub env: Environment,
}

impl Closure {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Name used in arity errors.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("lambda")
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "#<function {name}/{}>", self.arity()),
            None => write!(f, "#<lambda/{}>", self.arity()),
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body.to_string())
            .finish_non_exhaustive()
    }
}

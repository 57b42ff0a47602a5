//! AST node types for Evo.
//!
//! Every node carries a [`Span`] for error reporting. The tree is immutable
//! once parsed and has no sharing: each node is owned by its parent.
//!
//! [`fmt::Display`] prints a node back as an s-expression, which re-parses
//! to an equal tree (modulo spans).
//!
//! Trees may be nested arbitrarily deep. Every recursive walk over [`Expr`]
//! (clone, compare, print, serialise) goes through
//! [`ensure_sufficient_stack`], and dropping a tree is iterative.

use crate::stack::ensure_sufficient_stack;
use crate::Span;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A spanned name: a `let` binding, a `def` name or a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A self-evaluating constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Literal {
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// An expression node.
#[derive(Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A childless node used to fill slots while a tree is torn down.
    fn leaf() -> Self {
        Self::new(ExprKind::Literal(Literal::Integer(0)), Span::default())
    }

    /// Returns the symbol name if this node is a bare symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Compare two trees ignoring spans.
    pub fn same_shape(&self, other: &Expr) -> bool {
        use ExprKind::*;

        fn same_idents(a: &[Ident], b: &[Ident]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.name == y.name)
        }

        ensure_sufficient_stack(|| match (&self.kind, &other.kind) {
            (Literal(a), Literal(b)) => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (
                If {
                    cond: c1,
                    then_branch: t1,
                    else_branch: e1,
                },
                If {
                    cond: c2,
                    then_branch: t2,
                    else_branch: e2,
                },
            ) => c1.same_shape(c2) && t1.same_shape(t2) && e1.same_shape(e2),
            (
                Let {
                    name: n1,
                    value: v1,
                    body: b1,
                },
                Let {
                    name: n2,
                    value: v2,
                    body: b2,
                },
            ) => n1.name == n2.name && v1.same_shape(v2) && b1.same_shape(b2),
            (
                Define {
                    name: n1,
                    params: p1,
                    body: b1,
                },
                Define {
                    name: n2,
                    params: p2,
                    body: b2,
                },
            ) => n1.name == n2.name && same_idents(p1, p2) && b1.same_shape(b2),
            (
                Lambda {
                    params: p1,
                    body: b1,
                },
                Lambda {
                    params: p2,
                    body: b2,
                },
            ) => same_idents(p1, p2) && b1.same_shape(b2),
            (
                Call {
                    callee: c1,
                    args: a1,
                },
                Call {
                    callee: c2,
                    args: a2,
                },
            ) => {
                c1.same_shape(c2)
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2).all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        })
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| Self::new(self.kind.clone(), self.span))
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        ensure_sufficient_stack(|| self.span == other.span && self.kind == other.kind)
    }
}

impl Eq for Expr {}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| {
            f.debug_struct("Expr")
                .field("kind", &self.kind)
                .field("span", &self.span)
                .finish()
        })
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ensure_sufficient_stack(|| {
            let mut node = serializer.serialize_struct("Expr", 2)?;
            node.serialize_field("kind", &self.kind)?;
            node.serialize_field("span", &self.span)?;
            node.end()
        })
    }
}

impl Drop for Expr {
    // Children are moved onto a worklist before they drop, so freeing a tree
    // never recurses.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.kind.detach_children(&mut pending);
        while let Some(mut child) = pending.pop() {
            child.kind.detach_children(&mut pending);
        }
    }
}

/// The closed set of expression forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// `42`, `-7`, `true`
    Literal(Literal),
    /// A name resolved in the environment, including builtin operators.
    Symbol(String),
    /// `(if cond then else)`
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `(let name value body)`
    Let {
        name: Ident,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    /// `(def name (params...) body)`
    Define {
        name: Ident,
        params: Vec<Ident>,
        body: Box<Expr>,
    },
    /// `(lambda (params...) body)`
    Lambda { params: Vec<Ident>, body: Box<Expr> },
    /// `(callee args...)`, covering builtin operators and user functions.
    Call { callee: Box<Expr>, args: Vec<Expr> },
}

impl ExprKind {
    /// Move every direct child into `out`, leaving leaves in their slots.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        fn take(slot: &mut Box<Expr>) -> Expr {
            std::mem::replace(slot.as_mut(), Expr::leaf())
        }

        match self {
            ExprKind::Literal(_) | ExprKind::Symbol(_) => {}
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.push(take(cond));
                out.push(take(then_branch));
                out.push(take(else_branch));
            }
            ExprKind::Let { value, body, .. } => {
                out.push(take(value));
                out.push(take(body));
            }
            ExprKind::Define { body, .. } | ExprKind::Lambda { body, .. } => {
                out.push(take(body));
            }
            ExprKind::Call { callee, args } => {
                out.push(take(callee));
                out.append(args);
            }
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Ident]) -> fmt::Result {
    f.write_str("(")?;
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{p}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Symbol(name) => f.write_str(name),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "(if {cond} {then_branch} {else_branch})"),
            ExprKind::Let { name, value, body } => write!(f, "(let {name} {value} {body})"),
            ExprKind::Define { name, params, body } => {
                write!(f, "(def {name} ")?;
                write_params(f, params)?;
                write!(f, " {body})")
            }
            ExprKind::Lambda { params, body } => {
                f.write_str("(lambda ")?;
                write_params(f, params)?;
                write!(f, " {body})")
            }
            ExprKind::Call { callee, args } => {
                write!(f, "({callee}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                f.write_str(")")
            }
        })
    }
}

//! Core expression evaluator.

use std::rc::Rc;

use evo_types::ast::{Expr, ExprKind, Ident, Literal};
use evo_types::{ensure_sufficient_stack, Span};

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::value::{Closure, Value};

/// Evaluate `expr` in `env`.
///
/// `def` binds into `env` itself; `let` bodies and function bodies run in
/// child frames that are discarded afterwards.
pub fn eval(expr: &Expr, env: &Environment) -> EvalResult<Value> {
    ensure_sufficient_stack(|| eval_inner(expr, env))
}

fn eval_inner(expr: &Expr, env: &Environment) -> EvalResult<Value> {
    match &expr.kind {
        ExprKind::Literal(Literal::Integer(n)) => Ok(Value::Integer(*n)),
        ExprKind::Literal(Literal::Boolean(b)) => Ok(Value::Boolean(*b)),
        ExprKind::Symbol(name) => env.lookup(name, expr.span),

        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            // Only `false` selects the else branch.
            match eval(cond, env)? {
                Value::Boolean(false) => eval(else_branch, env),
                _ => eval(then_branch, env),
            }
        }

        ExprKind::Let { name, value, body } => {
            let value = eval(value, env)?;
            let frame = env.child();
            frame.define(name.name.as_str(), value);
            run_in(&frame, body)
        }

        ExprKind::Define { name, params, body } => {
            let function = make_closure(Some(&name.name), params, body, env);
            env.define(name.name.as_str(), function.clone());
            tracing::trace!(name = %name.name, arity = params.len(), "defined function");
            Ok(function)
        }

        ExprKind::Lambda { params, body } => Ok(make_closure(None, params, body, env)),

        ExprKind::Call { callee, args } => {
            let callee = eval(callee, env)?;
            let args = args
                .iter()
                .map(|arg| eval(arg, env))
                .collect::<EvalResult<Vec<_>>>()?;
            apply(&callee, &args, expr.span)
        }
    }
}

fn make_closure(name: Option<&str>, params: &[Ident], body: &Expr, env: &Environment) -> Value {
    Value::Function(Rc::new(Closure {
        name: name.map(String::from),
        params: params.iter().map(|p| p.name.clone()).collect(),
        body: body.clone(),
        env: env.clone(),
    }))
}

/// Call `callee` with evaluated arguments. `span` is the call site.
pub fn apply(callee: &Value, args: &[Value], span: Span) -> EvalResult<Value> {
    match callee {
        Value::Builtin(op) => op.apply(args, span),
        Value::Function(closure) => call_closure(closure, args, span),
        other => Err(EvalError::TypeMismatch {
            expected: "a function",
            found: other.to_string(),
            span,
        }),
    }
}

#[tracing::instrument(level = "trace", skip_all, fields(function = closure.display_name(), args = args.len()))]
fn call_closure(closure: &Closure, args: &[Value], span: Span) -> EvalResult<Value> {
    if args.len() != closure.arity() {
        return Err(EvalError::ArityMismatch {
            callee: closure.display_name().to_string(),
            expected: closure.arity(),
            found: args.len(),
            span,
        });
    }
    let frame = closure.env.child();
    for (param, arg) in closure.params.iter().zip(args) {
        frame.define(param.as_str(), arg.clone());
    }
    run_in(&frame, &closure.body)
}

/// Evaluate `body` in a transient `frame`, then release the frame unless the
/// result (or anything else) still reaches it.
fn run_in(frame: &Environment, body: &Expr) -> EvalResult<Value> {
    let result = eval(body, frame);
    if frame.release() {
        tracing::trace!("released local frame");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use evo_parser::Parser;

    fn global() -> Environment {
        let env = Environment::new();
        builtins::install(&env);
        env
    }

    fn run(src: &str, env: &Environment) -> EvalResult<Value> {
        let expr = Parser::default().parse(src).unwrap();
        eval(&expr, env)
    }

    #[test]
    fn test_untaken_branch_not_evaluated() {
        let env = global();
        assert_eq!(run("(if true 1 (/ 1 0))", &env).unwrap(), Value::Integer(1));
        assert_eq!(run("(if false undefined 2)", &env).unwrap(), Value::Integer(2));
    }

    #[test]
    fn test_any_non_false_is_truthy() {
        let env = global();
        assert_eq!(run("(if 0 1 2)", &env).unwrap(), Value::Integer(1));
        assert_eq!(run("(if + 1 2)", &env).unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_closure_uses_captured_frame() {
        let env = global();
        run("(def make-adder (n) (lambda (x) (+ x n)))", &env).unwrap();
        run("(def add5 (x) ((make-adder 5) x))", &env).unwrap();
        // A caller-side `n` must not leak into the closure.
        assert_eq!(run("(let n 100 (add5 1))", &env).unwrap(), Value::Integer(6));
        env.clear();
    }

    #[test]
    fn test_non_callable() {
        let env = global();
        let err = run("(5 1 2)", &env).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "a function", .. }));
    }

    #[test]
    fn test_call_evaluates_callee_first() {
        let env = global();
        // The callee is unbound, so the division is never reached.
        let err = run("(nope (/ 1 0))", &env).unwrap_err();
        assert!(matches!(err, EvalError::UnboundSymbol { .. }));
    }

    #[test]
    fn test_local_helper_frame_is_freed() {
        let env = global();
        run("(def outer (n) (let helper (lambda (x) (* x 2)) (helper n)))", &env).unwrap();
        let expr = Parser::default()
            .parse("(let k 3 (def twice (x) (+ x k)))")
            .unwrap();
        // The returned function keeps its frame alive.
        let kept = eval(&expr, &env).unwrap();
        assert_eq!(apply(&kept, &[Value::Integer(1)], Span::default()), Ok(Value::Integer(4)));

        // A local `def` that does not escape is freed with its frame, which
        // drops the frame's handle on the global frame.
        let handles = env.handle_count();
        let local = Parser::default()
            .parse("(let k 3 (let f (def inner (x) (+ x k)) 0))")
            .unwrap();
        assert_eq!(eval(&local, &env), Ok(Value::Integer(0)));
        assert_eq!(run("(outer 21)", &env), Ok(Value::Integer(42)));
        assert_eq!(env.handle_count(), handles);
        drop(kept);
        env.clear();
    }

    #[test]
    fn test_apply_builtin_value() {
        let plus = global().get("+").unwrap();
        let sum = apply(&plus, &[Value::Integer(3), Value::Integer(4)], Span::default());
        assert_eq!(sum.unwrap(), Value::Integer(7));
    }
}

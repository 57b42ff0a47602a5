//! Parser tests: literals, symbols, reserved forms, calls, multi-form
//! programs, AST export and determinism.

use evo_lexer::tokenize;
use evo_parser::{parse, parse_program, ParseError, Parser, ParserConfig};
use evo_types::ast::*;
use pretty_assertions::assert_eq;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex and parse a single expression, panicking on any error.
fn parse_ok(source: &str) -> Expr {
    let tokens = tokenize(source).unwrap_or_else(|e| panic!("lex error: {e}"));
    parse(&tokens).unwrap_or_else(|e| panic!("parse error for {source:?}: {e}"))
}

/// Parse and print back as an s-expression.
fn round(source: &str) -> String {
    parse_ok(source).to_string()
}

// ─────────────────────────────────────────────────────────────────────
// Atoms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_literal() {
    let expr = parse_ok("42");
    assert_eq!(expr.kind, ExprKind::Literal(Literal::Integer(42)));
}

#[test]
fn test_negative_literal() {
    assert_eq!(
        parse_ok("-7").kind,
        ExprKind::Literal(Literal::Integer(-7))
    );
}

#[test]
fn test_boolean_literals() {
    assert_eq!(
        parse_ok("true").kind,
        ExprKind::Literal(Literal::Boolean(true))
    );
    assert_eq!(
        parse_ok("false").kind,
        ExprKind::Literal(Literal::Boolean(false))
    );
}

#[test]
fn test_bare_symbol() {
    assert_eq!(parse_ok("x").as_symbol(), Some("x"));
    assert_eq!(parse_ok("+").as_symbol(), Some("+"));
}

// ─────────────────────────────────────────────────────────────────────
// Calls
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_builtin_call() {
    let expr = parse_ok("(+ 1 2)");
    let ExprKind::Call { callee, args } = &expr.kind else {
        panic!("expected call, got {expr}");
    };
    assert_eq!(callee.as_symbol(), Some("+"));
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].kind, ExprKind::Literal(Literal::Integer(1)));
}

#[test]
fn test_call_without_args() {
    let expr = parse_ok("(f)");
    assert!(matches!(&expr.kind, ExprKind::Call { args, .. } if args.is_empty()));
}

#[test]
fn test_nested_calls() {
    assert_eq!(round("(+ (* 2 3) (- 10 4))"), "(+ (* 2 3) (- 10 4))");
}

#[test]
fn test_call_with_computed_callee() {
    let expr = parse_ok("((lambda (x) x) 5)");
    let ExprKind::Call { callee, args } = &expr.kind else {
        panic!("expected call");
    };
    assert!(matches!(callee.kind, ExprKind::Lambda { .. }));
    assert_eq!(args.len(), 1);
}

// ─────────────────────────────────────────────────────────────────────
// Reserved forms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_if_form() {
    let expr = parse_ok("(if (> x 0) 1 -1)");
    let ExprKind::If {
        cond,
        then_branch,
        else_branch,
    } = &expr.kind
    else {
        panic!("expected if");
    };
    assert_eq!(cond.to_string(), "(> x 0)");
    assert_eq!(then_branch.to_string(), "1");
    assert_eq!(else_branch.to_string(), "-1");
}

#[test]
fn test_let_form() {
    let expr = parse_ok("(let x 10 (+ x 5))");
    let ExprKind::Let { name, value, body } = &expr.kind else {
        panic!("expected let");
    };
    assert_eq!(name.name, "x");
    assert_eq!(value.to_string(), "10");
    assert_eq!(body.to_string(), "(+ x 5)");
}

#[test]
fn test_def_form() {
    let expr = parse_ok("(def add (x y) (+ x y))");
    let ExprKind::Define { name, params, body } = &expr.kind else {
        panic!("expected def");
    };
    assert_eq!(name.name, "add");
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y"]);
    assert_eq!(body.to_string(), "(+ x y)");
}

#[test]
fn test_def_with_no_params() {
    let expr = parse_ok("(def answer () 42)");
    assert!(matches!(&expr.kind, ExprKind::Define { params, .. } if params.is_empty()));
}

#[test]
fn test_function_is_def() {
    let expr = parse_ok("(function add (x y) (+ x y))");
    assert!(expr.same_shape(&parse_ok("(def add (x y) (+ x y))")));
    assert_eq!(expr.to_string(), "(def add (x y) (+ x y))");
}

#[test]
fn test_lambda_form() {
    assert_eq!(round("(lambda (a b) (* a b))"), "(lambda (a b) (* a b))");
}

#[test]
fn test_recursive_definition_round_trips() {
    let src = "(def fact (n) (if (<= n 1) 1 (* n (fact (- n 1)))))";
    assert_eq!(round(src), src);
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_form_span_covers_parens() {
    let expr = parse_ok("  (+ 1 2)");
    assert_eq!(expr.span.start.column, 3);
    assert_eq!(expr.span.end.column, 10);
}

#[test]
fn test_param_spans() {
    let expr = parse_ok("(def f (a bb) a)");
    let ExprKind::Define { params, .. } = &expr.kind else {
        panic!("expected def");
    };
    assert_eq!(params[1].span.start.column, 11);
}

// ─────────────────────────────────────────────────────────────────────
// Programs
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_program_of_several_forms() {
    let tokens = tokenize("(def sq (x) (* x x))\n(sq 4)\n7").unwrap();
    let forms = parse_program(&tokens).unwrap();
    assert_eq!(forms.len(), 3);
    assert!(matches!(forms[0].kind, ExprKind::Define { .. }));
    assert_eq!(forms[2].kind, ExprKind::Literal(Literal::Integer(7)));
}

#[test]
fn test_program_reports_unclosed_form() {
    let tokens = tokenize("(f 1)\n(g 2").unwrap();
    let err = parse_program(&tokens).unwrap_err();
    assert!(matches!(err, ParseError::UnbalancedParens { span, .. } if span.start.line == 2));
}

// ─────────────────────────────────────────────────────────────────────
// Parser object
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parser_object_parses_source() {
    let parser = Parser::new(ParserConfig::default());
    let expr = parser.parse("(* 3 4)").unwrap();
    assert_eq!(expr.to_string(), "(* 3 4)");
}

#[test]
fn test_parser_object_reports_lex_errors() {
    let parser = Parser::default();
    let err = parser.parse("(+ 1 99999999999999999999)").unwrap_err();
    assert_eq!(err.kind(), "InvalidToken");
    assert_eq!(
        err.source_line.as_deref(),
        Some("(+ 1 99999999999999999999)")
    );
}

#[test]
fn test_ast_json_export() {
    let expr = Parser::default().parse("(if true 1 2)").unwrap();
    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(json["kind"]["if"]["cond"]["kind"]["literal"]["boolean"], true);
    assert_eq!(json["kind"]["if"]["else_branch"]["kind"]["literal"]["integer"], 2);
}

#[test]
fn test_config_from_json() {
    let config: ParserConfig = serde_json::from_str(r#"{"enable_nlu": true}"#).unwrap();
    assert!(config.enable_nlu);
    let config: ParserConfig = serde_json::from_str("{}").unwrap();
    assert!(!config.enable_nlu);
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parser_determinism_100_iterations() {
    let src = "(def make-adder (n) (lambda (x) (+ x n)))";
    let first = parse_ok(src);
    for i in 0..100 {
        let again = parse_ok(src);
        assert_eq!(first, again, "Determinism failure at iteration {i}");
    }
}

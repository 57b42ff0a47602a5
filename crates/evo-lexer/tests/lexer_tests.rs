//! Lexer tests: delimiters, atom classification, whitespace handling,
//! invalid tokens, spans, and the 100-iteration determinism test.

use evo_lexer::{tokenize, LexError, TokenKind};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap_or_else(|e| panic!("lex failed for {source:?}: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn sym(s: &str) -> TokenKind {
    TokenKind::Symbol(s.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Delimiters & whitespace
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_parens() {
    assert_eq!(kinds("()"), vec![TokenKind::LParen, TokenKind::RParen]);
    assert_eq!(
        kinds("((  ))"),
        vec![
            TokenKind::LParen,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::RParen
        ]
    );
}

#[test]
fn test_unbalanced_parens_are_not_a_lex_error() {
    assert_eq!(kinds(")("), vec![TokenKind::RParen, TokenKind::LParen]);
}

#[test]
fn test_empty_and_blank_input() {
    assert!(kinds("").is_empty());
    assert!(kinds("  \n\t \r\n").is_empty());
}

#[test]
fn test_parens_split_atoms() {
    assert_eq!(
        kinds("(f(g)x)"),
        vec![
            TokenKind::LParen,
            sym("f"),
            TokenKind::LParen,
            sym("g"),
            TokenKind::RParen,
            sym("x"),
            TokenKind::RParen,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Atom classification
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_simple_call() {
    assert_eq!(
        kinds("(+ 1 2)"),
        vec![
            TokenKind::LParen,
            sym("+"),
            TokenKind::Integer(1),
            TokenKind::Integer(2),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_integers() {
    assert_eq!(
        kinds("0 42 -7 007 -0"),
        vec![
            TokenKind::Integer(0),
            TokenKind::Integer(42),
            TokenKind::Integer(-7),
            TokenKind::Integer(7),
            TokenKind::Integer(0),
        ]
    );
}

#[test]
fn test_integer_extremes() {
    assert_eq!(
        kinds("9223372036854775807 -9223372036854775808"),
        vec![TokenKind::Integer(i64::MAX), TokenKind::Integer(i64::MIN)]
    );
}

#[test]
fn test_no_float_class() {
    assert_eq!(kinds("3.14"), vec![sym("3.14")]);
}

#[test]
fn test_plus_prefixed_digits_are_symbols() {
    assert_eq!(kinds("+5"), vec![sym("+5")]);
}

#[test]
fn test_booleans() {
    assert_eq!(
        kinds("true false"),
        vec![TokenKind::Boolean(true), TokenKind::Boolean(false)]
    );
    assert_eq!(kinds("True"), vec![sym("True")]);
}

#[test]
fn test_operator_symbols() {
    assert_eq!(
        kinds("+ - * / > < >= <= = != <>"),
        ["+", "-", "*", "/", ">", "<", ">=", "<=", "=", "!=", "<>"]
            .iter()
            .map(|s| sym(s))
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_keywords_are_symbols() {
    let tokens = tokenize("if let def function lambda iffy").unwrap();
    let flags: Vec<bool> = tokens.iter().map(|t| t.is_keyword()).collect();
    assert_eq!(flags, vec![true, true, true, true, true, false]);
}

// ─────────────────────────────────────────────────────────────────────
// Invalid tokens
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_overflow_is_invalid() {
    let err = tokenize("(+ 99999999999999999999 1)").unwrap_err();
    let LexError::InvalidToken { text, span, .. } = &err;
    assert_eq!(text, "99999999999999999999");
    assert_eq!(span.start.column, 4);
}

#[test]
fn test_control_character_is_invalid() {
    let err = tokenize("(foo\u{7}bar)").unwrap_err();
    assert!(err.to_string().contains("control characters"), "{err}");
}

#[test]
fn test_lex_error_converts_to_boundary_error() {
    let err: evo_types::EvoError = tokenize("123456789012345678901").unwrap_err().into();
    assert_eq!(err.code, evo_types::ErrorCode::INVALID_TOKEN);
    assert_eq!(err.kind(), "InvalidToken");
}

// ─────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_token_spans_cover_text() {
    let src = "(let total 10 total)";
    for token in tokenize(src).unwrap() {
        let text = &src[token.span.start.offset as usize..token.span.end.offset as usize];
        assert_eq!(text, token.kind.to_string());
    }
}

// ─────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn any_i64_lexes_to_itself(n in any::<i64>()) {
        prop_assert_eq!(kinds(&n.to_string()), vec![TokenKind::Integer(n)]);
    }

    #[test]
    fn lexing_printable_ascii_never_panics(src in "[ -~\\n\\t]{0,64}") {
        let _ = tokenize(&src);
    }
}

#[test]
fn test_lexer_determinism_100_iterations() {
    let src = "(def fact (n) (if (<= n 1) 1 (* n (fact (- n 1)))))";
    let first = tokenize(src).unwrap();
    for i in 0..100 {
        assert_eq!(first, tokenize(src).unwrap(), "Determinism failure at iteration {i}");
    }
}

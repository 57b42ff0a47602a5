//! Core parser infrastructure: token cursor, error helpers, entry points.

use evo_lexer::{Token, TokenKind};
use evo_types::ast::{Expr, ExprKind, Literal};
use evo_types::{ensure_sufficient_stack, is_keyword, Position, Span};

use crate::error::ParseError;

/// Parse a token stream that must form exactly one expression.
#[tracing::instrument(level = "trace", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = ExprParser::new(tokens);
    if parser.at_end() {
        return Err(parser.eof_error("empty input"));
    }
    let expr = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parse a token stream holding zero or more top-level expressions.
#[tracing::instrument(level = "trace", skip_all, fields(tokens = tokens.len()))]
pub fn parse_program(tokens: &[Token]) -> Result<Vec<Expr>, ParseError> {
    let mut parser = ExprParser::new(tokens);
    let mut forms = Vec::new();
    while !parser.at_end() {
        forms.push(parser.parse_expr()?);
    }
    Ok(forms)
}

/// Recursive-descent parser over a borrowed token slice.
pub(crate) struct ExprParser<'t> {
    tokens: &'t [Token],
    /// Current index into `tokens`.
    pos: usize,
    /// Spans of `(` tokens not yet closed, innermost last.
    pub(crate) open_parens: Vec<Span>,
}

impl<'t> ExprParser<'t> {
    pub(crate) fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            open_parens: Vec::new(),
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Tokens not yet consumed.
    pub(crate) fn remaining(&self) -> &'t [Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    /// Zero-width span just past the last token.
    fn end_span(&self) -> Span {
        self.tokens
            .last()
            .map(|t| Span::point(t.span.end))
            .unwrap_or_else(|| Span::point(Position::START))
    }

    // ── Error Helpers ─────────────────────────────────────────────────────────

    /// The error for running out of tokens: an unclosed `(` if one is
    /// pending, otherwise a plain end-of-input error.
    pub(crate) fn eof_error(&self, context: &str) -> ParseError {
        match self.open_parens.last() {
            Some(open) => ParseError::UnbalancedParens {
                detail: "'(' is never closed".to_string(),
                span: *open,
            },
            None => ParseError::UnexpectedEof {
                context: context.to_string(),
                span: self.end_span(),
            },
        }
    }

    pub(crate) fn unexpected(token: &Token, expected: impl Into<String>) -> ParseError {
        ParseError::UnexpectedToken {
            found: token.kind.to_string(),
            expected: expected.into(),
            span: token.span,
        }
    }

    fn stray_close(span: Span) -> ParseError {
        ParseError::UnbalancedParens {
            detail: "')' has no matching '('".to_string(),
            span,
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(token) if token.kind == TokenKind::RParen => Err(Self::stray_close(token.span)),
            Some(token) => Err(Self::unexpected(
                token,
                "end of input after a complete expression",
            )),
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────────

    /// `Expr = Integer | Boolean | Symbol | "(" Form ")"`
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.advance() else {
            return Err(self.eof_error("expected an expression"));
        };
        match &token.kind {
            TokenKind::Integer(n) => Ok(Expr::new(
                ExprKind::Literal(Literal::Integer(*n)),
                token.span,
            )),
            TokenKind::Boolean(b) => Ok(Expr::new(
                ExprKind::Literal(Literal::Boolean(*b)),
                token.span,
            )),
            TokenKind::Symbol(name) if is_keyword(name) => Err(Self::unexpected(
                token,
                "an expression (keywords are only valid at the head of a form)",
            )),
            TokenKind::Symbol(name) => Ok(Expr::new(ExprKind::Symbol(name.clone()), token.span)),
            TokenKind::LParen => self.parse_form(token.span),
            TokenKind::RParen => Err(Self::stray_close(token.span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evo_lexer::tokenize;

    fn tokens(src: &str) -> Vec<Token> {
        tokenize(src).unwrap()
    }

    #[test]
    fn test_eof_error_prefers_open_paren() {
        let toks = tokens("(+ 1");
        let mut parser = ExprParser::new(&toks);
        parser.open_parens.push(toks[0].span);
        assert!(matches!(
            parser.eof_error("x"),
            ParseError::UnbalancedParens { span, .. } if span == toks[0].span
        ));
    }

    #[test]
    fn test_empty_eof_points_at_start() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.span(), Span::point(Position::START));
    }

    #[test]
    fn test_remaining_after_parse() {
        let toks = tokens("1 2 3");
        let mut parser = ExprParser::new(&toks);
        parser.parse_expr().unwrap();
        assert_eq!(parser.remaining().len(), 2);
    }

    #[test]
    fn test_program_of_zero_forms() {
        assert!(parse_program(&[]).unwrap().is_empty());
    }
}

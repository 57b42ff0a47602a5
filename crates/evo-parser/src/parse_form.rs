//! Parenthesised forms: the reserved `if`, `let`, `def` and `lambda` shapes,
//! and calls. `function` is accepted as another spelling of `def`.
//!
//! ```text
//! Form   = "if" Expr Expr Expr
//!        | "let" Name Expr Expr
//!        | ("def" | "function") Name Params Expr
//!        | "lambda" Params Expr
//!        | Expr Expr*
//! Params = "(" Name* ")"
//! ```

use evo_lexer::TokenKind;
use evo_types::ast::{Expr, ExprKind, Ident};
use evo_types::{is_keyword, Span};

use crate::error::ParseError;
use crate::parser::ExprParser;

/// The keyword of a reserved form and how many operands it takes.
struct FormHead {
    name: &'static str,
    span: Span,
    operands: usize,
}

impl<'t> ExprParser<'t> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse the inside of a form whose `(` has already been consumed.
    pub(crate) fn parse_form(&mut self, open: Span) -> Result<Expr, ParseError> {
        self.open_parens.push(open);
        let expr = self.parse_form_body(open)?;
        self.open_parens.pop();
        Ok(expr)
    }

    fn parse_form_body(&mut self, open: Span) -> Result<Expr, ParseError> {
        let Some(head) = self.peek() else {
            return Err(self.eof_error("expected a form"));
        };

        if let TokenKind::Symbol(name) = &head.kind {
            let reserved: Option<(&'static str, usize)> = match name.as_str() {
                "if" => Some(("if", 3)),
                "let" => Some(("let", 3)),
                "def" => Some(("def", 3)),
                "function" => Some(("function", 3)),
                "lambda" => Some(("lambda", 2)),
                _ => None,
            };
            if let Some((keyword, operands)) = reserved {
                self.advance();
                let form = FormHead {
                    name: keyword,
                    span: head.span,
                    operands,
                };
                return match keyword {
                    "if" => self.parse_if(open, &form),
                    "let" => self.parse_let(open, &form),
                    "def" | "function" => self.parse_def(open, &form),
                    _ => self.parse_lambda(open, &form),
                };
            }
        }

        if head.kind == TokenKind::RParen {
            return Err(ParseError::UnexpectedToken {
                found: "()".to_string(),
                expected: "an operator or function at the head of a form".to_string(),
                span: open.to(head.span),
            });
        }

        self.parse_call(open)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Reserved Forms
    // ══════════════════════════════════════════════════════════════════════════

    /// `(if cond then else)`
    fn parse_if(&mut self, open: Span, form: &FormHead) -> Result<Expr, ParseError> {
        self.expect_operand(form, 0)?;
        let cond = self.parse_expr()?;
        self.expect_operand(form, 1)?;
        let then_branch = self.parse_expr()?;
        self.expect_operand(form, 2)?;
        let else_branch = self.parse_expr()?;
        let close = self.finish_form(form)?;
        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            open.to(close),
        ))
    }

    /// `(let name value body)`
    fn parse_let(&mut self, open: Span, form: &FormHead) -> Result<Expr, ParseError> {
        self.expect_operand(form, 0)?;
        let name = self.parse_name("a symbol naming the binding")?;
        self.expect_operand(form, 1)?;
        let value = self.parse_expr()?;
        self.expect_operand(form, 2)?;
        let body = self.parse_expr()?;
        let close = self.finish_form(form)?;
        Ok(Expr::new(
            ExprKind::Let {
                name,
                value: Box::new(value),
                body: Box::new(body),
            },
            open.to(close),
        ))
    }

    /// `(def name (params...) body)`, also spelled `(function ...)`
    fn parse_def(&mut self, open: Span, form: &FormHead) -> Result<Expr, ParseError> {
        self.expect_operand(form, 0)?;
        let name = self.parse_name("a symbol naming the function")?;
        self.expect_operand(form, 1)?;
        let params = self.parse_params()?;
        self.expect_operand(form, 2)?;
        let body = self.parse_expr()?;
        let close = self.finish_form(form)?;
        Ok(Expr::new(
            ExprKind::Define {
                name,
                params,
                body: Box::new(body),
            },
            open.to(close),
        ))
    }

    /// `(lambda (params...) body)`
    fn parse_lambda(&mut self, open: Span, form: &FormHead) -> Result<Expr, ParseError> {
        self.expect_operand(form, 0)?;
        let params = self.parse_params()?;
        self.expect_operand(form, 1)?;
        let body = self.parse_expr()?;
        let close = self.finish_form(form)?;
        Ok(Expr::new(
            ExprKind::Lambda {
                params,
                body: Box::new(body),
            },
            open.to(close),
        ))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════════

    /// `(callee args...)`
    fn parse_call(&mut self, open: Span) -> Result<Expr, ParseError> {
        let callee = self.parse_expr()?;
        let mut args = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.eof_error("expected ')'")),
                Some(token) if token.kind == TokenKind::RParen => {
                    self.advance();
                    return Ok(Expr::new(
                        ExprKind::Call {
                            callee: Box::new(callee),
                            args,
                        },
                        open.to(token.span),
                    ));
                }
                Some(_) => args.push(self.parse_expr()?),
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Helpers
    // ══════════════════════════════════════════════════════════════════════════

    /// A bare, non-reserved symbol in a name position.
    fn parse_name(&mut self, expected: &str) -> Result<Ident, ParseError> {
        let Some(token) = self.advance() else {
            return Err(self.eof_error(expected));
        };
        match &token.kind {
            TokenKind::Symbol(name) if !is_keyword(name) => Ok(Ident::new(name.clone(), token.span)),
            _ => Err(Self::unexpected(token, expected)),
        }
    }

    /// `"(" Name* ")"`, rejecting duplicate names.
    fn parse_params(&mut self) -> Result<Vec<Ident>, ParseError> {
        let Some(open) = self.advance() else {
            return Err(self.eof_error("expected a parameter list"));
        };
        if open.kind != TokenKind::LParen {
            return Err(Self::unexpected(open, "a parenthesised parameter list"));
        }
        self.open_parens.push(open.span);

        let mut params: Vec<Ident> = Vec::new();
        loop {
            let Some(token) = self.advance() else {
                return Err(self.eof_error("expected ')'"));
            };
            match &token.kind {
                TokenKind::RParen => break,
                TokenKind::Symbol(name) if !is_keyword(name) => {
                    if params.iter().any(|p| &p.name == name) {
                        return Err(Self::unexpected(
                            token,
                            "a parameter name not already in this list",
                        ));
                    }
                    params.push(Ident::new(name.clone(), token.span));
                }
                _ => return Err(Self::unexpected(token, "a parameter name")),
            }
        }

        self.open_parens.pop();
        Ok(params)
    }

    /// Operand `index` of `form` must be present, not a closing `)`.
    fn expect_operand(&self, form: &FormHead, index: usize) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(self.eof_error("expected an operand")),
            Some(token) if token.kind == TokenKind::RParen => Err(ParseError::ArityMismatch {
                form: form.name,
                expected: form.operands,
                found: index,
                span: form.span,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Consume the `)` closing `form`, returning its span.
    fn finish_form(&mut self, form: &FormHead) -> Result<Span, ParseError> {
        match self.peek() {
            None => Err(self.eof_error("expected ')'")),
            Some(token) if token.kind == TokenKind::RParen => {
                self.advance();
                Ok(token.span)
            }
            Some(_) => Err(ParseError::ArityMismatch {
                form: form.name,
                expected: form.operands,
                found: form.operands + self.count_extra_operands()?,
                span: form.span,
            }),
        }
    }

    /// Count the operands between the cursor and the enclosing `)`.
    fn count_extra_operands(&self) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut count = 0;
        for token in self.remaining() {
            match token.kind {
                TokenKind::LParen => {
                    if depth == 0 {
                        count += 1;
                    }
                    depth += 1;
                }
                TokenKind::RParen if depth == 0 => return Ok(count),
                TokenKind::RParen => depth -= 1,
                _ if depth == 0 => count += 1,
                _ => {}
            }
        }
        Err(self.eof_error("expected ')'"))
    }
}

//! Extended grammar front-ends, tried before the strict grammar when the
//! parser's `enable_nlu` switch is on.

use evo_lexer::{Token, TokenKind};
use evo_types::ast::Expr;
use evo_types::Span;

use crate::error::ParseError;
use crate::parser::parse;

/// A front-end that accepts a superset of the strict grammar.
///
/// Implementations must agree with the strict grammar on every input the
/// strict grammar accepts.
pub trait GrammarExtension {
    /// Name used in log output.
    fn name(&self) -> &str;

    fn parse(&self, tokens: &[Token]) -> Result<Expr, ParseError>;
}

/// Tolerates missing punctuation.
///
/// - unclosed trailing `(` are closed at end of input
/// - a bare multi-token form such as `+ 1 2` is wrapped in parentheses
///
/// A stray `)` is never repaired.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientGrammar;

impl LenientGrammar {
    /// Rewrite `tokens` into a stream the strict grammar can read.
    pub fn repair(tokens: &[Token]) -> Result<Vec<Token>, ParseError> {
        let mut depth = 0usize;
        for token in tokens {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen if depth == 0 => {
                    return Err(ParseError::UnbalancedParens {
                        detail: "')' has no matching '('".to_string(),
                        span: token.span,
                    })
                }
                TokenKind::RParen => depth -= 1,
                _ => {}
            }
        }

        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return Err(ParseError::UnexpectedEof {
                context: "empty input".to_string(),
                span: Span::default(),
            });
        };
        let end = Span::point(last.span.end);

        let wrap = tokens.len() > 1 && first.kind != TokenKind::LParen;
        let mut repaired = Vec::with_capacity(tokens.len() + depth + 2);
        if wrap {
            repaired.push(Token::new(TokenKind::LParen, Span::point(first.span.start)));
        }
        repaired.extend_from_slice(tokens);
        repaired.extend((0..depth).map(|_| Token::new(TokenKind::RParen, end)));
        if wrap {
            repaired.push(Token::new(TokenKind::RParen, end));
        }
        Ok(repaired)
    }
}

impl GrammarExtension for LenientGrammar {
    fn name(&self) -> &str {
        "lenient"
    }

    fn parse(&self, tokens: &[Token]) -> Result<Expr, ParseError> {
        parse(&Self::repair(tokens)?)
    }
}

//! Core Evo lexer — converts source text to a token stream.
//!
//! The token set is deliberately tiny:
//! - `(` and `)` are delimiters
//! - any other maximal run of non-whitespace characters is an atom,
//!   classified as an integer, a boolean or a symbol
//!
//! There is no floating-point class; `/` is integer division at eval time.

use evo_types::{Position, Span};

use crate::error::LexError;
use crate::token::{Token, TokenKind};

const TRUE_LITERAL: &str = "true";
const FALSE_LITERAL: &str = "false";

/// Lex `source` into tokens. Zero tokens is a valid result.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}

/// The Evo lexer.
///
/// Walks the source once, tracking line and column for spans. Stops at the
/// first invalid atom.
pub struct Lexer<'src> {
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number in characters (1-based).
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.col)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn is_atom_char(ch: char) -> bool {
        !ch.is_whitespace() && ch != '(' && ch != ')'
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let start = self.position();
        let kind = match self.peek() {
            None => return Ok(None),
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some(_) => {
                while self.peek().is_some_and(Self::is_atom_char) {
                    self.advance();
                }
                let text = &self.source[start.offset as usize..self.pos];
                let span = Span::new(start, self.position());
                return classify_atom(text, span).map(|kind| Some(Token::new(kind, span)));
            }
        };
        Ok(Some(Token::new(kind, Span::new(start, self.position()))))
    }
}

/// Returns `true` for `-?[0-9]+`.
fn is_integer_shaped(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn classify_atom(text: &str, span: Span) -> Result<TokenKind, LexError> {
    let invalid = |reason: &str| LexError::InvalidToken {
        text: text.escape_debug().to_string(),
        reason: reason.to_string(),
        span,
    };

    if text.chars().any(char::is_control) {
        return Err(invalid("control characters are not allowed"));
    }

    if is_integer_shaped(text) {
        return text
            .parse::<i64>()
            .map(TokenKind::Integer)
            .map_err(|_| invalid("integer literal does not fit in 64 bits"));
    }

    Ok(match text {
        TRUE_LITERAL => TokenKind::Boolean(true),
        FALSE_LITERAL => TokenKind::Boolean(false),
        _ => TokenKind::Symbol(text.to_string()),
    })
}

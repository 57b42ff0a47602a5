//! Evo lexer: converts source text into a flat token stream.

mod error;
pub mod lexer;
pub mod token;

pub use error::LexError;
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};

//! Evo parser: converts a token stream into an AST.

mod error;
mod extension;
mod frontend;
mod parse_form;
mod parser;

pub use error::ParseError;
pub use extension::{GrammarExtension, LenientGrammar};
pub use frontend::{Parser, ParserConfig};
pub use parser::{parse, parse_program};

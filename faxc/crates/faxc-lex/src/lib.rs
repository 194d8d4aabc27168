//! faxc-lex — lexical analysis for the C subset.
//!
//! Produces a finite [`Token`] sequence terminated by `Eof`. White-space and
//! comments (`//` and `/* */`) are skipped; numeric-suffix classification
//! (`u`/`l`/`ll`, `f`/`l` for floats) happens here so later stages never
//! re-scan a lexeme.

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::{FloatSuffix, IntSuffix, Keyword, Token, TokenKind};

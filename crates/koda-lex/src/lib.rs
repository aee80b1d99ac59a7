//! koda-lex - Lexical Analysis for KODA Text
//!
//! Transforms `.koda` source text into a stream of tokens with source
//! positions. The lexer is the first phase of the text side of the codec:
//!
//! ```text
//! text -> lexer -> tokens -> parser -> Value
//! ```
//!
//! Malformed input is rejected here with a [`ParseError`] carrying the
//! start position of the offending token: unclosed strings and comments,
//! bad escapes, control characters in strings, malformed numbers, and
//! characters no token can start with.
//!
//! [`ParseError`]: koda_util::ParseError

pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{tokenize, Lexer};
pub use token::{is_ident_continue, is_ident_start, Token, TokenKind};

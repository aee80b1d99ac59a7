//! koda-util - Foundation Types for the KODA Codec
//!
//! This crate provides the types shared by every phase of the codec:
//!
//! - [`span`] - source positions for tokens and text diagnostics
//! - [`value`] - the KODA value tree ([`Value`] and [`Object`])
//! - [`error`] - the closed error taxonomy for parse/encode/decode
//! - [`limits`] - default resource limits for adversarial-input bounds
//!
//! The codec phases (`koda-lex`, `koda-text`, `koda-bin`) all build on
//! these types; the `koda` facade re-exports them.

pub mod error;
pub mod limits;
pub mod span;
pub mod value;

pub use error::{
    DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind, Error, ParseError, ParseErrorKind,
};
pub use limits::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_DICTIONARY_SIZE, DEFAULT_MAX_INPUT_LENGTH,
    DEFAULT_MAX_STRING_LENGTH,
};
pub use span::{Pos, Span};
pub use value::{Object, Value};

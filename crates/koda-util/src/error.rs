//! The KODA error taxonomy.
//!
//! A closed set of failure categories: [`ParseError`] for text lex/parse
//! failures (carries a source position), [`EncodeError`] for binary encode
//! failures (carries the write offset), and [`DecodeError`] for binary
//! decode failures (carries the read offset). [`Error`] is the sum of the
//! three for the facade operations.
//!
//! Errors are terminal for the operation that raised them; no partial
//! value is ever returned alongside one.

use thiserror::Error;

use crate::span::Pos;

/// What went wrong while lexing or parsing KODA text.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A string literal reached end of input before its closing quote.
    #[error("Unclosed string")]
    UnclosedString,

    /// A `/* … */` comment was still open at end of input.
    #[error("Unclosed multi-line comment")]
    UnclosedComment,

    /// A raw byte in U+0000..=U+001F appeared inside a string literal.
    #[error("Control character in string")]
    ControlCharacter,

    /// A backslash escape that is not part of the escape table.
    #[error("Invalid escape sequence")]
    InvalidEscape,

    /// A number that does not match the numeric grammar.
    #[error("Invalid number")]
    InvalidNumber,

    /// A `0` digit followed by further digits.
    #[error("Invalid number: leading zero")]
    LeadingZero,

    /// An integer literal outside the signed 64-bit range.
    #[error("Integer out of range")]
    IntegerOutOfRange,

    /// An `e`/`E` exponent marker with no digits after it.
    #[error("Invalid exponent")]
    InvalidExponent,

    /// The same key appeared twice in one object.
    #[error("Duplicate key")]
    DuplicateKey,

    /// The parser needed one kind of token and saw another.
    #[error("Expected {0}")]
    Expected(&'static str),

    /// A character no KODA token can start with.
    #[error("Unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// Source text longer than the configured input limit.
    #[error("Input exceeds maximum length")]
    InputTooLong,

    /// Nesting deeper than the configured depth limit.
    #[error("Maximum nesting depth exceeded")]
    MaxDepth,
}

/// A text-side failure, positioned at the offending token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} at {pos}")]
pub struct ParseError {
    /// The failure category.
    pub kind: ParseErrorKind,
    /// Start position of the offending token.
    pub pos: Pos,
}

impl ParseError {
    /// Create a parse error at the given position.
    pub fn new(kind: ParseErrorKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

/// What went wrong while encoding a value to bytes.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// Nesting deeper than the configured depth limit.
    #[error("Maximum nesting depth exceeded")]
    MaxDepth,

    /// A string longer than the wire format's u32 length field can carry.
    #[error("String too long")]
    StringTooLong,

    /// A container with more entries than the u32 count field can carry.
    #[error("Too many elements")]
    TooManyElements,
}

/// A binary encode failure, positioned at the current write offset.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct EncodeError {
    /// The failure category.
    pub kind: EncodeErrorKind,
    /// Number of bytes written when the failure was detected.
    pub offset: usize,
}

impl EncodeError {
    /// Create an encode error at the given write offset.
    pub fn new(kind: EncodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// What went wrong while decoding bytes to a value.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// End of input before an expected byte.
    #[error("Truncated input")]
    Truncated,

    /// The first four bytes are not `KODA`.
    #[error("Invalid magic number")]
    InvalidMagic,

    /// A version byte this decoder does not understand.
    #[error("Unsupported version {0}")]
    UnsupportedVersion(u8),

    /// A dictionary length above the configured limit.
    #[error("Dictionary too large")]
    DictionaryTooLarge,

    /// A dictionary key length above the configured string limit.
    #[error("Key string too long")]
    KeyStringTooLong,

    /// A string payload length above the configured string limit.
    #[error("String too long")]
    StringTooLong,

    /// An object entry referencing a key index outside the dictionary.
    #[error("Invalid key index")]
    InvalidKeyIndex,

    /// A type tag with no assigned meaning.
    #[error("Unknown type tag 0x{0:02X}")]
    UnknownTag(u8),

    /// The reserved binary tag (0x07), which no encoder emits yet.
    #[error("Binary type not supported")]
    BinaryUnsupported,

    /// Bytes left over after the root value.
    #[error("Trailing bytes after root value")]
    TrailingBytes,

    /// The same key appeared twice in one decoded object.
    #[error("Duplicate key")]
    DuplicateKey,

    /// A string or key whose bytes are not well-formed UTF-8.
    #[error("Invalid UTF-8 in string")]
    InvalidUtf8,

    /// Nesting deeper than the configured depth limit.
    #[error("Maximum nesting depth exceeded")]
    MaxDepth,
}

/// A binary decode failure, positioned at the read offset where the
/// offending field starts.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct DecodeError {
    /// The failure category.
    pub kind: DecodeErrorKind,
    /// Read offset of the offending field.
    pub offset: usize,
}

impl DecodeError {
    /// Create a decode error at the given read offset.
    pub fn new(kind: DecodeErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Any KODA codec failure.
///
/// The facade operations return this sum so callers can hold one error
/// type while still matching on the side that failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Text lex/parse failure.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Binary encode failure.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Binary decode failure.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

//! koda - A Compact Data-Interchange Format
//!
//! KODA couples two representations of one value model: a human-editable
//! text syntax (`.koda`) and a canonical binary encoding (`.kod`). The
//! binary form is byte-deterministic - structurally equal values encode to
//! identical bytes - so encoded blobs can serve as content-addressed
//! artifacts, cache keys, or database blobs.
//!
//! Four operations convert between the in-memory [`Value`] tree and the
//! two representations:
//!
//! ```text
//! text  --parse-->  Value  --stringify-->  text
//! bytes --decode--> Value  --encode----->  bytes
//! ```
//!
//! # Examples
//!
//! ```
//! use koda::{decode, encode, parse, stringify, Value};
//!
//! let value = parse("name: \"my-app\" version: 1 enabled: true").unwrap();
//! let obj = value.as_object().unwrap();
//! assert_eq!(obj.get("version"), Some(&Value::Int(1)));
//!
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//!
//! let text = stringify(&value);
//! assert_eq!(parse(&text).unwrap(), value);
//! ```
//!
//! Text documents may be brace-less at the root, omit colons and commas,
//! carry `//` and nesting `/* */` comments, and quote strings with either
//! quote style; any legal input that also happens to be JSON parses to the
//! structurally equivalent value.
//!
//! Every operation is synchronous, allocation-bounded, and guarded by
//! configurable limits (nesting depth, input length, dictionary size,
//! string length); adversarial inputs fail with a named error before
//! proportional work happens.

pub use koda_bin::{DecodeOptions, EncodeOptions};
pub use koda_text::{ParseOptions, StringifyOptions};
pub use koda_util::error::{
    DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind, Error, ParseError, ParseErrorKind,
};
pub use koda_util::span::{Pos, Span};
pub use koda_util::value::{Object, Value};

/// Result of a KODA codec operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses KODA text into a [`Value`] with default options.
pub fn parse(source: &str) -> Result<Value> {
    parse_with(source, &ParseOptions::default())
}

/// Parses KODA text into a [`Value`].
pub fn parse_with(source: &str, options: &ParseOptions) -> Result<Value> {
    Ok(koda_text::parse(source, options)?)
}

/// Serializes a value to compact KODA text.
pub fn stringify(value: &Value) -> String {
    stringify_with(value, &StringifyOptions::default())
}

/// Serializes a value to KODA text, pretty-printed when
/// [`StringifyOptions::indent`] is non-empty.
pub fn stringify_with(value: &Value, options: &StringifyOptions) -> String {
    koda_text::stringify(value, options)
}

/// Encodes a value to canonical `.kod` bytes with default options.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    encode_with(value, &EncodeOptions::default())
}

/// Encodes a value to canonical `.kod` bytes.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>> {
    Ok(koda_bin::encode(value, options)?)
}

/// Decodes `.kod` bytes back into a [`Value`] with default options.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    decode_with(bytes, &DecodeOptions::default())
}

/// Decodes `.kod` bytes back into a [`Value`].
pub fn decode_with(bytes: &[u8], options: &DecodeOptions) -> Result<Value> {
    Ok(koda_bin::decode(bytes, options)?)
}

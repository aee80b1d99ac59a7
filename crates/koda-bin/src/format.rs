//! Wire-format constants for `.kod` streams.
//!
//! Layout:
//!
//! ```text
//! magic     4B 4F 44 41            "KODA"
//! version   01
//! dict_len  u32 big-endian
//! dict[i]   u32-BE key length, key bytes (UTF-8)
//! root      tagged value
//! ```
//!
//! Everything multi-byte is big-endian; there is no trailer, checksum, or
//! alignment padding.

/// The four magic bytes opening every `.kod` stream.
pub const MAGIC: [u8; 4] = *b"KODA";

/// The only format version this codec reads or writes.
pub const VERSION: u8 = 0x01;

/// Header length: magic plus version byte.
pub const HEADER_LEN: usize = 5;

/// Null value.
pub const TAG_NULL: u8 = 0x01;

/// Boolean false.
pub const TAG_FALSE: u8 = 0x02;

/// Boolean true.
pub const TAG_TRUE: u8 = 0x03;

/// Signed 64-bit integer, big-endian payload.
pub const TAG_INT: u8 = 0x04;

/// IEEE-754 binary64, raw bit pattern, big-endian.
pub const TAG_FLOAT: u8 = 0x05;

/// UTF-8 string: u32-BE length, then bytes.
pub const TAG_STRING: u8 = 0x06;

/// Reserved for byte strings. No encoder emits it; decoders must reject
/// it rather than skip it.
pub const TAG_BINARY: u8 = 0x07;

/// Array: u32-BE element count, then the encoded elements.
pub const TAG_ARRAY: u8 = 0x10;

/// Object: u32-BE entry count, then (u32-BE key index, value) pairs
/// sorted by the keys' UTF-8 byte order.
pub const TAG_OBJECT: u8 = 0x11;

//! koda-bin - The Canonical Binary Side of the KODA Codec
//!
//! Two operations over `.kod` byte streams:
//!
//! - [`encode`] - [`Value`] to bytes, canonically: structurally equal
//!   values produce byte-identical output because both the key dictionary
//!   and every object's entry list are sorted by UTF-8 byte order
//! - [`decode`] - bytes back to [`Value`], with strict validation and
//!   the security envelope (depth, dictionary size, string length)
//!
//! The wire layout is a five-byte header (`KODA` magic plus a version
//! byte), a global key dictionary, and one tagged root value. All integers
//! are big-endian; floats travel as raw binary64 bit patterns.
//!
//! [`Value`]: koda_util::Value

pub mod decode;
mod edge_cases;
pub mod encode;
pub mod format;

pub use decode::{decode, DecodeOptions};
pub use encode::{encode, EncodeOptions};

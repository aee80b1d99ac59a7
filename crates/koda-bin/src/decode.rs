//! The binary decoder.
//!
//! Validates the header, loads the key dictionary, and rebuilds the value
//! tree by tag dispatch. Input is a finite byte slice; the read offset
//! advances monotonically and every failure carries the offset of the
//! offending field. Declared lengths are checked against the configured
//! limits and against the remaining input before any proportional
//! allocation happens.

use koda_util::error::{DecodeError, DecodeErrorKind};
use koda_util::limits::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_DICTIONARY_SIZE, DEFAULT_MAX_STRING_LENGTH};
use koda_util::value::{Object, Value};

use crate::format::{
    MAGIC, TAG_ARRAY, TAG_BINARY, TAG_FALSE, TAG_FLOAT, TAG_INT, TAG_NULL, TAG_OBJECT, TAG_STRING,
    TAG_TRUE, VERSION,
};

/// Options for [`decode`].
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    /// Maximum nesting depth; the root sits at depth 0 and every nested
    /// array/object scope adds 1.
    pub max_depth: usize,

    /// Maximum number of key dictionary entries.
    pub max_dictionary_size: usize,

    /// Maximum byte length of any decoded string or key.
    pub max_string_length: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_dictionary_size: DEFAULT_MAX_DICTIONARY_SIZE,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

/// Bounds-checked reader over the input slice.
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes not yet consumed.
    #[inline]
    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Takes `len` bytes, or fails with `Truncated input` at the current
    /// offset.
    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::new(DecodeErrorKind::Truncated, self.offset));
        }
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i64(&mut self) -> Result<i64, DecodeError> {
        let b = self.read_bytes(8)?;
        Ok(i64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn read_f64(&mut self) -> Result<f64, DecodeError> {
        let b = self.read_bytes(8)?;
        Ok(f64::from_bits(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ])))
    }
}

/// Decodes a `.kod` byte stream back into a [`Value`].
///
/// Exactly one root value must span the whole input; leftover bytes are an
/// error.
///
/// # Example
///
/// ```
/// use koda_bin::decode::{decode, DecodeOptions};
/// use koda_util::value::Value;
///
/// let bytes = [0x4B, 0x4F, 0x44, 0x41, 0x01, 0, 0, 0, 0, 0x01];
/// assert_eq!(decode(&bytes, &DecodeOptions::default()).unwrap(), Value::Null);
/// ```
pub fn decode(data: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(data);

    let magic = reader.read_bytes(4)?;
    if magic != MAGIC {
        return Err(DecodeError::new(DecodeErrorKind::InvalidMagic, 0));
    }

    let version_at = reader.offset;
    let version = reader.read_u8()?;
    if version != VERSION {
        return Err(DecodeError::new(
            DecodeErrorKind::UnsupportedVersion(version),
            version_at,
        ));
    }

    let dictionary = read_dictionary(&mut reader, options)?;
    log::debug!("decoding with {} dictionary keys", dictionary.len());

    let value = decode_value(&mut reader, &dictionary, 0, options)?;

    if reader.remaining() > 0 {
        return Err(DecodeError::new(
            DecodeErrorKind::TrailingBytes,
            reader.offset,
        ));
    }
    Ok(value)
}

/// Reads the key dictionary that objects reference by index.
fn read_dictionary(
    reader: &mut Reader<'_>,
    options: &DecodeOptions,
) -> Result<Vec<String>, DecodeError> {
    let len_at = reader.offset;
    let dict_len = reader.read_u32()? as usize;
    if dict_len > options.max_dictionary_size {
        return Err(DecodeError::new(
            DecodeErrorKind::DictionaryTooLarge,
            len_at,
        ));
    }

    // Reservation capped by the input: every entry takes a 4-byte length.
    let mut dictionary = Vec::with_capacity(dict_len.min(reader.remaining() / 4));
    for _ in 0..dict_len {
        let key_at = reader.offset;
        let key_len = reader.read_u32()? as usize;
        if key_len > options.max_string_length {
            return Err(DecodeError::new(
                DecodeErrorKind::KeyStringTooLong,
                key_at,
            ));
        }
        let bytes = reader.read_bytes(key_len)?;
        let key = std::str::from_utf8(bytes)
            .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidUtf8, key_at + 4))?;
        dictionary.push(key.to_string());
    }
    Ok(dictionary)
}

/// Decodes one tagged value at the given depth.
fn decode_value(
    reader: &mut Reader<'_>,
    dictionary: &[String],
    depth: usize,
    options: &DecodeOptions,
) -> Result<Value, DecodeError> {
    if depth > options.max_depth {
        return Err(DecodeError::new(DecodeErrorKind::MaxDepth, reader.offset));
    }

    let tag_at = reader.offset;
    let tag = reader.read_u8()?;
    match tag {
        TAG_NULL => Ok(Value::Null),
        TAG_FALSE => Ok(Value::Bool(false)),
        TAG_TRUE => Ok(Value::Bool(true)),
        TAG_INT => Ok(Value::Int(reader.read_i64()?)),
        TAG_FLOAT => Ok(Value::Float(reader.read_f64()?)),

        TAG_STRING => {
            let len_at = reader.offset;
            let len = reader.read_u32()? as usize;
            if len > options.max_string_length {
                return Err(DecodeError::new(DecodeErrorKind::StringTooLong, len_at));
            }
            let bytes = reader.read_bytes(len)?;
            let text = std::str::from_utf8(bytes)
                .map_err(|_| DecodeError::new(DecodeErrorKind::InvalidUtf8, len_at + 4))?;
            Ok(Value::String(text.to_string()))
        }

        TAG_ARRAY => {
            let count = reader.read_u32()? as usize;
            // Every element costs at least its tag byte, so the input
            // bounds any honest count.
            let mut items = Vec::with_capacity(count.min(reader.remaining()));
            for _ in 0..count {
                items.push(decode_value(reader, dictionary, depth + 1, options)?);
            }
            Ok(Value::Array(items))
        }

        TAG_OBJECT => {
            let count = reader.read_u32()? as usize;
            // Every entry costs at least a 4-byte index plus a tag byte.
            let mut object = Object::with_capacity(count.min(reader.remaining() / 5));
            for _ in 0..count {
                let index_at = reader.offset;
                let index = reader.read_u32()? as usize;
                let key = dictionary
                    .get(index)
                    .ok_or_else(|| DecodeError::new(DecodeErrorKind::InvalidKeyIndex, index_at))?
                    .clone();
                let value = decode_value(reader, dictionary, depth + 1, options)?;
                if object.insert(key, value).is_some() {
                    return Err(DecodeError::new(DecodeErrorKind::DuplicateKey, index_at));
                }
            }
            Ok(Value::Object(object))
        }

        TAG_BINARY => Err(DecodeError::new(
            DecodeErrorKind::BinaryUnsupported,
            tag_at,
        )),
        _ => Err(DecodeError::new(DecodeErrorKind::UnknownTag(tag), tag_at)),
    }
}

//! The canonical binary encoder.
//!
//! Encoding happens in two passes. The first walks the whole tree and
//! collects the set of every object key, anywhere; sorted by UTF-8 byte
//! order this becomes the document's key dictionary. The second pass
//! writes the header, the dictionary, and the root value, emitting each
//! object's entries sorted by the same byte order and referencing keys by
//! dictionary index.
//!
//! Because both the dictionary and every entry list are re-sorted,
//! structurally equal values produce byte-identical output regardless of
//! how their objects were built up in memory.

use rustc_hash::{FxHashMap, FxHashSet};

use koda_util::error::{EncodeError, EncodeErrorKind};
use koda_util::limits::DEFAULT_MAX_DEPTH;
use koda_util::value::Value;

use crate::format::{
    MAGIC, TAG_ARRAY, TAG_FALSE, TAG_FLOAT, TAG_INT, TAG_NULL, TAG_OBJECT, TAG_STRING, TAG_TRUE,
    VERSION,
};

/// Options for [`encode`].
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Maximum nesting depth; the root sits at depth 0 and every nested
    /// array/object scope adds 1.
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Encodes a value into the canonical `.kod` byte stream.
///
/// # Example
///
/// ```
/// use koda_bin::encode::{encode, EncodeOptions};
/// use koda_util::value::Value;
///
/// let bytes = encode(&Value::Null, &EncodeOptions::default()).unwrap();
/// assert_eq!(bytes, [0x4B, 0x4F, 0x44, 0x41, 0x01, 0, 0, 0, 0, 0x01]);
/// ```
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let mut keys = FxHashSet::default();
    collect_keys(value, &mut keys);

    let mut dict: Vec<&str> = keys.into_iter().collect();
    dict.sort_unstable();

    let mut index: FxHashMap<&str, u32> = FxHashMap::default();
    index.reserve(dict.len());
    for (i, key) in dict.iter().enumerate() {
        index.insert(*key, i as u32);
    }

    log::debug!("encoding with {} dictionary keys", dict.len());

    let mut buf = Vec::new();
    buf.extend_from_slice(&MAGIC);
    buf.push(VERSION);

    let dict_len = checked_u32(dict.len(), EncodeErrorKind::TooManyElements, buf.len())?;
    buf.extend_from_slice(&dict_len.to_be_bytes());
    for key in &dict {
        let key_len = checked_u32(key.len(), EncodeErrorKind::StringTooLong, buf.len())?;
        buf.extend_from_slice(&key_len.to_be_bytes());
        buf.extend_from_slice(key.as_bytes());
    }

    encode_value(value, 0, &mut buf, &index, options.max_depth)?;
    Ok(buf)
}

/// Walks the tree iteratively and collects every object key, anywhere,
/// into one deduplicated set. The worklist keeps the scan safe on trees
/// deeper than the encode bound; the depth check happens during the write
/// pass.
fn collect_keys<'a>(root: &'a Value, keys: &mut FxHashSet<&'a str>) {
    let mut stack = vec![root];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items.iter()),
            Value::Object(obj) => {
                for (key, child) in obj.iter() {
                    keys.insert(key.as_str());
                    stack.push(child);
                }
            }
            _ => {}
        }
    }
}

/// Narrows a length to the wire format's u32 field.
fn checked_u32(n: usize, kind: EncodeErrorKind, offset: usize) -> Result<u32, EncodeError> {
    u32::try_from(n).map_err(|_| EncodeError::new(kind, offset))
}

/// Writes one tagged value at the given depth.
fn encode_value(
    value: &Value,
    depth: usize,
    buf: &mut Vec<u8>,
    index: &FxHashMap<&str, u32>,
    max_depth: usize,
) -> Result<(), EncodeError> {
    if depth > max_depth {
        return Err(EncodeError::new(EncodeErrorKind::MaxDepth, buf.len()));
    }

    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Bool(false) => buf.push(TAG_FALSE),
        Value::Bool(true) => buf.push(TAG_TRUE),
        Value::Int(n) => {
            buf.push(TAG_INT);
            buf.extend_from_slice(&n.to_be_bytes());
        }
        Value::Float(f) => {
            buf.push(TAG_FLOAT);
            buf.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Value::String(s) => {
            buf.push(TAG_STRING);
            let len = checked_u32(s.len(), EncodeErrorKind::StringTooLong, buf.len())?;
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Array(items) => {
            buf.push(TAG_ARRAY);
            let count = checked_u32(items.len(), EncodeErrorKind::TooManyElements, buf.len())?;
            buf.extend_from_slice(&count.to_be_bytes());
            for item in items {
                encode_value(item, depth + 1, buf, index, max_depth)?;
            }
        }
        Value::Object(obj) => {
            buf.push(TAG_OBJECT);
            let count = checked_u32(obj.len(), EncodeErrorKind::TooManyElements, buf.len())?;
            buf.extend_from_slice(&count.to_be_bytes());

            // Entries leave the map in insertion order; the wire wants
            // UTF-8 byte order.
            let mut entries: Vec<(&String, &Value)> = obj.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            for (key, child) in entries {
                buf.extend_from_slice(&index[key.as_str()].to_be_bytes());
                encode_value(child, depth + 1, buf, index, max_depth)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use koda_util::value::Object;

    /// Helper to encode with default options.
    fn encode_default(value: &Value) -> Vec<u8> {
        encode(value, &EncodeOptions::default()).expect("encoding should succeed")
    }

    fn object(pairs: &[(&str, Value)]) -> Value {
        let mut obj = Object::new();
        for (key, value) in pairs {
            obj.insert((*key).to_string(), value.clone());
        }
        Value::Object(obj)
    }

    #[test]
    fn test_scalar_encodings() {
        assert_eq!(encode_default(&Value::Null)[5..], [0, 0, 0, 0, 0x01]);
        assert_eq!(encode_default(&Value::Bool(false))[5..], [0, 0, 0, 0, 0x02]);
        assert_eq!(encode_default(&Value::Bool(true))[5..], [0, 0, 0, 0, 0x03]);
    }

    #[test]
    fn test_int_is_big_endian() {
        let bytes = encode_default(&Value::Int(1));
        assert_eq!(bytes[9..], [0x04, 0, 0, 0, 0, 0, 0, 0, 1]);

        let bytes = encode_default(&Value::Int(-1));
        assert_eq!(bytes[9..], [0x04, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_float_is_raw_bits() {
        let bytes = encode_default(&Value::Float(1.5));
        let mut expected = vec![0x05];
        expected.extend_from_slice(&1.5f64.to_bits().to_be_bytes());
        assert_eq!(&bytes[9..], expected.as_slice());
    }

    #[test]
    fn test_golden_two_key_object() {
        // {a: 1, b: 2}
        let value = object(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        let expected: Vec<u8> = [
            0x4B, 0x4F, 0x44, 0x41, 0x01, // magic, version
            0x00, 0x00, 0x00, 0x02, // dict length 2
            0x00, 0x00, 0x00, 0x01, 0x61, // "a"
            0x00, 0x00, 0x00, 0x01, 0x62, // "b"
            0x11, 0x00, 0x00, 0x00, 0x02, // object, 2 entries
            0x00, 0x00, 0x00, 0x00, // key 0 ("a")
            0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, // int 1
            0x00, 0x00, 0x00, 0x01, // key 1 ("b")
            0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, // int 2
        ]
        .to_vec();
        assert_eq!(encode_default(&value), expected);
    }

    #[test]
    fn test_canonical_across_insertion_orders() {
        let forward = object(&[("a", Value::Int(2)), ("b", Value::Int(1))]);
        let reverse = object(&[("b", Value::Int(1)), ("a", Value::Int(2))]);
        assert_eq!(encode_default(&forward), encode_default(&reverse));
    }

    #[test]
    fn test_dictionary_is_sorted_by_utf8_bytes() {
        // "Z" (0x5A) sorts before "a" (0x61) in byte order.
        let value = object(&[("a", Value::Int(1)), ("Z", Value::Int(2))]);
        let bytes = encode_default(&value);
        assert_eq!(bytes[5..9], [0, 0, 0, 2]);
        assert_eq!(bytes[13], b'Z');
        assert_eq!(bytes[18], b'a');
    }

    #[test]
    fn test_dictionary_deduplicates_nested_keys() {
        // The same key in two objects lands in the dictionary once.
        let inner = object(&[("k", Value::Int(1))]);
        let value = object(&[("k", inner)]);
        let bytes = encode_default(&value);
        assert_eq!(bytes[5..9], [0, 0, 0, 1]);
    }

    #[test]
    fn test_keys_inside_arrays_are_collected() {
        let element = object(&[("x", Value::Int(1))]);
        let value = Value::Array(vec![element]);
        let bytes = encode_default(&value);
        assert_eq!(bytes[5..9], [0, 0, 0, 1]);
        assert_eq!(bytes[13], b'x');
    }

    #[test]
    fn test_scalar_roots_have_empty_dictionary() {
        let bytes = encode_default(&Value::Int(9));
        assert_eq!(bytes[5..9], [0, 0, 0, 0]);
    }

    #[test]
    fn test_depth_limit() {
        let three_deep = object(&[("a", object(&[("b", object(&[("c", Value::Int(1))]))]))]);
        let options = EncodeOptions { max_depth: 2 };
        let err = encode(&three_deep, &options).unwrap_err();
        assert_eq!(err.kind, EncodeErrorKind::MaxDepth);

        let looser = EncodeOptions { max_depth: 3 };
        assert!(encode(&three_deep, &looser).is_ok());
    }

    #[test]
    fn test_depth_limit_in_arrays() {
        let value = Value::Array(vec![Value::Array(vec![Value::Array(vec![Value::Int(1)])])]);
        let err = encode(&value, &EncodeOptions { max_depth: 2 }).unwrap_err();
        assert_eq!(err.kind, EncodeErrorKind::MaxDepth);
    }

    #[test]
    fn test_string_encoding() {
        let bytes = encode_default(&Value::from("hi"));
        assert_eq!(bytes[9..], [0x06, 0, 0, 0, 2, b'h', b'i']);
    }

    #[test]
    fn test_empty_containers() {
        let bytes = encode_default(&Value::Array(vec![]));
        assert_eq!(bytes[9..], [0x10, 0, 0, 0, 0]);
        let bytes = encode_default(&object(&[]));
        assert_eq!(bytes[9..], [0x11, 0, 0, 0, 0]);
    }
}

//! The insertion-ordered object map.

use indexmap::IndexMap;

use super::Value;

/// An ordered mapping from string keys to values.
///
/// Keys keep their insertion order in memory, so a value round-trips
/// through text without reordering; the binary encoder re-sorts entries on
/// the fly instead of mutating the map. The underlying [`IndexMap`] also
/// gives O(1) duplicate detection: [`Object::insert`] returns the
/// displaced value when a key was already present, which is how the parser
/// and decoder reject duplicates.
///
/// # Examples
///
/// ```
/// use koda_util::value::{Object, Value};
///
/// let mut obj = Object::new();
/// assert!(obj.insert("name".into(), Value::from("koda")).is_none());
/// assert!(obj.insert("name".into(), Value::Null).is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    entries: IndexMap<String, Value>,
}

impl Object {
    /// Create an empty object.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Create an empty object with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a key/value pair, appending to the iteration order.
    ///
    /// Returns the previous value if the key was already present. Callers
    /// enforcing key uniqueness treat `Some` as a duplicate-key failure.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

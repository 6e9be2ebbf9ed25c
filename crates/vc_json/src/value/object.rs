use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;

use super::JsonValue;

/// Inserting a key that is already present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate object key `{0}`")]
pub struct DuplicateKey(pub String);

/// An ordered JSON object with unique keys.
///
/// Insertion order is preserved; inserting an existing key is rejected
/// instead of overwriting it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonObject {
    entries: IndexMap<String, JsonValue>,
}

impl JsonObject {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Builds an object, failing on the first repeated key.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, JsonValue)>,
    ) -> Result<Self, DuplicateKey> {
        let entries = entries.into_iter();
        let mut object = Self::with_capacity(entries.size_hint().0);
        for (key, value) in entries {
            object.insert(key, value)?;
        }
        Ok(object)
    }

    /// Appends an entry; fails if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Result<(), DuplicateKey> {
        match self.entries.entry(key.into()) {
            Entry::Occupied(entry) => Err(DuplicateKey(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    #[inline]
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonValue> {
        self.entries.iter()
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// A copy of this object without `key`, order preserved.
    pub fn without(&self, key: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Consumes the object, returning its entries in order.
    #[inline]
    pub fn into_entries(self) -> Vec<(String, JsonValue)> {
        self.entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a JsonValue);
    type IntoIter = indexmap::map::Iter<'a, String, JsonValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicates_and_keeps_order() {
        let mut object = JsonObject::new();
        object.insert("b", JsonValue::Int(1)).unwrap();
        object.insert("a", JsonValue::Int(2)).unwrap();
        assert_eq!(
            object.insert("b", JsonValue::Null),
            Err(DuplicateKey("b".into()))
        );
        assert_eq!(object.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(object.get("b"), Some(&JsonValue::Int(1)));
    }

    #[test]
    fn without_drops_one_key() {
        let object = JsonObject::from_entries([
            ("class".into(), JsonValue::from("Const")),
            ("number".into(), JsonValue::Int(2)),
        ])
        .unwrap();
        let rest = object.without("class");
        assert_eq!(rest.keys().collect::<Vec<_>>(), ["number"]);
        assert_eq!(object.len(), 2);
    }
}

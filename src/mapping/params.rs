//! The flat v1 parameter set.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered, case-sensitive multimap of string parameters.
///
/// Keys keep the position of their first insertion. `set` replaces every
/// value of a key (last write wins); `add` appends another value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatParamSet {
    entries: Vec<(String, Vec<String>)>,
}

impl FlatParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, key: &str) -> &mut Vec<String> {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Replace all values of `key` with `value`.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        let slot = self.slot(key.as_ref());
        slot.clear();
        slot.push(value.into());
    }

    /// Replace all values of `key` with `values`.
    pub fn set_all<I, V>(&mut self, key: impl AsRef<str>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let slot = self.slot(key.as_ref());
        slot.clear();
        slot.extend(values.into_iter().map(Into::into));
    }

    /// Append a value to `key`.
    pub fn add(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.slot(key.as_ref()).push(value.into());
    }

    /// Merge `other` into `self`; keys in `other` replace keys in `self`.
    pub fn merge(&mut self, other: &FlatParamSet) {
        for (key, values) in &other.entries {
            self.set_all(key, values.iter().cloned());
        }
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Every (key, value) pair in order; multi-valued keys repeat.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for FlatParamSet
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = FlatParamSet::new();
        for (k, v) in iter {
            params.add(k, v);
        }
        params
    }
}

impl fmt::Display for FlatParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Serializes as a JSON object; single values as strings, repeated keys as arrays.
impl Serialize for FlatParamSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            match values.as_slice() {
                [single] => map.serialize_entry(key, single)?,
                many => map.serialize_entry(key, many)?,
            }
        }
        map.end()
    }
}

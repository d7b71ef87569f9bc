//! String-keyed map type for rapid objects.
//!
//! [`RapidMap`] wraps an [`IndexMap`] so that iteration follows insertion
//! order in memory, which keeps debugging output and JSON conversions
//! predictable. The wire format does not care about that order: encoders
//! always write keys through [`RapidMap::sorted`], so two maps holding the same
//! entries produce byte-identical output no matter how they were built.
//!
//! Equality ignores order as well, matching what survives a round trip.
//!
//! ```rust
//! use serde_rapid::{RapidMap, Value};
//!
//! let mut map = RapidMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// An insertion-ordered map from string keys to `V`.
///
/// # Examples
///
/// ```rust
/// use serde_rapid::RapidMap;
///
/// let mut map = RapidMap::new();
/// map.insert("b".to_string(), 2);
/// map.insert("a".to_string(), 1);
///
/// // Iteration keeps insertion order...
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["b", "a"]);
///
/// // ...while the wire order is sorted.
/// let wire: Vec<_> = map.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
/// assert_eq!(wire, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RapidMap<V>(IndexMap<String, V>);

impl<V> RapidMap<V> {
    /// Creates an empty `RapidMap`.
    #[must_use]
    pub fn new() -> Self {
        RapidMap(IndexMap::new())
    }

    /// Creates an empty `RapidMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RapidMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_rapid::RapidMap;
    ///
    /// let mut map = RapidMap::new();
    /// assert!(map.insert("key".to_string(), 42).is_none());
    /// assert_eq!(map.insert("key".to_string(), 43), Some(42));
    /// ```
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, shifting later entries down to keep insertion order.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, V> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, V> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, V> {
        self.0.iter()
    }

    /// Returns the entries in canonical wire order: ascending by the bytes of
    /// the key.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&String, &V)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
        entries
    }

    /// Converts every value, keeping keys and order.
    pub fn map_values<U, F>(self, mut f: F) -> RapidMap<U>
    where
        F: FnMut(V) -> U,
    {
        RapidMap(self.0.into_iter().map(|(k, v)| (k, f(v))).collect())
    }
}

impl<V> Default for RapidMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<HashMap<String, V>> for RapidMap<V> {
    fn from(map: HashMap<String, V>) -> Self {
        RapidMap(map.into_iter().collect())
    }
}

impl<V> From<BTreeMap<String, V>> for RapidMap<V> {
    fn from(map: BTreeMap<String, V>) -> Self {
        RapidMap(map.into_iter().collect())
    }
}

impl<V> From<RapidMap<V>> for HashMap<String, V> {
    fn from(map: RapidMap<V>) -> Self {
        map.0.into_iter().collect()
    }
}

impl<V> IntoIterator for RapidMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a RapidMap<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = indexmap::map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V> FromIterator<(String, V)> for RapidMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        RapidMap(IndexMap::from_iter(iter))
    }
}

impl<V: Serialize> Serialize for RapidMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_order() {
        let a: RapidMap<i64> = [("x".to_string(), 1), ("y".to_string(), 2)]
            .into_iter()
            .collect();
        let b: RapidMap<i64> = [("y".to_string(), 2), ("x".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sorted_is_bytewise() {
        let map: RapidMap<i64> = ["b", "B", "a", "aa", ""]
            .iter()
            .map(|k| (k.to_string(), 0))
            .collect();
        let keys: Vec<_> = map.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["", "B", "a", "aa", "b"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: RapidMap<i64> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), i as i64))
            .collect();
        assert_eq!(map.remove("b"), Some(1));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_map_values() {
        let map: RapidMap<i64> = [("a".to_string(), 2)].into_iter().collect();
        let doubled = map.map_values(|v| v * 2);
        assert_eq!(doubled.get("a"), Some(&4));
    }
}

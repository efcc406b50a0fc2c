//! Key/value store with per-key comments and a footer.
//!
//! This module provides [`Store`], the flat building block of an INI document:
//! the global section and every named section each own one.
//!
//! A store keeps:
//!
//! - **Entries**: unique keys mapped to string values
//! - **Comments**: at most one comment per key, only for keys that are present
//! - **Footer**: an optional trailing comment not attached to any key
//!
//! Entries are kept in an [`IndexMap`] so that writing the same store twice
//! produces identical output. Equality ignores order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_tree::Store;
//!
//! let mut store = Store::new();
//! store.put("name", "Alice");
//! store.set_comment("name", "who is logged in").unwrap();
//!
//! assert_eq!(store.get("name"), Some("Alice"));
//! assert_eq!(store.comment("name"), Some("who is logged in"));
//!
//! // Removing a key drops its comment as well
//! store.remove("name");
//! assert!(store.comment("name").is_none());
//! ```

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    entries: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    comments: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    footer: Option<String>,
}

impl Store {
    /// Creates an empty `Store`.
    #[must_use]
    pub fn new() -> Self {
        Store::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Store {
            entries: IndexMap::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Inserts a key-value pair into the store.
    ///
    /// If the store already contained this key, the old value is returned and
    /// the key keeps its comment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Store;
    ///
    /// let mut store = Store::new();
    /// assert!(store.put("key", "1").is_none());
    /// assert_eq!(store.put("key", "2"), Some("1".to_string()));
    /// ```
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Removes a key together with its comment, returning the old value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.comments.shift_remove(key);
        self.entries.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store contains no entries.
    ///
    /// A store with only a footer is empty; see [`Store::has_content`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the store has entries or a footer, i.e. anything a
    /// writer would emit.
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.entries.is_empty() || self.footer.is_some()
    }

    /// Returns an iterator over the key-value pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn comment(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn has_comment(&self, key: &str) -> bool {
        self.comments.contains_key(key)
    }

    /// Attaches a comment to an existing key, returning the previous comment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKey`] if `key` is not in the store.
    pub fn set_comment(
        &mut self,
        key: &str,
        comment: impl Into<String>,
    ) -> Result<Option<String>> {
        if !self.entries.contains_key(key) {
            return Err(Error::UnknownKey(key.to_string()));
        }
        Ok(self.comments.insert(key.to_string(), comment.into()))
    }

    pub fn remove_comment(&mut self, key: &str) -> Option<String> {
        self.comments.shift_remove(key)
    }

    /// Returns an iterator over `(key, comment)` pairs.
    pub fn comments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.comments.iter().map(|(k, c)| (k.as_str(), c.as_str()))
    }

    #[must_use]
    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    /// Replaces the footer comment, returning the previous one.
    pub fn set_footer(&mut self, footer: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.footer, footer)
    }

    pub fn take_footer(&mut self) -> Option<String> {
        self.footer.take()
    }

    /// Removes all entries, comments and the footer.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.comments.clear();
        self.footer = None;
    }

    /// Compares entries only, ignoring comments and footers.
    ///
    /// ```rust
    /// use serde_ini_tree::Store;
    ///
    /// let mut a = Store::new();
    /// a.put("k", "v");
    /// let mut b = a.clone();
    /// b.set_footer(Some("trailing".to_string()));
    ///
    /// assert_ne!(a, b);
    /// assert!(a.eq_ignore_comments(&b));
    /// ```
    #[must_use]
    pub fn eq_ignore_comments(&self, other: &Store) -> bool {
        self.entries == other.entries
    }
}

impl From<HashMap<String, String>> for Store {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Store> for HashMap<String, String> {
    fn from(store: Store) -> Self {
        store.entries.into_iter().collect()
    }
}

impl IntoIterator for Store {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Store {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Store {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Default::default()
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Store {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_requires_key() {
        let mut store = Store::new();
        assert_eq!(
            store.set_comment("missing", "note"),
            Err(Error::UnknownKey("missing".to_string()))
        );

        store.put("present", "1");
        assert_eq!(store.set_comment("present", "first"), Ok(None));
        assert_eq!(
            store.set_comment("present", "second"),
            Ok(Some("first".to_string()))
        );
        assert_eq!(store.comment("present"), Some("second"));
    }

    #[test]
    fn test_put_keeps_comment() {
        let mut store = Store::new();
        store.put("k", "1");
        store.set_comment("k", "note").unwrap();
        store.put("k", "2");
        assert_eq!(store.comment("k"), Some("note"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Store = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: Store = [("y", "2"), ("x", "1")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_has_content() {
        let mut store = Store::new();
        assert!(!store.has_content());
        store.set_footer(Some("end".to_string()));
        assert!(store.is_empty());
        assert!(store.has_content());
        store.clear();
        assert!(!store.has_content());
    }
}

//! Section tree: a root store plus named sections addressed by dotted paths.
//!
//! A [`Tree`] owns the global (root) [`Store`] and a flat map from section
//! path to store. The parent of `a.b` is `a`, derived from the path string;
//! nothing links stores to each other.
//!
//! The tree also carries a cursor, the "current section", used by the
//! convenience methods ([`Tree::put`], [`Tree::get`], ...) and by relative
//! paths passed to [`Tree::switch_section`]. The cursor is not part of the
//! data: it is ignored by equality and not serialized.
//!
//! Addressing the *current* section creates an empty store for an unknown
//! path, while [`Tree::get_section`] never creates anything.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_tree::Tree;
//!
//! let mut tree = Tree::new();
//! tree.put("global", "1");
//!
//! tree.switch_section(Some("server"));
//! tree.put("port", "8080");
//!
//! tree.switch_section(Some(".tls"));
//! assert_eq!(tree.current_path(), Some("server.tls"));
//! tree.put("enabled", "true");
//!
//! assert_eq!(tree.get_section(Some("server.tls")).and_then(|s| s.get("enabled")), Some("true"));
//! assert!(tree.get_section(Some("missing")).is_none());
//! assert_eq!(tree.root().get("global"), Some("1"));
//! ```

use crate::path;
use crate::{Result, Store};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::io;

/// Values longer than this are shortened by [`Tree::list_all`].
const LIST_VALUE_WIDTH: usize = 40;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    root: Store,
    sections: IndexMap<String, Store>,
    #[serde(skip)]
    cursor: Option<String>,
}

/// One section in the depth-first pre-order produced by [`Tree::outline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionOutline<'a> {
    pub path: &'a str,
    /// Zero for top-level sections.
    pub depth: usize,
    /// `None` for an ancestor that only exists because a descendant has content.
    pub store: Option<&'a Store>,
}

impl Tree {
    /// Creates a tree with an empty root and the cursor at the root.
    #[must_use]
    pub fn new() -> Self {
        Tree::default()
    }

    #[must_use]
    pub fn root(&self) -> &Store {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Store {
        &mut self.root
    }

    /// Moves the cursor and returns its previous value.
    ///
    /// `None` selects the root. A path starting with `.` is resolved relative
    /// to the cursor, anything else is absolute. Empty segments are dropped,
    /// so `Some("")` also selects the root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.switch_section(Some(".parent")), None);
    /// assert_eq!(tree.switch_section(Some(".child")), Some("parent".to_string()));
    /// assert_eq!(tree.current_path(), Some("parent.child"));
    /// ```
    pub fn switch_section(&mut self, path: Option<&str>) -> Option<String> {
        let next = path.and_then(|p| {
            let resolved = path::resolve(self.cursor.as_deref(), p);
            path::normalize(&resolved).map(Cow::into_owned)
        });
        std::mem::replace(&mut self.cursor, next)
    }

    /// Moves the cursor to the parent of the current section, or to the root
    /// if the current section has no parent.
    pub fn switch_to_parent(&mut self) -> Option<String> {
        let parent = self
            .cursor
            .as_deref()
            .and_then(path::parent_path)
            .map(str::to_string);
        std::mem::replace(&mut self.cursor, parent)
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Returns the current section without creating it.
    #[must_use]
    pub fn current_section(&self) -> Option<&Store> {
        self.get_section(self.cursor.as_deref())
    }

    /// Returns the current section, creating an empty store if the cursor
    /// names an unknown path.
    pub fn current_section_mut(&mut self) -> &mut Store {
        match &self.cursor {
            None => &mut self.root,
            Some(path) => self.sections.entry(path.clone()).or_default(),
        }
    }

    /// Returns the parent of the current section, or the root when the
    /// current section has no parent or the parent does not exist.
    #[must_use]
    pub fn parent_section(&self) -> &Store {
        self.cursor
            .as_deref()
            .and_then(path::parent_path)
            .and_then(|parent| self.sections.get(parent))
            .unwrap_or(&self.root)
    }

    #[must_use]
    pub fn has_parent_section(&self) -> bool {
        self.cursor.as_deref().is_some_and(path::has_parent)
    }

    /// Looks up a store by path; `None` is the root. Never creates a store.
    #[must_use]
    pub fn get_section(&self, path: Option<&str>) -> Option<&Store> {
        match path.and_then(path::normalize) {
            None => Some(&self.root),
            Some(path) => self.sections.get(&*path),
        }
    }

    pub fn get_section_mut(&mut self, path: Option<&str>) -> Option<&mut Store> {
        match path.and_then(path::normalize) {
            None => Some(&mut self.root),
            Some(path) => self.sections.get_mut(&*path),
        }
    }

    /// Installs `store` at `path` (the root for `None`), returning the store it replaced.
    ///
    /// Paths are normalized like [`Tree::switch_section`] normalizes them, so
    /// `Some("")` installs a new root and `a..b` lands at `a.b`.
    pub fn set_section(&mut self, path: Option<&str>, store: Store) -> Option<Store> {
        match path.and_then(path::normalize) {
            None => Some(std::mem::replace(&mut self.root, store)),
            Some(path) => self.sections.insert(path.into_owned(), store),
        }
    }

    /// Removes a named section. The root cannot be removed.
    pub fn remove_section(&mut self, path: &str) -> Option<Store> {
        let path = path::normalize(path)?;
        self.sections.shift_remove(&*path)
    }

    /// Store at `path`, created empty if absent.
    pub(crate) fn section_entry(&mut self, path: &str) -> &mut Store {
        self.sections.entry(path.to_string()).or_default()
    }

    /// Store at `path` (`None` for the root), created empty if absent.
    pub(crate) fn store_at(&mut self, path: Option<&str>) -> &mut Store {
        match path {
            None => &mut self.root,
            Some(path) => self.section_entry(path),
        }
    }

    /// Iterates over the named sections (not the root).
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Store)> {
        self.sections.iter().map(|(p, s)| (p.as_str(), s))
    }

    pub fn section_paths(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of named sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// `true` when neither the root nor any section has content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.root.has_content() && self.sections.values().all(|s| !s.has_content())
    }

    /// Removes every section without content.
    pub fn trim(&mut self) {
        self.sections.retain(|_, store| store.has_content());
    }

    /// Empties the root, drops all sections and resets the cursor.
    pub fn clear(&mut self) {
        self.root.clear();
        self.sections.clear();
        self.cursor = None;
    }

    /// Puts an entry into the current section.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.current_section_mut().put(key, value)
    }

    /// Reads an entry from the current section.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.current_section().and_then(|s| s.get(key))
    }

    /// Attaches a comment to a key of the current section.
    pub fn set_comment(&mut self, key: &str, comment: impl Into<String>) -> Result<Option<String>> {
        self.current_section_mut().set_comment(key, comment)
    }

    #[must_use]
    pub fn footer(&self) -> Option<&str> {
        self.current_section().and_then(Store::footer)
    }

    pub fn set_footer(&mut self, footer: Option<String>) -> Option<String> {
        self.current_section_mut().set_footer(footer)
    }

    /// Returns the sections a writer emits, in depth-first pre-order.
    ///
    /// A section is listed if it has content or if any descendant does;
    /// siblings are ordered by name so the result does not depend on map
    /// iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for path in ["c", "a.b.x", "a"] {
    ///     tree.switch_section(Some(path));
    ///     tree.put("k", "v");
    /// }
    ///
    /// let paths: Vec<_> = tree.outline().iter().map(|s| (s.path, s.depth)).collect();
    /// assert_eq!(paths, vec![("a", 0), ("a.b", 1), ("a.b.x", 2), ("c", 0)]);
    /// ```
    #[must_use]
    pub fn outline(&self) -> Vec<SectionOutline<'_>> {
        let mut seen = HashSet::new();
        let mut visible = Vec::new();

        for (section_path, store) in &self.sections {
            if !store.has_content() {
                continue;
            }
            let mut current = Some(section_path.as_str());
            while let Some(p) = current {
                if !seen.insert(p) {
                    break;
                }
                visible.push(p);
                current = path::parent_path(p);
            }
        }

        visible.sort_by(|a, b| path::segments(a).cmp(path::segments(b)));
        visible
            .into_iter()
            .map(|p| SectionOutline {
                path: p,
                depth: path::depth(p) - 1,
                store: self.sections.get(p),
            })
            .collect()
    }

    /// Prints every store, including empty sections, for debugging.
    ///
    /// Values longer than 40 characters are shortened with `...`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if writing to `out` fails.
    pub fn list_all<W: io::Write>(&self, mut out: W) -> Result<()> {
        let mut paths: Vec<&str> = self.section_paths().collect();
        paths.sort_by(|a, b| path::segments(a).cmp(path::segments(b)));

        list_store(&mut out, "(root)", &self.root)?;
        for p in paths {
            if let Some(store) = self.sections.get(p) {
                list_store(&mut out, p, store)?;
            }
        }
        Ok(())
    }
}

fn list_store<W: io::Write>(out: &mut W, name: &str, store: &Store) -> Result<()> {
    let io_err = |e: io::Error| crate::Error::io(&e.to_string());
    writeln!(out, "-- current section: {name} --").map_err(io_err)?;
    for (key, value) in store.iter() {
        if value.chars().count() > LIST_VALUE_WIDTH {
            let short: String = value.chars().take(LIST_VALUE_WIDTH - 3).collect();
            writeln!(out, "{key}={short}...").map_err(io_err)?;
        } else {
            writeln!(out, "{key}={value}").map_err(io_err)?;
        }
    }
    Ok(())
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        if self.root != other.root {
            return false;
        }
        let with_content = |tree: &Tree| {
            tree.sections
                .iter()
                .filter(|(_, s)| s.has_content())
                .count()
        };
        with_content(self) == with_content(other)
            && self
                .sections
                .iter()
                .filter(|(_, s)| s.has_content())
                .all(|(p, s)| other.sections.get(p) == Some(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_section_is_created_lazily() {
        let mut tree = Tree::new();
        tree.switch_section(Some("lazy"));
        assert!(tree.current_section().is_none());
        assert!(tree.get_section(Some("lazy")).is_none());

        tree.current_section_mut();
        assert!(tree.get_section(Some("lazy")).is_some());
    }

    #[test]
    fn test_switch_to_parent() {
        let mut tree = Tree::new();
        tree.switch_section(Some("a.b.c"));
        assert_eq!(tree.switch_to_parent(), Some("a.b.c".to_string()));
        assert_eq!(tree.current_path(), Some("a.b"));
        tree.switch_section(Some("a"));
        tree.switch_to_parent();
        assert_eq!(tree.current_path(), None);
    }

    #[test]
    fn test_parent_section_falls_back_to_root() {
        let mut tree = Tree::new();
        tree.put("g", "1");
        tree.switch_section(Some("a.b"));
        assert!(tree.has_parent_section());
        assert_eq!(tree.parent_section().get("g"), Some("1"));

        tree.switch_section(Some("a"));
        tree.put("p", "2");
        tree.switch_section(Some("a.b"));
        assert_eq!(tree.parent_section().get("p"), Some("2"));
    }

    #[test]
    fn test_set_and_remove_section() {
        let mut tree = Tree::new();
        let store: Store = [("k", "v")].into_iter().collect();
        assert!(tree.set_section(Some("s"), store.clone()).is_none());
        assert_eq!(tree.set_section(Some("s"), Store::new()), Some(store));

        let old_root = tree.set_section(None, [("r", "1")].into_iter().collect());
        assert_eq!(old_root, Some(Store::new()));
        assert_eq!(tree.root().get("r"), Some("1"));

        assert!(tree.remove_section("s").is_some());
        assert!(tree.remove_section("s").is_none());
    }

    #[test]
    fn test_paths_with_empty_segments_are_normalized() {
        let mut tree = Tree::new();
        tree.switch_section(Some("a..b."));
        assert_eq!(tree.current_path(), Some("a.b"));
        tree.switch_section(Some("."));
        assert_eq!(tree.current_path(), Some("a.b"));
        tree.switch_section(Some(""));
        assert_eq!(tree.current_path(), None);

        let store: Store = [("k", "v")].into_iter().collect();
        tree.set_section(Some(".x..y"), store.clone());
        assert_eq!(tree.section_paths().collect::<Vec<_>>(), vec!["x.y"]);
        assert_eq!(tree.get_section(Some("x.y.")), Some(&store));

        tree.set_section(Some(""), store.clone());
        assert_eq!(tree.root(), &store);
        assert!(tree.remove_section("").is_none());
        assert!(tree.remove_section("x..y").is_some());
    }

    #[test]
    fn test_outline_synthesizes_ancestors_and_skips_empty() {
        let mut tree = Tree::new();
        tree.set_section(Some("empty"), Store::new());
        tree.switch_section(Some("x.y"));
        tree.put("k", "v");

        let outline = tree.outline();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].path, "x");
        assert!(outline[0].store.is_none());
        assert_eq!(outline[1].path, "x.y");
        assert_eq!(outline[1].depth, 1);
    }

    #[test]
    fn test_equality_ignores_cursor_and_empty_sections() {
        let mut a = Tree::new();
        a.put("k", "v");
        let mut b = a.clone();
        b.switch_section(Some("elsewhere"));
        b.set_section(Some("blank"), Store::new());
        assert_eq!(a, b);

        b.switch_section(Some("blank"));
        b.put("now", "filled");
        assert_ne!(a, b);
    }

    #[test]
    fn test_trim_and_clear() {
        let mut tree = Tree::new();
        tree.set_section(Some("blank"), Store::new());
        tree.switch_section(Some("full"));
        tree.put("k", "v");
        tree.trim();
        assert_eq!(tree.section_paths().collect::<Vec<_>>(), vec!["full"]);

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.current_path(), None);
    }

    #[test]
    fn test_list_all() {
        let mut tree = Tree::new();
        tree.put("g", "1");
        tree.switch_section(Some("s"));
        tree.put("long", "x".repeat(50));

        let mut out = Vec::new();
        tree.list_all(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            "-- current section: (root) --\ng=1\n-- current section: s --\nlong={}...\n",
            "x".repeat(37)
        );
        assert_eq!(text, expected);
    }
}

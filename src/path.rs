//! Dotted section path helpers.
//!
//! A section path is a dot-separated sequence of segments such as
//! `server.http.limits`. The root store has no path (`None`). All functions
//! here are pure string operations and never touch a [`Tree`](crate::Tree).
//!
//! # Examples
//!
//! ```
//! use serde_ini_tree::path::{parent_path, plain_name, resolve};
//!
//! assert_eq!(parent_path("a.b.c"), Some("a.b"));
//! assert_eq!(plain_name("a.b.c"), "c");
//! assert_eq!(resolve(Some("parent"), ".child"), "parent.child");
//! assert_eq!(resolve(None, ".child"), "child");
//! assert_eq!(resolve(Some("parent"), "other"), "other");
//! ```

use std::borrow::Cow;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Resolves `path` against `cursor`.
///
/// A path starting with `.` is relative: against the root it loses the
/// leading dot, otherwise it is appended to the cursor. Any other path is
/// absolute and returned unchanged.
pub fn resolve(cursor: Option<&str>, path: &str) -> String {
    match (path.strip_prefix(SEPARATOR), cursor) {
        (Some(relative), None) => relative.to_string(),
        (Some(_), Some(cursor)) => format!("{cursor}{path}"),
        (None, _) => path.to_string(),
    }
}

/// Drops empty segments from `path`; `None` when no segment is left, which
/// addresses the root.
///
/// ```
/// use serde_ini_tree::path::normalize;
///
/// assert_eq!(normalize("a..b.").as_deref(), Some("a.b"));
/// assert_eq!(normalize("a.b").as_deref(), Some("a.b"));
/// assert_eq!(normalize("."), None);
/// ```
pub fn normalize(path: &str) -> Option<Cow<'_, str>> {
    if segments(path).all(|segment| !segment.is_empty()) {
        return Some(Cow::Borrowed(path));
    }
    let kept: Vec<&str> = segments(path).filter(|segment| !segment.is_empty()).collect();
    if kept.is_empty() {
        None
    } else {
        Some(Cow::Owned(kept.join(".")))
    }
}

/// Returns `path` without its last segment, or `None` when it has a single segment.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind(SEPARATOR).map(|dot| &path[..dot])
}

/// Returns the last segment of `path`.
pub fn plain_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(dot) => &path[dot + 1..],
        None => path,
    }
}

/// Returns the last segment of the parent of `path`.
///
/// ```
/// use serde_ini_tree::path::plain_parent_name;
///
/// assert_eq!(plain_parent_name("a.b.c"), Some("b"));
/// assert_eq!(plain_parent_name("a"), None);
/// ```
pub fn plain_parent_name(path: &str) -> Option<&str> {
    parent_path(path).map(plain_name)
}

#[inline]
pub fn has_parent(path: &str) -> bool {
    path.contains(SEPARATOR)
}

/// Number of segments in `path`.
pub fn depth(path: &str) -> usize {
    path.split(SEPARATOR).count()
}

/// Splits `path` into its segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(resolve(None, ".a"), "a");
        assert_eq!(resolve(None, "a"), "a");
        assert_eq!(resolve(Some("a"), ".b"), "a.b");
        assert_eq!(resolve(Some("a.b"), ".c.d"), "a.b.c.d");
        assert_eq!(resolve(Some("a.b"), "x"), "x");
    }

    #[test]
    fn test_parent_and_plain_names() {
        assert_eq!(parent_path("a.b.c"), Some("a.b"));
        assert_eq!(parent_path("a"), None);
        assert_eq!(plain_name("a.b.c"), "c");
        assert_eq!(plain_name("a"), "a");
        assert!(has_parent("a.b"));
        assert!(!has_parent("a"));
        assert_eq!(depth("a.b.c"), 3);
        assert_eq!(segments("a.b").collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize(".."), None);
        assert_eq!(normalize(".a"), Some(Cow::Owned("a".to_string())));
        assert_eq!(normalize("a.b"), Some(Cow::Borrowed("a.b")));
        assert_eq!(normalize(" . b").as_deref(), Some(" . b"));
    }
}

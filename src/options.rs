//! Configuration options for reading and writing INI documents.
//!
//! This module provides types to customize both directions of the text codec:
//!
//! - [`IniOptions`]: Main configuration struct
//! - [`LineSeparator`]: Line break emitted by the writer
//! - [`LoadPolicy`]: Whether a load replaces or extends the target tree
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_tree::{IniOptions, LineSeparator};
//!
//! // Windows line breaks and `;` comments
//! let options = IniOptions::new()
//!     .with_line_separator(LineSeparator::CrLf)
//!     .with_comment_sign(';');
//! assert!(options.validate().is_ok());
//!
//! // A writer comment sign outside the configured set is rejected
//! let options = IniOptions::new().with_comment_sign('!');
//! assert!(options.validate().is_err());
//! ```

use crate::{Error, Result};

/// Line break written after every emitted line.
///
/// The reader accepts all three forms regardless of this setting.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::LineSeparator;
///
/// assert_eq!(LineSeparator::Lf.as_str(), "\n");
/// assert_eq!(LineSeparator::CrLf.as_str(), "\r\n");
/// assert_eq!(LineSeparator::Cr.as_str(), "\r");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineSeparator {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineSeparator {
    /// Returns the string representation of this separator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
            LineSeparator::Cr => "\r",
        }
    }
}

/// What a load does with the stores already present in the target tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Clear the tree (root, sections and cursor) before reading.
    #[default]
    Replace,
    /// Keep existing stores; entries read from the input overwrite equal keys.
    Merge,
}

/// Configuration options for the INI text codec.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::IniOptions;
///
/// // Defaults: `#`/`;` comments, `=`/`:` delimiters, sections enabled
/// let options = IniOptions::new();
/// assert!(options.sections);
/// assert!(options.is_comment_sign(';'));
///
/// // Flat property list with escaped non-ASCII output
/// let options = IniOptions::properties().with_escape_unicode(true);
/// assert!(!options.sections);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IniOptions {
    /// Characters that start a full-line comment.
    pub comment_signs: Vec<char>,
    /// Characters that separate a key from its value.
    pub delimiters: Vec<char>,
    /// Recognize `[section]` headers (ini mode).
    pub sections: bool,
    /// Capture comments and footers while loading.
    pub read_comments: bool,
    /// Write characters outside printable ASCII as `\uXXXX`.
    pub escape_unicode: bool,
    /// Comment sign used by the writer.
    pub comment_sign: char,
    /// Delimiter used by the writer.
    pub delimiter: char,
    pub line_separator: LineSeparator,
    /// Emit a comment line with the current date after the header comment.
    pub write_timestamp: bool,
    pub load_policy: LoadPolicy,
}

impl Default for IniOptions {
    fn default() -> Self {
        IniOptions {
            comment_signs: vec!['#', ';'],
            delimiters: vec!['=', ':'],
            sections: true,
            read_comments: true,
            escape_unicode: false,
            comment_sign: '#',
            delimiter: '=',
            line_separator: LineSeparator::default(),
            write_timestamp: false,
            load_policy: LoadPolicy::default(),
        }
    }
}

impl IniOptions {
    /// Creates default options for ini mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for a flat property list: no section headers, and `!`
    /// accepted as a comment sign next to `#`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::IniOptions;
    ///
    /// let options = IniOptions::properties();
    /// assert!(options.is_comment_sign('!'));
    /// assert!(!options.is_comment_sign(';'));
    /// ```
    #[must_use]
    pub fn properties() -> Self {
        IniOptions {
            comment_signs: vec!['#', '!'],
            sections: false,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_comment_signs(mut self, signs: &[char]) -> Self {
        self.comment_signs = signs.to_vec();
        self
    }

    #[must_use]
    pub fn with_delimiters(mut self, delimiters: &[char]) -> Self {
        self.delimiters = delimiters.to_vec();
        self
    }

    /// Enables or disables `[section]` headers.
    #[must_use]
    pub fn with_sections(mut self, sections: bool) -> Self {
        self.sections = sections;
        self
    }

    #[must_use]
    pub fn with_read_comments(mut self, read_comments: bool) -> Self {
        self.read_comments = read_comments;
        self
    }

    /// Sets whether characters outside printable ASCII are written as `\uXXXX`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::{to_string_with_options, IniOptions, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.put("k", "\u{ff}");
    ///
    /// let raw = to_string_with_options(&tree, &IniOptions::new()).unwrap();
    /// assert_eq!(raw, "k=\u{ff}\n");
    ///
    /// let escaped = IniOptions::new().with_escape_unicode(true);
    /// assert_eq!(to_string_with_options(&tree, &escaped).unwrap(), "k=\\u00FF\n");
    /// ```
    #[must_use]
    pub fn with_escape_unicode(mut self, escape_unicode: bool) -> Self {
        self.escape_unicode = escape_unicode;
        self
    }

    #[must_use]
    pub fn with_comment_sign(mut self, sign: char) -> Self {
        self.comment_sign = sign;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_line_separator(mut self, line_separator: LineSeparator) -> Self {
        self.line_separator = line_separator;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, write_timestamp: bool) -> Self {
        self.write_timestamp = write_timestamp;
        self
    }

    #[must_use]
    pub fn with_load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }

    #[inline]
    pub fn is_comment_sign(&self, ch: char) -> bool {
        self.comment_signs.contains(&ch)
    }

    #[inline]
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.delimiters.contains(&ch)
    }

    /// Checks that the writer's comment sign and delimiter belong to the
    /// configured sets, so that written output can be read back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] naming the offending setting.
    pub fn validate(&self) -> Result<()> {
        if !self.is_comment_sign(self.comment_sign) {
            return Err(Error::invalid_option("invalid comment sign"));
        }
        if !self.is_delimiter(self.delimiter) {
            return Err(Error::invalid_option("invalid delimiter"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = IniOptions::default();
        assert_eq!(options.comment_signs, vec!['#', ';']);
        assert_eq!(options.delimiters, vec!['=', ':']);
        assert_eq!(options.comment_sign, '#');
        assert_eq!(options.delimiter, '=');
        assert_eq!(options.load_policy, LoadPolicy::Replace);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_foreign_delimiter() {
        let options = IniOptions::new().with_delimiter('|');
        assert_eq!(
            options.validate(),
            Err(Error::InvalidOption("invalid delimiter".to_string()))
        );

        let options = IniOptions::new()
            .with_delimiters(&['|'])
            .with_delimiter('|');
        assert!(options.validate().is_ok());
    }
}

//! INI text writing.
//!
//! This module provides the [`Serializer`] that renders a [`Tree`] as INI
//! text which the reader in [`de`](crate::de) turns back into an equal tree.
//!
//! ## Output layout
//!
//! 1. The optional header comment, then the optional timestamp comment
//! 2. Root entries, each preceded by its comment, then the root footer
//! 3. In ini mode, every visible section in depth-first pre-order: the
//!    `[path]` header, its entries and its footer
//!
//! Flat mode (sections disabled) writes the root store only.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_ini_tree::{to_string, Tree};
//!
//! let mut tree = Tree::new();
//! tree.put("name", "Alice");
//! tree.switch_section(Some("server"));
//! tree.put("port", "8080");
//!
//! assert_eq!(to_string(&tree).unwrap(), "name=Alice\n[server]\nport=8080\n");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_ini_tree::{IniOptions, LineSeparator, Serializer, Tree};
//!
//! let mut tree = Tree::new();
//! tree.put("k", "v");
//!
//! let options = IniOptions::new().with_line_separator(LineSeparator::CrLf);
//! let mut serializer = Serializer::new(options);
//! serializer.serialize(&tree, Some("generated")).unwrap();
//! assert_eq!(serializer.into_inner(), "#generated\r\nk=v\r\n");
//! ```

use crate::escape::{escape_into, write_comment, Field};
use crate::{Encoding, IniOptions, Result, Store, Tree};
use chrono::Local;

/// Date layout of the timestamp comment, e.g. `Sat Oct 17 09:30:00 +02:00 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// The INI writer.
///
/// Output accumulates in memory; [`Serializer::into_inner`] hands it over.
pub struct Serializer {
    output: String,
    options: IniOptions,
    encoding: Encoding,
}

impl Serializer {
    pub fn new(options: IniOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
            encoding: Encoding::Utf8,
        }
    }

    /// Targets `encoding`. Encodings outside the UTF family force `\uXXXX`
    /// for every character outside printable ASCII.
    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends `tree`, preceded by `header` as a comment when given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`](crate::Error::InvalidOption) if the
    /// writer's comment sign or delimiter is not in the configured sets.
    pub fn serialize(&mut self, tree: &Tree, header: Option<&str>) -> Result<()> {
        self.options.validate()?;

        if let Some(header) = header {
            self.write_comment(header);
        }
        if self.options.write_timestamp {
            let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
            self.write_comment(&now);
        }

        self.write_store(tree.root());
        if !self.options.sections {
            return Ok(());
        }
        for section in tree.outline() {
            self.write_header(section.path);
            if let Some(store) = section.store {
                self.write_store(store);
            }
        }
        Ok(())
    }

    fn escape_unicode(&self) -> bool {
        self.options.escape_unicode || !self.encoding.is_unicode()
    }

    fn write_comment(&mut self, comment: &str) {
        let unicode = self.encoding.is_unicode();
        let escape_unicode = self.options.escape_unicode;
        write_comment(&mut self.output, comment, &self.options, |ch| {
            if unicode {
                !escape_unicode || (ch as u32) <= 0xFF
            } else {
                ch.is_ascii()
            }
        });
    }

    fn write_header(&mut self, path: &str) {
        let escape_unicode = self.escape_unicode();
        self.output.push('[');
        escape_into(&mut self.output, path, Field::Section, &self.options, escape_unicode);
        self.output.push(']');
        self.output.push_str(self.options.line_separator.as_str());
    }

    fn write_store(&mut self, store: &Store) {
        let escape_unicode = self.escape_unicode();
        for (key, value) in store.iter() {
            if let Some(comment) = store.comment(key) {
                self.write_comment(comment);
            }
            escape_into(&mut self.output, key, Field::Key, &self.options, escape_unicode);
            self.output.push(self.options.delimiter);
            escape_into(&mut self.output, value, Field::Value, &self.options, escape_unicode);
            self.output.push_str(self.options.line_separator.as_str());
        }
        if let Some(footer) = store.footer() {
            self.write_comment(footer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn render(tree: &Tree, options: IniOptions) -> String {
        let mut serializer = Serializer::new(options);
        serializer.serialize(tree, None).unwrap();
        serializer.into_inner()
    }

    #[test]
    fn test_comments_and_footers() {
        let mut tree = Tree::new();
        tree.put("k", "v");
        tree.set_comment("k", "line one\nline two").unwrap();
        tree.set_footer(Some("bye".to_string()));

        assert_eq!(
            render(&tree, IniOptions::new()),
            "#line one\n#line two\nk=v\n#bye\n"
        );
    }

    #[test]
    fn test_nested_sections_with_synthesized_parent() {
        let mut tree = Tree::new();
        tree.switch_section(Some("a.b"));
        tree.put("x", "1");
        tree.switch_section(Some("c"));
        tree.put("y", "2");

        assert_eq!(
            render(&tree, IniOptions::new()),
            "[a]\n[a.b]\nx=1\n[c]\ny=2\n"
        );
    }

    #[test]
    fn test_flat_mode_writes_root_only() {
        let mut tree = Tree::new();
        tree.put("g", "1");
        tree.switch_section(Some("s"));
        tree.put("hidden", "2");

        assert_eq!(render(&tree, IniOptions::properties()), "g=1\n");
    }

    #[test]
    fn test_key_and_value_escaping() {
        let mut tree = Tree::new();
        tree.put("a key", " padded=[x]");
        assert_eq!(
            render(&tree, IniOptions::new()),
            "a\\ key=\\ padded\\=\\[x\\]\n"
        );
        assert_eq!(
            render(&tree, IniOptions::properties()),
            "a\\ key=\\ padded\\=[x]\n"
        );
    }

    #[test]
    fn test_custom_signs() {
        let mut tree = Tree::new();
        tree.put("k", "v");
        tree.set_comment("k", "note").unwrap();
        let options = IniOptions::new().with_comment_sign(';').with_delimiter(':');
        assert_eq!(render(&tree, options), ";note\nk:v\n");
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let mut serializer = Serializer::new(IniOptions::new().with_comment_sign('%'));
        assert_eq!(
            serializer.serialize(&Tree::new(), None),
            Err(Error::InvalidOption("invalid comment sign".to_string()))
        );
    }

    #[test]
    fn test_single_byte_encoding_forces_escapes() {
        let mut tree = Tree::new();
        tree.put("k", "\u{e9}\u{263A}");
        tree.set_comment("k", "caf\u{e9} \u{263A}").unwrap();

        let mut serializer = Serializer::new(IniOptions::new()).with_encoding(Encoding::Latin1);
        serializer.serialize(&tree, None).unwrap();
        assert_eq!(
            serializer.into_inner(),
            "#caf\\u00E9 \\u263A\nk=\\u00E9\\u263A\n"
        );
    }

    #[test]
    fn test_timestamp_comment() {
        let mut serializer = Serializer::new(IniOptions::new().with_timestamp(true));
        serializer.serialize(&Tree::new(), Some("head")).unwrap();
        let out = serializer.into_inner();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "#head");
        assert!(lines[1].starts_with('#'));
        assert!(lines[1].len() > 20);
    }
}

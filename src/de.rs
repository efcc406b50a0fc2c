//! INI text reading.
//!
//! This module provides the [`Deserializer`], a character-at-a-time state
//! machine that turns INI text into mutations of a [`Tree`].
//!
//! ## Overview
//!
//! - **Push-based**: [`Deserializer::feed`] consumes exactly one character,
//!   [`Deserializer::finish`] applies the end-of-stream rules. Any character
//!   source, blocking or not, can drive it.
//! - **Escapes**: `\t \n \r \f \b`, `\uXXXX` (surrogate pairs combine), line
//!   continuations, and `\` before any other character for a literal.
//! - **Sections**: `[path]` headers, with `[.child]` relative to the previous
//!   header. Blanks around the name are dropped unless escaped.
//! - **Comments**: full-line comments attach to the next entry; comments
//!   before a header or at the end become the footer of the current store.
//!   `\uXXXX` escapes inside comments are decoded.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_ini_tree::from_str;
//!
//! let tree = from_str("# greeting\nname = Alice\n[server]\nport: 8080\n").unwrap();
//! assert_eq!(tree.root().get("name"), Some("Alice"));
//! assert_eq!(tree.root().comment("name"), Some(" greeting"));
//! assert_eq!(tree.get_section(Some("server")).and_then(|s| s.get("port")), Some("8080"));
//! ```
//!
//! ## Direct Deserializer Usage
//!
//! ```rust
//! use serde_ini_tree::{Deserializer, IniOptions, Tree};
//!
//! let mut tree = Tree::new();
//! let options = IniOptions::new();
//! let mut de = Deserializer::new(&mut tree, &options);
//! for ch in "a=\\u0041b".chars() {
//!     de.feed(ch).unwrap();
//! }
//! de.finish().unwrap();
//! assert_eq!(tree.root().get("a"), Some("Ab"));
//! ```

use crate::escape::{is_blank, is_quote, unescape_comment};
use crate::options::LoadPolicy;
use crate::path;
use crate::{Error, IniOptions, Result, Tree};
use std::borrow::Cow;

/// Escape-processing state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Default,
    /// After a backslash.
    EscapeStart,
    /// Inside `\uXXXX`.
    UnicodeEscape,
    /// After a backslash-CR continuation; swallows one LF.
    PendingCrlf,
    /// Whitespace ended the key; the next content fixes the key length.
    KeyDone,
    /// Dropping leading whitespace of a continuation line.
    SkipLeading,
}

/// Progress through a `[section]` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Header {
    None,
    Open,
    /// Closed at this buffer offset.
    Closed(usize),
}

/// The INI reader.
///
/// Borrows the target tree for the duration of one load. Section headers
/// move a reader-local path, never the tree's cursor.
pub struct Deserializer<'a> {
    tree: &'a mut Tree,
    options: &'a IniOptions,
    mode: Mode,
    header: Header,
    in_comment: bool,
    first_char: bool,
    buf: Vec<char>,
    // Buffer offsets of characters produced by escapes, ascending.
    literals: Vec<usize>,
    key_len: Option<usize>,
    unicode: u32,
    digits: u8,
    high_surrogate: Option<u32>,
    comment: String,
    active: Option<String>,
    line: usize,
    col: usize,
    prev_cr: bool,
    records: usize,
    headers: usize,
}

impl<'a> Deserializer<'a> {
    /// Creates a reader that loads into `tree`.
    ///
    /// With [`LoadPolicy::Replace`] the tree is cleared here.
    pub fn new(tree: &'a mut Tree, options: &'a IniOptions) -> Self {
        if options.load_policy == LoadPolicy::Replace {
            tree.clear();
        }
        Deserializer {
            tree,
            options,
            mode: Mode::Default,
            header: Header::None,
            in_comment: false,
            first_char: true,
            buf: Vec::with_capacity(64),
            literals: Vec::new(),
            key_len: None,
            unicode: 0,
            digits: 0,
            high_surrogate: None,
            comment: String::new(),
            active: None,
            line: 1,
            col: 0,
            prev_cr: false,
            records: 0,
            headers: 0,
        }
    }

    /// Consumes one character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEscape`] for an invalid `\uXXXX` digit or an
    /// unpaired surrogate, and [`Error::Syntax`] for a malformed section header.
    pub fn feed(&mut self, ch: char) -> Result<()> {
        let result = self.step(ch);
        self.advance_position(ch);
        result
    }

    /// Consumes every character of `text`.
    pub fn feed_str(&mut self, text: &str) -> Result<()> {
        text.chars().try_for_each(|ch| self.feed(ch))
    }

    /// Applies the end-of-stream rules and completes the load.
    ///
    /// A trailing lone backslash contributes a NUL character; a pending
    /// comment becomes the footer of the current store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEscape`] if the input ends inside `\uXXXX`.
    pub fn finish(mut self) -> Result<()> {
        if self.in_comment {
            self.in_comment = false;
            if self.options.read_comments {
                self.comment.push('\n');
            }
        }
        match self.mode {
            Mode::UnicodeEscape => {
                return Err(Error::malformed_escape(
                    self.line,
                    "expected format \\uxxxx",
                ))
            }
            Mode::EscapeStart => {
                self.mode = Mode::Default;
                self.push('\0', true)?;
            }
            _ => {}
        }
        self.end_record()?;
        if let Some(footer) = self.take_comment() {
            self.tree
                .store_at(self.active.as_deref())
                .set_footer(Some(footer));
        }
        tracing::debug!(
            records = self.records,
            headers = self.headers,
            lines = self.line,
            "loaded ini document"
        );
        Ok(())
    }

    fn advance_position(&mut self, ch: char) {
        match ch {
            '\n' if self.prev_cr => self.col = 0,
            '\n' | '\r' => {
                self.line += 1;
                self.col = 0;
            }
            _ => self.col += 1,
        }
        self.prev_cr = ch == '\r';
    }

    fn step(&mut self, ch: char) -> Result<()> {
        if self.in_comment {
            self.comment_char(ch);
            return Ok(());
        }

        match self.mode {
            Mode::UnicodeEscape => return self.unicode_digit(ch),
            Mode::EscapeStart => {
                self.mode = Mode::Default;
                let literal = match ch {
                    '\r' => {
                        self.mode = Mode::PendingCrlf;
                        return Ok(());
                    }
                    '\n' => {
                        self.mode = Mode::SkipLeading;
                        return Ok(());
                    }
                    'u' => {
                        self.mode = Mode::UnicodeEscape;
                        self.unicode = 0;
                        self.digits = 0;
                        return Ok(());
                    }
                    'b' => '\u{08}',
                    'f' => '\u{0C}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                };
                return self.push(literal, true);
            }
            _ => {}
        }

        match ch {
            '\n' if self.mode == Mode::PendingCrlf => {
                self.mode = Mode::SkipLeading;
                return Ok(());
            }
            '\n' | '\r' => {
                self.mode = Mode::Default;
                self.first_char = true;
                return self.end_record();
            }
            '\\' => {
                if self.mode == Mode::KeyDone {
                    self.key_len = Some(self.buf.len());
                }
                self.mode = Mode::EscapeStart;
                return Ok(());
            }
            _ => {}
        }

        match self.header {
            Header::Open => {
                if ch == ']' {
                    self.header = Header::Closed(self.header_end());
                    return Ok(());
                }
                if is_blank(ch) {
                    if matches!(self.mode, Mode::SkipLeading | Mode::PendingCrlf) {
                        self.mode = Mode::SkipLeading;
                        return Ok(());
                    }
                    if self.buf.is_empty() {
                        return Ok(());
                    }
                }
                self.mode = Mode::Default;
                return self.push(ch, false);
            }
            Header::Closed(_) if is_blank(ch) => return Ok(()),
            _ => {}
        }

        if self.first_char && self.options.is_comment_sign(ch) {
            self.in_comment = true;
            return Ok(());
        }
        if self.options.sections && ch == '[' && self.buf.is_empty() && self.key_len.is_none() {
            self.header = Header::Open;
            self.first_char = false;
            self.mode = Mode::Default;
            return Ok(());
        }
        if self.options.is_delimiter(ch) && self.key_len.is_none() && self.header == Header::None {
            self.mode = Mode::Default;
            self.key_len = Some(self.buf.len());
            return Ok(());
        }
        if is_blank(ch) {
            if self.mode == Mode::PendingCrlf {
                self.mode = Mode::SkipLeading;
            }
            if self.buf.is_empty()
                || Some(self.buf.len()) == self.key_len
                || self.mode == Mode::SkipLeading
            {
                return Ok(());
            }
            if self.key_len.is_none() {
                self.mode = Mode::KeyDone;
                return Ok(());
            }
        }
        if matches!(self.mode, Mode::SkipLeading | Mode::PendingCrlf) {
            self.mode = Mode::Default;
        }
        self.push(ch, false)
    }

    fn comment_char(&mut self, ch: char) {
        let capture = self.options.read_comments;
        if ch == '\r' || ch == '\n' {
            self.in_comment = false;
            if capture {
                self.comment.push('\n');
            }
        } else if capture {
            self.comment.push(ch);
        }
    }

    fn unicode_digit(&mut self, ch: char) -> Result<()> {
        let Some(digit) = ch.to_digit(16) else {
            return Err(Error::malformed_escape(
                self.line,
                "illegal character in \\uxxxx",
            ));
        };
        self.unicode = (self.unicode << 4) | digit;
        self.digits += 1;
        if self.digits < 4 {
            return Ok(());
        }

        self.mode = Mode::Default;
        let unit = self.unicode;
        match (self.high_surrogate.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.high_surrogate = Some(unit);
                Ok(())
            }
            (Some(high), 0xDC00..=0xDFFF) => {
                let code = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
                let ch = char::from_u32(code)
                    .ok_or_else(|| Error::malformed_escape(self.line, "invalid surrogate pair"))?;
                self.push(ch, true)
            }
            (Some(_), _) | (None, 0xDC00..=0xDFFF) => Err(Error::malformed_escape(
                self.line,
                "unpaired surrogate in \\uxxxx",
            )),
            (None, _) => {
                let ch = char::from_u32(unit)
                    .ok_or_else(|| Error::malformed_escape(self.line, "invalid code unit"))?;
                self.push(ch, true)
            }
        }
    }

    fn push(&mut self, ch: char, literal: bool) -> Result<()> {
        if let Header::Closed(_) = self.header {
            return Err(Error::syntax(
                self.line,
                self.col + 1,
                "unexpected characters after ']'",
            ));
        }
        if self.high_surrogate.is_some() {
            return Err(Error::malformed_escape(
                self.line,
                "unpaired surrogate in \\uxxxx",
            ));
        }
        self.first_char = false;
        if self.mode == Mode::KeyDone {
            self.key_len = Some(self.buf.len());
            self.mode = Mode::Default;
        }
        if literal {
            self.literals.push(self.buf.len());
        }
        self.buf.push(ch);
        Ok(())
    }

    fn end_record(&mut self) -> Result<()> {
        if self.high_surrogate.is_some() {
            return Err(Error::malformed_escape(
                self.line,
                "unpaired surrogate in \\uxxxx",
            ));
        }
        match std::mem::replace(&mut self.header, Header::None) {
            Header::Open => {
                return Err(Error::syntax(
                    self.line,
                    self.col + 1,
                    "section header is missing ']'",
                ))
            }
            Header::Closed(end) => {
                let name: String = self.buf[..end].iter().collect();
                self.open_section(&name);
            }
            Header::None => {
                if !self.buf.is_empty() || self.key_len == Some(0) {
                    let key_len = self.key_len.unwrap_or(self.buf.len());
                    let key = self.unquoted(0, key_len);
                    let value = self.unquoted(key_len, self.buf.len());
                    self.put_entry(key, value)?;
                }
            }
        }
        self.buf.clear();
        self.literals.clear();
        self.key_len = None;
        Ok(())
    }

    /// Length of the section name without trailing blanks that did not come
    /// from an escape.
    fn header_end(&self) -> usize {
        let mut end = self.buf.len();
        while end > 0
            && is_blank(self.buf[end - 1])
            && self.literals.binary_search(&(end - 1)).is_err()
        {
            end -= 1;
        }
        end
    }

    /// Buffer slice `start..end` as a string, without one pair of matching
    /// quotes unless either quote came from an escape.
    fn unquoted(&self, start: usize, end: usize) -> String {
        let slice = &self.buf[start..end];
        let is_literal = |offset: usize| self.literals.binary_search(&offset).is_ok();
        let strip = slice.len() >= 2
            && is_quote(slice[0])
            && slice[0] == slice[slice.len() - 1]
            && !is_literal(start)
            && !is_literal(end - 1);
        if strip {
            slice[1..slice.len() - 1].iter().collect()
        } else {
            slice.iter().collect()
        }
    }

    fn take_comment(&mut self) -> Option<String> {
        if !self.options.read_comments || self.comment.is_empty() {
            return None;
        }
        let mut comment = std::mem::take(&mut self.comment);
        if comment.ends_with('\n') {
            comment.pop();
        }
        Some(unescape_comment(&comment))
    }

    fn put_entry(&mut self, key: String, value: String) -> Result<()> {
        let comment = self.take_comment();
        let store = self.tree.store_at(self.active.as_deref());
        store.put(key.clone(), value);
        if let Some(comment) = comment {
            store.set_comment(&key, comment)?;
        }
        self.records += 1;
        Ok(())
    }

    fn open_section(&mut self, name: &str) {
        if let Some(footer) = self.take_comment() {
            self.tree
                .store_at(self.active.as_deref())
                .set_footer(Some(footer));
        }
        let resolved = path::resolve(self.active.as_deref(), name);
        self.active = path::normalize(&resolved).map(Cow::into_owned);
        self.headers += 1;
        tracing::trace!(section = ?self.active, line = self.line, "switched section");
    }
}

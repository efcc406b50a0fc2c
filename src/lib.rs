//! # serde_ini_tree
//!
//! A codec for INI files and Java-style property lists with hierarchical
//! sections, comments, Unicode escapes and an equivalent XML form.
//!
//! ## Data model
//!
//! - A [`Store`] maps unique keys to string values, with an optional comment
//!   per key and an optional footer comment.
//! - A [`Tree`] owns the root (global) store plus named sections addressed by
//!   dotted paths such as `server.http`; `a` is the parent of `a.b`.
//!
//! ## Key Features
//!
//! - **Character-at-a-time reader**: `\t \n \r \f \b`, `\uXXXX` with
//!   surrogate pairs, line continuations and quoted keys/values
//! - **Lossless writer**: everything it writes reads back as an equal tree
//! - **Comments**: kept per key and per store (footers)
//! - **Sections**: `[a.b]` headers, `[.child]` relative to the previous header
//! - **XML**: a fixed `ini`/`section`/`entry` grammar, built on `quick-xml`
//! - **Encodings**: UTF-8, UTF-16, ISO-8859-1 and US-ASCII for byte streams
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_ini_tree::{from_str, to_string};
//!
//! let text = "\
//! # who runs this
//! owner = Alice
//! [server]
//! host = localhost
//! [.tls]
//! enabled = true
//! ";
//!
//! let tree = from_str(text).unwrap();
//! assert_eq!(tree.root().get("owner"), Some("Alice"));
//! assert_eq!(tree.root().comment("owner"), Some(" who runs this"));
//! assert_eq!(
//!     tree.get_section(Some("server.tls")).and_then(|s| s.get("enabled")),
//!     Some("true")
//! );
//!
//! let written = to_string(&tree).unwrap();
//! assert_eq!(from_str(&written).unwrap(), tree);
//! ```
//!
//! ### Building trees in code
//!
//! ```rust
//! use serde_ini_tree::{ini, to_string};
//!
//! let tree = ini!(
//!     { "name" => "demo" },
//!     ["db"] { "url" => "postgres://localhost" },
//! );
//! assert_eq!(to_string(&tree).unwrap(), "name=demo\n[db]\nurl=postgres\\://localhost\n");
//! ```
//!
//! ## Error handling
//!
//! A failure aborts the whole load or store. Changes already applied to the
//! tree before the failure are kept; partial output is not removed.
//!
//! ## Logging
//!
//! Loads and stores emit `tracing` events at `debug` level, section switches
//! at `trace` level. No subscriber is installed by this crate.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Reading and writing a flat file
//! - **`sections.rs`** - Navigating nested sections
//! - **`xml.rs`** - Converting to and from the XML form
//! - **`custom_options.rs`** - Comment signs, delimiters and encodings
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod encoding;
pub mod error;
mod escape;
pub mod macros;
pub mod options;
pub mod path;
pub mod ser;
pub mod store;
pub mod sync;
pub mod tree;
pub mod xml;

pub use de::Deserializer;
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use options::{IniOptions, LineSeparator, LoadPolicy};
pub use ser::Serializer;
pub use store::Store;
pub use sync::SharedTree;
pub use tree::{SectionOutline, Tree};

use std::io::{self, Read};

fn io_error(e: io::Error) -> Error {
    Error::io(&e.to_string())
}

/// Writes `tree` as INI text with default options.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::{to_string, Tree};
///
/// let mut tree = Tree::new();
/// tree.put("key", "value");
/// assert_eq!(to_string(&tree).unwrap(), "key=value\n");
/// ```
///
/// # Errors
///
/// Never fails with default options; the `Result` mirrors the other writers.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(tree: &Tree) -> Result<String> {
    to_string_with_options(tree, &IniOptions::default())
}

/// Writes `tree` as INI text with custom options.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] if the writer's comment sign or
/// delimiter is not in the configured sets.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(tree: &Tree, options: &IniOptions) -> Result<String> {
    to_string_with_header(tree, None, options)
}

/// Writes `tree` as INI text, preceded by `header` as a comment.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::{to_string_with_header, IniOptions, Tree};
///
/// let mut tree = Tree::new();
/// tree.put("k", "v");
/// let text = to_string_with_header(&tree, Some("generated\nby hand"), &IniOptions::new()).unwrap();
/// assert_eq!(text, "#generated\n#by hand\nk=v\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] for contradictory writer options.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_header(
    tree: &Tree,
    header: Option<&str>,
    options: &IniOptions,
) -> Result<String> {
    let mut serializer = Serializer::new(options.clone());
    serializer.serialize(tree, header)?;
    let output = serializer.into_inner();
    tracing::debug!(
        sections = tree.len(),
        chars = output.len(),
        "stored ini document"
    );
    Ok(output)
}

/// Writes `tree` as UTF-8 INI text to `writer`.
///
/// # Errors
///
/// Returns an error for contradictory options or when writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: io::Write>(
    tree: &Tree,
    writer: W,
    header: Option<&str>,
    options: &IniOptions,
) -> Result<()> {
    to_writer_with_encoding(tree, writer, header, options, Encoding::Utf8)
}

/// Writes `tree` as INI text in `encoding` to `writer`.
///
/// Encodings outside the UTF family force `\uXXXX` escapes for every
/// character outside printable ASCII, so the output stays readable.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::{to_writer_with_encoding, Encoding, IniOptions, Tree};
///
/// let mut tree = Tree::new();
/// tree.put("city", "K\u{f6}ln");
///
/// let mut buffer = Vec::new();
/// to_writer_with_encoding(&tree, &mut buffer, None, &IniOptions::new(), Encoding::Latin1).unwrap();
/// assert_eq!(buffer, b"city=K\\u00F6ln\n");
/// ```
///
/// # Errors
///
/// Returns an error for contradictory options or when writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_encoding<W: io::Write>(
    tree: &Tree,
    mut writer: W,
    header: Option<&str>,
    options: &IniOptions,
    encoding: Encoding,
) -> Result<()> {
    let mut serializer = Serializer::new(options.clone()).with_encoding(encoding);
    serializer.serialize(tree, header)?;
    let bytes = encoding.encode(&serializer.into_inner());
    writer.write_all(&bytes).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    tracing::debug!(
        sections = tree.len(),
        bytes = bytes.len(),
        encoding = encoding.name(),
        "stored ini document"
    );
    Ok(())
}

/// Reads INI text with default options.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::from_str;
///
/// let tree = from_str("[server]\nport = 8080\n").unwrap();
/// assert_eq!(tree.get_section(Some("server")).and_then(|s| s.get("port")), Some("8080"));
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] or [`Error::Syntax`] for malformed input.
/// Error messages include the line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<Tree> {
    from_str_with_options(s, &IniOptions::default())
}

/// Reads INI text with custom options.
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] or [`Error::Syntax`] for malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: &IniOptions) -> Result<Tree> {
    let mut tree = Tree::new();
    load_str(&mut tree, s, options)?;
    Ok(tree)
}

/// Reads INI text from any character source.
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] or [`Error::Syntax`] for malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_chars<I>(chars: I, options: &IniOptions) -> Result<Tree>
where
    I: IntoIterator<Item = char>,
{
    let mut tree = Tree::new();
    load_chars(&mut tree, chars, options)?;
    Ok(tree)
}

/// Reads INI text from a byte stream, one ISO-8859-1 character per byte.
///
/// Characters outside Latin-1 must be written as `\uXXXX` in such input.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::from_reader;
/// use std::io::Cursor;
///
/// let tree = from_reader(Cursor::new(b"k=caf\xE9")).unwrap();
/// assert_eq!(tree.root().get("k"), Some("caf\u{e9}"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, and the text errors of [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: io::Read>(reader: R) -> Result<Tree> {
    let mut tree = Tree::new();
    load_reader(&mut tree, reader, &IniOptions::default())?;
    Ok(tree)
}

/// Loads INI text into an existing tree according to `options.load_policy`.
///
/// The tree cursor is left where it was under [`LoadPolicy::Merge`] and reset
/// to the root under [`LoadPolicy::Replace`]. Either way, a relative header
/// such as `[.child]` resolves against the previous header of the same input,
/// or the root before the first header, never against the tree cursor.
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] or [`Error::Syntax`] for malformed input.
pub fn load_str(tree: &mut Tree, s: &str, options: &IniOptions) -> Result<()> {
    load_chars(tree, s.chars(), options)
}

/// Loads INI text from any character source into `tree`.
///
/// Relative headers (`[.child]`) resolve against the previous header of this
/// input, starting from the root; the tree cursor is not consulted, even under
/// [`LoadPolicy::Merge`].
///
/// # Errors
///
/// Returns [`Error::MalformedEscape`] or [`Error::Syntax`] for malformed input.
pub fn load_chars<I>(tree: &mut Tree, chars: I, options: &IniOptions) -> Result<()>
where
    I: IntoIterator<Item = char>,
{
    tracing::debug!(policy = ?options.load_policy, sections = options.sections, "loading ini document");
    let mut deserializer = Deserializer::new(tree, options);
    for ch in chars {
        deserializer.feed(ch)?;
    }
    deserializer.finish()
}

/// Loads ISO-8859-1 bytes from `reader` into `tree`.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, and the text errors of [`load_str`].
pub fn load_reader<R: io::Read>(tree: &mut Tree, reader: R, options: &IniOptions) -> Result<()> {
    let mut deserializer = Deserializer::new(tree, options);
    for byte in io::BufReader::new(reader).bytes() {
        deserializer.feed(char::from(byte.map_err(io_error)?))?;
    }
    deserializer.finish()
}

/// Loads bytes in `encoding` from `reader` into `tree`.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, [`Error::InvalidFormat`] if the
/// bytes are not valid in `encoding`, and the text errors of [`load_str`].
pub fn load_reader_with_encoding<R: io::Read>(
    tree: &mut Tree,
    mut reader: R,
    encoding: Encoding,
    options: &IniOptions,
) -> Result<()> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(io_error)?;
    let text = encoding.decode(&bytes)?;
    load_str(tree, &text, options)
}

/// Renders `tree` as a UTF-8 XML document.
///
/// `comment` becomes the document's `comment` element; without one the root
/// footer is used.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if the XML writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_xml_string(tree: &Tree, comment: Option<&str>) -> Result<String> {
    xml::render(tree, comment, Encoding::Utf8)
}

/// Writes `tree` as an XML document in `encoding` to `writer`.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_xml_writer<W: io::Write>(
    tree: &Tree,
    mut writer: W,
    comment: Option<&str>,
    encoding: Encoding,
) -> Result<()> {
    let text = xml::render(tree, comment, encoding)?;
    let bytes = encoding.encode(&text);
    writer.write_all(&bytes).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    tracing::debug!(
        sections = tree.len(),
        bytes = bytes.len(),
        encoding = encoding.name(),
        "stored xml document"
    );
    Ok(())
}

/// Reads an XML document.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::from_xml_str;
///
/// let xml = r#"<ini version="1.0"><entry key="k">v</entry></ini>"#;
/// assert_eq!(from_xml_str(xml).unwrap().root().get("k"), Some("v"));
/// ```
///
/// # Errors
///
/// Returns the grammar errors ([`Error::UnknownElement`],
/// [`Error::MissingRequiredAttribute`], [`Error::DuplicateComment`],
/// [`Error::UnresolvableEntity`]) or [`Error::InvalidFormat`] for malformed XML.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_xml_str(xml: &str) -> Result<Tree> {
    let mut tree = Tree::new();
    load_xml_str(&mut tree, xml, LoadPolicy::Replace)?;
    Ok(tree)
}

/// Reads an XML document from bytes, detecting the encoding from the byte
/// order mark or the XML declaration.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEncoding`] for an unknown declared encoding,
/// plus the errors of [`from_xml_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_xml_slice(bytes: &[u8]) -> Result<Tree> {
    let mut tree = Tree::new();
    load_xml_slice(&mut tree, bytes, LoadPolicy::Replace)?;
    Ok(tree)
}

/// Reads an XML document from a byte stream.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, plus the errors of [`from_xml_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_xml_reader<R: io::Read>(mut reader: R) -> Result<Tree> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(io_error)?;
    from_xml_slice(&bytes)
}

/// Loads an XML document into an existing tree. The cursor is not moved.
///
/// # Errors
///
/// See [`from_xml_str`].
pub fn load_xml_str(tree: &mut Tree, xml: &str, policy: LoadPolicy) -> Result<()> {
    tracing::debug!(?policy, chars = xml.len(), "loading xml document");
    xml::load(tree, xml, policy)
}

/// Loads an XML document from bytes into an existing tree.
///
/// # Errors
///
/// See [`from_xml_slice`].
pub fn load_xml_slice(tree: &mut Tree, bytes: &[u8], policy: LoadPolicy) -> Result<()> {
    let encoding = xml::sniff_encoding(bytes)?;
    let text = encoding.decode(bytes)?;
    load_xml_str(tree, &text, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini;
    use std::io::Cursor;

    #[test]
    fn test_round_trip_with_sections_and_comments() {
        let mut tree = Tree::new();
        tree.put("global", "1");
        tree.set_comment("global", "first key").unwrap();
        tree.switch_section(Some("a.b"));
        tree.put("deep key", "x = y");
        tree.set_footer(Some("end of a.b".to_string()));

        let text = to_string(&tree).unwrap();
        let back = from_str(&text).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_load_resets_cursor_only_on_replace() {
        let mut tree = Tree::new();
        tree.switch_section(Some("keep"));
        let merge = IniOptions::new().with_load_policy(LoadPolicy::Merge);
        load_str(&mut tree, "[other]\nk=v\n", &merge).unwrap();
        assert_eq!(tree.current_path(), Some("keep"));

        load_str(&mut tree, "k=v\n", &IniOptions::new()).unwrap();
        assert_eq!(tree.current_path(), None);
    }

    #[test]
    fn test_relative_headers_ignore_cursor_on_merge() {
        let mut tree = Tree::new();
        tree.switch_section(Some("cursor"));
        let merge = IniOptions::new().with_load_policy(LoadPolicy::Merge);
        load_str(&mut tree, "[.x]\nk=v\n[a]\n[.y]\nl=w\n", &merge).unwrap();

        assert_eq!(tree.get_section(Some("x")).and_then(|s| s.get("k")), Some("v"));
        assert_eq!(tree.get_section(Some("a.y")).and_then(|s| s.get("l")), Some("w"));
        assert!(tree.get_section(Some("cursor.x")).is_none());
        assert_eq!(tree.current_path(), Some("cursor"));
    }

    #[test]
    fn test_escaped_comments_round_trip() {
        let mut tree = ini!({ "k" => "v" }, ["s"] { "x" => "1" });
        tree.set_comment("k", "smile \u{263A} \u{1F600}").unwrap();
        tree.switch_section(Some("s"));
        tree.set_footer(Some("caf\u{e9} \\u0041".to_string()));
        tree.switch_section(None);

        let escaped = IniOptions::new().with_escape_unicode(true);
        let text = to_string_with_options(&tree, &escaped).unwrap();
        assert!(text.starts_with("#smile \\u263A \\uD83D\\uDE00\n"));
        assert_eq!(from_str(&text).unwrap(), tree);

        for encoding in [Encoding::Latin1, Encoding::Ascii] {
            let mut buffer = Vec::new();
            to_writer_with_encoding(&tree, &mut buffer, None, &IniOptions::new(), encoding)
                .unwrap();
            assert!(buffer.is_ascii(), "{}", encoding.name());
            let mut back = Tree::new();
            load_reader_with_encoding(&mut back, Cursor::new(buffer), encoding, &IniOptions::new())
                .unwrap();
            assert_eq!(back, tree, "{}", encoding.name());
        }
    }

    #[test]
    fn test_reader_and_encodings() {
        let mut tree = Tree::new();
        tree.put("k", "\u{e9}\u{263A}");

        for encoding in [Encoding::Utf8, Encoding::Utf16, Encoding::Utf16Le, Encoding::Latin1] {
            let mut buffer = Vec::new();
            to_writer_with_encoding(&tree, &mut buffer, None, &IniOptions::new(), encoding)
                .unwrap();
            let mut back = Tree::new();
            load_reader_with_encoding(&mut back, Cursor::new(buffer), encoding, &IniOptions::new())
                .unwrap();
            assert_eq!(back, tree, "{}", encoding.name());
        }

        let latin1 = from_reader(Cursor::new(b"k=\\u00E9\\u263A".to_vec())).unwrap();
        assert_eq!(latin1, tree);
    }

    #[test]
    fn test_xml_round_trip_through_bytes() {
        let tree = ini!(
            { "k" => "v & w" },
            ["s.t"] { "x" => "\u{263A}" }
        );
        for encoding in [Encoding::Utf8, Encoding::Utf16, Encoding::Latin1, Encoding::Ascii] {
            let mut buffer = Vec::new();
            to_xml_writer(&tree, &mut buffer, None, encoding).unwrap();
            assert_eq!(from_xml_slice(&buffer).unwrap(), tree, "{}", encoding.name());
        }
    }

    #[test]
    fn test_serde_derive() {
        let tree = ini!({ "k" => "v" }, ["s"] { "x" => "1" });
        let json = serde_json::to_string(&tree).unwrap();
        let back: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}

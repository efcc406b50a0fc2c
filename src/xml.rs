//! XML form of a section tree.
//!
//! The document grammar is fixed:
//!
//! ```text
//! <!ELEMENT ini ( comment?, ( section | entry )* ) >
//! <!ELEMENT section ( section | entry )* >
//! <!ELEMENT entry (#PCDATA) >
//! ```
//!
//! Sections nest to express the dotted path, so `a.b` is written as a
//! `section name="b"` inside `section name="a"`. Only entries and the root
//! footer (as `comment`) are represented; per-key comments and section
//! footers are not part of the grammar.
//!
//! The DOCTYPE names a well-known system identifier. It is never fetched:
//! [`resolve_entity`] serves the DTD text from memory and rejects every other
//! identifier.
//!
//! ```rust
//! use serde_ini_tree::{from_xml_str, to_xml_string, Tree};
//!
//! let mut tree = Tree::new();
//! tree.put("k", "v");
//! tree.switch_section(Some("a.b"));
//! tree.put("deep", "1");
//!
//! let xml = to_xml_string(&tree, Some("hi")).unwrap();
//! assert!(xml.contains("<section name=\"b\">"));
//!
//! let back = from_xml_str(&xml).unwrap();
//! assert_eq!(back.get_section(Some("a.b")).and_then(|s| s.get("deep")), Some("1"));
//! assert_eq!(back.root().footer(), Some("hi"));
//! ```

use crate::options::LoadPolicy;
use crate::{path, Encoding, Error, Result, Store, Tree};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::Write;

/// System identifier of the INI document type.
pub const DTD_URI: &str = "https://dtd.tianscar.com/ini.dtd";

/// The document type definition served for [`DTD_URI`].
pub const DTD: &str = "<!-- DTD for INI -->

<!ELEMENT ini ( comment?, ( section | entry )* ) >

<!ATTLIST ini version CDATA #FIXED \"1.0\">

<!ELEMENT comment (#PCDATA) >

<!ELEMENT section ( section | entry )* >

<!ATTLIST section name CDATA #REQUIRED>

<!ELEMENT entry (#PCDATA) >

<!ATTLIST entry key CDATA #REQUIRED>";

const VERSION: &str = "1.0";
const INDENT: usize = 4;

/// Returns the DTD text for `system_id`.
///
/// # Errors
///
/// Returns [`Error::UnresolvableEntity`] for any identifier other than [`DTD_URI`].
pub fn resolve_entity(system_id: &str) -> Result<&'static str> {
    if system_id == DTD_URI {
        Ok(DTD)
    } else {
        Err(Error::UnresolvableEntity(system_id.to_string()))
    }
}

/// Renders `tree` as an XML document declaring `encoding`.
///
/// `comment` becomes the `comment` element; without one the root footer is
/// used, even when it is empty. For encodings outside the UTF family, characters the encoding
/// cannot represent are written as numeric character references, so the
/// result only needs [`Encoding::encode`].
pub fn render(tree: &Tree, comment: Option<&str>, encoding: Encoding) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

    writer
        .write_event(Event::Decl(BytesDecl::new(VERSION, Some(encoding.name()), Some("no"))))
        .map_err(Error::invalid_format)?;
    let doctype = format!("ini SYSTEM \"{DTD_URI}\"");
    writer
        .write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))
        .map_err(Error::invalid_format)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("ini").with_attributes([("version", VERSION)]),
        ))
        .map_err(Error::invalid_format)?;

    if let Some(comment) = comment.or(tree.root().footer()) {
        writer
            .create_element("comment")
            .write_text_content(BytesText::new(comment))
            .map_err(Error::invalid_format)?;
    }
    write_entries(&mut writer, tree.root())?;

    let mut open = 0;
    for section in tree.outline() {
        while open > section.depth {
            close_section(&mut writer)?;
            open -= 1;
        }
        writer
            .write_event(Event::Start(
                BytesStart::new("section").with_attributes([("name", path::plain_name(section.path))]),
            ))
            .map_err(Error::invalid_format)?;
        open += 1;
        if let Some(store) = section.store {
            write_entries(&mut writer, store)?;
        }
    }
    for _ in 0..open {
        close_section(&mut writer)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("ini")))
        .map_err(Error::invalid_format)?;
    writer.get_mut().write_all(b"\n").map_err(Error::invalid_format)?;

    let text = String::from_utf8(writer.into_inner()).map_err(Error::invalid_format)?;
    if encoding.is_unicode() {
        return Ok(text);
    }
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if encoding.can_encode(ch) {
            out.push(ch);
        } else {
            let _ = write!(out, "&#x{:X};", ch as u32);
        }
    }
    Ok(out)
}

fn write_entries(writer: &mut Writer<Vec<u8>>, store: &Store) -> Result<()> {
    for (key, value) in store.iter() {
        writer
            .create_element("entry")
            .with_attribute(("key", key))
            .write_text_content(BytesText::new(value))
            .map_err(Error::invalid_format)?;
    }
    Ok(())
}

fn close_section(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new("section")))
        .map_err(Error::invalid_format)?;
    Ok(())
}

/// Guesses the encoding of an XML document from its byte order mark, its
/// first bytes, or the `encoding` pseudo-attribute of its declaration.
/// Defaults to UTF-8.
///
/// # Errors
///
/// Returns [`Error::UnsupportedEncoding`] if the declaration names an
/// encoding outside [`Encoding`].
pub fn sniff_encoding(bytes: &[u8]) -> Result<Encoding> {
    match bytes {
        [0xFE, 0xFF, ..] => return Ok(Encoding::Utf16),
        [0xFF, 0xFE, ..] => return Ok(Encoding::Utf16Le),
        [0xEF, 0xBB, 0xBF, ..] => return Ok(Encoding::Utf8),
        [0x00, b'<', ..] => return Ok(Encoding::Utf16Be),
        [b'<', 0x00, ..] => return Ok(Encoding::Utf16Le),
        _ => {}
    }
    let head: String = bytes.iter().take(256).map(|&b| char::from(b)).collect();
    match declared_encoding(&head) {
        Some(label) => Encoding::for_label(label),
        None => Ok(Encoding::Utf8),
    }
}

fn declared_encoding(head: &str) -> Option<&str> {
    let decl = head.strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    quoted(rest).map(|(literal, _)| literal)
}

/// Splits a leading `"..."` or `'...'` literal off `s`.
fn quoted(s: &str) -> Option<(&str, &str)> {
    let quote = s.chars().next().filter(|&c| c == '"' || c == '\'')?;
    let body = &s[1..];
    let end = body.find(quote)?;
    Some((&body[..end], &body[end + 1..]))
}

/// System identifier of a DOCTYPE declaration body, if it has one.
fn doctype_system_id(doctype: &str) -> Option<&str> {
    if let Some(at) = doctype.find("SYSTEM") {
        return quoted(doctype[at + "SYSTEM".len()..].trim_start()).map(|(id, _)| id);
    }
    let at = doctype.find("PUBLIC")?;
    let (_, rest) = quoted(doctype[at + "PUBLIC".len()..].trim_start())?;
    quoted(rest.trim_start()).map(|(id, _)| id)
}

/// Open element while loading.
enum Frame {
    Ini,
    Comment,
    Section(String),
    Entry(String),
}

struct Loader<'t> {
    tree: &'t mut Tree,
    stack: Vec<Frame>,
    text: String,
    root_seen: bool,
    comment_seen: bool,
    content_seen: bool,
    entries: usize,
}

/// Path of the innermost open section, `None` at the root.
fn section_path(stack: &[Frame]) -> Option<&str> {
    stack.iter().rev().find_map(|frame| match frame {
        Frame::Section(path) => Some(path.as_str()),
        _ => None,
    })
}

fn attribute(element: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(Error::invalid_format)?;
        if attr.key.as_ref() == name {
            let value = attr.unescape_value().map_err(Error::invalid_format)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(element: &BytesStart, element_name: &str, name: &str) -> Result<String> {
    attribute(element, name.as_bytes())?
        .ok_or_else(|| Error::missing_attribute(element_name, name))
}

impl<'t> Loader<'t> {
    fn start(&mut self, element: &BytesStart) -> Result<()> {
        let qname = element.name();
        let name = String::from_utf8_lossy(qname.as_ref()).into_owned();
        let in_container = matches!(self.stack.last(), Some(Frame::Ini | Frame::Section(_)));

        let frame = match name.as_str() {
            "ini" if self.stack.is_empty() && !self.root_seen => {
                if let Some(version) = attribute(element, b"version")? {
                    if version != VERSION {
                        return Err(Error::invalid_format(format!(
                            "unsupported ini version \"{version}\""
                        )));
                    }
                }
                self.root_seen = true;
                Frame::Ini
            }
            "comment" if matches!(self.stack.last(), Some(Frame::Ini)) => {
                if self.comment_seen {
                    return Err(Error::DuplicateComment);
                }
                if self.content_seen {
                    return Err(Error::invalid_format(
                        "comment must precede sections and entries",
                    ));
                }
                self.comment_seen = true;
                self.text.clear();
                Frame::Comment
            }
            "section" if in_container => {
                let plain = required_attribute(element, "section", "name")?;
                if path::normalize(&plain).is_none() {
                    return Err(Error::invalid_format("section name is empty"));
                }
                let full = match section_path(&self.stack) {
                    Some(parent) => format!("{parent}{}{plain}", path::SEPARATOR),
                    None => plain,
                };
                let full = path::normalize(&full)
                    .map(Cow::into_owned)
                    .unwrap_or_default();
                self.content_seen = true;
                tracing::trace!(section = %full, "entered xml section");
                Frame::Section(full)
            }
            "entry" if in_container => {
                let key = required_attribute(element, "entry", "key")?;
                self.content_seen = true;
                self.text.clear();
                Frame::Entry(key)
            }
            "ini" | "comment" | "section" | "entry" => {
                return Err(Error::invalid_format(format!(
                    "element \"{name}\" is not allowed here"
                )))
            }
            _ => return Err(Error::unknown_element(&name)),
        };
        self.stack.push(frame);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Entry(key)) => {
                let value = std::mem::take(&mut self.text);
                self.tree.store_at(section_path(&self.stack)).put(key, value);
                self.entries += 1;
            }
            Some(Frame::Comment) => {
                let comment = std::mem::take(&mut self.text);
                self.tree.root_mut().set_footer(Some(comment));
            }
            Some(Frame::Ini | Frame::Section(_)) => {}
            None => return Err(Error::invalid_format("unbalanced end tag")),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.stack.last() {
            Some(Frame::Entry(_) | Frame::Comment) => {
                self.text.push_str(text);
                Ok(())
            }
            _ if text.chars().all(char::is_whitespace) => Ok(()),
            _ => Err(Error::invalid_format("unexpected character data")),
        }
    }
}

/// Loads an XML document into `tree`.
///
/// The tree cursor is not moved. With [`LoadPolicy::Replace`] the tree is
/// cleared first.
pub fn load(tree: &mut Tree, xml: &str, policy: LoadPolicy) -> Result<()> {
    if policy == LoadPolicy::Replace {
        tree.clear();
    }
    let mut reader = Reader::from_str(xml);
    let mut loader = Loader {
        tree,
        stack: Vec::new(),
        text: String::new(),
        root_seen: false,
        comment_seen: false,
        content_seen: false,
        entries: 0,
    };

    loop {
        match reader.read_event().map_err(Error::invalid_format)? {
            Event::Start(ref e) => loader.start(e)?,
            Event::Empty(ref e) => {
                loader.start(e)?;
                loader.end()?;
            }
            Event::End(_) => loader.end()?,
            Event::Text(ref e) => {
                let text = e.unescape().map_err(Error::invalid_format)?;
                loader.text(&text)?;
            }
            Event::CData(ref e) => {
                let text = std::str::from_utf8(e).map_err(Error::invalid_format)?;
                loader.text(text)?;
            }
            Event::DocType(ref e) => {
                let doctype = std::str::from_utf8(e).map_err(Error::invalid_format)?;
                if let Some(system_id) = doctype_system_id(doctype) {
                    resolve_entity(system_id)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !loader.root_seen {
        return Err(Error::invalid_format("missing ini element"));
    }
    if !loader.stack.is_empty() {
        return Err(Error::invalid_format("unexpected end of document"));
    }
    tracing::debug!(entries = loader.entries, "loaded xml document");
    Ok(())
}

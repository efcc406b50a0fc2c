//! Character classes and escaping shared by the reader and the writers.

use crate::IniOptions;

/// Which part of a record a string is written as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    Key,
    Value,
    Section,
}

/// Whitespace as the reader sees it: ASCII blanks, the C0 separators
/// `U+001C..=U+001F`, and Unicode spaces other than the no-break ones.
#[inline]
pub(crate) fn is_blank(ch: char) -> bool {
    match ch {
        ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{1C}'..='\u{1F}' => true,
        '\u{A0}' | '\u{85}' | '\u{2007}' | '\u{202F}' => false,
        _ => !ch.is_ascii() && ch.is_whitespace(),
    }
}

#[inline]
pub(crate) fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

#[inline]
fn is_printable_ascii(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

/// Appends `ch` as one or two `\uXXXX` escapes (UTF-16 code units, upper-case hex).
pub(crate) fn push_unicode_escape(out: &mut String, ch: char) {
    let mut units = [0u16; 2];
    for unit in ch.encode_utf16(&mut units) {
        out.push_str(&format!("\\u{:04X}", unit));
    }
}

/// Code unit of a `\uXXXX` escape starting at `index`, if there is one.
fn unicode_escape_at(chars: &[char], index: usize) -> Option<u32> {
    if chars.get(index) != Some(&'\\') || chars.get(index + 1) != Some(&'u') {
        return None;
    }
    chars
        .get(index + 2..index + 6)?
        .iter()
        .try_fold(0u32, |unit, ch| ch.to_digit(16).map(|digit| (unit << 4) | digit))
}

/// Decodes the `\uXXXX` escapes the writer puts into comment lines.
///
/// Surrogate pairs combine into one character. Anything that does not form a
/// valid escape, including a lone surrogate, is kept as written.
pub(crate) fn unescape_comment(comment: &str) -> String {
    if !comment.contains("\\u") {
        return comment.to_string();
    }
    let chars: Vec<char> = comment.chars().collect();
    let mut out = String::with_capacity(comment.len());
    let mut index = 0;
    while index < chars.len() {
        if let Some(unit) = unicode_escape_at(&chars, index) {
            let decoded = match unit {
                0xD800..=0xDBFF => unicode_escape_at(&chars, index + 6)
                    .filter(|low| (0xDC00..=0xDFFF).contains(low))
                    .and_then(|low| {
                        char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                    })
                    .map(|ch| (ch, 12)),
                _ => char::from_u32(unit).map(|ch| (ch, 6)),
            };
            if let Some((ch, width)) = decoded {
                out.push(ch);
                index += width;
                continue;
            }
        }
        out.push(chars[index]);
        index += 1;
    }
    out
}

/// Appends `s` to `out`, escaped so that the reader yields `s` again.
///
/// `escape_unicode` selects `\uXXXX` for characters outside printable ASCII;
/// control and whitespace characters are always escaped.
pub(crate) fn escape_into(
    out: &mut String,
    s: &str,
    field: Field,
    options: &IniOptions,
    escape_unicode: bool,
) {
    let count = s.chars().count();
    let last = count.saturating_sub(1);
    let first = s.chars().next();
    // A value wrapped in matching quotes would lose them on reload.
    let guard_quote = count >= 2 && first.is_some_and(is_quote) && first == s.chars().last();

    for (index, ch) in s.chars().enumerate() {
        if index == 0 {
            if ch == ' ' && field != Field::Key {
                out.push_str("\\ ");
                continue;
            }
            if guard_quote {
                out.push('\\');
                out.push(ch);
                continue;
            }
        }
        match ch {
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{0C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            _ => {
                if ch == '\\'
                    || options.is_comment_sign(ch)
                    || options.is_delimiter(ch)
                    || (field == Field::Key && ch == ' ')
                    || (field == Field::Section && ch == ' ' && index == last)
                    || (options.sections && (ch == '[' || ch == ']'))
                {
                    out.push('\\');
                }
                if is_printable_ascii(ch) {
                    out.push(ch);
                } else if escape_unicode || ch.is_control() || is_blank(ch) {
                    push_unicode_escape(out, ch);
                } else {
                    out.push(ch);
                }
            }
        }
    }
}

/// Appends a comment as one or more lines, each starting with the writer's
/// comment sign unless the line already starts with a configured sign.
///
/// `\r\n`, `\r` and `\n` all split lines. Characters for which `raw` returns
/// `false` are written as `\uXXXX`, and so is a backslash that would otherwise
/// read back as the start of such an escape.
pub(crate) fn write_comment(
    out: &mut String,
    comment: &str,
    options: &IniOptions,
    raw: impl Fn(char) -> bool,
) {
    let separator = options.line_separator.as_str();
    out.push(options.comment_sign);

    let chars: Vec<char> = comment.chars().collect();
    for (index, &ch) in chars.iter().enumerate() {
        let next = chars.get(index + 1).copied();
        match ch {
            '\r' if next == Some('\n') => {}
            '\r' | '\n' => {
                out.push_str(separator);
                if !next.is_some_and(|next| options.is_comment_sign(next)) {
                    out.push(options.comment_sign);
                }
            }
            '\\' if unicode_escape_at(&chars, index).is_some() => push_unicode_escape(out, ch),
            _ if raw(ch) => out.push(ch),
            _ => push_unicode_escape(out, ch),
        }
    }
    out.push_str(separator);
}

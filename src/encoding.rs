//! Character encodings for byte-oriented entry points.
//!
//! Only a small fixed set of charsets is supported; they cover the formats the
//! text and XML writers are expected to produce. Labels are matched
//! case-insensitively.
//!
//! ```rust
//! use serde_ini_tree::Encoding;
//!
//! assert_eq!(Encoding::for_label("utf8").unwrap(), Encoding::Utf8);
//! assert_eq!(Encoding::for_label("Latin1").unwrap(), Encoding::Latin1);
//! assert!(Encoding::for_label("EBCDIC").is_err());
//! ```

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// Big-endian with a byte order mark.
    Utf16,
    Utf16Be,
    Utf16Le,
    Latin1,
    Ascii,
}

impl Encoding {
    /// Looks up an encoding by its charset label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for unknown labels.
    pub fn for_label(label: &str) -> Result<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-16" | "utf16" => Ok(Encoding::Utf16),
            "utf-16be" => Ok(Encoding::Utf16Be),
            "utf-16le" => Ok(Encoding::Utf16Le),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" => Ok(Encoding::Latin1),
            "us-ascii" | "ascii" => Ok(Encoding::Ascii),
            _ => Err(Error::unsupported_encoding(label)),
        }
    }

    /// Canonical label, as written into XML declarations.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16 => "UTF-16",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Ascii => "US-ASCII",
        }
    }

    /// `true` for the UTF family, which can represent every character.
    #[must_use]
    pub const fn is_unicode(&self) -> bool {
        !matches!(self, Encoding::Latin1 | Encoding::Ascii)
    }

    #[must_use]
    pub fn can_encode(&self, ch: char) -> bool {
        match self {
            Encoding::Latin1 => (ch as u32) <= 0xFF,
            Encoding::Ascii => ch.is_ascii(),
            _ => true,
        }
    }

    /// Encodes `text`. Characters the encoding cannot represent become `?`;
    /// callers escape them beforehand.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16 => {
                let mut bytes = vec![0xFE, 0xFF];
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Latin1 | Encoding::Ascii => text
                .chars()
                .map(|ch| if self.can_encode(ch) { ch as u8 } else { b'?' })
                .collect(),
        }
    }

    /// Decodes `bytes`, skipping a leading byte order mark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for malformed UTF-8/UTF-16 input or
    /// non-ASCII bytes in US-ASCII.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Encoding::Utf8 => {
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
                String::from_utf8(bytes.to_vec()).map_err(Error::invalid_format)
            }
            Encoding::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                _ => decode_utf16(bytes, u16::from_be_bytes),
            },
            Encoding::Utf16Be => {
                let bytes = bytes.strip_prefix(&[0xFE, 0xFF]).unwrap_or(bytes);
                decode_utf16(bytes, u16::from_be_bytes)
            }
            Encoding::Utf16Le => {
                let bytes = bytes.strip_prefix(&[0xFF, 0xFE]).unwrap_or(bytes);
                decode_utf16(bytes, u16::from_le_bytes)
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Ascii => {
                if let Some(bad) = bytes.iter().find(|b| !b.is_ascii()) {
                    return Err(Error::invalid_format(format!(
                        "byte 0x{bad:02X} is not US-ASCII"
                    )));
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::invalid_format("odd number of bytes in UTF-16 input"));
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(Error::invalid_format)
}

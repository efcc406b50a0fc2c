//! Error types for INI and XML reading and writing.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side
//! is the [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **Escape Errors**: incomplete or invalid `\uXXXX` sequences
//! - **Syntax Errors**: malformed section headers, with line/column information
//! - **XML Grammar Errors**: unknown elements, missing attributes, a second comment
//! - **Encoding Errors**: charset labels this crate cannot read or write
//! - **I/O Errors**: failures propagated from the underlying stream
//!
//! A failure aborts the whole load or store. Tree mutations applied before the
//! failure are kept; partial output is not removed.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_tree::{from_str, Error};
//!
//! let result = from_str("key=\\u12");
//! assert!(matches!(result, Err(Error::MalformedEscape { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while reading or writing INI and XML documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Incomplete or invalid `\uXXXX` escape
    #[error("Malformed escape at line {line}: {msg}")]
    MalformedEscape { line: usize, msg: String },

    /// Syntax error in a section header
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// An XML `entry` or `section` element lacks its required attribute
    #[error("Attribute \"{attribute}\" is required and must be specified for element type \"{element}\"")]
    MissingRequiredAttribute { element: String, attribute: String },

    /// More than one `comment` element in an XML document
    #[error("Only one comment element may be allowed")]
    DuplicateComment,

    /// An XML element outside the fixed grammar
    #[error("Invalid element type: {0}")]
    UnknownElement(String),

    /// A DOCTYPE system identifier other than the built-in one
    #[error("Invalid system identifier: {0}")]
    UnresolvableEntity(String),

    /// Charset label that cannot be read or written
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Malformed document that is not covered by a more specific variant
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Writer options that contradict each other
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A comment was attached to a key that is not in the store
    #[error("No entry for key \"{0}\"")]
    UnknownKey(String),
}

impl Error {
    /// Creates an I/O error for stream reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a malformed escape error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Error;
    ///
    /// let err = Error::malformed_escape(3, "expected format \\uxxxx");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn malformed_escape(line: usize, msg: &str) -> Self {
        Error::MalformedEscape {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates a syntax error with line and column information.
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a missing attribute error for an XML element.
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::MissingRequiredAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub fn unknown_element(name: &str) -> Self {
        Error::UnknownElement(name.to_string())
    }

    pub fn unsupported_encoding(label: &str) -> Self {
        Error::UnsupportedEncoding(label.to_string())
    }

    /// Creates an invalid format error from anything printable, typically a
    /// lower-level XML error.
    pub fn invalid_format<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidFormat(msg.to_string())
    }

    pub fn invalid_option(msg: &str) -> Self {
        Error::InvalidOption(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::syntax(4, 7, "characters after ']'");
        assert_eq!(
            err.to_string(),
            "Syntax error at line 4, column 7: characters after ']'"
        );

        let err = Error::missing_attribute("entry", "key");
        assert!(err.to_string().contains("\"key\""));
        assert!(err.to_string().contains("\"entry\""));

        assert_eq!(
            Error::unsupported_encoding("EBCDIC").to_string(),
            "Unsupported encoding: EBCDIC"
        );
    }
}

//! Diagnostic codes.
//!
//! - `E0xx` - Fatal document and query errors
//! - `W1xx` - Records skipped or flagged during extraction

use std::fmt;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Fatal Errors (E0xx)
    // =========================================================================
    /// Malformed document.
    ///
    /// The input is not well-formed XML, has no root element, or uses a
    /// construct the reader refuses (such as a DTD).
    E001,

    /// Invalid query path.
    ///
    /// A path expression used to search the document could not be compiled.
    E002,

    // =========================================================================
    // Skipped Records (W1xx)
    // =========================================================================
    /// Type definition without a name.
    ///
    /// Neither a `name` attribute nor a `name` child element was found.
    W100,

    /// Variable without an extractable record.
    W101,

    /// Program unit without a name.
    W102,

    /// Union container without a name.
    ///
    /// Neither the container nor any enclosing element carries a name.
    W103,

    /// Circular type reference.
    ///
    /// A structure or union contains itself through its members, directly or
    /// through other composite types.
    W104,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::W100 => "W100",
            ErrorCode::W101 => "W101",
            ErrorCode::W102 => "W102",
            ErrorCode::W103 => "W103",
            ErrorCode::W104 => "W104",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed document",
            ErrorCode::E002 => "invalid query path",
            ErrorCode::W100 => "unnamed type definition",
            ErrorCode::W101 => "variable not extractable",
            ErrorCode::W102 => "unnamed program unit",
            ErrorCode::W103 => "unnamed union container",
            ErrorCode::W104 => "circular type reference",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

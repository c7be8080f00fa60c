//! Error and diagnostic system for the TC6 extractor.
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional code, labelled source spans and
//! help text.
//!
//! Fatal conditions (a malformed document or an invalid query path) are
//! returned as a [`ParseError`] wrapping one or more error diagnostics.
//! Recoverable conditions never fail extraction; they surface as warning
//! diagnostics derived from the event stream.
//!
//! # Example
//!
//! ```
//! # use tc6_parser::error::{Diagnostic, ErrorCode};
//! # use tc6_parser::Span;
//!
//! let diag = Diagnostic::warning("data type has no resolvable name")
//!     .with_code(ErrorCode::W100)
//!     .with_label(Span::new(120..180), "unnamed type definition")
//!     .with_help("add a `name` attribute to the `dataType` element");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;

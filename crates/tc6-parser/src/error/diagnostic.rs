//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! code, labelled source spans and help text.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// warning[W100]: data type has no resolvable name
///   --> plant.xml:14:9
///    |
/// 14 |         <dataType>
///    |         ^^^^^^^^^^ unnamed type definition
///    |
///    = help: add a `name` attribute to the `dataType` element
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// A fatal diagnostic; extraction stops.
    ///
    /// # Example
    ///
    /// ```
    /// # use tc6_parser::error::{Diagnostic, ErrorCode};
    /// # use tc6_parser::Span;
    ///
    /// let diag = Diagnostic::error("unexpected end of document")
    ///     .with_code(ErrorCode::E001)
    ///     .with_label(Span::new(41..42), "here");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Mark the offending element.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Point at the element the offending one was found in.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "warning[W100]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::warning("union container has no resolvable name")
            .with_code(ErrorCode::W103)
            .with_label(Span::new(100..120), "unnamed union")
            .with_secondary_label(Span::new(50..300), "inside this block")
            .with_help("name the enclosing `dataType` element");

        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::W103));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.help(), Some("name the enclosing `dataType` element"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("root element not found").with_code(ErrorCode::E001);
        assert_eq!(diag.to_string(), "error[E001]: root element not found");

        let diag = Diagnostic::warning("skipped variable");
        assert_eq!(diag.to_string(), "warning: skipped variable");
    }
}

//! miette rendering for extraction failures and warnings.
//!
//! A malformed export fails with one or more `E0xx` diagnostics that point
//! into the XML text. Skipped nodes (`W100`-`W103`) and circular type
//! references (`W104`) do not fail the run; with `--show-warnings` they go
//! through the same [`DiagnosticAdapter`] at warning severity.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use tc6::Tc6Error;
use tc6_parser::error::Diagnostic;

/// Adapter for a single extraction diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Document text for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(if self.diag.severity().is_warning() {
            miette::Severity::Warning
        } else {
            miette::Severity::Error
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        // Cycle warnings have no location in the document.
        (!self.diag.labels().is_empty()).then_some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let message = Some(label.message().to_string());
            let span = span_to_miette(label.span());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`Tc6Error`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a Tc6Error);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            Tc6Error::Io(_) => "tc6::io",
            Tc6Error::Parse { .. } => return None,
            Tc6Error::Config(_) => "tc6::config",
            Tc6Error::Render(_) => "tc6::render",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            Tc6Error::Io(_) => "check the input path and the directory of --output",
            Tc6Error::Config(_) => "check the file passed with --config or tc6/config.toml",
            Tc6Error::Parse { .. } | Tc6Error::Render(_) => return None,
        };
        Some(Box::new(help))
    }
}

/// Anything `main` can hand to the miette report handler.
#[derive(Debug)]
pub enum Reportable<'a> {
    Diagnostic(DiagnosticAdapter<'a>),
    Error(ErrorAdapter<'a>),
}

impl Reportable<'_> {
    fn inner(&self) -> &(dyn MietteDiagnostic + '_) {
        match self {
            Reportable::Diagnostic(d) => d,
            Reportable::Error(e) => e,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().code()
    }

    fn severity(&self) -> Option<miette::Severity> {
        self.inner().severity()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.inner().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.inner().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().labels()
    }
}

fn span_to_miette(span: tc6_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// One [`Reportable`] per diagnostic of a parse failure, or a single one
/// for any other error.
pub fn to_reportables(err: &Tc6Error) -> Vec<Reportable<'_>> {
    match err {
        Tc6Error::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Wrap extraction warnings for rendering against `src`.
pub fn warning_reportables<'a>(warnings: &'a [Diagnostic], src: &'a str) -> Vec<Reportable<'a>> {
    warnings
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
        .collect()
}

#[cfg(test)]
mod tests {
    use tc6_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("malformed document")
            .with_code(ErrorCode::E001)
            .with_label(Span::new(0..5), "here")
            .with_help("fix the XML");
        let err = Tc6Error::new_parse_error(ParseError::from(diag), "<a><b>");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "malformed document");
                assert_eq!(d.code().unwrap().to_string(), "E001");
                assert_eq!(d.severity(), Some(miette::Severity::Error));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_non_parse_error() {
        let err = Tc6Error::Config("bad value".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad value");
                assert_eq!(e.code().unwrap().to_string(), "tc6::config");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_warning_without_location() {
        let warnings = vec![
            Diagnostic::warning("circular type reference: ST_Node -> ST_Node")
                .with_code(ErrorCode::W104),
        ];

        let reportables = warning_reportables(&warnings, "<project/>");
        assert_eq!(reportables[0].severity(), Some(miette::Severity::Warning));
        assert_eq!(reportables[0].code().unwrap().to_string(), "W104");
        assert!(reportables[0].labels().is_none());
        assert!(reportables[0].source_code().is_none());
    }

    #[test]
    fn test_io_error_help() {
        let err = Tc6Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "tc6::io");
        assert!(reportables[0].help().is_some());
    }

    #[test]
    fn test_warning_labels() {
        let warnings = vec![
            Diagnostic::warning("union container has no resolvable name")
                .with_code(ErrorCode::W103)
                .with_label(Span::new(10..17), "unnamed union container")
                .with_secondary_label(Span::new(0..30), "found inside this element"),
        ];
        let src = "<data name=\"union\"><union/></data>";

        let reportables = warning_reportables(&warnings, src);
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].severity(), Some(miette::Severity::Warning));

        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("found inside this element"));
    }
}

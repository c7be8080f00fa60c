//! Structured extraction events.
//!
//! Every decision the pipeline takes is recorded as an [`Event`] and logged
//! through the `log` facade with key-value fields. The recorded events are
//! returned with the model so that callers can inspect them without a logger.

use std::fmt;

use log::{debug, info, trace, warn};

use tc6_core::kind::{Collection, Strategy};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

/// The section of the document a locator cascade is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concern {
    /// Resources holding data types and program units.
    Application,
    /// Global variable groups.
    GlobalVariables,
    /// Union containers inside the union auxiliary-data block.
    Unions,
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => write!(f, "application"),
            Self::GlobalVariables => write!(f, "global-variables"),
            Self::Unions => write!(f, "unions"),
        }
    }
}

/// A node that was skipped because no record could be built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    code: ErrorCode,
    message: String,
    span: Span,
    context: Option<Span>,
}

impl Rejection {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Attach the span of the enclosing element.
    pub fn with_context(mut self, context: Span) -> Self {
        self.context = Some(context);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Convert into a warning diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let help = match self.code {
            ErrorCode::W100 | ErrorCode::W102 => {
                "add a `name` attribute or a `name` child element"
            }
            ErrorCode::W101 => "variables need a `name` attribute or a `name` child element",
            ErrorCode::W103 => "name the union element or its enclosing `dataType`",
            ErrorCode::E001 | ErrorCode::E002 | ErrorCode::W104 => "",
        };

        let mut diag = Diagnostic::warning(&self.message)
            .with_code(self.code)
            .with_label(self.span, self.code.description());
        if let Some(context) = self.context {
            diag = diag.with_secondary_label(context, "found inside this element");
        }
        if !help.is_empty() {
            diag = diag.with_help(help);
        }
        diag
    }
}

/// A single observable step of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StrategyAttempted {
        concern: Concern,
        strategy: Strategy,
    },
    SectionLocated {
        concern: Concern,
        strategy: Strategy,
        sections: usize,
    },
    SectionNotFound {
        concern: Concern,
        strategy: Strategy,
    },
    RecordAccepted {
        collection: Collection,
        name: String,
    },
    RecordRejected(Rejection),
    DuplicateIgnored {
        collection: Collection,
        name: String,
    },
    CollectionCount {
        collection: Collection,
        count: usize,
    },
    /// Composite types that contain themselves, first name repeated last.
    CircularReference {
        cycle: Vec<String>,
    },
}

impl Event {
    /// Warning diagnostic for a circular reference; `None` for other events.
    pub fn circular_reference_diagnostic(&self) -> Option<Diagnostic> {
        let Event::CircularReference { cycle } = self else {
            return None;
        };
        Some(
            Diagnostic::warning(format!("circular type reference: {}", cycle.join(" -> ")))
                .with_code(ErrorCode::W104)
                .with_help("the cycle is reported once; member types stay unexpanded"),
        )
    }
}

/// Ordered sink for [`Event`]s.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `event` and append it to the log.
    pub fn record(&mut self, event: Event) {
        match &event {
            Event::StrategyAttempted { concern, strategy } => {
                debug!(concern:% = concern, strategy:% = strategy; "Strategy attempted");
            }
            Event::SectionLocated {
                concern,
                strategy,
                sections,
            } => {
                debug!(concern:% = concern, strategy:% = strategy, sections = *sections; "Section located");
            }
            Event::SectionNotFound { concern, strategy } => {
                debug!(concern:% = concern, strategy:% = strategy; "Section not found");
            }
            Event::RecordAccepted { collection, name } => {
                trace!(collection:% = collection, name = name.as_str(); "Record accepted");
            }
            Event::RecordRejected(rejection) => {
                warn!(code:% = rejection.code, span:? = rejection.span.to_range(); "{}", rejection.message);
            }
            Event::DuplicateIgnored { collection, name } => {
                debug!(collection:% = collection, name = name.as_str(); "Duplicate record ignored");
            }
            Event::CollectionCount { collection, count } => {
                info!(collection:% = collection, count = *count; "Collection extracted");
            }
            Event::CircularReference { cycle } => {
                warn!(code:% = ErrorCode::W104, cycle:? = cycle; "Circular type reference detected");
            }
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

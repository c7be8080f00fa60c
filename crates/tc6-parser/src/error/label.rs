//! Labelled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the source document.
///
/// A diagnostic usually carries one primary label marking the offending
/// element, and optionally secondary labels pointing at enclosing context
/// such as the auxiliary-data block a node was found in.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let primary = Label::primary(Span::new(10..20), "unnamed element");
        assert_eq!(primary.span().to_range(), 10..20);
        assert_eq!(primary.message(), "unnamed element");
        assert!(primary.is_primary());

        let secondary = Label::secondary(Span::new(0..40), "inside this block");
        assert!(secondary.is_secondary());
    }
}

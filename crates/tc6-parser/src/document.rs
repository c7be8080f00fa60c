//! Document loading and node helpers.
//!
//! The document is parsed once into a read-only [`roxmltree::Document`] and
//! borrowed by every later phase. All name comparisons use local names so
//! that the PLCopen namespace revisions (`tc6_0100`, `tc6_0200`, `tc6_0201`)
//! are handled alike.

use roxmltree::{Document, Node};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

/// Parse `source` into a document tree.
///
/// # Errors
///
/// Returns a [`ParseError`] with an [`ErrorCode::E001`] diagnostic when the
/// source is not well-formed XML or has no root element.
pub fn load(source: &str) -> Result<Document<'_>, ParseError> {
    Document::parse(source).map_err(|err| {
        let pos = err.pos();
        let offset = byte_offset(source, pos.row, pos.col);
        let span = Span::new(offset..(offset + 1).min(source.len()));

        Diagnostic::error(format!("malformed document: {err}"))
            .with_code(ErrorCode::E001)
            .with_label(span, "document cannot be read past this point")
            .with_help("the export must be a well-formed XML document")
            .into()
    })
}

/// Convert a 1-based row and character column into a byte offset.
fn byte_offset(source: &str, row: u32, col: u32) -> usize {
    let mut line_start = 0;
    for _ in 1..row {
        match source[line_start..].find('\n') {
            Some(idx) => line_start += idx + 1,
            None => return source.len(),
        }
    }

    let line = &source[line_start..];
    let column = col.saturating_sub(1) as usize;
    line.char_indices()
        .nth(column)
        .map_or(source.len(), |(idx, _)| line_start + idx)
}

/// Namespace-agnostic accessors on document nodes.
pub trait NodeExt<'a, 'input: 'a> {
    /// Tag name without namespace. Empty for non-element nodes.
    fn local_name(&self) -> &'a str;

    /// Attribute value by local name.
    fn attr(&self, name: &str) -> Option<&'a str>;

    /// Element children in document order.
    fn element_children(&self) -> impl Iterator<Item = Node<'a, 'input>>;

    /// First element child with the given local name.
    fn child(&self, name: &str) -> Option<Node<'a, 'input>>;

    /// All text below this node concatenated and trimmed.
    fn deep_text(&self) -> String;

    /// Trimmed text of the named child, `None` when missing or blank.
    fn child_text(&self, name: &str) -> Option<String>;

    /// Byte span of this node in the source.
    fn span(&self) -> Span;
}

impl<'a, 'input: 'a> NodeExt<'a, 'input> for Node<'a, 'input> {
    fn local_name(&self) -> &'a str {
        if self.is_element() {
            self.tag_name().name()
        } else {
            ""
        }
    }

    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .find(|attribute| attribute.name() == name)
            .map(|attribute| attribute.value())
    }

    fn element_children(&self) -> impl Iterator<Item = Node<'a, 'input>> {
        self.children().filter(Node::is_element)
    }

    fn child(&self, name: &str) -> Option<Node<'a, 'input>> {
        self.element_children()
            .find(|child| child.local_name() == name)
    }

    fn deep_text(&self) -> String {
        let text: String = self
            .descendants()
            .filter(Node::is_text)
            .filter_map(|node| node.text())
            .collect();
        text.trim().to_string()
    }

    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|child| child.deep_text())
            .filter(|text| !text.is_empty())
    }

    fn span(&self) -> Span {
        Span::new(self.range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reports_position() {
        let source = "<project>\n  <types>\n</project>";
        let err = load(source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        let span = diag.labels()[0].span();
        assert!(span.start() > source.find("<types>").unwrap());
        assert!(span.end() <= source.len());
    }

    #[test]
    fn test_load_empty_document() {
        let err = load("").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
    }

    #[test]
    fn test_byte_offset() {
        let source = "ab\ncdé\nf";
        assert_eq!(byte_offset(source, 1, 1), 0);
        assert_eq!(byte_offset(source, 2, 3), 5);
        assert_eq!(byte_offset(source, 3, 1), 8);
        assert_eq!(byte_offset(source, 9, 1), source.len());
    }

    #[test]
    fn test_node_helpers_ignore_namespaces() {
        let source = r#"<project xmlns="http://www.plcopen.org/xml/tc6_0200">
            <dataType name="T_A"><documentation><p> speed <b>limit</b> </p></documentation></dataType>
        </project>"#;
        let doc = load(source).unwrap();
        let root = doc.root_element();

        assert_eq!(root.local_name(), "project");
        let data_type = root.child("dataType").unwrap();
        assert_eq!(data_type.attr("name"), Some("T_A"));
        assert_eq!(data_type.attr("missing"), None);
        assert_eq!(data_type.child_text("documentation").as_deref(), Some("speed limit"));
        assert_eq!(data_type.child_text("name"), None);
        assert!(source[data_type.span().to_range()].starts_with("<dataType"));
    }
}

//! Field extraction for variable-shaped and program-unit nodes.
//!
//! These are pure functions over single nodes; they never search outside the
//! subtree they are given and never fail. A node that cannot be turned into
//! a record yields `None`, and the caller decides whether that is worth a
//! diagnostic.

use roxmltree::Node;

use tc6_core::{
    kind::Origin,
    record::{Details, NestedUnit, ProgramUnitKind, ProgramUnitRecord, VariableRecord},
};

use crate::document::NodeExt;

/// Type name used when a declaration carries no type information.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// A variable declaration before it is attributed to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub name: String,
    pub type_name: String,
    pub default: Option<String>,
    pub comment: Option<String>,
}

impl VariableDecl {
    pub fn into_record(self, group: impl Into<String>, origin: Origin) -> VariableRecord {
        VariableRecord::new(
            self.name,
            self.type_name,
            self.default,
            self.comment,
            group,
            origin,
        )
    }
}

/// Name of a node from its `name` attribute, else from a `name` child element.
pub fn resolve_name(node: Node<'_, '_>) -> Option<String> {
    node.attr("name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| node.child_text("name"))
}

/// Extract a variable declaration, or `None` if the node has no name.
pub fn extract_variable(node: Node<'_, '_>) -> Option<VariableDecl> {
    let name = resolve_name(node)?;

    let type_name = node
        .child("type")
        .and_then(render_type)
        .or_else(|| node.attr("type").map(str::to_string))
        .or_else(|| node.child("baseType").and_then(render_type))
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string());

    let comment = node
        .child_text("documentation")
        .or_else(|| node.child_text("comment"));

    Some(VariableDecl {
        name,
        type_name,
        default: initial_value(node),
        comment,
    })
}

/// Render a `type` or `baseType` element in IEC 61131-3 notation.
///
/// The element wraps exactly one child describing the type: an elementary
/// tag such as `<INT/>`, a `derived` reference, a `string` with optional
/// length, an `array`, a `pointer` or a subrange.
pub fn render_type(type_node: Node<'_, '_>) -> Option<String> {
    let Some(inner) = type_node.element_children().next() else {
        let text = type_node.deep_text();
        return (!text.is_empty()).then_some(text);
    };

    let base = |node: Node<'_, '_>| {
        node.child("baseType")
            .and_then(render_type)
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
    };

    let tag = inner.local_name();
    let rendered = match tag {
        "derived" => inner
            .attr("name")
            .map(str::to_string)
            .or_else(|| inner.child_text("name"))?,
        "name" => inner.deep_text(),
        "string" | "wstring" | "STRING" | "WSTRING" => {
            let keyword = tag.to_ascii_uppercase();
            match inner.attr("length") {
                Some(length) => format!("{keyword}({length})"),
                None => keyword,
            }
        }
        "array" => {
            let dimensions: Vec<String> = inner
                .element_children()
                .filter(|child| child.local_name() == "dimension")
                .map(|dim| {
                    format!(
                        "{}..{}",
                        dim.attr("lower").unwrap_or("0"),
                        dim.attr("upper").unwrap_or("0")
                    )
                })
                .collect();
            format!("ARRAY[{}] OF {}", dimensions.join(", "), base(inner))
        }
        "pointer" => format!("POINTER TO {}", base(inner)),
        "enum" | "struct" | "union" => tag.to_ascii_uppercase(),
        "subrangeSigned" | "subrangeUnsigned" => match inner.child("range") {
            Some(range) => format!(
                "{}({}..{})",
                base(inner),
                range.attr("lower").unwrap_or("0"),
                range.attr("upper").unwrap_or("0")
            ),
            None => base(inner),
        },
        elementary => elementary.to_string(),
    };

    (!rendered.is_empty()).then_some(rendered)
}

/// Initial value from `initialValue/simpleValue@value`, its text, or the
/// text of `initialValue` itself.
fn initial_value(node: Node<'_, '_>) -> Option<String> {
    let initial = node.child("initialValue")?;
    if let Some(simple) = initial.child("simpleValue") {
        if let Some(value) = simple.attr("value") {
            return Some(value.to_string());
        }
        let text = simple.deep_text();
        if !text.is_empty() {
            return Some(text);
        }
    }
    let text = initial.deep_text();
    (!text.is_empty()).then_some(text)
}

/// Collect auxiliary metadata for any node.
///
/// Keys are only present when the node carries the information: `base_type`,
/// `initial_value`, `description`, and for program units `pou_type` and
/// `return_type`.
pub fn extract_details(node: Node<'_, '_>) -> Details {
    let mut details = Details::new();

    if let Some(base_type) = node.child("baseType").and_then(render_type) {
        details.insert("base_type".to_string(), base_type);
    }
    if let Some(value) = initial_value(node) {
        details.insert("initial_value".to_string(), value);
    }
    if let Some(description) = node.child_text("documentation") {
        details.insert("description".to_string(), description);
    }
    if let Some(pou_type) = node.attr("pouType") {
        details.insert("pou_type".to_string(), pou_type.to_string());
    }
    if let Some(return_type) = node
        .child("interface")
        .and_then(|interface| interface.child("returnType"))
        .and_then(render_type)
    {
        details.insert("return_type".to_string(), return_type);
    }

    details
}

/// Extract a function, function block or program, or `None` if unnamed.
///
/// Actions and methods without a name are dropped.
pub fn extract_program_unit(node: Node<'_, '_>) -> Option<ProgramUnitRecord> {
    let name = resolve_name(node)?;
    let kind = ProgramUnitKind::from_pou_type(node.attr("pouType").unwrap_or("unknown"));

    let return_type = node
        .child("interface")
        .and_then(|interface| interface.child("returnType"))
        .and_then(render_type);

    let mut actions = Vec::new();
    let mut methods = Vec::new();
    for nested in node.descendants().skip(1).filter(Node::is_element) {
        let tag = nested.local_name();
        let target = if tag.eq_ignore_ascii_case("action") {
            &mut actions
        } else if tag.eq_ignore_ascii_case("method") {
            &mut methods
        } else {
            continue;
        };
        if let Some(name) = resolve_name(nested) {
            target.push(NestedUnit::new(
                name,
                interface_variables(nested),
                implementation(nested),
            ));
        }
    }

    Some(
        ProgramUnitRecord::new(name, kind)
            .with_return_type(return_type)
            .with_variables(interface_variables(node))
            .with_implementation(implementation(node))
            .with_actions(actions)
            .with_methods(methods)
            .with_details(extract_details(node)),
    )
}

/// Variables declared in a unit's `interface`, grouped by section name.
fn interface_variables(node: Node<'_, '_>) -> Vec<VariableRecord> {
    let Some(interface) = node.child("interface") else {
        return Vec::new();
    };

    let mut variables = Vec::new();
    for section in interface.element_children() {
        if section.local_name() == "variable" {
            if let Some(decl) = extract_variable(section) {
                variables.push(decl.into_record("interface", Origin::Interface));
            }
            continue;
        }
        let group = section.local_name();
        variables.extend(
            section
                .element_children()
                .filter(|child| child.local_name() == "variable")
                .filter_map(extract_variable)
                .map(|decl| decl.into_record(group, Origin::Interface)),
        );
    }
    variables
}

/// Structured Text body from `body/ST` or `implementation/ST`.
fn implementation(node: Node<'_, '_>) -> Option<String> {
    node.child("body")
        .or_else(|| node.child("implementation"))
        .and_then(|body| body.child_text("ST"))
}

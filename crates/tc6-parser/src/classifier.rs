//! Entity classifier.
//!
//! Type definition nodes carry no discriminator, so their kind is decided
//! from structural evidence. The rules are evaluated in a fixed order and the
//! first match wins:
//!
//! 1. No resolvable name: the node is rejected.
//! 2. A value list (`values`, `enumValue` or `enum`): [`TypeKind::Enum`].
//! 3. One or more member `variable` nodes: [`TypeKind::Structure`].
//! 4. Anything else: [`TypeKind::Basic`].
//!
//! Unions are never inferred here. They are classified by
//! [`Classifier::classify_union`] for containers found in the union
//! auxiliary-data block.

use roxmltree::{Node, NodeId};

use tc6_core::{
    kind::{Origin, TypeKind},
    record::{
        CompositeRecord, DataTypeRecord, EnumRecord, EnumValue, TypeDefinition, UnionRecord,
        VariableRecord,
    },
};

use crate::{
    document::NodeExt,
    error::{Diagnostic, ErrorCode},
    events::Rejection,
    fields::{extract_details, extract_variable, render_type, resolve_name},
    query::{PathList, find_all, find_first},
};

/// Base type of an enumeration that does not declare one.
pub const DEFAULT_ENUM_BASE: &str = "INT";

/// Classifies type definition nodes into [`TypeDefinition`]s.
#[derive(Debug, Clone)]
pub struct Classifier {
    value_lists: PathList,
    values: PathList,
    members: PathList,
}

impl Classifier {
    pub fn new() -> Result<Self, Diagnostic> {
        Ok(Self {
            value_lists: PathList::compile(&[".//values", ".//enumValue", ".//enum"])?,
            values: PathList::compile(&[".//values//value", ".//enumValue", ".//enum//value"])?,
            members: PathList::compile(&[".//variable"])?,
        })
    }

    /// Classify a type definition node.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] with [`ErrorCode::W100`] when the node has no
    /// resolvable name. No other condition rejects a node.
    pub fn classify(&self, node: Node<'_, '_>) -> Result<TypeDefinition, Rejection> {
        let Some(name) = resolve_name(node) else {
            return Err(Rejection::new(
                ErrorCode::W100,
                "type definition has no resolvable name",
                node.span(),
            ));
        };
        let details = extract_details(node);

        if find_first(node, &self.value_lists).is_some() {
            let values = self.enum_values(node);
            let base_type = enum_base_type(node);
            return Ok(TypeDefinition::Enum(EnumRecord::new(
                name, base_type, values, details,
            )));
        }

        let members = self.members(node, &name);
        if !members.is_empty() {
            return Ok(TypeDefinition::Structure(CompositeRecord::structure(
                name, members, details,
            )));
        }

        Ok(TypeDefinition::Basic(DataTypeRecord::new(
            name,
            TypeKind::Basic,
            details,
        )))
    }

    /// Classify a union container found inside `block`.
    ///
    /// The name is taken from the container itself, or else from the nearest
    /// named element between the container and the block.
    pub fn classify_union(
        &self,
        container: Node<'_, '_>,
        block: Node<'_, '_>,
    ) -> Result<UnionRecord, Rejection> {
        let Some(name) = union_name(container, block.id()) else {
            return Err(Rejection::new(
                ErrorCode::W103,
                "union container has no resolvable name",
                container.span(),
            )
            .with_context(block.span()));
        };

        let members = self.members(container, &name);
        Ok(CompositeRecord::union(name, members, extract_details(container)))
    }

    /// Enumeration values in discovery order.
    fn enum_values(&self, node: Node<'_, '_>) -> Vec<EnumValue> {
        find_all(node, &self.values)
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                EnumValue::new(
                    resolve_name(value).unwrap_or_else(|| EnumValue::placeholder_name(index)),
                    value.attr("value").unwrap_or_default(),
                    extract_details(value),
                )
            })
            .collect()
    }

    /// Member variables; nodes without a record are skipped.
    fn members(&self, node: Node<'_, '_>, owner: &str) -> Vec<VariableRecord> {
        find_all(node, &self.members)
            .into_iter()
            .filter_map(extract_variable)
            .map(|decl| decl.into_record(owner, Origin::Member))
            .collect()
    }
}

/// Base type from `baseType/name`, an elementary `baseType` child, or the
/// `baseType` of a nested `enum`, defaulting to [`DEFAULT_ENUM_BASE`].
fn enum_base_type(node: Node<'_, '_>) -> String {
    let Some(base) = node.child("baseType") else {
        return DEFAULT_ENUM_BASE.to_string();
    };

    if let Some(name) = base.child_text("name") {
        return name;
    }
    match base.element_children().next() {
        Some(inner) if inner.local_name() == "enum" => inner
            .child("baseType")
            .and_then(render_type)
            .unwrap_or_else(|| DEFAULT_ENUM_BASE.to_string()),
        Some(inner) if inner.local_name() == "values" => DEFAULT_ENUM_BASE.to_string(),
        Some(_) => render_type(base).unwrap_or_else(|| DEFAULT_ENUM_BASE.to_string()),
        None => DEFAULT_ENUM_BASE.to_string(),
    }
}

fn union_name(container: Node<'_, '_>, block: NodeId) -> Option<String> {
    resolve_name(container).or_else(|| {
        container
            .ancestors()
            .skip(1)
            .take_while(|ancestor| ancestor.id() != block)
            .filter(|ancestor| !matches!(ancestor.local_name(), "data" | "addData"))
            .find_map(resolve_name)
    })
}

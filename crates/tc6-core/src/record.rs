//! Record types produced by extraction.
//!
//! Records are plain immutable values. They are built once by the extraction
//! pipeline and never updated afterwards; all fields are exposed through
//! accessors.

use indexmap::IndexMap;
use serde::Serialize;

use crate::kind::{Origin, TypeKind};

/// Auxiliary key/value metadata attached verbatim to a record.
///
/// Insertion order is preserved so that serialized output is deterministic.
pub type Details = IndexMap<String, String>;

/// A named item that can be stored in a [`NamedCollection`](crate::collection::NamedCollection).
pub trait Named {
    /// The identity key of the record.
    fn name(&self) -> &str;
}

/// A variable declaration with the group and strategy that discovered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableRecord {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    default: Option<String>,
    comment: Option<String>,
    group_name: String,
    origin: Origin,
}

impl VariableRecord {
    /// Creates a new variable record.
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: Option<String>,
        comment: Option<String>,
        group_name: impl Into<String>,
        origin: Origin,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default,
            comment,
            group_name: group_name.into(),
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type, rendered in IEC 61131-3 notation.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Name of the variable collection this record came from.
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }
}

/// Fields shared by every type definition record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataTypeRecord {
    name: String,
    kind: TypeKind,
    details: Details,
}

impl DataTypeRecord {
    pub fn new(name: impl Into<String>, kind: TypeKind, details: Details) -> Self {
        Self {
            name: name.into(),
            kind,
            details,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn details(&self) -> &Details {
        &self.details
    }
}

impl Named for DataTypeRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A single value of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    name: String,
    literal_value: String,
    details: Details,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, literal_value: impl Into<String>, details: Details) -> Self {
        Self {
            name: name.into(),
            literal_value: literal_value.into(),
            details,
        }
    }

    /// Placeholder name for a value that has no resolvable name.
    ///
    /// The name depends only on the position of the value in discovery order.
    pub fn placeholder_name(index: usize) -> String {
        format!("Value_{index}")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw `value` attribute, empty when absent.
    pub fn literal_value(&self) -> &str {
        &self.literal_value
    }

    pub fn details(&self) -> &Details {
        &self.details
    }
}

/// An enumeration type with its ordered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumRecord {
    #[serde(flatten)]
    header: DataTypeRecord,
    base_type: String,
    values: Vec<EnumValue>,
}

impl EnumRecord {
    pub fn new(
        name: impl Into<String>,
        base_type: impl Into<String>,
        values: Vec<EnumValue>,
        details: Details,
    ) -> Self {
        Self {
            header: DataTypeRecord::new(name, TypeKind::Enum, details),
            base_type: base_type.into(),
            values,
        }
    }

    pub fn header(&self) -> &DataTypeRecord {
        &self.header
    }

    pub fn base_type(&self) -> &str {
        &self.base_type
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }
}

impl Named for EnumRecord {
    fn name(&self) -> &str {
        self.header.name()
    }
}

/// A type whose members are [`VariableRecord`]s.
///
/// Structures and unions share this layout; the header's kind tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeRecord {
    #[serde(flatten)]
    header: DataTypeRecord,
    members: Vec<VariableRecord>,
}

impl CompositeRecord {
    fn new(
        name: impl Into<String>,
        kind: TypeKind,
        members: Vec<VariableRecord>,
        details: Details,
    ) -> Self {
        Self {
            header: DataTypeRecord::new(name, kind, details),
            members,
        }
    }

    /// Creates a structure record.
    pub fn structure(
        name: impl Into<String>,
        members: Vec<VariableRecord>,
        details: Details,
    ) -> StructureRecord {
        Self::new(name, TypeKind::Structure, members, details)
    }

    /// Creates a union record.
    pub fn union(name: impl Into<String>, members: Vec<VariableRecord>, details: Details) -> UnionRecord {
        Self::new(name, TypeKind::Union, members, details)
    }

    pub fn header(&self) -> &DataTypeRecord {
        &self.header
    }

    pub fn members(&self) -> &[VariableRecord] {
        &self.members
    }
}

impl Named for CompositeRecord {
    fn name(&self) -> &str {
        self.header.name()
    }
}

pub type StructureRecord = CompositeRecord;
pub type UnionRecord = CompositeRecord;

/// The outcome of classifying one type definition node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDefinition {
    Enum(EnumRecord),
    Union(UnionRecord),
    Structure(StructureRecord),
    Basic(DataTypeRecord),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        self.header().name()
    }

    pub fn kind(&self) -> TypeKind {
        self.header().kind()
    }

    pub fn header(&self) -> &DataTypeRecord {
        match self {
            Self::Enum(record) => record.header(),
            Self::Union(record) | Self::Structure(record) => record.header(),
            Self::Basic(record) => record,
        }
    }
}

/// The declared kind of a program unit (`pouType`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramUnitKind {
    Function,
    FunctionBlock,
    Program,
    /// Any other or missing `pouType`, kept verbatim.
    Other(String),
}

impl ProgramUnitKind {
    /// Maps a `pouType` attribute value, ignoring ASCII case.
    pub fn from_pou_type(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "function" => Self::Function,
            "functionblock" | "function_block" => Self::FunctionBlock,
            "program" => Self::Program,
            _ => Self::Other(value.to_string()),
        }
    }
}

/// An action or method declared inside a program unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedUnit {
    name: String,
    variables: Vec<VariableRecord>,
    implementation: Option<String>,
}

impl NestedUnit {
    pub fn new(
        name: impl Into<String>,
        variables: Vec<VariableRecord>,
        implementation: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            variables,
            implementation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[VariableRecord] {
        &self.variables
    }

    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }
}

/// A function, function block or program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramUnitRecord {
    name: String,
    kind: ProgramUnitKind,
    return_type: Option<String>,
    variables: Vec<VariableRecord>,
    implementation: Option<String>,
    actions: Vec<NestedUnit>,
    methods: Vec<NestedUnit>,
    details: Details,
}

impl ProgramUnitRecord {
    pub fn new(name: impl Into<String>, kind: ProgramUnitKind) -> Self {
        Self {
            name: name.into(),
            kind,
            return_type: None,
            variables: Vec::new(),
            implementation: None,
            actions: Vec::new(),
            methods: Vec::new(),
            details: Details::new(),
        }
    }

    pub fn with_return_type(mut self, return_type: Option<String>) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_variables(mut self, variables: Vec<VariableRecord>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_implementation(mut self, implementation: Option<String>) -> Self {
        self.implementation = implementation;
        self
    }

    pub fn with_actions(mut self, actions: Vec<NestedUnit>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_methods(mut self, methods: Vec<NestedUnit>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ProgramUnitKind {
        &self.kind
    }

    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    pub fn variables(&self) -> &[VariableRecord] {
        &self.variables
    }

    pub fn implementation(&self) -> Option<&str> {
        self.implementation.as_deref()
    }

    pub fn actions(&self) -> &[NestedUnit] {
        &self.actions
    }

    pub fn methods(&self) -> &[NestedUnit] {
        &self.methods
    }

    pub fn details(&self) -> &Details {
        &self.details
    }
}

impl Named for ProgramUnitRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_name() {
        assert_eq!(EnumValue::placeholder_name(0), "Value_0");
        assert_eq!(EnumValue::placeholder_name(12), "Value_12");
    }

    #[test]
    fn test_program_unit_kind_from_pou_type() {
        assert_eq!(ProgramUnitKind::from_pou_type("program"), ProgramUnitKind::Program);
        assert_eq!(
            ProgramUnitKind::from_pou_type("functionBlock"),
            ProgramUnitKind::FunctionBlock
        );
        assert_eq!(ProgramUnitKind::from_pou_type("FUNCTION"), ProgramUnitKind::Function);
        assert_eq!(
            ProgramUnitKind::from_pou_type("interface"),
            ProgramUnitKind::Other("interface".to_string())
        );
    }

    #[test]
    fn test_type_definition_header() {
        let structure = TypeDefinition::Structure(CompositeRecord::structure(
            "ST_Motor",
            Vec::new(),
            Details::new(),
        ));
        assert_eq!(structure.name(), "ST_Motor");
        assert_eq!(structure.kind(), TypeKind::Structure);

        let union = TypeDefinition::Union(CompositeRecord::union("U_Word", Vec::new(), Details::new()));
        assert_eq!(union.kind(), TypeKind::Union);
    }
}

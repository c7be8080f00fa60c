//! The canonical model and its builder.
//!
//! A [`CanonicalModel`] is assembled once by a [`ModelBuilder`] during a
//! single extraction pass and is read-only afterwards.

use std::{collections::HashMap, fmt};

use serde::Serialize;

use crate::{
    collection::{Insertion, NamedCollection},
    kind::{Collection, TypeKind},
    record::{
        DataTypeRecord, EnumRecord, ProgramUnitRecord, StructureRecord, TypeDefinition,
        UnionRecord, VariableRecord,
    },
};

/// How the exporting tool shaped the document, judged from its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportKind {
    Project,
    Library,
    Application,
    /// Any other root that still carries resource nodes.
    ResourceBased,
    #[default]
    Unknown,
}

impl ExportKind {
    /// Derives the export kind from the local name of the root element.
    pub fn from_root(root_name: &str, has_resource: bool) -> Self {
        match root_name {
            "project" => Self::Project,
            "library" => Self::Library,
            "application" => Self::Application,
            _ if has_resource => Self::ResourceBased,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Project => "project",
            Self::Library => "library",
            Self::Application => "application",
            Self::ResourceBased => "resource-based",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Document-level information about the export.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProjectInfo {
    export_kind: ExportKind,
    configuration: Option<String>,
    resource: Option<String>,
}

impl ProjectInfo {
    pub fn new(
        export_kind: ExportKind,
        configuration: Option<String>,
        resource: Option<String>,
    ) -> Self {
        Self {
            export_kind,
            configuration,
            resource,
        }
    }

    pub fn export_kind(&self) -> ExportKind {
        self.export_kind
    }

    /// Name of the first configuration node, usually the PLC name.
    pub fn configuration(&self) -> Option<&str> {
        self.configuration.as_deref()
    }

    /// Name of the first resource node, usually the application name.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }
}

/// Per-collection record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub total_items: usize,
    pub data_types: usize,
    pub program_units: usize,
    pub global_variables: usize,
    pub enums: usize,
    pub unions: usize,
    pub structures: usize,
    pub actions: usize,
    pub methods: usize,
}

impl Summary {
    /// Returns the count for one collection.
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::DataTypes => self.data_types,
            Collection::ProgramUnits => self.program_units,
            Collection::GlobalVariables => self.global_variables,
            Collection::Enums => self.enums,
            Collection::Unions => self.unions,
            Collection::Structures => self.structures,
        }
    }
}

/// The deduplicated result of one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CanonicalModel {
    project: ProjectInfo,
    data_types: NamedCollection<DataTypeRecord>,
    program_units: NamedCollection<ProgramUnitRecord>,
    global_variables: Vec<VariableRecord>,
    enums: NamedCollection<EnumRecord>,
    unions: NamedCollection<UnionRecord>,
    structures: NamedCollection<StructureRecord>,
}

impl CanonicalModel {
    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    /// Opaque types that are neither enums, unions nor structures.
    pub fn data_types(&self) -> &NamedCollection<DataTypeRecord> {
        &self.data_types
    }

    pub fn program_units(&self) -> &NamedCollection<ProgramUnitRecord> {
        &self.program_units
    }

    /// Global variables in discovery order. Names may repeat across groups.
    pub fn global_variables(&self) -> &[VariableRecord] {
        &self.global_variables
    }

    pub fn enums(&self) -> &NamedCollection<EnumRecord> {
        &self.enums
    }

    pub fn unions(&self) -> &NamedCollection<UnionRecord> {
        &self.unions
    }

    pub fn structures(&self) -> &NamedCollection<StructureRecord> {
        &self.structures
    }

    /// Returns the kind of the type definition stored under `name`, if any.
    pub fn resolve_type(&self, name: &str) -> Option<TypeKind> {
        if self.enums.contains(name) {
            Some(TypeKind::Enum)
        } else if self.structures.contains(name) {
            Some(TypeKind::Structure)
        } else if self.unions.contains(name) {
            Some(TypeKind::Union)
        } else if self.data_types.contains(name) {
            Some(TypeKind::Basic)
        } else {
            None
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            data_types: self.data_types.len(),
            program_units: self.program_units.len(),
            global_variables: self.global_variables.len(),
            enums: self.enums.len(),
            unions: self.unions.len(),
            structures: self.structures.len(),
            actions: self.program_units.iter().map(|unit| unit.actions().len()).sum(),
            methods: self.program_units.iter().map(|unit| unit.methods().len()).sum(),
            total_items: 0,
        };
        summary.total_items = Collection::ALL
            .iter()
            .map(|&collection| summary.count(collection))
            .sum();
        summary
    }
}

/// Incrementally assembles a [`CanonicalModel`].
///
/// Type definitions share a single namespace: once a name has been stored in
/// any of the type collections, later definitions with that name are dropped
/// whatever their kind.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: CanonicalModel,
    claimed: HashMap<String, TypeKind>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_project(&mut self, project: ProjectInfo) {
        self.model.project = project;
    }

    /// Returns the kind already stored under `name`, if any.
    pub fn claimed_kind(&self, name: &str) -> Option<TypeKind> {
        self.claimed.get(name).copied()
    }

    /// Stores a classified type definition unless its name is taken.
    pub fn insert_type(&mut self, definition: TypeDefinition) -> Insertion {
        if self.claimed.contains_key(definition.name()) {
            return Insertion::Duplicate;
        }
        let name = definition.name().to_string();
        let kind = definition.kind();
        let outcome = match definition {
            TypeDefinition::Enum(record) => self.model.enums.insert_if_absent(record),
            TypeDefinition::Union(record) => self.model.unions.insert_if_absent(record),
            TypeDefinition::Structure(record) => self.model.structures.insert_if_absent(record),
            TypeDefinition::Basic(record) => self.model.data_types.insert_if_absent(record),
        };
        if outcome == Insertion::Inserted {
            self.claimed.insert(name, kind);
        }
        outcome
    }

    pub fn insert_program_unit(&mut self, record: ProgramUnitRecord) -> Insertion {
        self.model.program_units.insert_if_absent(record)
    }

    pub fn push_global_variable(&mut self, record: VariableRecord) {
        self.model.global_variables.push(record);
    }

    /// Current number of records in `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::DataTypes => self.model.data_types.len(),
            Collection::ProgramUnits => self.model.program_units.len(),
            Collection::GlobalVariables => self.model.global_variables.len(),
            Collection::Enums => self.model.enums.len(),
            Collection::Unions => self.model.unions.len(),
            Collection::Structures => self.model.structures.len(),
        }
    }

    pub fn build(self) -> CanonicalModel {
        self.model
    }
}

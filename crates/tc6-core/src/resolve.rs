//! Type reference resolution.
//!
//! Every variable in the model declares a type by name, possibly wrapped in
//! `ARRAY[..] OF` or `POINTER TO`. Resolution strips that notation, looks the
//! remaining name up in the model's type collections and reports which kind
//! of definition it refers to. Composite types that reach themselves through
//! their members are reported as circular references.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    kind::{Origin, TypeKind},
    model::CanonicalModel,
    record::VariableRecord,
};

const ARRAY_PREFIX: &str = "ARRAY[";
const ARRAY_OF: &str = "] OF ";
const POINTER_PREFIX: &str = "POINTER TO ";

/// The type name a declaration refers to once array and pointer notation
/// is removed.
///
/// ```
/// use tc6_core::resolve::referenced_name;
///
/// assert_eq!(referenced_name("ARRAY[0..3] OF POINTER TO ST_Axis"), "ST_Axis");
/// assert_eq!(referenced_name("INT"), "INT");
/// ```
pub fn referenced_name(type_name: &str) -> &str {
    let mut current = type_name.trim();
    loop {
        if let Some(rest) = current.strip_prefix(POINTER_PREFIX) {
            current = rest.trim_start();
        } else if current.starts_with(ARRAY_PREFIX) {
            match current.find(ARRAY_OF) {
                Some(idx) => current = current[idx + ARRAY_OF.len()..].trim_start(),
                None => return current,
            }
        } else {
            return current;
        }
    }
}

/// Where the resolved variable is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceScope {
    /// A member of a structure or union; the owner is the composite type.
    Member,
    /// A global variable; the owner is its group.
    Global,
    /// A program unit interface variable; the owner is the unit, or
    /// `unit.action` / `unit.method` for nested units.
    Interface,
}

impl From<Origin> for ReferenceScope {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Member => Self::Member,
            Origin::Interface => Self::Interface,
            Origin::Strategy(_) => Self::Global,
        }
    }
}

/// One variable's declared type and what it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReference {
    scope: ReferenceScope,
    owner: String,
    variable: String,
    declared_type: String,
    target: String,
    /// `None` for elementary and unknown types.
    kind: Option<TypeKind>,
}

impl TypeReference {
    pub fn scope(&self) -> ReferenceScope {
        self.scope
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The type as declared, including array and pointer notation.
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// The referenced type name.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> Option<TypeKind> {
        self.kind
    }
}

/// A chain of composite types leading back to its first element.
///
/// The first and last names are equal; a structure holding itself is
/// `["ST_Node", "ST_Node"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CircularReference {
    cycle: Vec<String>,
}

impl CircularReference {
    pub fn cycle(&self) -> &[String] {
        &self.cycle
    }
}

/// Result of [`CanonicalModel::resolve_references`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TypeResolution {
    #[serde(rename = "type_references")]
    references: Vec<TypeReference>,
    #[serde(rename = "circular_references")]
    cycles: Vec<CircularReference>,
}

impl TypeResolution {
    /// References in model order: structure members, union members, globals,
    /// then program unit interfaces.
    pub fn references(&self) -> &[TypeReference] {
        &self.references
    }

    pub fn cycles(&self) -> &[CircularReference] {
        &self.cycles
    }

    /// The reference for `variable` declared under `owner`, if any.
    pub fn find(&self, owner: &str, variable: &str) -> Option<&TypeReference> {
        self.references
            .iter()
            .find(|reference| reference.owner == owner && reference.variable == variable)
    }
}

impl CanonicalModel {
    /// Resolve every declared variable type against the model's type
    /// collections and detect circular composite types.
    pub fn resolve_references(&self) -> TypeResolution {
        let mut references = Vec::new();
        let mut push = |owner: &str, variable: &VariableRecord| {
            let target = referenced_name(variable.type_name());
            references.push(TypeReference {
                scope: variable.origin().into(),
                owner: owner.to_string(),
                variable: variable.name().to_string(),
                declared_type: variable.type_name().to_string(),
                target: target.to_string(),
                kind: self.resolve_type(target),
            });
        };

        for structure in self.structures().iter() {
            for member in structure.members() {
                push(structure.header().name(), member);
            }
        }
        for union in self.unions().iter() {
            for member in union.members() {
                push(union.header().name(), member);
            }
        }
        for variable in self.global_variables() {
            push(variable.group_name(), variable);
        }
        for unit in self.program_units().iter() {
            for variable in unit.variables() {
                push(unit.name(), variable);
            }
            for nested in unit.actions().iter().chain(unit.methods()) {
                let owner = format!("{}.{}", unit.name(), nested.name());
                for variable in nested.variables() {
                    push(&owner, variable);
                }
            }
        }

        let cycles = CycleFinder::new(self).run();
        TypeResolution { references, cycles }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Depth-first search over composite types linked through their members.
struct CycleFinder<'a> {
    edges: IndexMap<&'a str, Vec<&'a str>>,
    state: HashMap<&'a str, Visit>,
    stack: Vec<&'a str>,
    cycles: Vec<CircularReference>,
}

impl<'a> CycleFinder<'a> {
    fn new(model: &'a CanonicalModel) -> Self {
        let composites = model
            .structures()
            .iter()
            .chain(model.unions().iter())
            .map(|composite| {
                let mut targets: Vec<&str> = Vec::new();
                for member in composite.members() {
                    let target = referenced_name(member.type_name());
                    let is_composite = matches!(
                        model.resolve_type(target),
                        Some(TypeKind::Structure | TypeKind::Union)
                    );
                    if is_composite && !targets.contains(&target) {
                        targets.push(target);
                    }
                }
                (composite.header().name(), targets)
            })
            .collect();

        Self {
            edges: composites,
            state: HashMap::new(),
            stack: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<CircularReference> {
        let roots: Vec<&'a str> = self.edges.keys().copied().collect();
        for root in roots {
            if !self.state.contains_key(root) {
                self.visit(root);
            }
        }
        self.cycles
    }

    fn visit(&mut self, name: &'a str) {
        self.state.insert(name, Visit::InProgress);
        self.stack.push(name);

        let targets = self.edges.get(name).cloned().unwrap_or_default();
        for target in targets {
            match self.state.get(target) {
                Some(Visit::InProgress) => {
                    let start = self
                        .stack
                        .iter()
                        .position(|entry| *entry == target)
                        .unwrap_or_default();
                    let mut cycle: Vec<String> =
                        self.stack[start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(target.to_string());
                    self.cycles.push(CircularReference { cycle });
                }
                Some(Visit::Done) => {}
                None => self.visit(target),
            }
        }

        self.stack.pop();
        self.state.insert(name, Visit::Done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        kind::Strategy,
        model::ModelBuilder,
        record::{CompositeRecord, DataTypeRecord, Details, ProgramUnitKind, ProgramUnitRecord, TypeDefinition},
    };

    fn member(owner: &str, name: &str, type_name: &str) -> VariableRecord {
        VariableRecord::new(name, type_name, None, None, owner, Origin::Member)
    }

    fn structure(name: &str, members: &[(&str, &str)]) -> TypeDefinition {
        TypeDefinition::Structure(CompositeRecord::structure(
            name,
            members.iter().map(|(m, t)| member(name, m, t)).collect(),
            Details::new(),
        ))
    }

    #[test]
    fn test_referenced_name_strips_notation() {
        assert_eq!(referenced_name("ARRAY[0..9, 1..2] OF ST_Axis"), "ST_Axis");
        assert_eq!(referenced_name("POINTER TO BYTE"), "BYTE");
        assert_eq!(referenced_name("ARRAY[1..3] OF ARRAY[0..1] OF E_Mode"), "E_Mode");
        assert_eq!(referenced_name("STRING(80)"), "STRING(80)");
        assert_eq!(referenced_name("ARRAY[broken"), "ARRAY[broken");
    }

    #[test]
    fn test_references_resolve_through_arrays_and_pointers() {
        let mut builder = ModelBuilder::new();
        builder.insert_type(structure("ST_Axis", &[("Position", "LREAL")]));
        builder.insert_type(structure(
            "ST_Machine",
            &[("Axes", "ARRAY[0..3] OF ST_Axis"), ("Mode", "POINTER TO T_Mode")],
        ));
        builder.insert_type(TypeDefinition::Basic(DataTypeRecord::new(
            "T_Mode",
            TypeKind::Basic,
            Details::new(),
        )));
        builder.push_global_variable(VariableRecord::new(
            "Machine",
            "ST_Machine",
            None,
            None,
            "GVL",
            Origin::Strategy(Strategy::NamespacedBlock),
        ));
        builder.insert_program_unit(
            ProgramUnitRecord::new("PLC_PRG", ProgramUnitKind::Program).with_variables(vec![
                VariableRecord::new("Missing", "ST_Gone", None, None, "localVars", Origin::Interface),
            ]),
        );

        let resolution = builder.build().resolve_references();

        let axes = resolution.find("ST_Machine", "Axes").unwrap();
        assert_eq!(axes.target(), "ST_Axis");
        assert_eq!(axes.kind(), Some(TypeKind::Structure));
        assert_eq!(axes.scope(), ReferenceScope::Member);

        let mode = resolution.find("ST_Machine", "Mode").unwrap();
        assert_eq!(mode.kind(), Some(TypeKind::Basic));

        let position = resolution.find("ST_Axis", "Position").unwrap();
        assert_eq!(position.kind(), None);

        let global = resolution.find("GVL", "Machine").unwrap();
        assert_eq!(global.scope(), ReferenceScope::Global);
        assert_eq!(global.kind(), Some(TypeKind::Structure));

        let missing = resolution.find("PLC_PRG", "Missing").unwrap();
        assert_eq!(missing.scope(), ReferenceScope::Interface);
        assert_eq!(missing.kind(), None);

        assert!(resolution.cycles().is_empty());
    }

    #[test]
    fn test_self_referencing_structure() {
        let mut builder = ModelBuilder::new();
        builder.insert_type(structure(
            "ST_Node",
            &[("Value", "INT"), ("Next", "POINTER TO ST_Node")],
        ));

        let resolution = builder.build().resolve_references();
        let cycles: Vec<Vec<&str>> = resolution
            .cycles()
            .iter()
            .map(|c| c.cycle().iter().map(String::as_str).collect())
            .collect();
        assert_eq!(cycles, vec![vec!["ST_Node", "ST_Node"]]);
    }

    #[test]
    fn test_cycle_through_union() {
        let mut builder = ModelBuilder::new();
        builder.insert_type(TypeDefinition::Union(CompositeRecord::union(
            "U_Payload",
            vec![member("U_Payload", "Frame", "ARRAY[0..1] OF ST_Frame")],
            Details::new(),
        )));
        builder.insert_type(structure("ST_Frame", &[("Payload", "U_Payload")]));
        builder.insert_type(structure("ST_Leaf", &[("Frame", "ST_Frame")]));

        let resolution = builder.build().resolve_references();
        let cycles: Vec<Vec<&str>> = resolution
            .cycles()
            .iter()
            .map(|c| c.cycle().iter().map(String::as_str).collect())
            .collect();
        assert_eq!(cycles, vec![vec!["ST_Frame", "U_Payload", "ST_Frame"]]);
    }
}

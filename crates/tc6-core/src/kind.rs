//! Small enumerations shared by the model and the extraction pipeline.

use std::fmt;

use serde::Serialize;

/// The variant a type definition is classified into.
///
/// Every named type definition ends up as exactly one of these kinds, and
/// each kind is stored in its own collection of the
/// [`CanonicalModel`](crate::model::CanonicalModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Enum,
    Union,
    Structure,
    /// Opaque type: an alias, subrange or anything without values or members.
    Basic,
}

impl TypeKind {
    /// Returns the collection that stores records of this kind.
    pub fn collection(self) -> Collection {
        match self {
            Self::Enum => Collection::Enums,
            Self::Union => Collection::Unions,
            Self::Structure => Collection::Structures,
            Self::Basic => Collection::DataTypes,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum => write!(f, "enum"),
            Self::Union => write!(f, "union"),
            Self::Structure => write!(f, "structure"),
            Self::Basic => write!(f, "basic"),
        }
    }
}

/// The named collections of the canonical model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    DataTypes,
    ProgramUnits,
    GlobalVariables,
    Enums,
    Unions,
    Structures,
}

impl Collection {
    /// All collections in output order.
    pub const ALL: [Collection; 6] = [
        Collection::DataTypes,
        Collection::ProgramUnits,
        Collection::GlobalVariables,
        Collection::Enums,
        Collection::Unions,
        Collection::Structures,
    ];
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DataTypes => "data_types",
            Self::ProgramUnits => "program_units",
            Self::GlobalVariables => "global_variables",
            Self::Enums => "enums",
            Self::Unions => "unions",
            Self::Structures => "structures",
        };
        write!(f, "{name}")
    }
}

/// A tier of the fallback search used to locate a section of the document.
///
/// Tiers are ordered from most to least specific; the derived `Ord` follows
/// that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Content nested inside the tool-specific auxiliary-data block.
    NamespacedBlock,
    /// Resource nodes anywhere in the document.
    ResourceScan,
    /// Matching nodes anywhere, with no grouping assumption.
    FlatScan,
}

impl Strategy {
    /// All tiers in evaluation order.
    pub const TIERS: [Strategy; 3] = [
        Strategy::NamespacedBlock,
        Strategy::ResourceScan,
        Strategy::FlatScan,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamespacedBlock => write!(f, "namespaced-block"),
            Self::ResourceScan => write!(f, "resource-scan"),
            Self::FlatScan => write!(f, "flat-scan"),
        }
    }
}

/// Where a [`VariableRecord`](crate::record::VariableRecord) was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case", tag = "source", content = "strategy")]
pub enum Origin {
    /// A global variable found by the given locator tier.
    Strategy(Strategy),
    /// A member of a structure or union.
    Member,
    /// A variable declared in a program unit interface.
    Interface,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strategy(strategy) => write!(f, "{strategy}"),
            Self::Member => write!(f, "member"),
            Self::Interface => write!(f, "interface"),
        }
    }
}

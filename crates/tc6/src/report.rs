//! JSON report rendering.
//!
//! The report is a flat view of a [`CanonicalModel`] plus the name of the
//! file it came from, the resolved type references and per-collection
//! counts. Collections keep their insertion order.

use serde::Serialize;

use tc6_core::{
    collection::NamedCollection,
    model::{CanonicalModel, ProjectInfo, Summary},
    record::{DataTypeRecord, EnumRecord, ProgramUnitRecord, StructureRecord, UnionRecord, VariableRecord},
    resolve::TypeResolution,
};

/// Serializable view of one extraction.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    source_file: Option<&'a str>,
    project: &'a ProjectInfo,
    data_types: &'a NamedCollection<DataTypeRecord>,
    program_units: &'a NamedCollection<ProgramUnitRecord>,
    global_variables: &'a [VariableRecord],
    enums: &'a NamedCollection<EnumRecord>,
    unions: &'a NamedCollection<UnionRecord>,
    structures: &'a NamedCollection<StructureRecord>,
    #[serde(flatten)]
    resolution: &'a TypeResolution,
    summary: Summary,
}

impl<'a> Report<'a> {
    pub fn new(
        model: &'a CanonicalModel,
        resolution: &'a TypeResolution,
        source_file: Option<&'a str>,
    ) -> Self {
        Self {
            source_file,
            project: model.project(),
            data_types: model.data_types(),
            program_units: model.program_units(),
            global_variables: model.global_variables(),
            enums: model.enums(),
            unions: model.unions(),
            structures: model.structures(),
            resolution,
            summary: model.summary(),
        }
    }

    /// Render the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tc6_core::{
        kind::{Origin, Strategy, TypeKind},
        model::ModelBuilder,
        record::{Details, TypeDefinition},
    };

    fn model() -> CanonicalModel {
        let mut builder = ModelBuilder::new();
        builder.insert_type(TypeDefinition::Basic(DataTypeRecord::new(
            "T_Alias",
            TypeKind::Basic,
            Details::new(),
        )));
        builder.push_global_variable(VariableRecord::new(
            "Counter",
            "ARRAY[0..1] OF T_Alias",
            Some("0".to_string()),
            None,
            "GVL",
            Origin::Strategy(Strategy::FlatScan),
        ));
        builder.build()
    }

    #[test]
    fn test_report_shape() {
        let model = model();
        let resolution = model.resolve_references();
        let json = Report::new(&model, &resolution, Some("plant.xml"))
            .to_json(false)
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["source_file"], "plant.xml");
        assert_eq!(value["data_types"][0]["name"], "T_Alias");
        assert_eq!(value["global_variables"][0]["type"], "ARRAY[0..1] OF T_Alias");
        assert_eq!(value["global_variables"][0]["group_name"], "GVL");
        assert_eq!(value["summary"]["total_items"], 2);
        assert!(value["enums"].as_array().unwrap().is_empty());

        let reference = &value["type_references"][0];
        assert_eq!(reference["scope"], "global");
        assert_eq!(reference["owner"], "GVL");
        assert_eq!(reference["target"], "T_Alias");
        assert_eq!(reference["kind"], "basic");
        assert!(value["circular_references"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let model = model();
        let resolution = model.resolve_references();
        let report = Report::new(&model, &resolution, None);

        let pretty = report.to_json(true).unwrap();
        let compact = report.to_json(false).unwrap();
        assert!(pretty.contains('\n'));
        assert!(!compact.contains('\n'));
        assert!(compact.contains(r#""source_file":null"#));
    }
}

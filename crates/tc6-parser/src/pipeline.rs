//! Extraction pipeline.
//!
//! Runs the locator, field extractor and classifier over one document and
//! accumulates the results into a [`CanonicalModel`]. Phases run strictly in
//! this order:
//!
//! 1. Locate application subtrees and extract their program units. Their
//!    data type nodes are queued for phase 4.
//! 2. Fall through the remaining locator tiers when the first yields nothing.
//! 3. Locate global variable groups and extract every variable.
//! 4. Classify unions from the union block, then every other data type node:
//!    queued nodes first, then all remaining ones in document order. A data
//!    type that encloses a union container is consumed by the union; its
//!    siblings in the union block are classified like any other node.
//! 5. Build the model, report per-collection counts and resolve every
//!    declared variable type. Circular composite types are reported as
//!    warnings.
//!
//! Nothing but a malformed document fails extraction. Everything else is
//! recorded as an [`Event`] and skipped.

use std::collections::HashSet;

use log::{debug, info};
use roxmltree::{Document, Node, NodeId};

use tc6_core::{
    collection::Insertion,
    kind::{Collection, Origin, Strategy},
    model::{CanonicalModel, ExportKind, ModelBuilder, ProjectInfo},
    record::TypeDefinition,
    resolve::TypeResolution,
};

use crate::{
    classifier::Classifier,
    document::NodeExt,
    error::{Diagnostic, ErrorCode, ParseError},
    events::{Concern, Event, EventLog, Rejection},
    fields::{extract_program_unit, extract_variable, resolve_name},
    locator::Locator,
    query::{PathList, find_first},
};

/// Default name of the auxiliary-data block holding application content.
pub const DEFAULT_APPLICATION_DATA: &str = "http://www.3s-software.com/plcopenxml/application";

/// Default name of the auxiliary-data block holding union declarations.
pub const DEFAULT_UNION_DATA: &str = "http://www.3s-software.com/plcopenxml/union";

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// `name` of the `data` element wrapping application content.
    pub application_data: String,
    /// `name` of the `data` element wrapping union declarations.
    pub union_data: String,
}

impl ExtractConfig {
    pub fn new(application_data: impl Into<String>, union_data: impl Into<String>) -> Self {
        Self {
            application_data: application_data.into(),
            union_data: union_data.into(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new(DEFAULT_APPLICATION_DATA, DEFAULT_UNION_DATA)
    }
}

/// The model together with every event recorded while building it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub model: CanonicalModel,
    pub resolution: TypeResolution,
    pub events: Vec<Event>,
}

impl Extraction {
    /// Warning diagnostics in event order: rejected nodes, then circular
    /// type references.
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::RecordRejected(rejection) => Some(rejection.to_diagnostic()),
                other => other.circular_reference_diagnostic(),
            })
            .collect()
    }

    pub fn rejections(&self) -> impl Iterator<Item = &Rejection> {
        self.events.iter().filter_map(|event| match event {
            Event::RecordRejected(rejection) => Some(rejection),
            _ => None,
        })
    }
}

/// A compiled, reusable extraction pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    locator: Locator,
    classifier: Classifier,
    configurations: PathList,
}

impl Pipeline {
    /// Compile the pipeline for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::E002`] if a configured block name cannot be used
    /// in a query path.
    pub fn new(config: &ExtractConfig) -> Result<Self, ParseError> {
        Ok(Self {
            locator: Locator::new(&config.application_data, &config.union_data)?,
            classifier: Classifier::new()?,
            configurations: PathList::compile(&[".//configuration"])?,
        })
    }

    /// Extract the canonical model from a loaded document.
    pub fn run(&self, doc: &Document<'_>) -> Extraction {
        let root = doc.root_element();
        let mut run = Run::default();

        run.builder.set_project(self.project_info(root));

        // Phases 1 and 2
        let mut queued = Vec::new();
        if let Some(located) = self.locator.application_sections(root, &mut run.events) {
            for section in located.sections {
                for unit in section.program_units {
                    run.program_unit(unit);
                }
                queued.extend(section.data_types);
            }
        }

        // Phase 3
        if let Some(located) = self.locator.global_variable_groups(root, &mut run.events) {
            let origin = Origin::Strategy(located.strategy);
            for group in located.sections {
                for variable in group.variables {
                    run.global_variable(variable, &group.name, origin);
                }
            }
        }

        // Phase 4
        self.unions(root, &mut run);
        let remaining = self.locator.all_data_types(root);
        for node in queued.into_iter().chain(remaining) {
            if !run.visited.insert(node.id()) {
                continue;
            }
            let outcome = self.classifier.classify(node);
            run.type_definition(outcome);
        }

        // Phase 5
        for collection in Collection::ALL {
            let count = run.builder.count(collection);
            run.events.record(Event::CollectionCount { collection, count });
        }

        let model = run.builder.build();
        let resolution = model.resolve_references();
        for cycle in resolution.cycles() {
            run.events.record(Event::CircularReference {
                cycle: cycle.cycle().to_vec(),
            });
        }

        info!(
            total_items = model.summary().total_items,
            references = resolution.references().len();
            "Extraction completed"
        );
        Extraction {
            model,
            resolution,
            events: run.events.into_events(),
        }
    }

    /// Union pre-pass. Marks every consumed container, and the data type
    /// enclosing it, as visited.
    fn unions(&self, root: Node<'_, '_>, run: &mut Run) {
        let blocks = self.locator.union_blocks(root);
        let strategy = Strategy::NamespacedBlock;
        run.events.record(Event::StrategyAttempted {
            concern: Concern::Unions,
            strategy,
        });

        let mut containers = Vec::new();
        for block in &blocks {
            containers.extend(
                self.locator
                    .union_containers(*block)
                    .into_iter()
                    .map(|container| (container, *block)),
            );
        }

        if containers.is_empty() {
            run.events.record(Event::SectionNotFound {
                concern: Concern::Unions,
                strategy,
            });
        } else {
            run.events.record(Event::SectionLocated {
                concern: Concern::Unions,
                strategy,
                sections: blocks.len(),
            });
        }

        for (container, block) in containers {
            if !run.visited.insert(container.id()) {
                continue;
            }
            if let Some(owner) = enclosing_data_type(container, block) {
                run.visited.insert(owner.id());
            }
            let outcome = self
                .classifier
                .classify_union(container, block)
                .map(TypeDefinition::Union);
            run.type_definition(outcome);
        }
    }

    fn project_info(&self, root: Node<'_, '_>) -> ProjectInfo {
        let resource = self.locator.first_resource(root);
        let export_kind = ExportKind::from_root(root.local_name(), resource.is_some());
        let configuration = find_first(root, &self.configurations).and_then(resolve_name);

        debug!(export_kind:% = export_kind; "Export kind detected");
        ProjectInfo::new(export_kind, configuration, resource.and_then(resolve_name))
    }
}

/// Mutable state of a single pipeline run.
#[derive(Default)]
struct Run {
    builder: ModelBuilder,
    events: EventLog,
    visited: HashSet<NodeId>,
}

impl Run {
    fn program_unit(&mut self, node: Node<'_, '_>) {
        if !self.visited.insert(node.id()) {
            return;
        }
        let Some(record) = extract_program_unit(node) else {
            self.events.record(Event::RecordRejected(Rejection::new(
                ErrorCode::W102,
                "program unit has no resolvable name",
                node.span(),
            )));
            return;
        };

        let name = record.name().to_string();
        let collection = Collection::ProgramUnits;
        let event = match self.builder.insert_program_unit(record) {
            Insertion::Inserted => Event::RecordAccepted { collection, name },
            Insertion::Duplicate => Event::DuplicateIgnored { collection, name },
        };
        self.events.record(event);
    }

    fn global_variable(&mut self, node: Node<'_, '_>, group: &str, origin: Origin) {
        let Some(decl) = extract_variable(node) else {
            self.events.record(Event::RecordRejected(Rejection::new(
                ErrorCode::W101,
                format!("variable in group `{group}` has no resolvable name"),
                node.span(),
            )));
            return;
        };

        let name = decl.name.clone();
        self.builder.push_global_variable(decl.into_record(group, origin));
        self.events.record(Event::RecordAccepted {
            collection: Collection::GlobalVariables,
            name,
        });
    }

    fn type_definition(&mut self, outcome: Result<TypeDefinition, Rejection>) {
        let definition = match outcome {
            Ok(definition) => definition,
            Err(rejection) => {
                self.events.record(Event::RecordRejected(rejection));
                return;
            }
        };

        let name = definition.name().to_string();
        let kind = definition.kind();
        let collection = kind.collection();
        let event = match self.builder.insert_type(definition) {
            Insertion::Inserted => Event::RecordAccepted { collection, name },
            Insertion::Duplicate => {
                let existing = self.builder.claimed_kind(&name);
                if existing.is_some_and(|existing| existing != kind) {
                    debug!(name = name.as_str(), kind:% = kind, existing:? = existing; "Name already claimed by another kind");
                }
                Event::DuplicateIgnored { collection, name }
            }
        };
        self.events.record(event);
    }
}

/// Nearest `dataType` strictly between `container` and `block`.
fn enclosing_data_type<'a, 'input>(
    container: Node<'a, 'input>,
    block: Node<'a, 'input>,
) -> Option<Node<'a, 'input>> {
    container
        .ancestors()
        .skip(1)
        .take_while(|ancestor| ancestor.id() != block.id())
        .find(|ancestor| ancestor.local_name() == "dataType")
}

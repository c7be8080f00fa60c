//! Structure locator.
//!
//! Content positions differ between exporting tools. Each concern is located
//! by a cascade of [`Strategy`] tiers, tried from most to least specific. The
//! first tier that yields anything is final; later tiers are never consulted.
//!
//! Tiers are pure functions of the document and can be evaluated on their
//! own. [`cascade`] is the single driver that runs them in order and records
//! what happened.

use std::collections::HashSet;

use roxmltree::{Node, NodeId};

use tc6_core::kind::Strategy;

use crate::{
    document::NodeExt,
    error::Diagnostic,
    events::{Concern, Event, EventLog},
    fields::resolve_name,
    query::{PathList, find_all, quote_literal},
};

/// Default name of a global variable group without a `name` attribute.
pub const DEFAULT_GROUP_NAME: &str = "Global Variables";

/// A subtree holding application content.
#[derive(Debug, Clone)]
pub struct ApplicationSection<'a, 'input> {
    pub root: Node<'a, 'input>,
    pub data_types: Vec<Node<'a, 'input>>,
    pub program_units: Vec<Node<'a, 'input>>,
}

impl ApplicationSection<'_, '_> {
    fn is_productive(&self) -> bool {
        !self.data_types.is_empty() || !self.program_units.is_empty()
    }
}

/// A named group of global variable declarations.
#[derive(Debug, Clone)]
pub struct VariableGroup<'a, 'input> {
    pub name: String,
    pub node: Node<'a, 'input>,
    pub variables: Vec<Node<'a, 'input>>,
}

impl VariableGroup<'_, '_> {
    fn is_productive(&self) -> bool {
        !self.variables.is_empty()
    }
}

/// The result of a successful cascade.
#[derive(Debug, Clone)]
pub struct Located<T> {
    pub strategy: Strategy,
    pub sections: Vec<T>,
}

/// Run `tier` for each strategy in order until one yields a productive section.
///
/// Unproductive sections of the winning tier are dropped. Returns `None` when
/// every tier came back empty.
pub fn cascade<T>(
    concern: Concern,
    events: &mut EventLog,
    mut tier: impl FnMut(Strategy) -> Vec<T>,
    is_productive: impl Fn(&T) -> bool,
) -> Option<Located<T>> {
    for strategy in Strategy::TIERS {
        events.record(Event::StrategyAttempted { concern, strategy });

        let mut sections = tier(strategy);
        sections.retain(&is_productive);
        if !sections.is_empty() {
            events.record(Event::SectionLocated {
                concern,
                strategy,
                sections: sections.len(),
            });
            return Some(Located { strategy, sections });
        }

        events.record(Event::SectionNotFound { concern, strategy });
    }
    None
}

/// Compiled lookups for every locator tier.
#[derive(Debug, Clone)]
pub struct Locator {
    application_blocks: PathList,
    union_blocks: PathList,
    resources: PathList,
    data_types: PathList,
    program_units: PathList,
    global_groups: PathList,
    variables: PathList,
    union_containers: PathList,
}

impl Locator {
    /// Build a locator for the given auxiliary-data block names.
    pub fn new(application_data: &str, union_data: &str) -> Result<Self, Diagnostic> {
        let block = |name: &str| format!(".//data[@name={}]", quote_literal(name));

        Ok(Self {
            application_blocks: PathList::compile(&[&block(application_data)])?,
            union_blocks: PathList::compile(&[&block(union_data)])?,
            resources: PathList::compile(&[".//resource"])?,
            data_types: PathList::compile(&[".//dataType"])?,
            program_units: PathList::compile(&[".//pou"])?,
            global_groups: PathList::compile(&[".//globalVars"])?,
            variables: PathList::compile(&[".//variable"])?,
            union_containers: PathList::compile(&[".//union", ".//dataType"])?,
        })
    }

    // ========================================================================
    // Application content
    // ========================================================================

    /// Locate application subtrees through the tier cascade.
    pub fn application_sections<'a, 'input>(
        &self,
        root: Node<'a, 'input>,
        events: &mut EventLog,
    ) -> Option<Located<ApplicationSection<'a, 'input>>> {
        cascade(
            Concern::Application,
            events,
            |strategy| self.application_tier(root, strategy),
            ApplicationSection::is_productive,
        )
    }

    /// Evaluate a single application tier.
    pub fn application_tier<'a, 'input>(
        &self,
        root: Node<'a, 'input>,
        strategy: Strategy,
    ) -> Vec<ApplicationSection<'a, 'input>> {
        let roots = match strategy {
            Strategy::NamespacedBlock => find_all(root, &self.application_blocks)
                .into_iter()
                .flat_map(|block| find_all(block, &self.resources))
                .collect(),
            Strategy::ResourceScan => find_all(root, &self.resources),
            Strategy::FlatScan => vec![root],
        };

        unique(roots)
            .into_iter()
            .map(|section| ApplicationSection {
                root: section,
                data_types: find_all(section, &self.data_types),
                program_units: find_all(section, &self.program_units),
            })
            .collect()
    }

    // ========================================================================
    // Global variables
    // ========================================================================

    /// Locate global variable groups through the tier cascade.
    pub fn global_variable_groups<'a, 'input>(
        &self,
        root: Node<'a, 'input>,
        events: &mut EventLog,
    ) -> Option<Located<VariableGroup<'a, 'input>>> {
        cascade(
            Concern::GlobalVariables,
            events,
            |strategy| self.global_variable_tier(root, strategy),
            VariableGroup::is_productive,
        )
    }

    /// Evaluate a single global variable tier.
    pub fn global_variable_tier<'a, 'input>(
        &self,
        root: Node<'a, 'input>,
        strategy: Strategy,
    ) -> Vec<VariableGroup<'a, 'input>> {
        let scopes = match strategy {
            Strategy::NamespacedBlock => find_all(root, &self.application_blocks),
            Strategy::ResourceScan => find_all(root, &self.resources),
            Strategy::FlatScan => vec![root],
        };

        let groups = scopes
            .into_iter()
            .flat_map(|scope| find_all(scope, &self.global_groups))
            .collect();

        unique(groups)
            .into_iter()
            .map(|node| VariableGroup {
                name: group_name(node),
                node,
                variables: find_all(node, &self.variables),
            })
            .collect()
    }

    // ========================================================================
    // Unions
    // ========================================================================

    /// Union auxiliary-data blocks in document order.
    pub fn union_blocks<'a, 'input>(&self, root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        find_all(root, &self.union_blocks)
    }

    /// Union containers inside a union block.
    ///
    /// Explicit `union` elements are preferred; a block without any falls
    /// back to its `dataType` elements.
    pub fn union_containers<'a, 'input>(&self, block: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        find_all(block, &self.union_containers)
    }

    // ========================================================================
    // Document-wide lookups
    // ========================================================================

    /// Every data type node in the document.
    pub fn all_data_types<'a, 'input>(&self, root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        find_all(root, &self.data_types)
    }

    /// First resource node in the document.
    pub fn first_resource<'a, 'input>(&self, root: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
        find_all(root, &self.resources).into_iter().next()
    }

    /// Variable declarations below `node`.
    pub fn variables<'a, 'input>(&self, node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        find_all(node, &self.variables)
    }
}

/// Name of a global variable group.
///
/// Falls back to [`DEFAULT_GROUP_NAME`], qualified with the enclosing
/// resource name when there is one.
fn group_name(node: Node<'_, '_>) -> String {
    if let Some(name) = resolve_name(node) {
        return name;
    }
    node.ancestors()
        .find(|ancestor| ancestor.local_name() == "resource")
        .and_then(resolve_name)
        .map_or_else(
            || DEFAULT_GROUP_NAME.to_string(),
            |resource| format!("{DEFAULT_GROUP_NAME} - {resource}"),
        )
}

/// Drop repeated nodes, keeping first occurrences in order.
fn unique<'a, 'input>(nodes: Vec<Node<'a, 'input>>) -> Vec<Node<'a, 'input>> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    nodes.into_iter().filter(|node| seen.insert(node.id())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::load;

    const APP: &str = "http://www.3s-software.com/plcopenxml/application";
    const UNION: &str = "http://www.3s-software.com/plcopenxml/union";

    fn locator() -> Locator {
        Locator::new(APP, UNION).unwrap()
    }

    fn names(nodes: &[Node<'_, '_>]) -> Vec<String> {
        nodes.iter().filter_map(|n| resolve_name(*n)).collect()
    }

    const LAYERED: &str = r#"<project>
        <types><dataTypes><dataType name="Loose"/></dataTypes></types>
        <addData>
            <data name="http://www.3s-software.com/plcopenxml/application">
                <resource name="App">
                    <dataType name="Inner"/>
                    <pou name="PLC_PRG"/>
                    <globalVars name="GVL"><variable name="a"/></globalVars>
                </resource>
            </data>
        </addData>
        <instances><configurations><configuration name="PLC">
            <resource name="Other">
                <globalVars><variable name="b"/></globalVars>
            </resource>
        </configuration></configurations></instances>
    </project>"#;

    #[test]
    fn test_namespaced_block_takes_precedence() {
        let doc = load(LAYERED).unwrap();
        let mut events = EventLog::new();

        let located = locator()
            .application_sections(doc.root_element(), &mut events)
            .unwrap();
        assert_eq!(located.strategy, Strategy::NamespacedBlock);
        assert_eq!(located.sections.len(), 1);
        assert_eq!(names(&located.sections[0].data_types), ["Inner"]);
        assert_eq!(names(&located.sections[0].program_units), ["PLC_PRG"]);

        assert_eq!(
            events.events(),
            [
                Event::StrategyAttempted {
                    concern: Concern::Application,
                    strategy: Strategy::NamespacedBlock
                },
                Event::SectionLocated {
                    concern: Concern::Application,
                    strategy: Strategy::NamespacedBlock,
                    sections: 1
                },
            ]
        );
    }

    #[test]
    fn test_tiers_evaluate_independently() {
        let doc = load(LAYERED).unwrap();
        let root = doc.root_element();
        let locator = locator();

        let resources = locator.application_tier(root, Strategy::ResourceScan);
        assert_eq!(resources.len(), 2);
        assert!(!resources[1].is_productive());

        let flat = locator.application_tier(root, Strategy::FlatScan);
        assert_eq!(names(&flat[0].data_types), ["Loose", "Inner"]);
    }

    #[test]
    fn test_fallback_to_flat_scan() {
        let doc = load(r#"<export><dataType name="A"/><pou name="B"/></export>"#).unwrap();
        let mut events = EventLog::new();

        let located = locator()
            .application_sections(doc.root_element(), &mut events)
            .unwrap();
        assert_eq!(located.strategy, Strategy::FlatScan);

        let not_found = events
            .events()
            .iter()
            .filter(|e| matches!(e, Event::SectionNotFound { .. }))
            .count();
        assert_eq!(not_found, 2);
    }

    #[test]
    fn test_nothing_found() {
        let doc = load("<project><fileHeader/></project>").unwrap();
        let mut events = EventLog::new();

        assert!(
            locator()
                .application_sections(doc.root_element(), &mut events)
                .is_none()
        );
        assert_eq!(events.events().len(), 6);
    }

    #[test]
    fn test_global_variable_groups() {
        let doc = load(LAYERED).unwrap();
        let root = doc.root_element();
        let locator = locator();
        let mut events = EventLog::new();

        let located = locator.global_variable_groups(root, &mut events).unwrap();
        assert_eq!(located.strategy, Strategy::NamespacedBlock);
        assert_eq!(located.sections.len(), 1);
        assert_eq!(located.sections[0].name, "GVL");

        let scanned = locator.global_variable_tier(root, Strategy::ResourceScan);
        let group_names: Vec<_> = scanned.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(group_names, ["GVL", "Global Variables - Other"]);
    }

    #[test]
    fn test_default_group_name() {
        let doc = load("<globalVars><variable name=\"x\"/></globalVars>").unwrap();
        assert_eq!(group_name(doc.root_element()), DEFAULT_GROUP_NAME);
    }

    #[test]
    fn test_union_containers_prefer_union_elements() {
        let doc = load(
            r#"<addData><data name="http://www.3s-software.com/plcopenxml/union">
                <dataType name="Packed"><baseType><union><variable name="raw"/></union></baseType></dataType>
            </data></addData>"#,
        )
        .unwrap();
        let locator = locator();

        let blocks = locator.union_blocks(doc.root_element());
        assert_eq!(blocks.len(), 1);
        let containers = locator.union_containers(blocks[0]);
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].local_name(), "union");
    }
}

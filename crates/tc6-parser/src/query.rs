//! Path queries over the document tree.
//!
//! A small subset of XPath is supported, enough to express the lookups the
//! extractor needs:
//!
//! ```text
//! path      := "."? axis? step (axis step)*
//! axis      := "//" | "/"
//! step      := name predicate?
//! name      := identifier | "*"
//! predicate := "[@" identifier "=" quoted "]"
//! ```
//!
//! A path without a leading axis selects children. Names are matched against
//! local names, so namespaces play no part in matching.
//!
//! Lookups take a [`PathList`]: each path is tried in order and the first one
//! that yields any node wins.

use std::fmt;

use roxmltree::Node;
use winnow::{
    ModalResult, Parser as _,
    combinator::{alt, delimited, opt, repeat, separated_pair},
    token::{take_till, take_while},
};

use crate::{
    document::NodeExt,
    error::{Diagnostic, ErrorCode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Predicate {
    attribute: String,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    /// `None` matches any element.
    name: Option<String>,
    predicate: Option<Predicate>,
}

impl Step {
    fn matches(&self, node: &Node<'_, '_>) -> bool {
        if !node.is_element() {
            return false;
        }
        if self
            .name
            .as_deref()
            .is_some_and(|name| node.local_name() != name)
        {
            return false;
        }
        match &self.predicate {
            Some(predicate) => node.attr(&predicate.attribute) == Some(predicate.value.as_str()),
            None => true,
        }
    }
}

/// A single compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    source: String,
    steps: Vec<Step>,
}

impl Path {
    /// Compile a path expression.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::E002`] diagnostic if `source` is not a valid path.
    pub fn compile(source: &str) -> Result<Self, Diagnostic> {
        let steps = path.parse(source).map_err(|err| {
            Diagnostic::error(format!(
                "invalid query path `{source}` at offset {}",
                err.offset()
            ))
            .with_code(ErrorCode::E002)
            .with_help("paths look like `.//data[@name='...']//resource`")
        })?;

        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    /// Evaluate the path from `node`, returning matches in document order.
    pub fn select<'a, 'input>(&self, node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        let mut current = vec![node];
        for step in &self.steps {
            let mut next = Vec::new();
            for context in &current {
                match step.axis {
                    Axis::Child => next.extend(context.children().filter(|n| step.matches(n))),
                    // `descendants` starts with the node itself
                    Axis::Descendant => {
                        next.extend(context.descendants().skip(1).filter(|n| step.matches(n)))
                    }
                }
            }
            next.sort_by_key(|n| n.id().get());
            next.dedup_by_key(|n| n.id().get());
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// An ordered list of alternative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathList {
    paths: Vec<Path>,
}

impl PathList {
    /// Compile every path in `sources`, keeping their order.
    pub fn compile(sources: &[&str]) -> Result<Self, Diagnostic> {
        let paths = sources
            .iter()
            .map(|source| Path::compile(source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { paths })
    }
}

impl fmt::Display for PathList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, path) in self.paths.iter().enumerate() {
            if idx > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{path}")?;
        }
        Ok(())
    }
}

/// First node matched by the first path in `paths` that matches anything.
pub fn find_first<'a, 'input>(node: Node<'a, 'input>, paths: &PathList) -> Option<Node<'a, 'input>> {
    paths
        .paths
        .iter()
        .find_map(|path| path.select(node).into_iter().next())
}

/// All nodes matched by the first path in `paths` that matches anything.
pub fn find_all<'a, 'input>(node: Node<'a, 'input>, paths: &PathList) -> Vec<Node<'a, 'input>> {
    paths
        .paths
        .iter()
        .map(|path| path.select(node))
        .find(|matches| !matches.is_empty())
        .unwrap_or_default()
}

/// Quote `value` for use inside a predicate.
pub fn quote_literal(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{value}\"")
    } else {
        format!("'{value}'")
    }
}

// ============================================================================
// Path grammar
// ============================================================================

fn path(input: &mut &str) -> ModalResult<Vec<Step>> {
    opt('.').parse_next(input)?;
    let first_axis = opt(axis).parse_next(input)?.unwrap_or(Axis::Child);
    let (name, predicate) = step_body.parse_next(input)?;

    let mut steps = vec![Step {
        axis: first_axis,
        name,
        predicate,
    }];
    let rest: Vec<(Axis, (Option<String>, Option<Predicate>))> =
        repeat(0.., (axis, step_body)).parse_next(input)?;
    steps.extend(rest.into_iter().map(|(axis, (name, predicate))| Step {
        axis,
        name,
        predicate,
    }));
    Ok(steps)
}

fn axis(input: &mut &str) -> ModalResult<Axis> {
    alt(("//".value(Axis::Descendant), "/".value(Axis::Child))).parse_next(input)
}

fn step_body(input: &mut &str) -> ModalResult<(Option<String>, Option<Predicate>)> {
    (name_test, opt(predicate)).parse_next(input)
}

fn name_test(input: &mut &str) -> ModalResult<Option<String>> {
    alt((
        "*".value(None),
        identifier.map(|name: &str| Some(name.to_string())),
    ))
    .parse_next(input)
}

fn identifier<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
    })
    .parse_next(input)
}

fn predicate(input: &mut &str) -> ModalResult<Predicate> {
    delimited("[@", separated_pair(identifier, '=', quoted), ']')
        .map(|(attribute, value): (&str, &str)| Predicate {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
        .parse_next(input)
}

fn quoted<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        delimited('\'', take_till(0.., '\''), '\''),
        delimited('"', take_till(0.., '"'), '"'),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::load;

    const SOURCE: &str = r#"<project>
        <types>
            <dataTypes>
                <dataType name="A"><values><value name="X"/></values></dataType>
                <dataType name="B"/>
            </dataTypes>
        </types>
        <addData>
            <data name="app"><resource name="R1"><dataType name="C"/></resource></data>
            <data name="other"><resource name="R2"/></data>
        </addData>
    </project>"#;

    fn names<'a>(nodes: &[Node<'a, '_>]) -> Vec<&'a str> {
        nodes.iter().filter_map(|n| n.attr("name")).collect()
    }

    #[test]
    fn test_compile_valid_paths() {
        for source in [
            "./name",
            ".//dataType",
            "types/dataTypes/dataType",
            "/project",
            ".//data[@name='x y']//resource",
            ".//*[@kind=\"it's\"]",
            "*",
        ] {
            assert!(Path::compile(source).is_ok(), "failed to compile {source}");
        }
    }

    #[test]
    fn test_compile_invalid_paths() {
        for source in ["", ".", ".//", "a//", "a[@b]", "a[@b='c'", "a b"] {
            let err = Path::compile(source).unwrap_err();
            assert_eq!(err.code(), Some(ErrorCode::E002), "accepted {source:?}");
        }
    }

    #[test]
    fn test_child_and_descendant_axes() {
        let doc = load(SOURCE).unwrap();
        let root = doc.root_element();

        let children = Path::compile("types/dataTypes/dataType").unwrap().select(root);
        assert_eq!(names(&children), ["A", "B"]);

        let all = Path::compile(".//dataType").unwrap().select(root);
        assert_eq!(names(&all), ["A", "B", "C"]);

        let none = Path::compile("dataType").unwrap().select(root);
        assert!(none.is_empty());
    }

    #[test]
    fn test_predicate() {
        let doc = load(SOURCE).unwrap();
        let root = doc.root_element();

        let resources = Path::compile(".//data[@name='app']//resource")
            .unwrap()
            .select(root);
        assert_eq!(names(&resources), ["R1"]);
    }

    #[test]
    fn test_results_merge_in_document_order() {
        let doc = load(
            r#"<a><b><c name="1"/><b><c name="2"/></b><c name="3"/></b></a>"#,
        )
        .unwrap();
        let matches = Path::compile(".//b/c").unwrap().select(doc.root_element());
        assert_eq!(names(&matches), ["1", "2", "3"]);
    }

    #[test]
    fn test_descendant_results_are_unique() {
        let doc = load("<a><b><b><c/></b></b></a>").unwrap();
        let matches = Path::compile(".//b//c").unwrap().select(doc.root_element());
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_path_list_first_non_empty_wins() {
        let doc = load(SOURCE).unwrap();
        let root = doc.root_element();

        let list = PathList::compile(&[".//missing", ".//resource", ".//dataType"]).unwrap();
        assert_eq!(names(&find_all(root, &list)), ["R1", "R2"]);
        assert_eq!(find_first(root, &list).and_then(|n| n.attr("name")), Some("R1"));

        let empty = PathList::compile(&[".//missing"]).unwrap();
        assert!(find_all(root, &empty).is_empty());
        assert!(find_first(root, &empty).is_none());
        assert_eq!(list.to_string(), ".//missing | .//resource | .//dataType");
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("app"), "'app'");
        assert_eq!(quote_literal("it's"), "\"it's\"");
        assert!(Path::compile(&format!(".//data[@name={}]", quote_literal("it's"))).is_ok());
    }
}

//! # TC6 Parser
//!
//! Extraction of a canonical model from PLCopen TC6 XML configuration
//! exports, as written by CODESYS and related automation tools.
//!
//! Exporters disagree on where content lives, so nothing is read from a
//! fixed path. Every section is found through a cascade of locator
//! strategies, type definitions are classified from their shape, and any
//! node that cannot be turned into a record is skipped with a warning
//! instead of failing the run.
//!
//! ## Usage
//!
//! ```
//! # use tc6_parser::{extract, ExtractConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         <project>
//!             <types><dataTypes>
//!                 <dataType name="ST_Point">
//!                     <baseType><struct>
//!                         <variable name="X"><type><REAL/></type></variable>
//!                         <variable name="Y"><type><REAL/></type></variable>
//!                     </struct></baseType>
//!                 </dataType>
//!             </dataTypes></types>
//!         </project>
//!     "#;
//!
//!     let extraction = extract(source, &ExtractConfig::default())?;
//!     assert_eq!(extraction.model.structures().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod document;
pub mod error;
pub mod events;
pub mod fields;
pub mod locator;
pub mod pipeline;
pub mod query;
mod span;

pub use events::{Concern, Event, Rejection};
pub use pipeline::{ExtractConfig, Extraction, Pipeline};
pub use span::Span;

use log::info;

use error::ParseError;

/// Extract the canonical model from TC6 XML source text.
///
/// This is the main entry point of the crate:
///
/// 1. **Load** - Parse the XML into a read-only tree
/// 2. **Compile** - Build the locator and classifier queries for `config`
/// 3. **Run** - Execute the extraction phases over the tree
///
/// # Errors
///
/// Fails only when the document is not well-formed XML or a configured block
/// name cannot be compiled into a query. Missing sections and unusable nodes
/// are reported through [`Extraction::events`] instead.
pub fn extract(source: &str, config: &ExtractConfig) -> Result<Extraction, ParseError> {
    let doc = document::load(source)?;
    info!(root = doc.root_element().tag_name().name(); "Document loaded");

    let pipeline = Pipeline::new(config)?;
    Ok(pipeline.run(&doc))
}

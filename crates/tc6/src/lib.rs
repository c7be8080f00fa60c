//! TC6 - Canonical model extraction from PLCopen TC6 configuration exports.
//!
//! Loading, resilient section lookup, classification and JSON reporting for
//! XML exports produced by CODESYS and other IEC 61131-3 tools.

pub mod config;

mod error;
mod report;

pub use tc6_core::{collection, kind, model, record, resolve};
pub use tc6_parser::{Concern, Event, Extraction, Rejection};

pub use error::Tc6Error;
pub use report::Report;

use log::{debug, info, trace};

use config::AppConfig;

/// Builder for extracting and reporting TC6 exports.
///
/// # Examples
///
/// ```rust,no_run
/// use tc6::{Extractor, config::AppConfig};
///
/// let source = r#"<project><dataType name="T_Alias"/></project>"#;
///
/// let extractor = Extractor::new(AppConfig::default());
/// let extraction = extractor.extract(source)
///     .expect("Failed to extract");
///
/// let json = extractor.render_json(&extraction, Some("project.xml"))
///     .expect("Failed to render");
///
/// // Or use default config
/// let extractor = Extractor::default();
/// ```
#[derive(Default)]
pub struct Extractor {
    config: AppConfig,
}

impl Extractor {
    /// Create a new extractor with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Block names to search and report formatting options
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this extractor was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Extract the canonical model from TC6 XML source text.
    ///
    /// # Arguments
    ///
    /// * `source` - The exported XML document
    ///
    /// # Errors
    ///
    /// Returns `Tc6Error::Parse` when the document is not well-formed or a
    /// configured block name is unusable. Missing sections and unusable
    /// nodes never fail; they are listed in [`Extraction::events`].
    pub fn extract(&self, source: &str) -> Result<Extraction, Tc6Error> {
        info!("Extracting canonical model");

        let extract_config = self.config.extract().to_extract_config();
        let extraction = tc6_parser::extract(source, &extract_config)
            .map_err(|err| Tc6Error::new_parse_error(err, source))?;

        debug!(
            warnings = extraction.rejections().count(),
            events = extraction.events.len();
            "Extraction finished"
        );
        trace!(summary:? = extraction.model.summary(); "Extracted model");

        Ok(extraction)
    }

    /// Render an extraction as a JSON report.
    ///
    /// # Arguments
    ///
    /// * `extraction` - Result of [`Extractor::extract`]
    /// * `source_file` - Name of the input file, recorded in the report
    ///
    /// # Errors
    ///
    /// Returns `Tc6Error::Render` if the report cannot be serialized.
    pub fn render_json(
        &self,
        extraction: &Extraction,
        source_file: Option<&str>,
    ) -> Result<String, Tc6Error> {
        let pretty = self.config.output().pretty();
        let json = Report::new(&extraction.model, &extraction.resolution, source_file)
            .to_json(pretty)?;

        debug!(pretty, bytes = json.len(); "Report rendered");
        Ok(json)
    }
}

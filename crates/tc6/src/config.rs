//! Configuration types for TC6 extraction.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file. Every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining extraction and output settings.
//! - [`ExtractSection`] - Names of the auxiliary-data blocks to search.
//! - [`OutputSection`] - Report formatting.
//!
//! # Example
//!
//! ```
//! # use tc6::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.output().pretty());
//! ```

use serde::Deserialize;

use tc6_parser::{
    ExtractConfig,
    pipeline::{DEFAULT_APPLICATION_DATA, DEFAULT_UNION_DATA},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Extraction configuration section.
    #[serde(default)]
    extract: ExtractSection,

    /// Output configuration section.
    #[serde(default)]
    output: OutputSection,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(extract: ExtractSection, output: OutputSection) -> Self {
        Self { extract, output }
    }

    /// Returns the extraction configuration.
    pub fn extract(&self) -> &ExtractSection {
        &self.extract
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputSection {
        &self.output
    }
}

/// Names of the auxiliary-data blocks holding application and union content.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractSection {
    #[serde(default = "default_application_data")]
    application_data: String,

    #[serde(default = "default_union_data")]
    union_data: String,
}

impl ExtractSection {
    pub fn new(application_data: impl Into<String>, union_data: impl Into<String>) -> Self {
        Self {
            application_data: application_data.into(),
            union_data: union_data.into(),
        }
    }

    pub fn application_data(&self) -> &str {
        &self.application_data
    }

    pub fn union_data(&self) -> &str {
        &self.union_data
    }

    /// Returns the pipeline configuration for this section.
    pub fn to_extract_config(&self) -> ExtractConfig {
        ExtractConfig::new(&self.application_data, &self.union_data)
    }
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self::new(DEFAULT_APPLICATION_DATA, DEFAULT_UNION_DATA)
    }
}

/// Report formatting options.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Indent the JSON report.
    #[serde(default = "default_pretty")]
    pretty: bool,
}

impl OutputSection {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self::new(default_pretty())
    }
}

fn default_application_data() -> String {
    DEFAULT_APPLICATION_DATA.to_string()
}

fn default_union_data() -> String {
    DEFAULT_UNION_DATA.to_string()
}

fn default_pretty() -> bool {
    true
}

//! TC6 CLI library
//!
//! This module contains the core CLI logic for the TC6 extraction tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use tc6::{Extraction, Extractor, Tc6Error};

/// Result of a successful run.
#[derive(Debug)]
pub struct Outcome {
    /// The document text, kept for rendering warnings.
    pub source: String,
    pub extraction: Extraction,
}

/// Run the TC6 CLI application
///
/// This function extracts the canonical model from the input file and writes
/// the JSON report to the output file, or to stdout when none is given.
///
/// # Errors
///
/// Returns `Tc6Error` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed documents
/// - Report serialization errors
pub fn run(args: &Args) -> Result<Outcome, Tc6Error> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing export"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let extractor = Extractor::new(app_config);
    let extraction = extractor.extract(&source)?;

    let source_file = Path::new(&args.input)
        .file_name()
        .and_then(|name| name.to_str());
    let json = extractor.render_json(&extraction, source_file)?;

    match &args.output {
        Some(output) => {
            fs::write(output, json)?;
            info!(output_file = output.as_str(); "Report written");
        }
        None => println!("{json}"),
    }

    Ok(Outcome { source, extraction })
}

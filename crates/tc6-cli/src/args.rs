//! Command-line argument definitions for the TC6 CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity and warning output.

use clap::Parser;

/// Command-line arguments for the TC6 extraction tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the exported TC6 XML file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON report; printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Render a diagnostic for every skipped node
    #[arg(long)]
    pub show_warnings: bool,
}

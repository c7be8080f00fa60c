//! Error types for TC6 extraction.
//!
//! This module provides the main error type [`Tc6Error`] which wraps the
//! conditions that can stop an extraction run.

use std::io;

use thiserror::Error;

use tc6_parser::error::ParseError;

/// The main error type for TC6 operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the fatal diagnostics together with the
/// document text, so that reporters can show the offending source snippet.
#[derive(Debug, Error)]
pub enum Tc6Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl Tc6Error {
    /// Create a new `Parse` error with the associated source document.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

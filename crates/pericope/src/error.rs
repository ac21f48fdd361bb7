//! Error types for Pericope operations.
//!
//! This module provides the main error type [`PericopeError`] which wraps the
//! error conditions that can occur while loading, laying out and exporting a
//! snapshot.

use std::{io, ops::Range};

use thiserror::Error;

use crate::structure::StructureError;

/// The main error type for Pericope operations.
///
/// # Diagnostic Variants
///
/// The `Snapshot` variant keeps the source text and, when the deserializer
/// reports one, the byte range of the offending input, so hosts can render
/// the error with a source snippet.
#[derive(Debug, Error)]
pub enum PericopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Snapshot {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Malformed relation tree: {0}")]
    Structure(#[from] StructureError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl PericopeError {
    /// Create a new `Snapshot` error with the associated source text.
    pub fn new_snapshot_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Snapshot {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}

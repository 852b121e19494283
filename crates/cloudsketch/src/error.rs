//! Error types for cloudsketch operations.
//!
//! [`CloudSketchError`] wraps every failure that can occur between declaring a
//! diagram and writing its output file.

use std::{io, path::PathBuf};

use thiserror::Error;

use cloudsketch_core::GraphError;

use crate::manifest::ManifestError;

/// The main error type for cloudsketch operations.
///
/// The `Manifest` variant keeps the manifest source so callers can point at
/// the offending span when reporting.
#[derive(Debug, Error)]
pub enum CloudSketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("{err}")]
    Manifest { err: ManifestError, src: String },

    #[error("icon `{}` of node `{label}` does not exist", icon.display())]
    MissingIcon { label: String, icon: PathBuf },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for CloudSketchError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl CloudSketchError {
    /// Create a new `Manifest` error with the associated source text.
    pub fn new_manifest_error(err: ManifestError, src: impl Into<String>) -> Self {
        Self::Manifest {
            err,
            src: src.into(),
        }
    }
}

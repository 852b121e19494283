//! Export backends.
//!
//! Rendering happens in two steps: [`dot::to_dot`] turns a diagram into a DOT
//! description, then an [`Exporter`] turns that description into the bytes
//! of the requested [`OutputFormat`].
//!
//! # Available Backends
//!
//! - [`DotExporter`]: writes the DOT description itself
//! - [`graphviz::GraphvizExporter`]: runs the Graphviz `dot` engine
//!   (feature `graphviz`)

pub mod dot;
#[cfg(feature = "graphviz")]
pub mod graphviz;

use std::io;

use thiserror::Error;

use cloudsketch_core::diagram::OutputFormat;

/// Errors raised by export backends.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} output is not supported by this build; enable the `graphviz` feature")]
    Unsupported(OutputFormat),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Converts a DOT description into `format`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unsupported`] if the backend cannot produce `format`,
    /// [`Error::Render`] or [`Error::Io`] if the layout engine fails.
    fn export(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>, Error>;
}

/// Backend that only writes DOT.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotExporter;

impl Exporter for DotExporter {
    fn export(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>, Error> {
        match format {
            OutputFormat::Dot => Ok(dot.as_bytes().to_vec()),
            other => Err(Error::Unsupported(other)),
        }
    }
}

/// The most capable backend compiled into this build.
pub fn default_exporter() -> Box<dyn Exporter> {
    #[cfg(feature = "graphviz")]
    {
        Box::new(graphviz::GraphvizExporter)
    }
    #[cfg(not(feature = "graphviz"))]
    {
        Box::new(DotExporter)
    }
}

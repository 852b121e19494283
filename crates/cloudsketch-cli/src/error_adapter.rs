//! Error adapter for converting CloudSketchError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Manifest errors
//! that know where they happened are rendered with a snippet of the manifest.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use cloudsketch::{CloudSketchError, GraphError, manifest::ManifestError};

/// Adapter for a manifest error and the manifest text it came from.
pub struct ManifestAdapter<'a> {
    err: &'a ManifestError,
    src: &'a str,
}

impl<'a> ManifestAdapter<'a> {
    pub fn new(err: &'a ManifestError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for ManifestAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for ManifestAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for ManifestAdapter<'_> {}

impl MietteDiagnostic for ManifestAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.err {
            ManifestError::Syntax { .. } => "cloudsketch::manifest::syntax",
            ManifestError::MissingIcon(_) => "cloudsketch::manifest::icon",
            ManifestError::UnknownNode(_) | ManifestError::UnknownCluster { .. } => {
                "cloudsketch::manifest::reference"
            }
            ManifestError::Graph(_) => "cloudsketch::manifest::graph",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.err {
            ManifestError::MissingIcon(_) => "add `icon = \"path/to/image.png\"` to the node",
            ManifestError::UnknownCluster { .. } => {
                "clusters must be declared before anything placed in them"
            }
            ManifestError::Graph(GraphError::UnknownKind(_)) => {
                "use a class name such as `EC2` or a qualified name such as `aws.compute.EC2`"
            }
            ManifestError::Graph(GraphError::EmptyCluster(_)) => {
                "place at least one node or cluster inside every cluster"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.err
            .span()
            .map(|_| &self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.err.span()?;
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}

/// Adapter for non-manifest [`CloudSketchError`] variants.
pub struct ErrorAdapter<'a>(pub &'a CloudSketchError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CloudSketchError::Io(_) => "cloudsketch::io",
            CloudSketchError::Graph(_) => "cloudsketch::graph",
            CloudSketchError::Manifest { .. } => "cloudsketch::manifest",
            CloudSketchError::MissingIcon { .. } => "cloudsketch::icon",
            CloudSketchError::Export(_) => "cloudsketch::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CloudSketchError::MissingIcon { .. } => Some(Box::new(
                "custom icon paths are resolved from the working directory; use `--format dot` to skip them",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A manifest error with its source text.
    Manifest(ManifestAdapter<'a>),
    /// Any other error.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Manifest(m) => fmt::Display::fmt(m, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Manifest(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Manifest(m) => m.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Manifest(m) => m.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Manifest(m) => m.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Manifest(m) => m.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`CloudSketchError`] into a list of reportable errors.
pub fn to_reportables(err: &CloudSketchError) -> Vec<Reportable<'_>> {
    match err {
        CloudSketchError::Manifest { err, src } => {
            vec![Reportable::Manifest(ManifestAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

//! cloudsketch - cloud architecture diagrams as code.
//!
//! Diagrams are declared in Rust with [`Diagram::compose`] or loaded from a
//! TOML [`manifest`], then rendered through Graphviz. The three National
//! Schools Partnership diagrams live in [`architectures`].

pub mod architectures;
pub mod config;
pub mod export;
pub mod manifest;

mod error;
mod viewer;

pub use cloudsketch_core::{GraphError, attrs, diagram, identifier, kind, scope};

pub use error::CloudSketchError;

use std::{fs, path::PathBuf};

use log::{debug, info, trace, warn};

use config::AppConfig;
use diagram::{Diagram, OutputFormat};
use export::{
    Exporter,
    dot::{self, IconResolver},
};

/// Builder for turning diagram declarations into rendered files.
///
/// # Examples
///
/// ```rust,no_run
/// use cloudsketch::{DiagramBuilder, architectures, config::AppConfig};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let diagram = architectures::planned().expect("valid diagram");
/// let path = builder.render(&diagram).expect("Failed to render");
/// println!("wrote {}", path.display());
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a TOML manifest into a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`CloudSketchError::Manifest`], carrying `source`, for syntax,
    /// reference and structural errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cloudsketch::DiagramBuilder;
    ///
    /// let source = r#"
    ///     title = "Tiny"
    ///
    ///     [[node]]
    ///     ref = "web"
    ///     kind = "EC2"
    ///     label = "Web"
    /// "#;
    ///
    /// let diagram = DiagramBuilder::default().declare(source).unwrap();
    /// assert_eq!(diagram.stats().nodes, 1);
    /// ```
    pub fn declare(&self, source: &str) -> Result<Diagram, CloudSketchError> {
        info!("Parsing manifest");

        let diagram = manifest::parse(source)
            .map_err(|err| CloudSketchError::new_manifest_error(err, source))?;

        debug!(title = diagram.title(), stats:% = diagram.stats(); "Manifest declared");
        trace!(diagram:?; "Declared diagram");

        Ok(diagram)
    }

    /// The DOT description of `diagram` under this builder's style.
    pub fn to_dot(&self, diagram: &Diagram) -> String {
        let icons = IconResolver::from(self.config.render());
        dot::to_dot(diagram, self.config.style(), &icons)
    }

    /// The format `diagram` will be rendered in.
    pub fn output_format(&self, diagram: &Diagram) -> OutputFormat {
        self.config
            .render()
            .format()
            .unwrap_or_else(|| diagram.settings().format())
    }

    /// The file `diagram` will be rendered to.
    pub fn output_path(&self, diagram: &Diagram) -> PathBuf {
        let file_name = format!(
            "{}.{}",
            diagram.settings().filename(),
            self.output_format(diagram).extension()
        );
        self.config.render().output_dir().join(file_name)
    }

    /// Render `diagram` with the most capable exporter in this build.
    ///
    /// See [`DiagramBuilder::render_with`].
    pub fn render(&self, diagram: &Diagram) -> Result<PathBuf, CloudSketchError> {
        let exporter = export::default_exporter();
        self.render_with(diagram, exporter.as_ref())
    }

    /// Render `diagram` to `<output_dir>/<filename>.<ext>` through `exporter`
    /// and return the written path.
    ///
    /// When show-after-render is on and the output is an image, the file is
    /// opened in the platform viewer; failing to open it is only logged.
    ///
    /// # Errors
    ///
    /// - [`CloudSketchError::MissingIcon`] if an image is requested and a
    ///   custom node's icon does not exist.
    /// - [`CloudSketchError::Export`] if the exporter fails.
    /// - [`CloudSketchError::Io`] if the output cannot be written.
    pub fn render_with(
        &self,
        diagram: &Diagram,
        exporter: &dyn Exporter,
    ) -> Result<PathBuf, CloudSketchError> {
        let format = self.output_format(diagram);
        info!(title = diagram.title(), format:% = format; "Rendering diagram");

        if format.is_image() {
            check_custom_icons(diagram)?;
        }

        let dot = self.to_dot(diagram);
        debug!(bytes = dot.len(); "DOT generated");

        let bytes = exporter.export(&dot, format)?;

        let path = self.output_path(diagram);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        info!(path:% = path.display(); "Diagram written");

        let show = self
            .config
            .render()
            .show()
            .unwrap_or_else(|| diagram.settings().show());
        if show && format.is_image() {
            if let Err(err) = viewer::open(&path) {
                warn!(path:% = path.display(), err:err; "Could not open rendered diagram");
            }
        }

        Ok(path)
    }
}

fn check_custom_icons(diagram: &Diagram) -> Result<(), CloudSketchError> {
    for node in diagram.nodes() {
        if let Some(icon) = node.kind().custom_icon() {
            if !icon.is_file() {
                return Err(CloudSketchError::MissingIcon {
                    label: node.label().to_string(),
                    icon: icon.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

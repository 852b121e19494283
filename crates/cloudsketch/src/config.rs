//! Configuration types for rendering cloudsketch diagrams.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file.
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Where and how output files are written.
//! - [`StyleConfig`] - Fonts and colors applied to every diagram.
//!
//! Values left unset fall back to the diagram's own settings or to the
//! built-in look.
//!
//! # Example
//!
//! ```
//! # use cloudsketch::config::AppConfig;
//! let config: AppConfig = toml::from_str(r##"
//!     [render]
//!     format = "svg"
//!
//!     [style]
//!     edge_color = "#333333"
//! "##).unwrap();
//!
//! assert_eq!(config.style().edge_color(), "#333333");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use cloudsketch_core::diagram::OutputFormat;

pub const DEFAULT_FONT_NAME: &str = "Sans-Serif";
pub const DEFAULT_FONT_COLOR: &str = "#2D3436";
pub const DEFAULT_EDGE_COLOR: &str = "#7B8894";
pub const DEFAULT_CLUSTER_COLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    render: RenderConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Output settings. Each field overrides the corresponding diagram setting
/// when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    /// Directory output files are written to. Defaults to the working directory.
    #[serde(default)]
    output_dir: Option<PathBuf>,

    #[serde(default)]
    format: Option<OutputFormat>,

    /// Open the rendered file in the platform viewer.
    #[serde(default)]
    show: Option<bool>,

    /// Root of an icon pack laid out as `<provider>/<category>/<icon>.png`.
    #[serde(default)]
    icon_dir: Option<PathBuf>,
}

impl RenderConfig {
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    pub fn show(&self) -> Option<bool> {
        self.show
    }

    pub fn icon_dir(&self) -> Option<&Path> {
        self.icon_dir.as_deref()
    }

    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.output_dir = Some(output_dir.into());
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = Some(format);
    }

    pub fn set_show(&mut self, show: bool) {
        self.show = Some(show);
    }

    pub fn set_icon_dir(&mut self, icon_dir: impl Into<PathBuf>) {
        self.icon_dir = Some(icon_dir.into());
    }
}

/// Fonts and colors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    font_name: Option<String>,

    #[serde(default)]
    font_color: Option<String>,

    #[serde(default)]
    edge_color: Option<String>,

    /// Cluster background colors, cycled by nesting depth.
    #[serde(default)]
    cluster_colors: Option<Vec<String>>,
}

impl StyleConfig {
    pub fn font_name(&self) -> &str {
        self.font_name.as_deref().unwrap_or(DEFAULT_FONT_NAME)
    }

    pub fn font_color(&self) -> &str {
        self.font_color.as_deref().unwrap_or(DEFAULT_FONT_COLOR)
    }

    pub fn edge_color(&self) -> &str {
        self.edge_color.as_deref().unwrap_or(DEFAULT_EDGE_COLOR)
    }

    /// Background color of a cluster at nesting `depth`.
    pub fn cluster_color(&self, depth: usize) -> &str {
        match self.cluster_colors.as_deref() {
            Some(colors) if !colors.is_empty() => &colors[depth % colors.len()],
            _ => DEFAULT_CLUSTER_COLORS[depth % DEFAULT_CLUSTER_COLORS.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.render().output_dir(), Path::new("."));
        assert_eq!(config.render().format(), None);
        assert_eq!(config.render().show(), None);
        assert_eq!(config.style().font_name(), "Sans-Serif");
        assert_eq!(config.style().edge_color(), "#7B8894");
    }

    #[test]
    fn test_cluster_colors_cycle() {
        let style = StyleConfig::default();
        assert_eq!(style.cluster_color(0), "#E5F5FD");
        assert_eq!(style.cluster_color(4), "#E5F5FD");
        assert_eq!(style.cluster_color(5), "#EBF3E7");

        let style: StyleConfig = toml::from_str(r##"cluster_colors = ["#FFFFFF", "#000000"]"##).unwrap();
        assert_eq!(style.cluster_color(2), "#FFFFFF");
        assert_eq!(style.cluster_color(3), "#000000");
    }

    #[test]
    fn test_empty_cluster_colors_fall_back() {
        let style: StyleConfig = toml::from_str("cluster_colors = []").unwrap();
        assert_eq!(style.cluster_color(1), "#EBF3E7");
    }

    #[test]
    fn test_render_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [render]
            output_dir = "out"
            format = "pdf"
            show = false
            icon_dir = "resources"
            "#,
        )
        .unwrap();

        let render = config.render();
        assert_eq!(render.output_dir(), Path::new("out"));
        assert_eq!(render.format(), Some(OutputFormat::Pdf));
        assert_eq!(render.show(), Some(false));
        assert_eq!(render.icon_dir(), Some(Path::new("resources")));
    }

    #[test]
    fn test_overrides() {
        let mut config = AppConfig::default();
        config.render_mut().set_format(OutputFormat::Dot);
        config.render_mut().set_show(false);

        assert_eq!(config.render().format(), Some(OutputFormat::Dot));
        assert_eq!(config.render().show(), Some(false));
    }
}

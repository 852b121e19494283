//! Graphviz backend.

use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec_dot,
};
use log::debug;

use cloudsketch_core::diagram::OutputFormat;

use super::{Error, Exporter};

/// Runs the Graphviz `dot` engine, which must be on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphvizExporter;

impl Exporter for GraphvizExporter {
    fn export(&self, dot: &str, format: OutputFormat) -> Result<Vec<u8>, Error> {
        debug!(format:% = format; "Invoking dot");
        let format = match format {
            OutputFormat::Png => Format::Png,
            OutputFormat::Jpg => Format::Jpg,
            OutputFormat::Svg => Format::Svg,
            OutputFormat::Pdf => Format::Pdf,
            OutputFormat::Dot => return Ok(dot.as_bytes().to_vec()),
        };

        let output = exec_dot(dot.to_string(), vec![CommandArg::Format(format)])?;
        if output.is_empty() {
            return Err(Error::Render("dot produced no output".to_string()));
        }
        Ok(output)
    }
}

//! CLI logic for the cloudsketch diagram tool.
//!
//! A target is either the name of a built-in architecture or the path to a
//! TOML manifest. [`run`] resolves it, applies command-line overrides on top
//! of the loaded configuration, then validates or renders the diagram.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path, str::FromStr};

use log::{debug, info};

use cloudsketch::{
    CloudSketchError, DiagramBuilder, architectures::Architecture, config::AppConfig,
    diagram::Diagram,
};

/// Run the cloudsketch CLI application
///
/// # Errors
///
/// Returns `CloudSketchError` for:
/// - File I/O errors, including unreadable manifests and configuration
/// - Manifest errors
/// - Invalid diagram structure
/// - Missing custom icons and export failures
pub fn run(args: &Args) -> Result<(), CloudSketchError> {
    info!(input = args.target, check = args.check; "Processing diagram");

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);

    let builder = DiagramBuilder::new(app_config);
    let diagram = resolve_target(&builder, &args.target)?;

    if args.check {
        let stats = diagram.stats();
        info!(title = diagram.title(), stats:% = stats; "Diagram is valid");
        println!("{}: {}", diagram.title(), stats);
        return Ok(());
    }

    let path = builder.render(&diagram)?;
    info!(output_file:% = path.display(); "Diagram exported successfully");

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    let render = config.render_mut();
    if let Some(output_dir) = &args.output_dir {
        render.set_output_dir(output_dir);
    }
    if let Some(format) = args.format {
        render.set_format(format);
    }
    if let Some(icon_dir) = &args.icon_dir {
        render.set_icon_dir(icon_dir);
    }
    if args.no_show {
        render.set_show(false);
    }
}

fn resolve_target(builder: &DiagramBuilder, target: &str) -> Result<Diagram, CloudSketchError> {
    let path = Path::new(target);
    if !path.is_file() {
        if let Ok(architecture) = Architecture::from_str(target) {
            debug!(architecture:% = architecture; "Using built-in architecture");
            return Ok(architecture.build()?);
        }
    }

    debug!(path:% = path.display(); "Reading manifest");
    let source = fs::read_to_string(path)?;
    builder.declare(&source)
}

//! Command-line argument definitions for the cloudsketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select what to render, where the output goes,
//! which configuration file to load, and logging verbosity.

use std::str::FromStr;

use clap::Parser;

use cloudsketch::diagram::OutputFormat;

/// Command-line arguments for the cloudsketch diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Built-in architecture (current, planned, resilient) or path to a
    /// TOML manifest
    #[arg(help = "Architecture name or manifest path")]
    pub target: String,

    /// Directory the rendered file is written to
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Output format (png, jpg, svg, pdf, dot)
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Directory holding the provider icon pack (`aws/compute/ec2.png`, ...)
    #[arg(long)]
    pub icon_dir: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Do not open the rendered image
    #[arg(long)]
    pub no_show: bool,

    /// Validate the diagram and print its counts without rendering
    #[arg(long)]
    pub check: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(value).map_err(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["cloudsketch", "planned"]).unwrap();
        assert_eq!(args.target, "planned");
        assert_eq!(args.output_dir, None);
        assert_eq!(args.format, None);
        assert_eq!(args.icon_dir, None);
        assert!(!args.no_show);
        assert!(!args.check);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "cloudsketch",
            "demos/web.toml",
            "-o",
            "out",
            "-f",
            "SVG",
            "--icon-dir",
            "resources",
            "-c",
            "cfg.toml",
            "--no-show",
            "--check",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.target, "demos/web.toml");
        assert_eq!(args.output_dir.as_deref(), Some("out"));
        assert_eq!(args.format, Some(OutputFormat::Svg));
        assert_eq!(args.icon_dir.as_deref(), Some("resources"));
        assert_eq!(args.config.as_deref(), Some("cfg.toml"));
        assert!(args.no_show);
        assert!(args.check);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["cloudsketch", "current", "-f", "bmp"]).is_err());
    }
}

//! Command-line argument definitions for the Pericope CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, view options for the layout pass, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Pericope layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input snapshot file (TOML)
    #[arg(help = "Path to the input snapshot file")]
    pub input: String,

    /// Path to the output layout file (TOML)
    #[arg(short, long, default_value = "layout.toml")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Hide role labels at this relation depth (repeatable)
    #[arg(long = "fold", value_name = "DEPTH")]
    pub fold: Vec<usize>,

    /// Lay out connectors for right-to-left text
    #[arg(long)]
    pub rtl: bool,

    /// Output units per grid unit; overrides the configured scale
    #[arg(long)]
    pub scale: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

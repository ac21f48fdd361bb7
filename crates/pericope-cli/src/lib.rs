//! CLI logic for the Pericope layout tool.
//!
//! Reads a snapshot file, runs one layout pass and writes the resolved layout
//! as TOML.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use pericope::{LayoutBuilder, PericopeError, ViewState, style::TextDirection};

/// Run the Pericope CLI application
///
/// # Errors
///
/// Returns `PericopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Snapshot parsing errors
/// - Malformed relation trees
/// - Layout and export errors
pub fn run(args: &Args) -> Result<(), PericopeError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing snapshot"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = LayoutBuilder::new(app_config);
    let snapshot = builder.parse(&source)?;
    let layout = builder.layout(&snapshot, &view_state(args))?;
    let rendered = builder.render_toml(&layout)?;

    fs::write(&args.output, rendered)?;

    info!(output_file = args.output; "Layout exported successfully");

    Ok(())
}

fn view_state(args: &Args) -> ViewState {
    let mut view = args
        .fold
        .iter()
        .fold(ViewState::new(), |view, &depth| view.with_folded_depth(depth));
    if args.rtl {
        view = view.with_direction(TextDirection::RightToLeft);
    }
    if let Some(scale) = args.scale {
        view = view.with_pixels_per_grid_unit(scale);
    }
    view
}

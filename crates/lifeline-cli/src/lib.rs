//! CLI logic for the Lifeline sequence diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use lifeline::{DiagramBuilder, LifelineError, ThemeKind};

/// Run the Lifeline CLI application
///
/// This function processes the input file through the Lifeline pipeline
/// and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `LifelineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), LifelineError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    // Load configuration, then let the command line override the theme
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(theme) = &args.theme {
        let theme: ThemeKind = theme.parse().map_err(LifelineError::Config)?;
        app_config.style_mut().set_theme(theme);
    }

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process diagram using DiagramBuilder API
    let builder = DiagramBuilder::with_config(app_config);
    let svg = builder.render_svg(&source)?;

    // Write output file
    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

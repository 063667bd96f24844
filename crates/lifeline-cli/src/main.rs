//! Command line entry point for rendering `.seq` files to SVG.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use lifeline::LifelineError;
use lifeline_cli::{Args, error_adapter::to_reportables};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);

    debug!(args:?; "Parsed arguments");

    if let Err(err) = lifeline_cli::run(&args) {
        report(&err);
        process::exit(1);
    }
}

/// Set up env_logger at the requested level, falling back to `warn` when
/// the level string is not recognized.
fn init_logging(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Lifeline");
}

/// Render every diagnostic in `err` through miette's graphical handler.
///
/// A parse failure carries one report per source diagnostic, so a diagram
/// with several bad lines surfaces all of them in one invocation.
fn report(err: &LifelineError) {
    let reporter = miette::GraphicalReportHandler::new();

    let reportables = to_reportables(err);
    for reportable in &reportables {
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, reportable)
            .expect("Writing to String buffer is infallible");

        error!("{writer}");
    }

    if reportables.len() > 1 {
        error!("{} problems found in the diagram source", reportables.len());
    }
}

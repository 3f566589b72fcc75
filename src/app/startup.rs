//! Application startup: argument parsing, configuration, logging and dispatch

use super::cli::args::Args;
use super::cli::commands::{self, EXIT_FAILURE};
use super::cli::config::Settings;
use super::cli::error::CliError;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::styles::palette_to_clap;
use clap::{CommandFactory, FromArgMatches};
use std::io::IsTerminal;

/// Run the command line and return the process exit code
pub fn startup() -> i32 {
    let raw_args: Vec<String> = std::env::args().collect();
    let help_color = initial_color(&raw_args);

    let matches = Args::command()
        .styles(palette_to_clap(help_color))
        .get_matches_from(&raw_args);
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let settings = match Settings::load(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", CliError::from(e));
            return EXIT_FAILURE;
        }
    };

    let log_file = settings
        .log_file
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    let log_format = settings.log_format.to_string();
    if let Err(e) = init_logging(
        Some(&settings.log_level),
        Some(&log_format),
        log_file.as_deref(),
        settings.color.unwrap_or_else(|| std::io::stderr().is_terminal()),
    ) {
        eprintln!("{}", CliError::Logging(e.to_string()));
        return EXIT_FAILURE;
    }

    settings.report_ignored_keys();
    log::debug!("Effective settings: {:?}", settings);

    match commands::execute(&settings, &args.command) {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context(&e, "Command failed");
            EXIT_FAILURE
        }
    }
}

/// Color choice for help and parse errors, before the configuration is read
fn initial_color(raw_args: &[String]) -> bool {
    if raw_args.iter().any(|a| a == "--no-color") {
        false
    } else if raw_args.iter().any(|a| a == "--color") {
        true
    } else {
        std::io::stdout().is_terminal()
    }
}

//! assistant: run predefined XML command prompts with an AI coding assistant.
//!
//! This is the main entry point for the `assistant` CLI. It parses
//! arguments, configures logging, runs the selected command, and maps
//! errors to exit codes.

mod assistant;
mod cli;
mod commands;
mod convert;
pub mod error;
pub mod exit_codes;
mod logging;
mod render;
mod resolve;
mod session;
mod spec;

#[cfg(test)]
mod test_support;

use cli::Cli;
use logging::LogConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(err) = logging::init(&LogConfig::new(cli.verbose)) {
        eprintln!("Warning: {}", err);
    }

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

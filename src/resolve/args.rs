//! Parsing of the flags forwarded to a command.
//!
//! The accepted flags are only known once the command definition is loaded,
//! so the parser is built at runtime from the argument declarations.

use crate::error::{AssistantError, Result};
use crate::spec::ArgumentDecl;
use clap::{Arg, ArgAction, Command};
use std::collections::HashMap;

/// Parse `raw` against the declared arguments.
///
/// Accepts `--alias value` and `--alias=value`; a repeated flag keeps its
/// last value. Returns the supplied values keyed by argument id. Any flag or
/// value that is not declared fails with `AssistantError::InvalidArguments`.
pub fn parse_cli_args(
    command: &str,
    arguments: &[ArgumentDecl],
    raw: &[String],
) -> Result<HashMap<String, String>> {
    let mut parser = Command::new(command.to_string())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true);

    for decl in arguments {
        parser = parser.arg(
            Arg::new(decl.id.clone())
                .long(decl.alias.clone())
                .value_name(decl.id.clone())
                .help(decl.question.clone())
                .action(ArgAction::Set),
        );
    }

    let matches = parser
        .try_get_matches_from(raw)
        .map_err(|e| AssistantError::InvalidArguments(e.to_string().trim_end().to_string()))?;

    Ok(arguments
        .iter()
        .filter_map(|decl| {
            matches
                .get_one::<String>(&decl.id)
                .map(|value| (decl.id.clone(), value.clone()))
        })
        .collect())
}

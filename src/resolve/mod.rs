//! Value resolution: turns a command definition plus forwarded flags into
//! the placeholder values used for rendering.
//!
//! Values come from three sources, in this order:
//!
//! 1. Flags on the command line (`--alias value` or `--alias=value`)
//! 2. Answers to interactive questions for arguments that were not supplied
//! 3. Converters run on already resolved values (`<variable>` declarations)
//!
//! The resulting [`ReplacementTable`] keeps insertion order, which is the
//! order placeholders are substituted in.

mod args;
mod prompter;


pub use args::parse_cli_args;
pub use prompter::{Prompter, stdio_prompter};

use crate::convert::ConverterRegistry;
use crate::error::{Result, UnresolvedReason, Warning};
use crate::spec::CommandSpec;
use indexmap::IndexMap;

/// Placeholder id to resolved value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    entries: IndexMap<String, String>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value. Re-inserting an id keeps its original position.
    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ReplacementTable::new();
        for (id, value) in iter {
            table.insert(id, value);
        }
        table
    }
}

/// Resolve arguments and then variables for `spec`.
pub fn resolve<P: Prompter + ?Sized>(
    command: &str,
    spec: &CommandSpec,
    cli_args: &[String],
    prompter: &mut P,
    converters: &ConverterRegistry,
) -> Result<ReplacementTable> {
    let mut table = resolve_arguments(command, spec, cli_args, prompter)?;
    resolve_variables(spec, &mut table, converters);
    tracing::info!(
        "Resolved {} of {} placeholders",
        table.len(),
        spec.arguments.len() + spec.variables.len()
    );
    Ok(table)
}

/// Resolve every declared argument, asking for the ones missing from `cli_args`.
///
/// A flag given with an empty value counts as missing.
pub fn resolve_arguments<P: Prompter + ?Sized>(
    command: &str,
    spec: &CommandSpec,
    cli_args: &[String],
    prompter: &mut P,
) -> Result<ReplacementTable> {
    let supplied = parse_cli_args(command, &spec.arguments, cli_args)?;
    let mut table = ReplacementTable::new();

    for decl in &spec.arguments {
        let value = match supplied.get(&decl.id).filter(|v| !v.is_empty()) {
            Some(value) => {
                tracing::info!("Replacing {} with {}", decl.id, value);
                value.clone()
            }
            None => prompter.ask(&format!("Missing --{}. {}", decl.alias, decl.question))?,
        };
        table.insert(decl.id.clone(), value);
    }

    Ok(table)
}

/// Add converter-derived values for every declared variable.
///
/// Variables whose source is unresolved, or whose converter yields nothing,
/// are skipped with a warning and keep their placeholder in the output.
pub fn resolve_variables(
    spec: &CommandSpec,
    table: &mut ReplacementTable,
    converters: &ConverterRegistry,
) {
    for var in &spec.variables {
        if !table.contains(&var.argument) {
            Warning::UnresolvedVariable {
                variable: var.id.clone(),
                reason: UnresolvedReason::MissingArgument(var.argument.clone()),
            }
            .emit();
            continue;
        }

        let source = table.get(&var.argument).unwrap_or_default().to_string();
        match converters.convert(&var.converter, &source) {
            Some(value) => {
                tracing::info!("Replacing {} with {}", var.id, value);
                table.insert(var.id.clone(), value);
            }
            None => Warning::UnresolvedVariable {
                variable: var.id.clone(),
                reason: UnresolvedReason::NoConverterResult(var.converter.clone()),
            }
            .emit(),
        }
    }
}

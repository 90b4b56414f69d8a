//! Top-level command handling for assistant.
//!
//! Wires the terminal, the converters and the configured assistant into a
//! [`session`](crate::session) run, or prints what would be run with `--dry-run`.

use crate::assistant::{AssistantConfig, SubprocessClient};
use crate::cli::Cli;
use crate::convert::ConverterRegistry;
use crate::error::Result;
use crate::resolve::{Prompter, stdio_prompter};
use crate::session::{self, PreparedPrompt, SessionOptions};
use std::fmt::Write;
use std::path::Path;

/// Run the command selected on the command line.
pub fn dispatch(cli: Cli) -> Result<()> {
    let options = SessionOptions {
        command: cli.command,
        prompts_dir: cli.promptsdir,
        args: cli.args,
    };
    let converters = ConverterRegistry::with_defaults(&cli.composer_json);
    let mut prompter = stdio_prompter();

    if cli.dry_run {
        if let Some(report) = dry_run(&options, &mut *prompter, &converters, &cli.config)? {
            print!("{}", report);
        }
        return Ok(());
    }

    session::run(&options, &mut *prompter, &converters, || {
        connect(&cli.config, &options.command)
    })?;
    Ok(())
}

/// Load the assistant configuration and build the client for `command`.
fn connect(config_path: &Path, command: &str) -> Result<SubprocessClient> {
    let config = AssistantConfig::load_or_default(config_path)?;
    Ok(SubprocessClient::new(config, command))
}

/// Render everything a real run would, without starting the assistant.
///
/// Returns `None` when the command definition could not be loaded.
fn dry_run<P: Prompter + ?Sized>(
    options: &SessionOptions,
    prompter: &mut P,
    converters: &ConverterRegistry,
    config_path: &Path,
) -> Result<Option<String>> {
    let Some(prepared) = session::prepare(options, prompter, converters)? else {
        return Ok(None);
    };
    let client = connect(config_path, &options.command)?;
    let command_line = client.command_line(&prepared.prompt, &prepared.context)?;
    Ok(Some(format_dry_run(&options.command, &prepared, &command_line)))
}

fn format_dry_run(command: &str, prepared: &PreparedPrompt, command_line: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dry run - would execute:");
    let _ = writeln!(out);
    let _ = writeln!(out, "  Command:   {}", command);
    let _ = writeln!(out, "  Assistant: {}", command_line);
    let _ = writeln!(out, "  Context:");
    if prepared.context.is_empty() {
        let _ = writeln!(out, "    (none)");
    }
    for path in &prepared.context {
        let _ = writeln!(out, "    {}", path);
    }
    let _ = writeln!(out, "  Prompt:");
    for line in prepared.prompt.lines() {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssistantError;
    use crate::test_support::{
        ARGUMENTS_AND_CONTEXT_XML, ScriptedPrompter, args, create_prompts_dir, write_file,
    };
    use tempfile::TempDir;

    fn options(dir: &TempDir, command: &str, cli_args: &[&str]) -> SessionOptions {
        SessionOptions {
            command: command.to_string(),
            prompts_dir: dir.path().to_path_buf(),
            args: args(cli_args),
        }
    }

    #[test]
    fn dry_run_renders_configured_command() {
        let dir = create_prompts_dir(&[("test-arguments-and-context", ARGUMENTS_AND_CONTEXT_XML)]);
        write_file(dir.path(), "assistant.yaml", "command: \"mentat {context}\"\n");

        let report = dry_run(
            &options(
                &dir,
                "test-arguments-and-context",
                &["--class", "TestClass", "--method", "start"],
            ),
            &mut ScriptedPrompter::new(&[]),
            &ConverterRegistry::new(),
            &dir.path().join("assistant.yaml"),
        )
        .unwrap()
        .unwrap();

        assert!(report.contains("  Assistant: mentat tests src\n"));
        assert!(report.contains("    Test method `start` in class `TestClass`.\n"));
    }

    #[test]
    fn dry_run_with_unrenderable_command_fails() {
        let dir = create_prompts_dir(&[("test-arguments-and-context", ARGUMENTS_AND_CONTEXT_XML)]);
        write_file(dir.path(), "assistant.yaml", "command: \"mentat {prompt_file}\"\n");

        let err = dry_run(
            &options(
                &dir,
                "test-arguments-and-context",
                &["--class", "TestClass", "--method", "start"],
            ),
            &mut ScriptedPrompter::new(&[]),
            &ConverterRegistry::new(),
            &dir.path().join("assistant.yaml"),
        )
        .unwrap_err();

        assert!(matches!(err, AssistantError::UserError(_)));
        assert!(err.to_string().contains("undefined variable 'prompt_file'"));
    }

    #[test]
    fn dry_run_of_missing_command_ignores_broken_config() {
        let dir = create_prompts_dir(&[]);
        write_file(dir.path(), "assistant.yaml", "timeout_seconds: 0\n");

        let report = dry_run(
            &options(&dir, "not-existing", &[]),
            &mut ScriptedPrompter::new(&[]),
            &ConverterRegistry::new(),
            &dir.path().join("assistant.yaml"),
        )
        .unwrap();

        assert_eq!(report, None);
    }

    #[test]
    fn dry_run_lists_context_and_prompt() {
        let prepared = PreparedPrompt {
            prompt: "Test method `start`\nin class `TestClass`.".to_string(),
            context: vec!["tests".to_string(), "src".to_string()],
        };

        let out = format_dry_run("test-arguments-and-context", &prepared, "mentat tests src");

        assert_eq!(
            out,
            "Dry run - would execute:\n\
             \n  Command:   test-arguments-and-context\
             \n  Assistant: mentat tests src\
             \n  Context:\
             \n    tests\
             \n    src\
             \n  Prompt:\
             \n    Test method `start`\
             \n    in class `TestClass`.\n"
        );
    }

    #[test]
    fn dry_run_without_context() {
        let prepared = PreparedPrompt {
            prompt: "Do it.".to_string(),
            context: Vec::new(),
        };

        let out = format_dry_run("x", &prepared, "mentat");
        assert!(out.contains("  Context:\n    (none)\n"));
    }
}

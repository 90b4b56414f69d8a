//! CLI argument parsing for assistant.
//!
//! Uses clap derive macros for the tool's own options. The flags of the
//! selected command are only known after its definition is loaded, so
//! everything following the command name is collected verbatim. Tool
//! options found among those tokens are then taken back out, so they work
//! anywhere on the command line; the rest is parsed later.

use clap::Parser;
use std::path::PathBuf;

/// Run predefined prompts with an AI coding assistant.
///
/// Looks up `<promptsdir>/<command>.xml`, fills its placeholders from the
/// remaining flags (asking for missing ones), and hands the prompt and
/// context files to the assistant.
#[derive(Parser, Debug)]
#[command(name = "assistant")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the command definition to run.
    pub command: String,

    /// Directory holding the command definition XML file(s).
    #[arg(long, default_value = "prompts")]
    pub promptsdir: PathBuf,

    /// Composer manifest used to resolve PHP class paths.
    #[arg(long, default_value = "composer.json")]
    pub composer_json: PathBuf,

    /// Assistant configuration file (defaults apply when it does not exist).
    #[arg(long, default_value = "assistant.yaml")]
    pub config: PathBuf,

    /// Print the rendered prompt and context instead of starting the assistant.
    #[arg(long)]
    pub dry_run: bool,

    /// Log informational messages.
    #[arg(short, long)]
    pub verbose: bool,

    /// Flags for the command, e.g. `--class Foo --method=bar`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Tool options that take a path value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathOption {
    PromptsDir,
    ComposerJson,
    Config,
}

const PATH_OPTIONS: [(&str, PathOption); 3] = [
    ("--promptsdir", PathOption::PromptsDir),
    ("--composer-json", PathOption::ComposerJson),
    ("--config", PathOption::Config),
];

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse().take_tool_options()
    }

    /// Move tool options that appear among the forwarded arguments into `self`.
    ///
    /// A path option given last without a value is left for the command's
    /// parser to reject.
    fn take_tool_options(mut self) -> Self {
        let mut forwarded = Vec::with_capacity(self.args.len());
        let mut rest = std::mem::take(&mut self.args).into_iter();

        while let Some(arg) = rest.next() {
            match arg.as_str() {
                "-v" | "--verbose" => self.verbose = true,
                "--dry-run" => self.dry_run = true,
                _ => match split_path_option(&arg) {
                    Some((option, Some(value))) => self.set_path(option, value),
                    Some((option, None)) => match rest.next() {
                        Some(value) => self.set_path(option, value),
                        None => forwarded.push(arg),
                    },
                    None => forwarded.push(arg),
                },
            }
        }

        self.args = forwarded;
        self
    }

    fn set_path(&mut self, option: PathOption, value: String) {
        let path = PathBuf::from(value);
        match option {
            PathOption::PromptsDir => self.promptsdir = path,
            PathOption::ComposerJson => self.composer_json = path,
            PathOption::Config => self.config = path,
        }
    }
}

/// Recognize `--option value` (value `None`) and `--option=value`.
fn split_path_option(arg: &str) -> Option<(PathOption, Option<String>)> {
    PATH_OPTIONS.iter().find_map(|(flag, option)| {
        let rest = arg.strip_prefix(flag)?;
        if rest.is_empty() {
            Some((*option, None))
        } else {
            rest.strip_prefix('=')
                .map(|value| (*option, Some(value.to_string())))
        }
    })
}

//! One run of a command: load, resolve, render, hand over to the assistant.
//!
//! A command definition that cannot be loaded ends the run early with
//! [`SessionOutcome::Aborted`] after logging the problem; every other failure
//! is returned to the caller.

use crate::assistant::AssistantClient;
use crate::convert::ConverterRegistry;
use crate::error::Result;
use crate::render::{render_context, render_prompt};
use crate::resolve::{Prompter, resolve};
use crate::spec::CommandSpec;
use std::path::PathBuf;

/// What to run.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Command definition name (`{prompts_dir}/{command}.xml`).
    pub command: String,
    /// Directory holding command definitions.
    pub prompts_dir: PathBuf,
    /// Flags forwarded to the command.
    pub args: Vec<String>,
}

/// Rendered input for the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPrompt {
    pub prompt: String,
    pub context: Vec<String>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The assistant ran the prompt.
    Completed,
    /// The command definition could not be loaded; nothing was run.
    Aborted,
}

/// Load the command and render its prompt and context.
///
/// Returns `Ok(None)` when the command definition could not be loaded.
pub fn prepare<P: Prompter + ?Sized>(
    options: &SessionOptions,
    prompter: &mut P,
    converters: &ConverterRegistry,
) -> Result<Option<PreparedPrompt>> {
    tracing::info!("Starting to run {}", options.command);

    let spec = match CommandSpec::load(&options.prompts_dir, &options.command) {
        Ok(spec) => spec,
        Err(e) => {
            tracing::error!("{}", e);
            return Ok(None);
        }
    };

    let table = resolve(&options.command, &spec, &options.args, prompter, converters)?;

    tracing::info!("Raw prompt: {}", spec.prompt);
    let prompt = render_prompt(&spec.prompt, &table);
    tracing::info!("{}", prompt);

    let context = render_context(&spec.context, &table);
    tracing::info!("Files to include as context: {:?}", context);

    Ok(Some(PreparedPrompt { prompt, context }))
}

/// Prepare the command, then connect to the assistant and let it execute.
///
/// `connect` is only called once the prompt is ready, so a definition that
/// fails to load aborts before any assistant setup. `shutdown` is called
/// even when execution fails; the execution error wins.
pub fn run<P, C, F>(
    options: &SessionOptions,
    prompter: &mut P,
    converters: &ConverterRegistry,
    connect: F,
) -> Result<SessionOutcome>
where
    P: Prompter + ?Sized,
    C: AssistantClient,
    F: FnOnce() -> Result<C>,
{
    let Some(prepared) = prepare(options, prompter, converters)? else {
        return Ok(SessionOutcome::Aborted);
    };
    let mut client = connect()?;

    tracing::info!("Running the assistant now...");
    client.initialize(&prepared.context)?;
    let executed = client.execute_with_auto_accept(&prepared.prompt);
    let shut_down = client.shutdown();
    executed?;
    shut_down?;

    tracing::info!("Done. The assistant finished its work.");
    Ok(SessionOutcome::Completed)
}

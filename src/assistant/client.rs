//! Assistant client lifecycle and the subprocess implementation.

use super::command::{references, render_command_word};
use super::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// An AI coding assistant driven through three calls, strictly in sequence.
pub trait AssistantClient {
    /// Start a session scoped to `context_paths`.
    fn initialize(&mut self, context_paths: &[String]) -> Result<()>;

    /// Run `prompt`, accepting every change the assistant proposes.
    fn execute_with_auto_accept(&mut self, prompt: &str) -> Result<()>;

    /// End the session.
    fn shutdown(&mut self) -> Result<()>;
}

impl<C: AssistantClient + ?Sized> AssistantClient for &mut C {
    fn initialize(&mut self, context_paths: &[String]) -> Result<()> {
        (**self).initialize(context_paths)
    }

    fn execute_with_auto_accept(&mut self, prompt: &str) -> Result<()> {
        (**self).execute_with_auto_accept(prompt)
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }
}

/// Outcome of one assistant process.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Exit code of the process (None if killed or terminated by a signal).
    pub exit_code: Option<i32>,
    /// Wall-clock duration of the run.
    pub duration: Duration,
    /// Whether the process was killed due to timeout.
    pub timed_out: bool,
    /// The command line that was executed.
    pub command: String,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Runs the assistant as an external command configured by [`AssistantConfig`].
///
/// The process inherits stdout and stderr so the user sees the assistant work.
#[derive(Debug)]
pub struct SubprocessClient {
    config: AssistantConfig,
    command_name: String,
    context: Option<Vec<String>>,
}

impl SubprocessClient {
    /// Client for the command definition `command_name`.
    pub fn new(config: AssistantConfig, command_name: impl Into<String>) -> Self {
        Self {
            config,
            command_name: command_name.into(),
            context: None,
        }
    }

    /// The command line that would run for this prompt and context, shell-quoted.
    pub fn command_line(&self, prompt: &str, context: &[String]) -> Result<String> {
        Ok(shell_words::join(self.build_argv(prompt, context)?))
    }

    /// Expand the configured command into argv for this prompt and context.
    fn build_argv(&self, prompt: &str, context: &[String]) -> Result<Vec<String>> {
        let words = shell_words::split(&self.config.command).map_err(|e| {
            AssistantError::UserError(format!(
                "failed to parse assistant command '{}': {}",
                self.config.command, e
            ))
        })?;

        let variables: HashMap<String, String> = [
            ("prompt", prompt.to_string()),
            ("context", context.join(" ")),
            ("command", self.command_name.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let mut argv = Vec::with_capacity(words.len() + context.len());
        for word in &words {
            if word.trim() == "{context}" {
                argv.extend(context.iter().cloned());
                continue;
            }
            let rendered = render_command_word(word, &variables).map_err(|e| {
                AssistantError::UserError(format!(
                    "invalid assistant command '{}': {}",
                    self.config.command, e
                ))
            })?;
            argv.push(rendered);
        }

        if argv.is_empty() {
            return Err(AssistantError::UserError(format!(
                "assistant command is empty after rendering: '{}'",
                self.config.command
            )));
        }

        Ok(argv)
    }
}

impl AssistantClient for SubprocessClient {
    fn initialize(&mut self, context_paths: &[String]) -> Result<()> {
        tracing::info!("Starting assistant with context: {:?}", context_paths);
        self.context = Some(context_paths.to_vec());
        Ok(())
    }

    fn execute_with_auto_accept(&mut self, prompt: &str) -> Result<()> {
        let context = self.context.as_deref().ok_or_else(|| {
            AssistantError::UserError("assistant executed before it was initialized".to_string())
        })?;

        let argv = self.build_argv(prompt, context)?;
        let prompt_on_stdin = !references(&self.config.command, "prompt");
        let command_line = shell_words::join(&argv);

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(if prompt_on_stdin {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }
        for (key, value) in &self.config.environment {
            command.env(key, value);
        }

        tracing::info!("Running assistant: {}", command_line);
        let start_time = Instant::now();
        let mut child = command.spawn().map_err(|e| {
            AssistantError::AssistantFailed(format!(
                "failed to execute assistant command '{}': {}\n\
                 Fix: ensure the command is installed and in PATH.",
                argv[0], e
            ))
        })?;

        // Feed stdin from a separate thread so a large prompt cannot deadlock
        // against an assistant that is busy writing output.
        let writer = match child.stdin.take() {
            Some(mut stdin) if prompt_on_stdin => {
                let bytes = prompt.as_bytes().to_vec();
                Some(std::thread::spawn(move || match stdin.write_all(&bytes) {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                    _ => Ok(()),
                }))
            }
            _ => None,
        };

        let (exit_code, timed_out) = match self.config.timeout_seconds {
            Some(seconds) => wait_with_timeout(&mut child, Duration::from_secs(seconds))?,
            None => {
                let status = child.wait().map_err(|e| {
                    AssistantError::AssistantFailed(format!(
                        "failed to wait for assistant process: {}",
                        e
                    ))
                })?;
                (status.code(), false)
            }
        };

        if let Some(handle) = writer
            && let Ok(Err(e)) = handle.join()
        {
            tracing::warn!("Failed to pass the prompt to the assistant: {}", e);
        }

        let summary = RunSummary {
            exit_code,
            duration: start_time.elapsed(),
            timed_out,
            command: command_line,
        };
        tracing::info!(
            "Assistant finished in {:.1}s (exit code {:?})",
            summary.duration.as_secs_f64(),
            summary.exit_code
        );

        if summary.timed_out {
            Err(AssistantError::AssistantFailed(format!(
                "assistant timed out after {}s and was killed",
                self.config.timeout_seconds.unwrap_or_default()
            )))
        } else if !summary.is_success() {
            Err(AssistantError::AssistantFailed(format!(
                "'{}' exited with {}",
                summary.command,
                summary
                    .exit_code
                    .map(|code| format!("exit code {}", code))
                    .unwrap_or_else(|| "no exit code (terminated by signal)".to_string())
            )))
        } else {
            Ok(())
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.context.take().is_some() {
            tracing::info!("Assistant session for {} closed", self.command_name);
        }
        Ok(())
    }
}

/// Wait for a child process with timeout.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(Option<i32>, bool)> {
    let start = Instant::now();
    let poll_interval = Duration::from_millis(100);

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    // SIGKILL on Unix, TerminateProcess on Windows.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => {
                return Err(AssistantError::AssistantFailed(format!(
                    "failed to check assistant process status: {}",
                    e
                )));
            }
        }
    }
}

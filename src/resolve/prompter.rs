//! Interactive input for arguments missing from the command line.

use crate::error::{AssistantError, Result};
use std::io::{BufRead, IsTerminal, Stdout, StdinLock, Write};

/// Asks the user for a value. Blocks until an answer is available.
pub trait Prompter {
    /// Show `question` and return the answer without its line terminator.
    fn ask(&mut self, question: &str) -> Result<String>;
}

impl<F> Prompter for F
where
    F: FnMut(&str) -> Result<String>,
{
    fn ask(&mut self, question: &str) -> Result<String> {
        self(question)
    }
}

/// Prompter for this process: an interactive line editor when stdin is a
/// terminal, plain line reads from stdin otherwise (pipes, CI).
pub fn stdio_prompter() -> Box<dyn Prompter> {
    if std::io::stdin().is_terminal() {
        Box::new(InteractivePrompter)
    } else {
        Box::new(TerminalPrompter::stdio())
    }
}

/// Asks on the terminal through `dialoguer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompter;

impl Prompter for InteractivePrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AssistantError::UserError(format!("failed to read answer: {}", e)))
    }
}

/// Line-based prompter over a reader/writer pair.
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        writeln!(self.writer, "{}", question)
            .and_then(|_| self.writer.flush())
            .map_err(|e| AssistantError::UserError(format!("failed to write prompt: {}", e)))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| AssistantError::UserError(format!("failed to read answer: {}", e)))?;

        if read == 0 {
            return Err(AssistantError::UserError(format!(
                "input closed before an answer was given to: {}\n\
                 Fix: pass the value on the command line instead.",
                question
            )));
        }

        let answer = line.strip_suffix('\n').unwrap_or(&line);
        let answer = answer.strip_suffix('\r').unwrap_or(answer);
        Ok(answer.to_string())
    }
}

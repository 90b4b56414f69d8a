use crate::assistant::AssistantClient;
use crate::error::{AssistantError, Result};
use crate::resolve::Prompter;
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Command definition mirroring the reference `test-arguments-and-context` command.
pub(crate) const ARGUMENTS_AND_CONTEXT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<command>
    <argument id="CLASS" alias="class" question="Which class?"/>
    <argument id="METHOD" alias="method" question="Which method?"/>
    <prompt>
        Test method `METHOD` in class `CLASS`.
    </prompt>
    <context>
        <include path="tests"/>
        <include path="src"/>
    </context>
</command>
"#;

/// Command definition with a derived class path variable.
pub(crate) const CLASS_PATH_XML: &str = r#"<command>
    <argument id="CLASS" alias="class" question="Which class?"/>
    <variable id="CLASSFILE" argument="CLASS" converter="resolveClassPath"/>
    <prompt>Write a unit test for CLASS located in CLASSFILE.</prompt>
    <context>
        <include path="$CLASSFILE"/>
        <include path="tests"/>
    </context>
</command>
"#;

/// Composer manifest with overlapping PSR-4 prefixes.
pub(crate) const COMPOSER_JSON: &str = r#"{
    "name": "acme/log",
    "autoload": {
        "psr-4": {
            "Acme\\Log\\Writer\\": "./acme-log-writer/lib/",
            "": "/path/"
        }
    },
    "autoload-dev": {
        "psr-4": {
            "Acme\\Tests\\": "tests/"
        }
    }
}
"#;

/// Create a prompts directory holding the given `(command, xml)` definitions.
pub(crate) fn create_prompts_dir(commands: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, xml) in commands {
        write_file(temp_dir.path(), &format!("{}.xml", name), xml);
    }
    temp_dir
}

pub(crate) fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

pub(crate) fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Prompter that answers from a fixed script and records every question.
#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub(crate) questions: Vec<String>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            questions: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| AssistantError::UserError(format!("no scripted answer for: {}", question)))
    }
}

/// One lifecycle call observed by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ClientCall {
    Initialize(Vec<String>),
    Execute(String),
    Shutdown,
}

/// Assistant client that records the lifecycle instead of running anything.
#[derive(Debug, Default)]
pub(crate) struct RecordingClient {
    pub(crate) calls: Vec<ClientCall>,
    pub(crate) fail_execute: bool,
}

impl AssistantClient for RecordingClient {
    fn initialize(&mut self, context_paths: &[String]) -> Result<()> {
        self.calls.push(ClientCall::Initialize(context_paths.to_vec()));
        Ok(())
    }

    fn execute_with_auto_accept(&mut self, prompt: &str) -> Result<()> {
        self.calls.push(ClientCall::Execute(prompt.to_string()));
        if self.fail_execute {
            return Err(AssistantError::AssistantFailed("scripted failure".to_string()));
        }
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.calls.push(ClientCall::Shutdown);
        Ok(())
    }
}

/// In-memory log sink shared between a subscriber and the test.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a scoped subscriber and return its result plus every
/// warning message logged meanwhile, in order.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let warnings = buffer
        .contents()
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("WARN"))
        .map(|message| message.trim().to_string())
        .collect();
    (result, warnings)
}

//! Assistant configuration (`assistant.yaml`).
//!
//! # File Format
//!
//! ```yaml
//! command: "mentat {context}"
//! timeout_seconds: 3600
//! working_dir: "."
//! environment:
//!   MENTAT_AUTO_ACCEPT: "1"
//! ```
//!
//! # Command Placeholders
//!
//! The command is split into words like a shell would, then each word is
//! rendered:
//!
//! - `{prompt}` - The rendered prompt. When no word uses it, the prompt is
//!   written to the assistant's stdin instead.
//! - `{context}` - As a whole word: one argument per context path.
//!   Inside a longer word: the paths joined by spaces.
//! - `{command}` - Name of the command definition being run.

use crate::error::{AssistantError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Command used when no configuration file exists.
pub const DEFAULT_COMMAND: &str = "mentat {context}";

/// How to launch the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Command template with `{prompt}`, `{context}` and `{command}` placeholders.
    #[serde(default = "default_command")]
    pub command: String,

    /// Seconds to wait before killing the assistant. Waits indefinitely when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Working directory for the assistant process (defaults to the current one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Environment variables to set for the assistant process.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environment: HashMap<String, String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_seconds: None,
            working_dir: None,
            environment: HashMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_command() -> String {
    DEFAULT_COMMAND.to_string()
}

impl AssistantConfig {
    /// Load the configuration from a YAML file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err` if the file exists but cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::UserError(format!(
                "failed to read assistant config '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map(Some)
    }

    /// Load the configuration, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_default())
    }

    /// Parse the configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        let config: AssistantConfig = if yaml.trim().is_empty() {
            AssistantConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                AssistantError::UserError(format!("failed to parse assistant config: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validation rules:
    /// - The command must not be empty and must split into words
    /// - The timeout, when set, must be positive
    pub fn validate(&self) -> Result<()> {
        let words = shell_words::split(&self.command).map_err(|e| {
            AssistantError::UserError(format!(
                "assistant config validation failed: cannot parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                self.command, e
            ))
        })?;

        if words.is_empty() {
            return Err(AssistantError::UserError(
                "assistant config validation failed: command must not be empty".to_string(),
            ));
        }

        if self.timeout_seconds == Some(0) {
            return Err(AssistantError::UserError(
                "assistant config validation failed: timeout_seconds must be greater than 0"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_file;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AssistantConfig::default();
        assert_eq!(config.command, DEFAULT_COMMAND);
        assert_eq!(config.timeout_seconds, None);
        assert!(config.environment.is_empty());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = AssistantConfig::from_yaml("").unwrap();
        assert_eq!(config.command, DEFAULT_COMMAND);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
command: "aider --yes {context} --message {prompt}"
timeout_seconds: 900
working_dir: /srv/project
environment:
  AIDER_AUTO_COMMITS: "false"
"#;
        let config = AssistantConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.command, "aider --yes {context} --message {prompt}");
        assert_eq!(config.timeout_seconds, Some(900));
        assert_eq!(config.working_dir, Some(PathBuf::from("/srv/project")));
        assert_eq!(
            config.environment.get("AIDER_AUTO_COMMITS").map(String::as_str),
            Some("false")
        );
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let config = AssistantConfig::from_yaml("command: mentat\nfuture_option: 42\n").unwrap();
        assert!(config.extra.contains_key("future_option"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = AssistantConfig::from_yaml("timeout_seconds: 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = AssistantConfig::from_yaml("command: \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("command must not be empty"));
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        let err = AssistantConfig::from_yaml("command: \"mentat 'oops\"\n").unwrap_err();
        assert!(err.to_string().contains("cannot parse command"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assistant.yaml");
        assert!(AssistantConfig::load(&path).unwrap().is_none());
        assert_eq!(
            AssistantConfig::load_or_default(&path).unwrap().command,
            DEFAULT_COMMAND
        );
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "assistant.yaml", "command: \"cat\"\n");
        let config = AssistantConfig::load(dir.path().join("assistant.yaml"))
            .unwrap()
            .unwrap();
        assert_eq!(config.command, "cat");
    }
}

//! `{placeholder}` rendering for the assistant command line.
//!
//! - `{name}` - Substitutes the value of `name` (surrounding spaces ignored)
//! - `{{` / `}}` - Literal braces
//!
//! Unlike prompt rendering, an unknown placeholder is an error: a typo in the
//! command line should not silently launch the assistant with a blank argument.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for command template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandTemplateError {
    #[error("undefined variable '{name}' at position {position} in command template")]
    UndefinedVariable { name: String, position: usize },

    #[error("unmatched '{{' at position {position} in command template")]
    UnmatchedBrace { position: usize },

    #[error("empty variable name '{{}}' at position {position} in command template")]
    EmptyVariableName { position: usize },
}

/// Render `template`, substituting values from `variables`.
pub fn render_command_word(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, CommandTemplateError> {
    render_with(template, |name| variables.get(name).cloned())
}

/// Whether `template` contains the placeholder `{name}`.
pub fn references(template: &str, name: &str) -> bool {
    let mut found = false;
    let _ = render_with(template, |candidate| {
        found |= candidate == name;
        Some(String::new())
    });
    found
}

fn render_with<F>(template: &str, mut lookup: F) -> Result<String, CommandTemplateError>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(found) = template[pos..].find(['{', '}']) {
        let start = pos + found;
        out.push_str(&template[pos..start]);
        let tail = &template[start..];

        if tail.starts_with("{{") {
            out.push('{');
            pos = start + 2;
        } else if tail.starts_with("}}") {
            out.push('}');
            pos = start + 2;
        } else if tail.starts_with('}') {
            out.push('}');
            pos = start + 1;
        } else {
            let close = tail
                .find('}')
                .ok_or(CommandTemplateError::UnmatchedBrace { position: start })?;
            let name = tail[1..close].trim();
            if name.is_empty() {
                return Err(CommandTemplateError::EmptyVariableName { position: start });
            }
            let value = lookup(name).ok_or_else(|| CommandTemplateError::UndefinedVariable {
                name: name.to_string(),
                position: start,
            })?;
            out.push_str(&value);
            pos = start + close + 1;
        }
    }

    out.push_str(&template[pos..]);
    Ok(out)
}

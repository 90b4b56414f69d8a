//! Loading and validating command definitions from XML.

use super::model::{ArgumentDecl, CommandSpec, ContextInclude, VariableDecl};
use crate::error::{AssistantError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use xmltree::{Element, XMLNode};

/// Aliases become `--{alias}` flags; hyphens are allowed after the first character.
static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("Invalid alias regex"));

impl CommandSpec {
    /// Path of the definition file for `command` inside `prompts_dir`.
    pub fn path_for(prompts_dir: &Path, command: &str) -> PathBuf {
        prompts_dir.join(format!("{}.xml", command))
    }

    /// Load the definition of `command` from `prompts_dir`.
    ///
    /// # Returns
    ///
    /// * `Err(AssistantError::NotFound)` - `{prompts_dir}/{command}.xml` does not exist
    /// * `Err(AssistantError::MalformedSpec)` - the document is not usable
    pub fn load<P: AsRef<Path>>(prompts_dir: P, command: &str) -> Result<Self> {
        let path = Self::path_for(prompts_dir.as_ref(), command);

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AssistantError::NotFound { path: path.clone() },
            _ => AssistantError::UserError(format!(
                "failed to read command definition '{}': {}",
                path.display(),
                e
            )),
        })?;

        Self::from_xml(&content)
    }

    /// Parse a command definition from an XML string.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = Element::parse(xml.as_bytes())
            .map_err(|e| AssistantError::MalformedSpec(e.to_string()))?;

        let arguments = children(&root, "argument")
            .map(|el| {
                Ok(ArgumentDecl {
                    id: required_attr(el, "id")?,
                    alias: required_attr(el, "alias")?,
                    question: required_attr(el, "question")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let variables = children(&root, "variable")
            .map(|el| {
                Ok(VariableDecl {
                    id: required_attr(el, "id")?,
                    argument: required_attr(el, "argument")?,
                    converter: required_attr(el, "converter")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let prompt = root
            .get_child("prompt")
            .ok_or_else(|| {
                AssistantError::MalformedSpec("missing required <prompt> element".to_string())
            })?
            .get_text()
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        let context = match root.get_child("context") {
            Some(context_el) => children(context_el, "include")
                .map(|el| {
                    Ok(ContextInclude {
                        path: required_attr(el, "path")?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => {
                tracing::info!("No <context> element found; no files will be included as context");
                Vec::new()
            }
        };

        let spec = CommandSpec {
            arguments,
            variables,
            prompt,
            context,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the structural rules later stages rely on.
    ///
    /// - Argument and variable ids are non-empty and unique across both kinds
    /// - Aliases are unique and usable as `--{alias}` flags
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut aliases = HashSet::new();

        for argument in &self.arguments {
            if argument.id.is_empty() {
                return Err(AssistantError::MalformedSpec(
                    "<argument> id must not be empty".to_string(),
                ));
            }
            if !ids.insert(argument.id.as_str()) {
                return Err(AssistantError::MalformedSpec(format!(
                    "duplicate argument id '{}'",
                    argument.id
                )));
            }
            if !ALIAS_REGEX.is_match(&argument.alias) {
                return Err(AssistantError::MalformedSpec(format!(
                    "alias '{}' of argument '{}' is not a valid flag name \
                     (letters, digits, '_' and '-', not starting with '-')",
                    argument.alias, argument.id
                )));
            }
            if !aliases.insert(argument.alias.as_str()) {
                return Err(AssistantError::MalformedSpec(format!(
                    "duplicate argument alias '{}'",
                    argument.alias
                )));
            }
        }

        for variable in &self.variables {
            if variable.id.is_empty() {
                return Err(AssistantError::MalformedSpec(
                    "<variable> id must not be empty".to_string(),
                ));
            }
            if !ids.insert(variable.id.as_str()) {
                return Err(AssistantError::MalformedSpec(format!(
                    "variable id '{}' is already declared",
                    variable.id
                )));
            }
        }

        Ok(())
    }
}

/// Direct child elements of `parent` named `name`, in document order.
fn children<'a>(parent: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    parent.children.iter().filter_map(move |node| match node {
        XMLNode::Element(el) if el.name == name => Some(el),
        _ => None,
    })
}

fn required_attr(el: &Element, attr: &str) -> Result<String> {
    el.attributes.get(attr).cloned().ok_or_else(|| {
        AssistantError::MalformedSpec(format!(
            "<{}> element is missing the '{}' attribute",
            el.name, attr
        ))
    })
}

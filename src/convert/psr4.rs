//! PSR-4 class path resolution from `composer.json`.
//!
//! See <https://www.php-fig.org/psr/psr-4/> and
//! <https://getcomposer.org/doc/04-schema.md#psr-4>.

use super::Converter;
use crate::error::{AssistantError, Result, Warning};
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;

/// Name under which [`ClassPathConverter`] is registered.
pub const RESOLVE_CLASS_PATH: &str = "resolveClassPath";

const PHP_EXTENSION: &str = ".php";

/// The parts of a Composer manifest we read. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct ComposerManifest {
    #[serde(default)]
    autoload: Option<AutoloadSection>,

    #[serde(default, rename = "autoload-dev")]
    autoload_dev: Option<AutoloadSection>,
}

#[derive(Debug, Default, Deserialize)]
struct AutoloadSection {
    #[serde(default, rename = "psr-4")]
    psr4: Option<IndexMap<String, Psr4Target>>,
}

/// Composer allows a single directory or a list of fallbacks per prefix.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Psr4Target {
    Dir(String),
    Dirs(Vec<String>),
}

impl Psr4Target {
    fn into_base_dir(self) -> Option<String> {
        match self {
            Psr4Target::Dir(dir) => Some(dir),
            Psr4Target::Dirs(dirs) => dirs.into_iter().next(),
        }
    }
}

/// Namespace prefix to base directory, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    entries: IndexMap<String, String>,
}

impl NamespaceMap {
    /// Load the PSR-4 namespaces declared in a `composer.json` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AssistantError::UserError(format!("{} not found", path.display())),
            _ => AssistantError::UserError(format!(
                "failed to read '{}': {}",
                path.display(),
                e
            )),
        })?;

        Self::from_composer_json(&content)
    }

    /// Build the map from `composer.json` content.
    ///
    /// `autoload-dev` entries are read first and then overlaid by `autoload`
    /// entries, so production directories win when both declare a prefix.
    pub fn from_composer_json(json: &str) -> Result<Self> {
        let manifest: ComposerManifest = serde_json::from_str(json).map_err(|e| {
            AssistantError::UserError(format!("failed to parse composer manifest: {}", e))
        })?;

        let mut map = NamespaceMap::default();
        for (section, name) in [
            (manifest.autoload_dev, "autoload-dev"),
            (manifest.autoload, "autoload"),
        ] {
            match section.and_then(|s| s.psr4) {
                Some(psr4) => {
                    for (prefix, target) in psr4 {
                        if let Some(base_dir) = target.into_base_dir() {
                            map.insert(prefix, base_dir);
                        }
                    }
                }
                None => tracing::info!("Didn't find {}.psr-4 section in composer manifest", name),
            }
        }

        tracing::info!("Loaded {} PSR-4 namespace prefixes", map.len());
        Ok(map)
    }

    /// Add or replace the base directory for `prefix`, keeping its original position.
    pub fn insert(&mut self, prefix: impl Into<String>, base_dir: impl Into<String>) {
        self.entries.insert(prefix.into(), base_dir.into());
    }

    /// Number of configured prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no prefix is configured.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the file path of a fully-qualified class name such as `\Acme\Log\Writer\File_Writer`.
    ///
    /// The longest matching prefix wins; among equally long prefixes the first
    /// one in configuration order is kept. The empty prefix matches every
    /// class. Returns `None` when no prefix matches.
    pub fn resolve_class_path(&self, fqcn: &str) -> Option<String> {
        let class = fqcn.strip_prefix('\\').unwrap_or(fqcn);

        let (prefix, base_dir) = self
            .entries
            .iter()
            .filter(|(prefix, _)| class.starts_with(prefix.as_str()))
            .fold(None, |best: Option<(&String, &String)>, candidate| match best {
                Some((longest, _)) if longest.len() >= candidate.0.len() => best,
                _ => Some(candidate),
            })?;

        let remainder = class[prefix.len()..].replace('\\', "/");
        Some(format!("{}{}{}", base_dir, remainder, PHP_EXTENSION))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NamespaceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = NamespaceMap::default();
        for (prefix, base_dir) in iter {
            map.insert(prefix, base_dir);
        }
        map
    }
}

/// The `resolveClassPath` converter.
///
/// Without a usable namespace map every conversion yields `None`.
#[derive(Debug, Clone, Default)]
pub struct ClassPathConverter {
    namespaces: Option<NamespaceMap>,
}

impl ClassPathConverter {
    /// Converter backed by an already built namespace map.
    pub fn new(namespaces: NamespaceMap) -> Self {
        Self {
            namespaces: Some(namespaces),
        }
    }

    /// Read namespaces from `path`, warning once when the file is missing or unreadable.
    pub fn from_composer_file(path: &Path) -> Self {
        match NamespaceMap::load(path) {
            Ok(namespaces) => Self::new(namespaces),
            Err(e) => {
                Warning::NamespaceMapUnavailable {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                }
                .emit();
                Self { namespaces: None }
            }
        }
    }
}

impl Converter for ClassPathConverter {
    fn name(&self) -> &str {
        RESOLVE_CLASS_PATH
    }

    fn convert(&self, value: &str) -> Option<String> {
        let namespaces = self.namespaces.as_ref()?;
        let class_path = namespaces.resolve_class_path(value);
        tracing::info!("Resolving class path for {}: {:?}", value, class_path);
        class_path
    }
}

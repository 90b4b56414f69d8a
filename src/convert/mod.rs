//! Converters derive a variable's value from a resolved argument.
//!
//! Converters are looked up by the name used in a `<variable converter="...">`
//! declaration. New converters are added by registering another
//! [`Converter`] with the [`ConverterRegistry`]; call sites only ever pass a
//! name and a value.

mod psr4;

pub use psr4::{ClassPathConverter, NamespaceMap};

use crate::error::Warning;
use indexmap::IndexMap;
use std::path::Path;

/// A named function from one resolved value to another.
pub trait Converter {
    /// Name referenced by `<variable converter="...">`.
    fn name(&self) -> &str;

    /// Derive a value, or `None` when no value can be computed.
    fn convert(&self, value: &str) -> Option<String>;
}

/// Converters keyed by name.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: IndexMap<String, Box<dyn Converter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in converters, reading namespaces from `composer_json`.
    pub fn with_defaults(composer_json: &Path) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ClassPathConverter::from_composer_file(composer_json)));
        registry
    }

    /// Add a converter, replacing any converter registered under the same name.
    pub fn register(&mut self, converter: Box<dyn Converter>) {
        self.converters
            .insert(converter.name().to_string(), converter);
    }

    /// Run the converter called `name` on `value`.
    ///
    /// Unknown names log a warning and produce `None`.
    pub fn convert(&self, name: &str, value: &str) -> Option<String> {
        match self.converters.get(name) {
            Some(converter) => converter.convert(value),
            None => {
                Warning::UnknownConverter {
                    name: name.to_string(),
                    available: self.names().collect::<Vec<_>>().join(", "),
                }
                .emit();
                None
            }
        }
    }

    /// Names of the registered converters, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(|k| k.as_str())
    }
}

//! In-memory model of a command definition.

/// A parsed command definition. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Declared arguments, in document order.
    pub arguments: Vec<ArgumentDecl>,

    /// Derived variables, in document order.
    pub variables: Vec<VariableDecl>,

    /// Prompt template with surrounding whitespace trimmed.
    pub prompt: String,

    /// Context includes, in document order. Empty when `<context>` is absent.
    pub context: Vec<ContextInclude>,
}

/// An `<argument>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDecl {
    /// Placeholder token replaced in the prompt.
    pub id: String,

    /// Flag name on the command line (`--{alias}`).
    pub alias: String,

    /// Question asked when the flag is missing.
    pub question: String,
}

/// A `<variable>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    /// Placeholder token replaced in the prompt.
    pub id: String,

    /// Id of the argument whose value feeds the converter.
    pub argument: String,

    /// Name of the converter to run.
    pub converter: String,
}

/// An `<include>` element inside `<context>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInclude {
    /// Literal path or glob, or `$` followed by a placeholder id.
    pub path: String,
}

impl ContextInclude {
    /// Sentinel marking a reference to a resolved placeholder.
    pub const REFERENCE_SENTINEL: char = '$';

    /// Returns the referenced placeholder id if this include is a `$id` reference.
    pub fn reference(&self) -> Option<&str> {
        self.path.strip_prefix(Self::REFERENCE_SENTINEL)
    }
}

//! Rendering of the prompt template and the context include list.
//!
//! Substitution is plain, repeated substring replacement: for each entry of
//! the replacement table, in insertion order, every occurrence of the
//! placeholder id in the current text is replaced by its value. There is no
//! tokenizer and no escaping. Two consequences are part of the contract:
//!
//! - an id that is a substring of another id also replaces inside the longer one
//!   when it comes first in the table;
//! - a value containing a later id is itself substituted again.
//!
//! Ids missing from the table are left in the text as written.

use crate::error::Warning;
use crate::resolve::ReplacementTable;
use crate::spec::ContextInclude;

/// Substitute every table entry into `template`, in table order.
pub fn render_prompt(template: &str, table: &ReplacementTable) -> String {
    table
        .iter()
        .fold(template.to_string(), |text, (id, value)| {
            text.replace(id, value)
        })
}

/// Resolve the context includes to the paths handed to the assistant.
///
/// `$id` includes are replaced wholesale by the value of `id`; when `id` has
/// no value the include is dropped with a warning. Every other include is
/// passed through as written. Order is preserved and nothing is deduplicated.
pub fn render_context(includes: &[ContextInclude], table: &ReplacementTable) -> Vec<String> {
    includes
        .iter()
        .filter_map(|include| match include.reference() {
            Some(id) => match table.get(id) {
                Some(value) => Some(value.to_string()),
                None => {
                    Warning::UnresolvedContextReference {
                        path: include.path.clone(),
                    }
                    .emit();
                    None
                }
            },
            None => Some(include.path.clone()),
        })
        .collect()
}

//! Error and warning types for the assistant CLI.
//!
//! Errors use thiserror and carry user-actionable messages. Warnings are
//! non-fatal conditions that degrade the result (an unresolved placeholder,
//! a dropped context entry) and are only ever logged.

use crate::exit_codes;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for assistant operations.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The command definition file does not exist.
    #[error("Command definition file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The command definition is not well-formed or violates its structure.
    #[error("Error parsing command definition: {0}")]
    MalformedSpec(String),

    /// Forwarded flags do not match the declared arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// I/O, configuration, or input problem the user has to fix.
    #[error("{0}")]
    UserError(String),

    /// The external assistant could not be run or reported failure.
    #[error("Assistant failed: {0}")]
    AssistantFailed(String),
}

impl AssistantError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AssistantError::NotFound { .. } => exit_codes::USER_ERROR,
            AssistantError::MalformedSpec(_) => exit_codes::USER_ERROR,
            AssistantError::InvalidArguments(_) => exit_codes::INVALID_ARGUMENTS,
            AssistantError::UserError(_) => exit_codes::USER_ERROR,
            AssistantError::AssistantFailed(_) => exit_codes::ASSISTANT_FAILURE,
        }
    }
}

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Non-fatal conditions reported while resolving and rendering a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A variable could not be computed; its placeholder stays unresolved.
    UnresolvedVariable {
        /// Variable id.
        variable: String,
        /// Why no value is available.
        reason: UnresolvedReason,
    },

    /// A `$id` context include has no value in the replacement table.
    UnresolvedContextReference {
        /// The include path as declared, including the `$`.
        path: String,
    },

    /// No converter is registered under this name.
    UnknownConverter {
        /// Requested converter name.
        name: String,
        /// Registered converter names, comma separated.
        available: String,
    },

    /// The namespace configuration could not be loaded; class paths resolve to nothing.
    NamespaceMapUnavailable {
        /// Path of the configuration document.
        path: PathBuf,
        /// Underlying problem.
        detail: String,
    },
}

/// Why a variable was left unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The argument feeding the variable has no value.
    MissingArgument(String),
    /// The converter produced no value.
    NoConverterResult(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedVariable { variable, reason } => match reason {
                UnresolvedReason::MissingArgument(argument) => write!(
                    f,
                    "Missing argument {} for variable {}",
                    argument, variable
                ),
                UnresolvedReason::NoConverterResult(converter) => write!(
                    f,
                    "Couldn't compute value of variable {} (converter {})",
                    variable, converter
                ),
            },
            Warning::UnresolvedContextReference { path } => write!(
                f,
                "Couldn't determine value of {}. Not adding to context.",
                path
            ),
            Warning::UnknownConverter { name, available } => write!(
                f,
                "Unknown converter {} (available: {})",
                name, available
            ),
            Warning::NamespaceMapUnavailable { path, detail } => write!(
                f,
                "{} unavailable ({}). Can't resolve class paths.",
                path.display(),
                detail
            ),
        }
    }
}

impl Warning {
    /// Emit this warning through the log.
    pub fn emit(&self) {
        tracing::warn!("{}", self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_errors_map_to_user_error() {
        let err = AssistantError::NotFound {
            path: PathBuf::from("prompts/missing.xml"),
        };
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = AssistantError::MalformedSpec("no <prompt> element".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn invalid_arguments_has_its_own_exit_code() {
        let err = AssistantError::InvalidArguments("unexpected --bogus".to_string());
        assert_eq!(err.exit_code(), exit_codes::INVALID_ARGUMENTS);
    }

    #[test]
    fn assistant_failure_has_its_own_exit_code() {
        let err = AssistantError::AssistantFailed("exit status 1".to_string());
        assert_eq!(err.exit_code(), exit_codes::ASSISTANT_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = AssistantError::NotFound {
            path: PathBuf::from("prompts/missing.xml"),
        };
        assert_eq!(
            err.to_string(),
            "Command definition file not found: prompts/missing.xml"
        );

        let err = AssistantError::MalformedSpec("unexpected end of stream".to_string());
        assert_eq!(
            err.to_string(),
            "Error parsing command definition: unexpected end of stream"
        );
    }

    #[test]
    fn warning_messages_name_the_placeholder() {
        let warning = Warning::UnresolvedVariable {
            variable: "CLASSFILE".to_string(),
            reason: UnresolvedReason::MissingArgument("CLASS".to_string()),
        };
        assert_eq!(
            warning.to_string(),
            "Missing argument CLASS for variable CLASSFILE"
        );

        let warning = Warning::UnresolvedContextReference {
            path: "$CLASSFILE".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Couldn't determine value of $CLASSFILE. Not adding to context."
        );
    }
}

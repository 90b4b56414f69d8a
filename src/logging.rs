//! Logging setup.
//!
//! Logging is configured once at process start from an explicit
//! [`LogConfig`]. Messages go to stdout as `LEVEL message`; `RUST_LOG`
//! overrides the level chosen on the command line.

use crate::error::{AssistantError, Result};
use tracing_subscriber::EnvFilter;

/// Logging options taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Include informational messages, not only warnings and errors.
    pub verbose: bool,
}

impl LogConfig {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Filter directive used when `RUST_LOG` is not set.
    pub fn default_directive(&self) -> &'static str {
        if self.verbose { "info" } else { "warn" }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| AssistantError::UserError(format!("failed to initialize logging: {}", e)))
}

//! The external AI coding assistant.
//!
//! The assistant is opaque: it receives the context paths and the rendered
//! prompt through the [`AssistantClient`] lifecycle (`initialize`,
//! `execute_with_auto_accept`, `shutdown`). [`SubprocessClient`] runs it as
//! an external command configured in `assistant.yaml`.

mod client;
mod command;
mod config;

pub use client::{AssistantClient, SubprocessClient};
pub use config::AssistantConfig;

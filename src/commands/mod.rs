//! Feature-Service Command Wrappers
//!
//! Frontend bindings to the core client, organized by domain. Each call
//! builds a fresh client from the loaded configuration.

mod config;
mod project;

// Re-export all public items
pub use config::*;
pub use project::*;

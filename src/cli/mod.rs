//! CLI command implementations
//!
//! This module contains all CLI command handlers, organized by category:
//! - `simple`: Inspection commands (check, fixture, sexp)
//! - `config`: Schema command
//! - `util`: Shared utility functions

pub mod config;
pub mod simple;
pub mod util;

// Re-export all command functions for convenient access
pub use config::cmd_schema;
pub use simple::{cmd_check, cmd_fixture, cmd_sexp};

/// How a successful command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    /// Diagnostics were reported, or a fixture did not match
    Findings,
}

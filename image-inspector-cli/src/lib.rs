//! image-inspector CLI library.
//!
//! Exposes argument parsing, command handlers and output rendering so the
//! binary stays a thin entry point and integration tests can drive commands
//! directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

//! Command-line front end for dimensionar
//!
//! Handlers print results to stdout and return `Err(String)` for the binary
//! to report.

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

pub use crate::config::Cli;

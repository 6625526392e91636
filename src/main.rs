//! Dimensionar CLI
//!
//! # Usage
//!
//! ```bash
//! # Recommend hardware for a 70B model under a budget
//! dimensionar recommend --params 70 --budget 40000
//!
//! # Utilization of a catalog device
//! dimensionar utilization --needed-gb 16 --device rtx-4090 --safety
//!
//! # Rank the catalog for training
//! dimensionar rate --workload training
//!
//! # Use a custom catalog and engine config
//! dimensionar rate --catalog devices.yaml --config engine.yaml
//! ```

use clap::Parser;
use dimensionar::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.quiet, cli.verbose);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.tracing_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

//! CLI command implementations

mod analysis;
mod breakdown;
mod fragmentation;
mod recommend;
mod sizing;

#[cfg(test)]
mod tests;

use crate::catalog::DeviceCatalog;
use crate::cli::LogLevel;
use crate::config::{load_config, Cli, Command, EngineConfig, OutputFormat};
use serde::Serialize;

/// Config and catalog shared by every command.
pub(crate) struct Context {
    pub config: EngineConfig,
    pub catalog: DeviceCatalog,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self, String> {
        let config = match &cli.config {
            Some(path) => load_config(path).map_err(|e| format!("Config error: {e}"))?,
            None => EngineConfig::default(),
        };
        let catalog = match &cli.catalog {
            Some(path) => DeviceCatalog::load(path),
            None => DeviceCatalog::builtin(),
        }
        .map_err(|e| format!("Catalog error: {e}"))?;

        tracing::debug!(devices = catalog.len(), "catalog ready");
        Ok(Self { config, catalog })
    }
}

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);
    let ctx = Context::load(&cli)?;

    match cli.command {
        Command::Recommend(args) => recommend::run_recommend(args, &ctx, log_level),
        Command::Utilization(args) => sizing::run_utilization(args, &ctx, log_level),
        Command::MultiDevice(args) => sizing::run_multi_device(args, &ctx, log_level),
        Command::Breakdown(args) => breakdown::run_breakdown(args, &ctx, log_level),
        Command::Rate(args) => analysis::run_rate(args, &ctx, log_level),
        Command::Compare(args) => analysis::run_compare(args, &ctx, log_level),
        Command::Predict(args) => analysis::run_predict(args, &ctx, log_level),
        Command::Fragmentation(args) => fragmentation::run_fragmentation(args, log_level),
    }
}

/// Print `value` as JSON or YAML. Returns `false` for text output.
pub(crate) fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool, String> {
    match format {
        OutputFormat::Text => Ok(false),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
            Ok(true)
        }
    }
}

/// Print validation warnings at verbose level.
pub(crate) fn log_warnings(level: LogLevel, warnings: &[String]) {
    for warning in warnings {
        crate::cli::logging::log(level, LogLevel::Verbose, &format!("  warning: {warning}"));
    }
}

//! Core CLI types - Cli, Command, and sizing argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::analysis::{CompareArgs, FragmentationArgs, PredictArgs, RateArgs};
use super::types::{ModelArgs, OutputFormat};
use crate::workload::{Precision, Workload};

/// Dimensionar: accelerator memory sizing and device recommendation
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "dimensionar")]
#[command(version)]
#[command(
    about = "Estimate accelerator memory utilization, rate devices and recommend hardware for LLM workloads"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration file (YAML)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Device catalog file (YAML); the built-in catalog is used otherwise
    #[arg(long, global = true, value_name = "CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Recommend devices for a model or memory requirement
    Recommend(RecommendArgs),

    /// Utilization of one device by a memory requirement
    Utilization(UtilizationArgs),

    /// Scaling of a requirement across several identical devices
    MultiDevice(MultiDeviceArgs),

    /// Memory breakdown of a model
    Breakdown(BreakdownArgs),

    /// Rate and rank devices for a workload
    Rate(RateArgs),

    /// Compare two devices
    Compare(CompareArgs),

    /// Predict performance of a device for a model
    Predict(PredictArgs),

    /// Predict fragmentation from an allocation history
    Fragmentation(FragmentationArgs),
}

/// Arguments for the recommend command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RecommendArgs {
    /// Model size in billions of parameters
    #[arg(long, value_name = "BILLIONS", required_unless_present = "memory_gb")]
    pub params: Option<f64>,

    /// Memory requirement in GB, instead of estimating it from a model
    #[arg(long, conflicts_with = "params")]
    pub memory_gb: Option<f64>,

    /// Weight precision
    #[arg(long, default_value = "fp16")]
    pub precision: Precision,

    /// Batch size
    #[arg(long, default_value_t = 1)]
    pub batch_size: u32,

    /// Sequence length in tokens
    #[arg(long, default_value_t = 2048)]
    pub seq_len: u32,

    /// Workload (inference, training, mixed)
    #[arg(short, long, default_value = "inference")]
    pub workload: Workload,

    /// Maximum total cost in USD
    #[arg(short, long)]
    pub budget: Option<f64>,

    /// Maximum number of recommendations
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the utilization command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct UtilizationArgs {
    /// Memory needed in GB
    #[arg(long)]
    pub needed_gb: f64,

    /// Device capacity in GB
    #[arg(long, required_unless_present = "device", conflicts_with = "device")]
    pub capacity_gb: Option<f64>,

    /// Catalog device id to take the capacity from
    #[arg(short, long)]
    pub device: Option<String>,

    /// Also report the safety-margin analysis
    #[arg(long)]
    pub safety: bool,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the multi-device command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct MultiDeviceArgs {
    /// Memory needed in GB
    #[arg(long)]
    pub needed_gb: f64,

    /// Capacity of each device in GB
    #[arg(long, required_unless_present = "device", conflicts_with = "device")]
    pub per_device_gb: Option<f64>,

    /// Catalog device id to take the capacity from
    #[arg(short, long)]
    pub device: Option<String>,

    /// Number of devices; the smallest fitting count is searched otherwise
    #[arg(short, long)]
    pub count: Option<u32>,

    /// Largest device count searched
    #[arg(long, default_value_t = 8)]
    pub max_devices: u32,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the breakdown command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Workload (inference, training, mixed)
    #[arg(short, long, default_value = "inference")]
    pub workload: Workload,

    /// Break down the capacity of this catalog device instead
    #[arg(short, long)]
    pub device: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Parse arguments from an iterator (used by tests)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

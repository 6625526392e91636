//! Device analysis arguments - rating, comparison, prediction, fragmentation

use clap::Parser;

use super::types::{ModelArgs, OutputFormat};
use crate::utilization::DeallocationPattern;
use crate::workload::Workload;

/// Arguments for the rate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct RateArgs {
    /// Device ids to rate; all catalog devices when omitted
    #[arg(value_name = "DEVICE")]
    pub devices: Vec<String>,

    /// Workload (inference, training, mixed)
    #[arg(short, long, default_value = "inference")]
    pub workload: Workload,

    /// Only show the best device priced within this budget (USD)
    #[arg(short, long)]
    pub budget: Option<f64>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the compare command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CompareArgs {
    /// First device id
    #[arg(value_name = "DEVICE_A")]
    pub device_a: String,

    /// Second device id
    #[arg(value_name = "DEVICE_B")]
    pub device_b: String,

    /// Workload (inference, training, mixed)
    #[arg(short, long, default_value = "inference")]
    pub workload: Workload,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct PredictArgs {
    /// Device id
    #[arg(value_name = "DEVICE")]
    pub device: String,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Also report throughput relative to this device
    #[arg(long, value_name = "DEVICE")]
    pub relative_to: Option<String>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the fragmentation command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct FragmentationArgs {
    /// Observed allocation sizes in MB (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub sizes_mb: Vec<f64>,

    /// Frequency of each size (comma-separated, uniform when omitted)
    #[arg(long, value_delimiter = ',')]
    pub frequencies: Vec<f64>,

    /// Deallocation pattern (sequential, random)
    #[arg(long, default_value = "sequential")]
    pub pattern: DeallocationPattern,

    /// Peak memory in use as a fraction of capacity
    #[arg(long, default_value_t = 0.7)]
    pub peak_ratio: f64,

    /// Also place one allocation per size on a device of this capacity (GB)
    #[arg(long, value_name = "GB")]
    pub simulate_gb: Option<f64>,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

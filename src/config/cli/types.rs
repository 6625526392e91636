//! Shared CLI argument types.

use crate::requirement::ModelSpec;
use crate::workload::Precision;
use clap::Args;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {s}. Valid formats: text, json, yaml"
            )),
        }
    }
}

/// Model description shared by several commands
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ModelArgs {
    /// Model size in billions of parameters
    #[arg(long, value_name = "BILLIONS")]
    pub params: f64,

    /// Weight precision (fp32, fp16, bf16, fp8, int8, int4)
    #[arg(long, default_value = "fp16")]
    pub precision: Precision,

    /// Batch size
    #[arg(long, default_value_t = 1)]
    pub batch_size: u32,

    /// Sequence length in tokens
    #[arg(long, default_value_t = 2048)]
    pub seq_len: u32,
}

impl ModelArgs {
    pub fn to_spec(&self) -> ModelSpec {
        ModelSpec::new(self.params)
            .with_precision(self.precision)
            .with_batch_size(self.batch_size)
            .with_sequence_length(self.seq_len)
    }
}

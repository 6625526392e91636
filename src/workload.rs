//! Workload and numeric precision tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the accelerator will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    /// Serving / token generation
    #[default]
    Inference,
    /// Full or parameter-efficient training
    Training,
    /// Both, with no dominant phase
    Mixed,
}

impl Workload {
    /// All workload presets.
    pub const ALL: [Workload; 3] = [Workload::Inference, Workload::Training, Workload::Mixed];

    /// Lowercase name used in CLI and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Training => "training",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Workload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inference" | "infer" => Ok(Self::Inference),
            "training" | "train" => Ok(Self::Training),
            "mixed" => Ok(Self::Mixed),
            _ => Err(format!("Unknown workload: {s}. Use: inference, training, mixed")),
        }
    }
}

/// Numeric precision of weights / benchmark runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Fp32,
    #[default]
    Fp16,
    Bf16,
    Fp8,
    Int8,
    Int4,
}

impl Precision {
    /// Storage bytes per parameter.
    pub fn bytes_per_param(&self) -> f64 {
        match self {
            Self::Fp32 => 4.0,
            Self::Fp16 | Self::Bf16 => 2.0,
            Self::Fp8 | Self::Int8 => 1.0,
            Self::Int4 => 0.5,
        }
    }

    /// Lowercase name used in CLI and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fp32 => "fp32",
            Self::Fp16 => "fp16",
            Self::Bf16 => "bf16",
            Self::Fp8 => "fp8",
            Self::Int8 => "int8",
            Self::Int4 => "int4",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fp32" | "f32" | "float32" => Ok(Self::Fp32),
            "fp16" | "f16" | "float16" | "half" => Ok(Self::Fp16),
            "bf16" | "bfloat16" => Ok(Self::Bf16),
            "fp8" | "f8" => Ok(Self::Fp8),
            "int8" | "q8" => Ok(Self::Int8),
            "int4" | "q4" => Ok(Self::Int4),
            _ => Err(format!(
                "Unknown precision: {s}. Use: fp32, fp16, bf16, fp8, int8, int4"
            )),
        }
    }
}

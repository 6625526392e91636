//! Benchmark samples measured on a device.

use crate::error::{require_non_negative, require_positive, Error, Result};
use crate::workload::Precision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conditions a benchmark was run under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConditions {
    /// Model size in billions of parameters
    pub model_params_billions: f64,
    pub batch_size: u32,
    pub sequence_length: u32,
    pub precision: Precision,
    /// Inference or training framework, e.g. `vllm`
    #[serde(default)]
    pub framework: String,
}

/// One measured run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    /// Name of the benchmark, unique per device
    pub test_name: String,
    /// Device the run was measured on
    pub device_id: String,
    pub conditions: TestConditions,
    /// Generated tokens per second
    pub throughput_tokens_per_sec: f64,
    /// Share of device memory doing useful work, 0-100
    pub memory_efficiency: f64,
    /// Tokens per second per watt
    pub power_efficiency: f64,
    /// Trust in the source, 0-1
    pub credibility: f64,
    /// Independently reproduced
    #[serde(default)]
    pub verified: bool,
    /// When the run was measured
    pub timestamp: DateTime<Utc>,
}

impl BenchmarkSample {
    /// Check measurements and conditions are in range.
    pub fn validate(&self) -> Result<()> {
        if self.test_name.trim().is_empty() {
            return Err(Error::invalid("test_name", "must not be empty"));
        }
        require_positive("model_params_billions", self.conditions.model_params_billions)?;
        if self.conditions.batch_size == 0 {
            return Err(Error::invalid("batch_size", "must be >= 1"));
        }
        if self.conditions.sequence_length == 0 {
            return Err(Error::invalid("sequence_length", "must be >= 1"));
        }
        require_non_negative("throughput_tokens_per_sec", self.throughput_tokens_per_sec)?;
        require_non_negative("power_efficiency", self.power_efficiency)?;
        let mem = require_non_negative("memory_efficiency", self.memory_efficiency)?;
        if mem > 100.0 {
            return Err(Error::invalid("memory_efficiency", format!("must be <= 100, got {mem}")));
        }
        let cred = require_non_negative("credibility", self.credibility)?;
        if cred > 1.0 {
            return Err(Error::invalid("credibility", format!("must be <= 1, got {cred}")));
        }
        Ok(())
    }

    /// Age in days relative to `now`; future timestamps count as fresh.
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        let seconds = (now - self.timestamp).num_seconds().max(0);
        seconds as f64 / 86_400.0
    }
}

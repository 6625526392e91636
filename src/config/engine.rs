//! Engine configuration file.

use crate::benchmark::BenchmarkConfig;
use crate::error::{Error, Result};
use crate::rating::RatingConfig;
use crate::recommend::RecommendationConfig;
use crate::utilization::UtilizationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All tunables of the estimation engine.
///
/// Every field has a default, so an empty YAML document is a valid config.
///
/// ```yaml
/// utilization:
///   fragmentation_factor: 0.15
///   system_reserved_gb: 1.0
/// rating:
///   weights:
///     inference: { compute: 0.4, memory: 0.2, power: 0.2, cost: 0.2 }
/// recommendation:
///   max_devices: 4
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub utilization: UtilizationConfig,
    pub rating: RatingConfig,
    pub benchmark: BenchmarkConfig,
    pub recommendation: RecommendationConfig,
}

impl EngineConfig {
    /// Parse a YAML document without validating it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // serde_yaml rejects a fully empty document
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("Failed to parse YAML config: {e}")))
    }

    /// Check every section, naming the section in the error.
    pub fn validate(&self) -> Result<()> {
        section("utilization", self.utilization.validate())?;
        section("rating", self.rating.validate())?;
        section("benchmark", self.benchmark.validate())?;
        self.recommendation.validate()
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

fn section(name: &str, result: Result<()>) -> Result<()> {
    result.map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{name}: {msg}")),
        other => Error::Config(format!("{name}: {other}")),
    })
}

/// Read, parse and validate a YAML config file.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EngineConfig> {
    let path = config_path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let config = EngineConfig::from_yaml_str(&yaml)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "engine config loaded");
    Ok(config)
}

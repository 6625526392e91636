//! Recommendation limits.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Limits applied when assembling recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Maximum entries returned
    pub max_results: usize,
    /// Largest device count considered for one requirement
    pub max_devices: u32,
    /// Devices rated below this confidence are excluded
    pub min_confidence: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { max_results: 10, max_devices: 8, min_confidence: 0.3 }
    }
}

impl RecommendationConfig {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_max_devices(mut self, max_devices: u32) -> Self {
        self.max_devices = max_devices;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(Error::Config("recommendation.max_results must be >= 1".to_string()));
        }
        if self.max_devices == 0 {
            return Err(Error::Config("recommendation.max_devices must be >= 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::Config(format!(
                "recommendation.min_confidence must be in [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

//! Similarity between benchmark conditions and a target configuration.

use crate::catalog::TestConditions;
use crate::error::{require_positive, Error, Result};
use crate::requirement::ModelSpec;
use crate::workload::Precision;
use serde::{Deserialize, Serialize};

/// How strongly a model-size mismatch lowers the match.
pub const SIZE_WEIGHT: f64 = 0.7;
/// How strongly a batch-size mismatch lowers the match.
pub const BATCH_WEIGHT: f64 = 0.4;
/// How strongly a sequence-length mismatch lowers the match.
pub const SEQUENCE_WEIGHT: f64 = 0.3;
/// Multiplier when precisions differ.
pub const PRECISION_MISMATCH: f64 = 0.7;

/// Configuration to predict performance for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetParams {
    pub model_params_billions: f64,
    pub batch_size: u32,
    pub sequence_length: u32,
    pub precision: Precision,
}

impl Default for TargetParams {
    /// 7B parameters, batch 1, 2048 tokens, fp16.
    fn default() -> Self {
        Self {
            model_params_billions: 7.0,
            batch_size: 1,
            sequence_length: 2048,
            precision: Precision::Fp16,
        }
    }
}

impl TargetParams {
    pub fn new(model_params_billions: f64) -> Self {
        Self { model_params_billions, ..Self::default() }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_sequence_length(mut self, sequence_length: u32) -> Self {
        self.sequence_length = sequence_length;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("model_params_billions", self.model_params_billions)?;
        if self.batch_size == 0 {
            return Err(Error::invalid("batch_size", "must be >= 1"));
        }
        if self.sequence_length == 0 {
            return Err(Error::invalid("sequence_length", "must be >= 1"));
        }
        Ok(())
    }
}

impl From<&ModelSpec> for TargetParams {
    fn from(model: &ModelSpec) -> Self {
        Self {
            model_params_billions: model.params_billions,
            batch_size: model.batch_size,
            sequence_length: model.sequence_length,
            precision: model.precision,
        }
    }
}

/// `min / max` of two positive values, 0 when either is not positive.
fn closeness(a: f64, b: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    a.min(b) / a.max(b)
}

/// `1 − weight × (1 − closeness)`: a complete mismatch costs at most `weight`.
fn sub_score(a: f64, b: f64, weight: f64) -> f64 {
    1.0 - weight * (1.0 - closeness(a, b))
}

/// Similarity in (0, 1] between measured conditions and a target.
pub fn match_score(conditions: &TestConditions, target: &TargetParams) -> f64 {
    let size = sub_score(conditions.model_params_billions, target.model_params_billions, SIZE_WEIGHT);
    let batch = sub_score(f64::from(conditions.batch_size), f64::from(target.batch_size), BATCH_WEIGHT);
    let sequence = sub_score(
        f64::from(conditions.sequence_length),
        f64::from(target.sequence_length),
        SEQUENCE_WEIGHT,
    );
    let precision = if conditions.precision == target.precision { 1.0 } else { PRECISION_MISMATCH };
    size * batch * sequence * precision
}

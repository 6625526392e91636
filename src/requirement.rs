//! Memory requirement of a workload, optionally decomposed into components.

use crate::breakdown::normalize_percentages;
use crate::error::{require_non_negative, require_positive, Error, Result};
use crate::workload::{Precision, Workload};
use serde::{Deserialize, Serialize};

/// Maximum relative mismatch between the component sum and the total.
pub const COMPONENT_SUM_TOLERANCE: f64 = 0.01;

/// Per-component memory split.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryComponents {
    /// Model weights
    pub weights_bytes: f64,
    /// Activations and KV cache
    pub activations_bytes: f64,
    /// Gradients (training only)
    pub gradients_bytes: f64,
    /// Optimizer state such as Adam moments (training only)
    pub optimizer_state_bytes: f64,
}

impl MemoryComponents {
    /// Sum of all components.
    pub fn sum(&self) -> f64 {
        self.weights_bytes + self.activations_bytes + self.gradients_bytes + self.optimizer_state_bytes
    }

    /// Components as `(label, bytes)` pairs in a fixed order.
    pub fn labeled(&self) -> [(&'static str, f64); 4] {
        [
            ("Model Weights", self.weights_bytes),
            ("Activations", self.activations_bytes),
            ("Gradients", self.gradients_bytes),
            ("Optimizer State", self.optimizer_state_bytes),
        ]
    }

    fn validate(&self) -> Result<()> {
        require_non_negative("weights_bytes", self.weights_bytes)?;
        require_non_negative("activations_bytes", self.activations_bytes)?;
        require_non_negative("gradients_bytes", self.gradients_bytes)?;
        require_non_negative("optimizer_state_bytes", self.optimizer_state_bytes)?;
        Ok(())
    }
}

/// Total memory a workload needs, in bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRequirement {
    /// Total bytes required
    pub total_bytes: f64,
    /// Optional decomposition; sums to `total_bytes` within 1%
    pub components: Option<MemoryComponents>,
}

impl MemoryRequirement {
    /// Requirement with a total only.
    pub fn new(total_bytes: f64) -> Result<Self> {
        require_non_negative("total_bytes", total_bytes)?;
        Ok(Self { total_bytes, components: None })
    }

    /// Requirement given in gigabytes.
    pub fn from_gb(total_gb: f64) -> Result<Self> {
        Self::new(crate::units::gb_to_bytes(total_gb)?)
    }

    /// Requirement whose total is the exact component sum.
    pub fn from_components(components: MemoryComponents) -> Result<Self> {
        components.validate()?;
        Ok(Self { total_bytes: components.sum(), components: Some(components) })
    }

    /// Requirement with an explicit total that must match the components.
    pub fn with_components(total_bytes: f64, components: MemoryComponents) -> Result<Self> {
        require_non_negative("total_bytes", total_bytes)?;
        components.validate()?;

        let sum = components.sum();
        let mismatch = if total_bytes > 0.0 {
            (sum - total_bytes).abs() / total_bytes
        } else if sum > 0.0 {
            1.0
        } else {
            0.0
        };
        if mismatch > COMPONENT_SUM_TOLERANCE {
            return Err(Error::invalid(
                "components",
                format!(
                    "component sum {sum:.0} differs from total {total_bytes:.0} by {:.2}% (max 1%)",
                    mismatch * 100.0
                ),
            ));
        }

        Ok(Self { total_bytes, components: Some(components) })
    }

    /// Total in gigabytes.
    pub fn total_gb(&self) -> f64 {
        self.total_bytes / crate::units::BYTES_PER_GB
    }

    /// Component shares as percentages summing to exactly 100.00.
    ///
    /// Returns an empty list when there is no decomposition or it sums to 0.
    pub fn normalized_percentages(&self) -> Vec<(&'static str, f64)> {
        let Some(components) = self.components else {
            return Vec::new();
        };
        let labeled = components.labeled();
        let values: Vec<f64> = labeled.iter().map(|(_, v)| *v).collect();
        match normalize_percentages(&values) {
            Ok(pcts) => labeled.iter().map(|(l, _)| *l).zip(pcts).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Estimate the requirement of a model for a workload.
    pub fn estimate(model: &ModelSpec, workload: Workload) -> Result<Self> {
        model.validate()?;

        let params = model.params_billions * 1e9;
        let bytes = model.precision.bytes_per_param();
        let (layers, hidden) = model.shape();
        let tokens = f64::from(model.batch_size) * f64::from(model.sequence_length);

        let weights = params * bytes;
        let components = match workload {
            Workload::Inference => {
                // K and V per layer, kept at >= 8 bit even for 4-bit weights
                let kv_cache = 2.0 * layers * hidden * tokens * bytes.max(1.0);
                let workspace = tokens * hidden * bytes.max(1.0) * 4.0;
                MemoryComponents {
                    weights_bytes: weights,
                    activations_bytes: kv_cache + workspace,
                    gradients_bytes: 0.0,
                    optimizer_state_bytes: 0.0,
                }
            }
            Workload::Training | Workload::Mixed => {
                // fp32 master copy plus two Adam moments unless already fp32
                let optimizer_bytes_per_param =
                    if model.precision == Precision::Fp32 { 8.0 } else { 12.0 };
                MemoryComponents {
                    weights_bytes: weights,
                    activations_bytes: tokens * hidden * layers * bytes.max(1.0) * 10.0,
                    gradients_bytes: params * bytes,
                    optimizer_state_bytes: params * optimizer_bytes_per_param,
                }
            }
        };

        Self::from_components(components)
    }
}

/// Model shape used to estimate a requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Parameter count in billions
    pub params_billions: f64,
    /// Weight precision
    pub precision: Precision,
    /// Batch size
    pub batch_size: u32,
    /// Sequence length in tokens
    pub sequence_length: u32,
    /// Transformer layers (derived from size when absent)
    pub layers: Option<u32>,
    /// Hidden dimension (derived from size when absent)
    pub hidden_size: Option<u32>,
}

impl ModelSpec {
    /// Create a spec with default batch 1, 2048 tokens, fp16.
    pub fn new(params_billions: f64) -> Self {
        Self {
            params_billions,
            precision: Precision::Fp16,
            batch_size: 1,
            sequence_length: 2048,
            layers: None,
            hidden_size: None,
        }
    }

    /// Set precision
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Set batch size
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set sequence length
    pub fn with_sequence_length(mut self, sequence_length: u32) -> Self {
        self.sequence_length = sequence_length;
        self
    }

    /// (layers, hidden) with typical decoder shapes filling in unknowns.
    fn shape(&self) -> (f64, f64) {
        let (layers, hidden) = match self.params_billions {
            p if p <= 1.5 => (24, 2048),
            p if p <= 8.0 => (32, 4096),
            p if p <= 15.0 => (40, 5120),
            p if p <= 35.0 => (60, 6656),
            _ => (80, 8192),
        };
        (
            f64::from(self.layers.unwrap_or(layers)),
            f64::from(self.hidden_size.unwrap_or(hidden)),
        )
    }

    fn validate(&self) -> Result<()> {
        require_positive("params_billions", self.params_billions)?;
        if self.batch_size == 0 {
            return Err(Error::invalid("batch_size", "must be > 0"));
        }
        if self.sequence_length == 0 {
            return Err(Error::invalid("sequence_length", "must be > 0"));
        }
        Ok(())
    }
}

//! Benchmark samples keyed by `(test_name, device_id)`.

use super::sample::BenchmarkSample;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Typed lookup of benchmark samples.
///
/// Keys are unique; inserting a second sample for the same test and device
/// is rejected.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkTable {
    samples: BTreeMap<(String, String), BenchmarkSample>,
}

impl BenchmarkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a validated sample.
    pub fn insert(&mut self, sample: BenchmarkSample) -> Result<()> {
        sample.validate().map_err(|e| {
            Error::Catalog(format!("benchmark '{}' on '{}': {e}", sample.test_name, sample.device_id))
        })?;
        let key = (sample.test_name.clone(), sample.device_id.clone());
        if self.samples.contains_key(&key) {
            return Err(Error::Catalog(format!(
                "duplicate benchmark '{}' for device '{}'",
                key.0, key.1
            )));
        }
        self.samples.insert(key, sample);
        Ok(())
    }

    /// Sample for one test on one device.
    pub fn get(&self, test_name: &str, device_id: &str) -> Option<&BenchmarkSample> {
        self.samples.get(&(test_name.to_string(), device_id.to_string()))
    }

    /// All samples measured on `device_id`, ordered by test name.
    pub fn for_device(&self, device_id: &str) -> Vec<&BenchmarkSample> {
        self.samples.values().filter(|s| s.device_id == device_id).collect()
    }

    /// Distinct test names.
    pub fn test_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.samples.keys().map(|(t, _)| t.as_str()).collect();
        names.dedup();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkSample> {
        self.samples.values()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

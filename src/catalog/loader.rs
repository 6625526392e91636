//! Read-only device and benchmark catalog.

use super::device::DeviceProfile;
use super::sample::BenchmarkSample;
use super::table::BenchmarkTable;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    devices: Vec<DeviceProfile>,
    #[serde(default)]
    benchmarks: Vec<BenchmarkSample>,
}

/// Devices and their benchmark samples, validated at load.
///
/// Never mutated after construction; share it by reference.
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    devices: Vec<DeviceProfile>,
    index: HashMap<String, usize>,
    benchmarks: BenchmarkTable,
}

impl DeviceCatalog {
    /// Build a catalog, attaching each sample to its device.
    ///
    /// Fails on duplicate device ids, invalid devices, samples that name an
    /// unknown device, duplicate `(test_name, device_id)` keys and samples
    /// with out-of-range measurements.
    pub fn from_parts(mut devices: Vec<DeviceProfile>, samples: Vec<BenchmarkSample>) -> Result<Self> {
        let inline: Vec<BenchmarkSample> =
            devices.iter_mut().flat_map(|d| std::mem::take(&mut d.benchmarks)).collect();

        let mut index = HashMap::with_capacity(devices.len());
        for (i, device) in devices.iter().enumerate() {
            device
                .validate()
                .map_err(|e| Error::Catalog(format!("device '{}': {e}", device.id)))?;
            if index.insert(device.id.clone(), i).is_some() {
                return Err(Error::Catalog(format!("duplicate device id '{}'", device.id)));
            }
        }

        let mut benchmarks = BenchmarkTable::new();
        for sample in inline.into_iter().chain(samples) {
            let Some(&slot) = index.get(&sample.device_id) else {
                return Err(Error::Catalog(format!(
                    "benchmark '{}' references unknown device '{}'",
                    sample.test_name, sample.device_id
                )));
            };
            devices[slot].benchmarks.push(sample.clone());
            benchmarks.insert(sample)?;
        }

        tracing::debug!(devices = devices.len(), benchmarks = benchmarks.len(), "catalog built");
        Ok(Self { devices, index, benchmarks })
    }

    /// Parse a YAML catalog `{ devices: [...], benchmarks: [...] }`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_yaml::from_str(yaml).map_err(|e| Error::Catalog(format!("parse error: {e}")))?;
        Self::from_parts(file.devices, file.benchmarks)
    }

    /// Load a YAML catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        let catalog = Self::from_yaml_str(&yaml)?;
        tracing::info!(path = %path.display(), devices = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(include_str!("../../data/catalog.yaml"))
    }

    /// Device by id.
    pub fn device(&self, id: &str) -> Result<&DeviceProfile> {
        self.index
            .get(id)
            .map(|&i| &self.devices[i])
            .ok_or_else(|| Error::UnknownDevice(id.to_string()))
    }

    /// Whether `id` is in the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All devices in catalog order.
    pub fn devices(&self) -> &[DeviceProfile] {
        &self.devices
    }

    /// Benchmark table.
    pub fn benchmarks(&self) -> &BenchmarkTable {
        &self.benchmarks
    }

    /// Samples measured on `device_id`; empty for unknown devices.
    pub fn samples_for(&self, device_id: &str) -> Vec<&BenchmarkSample> {
        self.benchmarks.for_device(device_id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

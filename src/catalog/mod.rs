//! Device and benchmark catalog.
//!
//! The catalog is static data: it is parsed and validated once, then only
//! read. Benchmark samples live in a [`BenchmarkTable`] keyed by
//! `(test_name, device_id)` and are also attached to their
//! [`DeviceProfile`].

mod device;
mod loader;
mod sample;
mod table;

pub use device::{Architecture, Availability, DeviceProfile, DeviceSpecs};
pub use loader::DeviceCatalog;
pub use sample::{BenchmarkSample, TestConditions};
pub use table::BenchmarkTable;

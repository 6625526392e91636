//! First-fit allocation simulator.
//!
//! Requests are placed in descending priority order (input order breaks
//! ties) into a free list that starts as one block spanning the capacity.
//! Each request's size is rounded up to its alignment. A request that does
//! not fit is reported as failed; it never aborts the batch.
//!
//! Transient requests are released after placement, in placement order, so
//! the report can show the fragmentation that persistent allocations leave
//! behind. Placement alone never splits the free list, so the peak ratio is
//! taken over the release sequence, where holes open before their
//! neighbours are freed and coalesced.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What an allocation holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationCategory {
    Weights,
    Activations,
    Gradients,
    OptimizerState,
    KvCache,
    Workspace,
    Other,
}

/// One allocation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Caller-chosen identifier
    pub id: String,
    /// Requested size in bytes
    pub size_bytes: u64,
    /// Alignment boundary in bytes (0 and 1 mean unaligned)
    pub alignment: u64,
    /// Content category
    pub category: AllocationCategory,
    /// Higher values are placed first
    pub priority: u32,
    /// Released again after all requests are placed
    #[serde(default)]
    pub transient: bool,
}

impl AllocationRequest {
    /// Create a persistent request.
    pub fn new(id: impl Into<String>, size_bytes: u64, category: AllocationCategory) -> Self {
        Self {
            id: id.into(),
            size_bytes,
            alignment: 256,
            category,
            priority: 0,
            transient: false,
        }
    }

    /// Set alignment
    pub fn with_alignment(mut self, alignment: u64) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark as transient
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Size rounded up to the alignment boundary.
    pub fn aligned_size(&self) -> Option<u64> {
        if self.alignment <= 1 {
            return Some(self.size_bytes);
        }
        let blocks = self.size_bytes.div_ceil(self.alignment);
        blocks.checked_mul(self.alignment)
    }
}

/// A successfully placed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: String,
    pub category: AllocationCategory,
    pub offset: u64,
    pub requested_bytes: u64,
    pub aligned_bytes: u64,
    pub transient: bool,
}

/// A request that could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedAllocation {
    pub id: String,
    pub category: AllocationCategory,
    pub requested_bytes: u64,
    pub reason: String,
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Simulated capacity
    pub capacity_bytes: u64,
    /// Placed requests in placement order
    pub placements: Vec<Placement>,
    /// Requests that did not fit
    pub failed: Vec<FailedAllocation>,
    /// Aligned bytes placed at peak
    pub peak_allocated_bytes: u64,
    /// Alignment padding across placed requests
    pub wasted_bytes: u64,
    /// Highest `1 - largest_free / total_free` seen while transient
    /// requests are released
    pub peak_fragmentation_ratio: f64,
    /// Same ratio after transient requests are released
    pub fragmentation_ratio: f64,
    /// Free bytes after transient requests are released
    pub total_free_bytes: u64,
    /// Largest free block after transient requests are released
    pub largest_free_block: u64,
    /// Persistent bytes placed per category
    pub bytes_by_category: BTreeMap<AllocationCategory, u64>,
}

impl AllocationReport {
    /// Number of placed requests.
    pub fn succeeded(&self) -> usize {
        self.placements.len()
    }

    /// Whether every request was placed.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct FreeBlock {
    offset: u64,
    size: u64,
}

/// Free list ordered by offset with neighbour coalescing on release.
#[derive(Debug)]
struct FreeList {
    blocks: Vec<FreeBlock>,
}

impl FreeList {
    fn new(capacity: u64) -> Self {
        let blocks = if capacity > 0 { vec![FreeBlock { offset: 0, size: capacity }] } else { Vec::new() };
        Self { blocks }
    }

    fn first_fit(&mut self, size: u64) -> Option<u64> {
        let idx = self.blocks.iter().position(|b| b.size >= size)?;
        let block = &mut self.blocks[idx];
        let offset = block.offset;
        block.offset += size;
        block.size -= size;
        if block.size == 0 {
            self.blocks.remove(idx);
        }
        Some(offset)
    }

    fn release(&mut self, offset: u64, size: u64) {
        if size == 0 {
            return;
        }
        let idx = self.blocks.partition_point(|b| b.offset < offset);
        self.blocks.insert(idx, FreeBlock { offset, size });

        if idx + 1 < self.blocks.len()
            && self.blocks[idx].offset + self.blocks[idx].size == self.blocks[idx + 1].offset
        {
            self.blocks[idx].size += self.blocks[idx + 1].size;
            self.blocks.remove(idx + 1);
        }
        if idx > 0 && self.blocks[idx - 1].offset + self.blocks[idx - 1].size == self.blocks[idx].offset {
            self.blocks[idx - 1].size += self.blocks[idx].size;
            self.blocks.remove(idx);
        }
    }

    fn total_free(&self) -> u64 {
        self.blocks.iter().map(|b| b.size).sum()
    }

    fn largest(&self) -> u64 {
        self.blocks.iter().map(|b| b.size).max().unwrap_or(0)
    }

    fn fragmentation_ratio(&self) -> f64 {
        let total = self.total_free();
        if total == 0 {
            return 0.0;
        }
        1.0 - self.largest() as f64 / total as f64
    }
}

/// Simulates allocator placement on a device of fixed capacity.
#[derive(Debug, Clone)]
pub struct AllocationSimulator {
    capacity_bytes: u64,
}

impl AllocationSimulator {
    /// Create a simulator for `capacity_bytes`.
    pub fn new(capacity_bytes: u64) -> Result<Self> {
        if capacity_bytes == 0 {
            return Err(Error::invalid("capacity_bytes", "must be > 0"));
        }
        Ok(Self { capacity_bytes })
    }

    /// Place all requests and report the outcome.
    pub fn simulate(&self, requests: &[AllocationRequest]) -> AllocationReport {
        let mut order: Vec<&AllocationRequest> = requests.iter().collect();
        // stable sort keeps input order among equal priorities
        order.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut free = FreeList::new(self.capacity_bytes);
        let mut placements = Vec::new();
        let mut failed = Vec::new();
        let mut wasted = 0u64;
        let mut allocated = 0u64;

        for request in order {
            let Some(aligned) = request.aligned_size() else {
                failed.push(FailedAllocation {
                    id: request.id.clone(),
                    category: request.category,
                    requested_bytes: request.size_bytes,
                    reason: "aligned size overflows".to_string(),
                });
                continue;
            };

            match free.first_fit(aligned) {
                Some(offset) => {
                    wasted += aligned - request.size_bytes;
                    allocated += aligned;
                    placements.push(Placement {
                        id: request.id.clone(),
                        category: request.category,
                        offset,
                        requested_bytes: request.size_bytes,
                        aligned_bytes: aligned,
                        transient: request.transient,
                    });
                }
                None => {
                    tracing::debug!(id = %request.id, aligned, "allocation did not fit");
                    failed.push(FailedAllocation {
                        id: request.id.clone(),
                        category: request.category,
                        requested_bytes: request.size_bytes,
                        reason: format!(
                            "no free block of {aligned} bytes (largest free block: {} bytes)",
                            free.largest()
                        ),
                    });
                }
            }
        }

        let mut peak_fragmentation_ratio = free.fragmentation_ratio();

        let mut bytes_by_category = BTreeMap::new();
        for placement in &placements {
            if placement.transient {
                free.release(placement.offset, placement.aligned_bytes);
                peak_fragmentation_ratio = peak_fragmentation_ratio.max(free.fragmentation_ratio());
            } else {
                *bytes_by_category.entry(placement.category).or_insert(0) += placement.aligned_bytes;
            }
        }

        AllocationReport {
            capacity_bytes: self.capacity_bytes,
            placements,
            failed,
            peak_allocated_bytes: allocated,
            wasted_bytes: wasted,
            peak_fragmentation_ratio,
            fragmentation_ratio: free.fragmentation_ratio(),
            total_free_bytes: free.total_free(),
            largest_free_block: free.largest(),
            bytes_by_category,
        }
    }
}

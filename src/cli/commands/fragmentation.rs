//! Fragmentation command implementation

use super::print_structured;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::FragmentationArgs;
use crate::units::{gb_to_bytes, mb_to_bytes, BYTES_PER_MB};
use crate::utilization::{
    predict_fragmentation, AllocationCategory, AllocationHistory, AllocationReport, AllocationRequest,
    AllocationSimulator, FragmentationPrediction,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct FragmentationOutput {
    prediction: FragmentationPrediction,
    simulation: Option<AllocationReport>,
}

pub fn run_fragmentation(args: FragmentationArgs, level: LogLevel) -> Result<(), String> {
    let sizes: Vec<f64> = args
        .sizes_mb
        .iter()
        .map(|&mb| mb_to_bytes(mb))
        .collect::<crate::Result<_>>()
        .map_err(|e| e.to_string())?;

    let history = AllocationHistory {
        allocation_sizes: sizes.clone(),
        frequencies: args.frequencies.clone(),
        deallocation_pattern: args.pattern,
        peak_memory_ratio: args.peak_ratio,
    };
    let prediction = predict_fragmentation(&history).map_err(|e| e.to_string())?;

    let simulation = match args.simulate_gb {
        Some(gb) => Some(simulate(&sizes, gb).map_err(|e| e.to_string())?),
        None => None,
    };

    let output = FragmentationOutput { prediction, simulation };
    if print_structured(&output, args.format)? {
        return Ok(());
    }

    let p = &output.prediction;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Expected fragmentation: {:.0}% ({} risk, confidence {:.2})",
            p.expected_fragmentation * 100.0,
            p.risk,
            p.confidence
        ),
    );
    log(level, LogLevel::Verbose, &format!("  Size coefficient of variation: {:.2}", p.size_cv));
    for suggestion in &p.suggestions {
        log(level, LogLevel::Normal, &format!("  - {suggestion}"));
    }

    if let Some(report) = &output.simulation {
        log(level, LogLevel::Normal, "");
        log(
            level,
            LogLevel::Normal,
            &format!(
                "Simulated placement: {} placed, {} failed, peak {:.1} MB, fragmentation {:.0}%",
                report.succeeded(),
                report.failed.len(),
                report.peak_allocated_bytes as f64 / BYTES_PER_MB,
                report.fragmentation_ratio * 100.0
            ),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Peak fragmentation while releasing transients: {:.0}%",
                report.peak_fragmentation_ratio * 100.0
            ),
        );
        for failed in &report.failed {
            log(level, LogLevel::Verbose, &format!("  {}: {}", failed.id, failed.reason));
        }
    }
    Ok(())
}

/// Place one allocation per observed size on a device of `capacity_gb`.
fn simulate(sizes: &[f64], capacity_gb: f64) -> crate::Result<AllocationReport> {
    let simulator = AllocationSimulator::new(gb_to_bytes(capacity_gb)? as u64)?;
    let requests: Vec<AllocationRequest> = sizes
        .iter()
        .enumerate()
        .map(|(i, &bytes)| AllocationRequest::new(format!("alloc-{i}"), bytes as u64, AllocationCategory::Other))
        .collect();
    Ok(simulator.simulate(&requests))
}

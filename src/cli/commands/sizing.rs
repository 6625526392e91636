//! Utilization and multi-device command implementations

use super::{log_warnings, print_structured, Context};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{MultiDeviceArgs, UtilizationArgs};
use crate::units::BYTES_PER_GB;
use crate::utilization::{
    minimum_fitting_devices, MultiDeviceResult, SafetyMarginAnalysis, UtilizationCalculator,
    UtilizationResult,
};
use crate::validate::{ResultValidator, Validated};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct UtilizationOutput {
    device: Option<String>,
    utilization: Validated<UtilizationResult>,
    safety: Option<SafetyMarginAnalysis>,
}

/// Capacity in GB, from the catalog device if one was named.
fn capacity_gb(ctx: &Context, device: Option<&str>, explicit: Option<f64>) -> Result<f64, String> {
    match (device, explicit) {
        (Some(id), _) => ctx
            .catalog
            .device(id)
            .map(|d| d.specs.memory_gb)
            .map_err(|e| e.to_string()),
        (None, Some(gb)) => Ok(gb),
        (None, None) => Err("either a capacity or --device is required".to_string()),
    }
}

pub fn run_utilization(args: UtilizationArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let capacity = capacity_gb(ctx, args.device.as_deref(), args.capacity_gb)?;
    let calculator =
        UtilizationCalculator::new(ctx.config.utilization).map_err(|e| format!("Config error: {e}"))?;

    let result = calculator.calculate_gb(args.needed_gb, capacity).map_err(|e| e.to_string())?;
    let utilization = ResultValidator::new().validate_or_fallback_utilization(result);
    let safety = if args.safety {
        Some(calculator.with_safety_margin(args.needed_gb, capacity).map_err(|e| e.to_string())?)
    } else {
        None
    };

    let output = UtilizationOutput { device: args.device, utilization, safety };
    if print_structured(&output, args.format)? {
        return Ok(());
    }

    let result = &output.utilization.value;
    log(
        level,
        LogLevel::Normal,
        &format!("Needed {:.2} GB of {:.2} GB", args.needed_gb, capacity),
    );
    log(level, LogLevel::Normal, &format!("  Theoretical: {:.1}%", result.display_theoretical * 100.0));
    log(level, LogLevel::Normal, &format!("  Practical:   {:.1}%", result.utilization_percentage));
    log(level, LogLevel::Normal, &format!("  Efficiency:  {}", result.band));
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Available after reservations: {:.2} GB, fragmentation {:.2} GB",
            result.available_bytes / BYTES_PER_GB,
            result.fragmentation_bytes / BYTES_PER_GB
        ),
    );
    if output.utilization.is_fallback {
        log(level, LogLevel::Normal, "  Result failed validation; showing placeholder values");
    }
    log_warnings(level, &output.utilization.warnings);

    if let Some(safety) = &output.safety {
        log(level, LogLevel::Normal, "");
        log(
            level,
            LogLevel::Normal,
            &format!(
                "With safety margin: {:.1}% of {:.2} GB safe capacity ({}), score {:.0}",
                safety.utilization * 100.0,
                safety.available_gb,
                if safety.fits { "fits" } else { "does not fit" },
                safety.score
            ),
        );
        for advice in &safety.recommendations {
            log(level, LogLevel::Normal, &format!("  - {advice}"));
        }
    }

    Ok(())
}

pub fn run_multi_device(args: MultiDeviceArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let per_device = capacity_gb(ctx, args.device.as_deref(), args.per_device_gb)?;
    let calculator =
        UtilizationCalculator::new(ctx.config.utilization).map_err(|e| format!("Config error: {e}"))?;

    let result: MultiDeviceResult = match args.count {
        Some(count) => calculator.multi_device(args.needed_gb, per_device, count),
        None => match minimum_fitting_devices(args.needed_gb, per_device, args.max_devices, calculator.config()) {
            Ok(Some(result)) => Ok(result),
            Ok(None) => calculator.multi_device(args.needed_gb, per_device, args.max_devices.max(1)),
            Err(e) => Err(e),
        },
    }
    .map_err(|e| e.to_string())?;

    if print_structured(&result, args.format)? {
        return Ok(());
    }

    let verdict = if result.fits { "fits" } else { "does not fit" };
    log(
        level,
        LogLevel::Normal,
        &format!(
            "{:.2} GB on {} x {:.2} GB: {verdict}",
            result.needed_gb, result.device_count, result.per_device_gb
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Usable capacity: {:.2} GB of {:.2} GB (scaling factor {:.2})",
            result.usable_capacity_gb, result.total_capacity_gb, result.scaling_factor
        ),
    );
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  Per-device utilization: {:.0}% (range {:.0}%-{:.0}%)",
            result.per_device_utilization.expected * 100.0,
            result.per_device_utilization.min * 100.0,
            result.per_device_utilization.max * 100.0
        ),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Communication overhead {:.2} GB, load balancing {:.0}%",
            result.communication_overhead_gb,
            result.load_balancing_efficiency * 100.0
        ),
    );
    log(level, LogLevel::Normal, &format!("  Optimal device count: {}", result.optimal_device_count));

    Ok(())
}

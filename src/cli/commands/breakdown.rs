//! Breakdown command implementation

use super::{log_warnings, print_structured, Context};
use crate::breakdown::{CapacityUsage, MemoryBreakdown, MemoryBreakdownCalculator};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::BreakdownArgs;
use crate::requirement::MemoryRequirement;
use crate::units::BYTES_PER_GB;
use crate::validate::{ResultValidator, Validated};

pub fn run_breakdown(args: BreakdownArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let model = args.model.to_spec();
    let requirement = MemoryRequirement::estimate(&model, args.workload).map_err(|e| e.to_string())?;
    let calculator = MemoryBreakdownCalculator::new();
    let validator = ResultValidator::new();

    let (title, validated) = match args.device.as_deref() {
        Some(id) => {
            let device = ctx.catalog.device(id).map_err(|e| e.to_string())?;
            let usage = capacity_usage(requirement.total_bytes, device.capacity_bytes(), ctx);
            let breakdown = calculator.capacity_breakdown(&usage).map_err(|e| e.to_string())?;
            (format!("{} capacity", device.name), validator.validate_or_fallback_breakdown(breakdown, None))
        }
        None => {
            let breakdown = calculator.from_requirement(&requirement).map_err(|e| e.to_string())?;
            (
                format!("{:.1}B model, {}", model.params_billions, args.workload),
                validator.validate_or_fallback_breakdown(breakdown, Some(requirement.total_bytes)),
            )
        }
    };

    if print_structured(&validated, args.format)? {
        return Ok(());
    }
    print_breakdown(&title, &validated, level);
    Ok(())
}

/// Split of a device's capacity when it holds `needed_bytes`.
fn capacity_usage(needed_bytes: f64, capacity_bytes: f64, ctx: &Context) -> CapacityUsage {
    let config = &ctx.config.utilization;
    let overhead = config.reserved_bytes();
    let fragmentation = needed_bytes * config.fragmentation_factor;
    let safety = capacity_bytes * config.safety_margin;
    CapacityUsage {
        capacity_bytes,
        used_bytes: needed_bytes + overhead + fragmentation + safety,
        overhead_bytes: overhead,
        fragmentation_bytes: fragmentation,
        safety_bytes: safety,
    }
}

fn print_breakdown(title: &str, validated: &Validated<MemoryBreakdown>, level: LogLevel) {
    let breakdown = &validated.value;
    log(
        level,
        LogLevel::Normal,
        &format!("{title}: {:.2} GB", breakdown.total_bytes / BYTES_PER_GB),
    );
    for entry in &breakdown.entries {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "  {:<20} {:>9.2} GB  {:>5.1}%",
                entry.label,
                entry.bytes / BYTES_PER_GB,
                entry.percentage
            ),
        );
        log(level, LogLevel::Verbose, &format!("  {:<20} {}", "", entry.description));
    }
    if validated.is_fallback {
        log(level, LogLevel::Normal, "  Breakdown failed validation; showing placeholder values");
    }
    log_warnings(level, &validated.warnings);
}

//! Rate, compare and predict command implementations

use super::{log_warnings, print_structured, Context};
use crate::benchmark::{BenchmarkProcessor, PerformancePrediction, RelativePerformance, TargetParams};
use crate::catalog::DeviceProfile;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{CompareArgs, PredictArgs, RateArgs};
use crate::rating::{EfficiencyRating, EfficiencyRatingSystem};
use crate::validate::{ResultValidator, Validated};
use serde::Serialize;

fn rating_system(ctx: &Context) -> Result<EfficiencyRatingSystem, String> {
    EfficiencyRatingSystem::new(ctx.config.rating).map_err(|e| format!("Config error: {e}"))
}

pub fn run_rate(args: RateArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let system = rating_system(ctx)?;
    let devices: Vec<DeviceProfile> = if args.devices.is_empty() {
        ctx.catalog.devices().to_vec()
    } else {
        args.devices
            .iter()
            .map(|id| ctx.catalog.device(id).cloned().map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?
    };

    let ratings: Vec<EfficiencyRating> = match args.budget {
        Some(budget) => system.best_within_budget(&devices, args.workload, budget).into_iter().collect(),
        None => system.rate_batch(&devices, args.workload),
    };
    let validator = ResultValidator::new();
    let validated: Vec<Validated<EfficiencyRating>> =
        ratings.into_iter().map(|r| validator.validate_or_fallback_rating(r)).collect();

    if print_structured(&validated, args.format)? {
        return Ok(());
    }

    if validated.is_empty() {
        let msg = match args.budget {
            Some(budget) => format!("No priced device within ${budget:.0}"),
            None => "No device could be rated".to_string(),
        };
        log(level, LogLevel::Normal, &msg);
        return Ok(());
    }

    log(
        level,
        LogLevel::Normal,
        &format!(
            "{:<4}{:<28}{:>8}{:>9}{:>8}{:>8}{:>8}{:>7}",
            "#", "Device", "Overall", "Compute", "Memory", "Power", "Cost", "Conf"
        ),
    );
    for (rank, entry) in validated.iter().enumerate() {
        let r = &entry.value;
        log(
            level,
            LogLevel::Normal,
            &format!(
                "{:<4}{:<28}{:>8.1}{:>9.1}{:>8.1}{:>8.1}{:>8.1}{:>7.2}",
                rank + 1,
                r.device_name,
                r.overall,
                r.compute.score,
                r.memory.score,
                r.power.score,
                r.cost.score,
                r.confidence
            ),
        );
        log_warnings(level, &entry.warnings);
    }
    Ok(())
}

pub fn run_compare(args: CompareArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let system = rating_system(ctx)?;
    let a = ctx.catalog.device(&args.device_a).map_err(|e| e.to_string())?;
    let b = ctx.catalog.device(&args.device_b).map_err(|e| e.to_string())?;
    let comparison = system.compare(a, b, args.workload).map_err(|e| e.to_string())?;

    if print_structured(&comparison, args.format)? {
        return Ok(());
    }

    log(
        level,
        LogLevel::Normal,
        &format!(
            "{} {:.1} vs {} {:.1} ({})",
            comparison.device_a, comparison.overall_a, comparison.device_b, comparison.overall_b, comparison.workload
        ),
    );
    let verdict = match &comparison.leader {
        Some(leader) => format!("{leader} leads: {}", comparison.magnitude),
        None => "No meaningful difference".to_string(),
    };
    log(level, LogLevel::Normal, &verdict);
    for line in &comparison.rationale {
        log(level, LogLevel::Normal, &format!("  - {line}"));
    }
    let d = comparison.deltas;
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  deltas: compute {:+.1}, memory {:+.1}, power {:+.1}, cost {:+.1}",
            d.compute, d.memory, d.power, d.cost
        ),
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct PredictOutput {
    prediction: Validated<PerformancePrediction>,
    relative: Option<RelativePerformance>,
}

pub fn run_predict(args: PredictArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let processor =
        BenchmarkProcessor::new(&ctx.catalog, ctx.config.benchmark).map_err(|e| format!("Config error: {e}"))?;
    let target = TargetParams::from(&args.model.to_spec());

    let prediction = processor.predict_performance(&args.device, &target).map_err(|e| e.to_string())?;
    let prediction = ResultValidator::new().validate_or_fallback_prediction(prediction);
    let relative = match args.relative_to.as_deref() {
        Some(reference) => Some(
            processor
                .calculate_relative_performance(&args.device, reference, &target)
                .map_err(|e| e.to_string())?,
        ),
        None => None,
    };

    let output = PredictOutput { prediction, relative };
    if print_structured(&output, args.format)? {
        return Ok(());
    }

    let p = &output.prediction.value;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "{}: {:.1} tokens/s for {:.1}B {} (batch {}, {} tokens)",
            p.device_id,
            p.throughput_tokens_per_sec,
            p.target.model_params_billions,
            p.target.precision,
            p.target.batch_size,
            p.target.sequence_length
        ),
    );
    let source = match &p.based_on {
        Some(test) => format!("{} from '{test}', match {:.2}", p.method, p.match_score),
        None => p.method.to_string(),
    };
    log(level, LogLevel::Normal, &format!("  Method: {source}, confidence {:.2}", p.confidence));
    log(
        level,
        LogLevel::Verbose,
        &format!(
            "  Memory efficiency {:.2}, power efficiency {:.3} tokens/s/W, {} matching sample(s)",
            p.memory_efficiency, p.power_efficiency, p.sample_count
        ),
    );
    for limitation in &p.limitations {
        log(level, LogLevel::Normal, &format!("  - {limitation}"));
    }
    log_warnings(level, &output.prediction.warnings);

    if let Some(rel) = &output.relative {
        log(
            level,
            LogLevel::Normal,
            &format!(
                "  Relative to {}: {:.2}x (score {:.0}, confidence {:.2})",
                rel.reference_id, rel.ratio, rel.score, rel.confidence
            ),
        );
        for limitation in &rel.limitations {
            log(level, LogLevel::Verbose, &format!("    - {limitation}"));
        }
    }
    Ok(())
}

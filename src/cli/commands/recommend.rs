//! Recommend command implementation

use super::{log_warnings, print_structured, Context};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::RecommendArgs;
use crate::recommend::{RecommendationEngine, RecommendationRequest};
use crate::requirement::{MemoryRequirement, ModelSpec};
use crate::validate::ResultValidator;

pub fn run_recommend(args: RecommendArgs, ctx: &Context, level: LogLevel) -> Result<(), String> {
    let mut request = build_request(&args).map_err(|e| format!("Invalid request: {e}"))?;
    if let Some(budget) = args.budget {
        request = request.with_budget(budget);
    }
    if let Some(max_results) = args.max_results {
        request = request.with_max_results(max_results);
    }

    let engine = RecommendationEngine::new(&ctx.catalog, &ctx.config)
        .map_err(|e| format!("Config error: {e}"))?;
    let report = engine.recommend(&request).map_err(|e| format!("Recommendation failed: {e}"))?;
    let validated = ResultValidator::new().validate_report(report);

    if print_structured(&validated, args.format)? {
        return Ok(());
    }

    let report = &validated.value;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Requirement: {:.1} GB ({}), {} of {} devices compatible",
            request.requirement.total_gb(),
            request.workload,
            report.compatible_count,
            report.evaluated_count
        ),
    );
    if let Some(budget) = request.budget_usd {
        log(level, LogLevel::Normal, &format!("Budget: ${budget:.0}"));
    }
    log(level, LogLevel::Normal, "");

    if report.recommendations.is_empty() {
        log(level, LogLevel::Normal, "No device matches the request.");
    }

    for (rank, rec) in report.recommendations.iter().enumerate() {
        let marker = if report.top_pick.as_deref() == Some(rec.device_id.as_str()) { "*" } else { " " };
        log(
            level,
            LogLevel::Normal,
            &format!(
                "{marker}{:>2}. {} ({}) x{}  score {:.1}  utilization {:.0}%  ${:.0}",
                rank + 1,
                rec.device_name,
                rec.device_id,
                rec.device_count,
                rec.efficiency_score,
                rec.utilization.utilization_percentage,
                rec.total_cost_usd
            ),
        );
        for line in &rec.rationale {
            log(level, LogLevel::Verbose, &format!("      {line}"));
        }
    }

    if !report.excluded.is_empty() {
        log(level, LogLevel::Verbose, "");
        log(level, LogLevel::Verbose, "Excluded:");
        for excluded in &report.excluded {
            log(level, LogLevel::Verbose, &format!("  {}: {}", excluded.device_id, excluded.reason));
        }
    }
    log_warnings(level, &validated.warnings);

    Ok(())
}

fn build_request(args: &RecommendArgs) -> crate::Result<RecommendationRequest> {
    match (args.params, args.memory_gb) {
        (_, Some(memory_gb)) => Ok(RecommendationRequest::new(MemoryRequirement::from_gb(memory_gb)?, args.workload)),
        (Some(params), None) => {
            let model = ModelSpec::new(params)
                .with_precision(args.precision)
                .with_batch_size(args.batch_size)
                .with_sequence_length(args.seq_len);
            RecommendationRequest::for_model(&model, args.workload)
        }
        (None, None) => Err(crate::Error::invalid("params", "either --params or --memory-gb is required")),
    }
}

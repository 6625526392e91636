//! Command handler tests

use super::*;
use crate::config::parse_args;
use std::fs;
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<(), String> {
    let mut argv = vec!["dimensionar"];
    argv.extend_from_slice(args);
    let cli = parse_args(argv).map_err(|e| e.to_string())?;
    run_command(cli)
}

// =============================================================================
// Context loading
// =============================================================================

#[test]
fn test_builtin_catalog_used_by_default() {
    let cli = parse_args(["dimensionar", "rate"]).unwrap();
    let ctx = Context::load(&cli).unwrap();
    assert!(ctx.catalog.contains("h100-80gb"));
    assert_eq!(ctx.config, EngineConfig::default());
}

#[test]
fn test_custom_config_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.yaml");
    fs::write(&path, "recommendation:\n  max_results: 2\n").unwrap();

    let cli = parse_args(["dimensionar", "rate", "--config", path.to_str().unwrap()]).unwrap();
    let ctx = Context::load(&cli).unwrap();
    assert_eq!(ctx.config.recommendation.max_results, 2);
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("engine.yaml");
    fs::write(&path, "utilization:\n  safety_margin: 1.5\n").unwrap();

    let err = run(&["-q", "rate", "--config", path.to_str().unwrap()]).unwrap_err();
    assert!(err.starts_with("Config error"), "{err}");
}

#[test]
fn test_missing_catalog_is_reported() {
    let err = run(&["-q", "rate", "--catalog", "/nonexistent/catalog.yaml"]).unwrap_err();
    assert!(err.starts_with("Catalog error"), "{err}");
}

#[test]
fn test_custom_catalog_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.yaml");
    fs::write(
        &path,
        r#"
devices:
  - id: lab-card
    name: Lab Card
    specs:
      memory_gb: 48
      memory_bandwidth_gbps: 960
      fp16_tflops: 180
      tdp_watts: 300
      price_usd: 6000
"#,
    )
    .unwrap();

    let cli = parse_args(["dimensionar", "rate", "--catalog", path.to_str().unwrap()]).unwrap();
    let ctx = Context::load(&cli).unwrap();
    assert_eq!(ctx.catalog.len(), 1);
    assert!(run(&["-q", "rate", "lab-card", "--catalog", path.to_str().unwrap()]).is_ok());
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn test_recommend_formats() {
    assert!(run(&["-q", "recommend", "--params", "7"]).is_ok());
    assert!(run(&["recommend", "--params", "70", "-w", "training", "-f", "json"]).is_ok());
    assert!(run(&["-v", "recommend", "--memory-gb", "20", "--budget", "5000", "-f", "yaml"]).is_ok());
}

#[test]
fn test_recommend_rejects_negative_memory() {
    let err = run(&["-q", "recommend", "--memory-gb=-5"]).unwrap_err();
    assert!(err.starts_with("Invalid request"), "{err}");
}

#[test]
fn test_utilization_with_device_and_safety() {
    assert!(run(&["-q", "utilization", "--needed-gb", "16", "--device", "rtx-4090", "--safety"]).is_ok());
    assert!(run(&["-q", "utilization", "--needed-gb", "16", "--capacity-gb", "24", "-f", "json"]).is_ok());
}

#[test]
fn test_utilization_unknown_device() {
    let err = run(&["-q", "utilization", "--needed-gb", "16", "--device", "no-such-card"]).unwrap_err();
    assert!(err.contains("no-such-card"), "{err}");
}

#[test]
fn test_utilization_rejects_zero_capacity() {
    assert!(run(&["-q", "utilization", "--needed-gb", "16", "--capacity-gb", "0"]).is_err());
}

#[test]
fn test_multi_device_search_and_fixed_count() {
    assert!(run(&["-q", "multi-device", "--needed-gb", "150", "--per-device-gb", "80"]).is_ok());
    assert!(run(&["-q", "multi-device", "--needed-gb", "150", "--device", "h100-80gb", "-c", "4"]).is_ok());
    // Larger than any searched count still reports the largest configuration
    assert!(run(&["-q", "multi-device", "--needed-gb", "5000", "--per-device-gb", "24"]).is_ok());
    assert!(run(&["-q", "multi-device", "--needed-gb", "150", "--per-device-gb", "80", "-c", "0"]).is_err());
}

#[test]
fn test_breakdown_model_and_device() {
    assert!(run(&["-q", "breakdown", "--params", "7", "-w", "training"]).is_ok());
    assert!(run(&["-q", "breakdown", "--params", "7", "--device", "a100-80gb", "-f", "json"]).is_ok());
    assert!(run(&["-q", "breakdown", "--params", "0"]).is_err());
}

#[test]
fn test_rate_all_selected_and_budget() {
    assert!(run(&["-q", "rate"]).is_ok());
    assert!(run(&["-q", "rate", "h100-80gb", "rtx-4090", "-f", "yaml"]).is_ok());
    assert!(run(&["-q", "rate", "--budget", "1"]).is_ok());
    assert!(run(&["-q", "rate", "no-such-card"]).is_err());
}

#[test]
fn test_compare_devices() {
    assert!(run(&["-q", "compare", "h100-80gb", "a100-80gb", "-w", "training"]).is_ok());
    assert!(run(&["-q", "compare", "h100-80gb", "missing"]).is_err());
}

#[test]
fn test_predict_with_relative_reference() {
    assert!(run(&["-q", "predict", "rtx-4090", "--params", "7", "--relative-to", "rtx-3090"]).is_ok());
    // Unknown devices fall back to a specification estimate
    assert!(run(&["-q", "predict", "mystery-card", "--params", "7", "-f", "json"]).is_ok());
    assert!(run(&["-q", "predict", "rtx-4090", "--params", "0"]).is_err());
}

#[test]
fn test_fragmentation_with_simulation() {
    assert!(run(&["-q", "fragmentation", "--sizes-mb", "64,512,2048", "--pattern", "random", "--simulate-gb", "4"])
        .is_ok());
    assert!(run(&["-q", "fragmentation", "--sizes-mb", "64", "--peak-ratio", "2.0"]).is_err());
}

#[test]
fn test_print_structured_text_is_noop() {
    assert!(!print_structured(&vec![1, 2, 3], OutputFormat::Text).unwrap());
    assert!(print_structured(&vec![1, 2, 3], OutputFormat::Json).unwrap());
}

//! Configuration regression test
//!
//! Loads pipeline configurations from JSON documents on disk and checks
//! defaults, partial overrides and rejection of invalid values.

use colorbook::region::{ReconcileScoring, WeightPolicy};
use colorbook::{PipelineError, SegmentCount, SegmentationConfig};
use colorbook_test::{RegParams, regout_dir};

#[test]
fn config_reg() {
    let mut rp = RegParams::new("config");
    let dir = regout_dir();
    std::fs::create_dir_all(&dir).expect("regout dir");

    // --- Test 1: partial document from file ---
    eprintln!("=== Partial document ===");
    let path = format!("{}/config_partial.json", dir);
    std::fs::write(
        &path,
        r#"{
            "segments": {"mode": "adaptive", "pixels_per_segment": 40, "min": 500, "max": 15000},
            "merge_threshold": 15.0,
            "reconcile_scoring": "boundary_length",
            "weight_policy": {"kind": "size_aware", "large_region_cap": 20000}
        }"#,
    )
    .expect("write config");
    let config = SegmentationConfig::from_json_file(&path).expect("load config");
    rp.compare_values(15.0, config.merge_threshold, 0.0);
    rp.compare_values(300.0, config.min_region_size as f64, 0.0);
    rp.compare_values(5.0, config.center_margin as f64, 0.0);
    rp.compare_values(
        1.0,
        if config.reconcile_scoring == ReconcileScoring::BoundaryLength { 1.0 } else { 0.0 },
        0.0,
    );
    rp.compare_values(1000.0, config.segments.resolve(200, 200) as f64, 0.0);
    match config.weight_policy {
        WeightPolicy::SizeAware(params) => {
            rp.compare_values(20000.0, params.large_region_cap as f64, 0.0);
            rp.compare_values(15.0, params.tier1_ratio, 0.0);
        }
        WeightPolicy::Baseline => {
            rp.compare_values(1.0, 0.0, 0.0);
        }
    }

    // --- Test 2: round trip through the pretty printer ---
    eprintln!("=== Round trip ===");
    let text = config.to_json_string().expect("serialize");
    let again = SegmentationConfig::from_json_str(&text).expect("parse");
    rp.compare_values(1.0, if again == config { 1.0 } else { 0.0 }, 0.0);
    let fixed = SegmentationConfig::new().with_segments(SegmentCount::Fixed { count: 800 });
    let fixed_text = fixed.to_json_string().expect("serialize");
    rp.compare_values(
        1.0,
        if fixed_text.contains(r#""mode": "fixed""#) { 1.0 } else { 0.0 },
        0.0,
    );

    // --- Test 3: rejected documents ---
    eprintln!("=== Rejections ===");
    let missing = SegmentationConfig::from_json_file(format!("{}/does_not_exist.json", dir));
    rp.compare_values(
        1.0,
        if matches!(missing, Err(PipelineError::Io(_))) { 1.0 } else { 0.0 },
        0.0,
    );
    for doc in [
        r#"{"merge_threshold": -3}"#,
        r#"{"segments": {"mode": "fixed", "count": 0}}"#,
        r#"{"relabel_base": 0}"#,
        r#"{"compactness": 0}"#,
    ] {
        let result = SegmentationConfig::from_json_str(doc);
        rp.compare_values(
            1.0,
            if matches!(result, Err(PipelineError::InvalidConfig(_))) { 1.0 } else { 0.0 },
            0.0,
        );
    }
    let unknown_mode = SegmentationConfig::from_json_str(r#"{"segments": {"mode": "auto"}}"#);
    rp.compare_values(
        1.0,
        if matches!(unknown_mode, Err(PipelineError::Format(_))) { 1.0 } else { 0.0 },
        0.0,
    );

    assert!(rp.cleanup(), "config regression test failed");
}

//! End-to-end pipeline regression test
//!
//! Drives `segment_image` with a grid superpixel generator and the sRGB to
//! L*a*b* converter over synthetic images, then checks the final regions,
//! visual centers, previews and serialized records.

use colorbook::region::{VisualCenters, WeightPolicy};
use colorbook::{
    LabelMap, LabelSizeClass, LabelStyleOptions, PipelineError, PipelineResult, SegmentCount,
    SegmentationConfig, SrgbToLab, SuperpixelGenerator, average_color_image, label_styles,
    region_colors, segment_image,
};
use colorbook_test::RegParams;
use image::{Rgb, RgbImage};

/// Square-cell superpixels sized from the target count
struct GridGenerator;

impl SuperpixelGenerator for GridGenerator {
    fn generate(
        &self,
        image: &RgbImage,
        target_count: u32,
        _compactness: f64,
    ) -> PipelineResult<LabelMap> {
        let (w, h) = image.dimensions();
        let area = (w as f64) * (h as f64);
        let cell = ((area / target_count.max(1) as f64).sqrt() as u32).max(1);
        let cells_x = w.div_ceil(cell);
        let mut labels = LabelMap::new(w, h)?;
        for y in 0..h {
            for x in 0..w {
                labels.set_label(x, y, (y / cell) * cells_x + x / cell + 1)?;
            }
        }
        Ok(labels)
    }
}

/// Generator that always fails
struct BrokenGenerator;

impl SuperpixelGenerator for BrokenGenerator {
    fn generate(&self, _: &RgbImage, _: u32, _: f64) -> PipelineResult<LabelMap> {
        Err(PipelineError::Collaborator {
            stage: "superpixel generation",
            message: "no model loaded".into(),
        })
    }
}

/// Red left half, blue right half
fn two_tone(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([200, 30, 30])
        } else {
            Rgb([30, 30, 200])
        }
    })
}

/// Smooth gradient with a few flat patches
fn patchwork(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let patch = (x / 16 + y / 12) % 3;
        let base = match patch {
            0 => [220u32, 200, 40],
            1 => [40, 160, 90],
            _ => [60, 60, 180],
        };
        let shade = (x * 3 + y * 2) % 20;
        Rgb(base.map(|c| (c + shade).min(255) as u8))
    })
}

#[test]
fn pipeline_reg() {
    let mut rp = RegParams::new("pipeline");

    // --- Test 1: two-tone image with the baseline policy ---
    eprintln!("=== Two-tone image ===");
    let image = two_tone(60, 40);
    let config = SegmentationConfig::new()
        .with_segments(SegmentCount::Adaptive {
            pixels_per_segment: 25,
            min: 10,
            max: 10_000,
        })
        .with_weight_policy(WeightPolicy::Baseline);
    let result = segment_image(&image, &GridGenerator, &SrgbToLab, &config).expect("segment");
    eprintln!("  report: {:?}", result.report);

    rp.compare_values(96.0, result.report.initial_regions as f64, 0.0);
    rp.compare_values(2.0, result.report.final_regions as f64, 0.0);
    rp.compare_values(1200.0, result.centers.size(1).unwrap_or(0) as f64, 0.0);
    rp.compare_values(1200.0, result.centers.size(2).unwrap_or(0) as f64, 0.0);
    rp.compare_values(1.0, result.labels.get_label(0, 0).unwrap_or(0) as f64, 0.0);
    rp.compare_values(2.0, result.labels.get_label(59, 39).unwrap_or(0) as f64, 0.0);

    // Both halves touch the image edge, so their centers are centroids
    let red = result.centers.center(1).unwrap_or((0, 0));
    let blue = result.centers.center(2).unwrap_or((0, 0));
    rp.compare_values(9.0, red.0 as f64, 0.0);
    rp.compare_values(19.0, red.1 as f64, 0.0);
    rp.compare_values(49.0, blue.0 as f64, 0.0);
    rp.compare_values(19.0, blue.1 as f64, 0.0);
    rp.compare_values(2.0, result.report.center_fallbacks as f64, 0.0);

    // Average-color preview reproduces the flat source
    let colors = region_colors(&result.labels, &image).expect("region colors");
    rp.compare_values(1.0, if colors[&1] == [200, 30, 30] { 1.0 } else { 0.0 }, 0.0);
    let preview = average_color_image(&result.labels, &image, Rgb([0, 0, 0])).expect("preview");
    rp.compare_strings(image.as_raw(), preview.as_raw());

    // Label styles follow region sizes
    let styles = label_styles(&result.centers, &LabelStyleOptions::default());
    rp.compare_values(
        1.0,
        if styles[&1].size_class == LabelSizeClass::Medium { 1.0 } else { 0.0 },
        0.0,
    );

    // Serialized center record
    let json = serde_json::to_string(&result.centers).expect("serialize centers");
    rp.compare_strings(
        br#"{"centers":{"1":[9,19],"2":[49,19]},"sizes":{"1":1200,"2":1200}}"#,
        json.as_bytes(),
    );
    let parsed: VisualCenters = serde_json::from_str(&json).expect("parse centers");
    rp.compare_values(2.0, parsed.len() as f64, 0.0);
    if rp.display() {
        let report = serde_json::to_vec_pretty(&result.report).expect("serialize report");
        rp.write_data_and_check(&report, "json").expect("write report");
    }

    // --- Test 2: patchwork image with the size-aware policy ---
    eprintln!("=== Patchwork image ===");
    let image = patchwork(96, 72);
    let config = SegmentationConfig::new()
        .with_segments(SegmentCount::Fixed { count: 300 })
        .with_min_region_size(60)
        .with_reconcile_passes(4);
    let first = segment_image(&image, &GridGenerator, &SrgbToLab, &config).expect("segment");
    let second = segment_image(&image, &GridGenerator, &SrgbToLab, &config).expect("segment");
    eprintln!(
        "  {} -> {} regions",
        first.report.initial_regions, first.report.final_regions
    );

    rp.compare_label_maps(&first.labels, &second.labels);
    rp.compare_values(
        1.0,
        if first.centers == second.centers { 1.0 } else { 0.0 },
        0.0,
    );

    // Contiguous labels from 1
    let n = first.labels.region_count() as u32;
    rp.compare_values(n as f64, first.labels.max_label() as f64, 0.0);
    rp.compare_values(n as f64, first.centers.len() as f64, 0.0);

    // Minimum size holds unless a region had nowhere to go
    for (label, count) in first.labels.label_counts() {
        let ok = count >= 60 || first.report.reconcile.unresolved.contains(&label);
        rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);
    }

    // Interior centers lie inside their regions
    for (&label, &[x, y]) in &first.centers.centers {
        if !first.centers.is_fallback(label) {
            let inside = first.labels.get_label(x, y).map(|l| l == label).unwrap_or(false);
            rp.compare_values(1.0, if inside { 1.0 } else { 0.0 }, 0.0);
        }
    }

    // --- Test 3: failures ---
    eprintln!("=== Failures ===");
    let broken = segment_image(&image, &BrokenGenerator, &SrgbToLab, &config);
    rp.compare_values(
        1.0,
        if matches!(broken, Err(PipelineError::Collaborator { .. })) { 1.0 } else { 0.0 },
        0.0,
    );
    let invalid = SegmentationConfig::new().with_merge_threshold(f64::NAN);
    let rejected = segment_image(&image, &GridGenerator, &SrgbToLab, &invalid);
    rp.compare_values(
        1.0,
        if matches!(rejected, Err(PipelineError::InvalidConfig(_))) { 1.0 } else { 0.0 },
        0.0,
    );

    assert!(rp.cleanup(), "pipeline regression test failed");
}

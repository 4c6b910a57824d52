//! colorbook-test - Regression test framework for colorbook
//!
//! This crate provides a small regression test framework supporting three
//! modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files
//! - **Display**: Run checks without golden comparison
//!
//! It also provides deterministic fixtures (label maps and color rasters)
//! and test logging setup.
//!
//! # Usage
//!
//! ```ignore
//! use colorbook_test::RegParams;
//!
//! let mut rp = RegParams::new("merge");
//! rp.compare_values(3.0, regions as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"
//! - `RUST_LOG`: Log specification for test output (default "warn")

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use colorbook_core::{ColorRaster, ColorVec, LabelMap};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Once;

static LOGGING: Once = Once::new();

/// Route `log` output of the crates under test to stderr
///
/// Safe to call from every test; only the first call installs the logger.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = flexi_logger::Logger::try_with_env_or_str("warn")
            .and_then(|logger| logger.log_to_stderr().start());
    });
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // colorbook-test is at crates/colorbook-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Build a label map from rows of labels
///
/// # Errors
///
/// Returns an error for empty or ragged rows.
pub fn label_map_from_rows(rows: &[&[u32]]) -> TestResult<LabelMap> {
    Ok(LabelMap::from_rows(rows)?)
}

/// Color raster painting every pixel with its label's color
///
/// # Arguments
///
/// * `labels` - Label map giving the raster dimensions
/// * `palette` - Color of each label
pub fn raster_from_label_colors<F>(labels: &LabelMap, palette: F) -> TestResult<ColorRaster>
where
    F: Fn(u32) -> ColorVec,
{
    let (w, h) = labels.dimensions();
    let pixels = labels.data().iter().map(|&l| palette(l)).collect();
    Ok(ColorRaster::from_pixels(w, h, pixels)?)
}

/// Deterministic random label map made of rectangular blocks
///
/// The image is tiled with `block` x `block` cells; each cell gets a label
/// drawn from `1..=max_label`, or background with probability
/// `background`.
///
/// # Errors
///
/// Returns an error for zero dimensions.
pub fn random_label_map(
    seed: u64,
    width: u32,
    height: u32,
    block: u32,
    max_label: u32,
    background: f64,
) -> TestResult<LabelMap> {
    let mut rng = StdRng::seed_from_u64(seed);
    let block = block.max(1);
    let cells_x = width.div_ceil(block);
    let cells_y = height.div_ceil(block);
    let cells: Vec<u32> = (0..cells_x * cells_y)
        .map(|_| {
            if rng.random_bool(background.clamp(0.0, 1.0)) {
                0
            } else {
                rng.random_range(1..=max_label.max(1))
            }
        })
        .collect();

    let mut labels = LabelMap::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let cell = cells[((y / block) * cells_x + x / block) as usize];
            labels.set_label(x, y, cell)?;
        }
    }
    Ok(labels)
}

/// Deterministic random color raster for a label map
///
/// Every label gets a random base color in `[0, 100)` per channel; each
/// pixel adds uniform noise of amplitude `noise`.
///
/// # Errors
///
/// Propagates raster construction errors.
pub fn random_label_colors(seed: u64, labels: &LabelMap, noise: f32) -> TestResult<ColorRaster> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut base: BTreeMap<u32, ColorVec> = BTreeMap::new();
    for label in labels.labels() {
        base.insert(label, std::array::from_fn(|_| rng.random_range(0.0..100.0)));
    }

    let (w, h) = labels.dimensions();
    let pixels = labels
        .data()
        .iter()
        .map(|label| {
            let color = base.get(label).copied().unwrap_or([0.0; 3]);
            if noise > 0.0 {
                color.map(|c| c + rng.random_range(-noise..noise))
            } else {
                color
            }
        })
        .collect();
    Ok(ColorRaster::from_pixels(w, h, pixels)?)
}

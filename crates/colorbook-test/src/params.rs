//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use colorbook_core::LabelMap;
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index, the mode and every
/// recorded failure.
pub struct RegParams {
    /// Name of the test (e.g., "merge")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "merge")
    ///
    /// # Returns
    ///
    /// A new `RegParams` instance configured from the `REGTEST_MODE`
    /// environment variable.
    pub fn new(test_name: &str) -> Self {
        Self::with_mode(test_name, RegTestMode::from_env())
    }

    /// Create new regression test parameters with an explicit mode
    pub fn with_mode(test_name: &str, mode: RegTestMode) -> Self {
        crate::init_test_logging();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        log::info!("{}_reg started (mode {:?})", test_name, mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record_failure(&mut self, msg: String) {
        log::error!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            self.record_failure(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two label maps for exact equality
    ///
    /// # Returns
    ///
    /// `true` if both maps have the same dimensions and labels.
    pub fn compare_label_maps(&mut self, expected: &LabelMap, actual: &LabelMap) -> bool {
        self.index += 1;

        if expected.dimensions() != actual.dimensions() {
            self.record_failure(format!(
                "Failure in {}_reg: label map comparison for index {} - dimension mismatch \
                 {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dimensions(),
                actual.dimensions()
            ));
            return false;
        }

        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b);
        if let Some(i) = mismatch {
            let (x, y) = expected.coords(i);
            self.record_failure(format!(
                "Failure in {}_reg: label map comparison for index {} - label mismatch at ({}, {})",
                self.test_name, self.index, x, y
            ));
            return false;
        }

        true
    }

    /// Compare two binary data arrays
    ///
    /// # Returns
    ///
    /// `true` if data is identical, `false` otherwise.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            self.record_failure(format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            ));
            false
        } else {
            true
        }
    }

    /// Write data to file and check against golden file
    ///
    /// # Arguments
    ///
    /// * `data` - Data to write
    /// * `ext` - File extension (e.g., "json")
    ///
    /// # Errors
    ///
    /// Returns an error if the output or golden file cannot be written or read.
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data).map_err(|e| TestError::Write {
            path: local_path.clone(),
            message: e.to_string(),
        })?;
        self.check_file(&local_path, ext)
    }

    /// Check a file against its golden counterpart
    ///
    /// In generate mode, copies the file to golden.
    /// In compare mode, compares with golden file.
    /// In display mode, does nothing.
    fn check_file(&mut self, local_path: &str, ext: &str) -> TestResult<()> {
        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                log::info!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    self.record_failure(format!(
                        "Failure in {}_reg: golden file not found: {}",
                        self.test_name, golden_path
                    ));
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data && !same_json(&local_data, &golden_data) {
                    self.record_failure(format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    ));
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            log::info!("SUCCESS: {}_reg", self.test_name);
        } else {
            log::error!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                log::error!("  {}", failure);
            }
        }

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Whether two byte buffers hold the same JSON document
fn same_json(a: &[u8], b: &[u8]) -> bool {
    match (
        serde_json::from_slice::<serde_json::Value>(a),
        serde_json::from_slice::<serde_json::Value>(b),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(
            mode,
            RegTestMode::Compare | RegTestMode::Generate | RegTestMode::Display
        ));
    }

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::with_mode("params_values", RegTestMode::Display);
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.compare_values(1.0, f64::NAN, 1.0));
        assert_eq!(rp.failures().len(), 2);
        assert_eq!(rp.index(), 4);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_label_maps() {
        let mut rp = RegParams::with_mode("params_labels", RegTestMode::Display);
        let a = LabelMap::from_rows(&[&[1, 2], &[3, 4]]).unwrap();
        let b = LabelMap::from_rows(&[&[1, 2], &[3, 5]]).unwrap();
        let c = LabelMap::from_rows(&[&[1, 2, 3, 4]]).unwrap();

        assert!(rp.compare_label_maps(&a, &a.clone()));
        assert!(!rp.compare_label_maps(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));
        assert!(!rp.compare_label_maps(&a, &c));
    }

    #[test]
    fn test_golden_round_trip() {
        let data = br#"{"centers":{"1":[2,3]},"sizes":{"1":9}}"#;

        let mut rp = RegParams::with_mode("params_golden", RegTestMode::Generate);
        rp.write_data_and_check(data, "json").unwrap();
        assert!(rp.cleanup());

        let mut rp = RegParams::with_mode("params_golden", RegTestMode::Compare);
        let reformatted = br#"{ "sizes": {"1": 9}, "centers": {"1": [2, 3]} }"#;
        rp.write_data_and_check(reformatted, "json").unwrap();
        assert!(rp.is_success());

        rp.index = 0;
        rp.write_data_and_check(b"{}", "json").unwrap();
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_missing_golden_is_failure() {
        let mut rp = RegParams::with_mode("params_no_golden", RegTestMode::Compare);
        rp.write_data_and_check(b"x", "never_generated").unwrap();
        assert!(!rp.is_success());
    }
}

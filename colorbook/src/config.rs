//! Pipeline configuration
//!
//! [`SegmentationConfig`] gathers every tunable of the pipeline. It loads
//! from partial JSON documents; missing fields take their defaults.

use crate::error::{PipelineError, PipelineResult};
use colorbook_region::{
    CenterOptions, MergeOptions, ReconcileOptions, ReconcileScoring, WeightPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Target number of superpixels requested from the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SegmentCount {
    /// Fixed count regardless of image size
    Fixed { count: u32 },
    /// One segment per `pixels_per_segment` pixels, clamped to `[min, max]`
    Adaptive {
        pixels_per_segment: u32,
        min: u32,
        max: u32,
    },
}

impl Default for SegmentCount {
    fn default() -> Self {
        SegmentCount::Fixed { count: 12_000 }
    }
}

impl SegmentCount {
    /// Resolve the target count for an image of the given size
    pub fn resolve(&self, width: u32, height: u32) -> u32 {
        match *self {
            SegmentCount::Fixed { count } => count,
            SegmentCount::Adaptive {
                pixels_per_segment,
                min,
                max,
            } => {
                let area = width as u64 * height as u64;
                let count = area / pixels_per_segment.max(1) as u64;
                count.clamp(min as u64, max.max(min) as u64) as u32
            }
        }
    }
}

/// Configuration of the segmentation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Superpixel target count
    pub segments: SegmentCount,
    /// Superpixel compactness passed to the generator
    pub compactness: f64,
    /// Edges lighter than this are merged
    pub merge_threshold: f64,
    /// Regions smaller than this are absorbed into a neighbor
    pub min_region_size: u64,
    /// Compact labels into a contiguous range after reconciliation
    pub relabel: bool,
    /// First label of the compacted range
    pub relabel_base: u32,
    /// Edge weight policy of the region graph
    pub weight_policy: WeightPolicy,
    /// Neighbor selection rule for small regions
    pub reconcile_scoring: ReconcileScoring,
    /// Maximum number of reconciliation passes
    pub reconcile_passes: usize,
    /// Edge margin of the visual-center fallback
    pub center_margin: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            segments: SegmentCount::default(),
            compactness: 10.0,
            merge_threshold: 20.0,
            min_region_size: 300,
            relabel: true,
            relabel_base: 1,
            weight_policy: WeightPolicy::default(),
            reconcile_scoring: ReconcileScoring::default(),
            reconcile_passes: 1,
            center_margin: 5,
        }
    }
}

impl SegmentationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the superpixel target count
    pub fn with_segments(mut self, segments: SegmentCount) -> Self {
        self.segments = segments;
        self
    }

    /// Set the superpixel compactness
    pub fn with_compactness(mut self, compactness: f64) -> Self {
        self.compactness = compactness;
        self
    }

    /// Set the merge threshold
    pub fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Set the minimum region size
    pub fn with_min_region_size(mut self, size: u64) -> Self {
        self.min_region_size = size;
        self
    }

    /// Enable or disable relabeling
    pub fn with_relabel(mut self, relabel: bool) -> Self {
        self.relabel = relabel;
        self
    }

    /// Set the first label of the compacted range
    pub fn with_relabel_base(mut self, base: u32) -> Self {
        self.relabel_base = base;
        self
    }

    /// Set the edge weight policy
    pub fn with_weight_policy(mut self, policy: WeightPolicy) -> Self {
        self.weight_policy = policy;
        self
    }

    /// Set the reconciliation scoring rule
    pub fn with_reconcile_scoring(mut self, scoring: ReconcileScoring) -> Self {
        self.reconcile_scoring = scoring;
        self
    }

    /// Set the maximum number of reconciliation passes
    pub fn with_reconcile_passes(mut self, passes: usize) -> Self {
        self.reconcile_passes = passes;
        self
    }

    /// Set the visual-center edge margin
    pub fn with_center_margin(mut self, margin: u32) -> Self {
        self.center_margin = margin;
        self
    }

    /// Parse a configuration from JSON
    ///
    /// Missing fields take their default values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Format` for malformed JSON and
    /// `PipelineError::InvalidConfig` for out-of-range values.
    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Io` if the file cannot be read, otherwise as
    /// [`SegmentationConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Format` if serialization fails.
    pub fn to_json_string(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is in range
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidConfig` describing the first offending
    /// field.
    pub fn validate(&self) -> PipelineResult<()> {
        fn invalid(msg: impl Into<String>) -> PipelineResult<()> {
            Err(PipelineError::InvalidConfig(msg.into()))
        }

        match self.segments {
            SegmentCount::Fixed { count: 0 } => return invalid("segment count must be positive"),
            SegmentCount::Adaptive {
                pixels_per_segment,
                min,
                max,
            } => {
                if pixels_per_segment == 0 || min == 0 {
                    return invalid("adaptive segment parameters must be positive");
                }
                if min > max {
                    return invalid(format!("adaptive segment range {min}..{max} is empty"));
                }
            }
            SegmentCount::Fixed { .. } => {}
        }
        if !self.compactness.is_finite() || self.compactness <= 0.0 {
            return invalid(format!("compactness {} must be positive", self.compactness));
        }
        if !self.merge_threshold.is_finite() || self.merge_threshold < 0.0 {
            return invalid(format!(
                "merge threshold {} must be finite and non-negative",
                self.merge_threshold
            ));
        }
        if let WeightPolicy::SizeAware(params) = &self.weight_policy {
            let values = [
                params.tier1_ratio,
                params.tier1_scale,
                params.tier2_ratio,
                params.tier2_scale,
                params.large_region_penalty,
                params.high_difference,
                params.high_difference_factor,
            ];
            if values.iter().any(|v| !v.is_finite()) {
                return invalid("size-aware weight parameters must be finite");
            }
        }
        if self.reconcile_passes == 0 {
            return invalid("at least one reconciliation pass is required");
        }
        if self.relabel && self.relabel_base == 0 {
            return invalid("relabel base 0 is reserved for background");
        }
        Ok(())
    }

    /// Options for the hierarchical merge stage
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions::new().with_threshold(self.merge_threshold)
    }

    /// Options for the reconciliation stage
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::new()
            .with_min_region_size(self.min_region_size)
            .with_scoring(self.reconcile_scoring)
            .with_max_passes(self.reconcile_passes)
    }

    /// Options for the visual-center stage
    pub fn center_options(&self) -> CenterOptions {
        CenterOptions::new().with_margin(self.center_margin)
    }
}

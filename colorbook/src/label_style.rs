//! Region label styling
//!
//! Number labels drawn at each visual center scale with the region size.

use colorbook_region::VisualCenters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Size bucket of a region label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSizeClass {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
}

impl LabelSizeClass {
    /// Bucket for a region of `size` pixels
    pub fn from_region_size(size: u64) -> Self {
        match size {
            0..500 => LabelSizeClass::XSmall,
            500..1000 => LabelSizeClass::Small,
            1000..4000 => LabelSizeClass::Medium,
            4000..8000 => LabelSizeClass::Large,
            _ => LabelSizeClass::XLarge,
        }
    }

    /// CSS class name
    pub fn css_class(self) -> &'static str {
        match self {
            LabelSizeClass::XSmall => "region-label-xsmall",
            LabelSizeClass::Small => "region-label-small",
            LabelSizeClass::Medium => "region-label-medium",
            LabelSizeClass::Large => "region-label-large",
            LabelSizeClass::XLarge => "region-label-xlarge",
        }
    }
}

/// Scaling of label font size and outline stroke with region size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyleOptions {
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Region size mapped to the minimum style
    pub min_region_size: f64,
    /// Region size mapped to the maximum style
    pub max_region_size: f64,
    pub min_stroke_width: f64,
    pub max_stroke_width: f64,
}

impl Default for LabelStyleOptions {
    fn default() -> Self {
        Self {
            min_font_size: 6.0,
            max_font_size: 14.0,
            min_region_size: 100.0,
            max_region_size: 10_000.0,
            min_stroke_width: 0.2,
            max_stroke_width: 1.0,
        }
    }
}

/// Style of one region label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelStyle {
    /// Font size, whole points
    pub font_size: u32,
    /// Outline stroke width, one decimal
    pub stroke_width: f64,
    pub size_class: LabelSizeClass,
}

impl LabelStyleOptions {
    fn normalized(&self, size: u64) -> f64 {
        let span = self.max_region_size - self.min_region_size;
        if span <= 0.0 {
            return if size as f64 >= self.max_region_size { 1.0 } else { 0.0 };
        }
        ((size as f64 - self.min_region_size) / span).clamp(0.0, 1.0)
    }

    /// Font size for a region of `size` pixels
    pub fn font_size(&self, size: u64) -> u32 {
        let t = self.normalized(size);
        (self.min_font_size + (self.max_font_size - self.min_font_size) * t)
            .round()
            .max(0.0) as u32
    }

    /// Stroke width for a region of `size` pixels
    pub fn stroke_width(&self, size: u64) -> f64 {
        let t = self.normalized(size);
        let width = self.min_stroke_width + (self.max_stroke_width - self.min_stroke_width) * t;
        (width * 10.0).round() / 10.0
    }

    /// Complete style for a region of `size` pixels
    pub fn style(&self, size: u64) -> LabelStyle {
        LabelStyle {
            font_size: self.font_size(size),
            stroke_width: self.stroke_width(size),
            size_class: LabelSizeClass::from_region_size(size),
        }
    }
}

/// Style of every region in a visual-center record, keyed by label
pub fn label_styles(centers: &VisualCenters, options: &LabelStyleOptions) -> BTreeMap<u32, LabelStyle> {
    centers
        .sizes
        .iter()
        .map(|(&label, &size)| (label, options.style(size)))
        .collect()
}

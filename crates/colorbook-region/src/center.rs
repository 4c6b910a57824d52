//! Visual center extraction
//!
//! Finds one label anchor per region: the interior pixel farthest from the
//! region's boundary. Regions whose deepest pixel lies within a fixed
//! margin of the image edge fall back to the distance-weighted centroid.

use crate::distance::squared_distance_transform;
use colorbook_core::{LabelBounds, LabelMap};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Options for visual center extraction
#[derive(Debug, Clone)]
pub struct CenterOptions {
    /// Points this close to the image edge trigger the centroid fallback
    pub margin: u32,
}

impl Default for CenterOptions {
    fn default() -> Self {
        Self { margin: 5 }
    }
}

impl CenterOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the edge margin
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }
}

/// Visual center and pixel count of every region
///
/// Serializes as `{"centers": {"<label>": [x, y]}, "sizes": {"<label>": n}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualCenters {
    /// Label to `[x, y]` pixel coordinate
    pub centers: BTreeMap<u32, [u32; 2]>,
    /// Label to pixel count
    pub sizes: BTreeMap<u32, u64>,
    /// Labels whose center came from the centroid fallback
    #[serde(skip)]
    pub fallbacks: BTreeSet<u32>,
}

impl VisualCenters {
    /// Number of regions with a center
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Whether no region has a center
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Center of a region as `(x, y)`
    pub fn center(&self, label: u32) -> Option<(u32, u32)> {
        self.centers.get(&label).map(|&[x, y]| (x, y))
    }

    /// Pixel count of a region
    pub fn size(&self, label: u32) -> Option<u64> {
        self.sizes.get(&label).copied()
    }

    /// Whether the region's center came from the centroid fallback
    pub fn is_fallback(&self, label: u32) -> bool {
        self.fallbacks.contains(&label)
    }
}

/// Compute the visual center of every non-background region
///
/// For each label the exact Euclidean distance to the nearest pixel of
/// another label is computed over the label's bounding box grown by one
/// pixel. Pixels outside the image do not count as background. The first
/// pixel of maximum distance in row-major order is the candidate; if it
/// lies within `options.margin` of the image edge the distance-weighted
/// centroid (truncated, clamped to the image) is used instead.
///
/// A label covering the whole image has no background; all its distances
/// are taken as 1.
pub fn compute_visual_centers(labels: &LabelMap, options: &CenterOptions) -> VisualCenters {
    let (width, height) = labels.dimensions();
    let mut result = VisualCenters::default();

    for (label, bounds) in labels.label_bounds() {
        let crop = bounds.expanded(1, width, height);
        let Some((x, y, size, fallback)) = region_center(labels, label, &crop, options.margin)
        else {
            continue;
        };
        result.centers.insert(label, [x, y]);
        result.sizes.insert(label, size);
        if fallback {
            result.fallbacks.insert(label);
        }
    }

    log::debug!(
        "visual centers: {} regions, {} centroid fallbacks",
        result.len(),
        result.fallbacks.len()
    );
    result
}

/// Center of one label within its crop window: `(x, y, size, fallback)`
fn region_center(
    labels: &LabelMap,
    label: u32,
    crop: &LabelBounds,
    margin: u32,
) -> Option<(u32, u32, u64, bool)> {
    let (cw, ch) = (crop.width() as usize, crop.height() as usize);
    let mut mask = Vec::with_capacity(cw * ch);
    for y in crop.min_y..=crop.max_y {
        let row = labels.row(y);
        mask.extend(
            row[crop.min_x as usize..=crop.max_x as usize]
                .iter()
                .map(|&l| l == label),
        );
    }

    let size = mask.iter().filter(|&&m| m).count() as u64;
    if size == 0 {
        return None;
    }

    let distance: Vec<f64> = match squared_distance_transform(&mask, cw, ch) {
        Some(squared) => squared.into_iter().map(f64::sqrt).collect(),
        None => vec![1.0; mask.len()],
    };

    let mut best: Option<(usize, f64)> = None;
    for (i, (&m, &d)) in mask.iter().zip(distance.iter()).enumerate() {
        if m && best.is_none_or(|(_, bd)| d > bd) {
            best = Some((i, d));
        }
    }
    let (best_index, _) = best?;
    let x = crop.min_x + (best_index % cw) as u32;
    let y = crop.min_y + (best_index / cw) as u32;

    let (width, height) = (labels.width() as i64, labels.height() as i64);
    let (xi, yi, m) = (x as i64, y as i64, margin as i64);
    if xi > m && xi < width - m && yi > m && yi < height - m {
        return Some((x, y, size, false));
    }

    let (mut sum_x, mut sum_y, mut total) = (0.0, 0.0, 0.0);
    for (i, (&m, &d)) in mask.iter().zip(distance.iter()).enumerate() {
        if !m {
            continue;
        }
        sum_x += (crop.min_x as usize + i % cw) as f64 * d;
        sum_y += (crop.min_y as usize + i / cw) as f64 * d;
        total += d;
    }
    let cx = ((sum_x / total) as i64).clamp(0, width - 1) as u32;
    let cy = ((sum_y / total) as i64).clamp(0, height - 1) as u32;
    Some((cx, cy, size, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_square() {
        let mut labels = LabelMap::new(21, 21).unwrap();
        for y in 5..16 {
            for x in 5..16 {
                labels.set_label(x, y, 1).unwrap();
            }
        }
        let centers = compute_visual_centers(&labels, &CenterOptions::default());

        assert_eq!(centers.center(1), Some((10, 10)));
        assert_eq!(centers.size(1), Some(121));
        assert!(!centers.is_fallback(1));
    }

    #[test]
    fn test_edge_regions_fall_back_to_centroid() {
        let mut labels = LabelMap::new_with_value(10, 10, 2).unwrap();
        for y in 0..10 {
            for x in 0..3 {
                labels.set_label(x, y, 1).unwrap();
            }
        }
        let centers = compute_visual_centers(&labels, &CenterOptions::default());

        assert_eq!(centers.len(), 2);
        assert_eq!(centers.center(1), Some((0, 4)));
        assert_eq!(centers.center(2), Some((7, 4)));
        assert!(centers.is_fallback(1));
        assert!(centers.is_fallback(2));
        assert_eq!(centers.size(2), Some(70));
    }

    #[test]
    fn test_whole_image_region() {
        let labels = LabelMap::new_with_value(3, 3, 4).unwrap();
        let centers = compute_visual_centers(&labels, &CenterOptions::default());
        assert_eq!(centers.center(4), Some((1, 1)));
        assert!(centers.is_fallback(4));
    }

    #[test]
    fn test_zero_margin_keeps_edge_point() {
        let labels = LabelMap::from_rows(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 2]]).unwrap();
        let centers = compute_visual_centers(&labels, &CenterOptions::new().with_margin(0));
        // (0,0) is the deepest pixel of label 1 and x == margin triggers the fallback
        assert!(centers.is_fallback(1));
        assert!(!centers.is_fallback(2));
        assert_eq!(centers.center(2), Some((2, 2)));
    }

    #[test]
    fn test_background_only_map() {
        let labels = LabelMap::new(8, 8).unwrap();
        let centers = compute_visual_centers(&labels, &CenterOptions::default());
        assert!(centers.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut centers = VisualCenters::default();
        centers.centers.insert(3, [4, 5]);
        centers.sizes.insert(3, 12);
        centers.fallbacks.insert(3);

        let json = serde_json::to_string(&centers).unwrap();
        assert_eq!(json, r#"{"centers":{"3":[4,5]},"sizes":{"3":12}}"#);

        let back: VisualCenters = serde_json::from_str(&json).unwrap();
        assert_eq!(back.center(3), Some((4, 5)));
        assert!(!back.is_fallback(3));
    }
}

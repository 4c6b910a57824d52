//! Per-label statistics
//!
//! Counting, enumeration and bounding boxes of the non-background labels
//! in a [`LabelMap`].

use super::LabelMap;
use std::collections::{BTreeMap, BTreeSet};

/// Inclusive bounding box of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl LabelBounds {
    fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Box width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Box height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Grow the box by `margin` on every side, clipped to a `width` x `height` image
    pub fn expanded(&self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(margin),
            min_y: self.min_y.saturating_sub(margin),
            max_x: (self.max_x + margin).min(width - 1),
            max_y: (self.max_y + margin).min(height - 1),
        }
    }
}

impl LabelMap {
    /// Pixel count of every non-background label, keyed by label
    pub fn label_counts(&self) -> BTreeMap<u32, u64> {
        let mut counts = BTreeMap::new();
        for &label in self.data.iter().filter(|&&l| l != Self::BACKGROUND) {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Number of background pixels
    pub fn background_count(&self) -> u64 {
        self.data
            .iter()
            .filter(|&&l| l == Self::BACKGROUND)
            .count() as u64
    }

    /// The set of non-background labels present in the map
    pub fn labels(&self) -> BTreeSet<u32> {
        self.data
            .iter()
            .copied()
            .filter(|&l| l != Self::BACKGROUND)
            .collect()
    }

    /// Number of distinct non-background labels
    pub fn region_count(&self) -> usize {
        self.labels().len()
    }

    /// Largest label value, or 0 for an all-background map
    pub fn max_label(&self) -> u32 {
        self.data.iter().copied().max().unwrap_or(Self::BACKGROUND)
    }

    /// Bounding box of every non-background label
    pub fn label_bounds(&self) -> BTreeMap<u32, LabelBounds> {
        let mut bounds: BTreeMap<u32, LabelBounds> = BTreeMap::new();
        for y in 0..self.height {
            for (x, &label) in self.row(y).iter().enumerate() {
                if label == Self::BACKGROUND {
                    continue;
                }
                bounds
                    .entry(label)
                    .and_modify(|b| b.include(x as u32, y))
                    .or_insert_with(|| LabelBounds::at(x as u32, y));
            }
        }
        bounds
    }

    /// Row-major pixel indices of each label in `wanted`
    pub fn label_pixels(&self, wanted: &BTreeSet<u32>) -> BTreeMap<u32, Vec<usize>> {
        let mut pixels: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, label) in self.data.iter().enumerate() {
            if wanted.contains(label) {
                pixels.entry(*label).or_default().push(idx);
            }
        }
        pixels
    }
}

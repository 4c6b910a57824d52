//! Color vectors and accumulators
//!
//! Colors are opaque 3-channel vectors in a perceptually uniform space
//! (typically CIE Lab). Distances between them are plain Euclidean
//! distances.

use serde::Serialize;

/// Number of channels in a color vector
pub const CHANNELS: usize = 3;

/// A single pixel's color as stored in a [`ColorRaster`](crate::ColorRaster)
pub type ColorVec = [f32; CHANNELS];

/// A mean color in double precision
pub type MeanColor = [f64; CHANNELS];

/// Euclidean distance between two mean colors
#[inline]
pub fn color_distance(a: &MeanColor, b: &MeanColor) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Running sum of colors and pixel count for one region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ColorSum {
    /// Per-channel color total
    pub total: MeanColor,
    /// Number of accumulated pixels
    pub count: u64,
}

impl ColorSum {
    /// Add one pixel's color
    #[inline]
    pub fn add(&mut self, color: &ColorVec) {
        for (t, c) in self.total.iter_mut().zip(color.iter()) {
            *t += *c as f64;
        }
        self.count += 1;
    }

    /// Fold another accumulator into this one
    #[inline]
    pub fn merge(&mut self, other: &ColorSum) {
        for (t, o) in self.total.iter_mut().zip(other.total.iter()) {
            *t += o;
        }
        self.count += other.count;
    }

    /// Mean color, or `None` if nothing was accumulated
    pub fn mean(&self) -> Option<MeanColor> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.total.map(|t| t / n))
    }
}

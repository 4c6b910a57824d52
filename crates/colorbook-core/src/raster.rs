//! ColorRaster - Per-pixel color vectors
//!
//! `ColorRaster` holds one [`ColorVec`] per pixel in a perceptually uniform
//! color space. It is produced by an external color-space converter and is
//! read-only for the consolidation pipeline.
//!
//! # Examples
//!
//! ```
//! use colorbook_core::{ColorRaster, LabelMap};
//!
//! let raster = ColorRaster::new_with_value(2, 1, [50.0, 0.0, 0.0]).unwrap();
//! let labels = LabelMap::from_rows(&[&[1, 2]]).unwrap();
//!
//! let sums = raster.label_sums(&labels).unwrap();
//! assert_eq!(sums[&1].mean().unwrap(), [50.0, 0.0, 0.0]);
//! ```

use crate::color::{CHANNELS, ColorSum, ColorVec};
use crate::error::{Error, Result};
use crate::label_map::LabelMap;
use std::collections::BTreeMap;

/// Color raster
///
/// Data is stored in row-major order with no padding. The color at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRaster {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Pixel colors (row-major, no padding)
    data: Vec<ColorVec>,
}

impl ColorRaster {
    /// Create a raster with every pixel set to `color`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, color: ColorVec) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(ColorRaster {
            width,
            height,
            data: vec![color; size],
        })
    }

    /// Create a raster from row-major pixel colors
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_pixels(width: u32, height: u32, data: Vec<ColorVec>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let expected_size = (width as usize) * (height as usize);
        if data.len() != expected_size {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{} = {}",
                data.len(),
                width,
                height,
                expected_size
            )));
        }

        Ok(ColorRaster {
            width,
            height,
            data,
        })
    }

    /// Create a raster from interleaved channel data (`c0 c1 c2 c0 c1 c2 ...`)
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_interleaved(width: u32, height: u32, data: &[f32]) -> Result<Self> {
        if data.len() % CHANNELS != 0 {
            return Err(Error::InvalidParameter(format!(
                "interleaved length {} is not a multiple of {}",
                data.len(),
                CHANNELS
            )));
        }

        let pixels = data
            .chunks_exact(CHANNELS)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Get the raster width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the raster height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the raster dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get the color at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_color(&self, x: u32, y: u32) -> Result<ColorVec> {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: idx,
                len: self.data.len(),
            });
        }
        Ok(self.data[idx])
    }

    /// Set the color at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_color(&mut self, x: u32, y: u32, color: ColorVec) -> Result<()> {
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: idx,
                len: self.data.len(),
            });
        }
        self.data[idx] = color;
        Ok(())
    }

    /// Get raw access to the pixel colors
    #[inline]
    pub fn data(&self) -> &[ColorVec] {
        &self.data
    }

    /// Accumulate color totals and pixel counts per non-background label
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` if the label map has a different size.
    pub fn label_sums(&self, labels: &LabelMap) -> Result<BTreeMap<u32, ColorSum>> {
        labels.ensure_dimensions(self.width, self.height)?;

        let mut sums: BTreeMap<u32, ColorSum> = BTreeMap::new();
        for (label, color) in labels.data().iter().zip(self.data.iter()) {
            if *label == LabelMap::BACKGROUND {
                continue;
            }
            sums.entry(*label).or_default().add(color);
        }
        Ok(sums)
    }
}

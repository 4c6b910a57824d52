//! LabelMap - Region label grid
//!
//! `LabelMap` is a 2D array of `u32` region labels, one per pixel. Label
//! [`LabelMap::BACKGROUND`] (0) marks unassigned pixels and is excluded from
//! every region operation.
//!
//! See [`stats`] for per-label counting and bounding boxes.
//!
//! # Examples
//!
//! ```
//! use colorbook_core::LabelMap;
//!
//! let mut labels = LabelMap::from_rows(&[&[1, 1, 2], &[1, 2, 2]]).unwrap();
//! assert_eq!(labels.get_label(2, 0).unwrap(), 2);
//!
//! labels.set_label(0, 1, 0).unwrap();
//! assert_eq!(labels.background_count(), 1);
//! ```

pub mod stats;

use crate::error::{Error, Result};
use serde::Serialize;

pub use stats::LabelBounds;

/// Pixel connectivity used when scanning neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

impl ConnectivityType {
    /// Neighbor offsets `(dx, dy)` for this connectivity, in raster order
    pub fn offsets(self) -> &'static [(i32, i32)] {
        const FOUR: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
        const EIGHT: [(i32, i32); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];
        match self {
            ConnectivityType::FourWay => &FOUR,
            ConnectivityType::EightWay => &EIGHT,
        }
    }
}

/// Region label grid
///
/// # Memory Layout
///
/// Data is stored in row-major order with no padding. The label at (x, y)
/// is at index `y * width + x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelMap {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Label data (row-major, no padding)
    data: Vec<u32>,
}

impl LabelMap {
    /// Label reserved for unassigned / background pixels
    pub const BACKGROUND: u32 = 0;

    /// Create a new label map with every pixel set to background
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_value(width, height, Self::BACKGROUND)
    }

    /// Create a new label map with every pixel set to `label`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if width or height is 0.
    pub fn new_with_value(width: u32, height: u32, label: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let size = (width as usize) * (height as usize);
        Ok(LabelMap {
            width,
            height,
            data: vec![label; size],
        })
    }

    /// Create a label map from raw row-major data
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
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

        Ok(LabelMap {
            width,
            height,
            data,
        })
    }

    /// Create a label map from a slice of equally sized rows
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` for an empty grid and
    /// `Error::InvalidParameter` for ragged rows.
    pub fn from_rows(rows: &[&[u32]]) -> Result<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width as usize {
                return Err(Error::InvalidParameter(format!(
                    "row {} has {} labels, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }

        Self::from_data(width, height, data)
    }

    /// Get the map width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the map height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the map dimensions as (width, height)
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len()
    }

    /// Row-major index of (x, y)
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Coordinates of a row-major index
    #[inline]
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Get the label at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn get_label(&self, x: u32, y: u32) -> Result<u32> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: self.index(x, y),
                len: self.data.len(),
            });
        }
        Ok(self.data[self.index(x, y)])
    }

    /// Set the label at (x, y)
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if coordinates are out of range.
    #[inline]
    pub fn set_label(&mut self, x: u32, y: u32, label: u32) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfBounds {
                index: self.index(x, y),
                len: self.data.len(),
            });
        }
        let idx = self.index(x, y);
        self.data[idx] = label;
        Ok(())
    }

    /// Get the label at (x, y) without bounds checking
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_label_unchecked(&self, x: u32, y: u32) -> u32 {
        self.data[self.index(x, y)]
    }

    /// Label at (x, y) with coordinates clamped into the map.
    ///
    /// Equivalent to reading a grid padded by edge replication.
    #[inline]
    pub fn get_label_clamped(&self, x: i64, y: i64) -> u32 {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.get_label_unchecked(cx, cy)
    }

    /// Coordinates of the neighbor at offset `(dx, dy)`, if inside the map
    #[inline]
    pub fn neighbor(&self, x: u32, y: u32, dx: i32, dy: i32) -> Option<(u32, u32)> {
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
            return None;
        }
        Some((nx as u32, ny as u32))
    }

    /// Get raw access to the label data
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Get mutable access to the label data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Consume the map and return its row-major data
    pub fn into_data(self) -> Vec<u32> {
        self.data
    }

    /// Get a row of labels
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = (y as usize) * (self.width as usize);
        &self.data[start..start + self.width as usize]
    }

    /// Check that another grid has the same dimensions as this map
    ///
    /// # Errors
    ///
    /// Returns `Error::DimensionMismatch` otherwise.
    pub fn ensure_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if (width, height) != self.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: (width, height),
            });
        }
        Ok(())
    }

    /// Replace every pixel labeled `from` with `to`, returning the count
    pub fn replace(&mut self, from: u32, to: u32) -> usize {
        let mut count = 0;
        for label in self.data.iter_mut().filter(|l| **l == from) {
            *label = to;
            count += 1;
        }
        count
    }

    /// Rewrite every label through `f`
    pub fn remap<F>(&mut self, mut f: F)
    where
        F: FnMut(u32) -> u32,
    {
        for label in self.data.iter_mut() {
            *label = f(*label);
        }
    }
}

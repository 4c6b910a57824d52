//! Colorbook Core - Basic data structures for region consolidation
//!
//! This crate provides the fundamental data structures shared by the
//! colorbook crates:
//!
//! - [`LabelMap`] - Region label grid (label 0 is background)
//! - [`ColorRaster`] - Per-pixel color vectors in a perceptually uniform space
//! - [`ColorSum`] - Color total and pixel count accumulator
//! - [`Error`] / [`Result`] - Core error type

pub mod color;
pub mod error;
pub mod label_map;
pub mod raster;

pub use color::{CHANNELS, ColorSum, ColorVec, MeanColor, color_distance};
pub use error::{Error, Result};
pub use label_map::{ConnectivityType, LabelBounds, LabelMap};
pub use raster::ColorRaster;

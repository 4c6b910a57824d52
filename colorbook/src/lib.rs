//! Colorbook - Region consolidation for coloring-book line art
//!
//! Turns an over-segmented image into a small set of paintable regions,
//! each with a stable interior anchor for its number label.
//!
//! # Overview
//!
//! - Region adjacency graph with size-aware edge weights
//! - Hierarchical merging of similar neighbors
//! - Absorption of regions below a minimum size
//! - Sequential relabeling
//! - Visual center extraction
//! - Average-color previews and label styling
//!
//! Superpixel generation is external; implement [`SuperpixelGenerator`]
//! and call [`segment_image`], or feed an existing label map to
//! [`consolidate`].
//!
//! # Example
//!
//! ```
//! use colorbook::{ColorRaster, LabelMap, SegmentationConfig, consolidate};
//!
//! let labels = LabelMap::from_rows(&[&[1, 1, 2, 2], &[1, 1, 2, 2]]).unwrap();
//! let colors = ColorRaster::new_with_value(4, 2, [50.0, 0.0, 0.0]).unwrap();
//! let config = SegmentationConfig::new().with_min_region_size(1);
//!
//! let result = consolidate(labels, &colors, &config).unwrap();
//! assert_eq!(result.report.final_regions, 1);
//! assert_eq!(result.centers.size(1), Some(8));
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod external;
pub mod label_style;
pub mod pipeline;

// Re-export core types (primary data structures used everywhere)
pub use colorbook_core::*;

// Re-export the region crate as a module
pub use colorbook_region as region;

pub use compose::{average_color_image, region_colors};
pub use config::{SegmentCount, SegmentationConfig};
pub use error::{PipelineError, PipelineResult};
pub use external::{ColorConverter, SrgbToLab, SuperpixelGenerator, segment_image};
pub use label_style::{LabelSizeClass, LabelStyle, LabelStyleOptions, label_styles};
pub use pipeline::{Segmentation, SegmentationReport, consolidate};

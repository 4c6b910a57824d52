//! colorbook-region - Region graph consolidation
//!
//! This crate turns an over-segmented label map into a small set of
//! paintable regions:
//!
//! - **Region graph** - Adjacency graph with policy-weighted edges
//! - **Hierarchical merging** - Greedy fusion of the most similar neighbors
//! - **Reconciliation** - Absorption of regions below a minimum size
//! - **Visual centers** - One interior anchor point per region
//! - **Relabeling** - Compaction of labels into a contiguous range
//!
//! # Examples
//!
//! ## Merging similar regions
//!
//! ```
//! use colorbook_region::{MergeOptions, WeightPolicy, build_region_graph, merge_hierarchical};
//! use colorbook_core::{ColorRaster, LabelMap};
//!
//! let mut labels = LabelMap::from_rows(&[&[1, 1, 2, 2], &[1, 1, 2, 2]]).unwrap();
//! let colors = ColorRaster::new_with_value(4, 2, [50.0, 0.0, 0.0]).unwrap();
//!
//! let mut graph = build_region_graph(&labels, &colors, WeightPolicy::Baseline).unwrap();
//! let report = merge_hierarchical(&mut labels, &mut graph, &MergeOptions::default()).unwrap();
//! assert_eq!(report.final_regions, 1);
//! assert!(labels.data().iter().all(|&l| l == 1));
//! ```
//!
//! ## Visual centers
//!
//! ```
//! use colorbook_region::{CenterOptions, compute_visual_centers};
//! use colorbook_core::LabelMap;
//!
//! let mut labels = LabelMap::new(21, 21).unwrap();
//! for y in 5..16 {
//!     for x in 5..16 {
//!         labels.set_label(x, y, 1).unwrap();
//!     }
//! }
//! let centers = compute_visual_centers(&labels, &CenterOptions::default());
//! assert_eq!(centers.center(1), Some((10, 10)));
//! ```

pub mod adjacency;
pub mod center;
pub mod distance;
pub mod error;
pub mod merge;
pub mod rag;
pub mod reconcile;
pub mod relabel;
pub mod weight;

// Re-export core types
pub use colorbook_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

// Re-export graph types and functions
pub use adjacency::{AdjacencyMap, adjacent_label_pairs, build_adjacency_map};
pub use rag::{RegionGraph, RegionNode, build_region_graph};
pub use weight::{SizeAwareParams, WeightPolicy};

// Re-export consolidation stages
pub use center::{CenterOptions, VisualCenters, compute_visual_centers};
pub use distance::squared_distance_transform;
pub use merge::{MergeOptions, MergeReport, merge_hierarchical};
pub use reconcile::{ReconcileOptions, ReconcileReport, ReconcileScoring, merge_small_regions};
pub use relabel::{RelabelMap, relabel_sequential};

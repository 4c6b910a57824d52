//! Region consolidation pipeline
//!
//! Runs the stages in order on one exclusively owned label map:
//!
//! 1. build the region graph
//! 2. hierarchical merge
//! 3. small-region reconciliation
//! 4. optional sequential relabeling
//! 5. visual center extraction

use crate::config::SegmentationConfig;
use crate::error::PipelineResult;
use colorbook_core::{ColorRaster, LabelMap};
use colorbook_region::{
    MergeReport, ReconcileReport, RelabelMap, VisualCenters, build_region_graph,
    compute_visual_centers, merge_hierarchical, merge_small_regions, relabel_sequential,
};
use serde::Serialize;

/// Diagnostics gathered from every stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentationReport {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Regions in the input label map
    pub initial_regions: usize,
    /// Hierarchical merge outcome
    pub merge: MergeReport,
    /// Reconciliation outcome; unresolved labels refer to the final label map
    pub reconcile: ReconcileReport,
    /// Old-to-new label mapping, when relabeling ran
    pub relabel: Option<RelabelMap>,
    /// Regions in the final label map
    pub final_regions: usize,
    /// Regions whose visual center came from the centroid fallback
    pub center_fallbacks: usize,
}

/// Result of the pipeline
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Final label map
    pub labels: LabelMap,
    /// Visual center and size of every final region
    pub centers: VisualCenters,
    /// Stage diagnostics
    pub report: SegmentationReport,
}

/// Consolidate an over-segmented label map into paintable regions
///
/// # Arguments
///
/// * `labels` - Initial label map (0 = background); consumed and returned
///   in the result
/// * `colors` - Per-pixel colors in a perceptually uniform space
/// * `config` - Pipeline configuration
///
/// # Errors
///
/// Returns `PipelineError::InvalidConfig` for an invalid configuration and
/// a dimension-mismatch error if `labels` and `colors` differ in size.
pub fn consolidate(
    mut labels: LabelMap,
    colors: &ColorRaster,
    config: &SegmentationConfig,
) -> PipelineResult<Segmentation> {
    config.validate()?;
    labels.ensure_dimensions(colors.width(), colors.height())?;

    let (width, height) = labels.dimensions();
    let mut report = SegmentationReport {
        width,
        height,
        initial_regions: labels.region_count(),
        ..SegmentationReport::default()
    };

    let mut graph = build_region_graph(&labels, colors, config.weight_policy)?;
    report.merge = merge_hierarchical(&mut labels, &mut graph, &config.merge_options())?;
    drop(graph);

    report.reconcile = merge_small_regions(&mut labels, colors, &config.reconcile_options())?;

    if config.relabel {
        let map = relabel_sequential(&mut labels, config.relabel_base)?;
        for label in &mut report.reconcile.unresolved {
            if let Some(new) = map.get(*label) {
                *label = new;
            }
        }
        report.relabel = Some(map);
    }

    let centers = compute_visual_centers(&labels, &config.center_options());
    report.final_regions = labels.region_count();
    report.center_fallbacks = centers.fallbacks.len();

    log::info!(
        "consolidated {} -> {} regions ({} merged, {} absorbed)",
        report.initial_regions,
        report.final_regions,
        report.merge.merges,
        report.reconcile.absorbed
    );

    Ok(Segmentation {
        labels,
        centers,
        report,
    })
}

//! Small-region reconciliation
//!
//! After hierarchical merging some regions can still be smaller than the
//! minimum size. Each of them is absorbed whole into the adjacent large
//! region it matches best, judged by the length of the shared boundary and
//! optionally by color similarity.
//!
//! The pass visits small regions in ascending label order. The set of
//! small regions and the color table are computed once per pass, so a
//! region enlarged during a pass is not re-evaluated until the next one.

use crate::adjacency::build_adjacency_map;
use crate::error::{RegionError, RegionResult};
use colorbook_core::{ColorRaster, ConnectivityType, LabelMap, MeanColor, color_distance};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// How the absorbing neighbor of a small region is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileScoring {
    /// Neighbor sharing the longest boundary
    BoundaryLength,
    /// Lowest `color distance / (boundary length + 1)`
    #[default]
    ColorBoundary,
}

/// Options for small-region reconciliation
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Regions with fewer pixels than this are absorbed
    pub min_region_size: u64,
    /// Neighbor selection rule
    pub scoring: ReconcileScoring,
    /// Maximum number of passes; the default single pass matches the
    /// classic behavior, larger values repeat while the map still changes
    pub max_passes: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            min_region_size: 300,
            scoring: ReconcileScoring::default(),
            max_passes: 1,
        }
    }
}

impl ReconcileOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum region size
    pub fn with_min_region_size(mut self, size: u64) -> Self {
        self.min_region_size = size;
        self
    }

    /// Set the neighbor scoring rule
    pub fn with_scoring(mut self, scoring: ReconcileScoring) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the maximum number of passes
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }
}

/// Outcome of reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Regions under the minimum size at the start of the first pass
    pub small_regions: usize,
    /// Regions absorbed into a neighbor, over all passes
    pub absorbed: usize,
    /// Small regions left in place in the last pass for lack of a qualifying neighbor
    pub unresolved: Vec<u32>,
    /// Passes run
    pub passes: usize,
}

struct PassOutcome {
    small: usize,
    absorbed: usize,
    unresolved: Vec<u32>,
}

/// Absorb regions smaller than `min_region_size` into their best neighbor
///
/// Candidates of a small region are its 8-adjacent labels that are neither
/// background nor small themselves. The boundary length of a candidate is
/// the number of its pixels 4-adjacent to the small region; candidates
/// with no such pixel are skipped. A small region without any remaining
/// candidate is left unchanged and reported in
/// [`ReconcileReport::unresolved`].
///
/// # Errors
///
/// Returns a dimension-mismatch error if `labels` and `colors` differ in
/// size, and `RegionError::InvalidParameters` if `max_passes` is 0.
pub fn merge_small_regions(
    labels: &mut LabelMap,
    colors: &ColorRaster,
    options: &ReconcileOptions,
) -> RegionResult<ReconcileReport> {
    labels.ensure_dimensions(colors.width(), colors.height())?;
    if options.max_passes == 0 {
        return Err(RegionError::InvalidParameters(
            "max_passes must be at least 1".into(),
        ));
    }

    let mut report = ReconcileReport::default();
    for pass in 0..options.max_passes {
        let outcome = reconcile_pass(labels, colors, options)?;
        if pass == 0 {
            report.small_regions = outcome.small;
        }
        report.passes += 1;
        report.absorbed += outcome.absorbed;
        report.unresolved = outcome.unresolved;
        if outcome.absorbed == 0 {
            break;
        }
    }

    log::debug!(
        "reconciliation: {} small regions, {} absorbed, {} unresolved in {} pass(es)",
        report.small_regions,
        report.absorbed,
        report.unresolved.len(),
        report.passes
    );
    if !report.unresolved.is_empty() {
        log::warn!(
            "{} region(s) below {} px have no qualifying neighbor",
            report.unresolved.len(),
            options.min_region_size
        );
    }
    Ok(report)
}

fn reconcile_pass(
    labels: &mut LabelMap,
    colors: &ColorRaster,
    options: &ReconcileOptions,
) -> RegionResult<PassOutcome> {
    let small: BTreeSet<u32> = labels
        .label_counts()
        .into_iter()
        .filter(|&(_, count)| count < options.min_region_size)
        .map(|(label, _)| label)
        .collect();

    let mut outcome = PassOutcome {
        small: small.len(),
        absorbed: 0,
        unresolved: Vec::new(),
    };
    if small.is_empty() {
        return Ok(outcome);
    }

    let means: BTreeMap<u32, MeanColor> = match options.scoring {
        ReconcileScoring::BoundaryLength => BTreeMap::new(),
        ReconcileScoring::ColorBoundary => colors
            .label_sums(labels)?
            .into_iter()
            .filter_map(|(label, sum)| sum.mean().map(|m| (label, m)))
            .collect(),
    };
    let adjacency = build_adjacency_map(labels);
    let members = labels.label_pixels(&small);

    for &label in &small {
        let Some(pixels) = members.get(&label) else {
            continue;
        };

        let candidates: Vec<u32> = adjacency
            .get(&label)
            .into_iter()
            .flatten()
            .copied()
            .filter(|n| *n != LabelMap::BACKGROUND && !small.contains(n))
            .collect();
        if candidates.is_empty() {
            outcome.unresolved.push(label);
            continue;
        }

        let boundary = boundary_lengths(labels, label, pixels);
        let target = match options.scoring {
            ReconcileScoring::BoundaryLength => select_by_boundary(&candidates, &boundary),
            ReconcileScoring::ColorBoundary => {
                select_by_color(&candidates, &boundary, means.get(&label), &means)
            }
        };

        match target {
            Some(target) => {
                let data = labels.data_mut();
                for &idx in pixels {
                    data[idx] = target;
                }
                outcome.absorbed += 1;
                log::trace!(
                    "absorbed region {} ({} px) into {}",
                    label,
                    pixels.len(),
                    target
                );
            }
            None => outcome.unresolved.push(label),
        }
    }

    Ok(outcome)
}

/// Count, per label, the pixels 4-adjacent to (but outside) a region
fn boundary_lengths(labels: &LabelMap, label: u32, pixels: &[usize]) -> BTreeMap<u32, u64> {
    let mut ring: HashSet<usize> = HashSet::new();
    for &idx in pixels {
        let (x, y) = labels.coords(idx);
        for &(dx, dy) in ConnectivityType::FourWay.offsets() {
            if let Some((nx, ny)) = labels.neighbor(x, y, dx, dy)
                && labels.get_label_unchecked(nx, ny) != label
            {
                ring.insert(labels.index(nx, ny));
            }
        }
    }

    let data = labels.data();
    let mut lengths = BTreeMap::new();
    for idx in ring {
        *lengths.entry(data[idx]).or_insert(0) += 1;
    }
    lengths
}

fn select_by_boundary(candidates: &[u32], boundary: &BTreeMap<u32, u64>) -> Option<u32> {
    let mut best: Option<(u32, u64)> = None;
    for &candidate in candidates {
        let length = boundary.get(&candidate).copied().unwrap_or(0);
        if length == 0 {
            continue;
        }
        if best.is_none_or(|(_, l)| length > l) {
            best = Some((candidate, length));
        }
    }
    best.map(|(label, _)| label)
}

fn select_by_color(
    candidates: &[u32],
    boundary: &BTreeMap<u32, u64>,
    own_mean: Option<&MeanColor>,
    means: &BTreeMap<u32, MeanColor>,
) -> Option<u32> {
    let own_mean = own_mean?;
    let mut best: Option<(u32, f64)> = None;
    for &candidate in candidates {
        let length = boundary.get(&candidate).copied().unwrap_or(0);
        if length == 0 {
            continue;
        }
        let Some(mean) = means.get(&candidate) else {
            continue;
        };
        let score = color_distance(own_mean, mean) / (length as f64 + 1.0);
        if best.is_none_or(|(_, s)| score < s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster_for(labels: &LabelMap, palette: impl Fn(u32) -> [f32; 3]) -> ColorRaster {
        let (w, h) = labels.dimensions();
        let pixels = labels.data().iter().map(|&l| palette(l)).collect();
        ColorRaster::from_pixels(w, h, pixels).unwrap()
    }

    #[test]
    fn test_boundary_lengths_are_four_connected() {
        let labels = LabelMap::from_rows(&[&[2, 3, 3], &[4, 1, 3], &[4, 4, 5]]).unwrap();
        let lengths = boundary_lengths(&labels, 1, &[4]);
        // 2 and 5 touch the center only diagonally
        assert_eq!(lengths.get(&2), None);
        assert_eq!(lengths.get(&5), None);
        assert_eq!(lengths[&3], 2);
        assert_eq!(lengths[&4], 2);
    }

    #[test]
    fn test_no_small_regions_is_noop() {
        let mut labels = LabelMap::from_rows(&[&[1, 1, 2, 2]]).unwrap();
        let colors = raster_for(&labels, |_| [0.0; 3]);
        let options = ReconcileOptions::new().with_min_region_size(2);
        let report = merge_small_regions(&mut labels, &colors, &options).unwrap();
        assert_eq!(report.small_regions, 0);
        assert_eq!(report.absorbed, 0);
        assert_eq!(labels.data(), &[1, 1, 2, 2]);
    }

    #[test]
    fn test_boundary_scoring_picks_longest_boundary() {
        let mut labels = LabelMap::from_rows(&[
            &[1, 1, 1, 1, 1],
            &[1, 1, 9, 2, 2],
            &[2, 2, 2, 2, 2],
        ])
        .unwrap();
        let colors = raster_for(&labels, |l| match l {
            1 => [0.0, 0.0, 0.0],
            2 => [80.0, 0.0, 0.0],
            _ => [1.0, 0.0, 0.0],
        });
        let options = ReconcileOptions::new()
            .with_min_region_size(3)
            .with_scoring(ReconcileScoring::BoundaryLength);
        merge_small_regions(&mut labels, &colors, &options).unwrap();
        // 9 touches 1 above and left (2) and 2 right and below (2): tie -> lowest label
        assert_eq!(labels.get_label(2, 1).unwrap(), 1);
    }

    #[test]
    fn test_color_scoring_prefers_similar_neighbor() {
        let mut labels = LabelMap::from_rows(&[
            &[1, 1, 1, 1, 1],
            &[1, 1, 9, 2, 2],
            &[2, 2, 2, 2, 2],
        ])
        .unwrap();
        let colors = raster_for(&labels, |l| match l {
            1 => [0.0, 0.0, 0.0],
            2 => [80.0, 0.0, 0.0],
            _ => [78.0, 0.0, 0.0],
        });
        let options = ReconcileOptions::new().with_min_region_size(3);
        let report = merge_small_regions(&mut labels, &colors, &options).unwrap();
        assert_eq!(report.absorbed, 1);
        assert_eq!(labels.get_label(2, 1).unwrap(), 2);
    }

    #[test]
    fn test_region_without_large_neighbor_is_unresolved() {
        let mut labels = LabelMap::from_rows(&[&[0, 0, 0], &[0, 5, 0], &[0, 0, 0]]).unwrap();
        let colors = raster_for(&labels, |_| [0.0; 3]);
        let options = ReconcileOptions::new().with_min_region_size(10);
        let report = merge_small_regions(&mut labels, &colors, &options).unwrap();
        assert_eq!(report.unresolved, vec![5]);
        assert_eq!(labels.get_label(1, 1).unwrap(), 5);
    }

    #[test]
    fn test_single_pass_does_not_chain() {
        // 3 (small) only touches 2 (small), which touches 1 (large)
        let mut labels = LabelMap::from_rows(&[&[1, 1, 1, 1, 2, 3]]).unwrap();
        let colors = raster_for(&labels, |_| [0.0; 3]);

        let mut single = labels.clone();
        let report =
            merge_small_regions(&mut single, &colors, &ReconcileOptions::new().with_min_region_size(2))
                .unwrap();
        assert_eq!(report.unresolved, vec![3]);
        assert_eq!(single.data(), &[1, 1, 1, 1, 1, 3]);

        let options = ReconcileOptions::new()
            .with_min_region_size(2)
            .with_max_passes(4);
        let report = merge_small_regions(&mut labels, &colors, &options).unwrap();
        // the third pass finds nothing left to absorb
        assert_eq!(report.passes, 3);
        assert!(report.unresolved.is_empty());
        assert_eq!(labels.data(), &[1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut labels = LabelMap::from_rows(&[&[1, 2]]).unwrap();
        let colors = ColorRaster::new_with_value(1, 2, [0.0; 3]).unwrap();
        assert!(merge_small_regions(&mut labels, &colors, &ReconcileOptions::new()).is_err());

        let colors = ColorRaster::new_with_value(2, 1, [0.0; 3]).unwrap();
        let options = ReconcileOptions::new().with_max_passes(0);
        assert!(merge_small_regions(&mut labels, &colors, &options).is_err());
    }
}

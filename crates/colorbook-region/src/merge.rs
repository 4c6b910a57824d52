//! Hierarchical merging
//!
//! Greedy bottom-up coarsening of a [`RegionGraph`]: the lightest edge
//! below the threshold is merged, the merged region's edges are
//! reweighted, and the process repeats until no edge is lighter than the
//! threshold. Each merge removes one region, so the engine stops after at
//! most `regions - 1` merges.
//!
//! Candidate edges live in a binary heap with lazy invalidation: an entry
//! is acted upon only if its weight still matches the graph.

use crate::error::{RegionError, RegionResult};
use crate::rag::RegionGraph;
use colorbook_core::LabelMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

/// Options for hierarchical merging
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Edges lighter than this are merged
    pub merge_threshold: f64,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            merge_threshold: 20.0,
        }
    }
}

impl MergeOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the merge threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }
}

/// Outcome of a hierarchical merge
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeReport {
    /// Regions in the graph before merging
    pub initial_regions: usize,
    /// Number of merges performed
    pub merges: usize,
    /// Regions remaining after merging
    pub final_regions: usize,
    /// Weight of the last merged edge
    pub last_merge_weight: Option<f64>,
}

/// Heap entry; ordered so that the max-heap pops the lightest edge first,
/// breaking ties by the lowest label pair.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    weight: f64,
    lo: u32,
    hi: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| (other.lo, other.hi).cmp(&(self.lo, self.hi)))
    }
}

/// Follow merge links to the surviving label
fn resolve(merged_into: &BTreeMap<u32, u32>, mut label: u32) -> u32 {
    while let Some(&next) = merged_into.get(&label) {
        label = next;
    }
    label
}

/// Merge adjacent regions whose edge weight is below the threshold
///
/// Selects the minimum-weight edge (ties: lowest `(lo, hi)` pair) while its
/// weight is strictly below `options.merge_threshold`. The higher label is
/// absorbed into the lower one. When the engine halts, `labels` is rewritten
/// so every pixel carries its surviving label, and `graph` holds the final
/// regions and edges.
///
/// # Errors
///
/// Returns `RegionError::InvalidParameters` for a NaN threshold.
pub fn merge_hierarchical(
    labels: &mut LabelMap,
    graph: &mut RegionGraph,
    options: &MergeOptions,
) -> RegionResult<MergeReport> {
    let threshold = options.merge_threshold;
    if threshold.is_nan() {
        return Err(RegionError::InvalidParameters(
            "merge threshold must not be NaN".into(),
        ));
    }

    let mut report = MergeReport {
        initial_regions: graph.node_count(),
        ..MergeReport::default()
    };

    let mut heap: BinaryHeap<Candidate> = graph
        .edges()
        .filter(|(_, w)| *w < threshold)
        .map(|((lo, hi), weight)| Candidate { weight, lo, hi })
        .collect();
    let mut merged_into: BTreeMap<u32, u32> = BTreeMap::new();

    while let Some(candidate) = heap.pop() {
        let current = graph.edge_weight(candidate.lo, candidate.hi);
        if current.map(f64::to_bits) != Some(candidate.weight.to_bits()) {
            continue;
        }

        let (src, dst) = (candidate.hi, candidate.lo);
        let updated = graph.merge_nodes(src, dst)?;
        merged_into.insert(src, dst);
        report.merges += 1;
        report.last_merge_weight = Some(candidate.weight);
        log::trace!(
            "merged region {} into {} (weight {:.3})",
            src,
            dst,
            candidate.weight
        );

        heap.extend(
            updated
                .into_iter()
                .filter(|(_, w)| *w < threshold)
                .map(|((lo, hi), weight)| Candidate { weight, lo, hi }),
        );
    }

    if !merged_into.is_empty() {
        let mapping: BTreeMap<u32, u32> = merged_into
            .keys()
            .map(|&label| (label, resolve(&merged_into, label)))
            .collect();
        labels.remap(|label| mapping.get(&label).copied().unwrap_or(label));
    }

    report.final_regions = graph.node_count();
    log::debug!(
        "hierarchical merge: {} -> {} regions ({} merges, threshold {})",
        report.initial_regions,
        report.final_regions,
        report.merges,
        threshold
    );
    Ok(report)
}

//! Region adjacency graph
//!
//! The graph is an arena of [`RegionNode`]s keyed by label plus an edge
//! table keyed by the ordered label pair `(lo, hi)`. Merging two regions
//! removes an arena slot and rewrites edge entries; nothing holds a live
//! reference to a node, so the graph can shrink freely while the merge
//! engine runs.

use crate::adjacency::adjacent_label_pairs;
use crate::error::{RegionError, RegionResult};
use crate::weight::WeightPolicy;
use colorbook_core::{ColorRaster, ColorSum, ColorVec, LabelMap, MeanColor};
use std::collections::{BTreeMap, BTreeSet};

/// Color statistics of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionNode {
    label: u32,
    color: ColorSum,
    mean: MeanColor,
}

impl RegionNode {
    /// Create a node from accumulated color statistics
    ///
    /// Returns `None` for an empty accumulator.
    pub fn new(label: u32, color: ColorSum) -> Option<Self> {
        let mean = color.mean()?;
        Some(Self { label, color, mean })
    }

    /// Node of `count` pixels that all share `color`
    pub fn uniform(label: u32, color: ColorVec, count: u64) -> Self {
        let total = color.map(|c| c as f64 * count as f64);
        Self {
            label,
            color: ColorSum { total, count },
            mean: color.map(f64::from),
        }
    }

    /// Region label
    #[inline]
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Number of pixels in the region
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.color.count
    }

    /// Sum of the region's pixel colors
    #[inline]
    pub fn total_color(&self) -> MeanColor {
        self.color.total
    }

    /// Mean color (`total / count`)
    #[inline]
    pub fn mean_color(&self) -> MeanColor {
        self.mean
    }

    /// Accumulate another region's pixels into this one
    pub fn absorb(&mut self, src: &RegionNode) {
        self.color.merge(&src.color);
        if let Some(mean) = self.color.mean() {
            self.mean = mean;
        }
    }
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Region adjacency graph with policy-weighted edges
#[derive(Debug, Clone)]
pub struct RegionGraph {
    nodes: BTreeMap<u32, RegionNode>,
    neighbors: BTreeMap<u32, BTreeSet<u32>>,
    edges: BTreeMap<(u32, u32), f64>,
    policy: WeightPolicy,
}

impl RegionGraph {
    /// Create a graph from nodes and adjacent label pairs
    ///
    /// Pairs referring to unknown labels are ignored.
    pub fn from_parts<I>(nodes: I, pairs: &BTreeSet<(u32, u32)>, policy: WeightPolicy) -> Self
    where
        I: IntoIterator<Item = RegionNode>,
    {
        let nodes: BTreeMap<u32, RegionNode> = nodes.into_iter().map(|n| (n.label, n)).collect();
        let mut neighbors: BTreeMap<u32, BTreeSet<u32>> =
            nodes.keys().map(|&l| (l, BTreeSet::new())).collect();
        let mut edges = BTreeMap::new();

        for &(a, b) in pairs {
            let (Some(na), Some(nb)) = (nodes.get(&a), nodes.get(&b)) else {
                continue;
            };
            if a == b {
                continue;
            }
            edges.insert(edge_key(a, b), policy.compute_weight(na, nb));
            neighbors.entry(a).or_default().insert(b);
            neighbors.entry(b).or_default().insert(a);
        }

        Self {
            nodes,
            neighbors,
            edges,
            policy,
        }
    }

    /// Active weight policy
    pub fn policy(&self) -> &WeightPolicy {
        &self.policy
    }

    /// Number of regions in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a region by label
    pub fn node(&self, label: u32) -> Option<&RegionNode> {
        self.nodes.get(&label)
    }

    /// All regions in ascending label order
    pub fn nodes(&self) -> impl Iterator<Item = &RegionNode> {
        self.nodes.values()
    }

    /// Labels adjacent to `label`
    pub fn neighbors(&self, label: u32) -> impl Iterator<Item = u32> + '_ {
        self.neighbors.get(&label).into_iter().flatten().copied()
    }

    /// Weight of the edge between two labels, if they are adjacent
    pub fn edge_weight(&self, a: u32, b: u32) -> Option<f64> {
        self.edges.get(&edge_key(a, b)).copied()
    }

    /// All edges as `((lo, hi), weight)` in ascending pair order
    pub fn edges(&self) -> impl Iterator<Item = ((u32, u32), f64)> + '_ {
        self.edges.iter().map(|(&k, &w)| (k, w))
    }

    /// Absorb `src` into `dst`
    ///
    /// `dst` accumulates the color total and pixel count of `src`, takes
    /// over its edges (coalescing edges to shared neighbors), and every edge
    /// incident to `dst` is reweighted. Returns the reweighted edges.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::MissingRegion` if either label is absent and
    /// `RegionError::InvalidParameters` if `src == dst`.
    pub fn merge_nodes(&mut self, src: u32, dst: u32) -> RegionResult<Vec<((u32, u32), f64)>> {
        if src == dst {
            return Err(RegionError::InvalidParameters(format!(
                "cannot merge region {src} into itself"
            )));
        }
        if !self.nodes.contains_key(&dst) {
            return Err(RegionError::MissingRegion(dst));
        }
        let src_node = self
            .nodes
            .remove(&src)
            .ok_or(RegionError::MissingRegion(src))?;
        if let Some(dst_node) = self.nodes.get_mut(&dst) {
            dst_node.absorb(&src_node);
        }

        for n in self.neighbors.remove(&src).unwrap_or_default() {
            self.edges.remove(&edge_key(src, n));
            if let Some(set) = self.neighbors.get_mut(&n) {
                set.remove(&src);
            }
            if n == dst {
                continue;
            }
            self.neighbors.entry(dst).or_default().insert(n);
            self.neighbors.entry(n).or_default().insert(dst);
        }

        let mut updated = Vec::new();
        let Some(dst_node) = self.nodes.get(&dst) else {
            return Ok(updated);
        };
        for &n in self.neighbors.get(&dst).into_iter().flatten() {
            let Some(n_node) = self.nodes.get(&n) else {
                continue;
            };
            let key = edge_key(dst, n);
            let weight = self.policy.compute_weight(dst_node, n_node);
            self.edges.insert(key, weight);
            updated.push((key, weight));
        }

        Ok(updated)
    }
}

/// Build the region adjacency graph of a label map
///
/// Every non-background label becomes a node carrying its color total,
/// pixel count and mean color; every pair of 8-adjacent labels becomes an
/// edge weighted by `policy`.
///
/// # Errors
///
/// Returns a dimension-mismatch error if `labels` and `colors` differ in size.
pub fn build_region_graph(
    labels: &LabelMap,
    colors: &ColorRaster,
    policy: WeightPolicy,
) -> RegionResult<RegionGraph> {
    let sums = colors.label_sums(labels)?;
    let nodes = sums
        .into_iter()
        .filter_map(|(label, sum)| RegionNode::new(label, sum));
    let pairs = adjacent_label_pairs(labels);

    let graph = RegionGraph::from_parts(nodes, &pairs, policy);
    log::debug!(
        "region graph: {} regions, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

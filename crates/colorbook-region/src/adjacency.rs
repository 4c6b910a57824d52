//! Label adjacency
//!
//! Two labels are adjacent when any of their pixels touch in the
//! 8-neighborhood. The adjacency map used by the reconciliation pass is
//! built over an edge-replicated padding of the label grid, so regions on
//! the image border get a well-defined neighbor set.

use colorbook_core::{ConnectivityType, LabelMap};
use std::collections::{BTreeMap, BTreeSet};

/// Label → set of neighboring labels
///
/// Includes the background label both as a key and as a neighbor.
pub type AdjacencyMap = BTreeMap<u32, BTreeSet<u32>>;

/// Build the adjacency map of every label, background included
///
/// Each pixel is compared with its 8 neighbors in the grid padded by one
/// pixel of edge replication.
pub fn build_adjacency_map(labels: &LabelMap) -> AdjacencyMap {
    let mut adjacency = AdjacencyMap::new();
    let (w, h) = labels.dimensions();

    for y in 0..h {
        for x in 0..w {
            let center = labels.get_label_unchecked(x, y);
            let entry = adjacency.entry(center).or_default();
            for &(dx, dy) in ConnectivityType::EightWay.offsets() {
                let n = labels.get_label_clamped(x as i64 + dx as i64, y as i64 + dy as i64);
                if n != center {
                    entry.insert(n);
                }
            }
        }
    }

    adjacency
}

/// Unordered pairs `(lo, hi)` of non-background labels that are 8-adjacent
pub fn adjacent_label_pairs(labels: &LabelMap) -> BTreeSet<(u32, u32)> {
    // Forward half of the 8-neighborhood; the other half is symmetric.
    const FORWARD: [(i32, i32); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

    let mut pairs = BTreeSet::new();
    let (w, h) = labels.dimensions();

    for y in 0..h {
        for x in 0..w {
            let a = labels.get_label_unchecked(x, y);
            if a == LabelMap::BACKGROUND {
                continue;
            }
            for &(dx, dy) in &FORWARD {
                let Some((nx, ny)) = labels.neighbor(x, y, dx, dy) else {
                    continue;
                };
                let b = labels.get_label_unchecked(nx, ny);
                if b != LabelMap::BACKGROUND && b != a {
                    pairs.insert((a.min(b), a.max(b)));
                }
            }
        }
    }

    pairs
}

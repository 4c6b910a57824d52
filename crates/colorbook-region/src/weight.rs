//! Edge weight policies
//!
//! The weight of an edge measures how dissimilar two adjacent regions are;
//! the merge engine fuses the lightest edges first.
//!
//! - [`WeightPolicy::Baseline`]: Euclidean distance between mean colors.
//! - [`WeightPolicy::SizeAware`]: the baseline distance plus penalties that
//!   keep large regions from swallowing many small, similar neighbors and
//!   that protect strong color boundaries.

use crate::rag::RegionNode;
use colorbook_core::color_distance;
use serde::{Deserialize, Serialize};

/// Parameters of the size-aware weight policy
///
/// With `ratio = larger / smaller` pixel count and `d` the mean color
/// distance, the weight is
///
/// ```text
/// w = d
///   + (ratio - tier1_ratio) * tier1_scale     if ratio > tier1_ratio
///   + (ratio - tier2_ratio) * tier2_scale     if ratio > tier2_ratio
///   + large_region_penalty                    if combined > large_region_cap
/// w *= high_difference_factor                 if d > high_difference
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeAwareParams {
    /// Size ratio above which the first penalty tier applies
    pub tier1_ratio: f64,
    /// Penalty per unit of ratio above `tier1_ratio`
    pub tier1_scale: f64,
    /// Size ratio above which the second penalty tier applies
    pub tier2_ratio: f64,
    /// Penalty per unit of ratio above `tier2_ratio`
    pub tier2_scale: f64,
    /// Combined pixel count above which the flat penalty applies
    pub large_region_cap: u64,
    /// Flat penalty for merges producing a region above `large_region_cap`
    pub large_region_penalty: f64,
    /// Color distance above which the weight is inflated
    pub high_difference: f64,
    /// Inflation factor for high color differences
    pub high_difference_factor: f64,
}

impl Default for SizeAwareParams {
    fn default() -> Self {
        Self {
            tier1_ratio: 15.0,
            tier1_scale: 0.5,
            tier2_ratio: 30.0,
            tier2_scale: 1.0,
            large_region_cap: 10_000,
            large_region_penalty: 10.0,
            high_difference: 50.0,
            high_difference_factor: 1.2,
        }
    }
}

impl SizeAwareParams {
    /// Penalty added to the color distance for a pair of region sizes
    pub fn size_penalty(&self, count_a: u64, count_b: u64) -> f64 {
        let larger = count_a.max(count_b) as f64;
        let smaller = count_a.min(count_b).max(1) as f64;
        let ratio = larger / smaller;

        let mut penalty = 0.0;
        if ratio > self.tier1_ratio {
            penalty += (ratio - self.tier1_ratio) * self.tier1_scale;
        }
        if ratio > self.tier2_ratio {
            penalty += (ratio - self.tier2_ratio) * self.tier2_scale;
        }
        if count_a + count_b > self.large_region_cap {
            penalty += self.large_region_penalty;
        }
        penalty
    }
}

/// Edge weight policy used by the region graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Euclidean distance between mean colors
    Baseline,
    /// Color distance with size and contrast penalties
    SizeAware(SizeAwareParams),
}

impl Default for WeightPolicy {
    fn default() -> Self {
        WeightPolicy::SizeAware(SizeAwareParams::default())
    }
}

impl WeightPolicy {
    /// Weight of the edge between two regions
    pub fn compute_weight(&self, a: &RegionNode, b: &RegionNode) -> f64 {
        let distance = color_distance(&a.mean_color(), &b.mean_color());
        match self {
            WeightPolicy::Baseline => distance,
            WeightPolicy::SizeAware(params) => {
                let mut weight =
                    distance + params.size_penalty(a.pixel_count(), b.pixel_count());
                if distance > params.high_difference {
                    weight *= params.high_difference_factor;
                }
                weight
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(label: u32, color: [f32; 3], count: u64) -> RegionNode {
        RegionNode::uniform(label, color, count)
    }

    #[test]
    fn test_baseline_is_color_distance() {
        let a = node(1, [0.0, 0.0, 0.0], 10);
        let b = node(2, [3.0, 4.0, 0.0], 5000);
        assert_eq!(WeightPolicy::Baseline.compute_weight(&a, &b), 5.0);
    }

    #[test]
    fn test_size_aware_equal_sizes_matches_baseline() {
        let a = node(1, [0.0, 0.0, 0.0], 100);
        let b = node(2, [3.0, 4.0, 0.0], 100);
        let policy = WeightPolicy::default();
        assert_eq!(policy.compute_weight(&a, &b), 5.0);
    }

    #[test]
    fn test_size_penalty_tiers() {
        let params = SizeAwareParams::default();
        assert_eq!(params.size_penalty(10, 150), 0.0);
        // ratio 20: tier 1 only
        assert_eq!(params.size_penalty(10, 200), 2.5);
        // ratio 40: (40 - 15) * 0.5 + (40 - 30) * 1.0
        assert_eq!(params.size_penalty(10, 400), 22.5);
        // order of arguments does not matter
        assert_eq!(params.size_penalty(400, 10), 22.5);
    }

    #[test]
    fn test_size_penalty_monotonic_in_ratio() {
        let params = SizeAwareParams::default();
        let mut last = 0.0;
        for big in (10..2000).step_by(10) {
            let p = params.size_penalty(10, big);
            assert!(p >= last, "penalty decreased at size {big}");
            last = p;
        }
    }

    #[test]
    fn test_large_region_cap_penalty() {
        let params = SizeAwareParams::default();
        assert_eq!(params.size_penalty(5000, 5000), 0.0);
        assert_eq!(params.size_penalty(6000, 5000), 10.0);
    }

    #[test]
    fn test_high_difference_inflation() {
        let a = node(1, [0.0, 0.0, 0.0], 100);
        let b = node(2, [60.0, 0.0, 0.0], 100);
        let w = WeightPolicy::default().compute_weight(&a, &b);
        assert!((w - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_policy_serde_tagged() {
        let json = serde_json::to_string(&WeightPolicy::Baseline).unwrap();
        assert_eq!(json, r#"{"kind":"baseline"}"#);

        let policy: WeightPolicy =
            serde_json::from_str(r#"{"kind":"size_aware","tier1_ratio":12.0}"#).unwrap();
        match policy {
            WeightPolicy::SizeAware(p) => {
                assert_eq!(p.tier1_ratio, 12.0);
                assert_eq!(p.tier2_ratio, 30.0);
            }
            WeightPolicy::Baseline => panic!("expected size-aware policy"),
        }
    }
}

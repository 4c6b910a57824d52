//! Sequential relabeling
//!
//! Compacts the surviving region labels into a contiguous range so that
//! downstream consumers can index regions densely.

use crate::error::{RegionError, RegionResult};
use colorbook_core::LabelMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Forward mapping produced by [`relabel_sequential`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelabelMap {
    /// Old label to new label
    pub forward: BTreeMap<u32, u32>,
    /// First label of the new range
    pub base: u32,
}

impl RelabelMap {
    /// New label for an old one
    pub fn get(&self, old: u32) -> Option<u32> {
        self.forward.get(&old).copied()
    }

    /// Number of relabeled regions
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Whether no region was relabeled
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Old label for a new one
    pub fn inverse(&self, new: u32) -> Option<u32> {
        let offset = new.checked_sub(self.base)? as usize;
        self.forward.keys().nth(offset).copied()
    }
}

/// Renumber non-background labels to `base, base + 1, ...`
///
/// Labels keep their relative order; background stays 0 and pixel
/// membership is unchanged.
///
/// # Errors
///
/// Returns `RegionError::InvalidParameters` if `base` is 0 while the map
/// contains background pixels, or if the new range would overflow `u32`.
pub fn relabel_sequential(labels: &mut LabelMap, base: u32) -> RegionResult<RelabelMap> {
    let present = labels.labels();
    if base == LabelMap::BACKGROUND && labels.background_count() > 0 {
        return Err(RegionError::InvalidParameters(
            "relabel base 0 would merge a region with background".into(),
        ));
    }
    let last = u32::try_from(present.len().saturating_sub(1))
        .ok()
        .and_then(|n| base.checked_add(n));
    if last.is_none() {
        return Err(RegionError::InvalidParameters(format!(
            "{} regions do not fit in a label range starting at {base}",
            present.len()
        )));
    }

    let forward: BTreeMap<u32, u32> = present
        .into_iter()
        .enumerate()
        .map(|(i, old)| (old, base + i as u32))
        .collect();
    labels.remap(|label| {
        if label == LabelMap::BACKGROUND {
            label
        } else {
            forward.get(&label).copied().unwrap_or(label)
        }
    });

    log::debug!("relabeled {} regions from base {}", forward.len(), base);
    Ok(RelabelMap { forward, base })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relabel_compacts_labels() {
        let mut labels = LabelMap::from_rows(&[&[7, 7, 0], &[42, 3, 3]]).unwrap();
        let map = relabel_sequential(&mut labels, 1).unwrap();

        assert_eq!(labels.data(), &[2, 2, 0, 3, 1, 1]);
        assert_eq!(map.get(3), Some(1));
        assert_eq!(map.get(7), Some(2));
        assert_eq!(map.get(42), Some(3));
        assert_eq!(map.inverse(3), Some(42));
        assert_eq!(map.inverse(0), None);
    }

    #[test]
    fn test_relabel_base_zero() {
        let mut with_background = LabelMap::from_rows(&[&[0, 5]]).unwrap();
        assert!(matches!(
            relabel_sequential(&mut with_background, 0),
            Err(RegionError::InvalidParameters(_))
        ));
        assert_eq!(with_background.data(), &[0, 5]);

        let mut full = LabelMap::from_rows(&[&[9, 5]]).unwrap();
        relabel_sequential(&mut full, 0).unwrap();
        assert_eq!(full.data(), &[1, 0]);
    }

    #[test]
    fn test_relabel_overflow() {
        let mut labels = LabelMap::from_rows(&[&[1, 2]]).unwrap();
        assert!(relabel_sequential(&mut labels, u32::MAX).is_err());

        let mut single = LabelMap::from_rows(&[&[1, 0]]).unwrap();
        relabel_sequential(&mut single, u32::MAX).unwrap();
        assert_eq!(single.data(), &[u32::MAX, 0]);
    }

    #[test]
    fn test_relabel_background_only() {
        let mut labels = LabelMap::new(3, 3).unwrap();
        let map = relabel_sequential(&mut labels, 1).unwrap();
        assert!(map.is_empty());
        assert!(labels.data().iter().all(|&l| l == 0));
    }
}

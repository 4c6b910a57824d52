//! Average-color compositing
//!
//! Paints every region of a label map with the mean RGB color of its source
//! pixels, producing the flat preview used to pick palette colors.

use crate::error::PipelineResult;
use colorbook_core::LabelMap;
use image::{Rgb, RgbImage};
use std::collections::BTreeMap;

/// Mean RGB color of every non-background region
///
/// Channel means are rounded to the nearest integer.
///
/// # Errors
///
/// Returns a dimension-mismatch error if `labels` and `image` differ in size.
pub fn region_colors(labels: &LabelMap, image: &RgbImage) -> PipelineResult<BTreeMap<u32, [u8; 3]>> {
    labels.ensure_dimensions(image.width(), image.height())?;

    let mut sums: BTreeMap<u32, ([u64; 3], u64)> = BTreeMap::new();
    for (&label, pixel) in labels.data().iter().zip(image.pixels()) {
        if label == LabelMap::BACKGROUND {
            continue;
        }
        let (total, count) = sums.entry(label).or_insert(([0; 3], 0));
        for (t, &c) in total.iter_mut().zip(pixel.0.iter()) {
            *t += c as u64;
        }
        *count += 1;
    }

    Ok(sums
        .into_iter()
        .map(|(label, (total, count))| {
            let mean = total.map(|t| ((t as f64 / count as f64).round()).min(255.0) as u8);
            (label, mean)
        })
        .collect())
}

/// Render the average-color preview
///
/// Every region is filled with its mean color; background pixels are
/// painted `background`.
///
/// # Errors
///
/// Returns a dimension-mismatch error if `labels` and `image` differ in size.
pub fn average_color_image(
    labels: &LabelMap,
    image: &RgbImage,
    background: Rgb<u8>,
) -> PipelineResult<RgbImage> {
    let colors = region_colors(labels, image)?;
    let (width, height) = labels.dimensions();
    let out = RgbImage::from_fn(width, height, |x, y| {
        let label = labels.get_label_unchecked(x, y);
        colors.get(&label).map(|&c| Rgb(c)).unwrap_or(background)
    });
    Ok(out)
}

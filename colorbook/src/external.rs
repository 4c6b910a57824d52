//! External collaborators
//!
//! The pipeline starts from an over-segmented label map and a color raster
//! in a perceptually uniform space. Producing them is delegated to the
//! traits below; [`segment_image`] wires them to the consolidation stages.

use crate::config::SegmentationConfig;
use crate::error::PipelineResult;
use crate::pipeline::{Segmentation, consolidate};
use colorbook_core::{ColorRaster, LabelMap};
use image::RgbImage;

/// Source of the initial over-segmentation
pub trait SuperpixelGenerator {
    /// Segment `image` into roughly `target_count` compact superpixels
    ///
    /// Labels must be >= 1 over segmented pixels; 0 marks unassigned
    /// pixels. The map must have the image's dimensions.
    fn generate(
        &self,
        image: &RgbImage,
        target_count: u32,
        compactness: f64,
    ) -> PipelineResult<LabelMap>;
}

/// Conversion of the source image into the working color space
pub trait ColorConverter {
    /// Convert every pixel of `image`
    fn convert(&self, image: &RgbImage) -> PipelineResult<ColorRaster>;
}

/// D65 reference white
const WHITE: [f64; 3] = [0.950_47, 1.0, 1.088_83];
const EPSILON: f64 = 0.008_856;
const KAPPA: f64 = 903.3;

/// sRGB to CIE L\*a\*b\* (D65) converter
#[derive(Debug, Clone, Copy, Default)]
pub struct SrgbToLab;

impl SrgbToLab {
    /// Convert one 8-bit sRGB color to L\*a\*b\*
    pub fn convert_pixel(rgb: [u8; 3]) -> [f32; 3] {
        let linear = rgb.map(|c| {
            let c = c as f64 / 255.0;
            if c <= 0.040_45 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        });
        let [r, g, b] = linear;
        let xyz = [
            0.412_453 * r + 0.357_580 * g + 0.180_423 * b,
            0.212_671 * r + 0.715_160 * g + 0.072_169 * b,
            0.019_334 * r + 0.119_193 * g + 0.950_227 * b,
        ];

        let f = |t: f64| {
            if t > EPSILON {
                t.cbrt()
            } else {
                (KAPPA * t + 16.0) / 116.0
            }
        };
        let fx = f(xyz[0] / WHITE[0]);
        let fy = f(xyz[1] / WHITE[1]);
        let fz = f(xyz[2] / WHITE[2]);

        [
            (116.0 * fy - 16.0) as f32,
            (500.0 * (fx - fy)) as f32,
            (200.0 * (fy - fz)) as f32,
        ]
    }
}

impl ColorConverter for SrgbToLab {
    fn convert(&self, image: &RgbImage) -> PipelineResult<ColorRaster> {
        let pixels = image.pixels().map(|p| Self::convert_pixel(p.0)).collect();
        Ok(ColorRaster::from_pixels(image.width(), image.height(), pixels)?)
    }
}

/// Segment an image end to end
///
/// Resolves the superpixel target from `config`, runs `generator` and
/// `converter`, then consolidates the result with [`consolidate`].
///
/// # Errors
///
/// Propagates collaborator failures, configuration errors and any
/// pipeline stage error.
pub fn segment_image<G, C>(
    image: &RgbImage,
    generator: &G,
    converter: &C,
    config: &SegmentationConfig,
) -> PipelineResult<Segmentation>
where
    G: SuperpixelGenerator + ?Sized,
    C: ColorConverter + ?Sized,
{
    config.validate()?;
    let (width, height) = image.dimensions();
    let target = config.segments.resolve(width, height);
    log::info!(
        "segmenting {}x{} image into ~{} superpixels",
        width,
        height,
        target
    );

    let labels = generator.generate(image, target, config.compactness)?;
    let colors = converter.convert(image)?;
    consolidate(labels, &colors, config)
}

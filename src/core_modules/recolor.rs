// THEORY:
// The `recolor` module is the engine's final stage: a full-resolution,
// in-place pass that pulls background pixels toward their mapped palette
// color. Unlike extraction it visits every pixel, because a strided rewrite
// would leave visible banding.
//
// Key architectural principles:
// 1.  **Structure First**: Every pixel runs through the structural classifier
//     (recolor profile) before anything else. Text, outlines, accents and
//     high-contrast edges are left byte-identical; only background fill is
//     ever touched.
// 2.  **Blend, Never Replace**: A surviving pixel is matched to its nearest
//     dominant color by RGB distance, gated on similarity (> 0.3), and then
//     mixed toward the mapped palette color with a factor of at most 0.8.
//     Shading and gradients inside a background region survive because the
//     mix is proportional to how strongly the pixel matches the region.
// 3.  **Single Buffer**: The pass mutates the buffer it reads. The classifier's
//     neighbor-contrast rule can therefore observe already-blended top/left
//     neighbors; this order-dependence is part of the established behavior.
// 4.  **Alpha Passthrough**: The alpha channel is never written, anywhere.

use crate::core_modules::classifier::{RECOLOR_THRESHOLDS, classify};
use crate::core_modules::dominant::dominant::DominantColor;
use crate::core_modules::mapping::ColorMapping;
use crate::core_modules::pixel::pixel::Pixel;

/// A pixel must match its nearest dominant color more strongly than this to
/// be considered part of that background region.
const SIMILARITY_FLOOR: f64 = 0.3;
/// Fraction of the similarity carried into the blend.
const BLEND_SCALE: f64 = 0.7;
/// Hard cap on the blend factor; at least 20% of the original always remains.
const BLEND_CAP: f64 = 0.8;

/// Counters describing one blend pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyStats {
    /// Every pixel the pass visited (width * height).
    pub pixels_scanned: usize,
    /// Pixels actually moved toward a palette color.
    pub pixels_replaced: usize,
}

/// Finds the dominant entry nearest to `pixel` by Euclidean RGB distance.
/// First-seen minimum wins on ties. `None` only for an empty list.
fn closest_dominant<'a>(pixel: &Pixel, dominant_colors: &'a [DominantColor]) -> Option<&'a DominantColor> {
    let mut closest: Option<&DominantColor> = None;
    let mut minimum_distance = f64::INFINITY;
    for dominant in dominant_colors {
        let distance = pixel.distance_to(dominant.rgb);
        if distance < minimum_distance {
            minimum_distance = distance;
            closest = Some(dominant);
        }
    }
    closest
}

/// Blends background pixels of a row-major RGBA8 buffer toward their mapped
/// palette colors, in place. Structural pixels and pixels without a mapped
/// dominant color are left untouched. Returns counters for the pass.
pub fn apply_recolor(
    buffer: &mut [u8],
    width: u32,
    height: u32,
    dominant_colors: &[DominantColor],
    mapping: &ColorMapping,
) -> ApplyStats {
    let pixel_count = (width as usize) * (height as usize);
    let mut stats = ApplyStats {
        pixels_scanned: pixel_count,
        pixels_replaced: 0,
    };

    if pixel_count == 0 || dominant_colors.is_empty() || mapping.is_empty() {
        return stats;
    }

    for pixel_index in 0..pixel_count {
        let x = (pixel_index % width as usize) as u32;
        let y = (pixel_index / width as usize) as u32;

        if classify(buffer, width, height, x, y, &RECOLOR_THRESHOLDS).is_structural() {
            continue;
        }

        let pixel = Pixel::from_buffer(buffer, pixel_index);
        let Some(dominant) = closest_dominant(&pixel, dominant_colors) else {
            continue;
        };
        let Some(&mapped) = mapping.get(&dominant.id) else {
            continue;
        };

        let similarity = pixel.similarity_to(dominant.rgb);
        if similarity <= SIMILARITY_FLOOR {
            continue;
        }

        let blend = (similarity * BLEND_SCALE).min(BLEND_CAP);
        let mix = |original: u8, target: u8| -> u8 {
            (original as f64 * (1.0 - blend) + target as f64 * blend).round() as u8
        };

        let byte = pixel_index * 4;
        buffer[byte] = mix(pixel.red, mapped.0);
        buffer[byte + 1] = mix(pixel.green, mapped.1);
        buffer[byte + 2] = mix(pixel.blue, mapped.2);
        // buffer[byte + 3] stays untouched: alpha passes through.
        stats.pixels_replaced += 1;
    }

    stats
}

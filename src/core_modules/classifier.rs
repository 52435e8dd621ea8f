// THEORY:
// The `classifier` module decides, for a single pixel in context, whether that
// pixel is "structural" — likely part of text, an outline, a UI accent, a shadow
// or a highlight — or ordinary background fill. Structural pixels must never be
// recolored; background pixels are candidates for both dominant-color sampling
// and the blend pass.
//
// Key architectural principles:
// 1.  **Pure Classification**: The classifier holds no state. Given a buffer,
//     coordinates, and a threshold profile, it returns a `PixelClass`. The same
//     inputs always produce the same answer.
// 2.  **Profile-Driven Thresholds**: The sampling pass and the recolor pass use
//     the same predicates but slightly different cut-offs (sampling is stricter
//     about gray, recolor is stricter about near-black/white). Both profiles
//     live here as named constants so the two passes cannot drift apart.
// 3.  **Local Context Only**: The only neighborhood the classifier looks at is
//     the 4-neighbor red-channel contrast for interior pixels. Border pixels
//     skip that check, exactly as the extraction and blend passes expect.
//
// The predicate order matters and is part of the contract: near-black/white,
// shadow, highlight, accent saturation, text-gray, then edge contrast. The
// first matching rule names the classification.

use crate::core_modules::pixel::pixel::Pixel;

/// One cut-off profile for the structural predicates.
///
/// Channel bounds are strict (`< floor`, `> ceiling`); the luminance and
/// saturation bounds mirror the comparisons spelled out per pass.
#[derive(Debug, Clone, Copy)]
pub struct StructuralThresholds {
    /// All three channels strictly below this byte value: near-black.
    pub channel_floor: u8,
    /// All three channels strictly above this byte value: near-white.
    pub channel_ceiling: u8,
    /// Luminance strictly below this: shadow.
    pub luminance_min: f64,
    /// Luminance strictly above this: highlight.
    pub luminance_max: f64,
    /// HSV saturation (0..100) strictly above this: accent / UI element.
    pub saturation_max: f32,
    /// Saturation strictly below this, combined with `gray_luminance_min`,
    /// marks a likely text gray.
    pub gray_saturation_max: f32,
    /// Luminance strictly above this, combined with `gray_saturation_max`,
    /// marks a likely text gray.
    pub gray_luminance_min: f64,
    /// Interior pixels whose red channel differs from the mean red of their
    /// 4-neighbors by strictly more than this are edges.
    pub neighbor_contrast_max: f64,
}

/// Profile used while sampling for dominant background colors.
pub const SAMPLING_THRESHOLDS: StructuralThresholds = StructuralThresholds {
    channel_floor: 10,
    channel_ceiling: 245,
    luminance_min: 20.0,
    luminance_max: 230.0,
    saturation_max: 80.0,
    gray_saturation_max: 15.0,
    gray_luminance_min: 100.0,
    neighbor_contrast_max: 50.0,
};

/// Profile used by the full-resolution blend pass. Analogous rules, slightly
/// wider black/white bands and a stricter gray rule.
pub const RECOLOR_THRESHOLDS: StructuralThresholds = StructuralThresholds {
    channel_floor: 15,
    channel_ceiling: 240,
    luminance_min: 25.0,
    luminance_max: 235.0,
    saturation_max: 75.0,
    gray_saturation_max: 20.0,
    gray_luminance_min: 120.0,
    neighbor_contrast_max: 45.0,
};

/// The classification of a single pixel. Everything except `Background` is
/// structural and must survive the blend pass byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// All channels near the black or white extremes (text, outlines).
    NearBlackOrWhite,
    /// Luminance below the shadow cut-off.
    Shadow,
    /// Luminance above the highlight cut-off.
    Highlight,
    /// Saturation above the accent cut-off (UI elements, neon fills).
    Accent,
    /// Low-saturation, bright pixel — likely anti-aliased text gray.
    TextGray,
    /// High contrast against the 4-neighbor red average (edges, outlines).
    Edge,
    /// Ordinary background fill; a candidate for sampling and recoloring.
    Background,
}

impl PixelClass {
    pub fn is_structural(&self) -> bool {
        !matches!(self, PixelClass::Background)
    }
}

/// Classifies the pixel at `(x, y)` in a row-major RGBA8 buffer.
///
/// The neighbor contrast rule reads the buffer as it currently stands; during
/// an in-place blend pass the top and left neighbors may already be blended,
/// and that order-dependence is intended (single-buffer pass).
pub fn classify(
    buffer: &[u8],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    thresholds: &StructuralThresholds,
) -> PixelClass {
    let pixel_index = (y * width + x) as usize;
    let pixel = Pixel::from_buffer(buffer, pixel_index);

    let floor = thresholds.channel_floor;
    let ceiling = thresholds.channel_ceiling;
    if (pixel.red < floor && pixel.green < floor && pixel.blue < floor)
        || (pixel.red > ceiling && pixel.green > ceiling && pixel.blue > ceiling)
    {
        return PixelClass::NearBlackOrWhite;
    }

    let luminance = pixel.luminance();
    if luminance < thresholds.luminance_min {
        return PixelClass::Shadow;
    }
    if luminance > thresholds.luminance_max {
        return PixelClass::Highlight;
    }

    let (_, saturation, _) = pixel.hsv();
    if saturation > thresholds.saturation_max {
        return PixelClass::Accent;
    }
    if saturation < thresholds.gray_saturation_max && luminance > thresholds.gray_luminance_min {
        return PixelClass::TextGray;
    }

    // Interior pixels only: compare against the mean red of the 4-neighbors.
    if x > 0 && x < width - 1 && y > 0 && y < height - 1 {
        let red_at = |nx: u32, ny: u32| buffer[((ny * width + nx) * 4) as usize] as f64;
        let average_neighbor_red = (red_at(x, y - 1)
            + red_at(x, y + 1)
            + red_at(x - 1, y)
            + red_at(x + 1, y))
            / 4.0;
        let contrast = (pixel.red as f64 - average_neighbor_red).abs();
        if contrast > thresholds.neighbor_contrast_max {
            return PixelClass::Edge;
        }
    }

    PixelClass::Background
}

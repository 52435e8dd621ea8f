// THEORY:
// The `mapping` module assigns each extracted dominant color a target color
// from the caller's palette. The assignment is by hue alone: a warm tan
// background should land on the palette's warm entry even when the palette
// color is far brighter, so brightness and saturation are deliberately
// ignored here (the blend pass re-introduces them by mixing instead of
// replacing).
//
// Hue distance is linear on the 0..360 scale, not circular: 359 degrees and
// 1 degree count as nearly maximally distant. This matches the engine's
// established behavior; a wrap-aware metric (min(|a-b|, 360-|a-b|)) would
// re-map reddish backgrounds on some palettes, so the discontinuity is kept
// rather than silently changed.
//
// Ties keep the first palette entry that reached the minimum, so palette
// order matters to the caller. An empty palette produces an empty mapping,
// which the blend pass treats as "replace nothing".

use crate::core_modules::dominant::dominant::DominantColor;
use crate::core_modules::pixel::pixel::{Pixel, Rgb};
use std::collections::HashMap;

/// Map from dominant-color identity (quantized `"r,g,b"` key) to the palette
/// color it recolors toward. Ephemeral; lives for one filter invocation.
pub type ColorMapping = HashMap<String, Rgb>;

/// Linear hue distance on the 0..360 scale (no circular wrap).
fn hue_distance(a: f32, b: f32) -> f32 {
    (a - b).abs()
}

/// Assigns each dominant color the palette color with the nearest hue.
/// Pure function: identical inputs always produce the identical mapping.
pub fn map_colors_to_palette(
    dominant_colors: &[DominantColor],
    palette: &[Rgb],
) -> ColorMapping {
    let mut mapping = ColorMapping::new();
    if palette.is_empty() {
        return mapping;
    }

    // Palette hues do not depend on the dominant color; compute them once.
    let palette_hues: Vec<f32> = palette
        .iter()
        .map(|&color| Pixel::from_rgb(color).hue())
        .collect();

    for dominant in dominant_colors {
        let dominant_hue = Pixel::from_rgb(dominant.rgb).hue();

        let mut closest = palette[0];
        let mut minimum_distance = f32::INFINITY;
        for (palette_color, palette_hue) in palette.iter().zip(&palette_hues) {
            let distance = hue_distance(dominant_hue, *palette_hue);
            if distance < minimum_distance {
                minimum_distance = distance;
                closest = *palette_color;
            }
        }

        mapping.insert(dominant.id.clone(), closest);
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dominant(rgb: (u8, u8, u8), count: usize) -> DominantColor {
        DominantColor {
            rgb,
            count,
            id: format!("{},{},{}", rgb.0, rgb.1, rgb.2),
        }
    }

    #[test]
    fn nearest_hue_wins() {
        // A greenish background (hue ~140) against a red/green/blue palette.
        let dominants = vec![dominant((96, 168, 120), 100)];
        let palette = [(255, 0, 0), (0, 255, 0), (0, 0, 255)];

        let mapping = map_colors_to_palette(&dominants, &palette);
        assert_eq!(mapping.get("96,168,120"), Some(&(0, 255, 0)));
    }

    #[test]
    fn ties_keep_the_first_palette_entry() {
        // Both palette entries share the same hue; the first one must win.
        let dominants = vec![dominant((168, 96, 96), 10)];
        let palette = [(255, 0, 0), (128, 0, 0)];

        let mapping = map_colors_to_palette(&dominants, &palette);
        assert_eq!(mapping.get("168,96,96"), Some(&(255, 0, 0)));
    }

    #[test]
    fn empty_palette_yields_an_empty_mapping() {
        let dominants = vec![dominant((120, 144, 120), 50)];
        assert!(map_colors_to_palette(&dominants, &[]).is_empty());
    }

    #[test]
    fn mapping_is_pure() {
        let dominants = vec![
            dominant((120, 144, 120), 50),
            dominant((144, 120, 96), 30),
        ];
        let palette = [(200, 40, 40), (40, 200, 40), (40, 40, 200)];

        let first = map_colors_to_palette(&dominants, &palette);
        let second = map_colors_to_palette(&dominants, &palette);
        assert_eq!(first, second);
    }

    #[test]
    fn hue_distance_is_linear_not_circular() {
        // Hue 350 (magenta-red) vs palette hues 10 and 250: the linear metric
        // picks 250 (distance 100) over 10 (distance 340), even though the
        // wrapped distance to 10 would only be 20.
        let dominants = vec![dominant((200, 96, 113), 5)]; // hue ~350
        let near_red = (255, 43, 0); // hue ~10
        let violet = (43, 0, 255); // hue ~250

        let mapping = map_colors_to_palette(&dominants, &[near_red, violet]);
        assert_eq!(mapping.get("200,96,113"), Some(&violet));
    }
}

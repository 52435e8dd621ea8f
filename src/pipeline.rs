// THEORY:
// The `pipeline` module is the final, top-level API for the recolor engine.
// It encapsulates the three stages — dominant-color extraction, palette
// mapping, and the blend pass — behind a single, easy-to-use interface, and
// owns the one piece of input validation the engine insists on: the buffer
// length must agree with the declared dimensions before any stage runs.
//
// Everything degenerate below that bar is a behavior, not an error: a
// zero-area image, an empty palette, or an image whose every pixel is
// structural all produce `Outcome::Unchanged` with the buffer byte-identical
// to the input.

use crate::core_modules::dominant::dominant::{DominantColor, extract_dominant_colors};
use crate::core_modules::mapping::{ColorMapping, map_colors_to_palette};
use crate::core_modules::recolor::apply_recolor;
use thiserror::Error;

// Re-export key data structures for the public API.
pub use crate::core_modules::classifier::{PixelClass, StructuralThresholds, classify};
pub use crate::core_modules::pixel::pixel::Rgb;
pub use crate::core_modules::recolor::ApplyStats;

/// Errors the pipeline can report. All of them are programmer errors in the
/// caller; degenerate-but-valid inputs never error.
#[derive(Debug, Error)]
pub enum RecolorError {
    #[error(
        "pixel buffer holds {actual} bytes but {width}x{height} RGBA8 requires {expected}"
    )]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    /// A task was submitted to a recolor pool whose workers have shut down.
    #[error("recolor pool is shut down")]
    PoolShutDown,
}

/// Configuration for the RecolorPipeline.
///
/// The palette is an ordered list of 3 to 6 target colors by contract; other
/// lengths are accepted and degrade explicitly (an empty palette makes every
/// call a no-op) rather than erroring.
#[derive(Debug, Clone)]
pub struct RecolorConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub palette: Vec<Rgb>,
}

/// The detailed data package for a pass that changed pixels.
#[derive(Debug, Clone)]
pub struct RecolorSummary {
    /// The background colors extraction found, strongest first.
    pub dominant_colors: Vec<DominantColor>,
    /// Which palette color each dominant color was pulled toward.
    pub color_mapping: ColorMapping,
    /// Scan/replace counters from the blend pass.
    pub stats: ApplyStats,
}

/// The primary output of the pipeline for a single image.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Nothing was replaced; the buffer is byte-identical to the input.
    Unchanged,
    /// At least one pixel moved toward the palette.
    Recolored(RecolorSummary),
}

/// The main, top-level struct for the recolor engine.
pub struct RecolorPipeline {
    config: RecolorConfig,
}

impl RecolorPipeline {
    pub fn new(config: RecolorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecolorConfig {
        &self.config
    }

    /// Runs extract -> map -> apply over `buffer` in place.
    pub fn recolor_in_place(&self, buffer: &mut [u8]) -> Result<Outcome, RecolorError> {
        let width = self.config.image_width;
        let height = self.config.image_height;
        let expected = (width as usize) * (height as usize) * 4;
        if buffer.len() != expected {
            return Err(RecolorError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: buffer.len(),
            });
        }

        // Stage 1: sample for dominant background colors.
        let dominant_colors = extract_dominant_colors(buffer, width, height);

        // Stage 2: assign each dominant color a palette target by hue.
        let color_mapping = map_colors_to_palette(&dominant_colors, &self.config.palette);

        // Stage 3: blend background pixels toward their targets, in place.
        let stats = apply_recolor(buffer, width, height, &dominant_colors, &color_mapping);

        if stats.pixels_replaced == 0 {
            Ok(Outcome::Unchanged)
        } else {
            Ok(Outcome::Recolored(RecolorSummary {
                dominant_colors,
                color_mapping,
                stats,
            }))
        }
    }

    /// Convenience wrapper that leaves the input untouched and returns a new
    /// buffer alongside the outcome.
    pub fn recolor(&self, buffer: &[u8]) -> Result<(Vec<u8>, Outcome), RecolorError> {
        let mut owned = buffer.to_vec();
        let outcome = self.recolor_in_place(&mut owned)?;
        Ok((owned, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_buffer(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut buffer = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            buffer.extend_from_slice(&rgba);
        }
        buffer
    }

    fn pipeline(width: u32, height: u32, palette: Vec<Rgb>) -> RecolorPipeline {
        RecolorPipeline::new(RecolorConfig {
            image_width: width,
            image_height: height,
            palette,
        })
    }

    #[test]
    fn mismatched_buffer_length_fails_fast() {
        let pipeline = pipeline(4, 4, vec![(255, 0, 0), (0, 255, 0), (0, 0, 255)]);
        let mut short_buffer = vec![0u8; 12];

        let error = pipeline.recolor_in_place(&mut short_buffer).unwrap_err();
        match error {
            RecolorError::BufferSizeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_palette_is_a_byte_for_byte_no_op() {
        let pipeline = pipeline(4, 4, Vec::new());
        let mut buffer = solid_buffer(4, 4, [120, 160, 130, 255]);
        let original = buffer.clone();

        let outcome = pipeline.recolor_in_place(&mut buffer).unwrap();
        assert!(matches!(outcome, Outcome::Unchanged));
        assert_eq!(buffer, original);
    }

    #[test]
    fn zero_area_image_is_explicitly_supported() {
        let pipeline = pipeline(0, 0, vec![(255, 0, 0), (0, 255, 0), (0, 0, 255)]);
        let mut buffer: Vec<u8> = Vec::new();

        let outcome = pipeline.recolor_in_place(&mut buffer).unwrap();
        assert!(matches!(outcome, Outcome::Unchanged));
        assert!(buffer.is_empty());
    }

    #[test]
    fn background_image_recolors_toward_the_palette() {
        // A muted green background against a red-leaning palette.
        let palette = vec![(200, 40, 40), (40, 200, 40), (40, 40, 200)];
        let pipeline = pipeline(16, 16, palette);
        let mut buffer = solid_buffer(16, 16, [120, 168, 120, 255]);

        let outcome = pipeline.recolor_in_place(&mut buffer).unwrap();
        let Outcome::Recolored(summary) = outcome else {
            panic!("expected a recolored outcome");
        };

        assert_eq!(summary.dominant_colors.len(), 1);
        assert_eq!(summary.stats.pixels_replaced, 256);
        // The greenish background maps onto the green palette entry.
        assert_eq!(
            summary.color_mapping.get(&summary.dominant_colors[0].id),
            Some(&(40, 200, 40))
        );
        // Every pixel moved toward green, alpha untouched.
        for pixel in buffer.chunks(4) {
            assert!(pixel[1] > pixel[0] && pixel[1] > pixel[2]);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn tiny_image_keeps_its_black_and_white_pixels() {
        // 2x2: warm fill, near-black, near-white, muted green, single red palette.
        let pipeline = pipeline(2, 2, vec![(255, 0, 0)]);
        let mut buffer = vec![
            200, 100, 50, 255, //
            10, 10, 10, 255, //
            250, 250, 250, 255, //
            120, 180, 130, 255,
        ];

        pipeline.recolor_in_place(&mut buffer).unwrap();

        // Whatever happens to the background pixels, the near-black and
        // near-white ones come through untouched.
        assert_eq!(&buffer[4..8], &[10, 10, 10, 255]);
        assert_eq!(&buffer[8..12], &[250, 250, 250, 255]);
    }

    #[test]
    fn structural_only_image_comes_back_unchanged() {
        // Checkerboard of near-black and near-white: everything structural.
        let pipeline = pipeline(8, 8, vec![(255, 0, 0), (0, 255, 0), (0, 0, 255)]);
        let mut buffer = Vec::with_capacity(8 * 8 * 4);
        for pixel_index in 0..64 {
            if pixel_index % 2 == 0 {
                buffer.extend_from_slice(&[5, 5, 5, 255]);
            } else {
                buffer.extend_from_slice(&[252, 252, 252, 255]);
            }
        }
        let original = buffer.clone();

        let outcome = pipeline.recolor_in_place(&mut buffer).unwrap();
        assert!(matches!(outcome, Outcome::Unchanged));
        assert_eq!(buffer, original);
    }

    #[test]
    fn borrowing_wrapper_leaves_the_input_alone() {
        let palette = vec![(200, 40, 40), (40, 200, 40), (40, 40, 200)];
        let pipeline = pipeline(8, 8, palette);
        let input = solid_buffer(8, 8, [120, 168, 120, 255]);

        let (output, outcome) = pipeline.recolor(&input).unwrap();
        assert!(matches!(outcome, Outcome::Recolored(_)));
        assert_ne!(output, input);
        assert_eq!(input, solid_buffer(8, 8, [120, 168, 120, 255]));
    }
}

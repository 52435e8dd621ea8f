// THEORY:
// The `dominant` module estimates which colors act as an image's background.
// It is the first of the three engine stages and the only one that samples
// rather than scans: a stride is chosen so that roughly 15,000 pixels are
// inspected regardless of image size, which keeps extraction cost flat from
// thumbnails to wallpapers.
//
// Key architectural principles:
// 1.  **Sample, Classify, Tally**: Each sampled pixel runs through the
//     structural classifier (sampling profile). Survivors are quantized by
//     flooring each channel to a multiple of 24, which folds sensor noise and
//     gradient banding into shared buckets, then tallied by bucket.
// 2.  **Background Band Filter**: After sorting buckets by frequency, a second
//     filter keeps only colors that plausibly fill large regions: moderate
//     luminance, moderate saturation, moderate HSV value. Neon accents and
//     near-grays that slipped through sampling are dropped here.
// 3.  **Fails Closed**: If nothing survives, the result is an empty vector.
//     Downstream stages treat that as "make no replacements", never as an
//     error.
//
// The quantized bucket key doubles as the entry's stable identity; the mapping
// stage keys its palette assignments on it.

pub mod dominant {
    use crate::core_modules::classifier::{SAMPLING_THRESHOLDS, classify};
    use crate::core_modules::pixel::pixel::Pixel;
    use std::collections::HashMap;

    /// Extraction aims for this many samples per image, whatever its size.
    pub const TARGET_SAMPLE_COUNT: u32 = 15_000;
    /// Channels are floored to multiples of this before tallying.
    pub const QUANTIZATION_STEP: u8 = 24;
    /// At most this many background colors are reported.
    pub const MAX_DOMINANT_COLORS: usize = 5;

    // Background band: the frequency-sorted candidates must sit inside these
    // luminance / saturation / value ranges to count as background fill.
    const BACKGROUND_LUMINANCE_MIN: f64 = 30.0;
    const BACKGROUND_LUMINANCE_MAX: f64 = 220.0;
    const BACKGROUND_SATURATION_MIN: f32 = 10.0;
    const BACKGROUND_SATURATION_MAX: f32 = 70.0;
    // Compared on the unit scale (hsv() reports value 0..100; divide first).
    const BACKGROUND_VALUE_MIN: f32 = 0.2;
    const BACKGROUND_VALUE_MAX: f32 = 0.9;

    /// A frequently occurring, non-structural color sampled from an image;
    /// a stand-in for one background region.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DominantColor {
        /// The quantized RGB triple this bucket represents.
        pub rgb: (u8, u8, u8),
        /// How many samples fell into this bucket.
        pub count: usize,
        /// Stable identity: the quantized channels as `"r,g,b"`. The mapping
        /// stage keys palette assignments on this.
        pub id: String,
    }

    impl DominantColor {
        fn new(rgb: (u8, u8, u8), count: usize) -> Self {
            let id = format!("{},{},{}", rgb.0, rgb.1, rgb.2);
            DominantColor { rgb, count, id }
        }
    }

    /// Floors each channel to the nearest lower multiple of `QUANTIZATION_STEP`.
    fn quantize(pixel: &Pixel) -> (u8, u8, u8) {
        let step = QUANTIZATION_STEP;
        (
            (pixel.red / step) * step,
            (pixel.green / step) * step,
            (pixel.blue / step) * step,
        )
    }

    fn is_background_band(rgb: (u8, u8, u8)) -> bool {
        let pixel = Pixel::from_rgb(rgb);
        let luminance = pixel.luminance();
        let (_, saturation, value) = pixel.hsv();
        let value_unit = value / 100.0;

        (BACKGROUND_LUMINANCE_MIN..=BACKGROUND_LUMINANCE_MAX).contains(&luminance)
            && (BACKGROUND_SATURATION_MIN..=BACKGROUND_SATURATION_MAX).contains(&saturation)
            && (BACKGROUND_VALUE_MIN..=BACKGROUND_VALUE_MAX).contains(&value_unit)
    }

    /// Samples `buffer` (row-major RGBA8) and returns the top background
    /// colors by frequency, strongest first. Returns an empty vector when no
    /// sampled pixel survives the structural and background filters, or when
    /// the image has zero area.
    pub fn extract_dominant_colors(buffer: &[u8], width: u32, height: u32) -> Vec<DominantColor> {
        let pixel_count = (width as usize) * (height as usize);
        if pixel_count == 0 {
            return Vec::new();
        }

        // Stride so that roughly TARGET_SAMPLE_COUNT pixels get sampled.
        let stride = std::cmp::max(1, pixel_count / TARGET_SAMPLE_COUNT as usize);

        let mut tally: HashMap<(u8, u8, u8), usize> = HashMap::new();
        for pixel_index in (0..pixel_count).step_by(stride) {
            let x = (pixel_index % width as usize) as u32;
            let y = (pixel_index / width as usize) as u32;

            if classify(buffer, width, height, x, y, &SAMPLING_THRESHOLDS).is_structural() {
                continue;
            }

            let bucket = quantize(&Pixel::from_buffer(buffer, pixel_index));
            *tally.entry(bucket).or_insert(0) += 1;
        }

        let mut candidates: Vec<DominantColor> = tally
            .into_iter()
            .map(|(rgb, count)| DominantColor::new(rgb, count))
            .collect();

        // Descending frequency; ties break on the bucket color so that the
        // order is deterministic (a hash map tally has none of its own).
        candidates.sort_unstable_by(|a, b| b.count.cmp(&a.count).then(a.rgb.cmp(&b.rgb)));

        candidates.retain(|candidate| is_background_band(candidate.rgb));
        candidates.truncate(MAX_DOMINANT_COLORS);
        candidates
    }
}

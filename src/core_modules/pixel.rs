// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the recolor engine. It is a
// "dumb" data container for a single RGBA pixel plus the 1-dimensional heuristics
// the filter needs — metrics that can be computed from this pixel alone, with no
// knowledge of its neighbors. Anything that needs another pixel (the 4-neighbor
// contrast check) belongs in the `classifier` module.
//
// What lives here (by design):
// - Raw channels (RGBA) as bytes. Unlike a streaming video engine there is no
//   need to cache normalized or linearized variants; every heuristic is computed
//   on demand from the bytes.
// - Brightness: luminance (Rec. 601 luma, 0..255 weighted sum).
// - HSV: hue in degrees [0, 360), saturation and value scaled 0..100. These are
//   the canvas-compatible scales the threshold constants in `classifier` and
//   `dominant` are written against; keep them in lockstep.
// - Distance: Euclidean RGB distance and its normalized complement, similarity
//   in [0, 1], where 1.0 means identical color.
//
// Alpha is carried but never participates in any heuristic; the engine's
// contract is that alpha passes through every stage untouched.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Rgb = (Channel, Channel, Channel);
    pub type Luminance = f64;
    pub type Hue = f32;
    pub type Saturation = f32;
    pub type Value = f32;
    pub type Distance = f64;
    pub type Similarity = f64;

    /// The largest possible Euclidean distance between two RGB colors,
    /// i.e. the distance from black to white: sqrt(3 * 255^2).
    pub const MAX_RGB_DISTANCE: Distance = 441.6729559300637;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Builds an opaque pixel from an RGB triple. Palette colors have no
        /// alpha of their own, so they enter the heuristics this way.
        pub fn from_rgb((red, green, blue): Rgb) -> Self {
            Pixel::new(red, green, blue, 255)
        }

        /// Reads the pixel at `pixel_index` (row-major) out of a flat RGBA8 buffer.
        pub fn from_buffer(buffer: &[u8], pixel_index: usize) -> Self {
            let byte = pixel_index * 4;
            Pixel::new(
                buffer[byte],
                buffer[byte + 1],
                buffer[byte + 2],
                buffer[byte + 3],
            )
        }

        pub fn rgb(&self) -> Rgb {
            (self.red, self.green, self.blue)
        }

        /// =================================Heuristics==================================

        /// Luminance estimate (Rec. 601 luma).
        ///
        /// - Interprets perceived brightness as a weighted sum of RGB.
        /// - Stays on the 0..255 byte scale; the structural thresholds
        ///   (shadow < 20, highlight > 230, and friends) are written against it.
        pub fn luminance(&self) -> Luminance {
            0.299_f64 * self.red as f64
                + 0.587_f64 * self.green as f64
                + 0.114_f64 * self.blue as f64
        }

        /// HSV conversion on the canvas-compatible scales:
        /// hue in degrees [0, 360), saturation 0..100, value 0..100.
        ///
        /// Achromatic pixels (zero chroma) report hue 0.
        pub fn hsv(&self) -> (Hue, Saturation, Value) {
            let red_normalized = self.red as f32 / 255.0;
            let green_normalized = self.green as f32 / 255.0;
            let blue_normalized = self.blue as f32 / 255.0;

            let maximum_channel = red_normalized.max(green_normalized.max(blue_normalized));
            let minimum_channel = red_normalized.min(green_normalized.min(blue_normalized));
            let chroma = maximum_channel - minimum_channel;

            let saturation = if maximum_channel == 0.0 {
                0.0
            } else {
                chroma / maximum_channel
            };
            let value = maximum_channel;

            let hue_degrees = if chroma <= 1e-6 {
                0.0
            } else {
                let (base_difference, sector_offset) = if maximum_channel == red_normalized {
                    (
                        green_normalized - blue_normalized,
                        if green_normalized < blue_normalized {
                            6.0
                        } else {
                            0.0
                        },
                    )
                } else if maximum_channel == green_normalized {
                    (blue_normalized - red_normalized, 2.0)
                } else {
                    (red_normalized - green_normalized, 4.0)
                };
                (base_difference / chroma + sector_offset) * 60.0
            };

            (hue_degrees, saturation * 100.0, value * 100.0)
        }

        /// Hue angle in degrees [0, 360). Convenience accessor over `hsv()`.
        pub fn hue(&self) -> Hue {
            self.hsv().0
        }

        /// Euclidean distance to another RGB color in channel space.
        pub fn distance_to(&self, other: Rgb) -> Distance {
            let delta_red = self.red as f64 - other.0 as f64;
            let delta_green = self.green as f64 - other.1 as f64;
            let delta_blue = self.blue as f64 - other.2 as f64;
            (delta_red * delta_red + delta_green * delta_green + delta_blue * delta_blue).sqrt()
        }

        /// Similarity in [0, 1]: 1.0 for identical colors, 0.0 for the
        /// black-to-white diagonal. `1 - distance / MAX_RGB_DISTANCE`,
        /// clamped at zero.
        pub fn similarity_to(&self, other: Rgb) -> Similarity {
            (1.0 - self.distance_to(other) / MAX_RGB_DISTANCE).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    #[test]
    fn luminance_matches_rec601_weights() {
        let white = Pixel::new(255, 255, 255, 255);
        assert!((white.luminance() - 255.0).abs() < 1e-6);

        let red = Pixel::new(255, 0, 0, 255);
        assert!((red.luminance() - 0.299 * 255.0).abs() < 1e-6);
    }

    #[test]
    fn hsv_primary_hues() {
        let red = Pixel::new(255, 0, 0, 255);
        let green = Pixel::new(0, 255, 0, 255);
        let blue = Pixel::new(0, 0, 255, 255);

        assert!((red.hue() - 0.0).abs() < 1e-3);
        assert!((green.hue() - 120.0).abs() < 1e-3);
        assert!((blue.hue() - 240.0).abs() < 1e-3);
    }

    #[test]
    fn hsv_scales_are_canvas_compatible() {
        // A mid-gray has zero saturation and a 0..100-scale value.
        let gray = Pixel::new(128, 128, 128, 255);
        let (hue, saturation, value) = gray.hsv();
        assert_eq!(hue, 0.0);
        assert_eq!(saturation, 0.0);
        assert!((value - 128.0 / 255.0 * 100.0).abs() < 1e-3);

        // Fully saturated colors report saturation 100.
        let red = Pixel::new(255, 0, 0, 255);
        assert!((red.hsv().1 - 100.0).abs() < 1e-3);
    }

    #[test]
    fn distance_and_similarity_endpoints() {
        let black = Pixel::new(0, 0, 0, 255);
        assert!((black.distance_to((255, 255, 255)) - MAX_RGB_DISTANCE).abs() < 1e-9);
        assert!(black.similarity_to((255, 255, 255)).abs() < 1e-9);
        assert!((black.similarity_to((0, 0, 0)) - 1.0).abs() < 1e-9);
    }
}

// Thin PNG boundary over the `image` crate: decode a file into the flat RGBA8
// buffer the engine works on, and encode one back out. The engine itself never
// touches a file format; these helpers exist for the example runner and tests.

pub mod image_helper {
    use image::ImageEncoder;

    /// Encodes a row-major RGBA8 buffer as a PNG file.
    pub fn save(
        name: &str,
        width: u32,
        height: u32,
        buffer: &[u8],
    ) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(name)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(buffer, width, height, image::ExtendedColorType::Rgba8)?;

        Ok(())
    }

    /// Decodes an image file into `(buffer, width, height)`, converting to
    /// RGBA8 whatever the source format stores.
    pub fn load(name: &str) -> Result<(Vec<u8>, u32, u32), image::error::ImageError> {
        let decoded = image::open(name)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        Ok((decoded.into_raw(), width, height))
    }
}

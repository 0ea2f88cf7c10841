// Raster file I/O for the codec. Loading accepts anything the `image` crate can
// decode and flattens it to 8-bit RGB; saving picks the format from the file
// extension (PNG when there is none) and goes through the same atomic write as
// board files.

pub mod image_helper {
    use crate::core_modules::framer::write_atomic;
    use crate::error::Result;
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
    use log::{debug, warn};
    use std::io::Cursor;
    use std::path::Path;

    /// Loads an image from disk as 8-bit RGB. Alpha is dropped.
    pub fn load(path: &Path) -> Result<RgbImage> {
        let image = image::open(path)?.to_rgb8();
        debug!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    /// Encodes an RGB image as PNG in memory.
    pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new(&mut buffer);
        encoder.write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(buffer)
    }

    /// Saves an image in the format implied by `path`, atomically.
    pub fn save(path: &Path, image: &RgbImage) -> Result<()> {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        if matches!(format, ImageFormat::Jpeg | ImageFormat::Gif) {
            warn!(
                "{:?} output is lossy; {} will not match the encoded image exactly",
                format,
                path.display()
            );
        }

        let bytes = if format == ImageFormat::Png {
            encode_png(image)?
        } else {
            let mut cursor = Cursor::new(Vec::new());
            image.write_to(&mut cursor, format)?;
            cursor.into_inner()
        };

        write_atomic(path, &bytes)
    }
}

// THEORY:
// The `Pixel` module is the "dumb" data container for one RGB pixel, plus the
// read-only access capability (`PixelSource`) that the partitioner encodes from.
// The codec never sees an image type directly: anything with a width, a height
// and a bounds-checked `get_pixel` can be encoded. `image::RgbImage` is the
// production source; tests use small synthetic ones.

pub mod pixel {
    use crate::error::{CodecError, Result};
    use image::{Rgb, RgbImage};

    pub type Channel = u8;

    pub const CHANNELS: usize = 3;

    /// A single RGB pixel. Channel order is always red, green, blue.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        pub fn channels(&self) -> [Channel; CHANNELS] {
            [self.red, self.green, self.blue]
        }
    }

    impl From<Rgb<u8>> for Pixel {
        fn from(rgb: Rgb<u8>) -> Self {
            let [red, green, blue] = rgb.0;
            Pixel::new(red, green, blue)
        }
    }

    impl From<Pixel> for Rgb<u8> {
        fn from(pixel: Pixel) -> Self {
            Rgb(pixel.channels())
        }
    }

    /// Read-only pixel access for the encoder. Implementors must be safe to share
    /// across encode tasks; the encoder never mutates a source.
    pub trait PixelSource: Send + Sync {
        fn width(&self) -> u32;
        fn height(&self) -> u32;
        /// Returns the pixel at (`x`, `y`), or `PixelOutOfBounds`.
        fn get_pixel(&self, x: u32, y: u32) -> Result<Pixel>;
    }

    impl PixelSource for RgbImage {
        fn width(&self) -> u32 {
            self.dimensions().0
        }

        fn height(&self) -> u32 {
            self.dimensions().1
        }

        fn get_pixel(&self, x: u32, y: u32) -> Result<Pixel> {
            self.get_pixel_checked(x, y)
                .map(|rgb| Pixel::from(*rgb))
                .ok_or(CodecError::PixelOutOfBounds {
                    x,
                    y,
                    width: PixelSource::width(self),
                    height: PixelSource::height(self),
                })
        }
    }
}

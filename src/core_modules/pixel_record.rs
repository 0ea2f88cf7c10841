// THEORY:
// The `PixelRecord` is the Pixel Serializer. Where `Pixel` is a dumb container and
// `board` knows one byte at a time, a record knows how a whole pixel is laid out:
// three boards, always red, then green, then blue. No tag marks which board is
// which; the position IS the schema, so both sides must agree on the order.
//
// A record also carries the (x, y) coordinate it was read from. The coordinate is
// never written to disk: the framer emits records in row-major order and the
// decoder recovers coordinates from position alone. Inside the encoder it lets
// the partitioner produce records in any order and sort them afterwards.

use crate::core_modules::board::{self, SymbolGrid};
use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
use crate::error::Result;

/// Encodes each channel of a pixel onto its own board, in R, G, B order.
pub fn serialize_pixel(red: u8, green: u8, blue: u8) -> [SymbolGrid; CHANNELS] {
    [board::encode(red), board::encode(green), board::encode(blue)]
}

/// Decodes three boards, in R, G, B order, back into channel values.
pub fn deserialize_pixel(grids: &[SymbolGrid; CHANNELS]) -> Result<(u8, u8, u8)> {
    let [red, green, blue] = grids;
    Ok((board::decode(red)?, board::decode(green)?, board::decode(blue)?))
}

/// The serialized form of one pixel at a known coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRecord {
    pub x: u32,
    pub y: u32,
    pub channels: [SymbolGrid; CHANNELS],
}

impl PixelRecord {
    pub fn new(x: u32, y: u32, pixel: Pixel) -> Self {
        Self {
            x,
            y,
            channels: serialize_pixel(pixel.red, pixel.green, pixel.blue),
        }
    }

    /// Row-major sort key.
    pub fn position(&self) -> (u32, u32) {
        (self.y, self.x)
    }

    pub fn pixel(&self) -> Result<Pixel> {
        let (red, green, blue) = deserialize_pixel(&self.channels)?;
        Ok(Pixel::new(red, green, blue))
    }

    /// The three record lines, red first.
    pub fn lines(&self) -> [String; CHANNELS] {
        self.channels.map(|grid| grid.to_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_pixels_survive_a_round_trip() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let grids = serialize_pixel(r, g, b);
                    assert_eq!(deserialize_pixel(&grids).unwrap(), (r, g, b));
                }
            }
        }
    }

    #[test]
    fn channels_are_written_red_green_blue() {
        let record = PixelRecord::new(0, 0, Pixel::new(128, 0, 255));
        assert_eq!(record.lines(), ["OXOOOOOOO", "OOOOOOOOO", "OXXXXXXXX"].map(String::from));
        assert_eq!(board::decode(&record.channels[0]).unwrap(), 128);
        assert_eq!(board::decode(&record.channels[1]).unwrap(), 0);
        assert_eq!(board::decode(&record.channels[2]).unwrap(), 255);
    }

    #[test]
    fn swapped_boards_swap_channels() {
        let [r, g, b] = serialize_pixel(1, 2, 3);
        assert_eq!(deserialize_pixel(&[b, g, r]).unwrap(), (3, 2, 1));
    }

    #[test]
    fn record_keeps_its_coordinate() {
        let record = PixelRecord::new(4, 9, Pixel::new(1, 2, 3));
        assert_eq!(record.position(), (9, 4));
        assert_eq!(record.pixel().unwrap(), Pixel::new(1, 2, 3));
    }
}

// THEORY:
// The `framer` owns the on-disk layout of a board file. It is an adapter at the edge
// of the system, not part of the codec proper: it only knows how to lay records out
// as text and how to read them back.
//
// Layout:
//
//     <width> <height>
//     OXOOOOOOO        red   board of pixel (0, 0)
//     OOOOOOOOO        green board of pixel (0, 0)
//     OXXXXXXXX        blue  board of pixel (0, 0)
//     ...              three lines per pixel, row-major
//
// Reading is strict. The header fields must be plain decimal digits (no sign).
// The body must hold exactly `3 * width * height` record lines;
// fewer is `TruncatedInput`, and any non-empty line after the last record is
// `TrailingInput`. Trailing blank lines are accepted. Errors inside the body are
// tagged with their 1-based line number.
//
// Writing is atomic: the whole file is rendered in memory, written to a hidden
// sibling file and renamed into place. A failed encode never leaves a half-written
// board behind.

use crate::core_modules::board::SymbolGrid;
use crate::core_modules::pixel::pixel::CHANNELS;
use crate::core_modules::pixel_record::PixelRecord;
use crate::error::{CodecError, Result};
use image::RgbImage;
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Conventional extension for board files.
pub const BOARD_EXTENSION: &str = "tac";

/// Line number of the first record line.
const FIRST_RECORD_LINE: usize = 2;

/// A whole image as boards, records in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFile {
    pub width: u32,
    pub height: u32,
    pub records: Vec<PixelRecord>,
}

impl BoardFile {
    pub fn new(width: u32, height: u32, records: Vec<PixelRecord>) -> Self {
        Self { width, height, records }
    }

    /// Renders the header and every record line.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(16 + self.records.len() * CHANNELS * 10);
        out.push_str(&format!("{} {}\n", self.width, self.height));
        for record in &self.records {
            for line in record.lines() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Parses a complete board file.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));

        let (_, header) = lines
            .next()
            .ok_or_else(|| CodecError::MalformedHeader("missing header line".to_string()))?;
        let (width, height) = parse_header(header)?;
        let pixel_count = pixel_count(width, height)?;
        let expected = pixel_count * CHANNELS;

        // The header is untrusted; don't let it size the allocation on its own.
        let mut records = Vec::with_capacity(pixel_count.min(text.len() / (CHANNELS * 10) + 1));
        for index in 0..pixel_count {
            let mut channels = [SymbolGrid::default(); CHANNELS];
            for (channel, slot) in channels.iter_mut().enumerate() {
                let (line_no, line) = lines.next().ok_or(CodecError::TruncatedInput {
                    expected,
                    found: index * CHANNELS + channel,
                })?;
                *slot = line.parse::<SymbolGrid>().map_err(|e| e.at_line(line_no))?;
            }
            records.push(PixelRecord {
                x: (index % width as usize) as u32,
                y: (index / width as usize) as u32,
                channels,
            });
        }

        if let Some((line_no, _)) = lines.find(|(_, line)| !line.trim().is_empty()) {
            return Err(CodecError::TrailingInput { line: line_no });
        }

        debug!("parsed {}x{} board file ({} records)", width, height, expected);
        Ok(Self { width, height, records })
    }

    /// Plain-text dump for people: the dimensions, then the first `limit` pixels with
    /// their decoded values and boards, each board followed by `---`.
    pub fn describe(&self, limit: usize) -> Result<String> {
        let mut out = format!("{}x{}\n", self.width, self.height);
        for (index, record) in self.records.iter().take(limit).enumerate() {
            let pixel = record
                .pixel()
                .map_err(|e| e.at_line(FIRST_RECORD_LINE + index * CHANNELS))?;
            out.push_str(&format!(
                "pixel ({}, {}) = {:?}\n",
                record.x,
                record.y,
                pixel.channels()
            ));
            for grid in &record.channels {
                out.push_str(&format!("{}\n---\n", grid));
            }
        }
        Ok(out)
    }

    /// Decodes every record into an image.
    pub fn to_image(&self) -> Result<RgbImage> {
        let mut image = RgbImage::new(self.width, self.height);
        for (index, record) in self.records.iter().enumerate() {
            let pixel = record
                .pixel()
                .map_err(|e| e.at_line(FIRST_RECORD_LINE + index * CHANNELS))?;
            image.put_pixel(record.x, record.y, pixel.into());
        }
        Ok(image)
    }
}

fn parse_header(header: &str) -> Result<(u32, u32)> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let (width, height) = match fields.as_slice() {
        [width, height] => (*width, *height),
        _ => {
            return Err(CodecError::MalformedHeader(format!(
                "expected \"<width> <height>\", found {:?}",
                header
            )));
        }
    };
    // Plain decimal digits only; `u32::from_str` would also take a leading `+`.
    let parse = |field: &str| {
        let malformed =
            || CodecError::MalformedHeader(format!("{:?} is not a non-negative integer", field));
        if !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        field.parse::<u32>().map_err(|_| malformed())
    };
    Ok((parse(width)?, parse(height)?))
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|count| count.checked_mul(CHANNELS).is_some())
        .ok_or_else(|| CodecError::MalformedHeader(format!("{}x{} is too large", width, height)))
}

/// Reads and parses a board file in one pass.
pub fn read_board(path: &Path) -> Result<BoardFile> {
    let text = fs::read_to_string(path)?;
    BoardFile::parse(&text)
}

/// Renders and atomically writes a board file.
pub fn write_board(path: &Path, board: &BoardFile) -> Result<()> {
    write_atomic(path, board.render().as_bytes())
}

/// Writes `bytes` to a hidden sibling of `path`, then renames it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let staging = staging_path(path);
    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&staging)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&staging, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.partial", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;

    fn one_pixel() -> BoardFile {
        BoardFile::new(1, 1, vec![PixelRecord::new(0, 0, Pixel::new(128, 0, 255))])
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tictac-framer-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir.join(name)
    }

    fn board_text(width: u32, height: u32, pixels: usize) -> String {
        let mut text = format!("{} {}\n", width, height);
        for i in 0..pixels {
            for line in PixelRecord::new(0, 0, Pixel::new(i as u8, 1, 2)).lines() {
                text.push_str(&line);
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn single_pixel_layout() {
        assert_eq!(one_pixel().render(), "1 1\nOXOOOOOOO\nOOOOOOOOO\nOXXXXXXXX\n");
    }

    #[test]
    fn parse_recovers_render() {
        let board = one_pixel();
        assert_eq!(BoardFile::parse(&board.render()).unwrap(), board);
    }

    #[test]
    fn parse_assigns_row_major_coordinates() {
        let board = BoardFile::parse(&board_text(3, 2, 6)).unwrap();
        let positions: Vec<(u32, u32)> = board.records.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(board.records[5].pixel().unwrap(), Pixel::new(5, 1, 2));
    }

    #[test]
    fn short_body_is_truncated() {
        let err = BoardFile::parse(&board_text(10, 10, 5)).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { expected: 300, found: 15 }));
    }

    #[test]
    fn partial_pixel_is_truncated() {
        let mut text = board_text(2, 1, 1);
        text.push_str("OOOOOOOOO\n");
        let err = BoardFile::parse(&text).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { expected: 6, found: 4 }));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for header in ["", "10", "10 x", "-1 5", "1 2 3", "1.5 2", "+1 1", "1 +1", "99999999999 1"] {
            let err = BoardFile::parse(&format!("{}\n", header)).unwrap_err();
            assert!(matches!(err, CodecError::MalformedHeader(_)), "{header:?}: {err}");
        }
        assert!(matches!(BoardFile::parse(""), Err(CodecError::MalformedHeader(_))));
    }

    #[test]
    fn signed_dimensions_are_rejected() {
        let text = board_text(1, 1, 1).replacen("1 1", "+1 1", 1);
        let err = BoardFile::parse(&text).unwrap_err();
        assert!(matches!(err, CodecError::MalformedHeader(ref msg) if msg.contains("\"+1\"")));
    }

    #[test]
    fn header_tolerates_extra_whitespace() {
        let text = board_text(1, 1, 1).replacen("1 1", "  1\t 1 ", 1);
        assert_eq!(BoardFile::parse(&text).unwrap().records.len(), 1);
    }

    #[test]
    fn zero_sized_board_has_no_body() {
        let board = BoardFile::parse("0 4\n").unwrap();
        assert!(board.records.is_empty());
        assert_eq!(board.to_image().unwrap().dimensions(), (0, 4));
    }

    #[test]
    fn bad_symbol_reports_its_line() {
        let text = "1 1\nOXOOOOOOO\nOOOO-OOOO\nOXXXXXXXX\n";
        let err = BoardFile::parse(text).unwrap_err();
        assert!(matches!(err, CodecError::AtLine { line: 3, .. }));
        assert!(matches!(err.root(), CodecError::InvalidSymbol('-')));
    }

    #[test]
    fn short_record_reports_its_line() {
        let text = "1 1\nOXOOOOOOO\nOOOOOOOOO\nOXXXXXXX\n";
        let err = BoardFile::parse(text).unwrap_err();
        assert!(matches!(err, CodecError::AtLine { line: 4, .. }));
        assert!(matches!(err.root(), CodecError::InvalidGridSize(8)));
    }

    #[test]
    fn extra_records_are_rejected() {
        let mut text = board_text(1, 1, 1);
        text.push_str("OOOOOOOOO\n");
        let err = BoardFile::parse(&text).unwrap_err();
        assert!(matches!(err, CodecError::TrailingInput { line: 5 }));
    }

    #[test]
    fn trailing_blank_lines_are_accepted() {
        let mut text = board_text(1, 1, 1);
        text.push_str("\n\n   \n");
        assert!(BoardFile::parse(&text).is_ok());
    }

    #[test]
    fn windows_line_endings_are_accepted() {
        let text = board_text(1, 1, 1).replace('\n', "\r\n");
        assert!(BoardFile::parse(&text).is_ok());
    }

    #[test]
    fn to_image_places_every_pixel() {
        let records = vec![
            PixelRecord::new(0, 0, Pixel::new(1, 2, 3)),
            PixelRecord::new(1, 0, Pixel::new(4, 5, 6)),
        ];
        let image = BoardFile::new(2, 1, records).to_image().unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [4, 5, 6]);
    }

    #[test]
    fn describe_starts_with_the_dimensions() {
        let text = one_pixel().describe(1).unwrap();
        assert_eq!(
            text,
            "1x1\n\
             pixel (0, 0) = [128, 0, 255]\n\
             O X O\nO O O\nO O O\n---\n\
             O O O\nO O O\nO O O\n---\n\
             O X X\nX X X\nX X X\n---\n"
        );
        assert_eq!(one_pixel().describe(0).unwrap(), "1x1\n");
    }

    #[test]
    fn write_then_read_board() {
        let path = scratch("one_pixel.tac");
        write_board(&path, &one_pixel()).unwrap();
        assert_eq!(read_board(&path).unwrap(), one_pixel());
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let path = scratch("missing-dir").join("nested").join("board.tac");
        let err = write_board(&path, &one_pixel()).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
        assert!(!path.exists());
        assert!(!staging_path(&path).exists());
    }
}

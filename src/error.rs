// THEORY:
// Every failure the codec can report lives in one enum. Structural errors from
// the symbol codec (`InvalidGridSize`, `InvalidSymbol`, `ChannelOverflow`) are
// never recovered from: a corrupted board silently decoding to the wrong color
// is worse than a loud failure. The framer wraps body errors in `AtLine` so
// the user can find the broken record, and the partitioner reports the
// coordinate of any pixel it could not read.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("symbol grid must hold exactly 9 cells, found {0}")]
    InvalidGridSize(usize),
    #[error("'{0}' is not a board symbol (expected 'X' or 'O')")]
    InvalidSymbol(char),
    #[error("board file ended after {found} of {expected} records")]
    TruncatedInput { expected: usize, found: usize },
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("decoded channel value {0} does not fit in a byte")]
    ChannelOverflow(u32),
    #[error("unexpected record at line {line} after the final pixel")]
    TrailingInput { line: usize },
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<CodecError>,
    },
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    #[error("encode task failed: {0}")]
    TaskFailed(String),
    #[error("blocking codec call made from inside an async runtime; use the async variant")]
    InsideAsyncRuntime,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl CodecError {
    /// Attaches a 1-based line number to an error raised while reading a board file.
    pub fn at_line(self, line: usize) -> Self {
        CodecError::AtLine { line, source: Box::new(self) }
    }

    /// The underlying error with any line-number context stripped.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::AtLine { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_strips_line_context() {
        let err = CodecError::InvalidSymbol('Z').at_line(7);
        assert_eq!(err.to_string(), "line 7: 'Z' is not a board symbol (expected 'X' or 'O')");
        assert!(matches!(err.root(), CodecError::InvalidSymbol('Z')));
    }

    #[test]
    fn root_of_plain_error_is_itself() {
        let err = CodecError::InvalidGridSize(8);
        assert!(matches!(err.root(), CodecError::InvalidGridSize(8)));
    }
}

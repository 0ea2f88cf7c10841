// THEORY:
// The `board` module is the Symbol Codec, the lowest layer of the system. It maps a
// single byte onto a tic-tac-toe board and back. It has no knowledge of pixels,
// images or files.
//
// Board layout (cells numbered in row-major order):
//
//     0 | 1 | 2        0 is the sentinel cell: always Blank, carries no data.
//     3 | 4 | 5        Cells 1..=8 carry bits 7..=0 of the byte, most
//     6 | 7 | 8        significant bit first. Mark = 1, Blank = 0.
//
// Key principles:
// 1.  **Fixed shape**: a `SymbolGrid` is always exactly nine cells. The size check
//     happens once, when a grid is built from loose cells or text; after that the
//     type guarantees it.
// 2.  **Lenient sentinel**: encode always writes Blank into cell 0, decode never
//     looks at it. A board with a Mark in the sentinel still decodes.
// 3.  **Stable text form**: a grid flattens to nine characters of `X`/`O`, which is
//     the record format used by the framer.

use crate::error::{CodecError, Result};
use std::fmt;
use std::str::FromStr;

/// Number of cells on one edge of a board.
pub const BOARD_SIZE: usize = 3;
/// Number of cells on a board.
pub const BOARD_CELLS: usize = BOARD_SIZE * BOARD_SIZE;
/// Index of the cell that never carries data.
pub const SENTINEL_CELL: usize = 0;

const MARK_CHAR: char = 'X';
const BLANK_CHAR: char = 'O';

/// One cell of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    /// A set bit (`X`).
    Mark,
    /// A clear bit (`O`).
    #[default]
    Blank,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Mark => MARK_CHAR,
            Symbol::Blank => BLANK_CHAR,
        }
    }

    fn from_bit(bit: u8) -> Self {
        if bit & 1 == 1 { Symbol::Mark } else { Symbol::Blank }
    }

    fn bit(self) -> u32 {
        match self {
            Symbol::Mark => 1,
            Symbol::Blank => 0,
        }
    }
}

impl TryFrom<char> for Symbol {
    type Error = CodecError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            MARK_CHAR => Ok(Symbol::Mark),
            BLANK_CHAR => Ok(Symbol::Blank),
            other => Err(CodecError::InvalidSymbol(other)),
        }
    }
}

/// A 3x3 board, stored flat in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolGrid {
    cells: [Symbol; BOARD_CELLS],
}

impl SymbolGrid {
    pub fn new(cells: [Symbol; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Symbol; BOARD_CELLS] {
        &self.cells
    }

    /// The cell at `row`, `col` (both 0..3).
    pub fn cell(&self, row: usize, col: usize) -> Symbol {
        self.cells[row * BOARD_SIZE + col]
    }

    /// The nine-character record form, e.g. `OXOOOOOOO`.
    pub fn to_record(&self) -> String {
        self.cells.iter().map(|s| s.as_char()).collect()
    }
}

impl TryFrom<&[Symbol]> for SymbolGrid {
    type Error = CodecError;

    fn try_from(cells: &[Symbol]) -> Result<Self> {
        let cells: [Symbol; BOARD_CELLS] = cells
            .try_into()
            .map_err(|_| CodecError::InvalidGridSize(cells.len()))?;
        Ok(Self { cells })
    }
}

impl FromStr for SymbolGrid {
    type Err = CodecError;

    /// Parses the nine-character record form. Length is checked before symbols.
    fn from_str(text: &str) -> Result<Self> {
        let len = text.chars().count();
        if len != BOARD_CELLS {
            return Err(CodecError::InvalidGridSize(len));
        }
        let mut cells = [Symbol::Blank; BOARD_CELLS];
        for (cell, c) in cells.iter_mut().zip(text.chars()) {
            *cell = Symbol::try_from(c)?;
        }
        Ok(Self { cells })
    }
}

/// Renders the board as three rows, e.g. `O X O`.
impl fmt::Display for SymbolGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(BOARD_SIZE).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = cells.iter().map(|s| s.as_char().to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Encodes a byte onto a board. Cell 0 is always Blank.
pub fn encode(value: u8) -> SymbolGrid {
    let mut cells = [Symbol::Blank; BOARD_CELLS];
    for (i, cell) in cells.iter_mut().enumerate().skip(1) {
        let bit_index = BOARD_CELLS - 1 - i;
        *cell = Symbol::from_bit(value >> bit_index);
    }
    SymbolGrid { cells }
}

/// Decodes a board back into a byte. The sentinel cell is not inspected.
pub fn decode(grid: &SymbolGrid) -> Result<u8> {
    let mut value: u32 = 0;
    for (i, cell) in grid.cells.iter().enumerate().skip(1) {
        let bit_index = BOARD_CELLS - 1 - i;
        value |= cell.bit() << bit_index;
    }
    u8::try_from(value).map_err(|_| CodecError::ChannelOverflow(value))
}

/// Parses a nine-character record and decodes it.
pub fn decode_str(text: &str) -> Result<u8> {
    decode(&text.parse::<SymbolGrid>()?)
}

// THEORY:
// This file is the main entry point for the `tictac_codec` library crate.
//
// The crate turns raster images into "board files": every color byte becomes a
// 3x3 tic-tac-toe board of `X` and `O`, three boards per pixel, and the process is
// exactly reversible. The primary export is the `BoardPipeline` and its
// `CodecConfig`; the layers underneath (`core_modules`) stay reachable for callers
// that want a single piece, such as the symbol codec on its own.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use error::{CodecError, Result};
pub use pipeline::{BoardPipeline, CodecConfig};

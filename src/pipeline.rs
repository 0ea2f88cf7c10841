// THEORY:
// The `pipeline` module is the top-level API for the codec. It wires the layers
// together behind four calls:
//
//     encode_image  RgbImage   -> BoardFile   (parallel, via the partitioner)
//     decode_board  BoardFile  -> RgbImage
//     encode_file   image path -> board path
//     decode_file   board path -> image path
//
// Async callers use `encode_image_async`, which runs the partitioner's tasks on the
// caller's own runtime. The blocking calls build a private runtime the first time
// they need one; they refuse to run from inside an async context (blocking there
// would stall or panic the caller's runtime) and return `InsideAsyncRuntime`
// instead. Nothing is written until the whole image has been encoded or decoded;
// the framer then writes the output atomically.

use crate::core_modules::framer::{self, BoardFile};
use crate::core_modules::partitioner;
use crate::core_modules::utils::image_helper::image_helper;
use crate::error::{CodecError, Result};
use image::RgbImage;
use log::info;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tokio::runtime::{Builder, Handle, Runtime};

// Re-export key data structures for the public API.
pub use crate::core_modules::board::{BOARD_SIZE, Symbol, SymbolGrid};
pub use crate::core_modules::pixel::pixel::{Pixel, PixelSource};
pub use crate::core_modules::pixel_record::PixelRecord;

/// Configuration for the BoardPipeline, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Largest region edge, in pixels, that a single task serializes without
    /// splitting further. Values below 1 are treated as 1.
    pub leaf_edge: u32,
    /// Number of runtime worker threads encode tasks are scheduled on.
    pub worker_threads: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            leaf_edge: BOARD_SIZE as u32,
            worker_threads: num_cpus::get(),
        }
    }
}

/// The main, top-level struct for the codec.
pub struct BoardPipeline {
    config: CodecConfig,
    /// Built on first blocking use.
    runtime: OnceLock<Runtime>,
}

impl BoardPipeline {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            runtime: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The private runtime for blocking calls. Errors inside an async context.
    fn runtime(&self) -> Result<&Runtime> {
        if Handle::try_current().is_ok() {
            return Err(CodecError::InsideAsyncRuntime);
        }
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads.max(1))
            .thread_name("tictac-encode")
            .enable_all()
            .build()?;
        Ok(self.runtime.get_or_init(|| runtime))
    }

    /// Encodes an image into boards on the caller's tokio runtime.
    pub async fn encode_image_async(&self, image: RgbImage) -> Result<BoardFile> {
        let (width, height) = image.dimensions();
        let source = Arc::new(image);
        let records = partitioner::encode_image(source, self.config.leaf_edge).await?;
        Ok(BoardFile::new(width, height, records))
    }

    /// Encodes an image into boards, records in row-major order. Blocks; use
    /// `encode_image_async` from async code.
    pub fn encode_image(&self, image: RgbImage) -> Result<BoardFile> {
        self.runtime()?.block_on(self.encode_image_async(image))
    }

    /// Decodes boards back into an image.
    pub fn decode_board(&self, board: &BoardFile) -> Result<RgbImage> {
        board.to_image()
    }

    /// Reads an image, encodes it and writes the board file.
    pub fn encode_file(&self, input: &Path, output: &Path) -> Result<()> {
        let started = Instant::now();
        let image = image_helper::load(input)?;
        let (width, height) = image.dimensions();
        info!(
            "encoding {} ({}x{}) with leaf edge {} on {} threads",
            input.display(),
            width,
            height,
            self.config.leaf_edge,
            self.config.worker_threads
        );

        let board = self.encode_image(image)?;
        framer::write_board(output, &board)?;

        info!(
            "wrote {} boards to {} in {:?}",
            board.records.len() * 3,
            output.display(),
            started.elapsed()
        );
        Ok(())
    }

    /// Reads a board file, decodes it and writes the image.
    pub fn decode_file(&self, input: &Path, output: &Path) -> Result<()> {
        let started = Instant::now();
        let board = framer::read_board(input)?;
        info!(
            "decoding {} ({}x{})",
            input.display(),
            board.width,
            board.height
        );

        let image = self.decode_board(&board)?;
        image_helper::save(output, &image)?;

        info!("wrote {} in {:?}", output.display(), started.elapsed());
        Ok(())
    }
}

impl Drop for BoardPipeline {
    fn drop(&mut self) {
        // A plain drop of a runtime panics when it happens inside another runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

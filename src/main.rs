// Command-line front end for the `tictac_codec` library.
//
//     tictac encode <image> <board.tac>
//     tictac decode <board.tac> <image>
//     tictac inspect <board.tac> [--limit N]

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictac_codec::core_modules::framer;
use tictac_codec::{BoardPipeline, CodecConfig};

#[derive(Debug, Parser)]
#[command(name = "tictac", version, about = "Encode images as tic-tac-toe boards and back")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode an image into a board file
    Encode {
        /// Image to read (any format the image crate understands)
        input: PathBuf,
        /// Board file to write
        output: PathBuf,
        /// Largest region edge a single task serializes without splitting
        #[arg(long, default_value_t = CodecConfig::default().leaf_edge)]
        leaf_edge: u32,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Decode a board file back into an image
    Decode {
        /// Board file to read
        input: PathBuf,
        /// Image to write; the format follows the extension (PNG if none)
        output: PathBuf,
    },
    /// Print the first boards of a board file
    Inspect {
        /// Board file to read
        input: PathBuf,
        /// Number of pixels to print
        #[arg(long, default_value_t = 1)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            input,
            output,
            leaf_edge,
            threads,
        } => {
            let mut config = CodecConfig {
                leaf_edge,
                ..CodecConfig::default()
            };
            if let Some(threads) = threads {
                config.worker_threads = threads;
            }
            let pipeline = BoardPipeline::new(config);
            pipeline
                .encode_file(&input, &output)
                .with_context(|| format!("Failed to encode {}", input.display()))?;
        }
        Command::Decode { input, output } => {
            let pipeline = BoardPipeline::new(CodecConfig {
                worker_threads: 1,
                ..CodecConfig::default()
            });
            pipeline
                .decode_file(&input, &output)
                .with_context(|| format!("Failed to decode {}", input.display()))?;
        }
        Command::Inspect { input, limit } => {
            let board = framer::read_board(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let dump = board
                .describe(limit)
                .with_context(|| format!("Corrupt board in {}", input.display()))?;
            print!("{}: {}", input.display(), dump);
        }
    }

    Ok(())
}

/// pzw – parallel LZW encoder/decoder.
///
///   pzw encode 4 file.txt file.lzw   → encode with 4 worker blocks
///   pzw decode file.lzw file.txt     → decode back to the original bytes
///
/// Timing and the compression summary go to stderr.
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pzw::pipeline::{self, EncodeOptions, MAX_THREADS, MIN_THREADS};

#[derive(Parser)]
#[command(name = "pzw", about = "Parallel LZW compression with forked dictionaries", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging and the run summary
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into the LZW text format
    Encode {
        /// Number of worker blocks (1-16)
        #[arg(value_parser = clap::value_parser!(u8).range(MIN_THREADS as i64..=MAX_THREADS as i64))]
        threads: u8,
        /// File to encode
        input: PathBuf,
        /// Where to write the encoded file
        output: PathBuf,
    },
    /// Decode an encoded file back to its original bytes
    Decode {
        /// Encoded file
        input: PathBuf,
        /// Where to write the decoded bytes
        output: PathBuf,
    },
}

fn init_tracing(cli: &Cli) {
    // --quiet: nothing. --verbose: RUST_LOG if set, otherwise info.
    // Default: warnings and errors only.
    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> pipeline::StreamResult<()> {
    match &cli.command {
        Commands::Encode {
            threads,
            input,
            output,
        } => {
            let options = EncodeOptions {
                threads: *threads as usize,
            };
            let start = Instant::now();
            let stats = pipeline::encode_file(input, output, &options)?;
            let elapsed = start.elapsed();
            if !cli.quiet {
                eprintln!("{stats}");
                eprintln!("Encoding time = {:.6} sec", elapsed.as_secs_f64());
            }
        }
        Commands::Decode { input, output } => {
            let start = Instant::now();
            let written = pipeline::decode_file(input, output)?;
            let elapsed = start.elapsed();
            if !cli.quiet {
                eprintln!("Decoded {written} bytes");
                eprintln!("Decoding time = {:.6} sec", elapsed.as_secs_f64());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pzw: {e}");
            ExitCode::FAILURE
        }
    }
}

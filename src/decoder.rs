use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use huffman_codec::decompress;

/// Restore a file written by `encode`.
#[derive(Parser)]
#[command(name = "decode", version, about, long_about = None)]
struct Args {
    /// Path to the encoded file.
    input: PathBuf,

    /// Path to write the decoded output.
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    info!("--- Start Decoding ---");
    match run(&args) {
        Ok(()) => {
            info!("--- End ---");
            ExitCode::SUCCESS
        }
        Err(e) if e.is_internal() => {
            error!("Internal error, this is a bug: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Could not decode {}: {}", args.input.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> huffman_codec::Result<()> {
    info!("Reading encoded file: {}", args.input.display());
    let content = fs::read(&args.input)?;

    let decoded = decompress(&content)?;

    info!("Writing decoded output to file: {}", args.output.display());
    fs::write(&args.output, &decoded.data)?;
    info!("Write successful.");

    let input_size = content.len() as u64;
    let output_size = decoded.data.len() as u64;
    let ratio = if output_size > 0 {
        100.0 * (1.0 - (input_size as f64) / (output_size as f64))
    } else {
        0.0
    };

    println!(
        "\r\n✅ decoding successful.\n\
         📂 input file:        {} ({} bytes)\n\
         💾 output file:       {} ({} bytes)\n\
         🔢 total bits:        {} ({} framing)\n\
         ℹ️ entropy:           {:.2} bits/symbol\n\
         🗜️ compression ratio: {:.2}% (relative to decoded output)",
        args.input.display(),
        input_size,
        args.output.display(),
        output_size,
        decoded.bit_count,
        decoded.framing,
        decoded.frequencies.entropy(),
        ratio
    );

    Ok(())
}

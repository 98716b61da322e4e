use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use huffman_codec::{Framing, compress};

/// Compress a file with a static Huffman code.
#[derive(Parser)]
#[command(name = "encode", version, about, long_about = None)]
struct Args {
    /// File to encode.
    input: PathBuf,

    /// Where to write the encoded file.
    #[arg(default_value = "output.huff")]
    output: PathBuf,

    /// Bit layout of the payload: packed, cells or text.
    #[arg(long, default_value_t = Framing::Packed)]
    framing: Framing,

    /// Print the code of every byte value.
    #[arg(long)]
    print_codes: bool,

    /// Print the occurrence count of every byte value.
    #[arg(long)]
    print_freq: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Encoding failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> huffman_codec::Result<()> {
    info!("Encoding {} with {} framing", args.input.display(), args.framing);

    let raw_data = fs::read(&args.input)?;
    let compressed = compress(&raw_data, args.framing)?;

    if args.print_freq {
        for (symbol, count) in compressed.frequencies.iter() {
            println!("{}\t{}", symbol, count);
        }
    }
    if args.print_codes {
        for (symbol, code) in compressed.table.iter() {
            println!("{}\t{}", symbol, code);
        }
    }

    fs::write(&args.output, compressed.to_bytes())?;

    let stats = compressed.stats;
    println!(
        "\r\n✅ Encoding successful.\n\
         📂  Input:       {} ({} bytes)\n\
         💾  Output:      {} ({} bytes)\n\
         ⚙️  Framing:     {}\n\
         🔢  Total bits:  {} ({} bytes)\n\
         ℹ️  Entropy:     {:.4} bits/symbol\n\
         🗜️  Ratio:       {:.2}%",
        args.input.display(),
        raw_data.len(),
        args.output.display(),
        compressed.len(),
        args.framing,
        stats.total_bits,
        stats.reported_bytes(),
        compressed.frequencies.entropy(),
        stats.compression_ratio()
    );

    Ok(())
}

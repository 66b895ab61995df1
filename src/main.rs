mod binary_utils;
mod graphics;
mod img_extractor;

use std::{fs, path::PathBuf, process};

use clap::Parser;

use img_extractor::ImgExtractor;

/// Convert QQ Tang ".img" sprite files into PNG frames
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory scanned recursively for ".img" files
    input_dir: PathBuf,

    /// Directory the PNG frames and metadata are written into
    output_dir: PathBuf,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = fs::create_dir_all(&args.output_dir) {
        eprintln!("Failed to create output directory: {}", e);
        process::exit(1);
    }

    println!("Input Dir: {:?}", args.input_dir);
    println!("Output Dir: {:?}", args.output_dir);

    let extractor = ImgExtractor::new(&args.input_dir, &args.output_dir);
    match extractor.extract_all() {
        Ok(stats) => {
            println!(
                "Processing complete! Converted {} of {} files ({} frames written, {} ignored)",
                stats.files_converted, stats.files_found, stats.frames_written, stats.files_ignored
            );
        }
        Err(e) => {
            eprintln!("Failed to scan {}: {}", args.input_dir.display(), e);
            process::exit(1);
        }
    }
}

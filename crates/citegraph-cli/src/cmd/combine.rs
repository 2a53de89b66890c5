//! Combine subcommand - merge fetched paper files into one input array

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use citegraph_core::fmt_num;

#[derive(Args, Debug)]
pub struct CombineArgs {
    /// Paper JSON arrays, in priority order (first occurrence of a paperId wins)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Combined output file
    #[arg(short, long, default_value = "combined_papers_data.json")]
    pub output: PathBuf,
}

pub fn run(args: CombineArgs) -> Result<()> {
    let stats = citegraph_build::combine_files(&args.inputs, &args.output)?;

    println!();
    println!("=== Combine Summary ===");
    println!("Files: {}", stats.files);
    println!("Papers scanned: {}", fmt_num(stats.scanned));
    println!(
        "Kept: {} ({:.1}%)",
        fmt_num(stats.kept),
        if stats.scanned > 0 {
            stats.kept as f64 / stats.scanned as f64 * 100.0
        } else {
            0.0
        }
    );
    println!("Wrong type: {}", fmt_num(stats.wrong_type));
    println!("Journal without volume: {}", fmt_num(stats.missing_volume));
    println!("Missing id: {}", fmt_num(stats.missing_id));
    println!("Duplicates: {}", fmt_num(stats.duplicates));
    println!("Output: {}", args.output.display());

    Ok(())
}

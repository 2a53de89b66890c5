//! Prepare subcommand - synthesize keywords, reviewers and review metadata

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use citegraph_build::PrepareConfig;
use citegraph_build::config::{KEYWORDS_FILE, REVIEW_METADATA_FILE, REVIEWERS_FILE};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Combined paper records
    #[arg(long, default_value = "combined_papers_data.json")]
    pub papers: PathBuf,

    /// Author details with affiliations and h-index
    #[arg(long, default_value = "authors_details.json")]
    pub authors: PathBuf,

    /// OpenAlex works annotated with paperId (adds their keywords)
    #[arg(long)]
    pub openalex: Option<PathBuf>,

    /// Output directory for the generated JSON files
    #[arg(short, long, default_value = "paper_data")]
    pub output: PathBuf,

    /// Random seed (default: from config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Minimum reviewer h-index (default: from config)
    #[arg(long)]
    pub h_index_threshold: Option<u32>,
}

pub fn run(args: PrepareArgs, config: &Config) -> Result<()> {
    let prepare = PrepareConfig {
        papers: args.papers,
        authors: args.authors,
        openalex: args.openalex,
        output_dir: args.output,
        seed: args.seed.unwrap_or(config.build.seed),
        h_index_threshold: args
            .h_index_threshold
            .unwrap_or(config.build.h_index_threshold),
    };

    let summary = citegraph_build::run_prepare(&prepare)?;

    println!();
    println!("=== Prepare Summary ===");
    println!("Papers: {}", summary.papers);
    println!("With keywords: {}", summary.papers_with_keywords);
    println!(
        "With reviewers: {} ({} reviews)",
        summary.papers_with_reviewers, summary.reviews
    );
    for file in [KEYWORDS_FILE, REVIEWERS_FILE, REVIEW_METADATA_FILE] {
        println!("Wrote {}", prepare.output_dir.join(file).display());
    }

    Ok(())
}

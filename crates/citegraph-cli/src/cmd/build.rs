//! Build subcommand - node and edge CSV tables

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use citegraph_build::BuildConfig;
use citegraph_core::SharedProgress;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Combined paper records
    #[arg(long, default_value = "combined_papers_data.json")]
    pub papers: PathBuf,

    /// Author details (affiliations)
    #[arg(long)]
    pub authors: Option<PathBuf>,

    /// paperId → keywords
    #[arg(long)]
    pub keywords: Option<PathBuf>,

    /// Reviewer lists or review metadata
    #[arg(long)]
    pub reviews: Option<PathBuf>,

    /// Output directory (default: from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for edition locations (default: from config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep synthetic edition numbers clear of extracted ones
    #[arg(long)]
    pub avoid_edition_collisions: bool,
}

pub fn run(args: BuildArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let build = BuildConfig {
        papers: args.papers,
        authors: args.authors,
        keywords: args.keywords,
        reviews: args.reviews,
        output_dir: args.output.unwrap_or_else(|| config.build.output_dir.clone()),
        seed: args.seed.unwrap_or(config.build.seed),
        avoid_edition_collisions: args.avoid_edition_collisions
            || config.build.avoid_edition_collisions,
    };

    let stage = progress.stage_line("build");
    stage.set_message(format!("{} -> {}", build.papers.display(), build.output_dir.display()));
    let result = citegraph_build::run_build(&build);
    stage.finish_and_clear();
    let summary = result?;

    if progress.is_tty() {
        eprintln!("{}", summary.format_table());
    } else {
        summary.log();
    }
    Ok(())
}

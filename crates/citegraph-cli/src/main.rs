//! citegraph - bibliographic knowledge graph pipeline
//!
//! Turns fetched paper metadata into node/edge CSV tables, loads them into
//! Neo4j and runs the analytical queries over the graph.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "citegraph")]
#[command(about = "Bibliographic knowledge graph pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./citegraph.toml or ~/.config/citegraph/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Merge fetched paper files into one input array
    Combine(cmd::combine::CombineArgs),
    /// Generate keywords, reviewers and review metadata
    Prepare(cmd::prepare::PrepareArgs),
    /// Build node and edge CSV tables
    Build(cmd::build::BuildArgs),
    /// Load the tables into Neo4j
    Load(cmd::load::LoadArgs),
    /// Run the analytical queries
    Query(cmd::query::QueryArgs),
    /// Run PageRank and node similarity
    Algorithms(cmd::algorithms::AlgorithmsArgs),
    /// Create community recommender edges
    Community(cmd::community::CommunityArgs),
    /// Show edition and base name of venue strings
    Extract(cmd::extract::ExtractArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(citegraph_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, progress lines show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    citegraph_core::init_logging(quiet, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Combine(args) => cmd::combine::run(args),
        Command::Prepare(args) => cmd::prepare::run(args, &config),
        Command::Build(args) => cmd::build::run(args, &config, &progress),
        Command::Load(args) => cmd::load::run(args, &config, &progress),
        Command::Query(args) => cmd::query::run(args, &config),
        Command::Algorithms(args) => cmd::algorithms::run(args, &config),
        Command::Community(args) => cmd::community::run(args, &config),
        Command::Extract(args) => cmd::extract::run(args),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Table directory",
                &config.build.output_dir.display().to_string(),
            ]);
            table.add_row(vec!["Seed", &config.build.seed.to_string()]);
            table.add_row(vec![
                "Reviewer h-index",
                &config.build.h_index_threshold.to_string(),
            ]);
            table.add_row(vec![
                "Avoid edition collisions",
                &config.build.avoid_edition_collisions.to_string(),
            ]);
            table.add_row(vec!["Neo4j URI", &config.neo4j.uri]);
            table.add_row(vec!["Neo4j user", &config.neo4j.user]);
            table.add_row(vec![
                "Neo4j password",
                if config.neo4j.password.is_some() {
                    "configured"
                } else {
                    "not set"
                },
            ]);
            table.add_row(vec!["Neo4j database", &config.neo4j.database]);
            table.add_row(vec!["Batch size", &config.neo4j.batch_size.to_string()]);
            table.add_row(vec![
                "Import dir",
                &config
                    .neo4j
                    .import_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "not set".to_string()),
            ]);
            table.add_row(vec![
                "Reports dir",
                &config.reports.dir.display().to_string(),
            ]);
            table.add_row(vec![
                "Impact factor year",
                &config.reports.target_year.to_string(),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}

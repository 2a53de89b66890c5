//! Query subcommand - analytical queries to a text report

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use citegraph_neo4j::{GraphClient, queries};

use super::Neo4jArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Report file (default: neo4j_query_results.txt in the reports dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Year for the journal impact factor (default: from config)
    #[arg(long)]
    pub target_year: Option<i32>,

    /// Distinct editions an author needs to belong to an event community
    #[arg(long, default_value_t = queries::COMMUNITY_MIN_EDITIONS)]
    pub min_editions: u32,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

pub fn run(args: QueryArgs, config: &Config) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| config.reports.dir.join("neo4j_query_results.txt"));
    let year = args.target_year.unwrap_or(config.reports.target_year);
    let queries = queries::analytical(year, args.min_editions);

    let mut client = GraphClient::connect(&args.neo4j.resolve(config))?;
    let summary =
        citegraph_neo4j::write_report(&mut client, "NEO4J QUERY RESULTS", &queries, &output)?;

    eprintln!(
        "All queries completed ({} failed). Results saved to {}",
        summary.failed,
        output.display()
    );
    Ok(())
}

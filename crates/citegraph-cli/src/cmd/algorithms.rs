//! Algorithms subcommand - PageRank and node similarity through GDS

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use citegraph_neo4j::{GraphClient, queries};

use super::Neo4jArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct AlgorithmsArgs {
    /// Report file (default: neo4j_graph_algo_query_results.txt in the reports dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

pub fn run(args: AlgorithmsArgs, config: &Config) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| config.reports.dir.join("neo4j_graph_algo_query_results.txt"));

    let mut client = GraphClient::connect(&args.neo4j.resolve(config))?;
    let summary = citegraph_neo4j::write_report(
        &mut client,
        "NEO4J GRAPH ALGORITHMS QUERY RESULTS",
        &queries::algorithms(),
        &output,
    )?;

    eprintln!(
        "All algorithms completed ({} failed). Results saved to {}",
        summary.failed,
        output.display()
    );
    Ok(())
}

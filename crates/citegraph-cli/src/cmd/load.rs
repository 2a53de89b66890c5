//! Load subcommand - constraints and batched LOAD CSV into Neo4j

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use citegraph_core::SharedProgress;
use citegraph_neo4j::{GraphClient, LoadConfig};

use super::Neo4jArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Local path of the server's import directory; tables are verified
    /// against their manifest before loading (default: from config)
    pub import_dir: Option<PathBuf>,

    /// Rows per inner transaction (default: from config)
    #[arg(long)]
    pub batch_size: Option<usize>,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

pub fn run(args: LoadArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let load = LoadConfig {
        import_dir: args.import_dir.or_else(|| config.neo4j.import_dir.clone()),
        batch_size: args.batch_size.unwrap_or(config.neo4j.batch_size),
    };
    if load.import_dir.is_none() {
        log::warn!("No import dir given, loading without checking the tables");
    }

    let mut client = GraphClient::connect(&args.neo4j.resolve(config))?;
    let summary = citegraph_neo4j::load_graph(&mut client, &load, progress)?;

    eprintln!(
        "Loaded {} tables into {} in {:.1}s",
        summary.tables.len(),
        client.uri(),
        summary.elapsed.as_secs_f64()
    );
    Ok(())
}

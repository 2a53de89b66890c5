pub mod algorithms;
pub mod build;
pub mod combine;
pub mod community;
pub mod extract;
pub mod load;
pub mod prepare;
pub mod query;

use clap::Args;

use citegraph_neo4j::ConnectionConfig;

use crate::config::Config;

/// Connection flags shared by the graph subcommands. Unset flags fall back
/// to the `[neo4j]` config section.
#[derive(Args, Debug, Default)]
pub struct Neo4jArgs {
    /// Bolt URI (e.g. bolt://localhost:7687)
    #[arg(long)]
    pub uri: Option<String>,

    /// Username
    #[arg(short, long)]
    pub user: Option<String>,

    /// Password
    #[arg(short, long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,
}

impl Neo4jArgs {
    pub fn resolve(&self, config: &Config) -> ConnectionConfig {
        let section = &config.neo4j;
        ConnectionConfig {
            uri: self.uri.clone().unwrap_or_else(|| section.uri.clone()),
            user: self.user.clone().unwrap_or_else(|| section.user.clone()),
            password: self
                .password
                .clone()
                .or_else(|| section.password.clone())
                .unwrap_or_default(),
            database: self
                .database
                .clone()
                .unwrap_or_else(|| section.database.clone()),
            ..Default::default()
        }
    }
}

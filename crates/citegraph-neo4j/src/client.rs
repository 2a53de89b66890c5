//! Neo4j connection driven from synchronous code
//!
//! `neo4rs` is async; every call blocks on [`SHARED_RUNTIME`].

use std::sync::LazyLock;

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, query};

/// Runtime shared by all graph clients in the process.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Records fetched per pull
    pub fetch_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            fetch_size: 500,
        }
    }
}

/// Executes Cypher. Implemented by [`GraphClient`] and by test doubles.
pub trait CypherRunner {
    /// Run a statement, discarding any result.
    fn run(&mut self, cypher: &str) -> Result<()>;

    /// Run a query and render the named columns of every row as text.
    fn fetch(&mut self, cypher: &str, columns: &[&str]) -> Result<Vec<Vec<String>>>;
}

pub struct GraphClient {
    graph: Graph,
    uri: String,
}

impl GraphClient {
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .fetch_size(config.fetch_size)
            .build()
            .context("Invalid Neo4j connection settings")?;

        let graph = SHARED_RUNTIME
            .handle()
            .block_on(Graph::connect(neo4j_config))
            .with_context(|| format!("Failed to connect to Neo4j at {}", config.uri))?;
        log::info!("Connected to {} (database {})", config.uri, config.database);
        Ok(Self {
            graph,
            uri: config.uri.clone(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl CypherRunner for GraphClient {
    fn run(&mut self, cypher: &str) -> Result<()> {
        log::debug!("run: {}", first_line(cypher));
        SHARED_RUNTIME
            .handle()
            .block_on(self.graph.run(query(cypher)))
            .with_context(|| format!("Cypher failed: {}", first_line(cypher)))
    }

    fn fetch(&mut self, cypher: &str, columns: &[&str]) -> Result<Vec<Vec<String>>> {
        log::debug!("fetch: {}", first_line(cypher));
        SHARED_RUNTIME.handle().block_on(async {
            let mut stream = self.graph.execute(query(cypher)).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                let mut cells = Vec::with_capacity(columns.len());
                for column in columns {
                    let value: serde_json::Value = row
                        .get(column)
                        .with_context(|| format!("Missing column {column}"))?;
                    cells.push(render_value(&value));
                }
                rows.push(cells);
            }
            Ok::<_, anyhow::Error>(rows)
        })
    }
}

/// Text form of one result cell.
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn first_line(cypher: &str) -> &str {
    cypher.trim_start().lines().next().unwrap_or_default()
}

//! Citegraph Neo4j - load the tables into Neo4j and query the graph
//!
//! Statements are generated from the table layout in
//! [`citegraph_build::schema`] and executed through [`CypherRunner`], which
//! [`GraphClient`] implements over `neo4rs`.
//!
//! # Example
//!
//! ```ignore
//! use citegraph_neo4j::{ConnectionConfig, GraphClient, LoadConfig, load_graph};
//!
//! let mut client = GraphClient::connect(&ConnectionConfig::default())?;
//! load_graph(&mut client, &LoadConfig::default(), &progress)?;
//! ```

pub mod client;
pub mod community;
pub mod cypher;
pub mod load;
pub mod queries;
pub mod report;

// Re-exports
pub use client::{ConnectionConfig, CypherRunner, GraphClient};
pub use community::{CommunitySummary, apply_community};
pub use load::{LoadConfig, LoadSummary, load_graph};
pub use queries::{Community, NamedQuery};
pub use report::{Report, ReportSummary, ResultTable, write_report};

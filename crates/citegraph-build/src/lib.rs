//! Citegraph Build - node/edge tables for the bibliographic graph
//!
//! Turns fetched paper records into deduplicated CSV tables ready for the
//! graph bulk loader.
//!
//! # Pipeline
//!
//! 1. `combine`: merge fetched paper files, keep journal and conference papers
//! 2. `prepare`: synthesize keywords, reviewers and review metadata
//! 3. `build`: resolve venues and editions, mint surrogate ids, write tables
//!
//! # Example
//!
//! ```ignore
//! use citegraph_build::{BuildConfig, run_build};
//!
//! let config = BuildConfig {
//!     papers: "combined_papers_data.json".into(),
//!     output_dir: "nodes_edges".into(),
//!     ..Default::default()
//! };
//! let summary = run_build(&config)?;
//! println!("{}", summary.format_table());
//! ```

pub mod combine;
pub mod config;
pub mod dedup;
pub mod edition;
pub mod export;
pub mod record;
pub mod runner;
pub mod schema;
pub mod stats;
pub mod synth;
pub mod venue;

// Re-exports
pub use combine::{Combiner, combine_files};
pub use config::{BuildConfig, PrepareConfig};
pub use dedup::{GraphBuilder, GraphInput, GraphTables};
pub use edition::{EditionKind, detect_edition_at, extract_edition, extract_edition_at};
pub use export::write_tables;
pub use record::{AuthorDetail, PaperKeywords, PaperRecord, PaperReviews};
pub use runner::{PrepareSummary, run_build, run_prepare};
pub use stats::{BuildStats, BuildSummary, CombineStats};
pub use venue::normalize_venue;

//! Build and prepare configuration

use std::path::PathBuf;

use crate::synth::DEFAULT_H_INDEX_THRESHOLD;

pub const KEYWORDS_FILE: &str = "paper_keywords.json";
pub const REVIEWERS_FILE: &str = "paper_reviewers.json";
pub const REVIEW_METADATA_FILE: &str = "paper_reviewers_metadata.json";

/// Runtime configuration for `build`
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Combined paper records (JSON array)
    pub papers: PathBuf,
    /// Author details with affiliations and h-index
    pub authors: Option<PathBuf>,
    /// paperId → keywords
    pub keywords: Option<PathBuf>,
    /// Reviewer lists or review metadata
    pub reviews: Option<PathBuf>,
    /// Directory receiving the CSV tables and manifest
    pub output_dir: PathBuf,
    /// Seed for edition locations
    pub seed: u64,
    /// Keep synthetic edition numbers clear of extracted ones
    pub avoid_edition_collisions: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            papers: PathBuf::from("combined_papers_data.json"),
            authors: None,
            keywords: None,
            reviews: None,
            output_dir: PathBuf::from("nodes_edges"),
            seed: 42,
            avoid_edition_collisions: false,
        }
    }
}

/// Runtime configuration for `prepare`
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    pub papers: PathBuf,
    pub authors: PathBuf,
    /// OpenAlex works annotated with `paperId`
    pub openalex: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub seed: u64,
    pub h_index_threshold: u32,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            papers: PathBuf::from("combined_papers_data.json"),
            authors: PathBuf::from("authors_details.json"),
            openalex: None,
            output_dir: PathBuf::from("paper_data"),
            seed: 42,
            h_index_threshold: DEFAULT_H_INDEX_THRESHOLD,
        }
    }
}

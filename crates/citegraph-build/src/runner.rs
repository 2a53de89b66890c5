//! Build and prepare runners

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use citegraph_core::{read_json, read_json_array};

use crate::config::{BuildConfig, KEYWORDS_FILE, PrepareConfig, REVIEW_METADATA_FILE, REVIEWERS_FILE};
use crate::dedup::{GraphBuilder, GraphInput};
use crate::export::write_tables;
use crate::record::{AuthorDetail, PaperKeywords, PaperRecord, PaperReviews};
use crate::stats::BuildSummary;
use crate::synth::{self, OpenAlexWork};

/// Paper records; a missing file points at the `combine` step.
fn read_papers(path: &Path) -> Result<Vec<PaperRecord>> {
    read_json_array(path).or_else(|e| {
        if e.is_missing() {
            let hint = format!(
                "No paper records at {}, create them with `citegraph combine`",
                path.display()
            );
            Err(anyhow::Error::new(e).context(hint))
        } else {
            Err(e.into())
        }
    })
}

/// Load inputs, build all tables and write them with their manifest.
///
/// Every input is parsed before the output directory is touched.
pub fn run_build(config: &BuildConfig) -> Result<BuildSummary> {
    let start = Instant::now();

    let papers = read_papers(&config.papers)?;
    let authors: Vec<AuthorDetail> = match &config.authors {
        Some(path) => read_json_array(path)?,
        None => Vec::new(),
    };
    let keywords: PaperKeywords = match &config.keywords {
        Some(path) => read_json(path)?,
        None => PaperKeywords::new(),
    };
    let reviews: PaperReviews = match &config.reviews {
        Some(path) => read_json(path)?,
        None => PaperReviews::default(),
    };
    log::info!(
        "Inputs: {} papers, {} authors, {} keyword lists, {} reviewed papers",
        papers.len(),
        authors.len(),
        keywords.len(),
        reviews.len()
    );

    let input = GraphInput {
        papers: &papers,
        authors: &authors,
        keywords: &keywords,
        reviews: &reviews,
    };
    let tables = GraphBuilder::new(config.seed)
        .avoid_edition_collisions(config.avoid_edition_collisions)
        .build(&input);

    let manifest = write_tables(&tables, &config.output_dir)?;
    Ok(BuildSummary {
        tables: manifest.tables.iter().map(|(k, v)| (k.clone(), v.rows)).collect(),
        stats: tables.stats,
        content_hash: manifest.content_hash,
        elapsed: start.elapsed(),
    })
}

/// Outcome of `prepare`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareSummary {
    pub papers: usize,
    pub papers_with_keywords: usize,
    pub papers_with_reviewers: usize,
    pub reviews: usize,
}

/// Generate keyword, reviewer and review metadata files.
pub fn run_prepare(config: &PrepareConfig) -> Result<PrepareSummary> {
    let papers = read_papers(&config.papers)?;
    let authors: Vec<AuthorDetail> = read_json_array(&config.authors)?;
    let external = match &config.openalex {
        Some(path) => synth::openalex_keywords(&read_json_array::<OpenAlexWork>(path)?),
        None => PaperKeywords::new(),
    };

    let mut rng = synth::seeded_rng(config.seed);
    let keywords = synth::assign_keywords(&papers, &external);
    let reviewers = synth::assign_reviewers(&papers, &authors, config.h_index_threshold, &mut rng);
    let metadata = synth::review_metadata(&reviewers, &mut rng);

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    write_json(&config.output_dir.join(KEYWORDS_FILE), &keywords)?;
    write_json(&config.output_dir.join(REVIEWERS_FILE), &reviewers)?;
    write_json(&config.output_dir.join(REVIEW_METADATA_FILE), &metadata)?;

    let summary = PrepareSummary {
        papers: papers.len(),
        papers_with_keywords: keywords.values().filter(|k| !k.is_empty()).count(),
        papers_with_reviewers: reviewers.len(),
        reviews: reviewers.values().map(Vec::len).sum(),
    };
    log::info!(
        "Prepared {} papers: {} with keywords, {} with reviewers ({} reviews)",
        summary.papers,
        summary.papers_with_keywords,
        summary.papers_with_reviewers,
        summary.reviews
    );
    Ok(summary)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {}", path.display()))
}

//! Reviewer recommender for a keyword-defined community

use anyhow::{Context, Result};

use crate::client::CypherRunner;
use crate::queries::Community;

/// Recommender edge counts after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunitySummary {
    pub keywords: u64,
    pub venues: u64,
    pub top_papers: u64,
    pub reviewers: u64,
    pub gurus: u64,
}

impl CommunitySummary {
    fn from_row(row: &[String]) -> Result<Self> {
        let n = |i: usize| -> Result<u64> {
            let cell = row.get(i).context("short summary row")?;
            cell.parse()
                .with_context(|| format!("not a count: {cell}"))
        };
        Ok(Self {
            keywords: n(0)?,
            venues: n(1)?,
            top_papers: n(2)?,
            reviewers: n(3)?,
            gurus: n(4)?,
        })
    }
}

/// Create the community, its venues, top papers and reviewer edges.
///
/// Statements use `MERGE`, so re-running leaves the graph unchanged.
pub fn apply_community(runner: &mut impl CypherRunner, community: &Community) -> Result<CommunitySummary> {
    for (label, stmt) in community.statements() {
        runner
            .run(&stmt)
            .with_context(|| format!("Failed to create {label} for community {}", community.name))?;
        log::info!("Created {label} edges for community {}", community.name);
    }

    let query = community.summary_query();
    let rows = runner.fetch(&query.cypher, &query.columns)?;
    let summary = match rows.first() {
        Some(row) => CommunitySummary::from_row(row)?,
        None => CommunitySummary::default(),
    };
    log::info!(
        "Community {}: {} venues, {} top papers, {} reviewers, {} gurus",
        community.name,
        summary.venues,
        summary.top_papers,
        summary.reviewers,
        summary.gurus
    );
    Ok(summary)
}

//! Community subcommand - reviewer recommender edges

use anyhow::{Result, bail};
use clap::Args;

use citegraph_neo4j::{Community, GraphClient};

use super::Neo4jArgs;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct CommunityArgs {
    /// Community name
    #[arg(long, default_value = "Database")]
    pub name: String,

    /// Defining keyword, repeatable (default: the database keyword set)
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Share of a venue's papers that must be in the community
    #[arg(long, default_value_t = 0.9)]
    pub venue_share: f64,

    /// Number of top papers by in-community citations
    #[arg(long, default_value_t = 100)]
    pub top_papers: usize,

    /// Top papers an author needs to be a guru
    #[arg(long, default_value_t = 2)]
    pub guru_min_papers: usize,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

impl CommunityArgs {
    fn community(&self) -> Result<Community> {
        if !(0.0..=1.0).contains(&self.venue_share) {
            bail!("--venue-share must be between 0 and 1, got {}", self.venue_share);
        }
        let defaults = Community::default();
        Ok(Community {
            name: self.name.clone(),
            keywords: if self.keywords.is_empty() {
                defaults.keywords
            } else {
                self.keywords.iter().map(|k| k.trim().to_lowercase()).collect()
            },
            venue_share: self.venue_share,
            top_papers: self.top_papers,
            guru_min_papers: self.guru_min_papers,
        })
    }
}

pub fn run(args: CommunityArgs, config: &Config) -> Result<()> {
    let community = args.community()?;
    let mut client = GraphClient::connect(&args.neo4j.resolve(config))?;
    let summary = citegraph_neo4j::apply_community(&mut client, &community)?;

    println!();
    println!("=== Community {} ===", community.name);
    println!("Keywords: {}", summary.keywords);
    println!("Venues: {}", summary.venues);
    println!("Top papers: {}", summary.top_papers);
    println!("Potential reviewers: {}", summary.reviewers);
    println!("Gurus: {}", summary.gurus);
    Ok(())
}

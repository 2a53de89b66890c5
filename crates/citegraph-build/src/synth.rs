//! Synthetic enrichment: keywords, reviewers, review metadata, locations
//!
//! Everything random here draws from one seeded [`StdRng`], so a given seed
//! and input always produce the same output.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::dedup::LocationSource;
use crate::record::{AuthorDetail, PaperKeywords, PaperRecord, ReviewEntry};

/// Reviewers need at least this h-index unless configured otherwise.
pub const DEFAULT_H_INDEX_THRESHOLD: u32 = 5;

/// Share of reviews voting `accepted`.
pub const ACCEPT_RATE: f64 = 0.8;

pub const VOTE_ACCEPTED: &str = "accepted";
pub const VOTE_REJECTED: &str = "rejected";

/// Vocabulary matched against titles, per field of study.
pub const DOMAIN_VOCABULARY: &[(&str, &[&str])] = &[
    (
        "Computer Science",
        &[
            "databases",
            "transformer",
            "encryption",
            "mining",
            "data management",
            "indexing",
            "data modeling",
            "big data",
            "data processing",
            "data storage",
            "data querying",
        ],
    ),
    ("Medicine", &["diagnosis", "health", "disease", "Genomic"]),
    ("Biology", &["genome", "Epigenomic", "phylogenetics", "receptor"]),
    ("Chemistry", &["synthesis", "Bioinorganic", "Molecular", "Chromatographic"]),
    ("Mathematics", &["curves", "probability", "Harmonic", "hyperbolic"]),
];

pub const REVIEW_COMMENTS: &[&str] = &[
    "The study addresses an important gap, but the small sample size limits generalizability. Recommend major revisions.",
    "Methodology is robust, but the discussion lacks recent literature. Include more citations before acceptance.",
    "Theoretical framework is strong, but empirical validation is missing. Add case studies for clarity.",
    "Results are compelling, but statistical analysis requires deeper justification. Revise and resubmit.",
    "Innovative topic, but the writing is unclear in sections 2 and 4. Improve flow and terminology.",
    "Data presentation is excellent, but conclusions overreach the findings. Tone down claims.",
    "Strong interdisciplinary approach, but figures lack labels. Redesign visuals for better readability.",
    "Well-structured argument, but lacks engagement with counterarguments. Expand the literature review.",
    "Practical implications are significant, but ethical considerations are absent. Address in revision.",
    "Original contribution to the field, but the abstract needs simplification. Clarify key takeaways.",
];

pub const CITIES: &[&str] = &[
    "Amsterdam", "Athens", "Austin", "Bangalore", "Barcelona", "Beijing", "Berlin", "Boston",
    "Brisbane", "Budapest", "Buenos Aires", "Cairo", "Cape Town", "Chicago", "Copenhagen",
    "Dublin", "Edinburgh", "Florence", "Geneva", "Hamburg", "Helsinki", "Hong Kong", "Istanbul",
    "Kyoto", "Lisbon", "Ljubljana", "London", "Los Angeles", "Lyon", "Madrid", "Melbourne",
    "Mexico City", "Montreal", "Munich", "Nairobi", "New York", "Osaka", "Oslo", "Paris",
    "Porto", "Prague", "Rio de Janeiro", "Rome", "San Francisco", "Santiago", "Seattle", "Seoul",
    "Singapore", "Stockholm", "Sydney", "Taipei", "Tallinn", "Tokyo", "Toronto", "Valencia",
    "Vancouver", "Vienna", "Warsaw", "Zurich",
];

/// Seeded source of edition locations.
pub struct CityPicker {
    rng: StdRng,
}

impl CityPicker {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LocationSource for CityPicker {
    fn pick_location(&mut self) -> String {
        CITIES
            .choose(&mut self.rng)
            .map(|c| c.to_string())
            .unwrap_or_default()
    }
}

// === Keywords ===

#[derive(Debug, Clone, Deserialize)]
struct OpenAlexKeyword {
    #[serde(default)]
    display_name: Option<String>,
}

/// One OpenAlex work annotated with the Semantic Scholar paper id.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAlexWork {
    #[serde(rename = "paperId", default)]
    paper_id: Option<String>,
    #[serde(default)]
    keywords: Option<Vec<OpenAlexKeyword>>,
}

/// Placeholder keyword OpenAlex emits for unclassified works.
const OPENALEX_PLACEHOLDER: &str = "Plain Text";

/// paperId → OpenAlex keyword display names.
pub fn openalex_keywords(works: &[OpenAlexWork]) -> PaperKeywords {
    works
        .iter()
        .filter_map(|w| {
            let paper_id = w.paper_id.clone()?;
            let keywords = w
                .keywords
                .as_ref()?
                .iter()
                .filter_map(|k| k.display_name.clone())
                .filter(|k| k != OPENALEX_PLACEHOLDER)
                .collect();
            Some((paper_id, keywords))
        })
        .collect()
}

/// Case-insensitive keyword list; a later spelling replaces an earlier one
/// in place.
#[derive(Default)]
struct KeywordList {
    entries: Vec<(String, String)>,
}

impl KeywordList {
    fn add(&mut self, keyword: &str) {
        let key = keyword.to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = keyword.to_string(),
            None => self.entries.push((key, keyword.to_string())),
        }
    }

    fn into_values(self) -> Vec<String> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}

fn vocabulary(field: &str) -> &'static [&'static str] {
    DOMAIN_VOCABULARY
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, words)| *words)
        .unwrap_or_default()
}

/// Keywords per paper: external keywords plus vocabulary words of the
/// paper's fields that occur in its title.
pub fn assign_keywords(papers: &[PaperRecord], external: &PaperKeywords) -> PaperKeywords {
    let mut out = PaperKeywords::new();
    for paper in papers {
        let Some(paper_id) = paper.paper_id.as_deref() else {
            continue;
        };
        let mut list = KeywordList::default();
        for kw in external.get(paper_id).into_iter().flatten() {
            list.add(kw);
        }
        let title = paper.title.as_deref().unwrap_or_default().to_lowercase();
        for field in &paper.fields_of_study {
            for word in vocabulary(field) {
                if title.contains(&word.to_lowercase()) {
                    list.add(word);
                }
            }
        }
        out.insert(paper_id.to_string(), list.into_values());
    }
    out
}

// === Reviewers ===

/// paperId → reviewer author ids
pub type PaperReviewers = BTreeMap<String, Vec<String>>;

/// Pick reviewers for each paper among qualified authors of its fields.
///
/// Candidates share a field of study with the paper, have an h-index of at
/// least `threshold`, and did not author it. Three or more candidates:
/// two or three are drawn at random. One or two: all of them.
pub fn assign_reviewers(
    papers: &[PaperRecord],
    authors: &[AuthorDetail],
    threshold: u32,
    rng: &mut impl Rng,
) -> PaperReviewers {
    let mut by_field: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for paper in papers {
        for field in &paper.fields_of_study {
            let pool = by_field.entry(field.as_str()).or_default();
            pool.extend(paper.authors.iter().filter_map(|a| a.author_id.as_deref()));
        }
    }

    let qualified: BTreeSet<&str> = authors
        .iter()
        .filter(|a| a.h_index.unwrap_or(0) >= threshold)
        .filter_map(|a| a.author_id.as_deref())
        .collect();

    let mut out = PaperReviewers::new();
    let mut without = 0usize;
    for paper in papers {
        let Some(paper_id) = paper.paper_id.as_deref() else {
            continue;
        };
        let own: BTreeSet<&str> = paper.authors.iter().filter_map(|a| a.author_id.as_deref()).collect();
        let candidates: Vec<&str> = paper
            .fields_of_study
            .iter()
            .filter_map(|f| by_field.get(f.as_str()))
            .flatten()
            .copied()
            .filter(|id| qualified.contains(id) && !own.contains(id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let chosen: Vec<String> = match candidates.len() {
            0 => {
                without += 1;
                continue;
            }
            1 | 2 => candidates.iter().map(|s| s.to_string()).collect(),
            _ => {
                let count = if rng.gen_bool(0.5) { 2 } else { 3 };
                candidates
                    .choose_multiple(rng, count)
                    .map(|s| s.to_string())
                    .collect()
            }
        };
        out.insert(paper_id.to_string(), chosen);
    }
    log::info!(
        "Assigned reviewers to {} papers ({} without candidates)",
        out.len(),
        without
    );
    out
}

/// paperId → `reviewer_N` → review
pub type ReviewMetadata = BTreeMap<String, BTreeMap<String, ReviewEntry>>;

/// Attach a comment and a vote to every reviewer assignment.
pub fn review_metadata(reviewers: &PaperReviewers, rng: &mut impl Rng) -> ReviewMetadata {
    reviewers
        .iter()
        .map(|(paper_id, author_ids)| {
            let slots = author_ids
                .iter()
                .enumerate()
                .map(|(i, author_id)| {
                    let vote = if rng.gen_bool(ACCEPT_RATE) {
                        VOTE_ACCEPTED
                    } else {
                        VOTE_REJECTED
                    };
                    let entry = ReviewEntry {
                        author_id: Some(author_id.clone()),
                        comments: REVIEW_COMMENTS.choose(rng).map(|c| c.to_string()),
                        vote: Some(vote.to_string()),
                    };
                    (format!("reviewer_{}", i + 1), entry)
                })
                .collect();
            (paper_id.clone(), slots)
        })
        .collect()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(json: serde_json::Value) -> PaperRecord {
        serde_json::from_value(json).unwrap()
    }

    fn author(id: &str, h_index: Option<u32>) -> AuthorDetail {
        AuthorDetail {
            author_id: Some(id.into()),
            h_index,
            ..Default::default()
        }
    }

    #[test]
    fn city_picker_is_seeded() {
        let mut a = CityPicker::seeded(7);
        let mut b = CityPicker::seeded(7);
        let xs: Vec<String> = (0..5).map(|_| a.pick_location()).collect();
        let ys: Vec<String> = (0..5).map(|_| b.pick_location()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|c| CITIES.contains(&c.as_str())));
    }

    #[test]
    fn openalex_placeholder_dropped() {
        let works: Vec<OpenAlexWork> = serde_json::from_str(
            r#"[
                {"paperId":"p1","keywords":[{"display_name":"Plain Text"},{"display_name":"Graphs"}]},
                {"paperId":"p2"},
                {"keywords":[{"display_name":"Orphan"}]}
            ]"#,
        )
        .unwrap();
        let kws = openalex_keywords(&works);
        assert_eq!(kws.len(), 1);
        assert_eq!(kws["p1"], vec!["Graphs".to_string()]);
    }

    #[test]
    fn title_vocabulary_added() {
        let papers = [paper(serde_json::json!({
            "paperId": "p1",
            "title": "Indexing Big Data for Genomic diagnosis",
            "fieldsOfStudy": ["Computer Science", "Medicine"],
        }))];
        let kws = assign_keywords(&papers, &PaperKeywords::new());
        assert_eq!(kws["p1"], vec!["indexing", "big data", "diagnosis", "Genomic"]);
    }

    #[test]
    fn later_spelling_replaces_in_place() {
        let papers = [paper(serde_json::json!({
            "paperId": "p1",
            "title": "Mining the web",
            "fieldsOfStudy": ["Computer Science"],
        }))];
        let external = PaperKeywords::from([("p1".to_string(), vec!["MINING".to_string(), "Web".to_string()])]);
        let kws = assign_keywords(&papers, &external);
        assert_eq!(kws["p1"], vec!["mining", "Web"]);
    }

    #[test]
    fn papers_without_fields_keep_external_keywords() {
        let papers = [paper(serde_json::json!({"paperId": "p1", "title": null}))];
        let external = PaperKeywords::from([("p1".to_string(), vec!["Graphs".to_string()])]);
        assert_eq!(assign_keywords(&papers, &external)["p1"], vec!["Graphs"]);
    }

    fn review_fixture() -> (Vec<PaperRecord>, Vec<AuthorDetail>) {
        let papers = vec![
            paper(serde_json::json!({
                "paperId": "p1",
                "fieldsOfStudy": ["Computer Science"],
                "authors": [{"authorId": "a1"}, {"authorId": "a2"}],
            })),
            paper(serde_json::json!({
                "paperId": "p2",
                "fieldsOfStudy": ["Computer Science"],
                "authors": [{"authorId": "a3"}, {"authorId": "a4"}, {"authorId": "a5"}],
            })),
            paper(serde_json::json!({
                "paperId": "p3",
                "fieldsOfStudy": ["Biology"],
                "authors": [{"authorId": "b1"}],
            })),
            paper(serde_json::json!({"paperId": "p4", "fieldsOfStudy": null})),
        ];
        let authors = vec![
            author("a1", Some(10)),
            author("a2", Some(7)),
            author("a3", Some(12)),
            author("a4", Some(5)),
            author("a5", Some(2)),
            author("b1", Some(30)),
        ];
        (papers, authors)
    }

    #[test]
    fn reviewers_exclude_own_authors_and_low_h_index() {
        let (papers, authors) = review_fixture();
        let mut rng = seeded_rng(1);
        let r = assign_reviewers(&papers, &authors, DEFAULT_H_INDEX_THRESHOLD, &mut rng);

        // p1: qualified CS authors a3, a4 (a5 below threshold)
        assert_eq!(r["p1"], vec!["a3".to_string(), "a4".to_string()]);
        // p2: a1 and a2
        assert_eq!(r["p2"], vec!["a1".to_string(), "a2".to_string()]);
        // p3: only its own author is in the pool
        assert!(!r.contains_key("p3"));
        assert!(!r.contains_key("p4"));
    }

    #[test]
    fn large_pools_draw_two_or_three() {
        let mut papers = vec![paper(serde_json::json!({
            "paperId": "target",
            "fieldsOfStudy": ["Mathematics"],
        }))];
        let mut authors = Vec::new();
        for i in 0..6 {
            let id = format!("m{i}");
            papers.push(paper(serde_json::json!({
                "paperId": format!("q{i}"),
                "fieldsOfStudy": ["Mathematics"],
                "authors": [{"authorId": id}],
            })));
            authors.push(author(&id, Some(9)));
        }
        for seed in 0..20 {
            let r = assign_reviewers(&papers, &authors, 5, &mut seeded_rng(seed));
            let n = r["target"].len();
            assert!(n == 2 || n == 3, "drew {n}");
            let unique: BTreeSet<_> = r["target"].iter().collect();
            assert_eq!(unique.len(), n);
        }
    }

    #[test]
    fn reviewers_deterministic_per_seed() {
        let (papers, authors) = review_fixture();
        let a = assign_reviewers(&papers, &authors, 5, &mut seeded_rng(42));
        let b = assign_reviewers(&papers, &authors, 5, &mut seeded_rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn metadata_slots_and_votes() {
        let reviewers = PaperReviewers::from([("p1".to_string(), vec!["a1".to_string(), "a2".to_string()])]);
        let meta = review_metadata(&reviewers, &mut seeded_rng(3));
        let slots = &meta["p1"];
        assert_eq!(slots.len(), 2);
        assert_eq!(slots["reviewer_1"].author_id.as_deref(), Some("a1"));
        assert_eq!(slots["reviewer_2"].author_id.as_deref(), Some("a2"));
        for entry in slots.values() {
            let vote = entry.vote.as_deref().unwrap();
            assert!(vote == VOTE_ACCEPTED || vote == VOTE_REJECTED);
            assert!(REVIEW_COMMENTS.contains(&entry.comments.as_deref().unwrap()));
        }
    }

    #[test]
    fn votes_mostly_accepted() {
        let reviewers: PaperReviewers = (0..500)
            .map(|i| (format!("p{i}"), vec!["a".to_string()]))
            .collect();
        let meta = review_metadata(&reviewers, &mut seeded_rng(11));
        let accepted = meta
            .values()
            .filter(|s| s["reviewer_1"].vote.as_deref() == Some(VOTE_ACCEPTED))
            .count();
        assert!((330..470).contains(&accepted), "accepted {accepted}");
    }
}

//! Merge fetched paper files into one deduplicated input array

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;

use citegraph_core::{InputError, read_json_array};

use crate::record::{CONFERENCE, JOURNAL_ARTICLE, PaperRecord};
use crate::stats::CombineStats;

/// Why a record was left out of the combined set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongType,
    MissingVolume,
    MissingId,
    Duplicate,
}

/// Accumulates papers across files, first occurrence of a `paperId` wins.
#[derive(Default)]
pub struct Combiner {
    seen: FxHashSet<String>,
    papers: Vec<PaperRecord>,
    stats: CombineStats,
}

impl Combiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one record; returns why it was rejected, if it was.
    pub fn push(&mut self, paper: PaperRecord) -> Option<Rejection> {
        self.stats.scanned += 1;
        let rejection = check(&paper).or_else(|| match paper.paper_id.as_deref() {
            None => Some(Rejection::MissingId),
            Some(id) if self.seen.contains(id) => Some(Rejection::Duplicate),
            Some(_) => None,
        });
        match rejection {
            Some(Rejection::WrongType) => self.stats.wrong_type += 1,
            Some(Rejection::MissingVolume) => self.stats.missing_volume += 1,
            Some(Rejection::MissingId) => self.stats.missing_id += 1,
            Some(Rejection::Duplicate) => self.stats.duplicates += 1,
            None => {
                if let Some(id) = paper.paper_id.clone() {
                    self.seen.insert(id);
                }
                self.stats.kept += 1;
                self.papers.push(paper);
            }
        }
        rejection
    }

    /// Read one JSON array of papers; `null` entries are skipped.
    pub fn add_file(&mut self, path: &Path) -> Result<(), InputError> {
        let papers: Vec<PaperRecord> = read_json_array(path)?;
        self.stats.files += 1;
        for paper in papers {
            self.push(paper);
        }
        Ok(())
    }

    pub fn stats(&self) -> &CombineStats {
        &self.stats
    }

    pub fn finish(self) -> (Vec<PaperRecord>, CombineStats) {
        (self.papers, self.stats)
    }
}

/// Type and volume rules, independent of other records.
fn check(paper: &PaperRecord) -> Option<Rejection> {
    let journal = paper.has_type(JOURNAL_ARTICLE);
    let conference = paper.has_type(CONFERENCE);
    if !journal && !conference {
        return Some(Rejection::WrongType);
    }
    if journal && !conference && paper.volume().is_none() {
        return Some(Rejection::MissingVolume);
    }
    None
}

/// Combine `inputs` in order and write the result as one JSON array.
///
/// All inputs are parsed before `output` is touched.
pub fn combine_files(inputs: &[PathBuf], output: &Path) -> Result<CombineStats> {
    let mut combiner = Combiner::new();
    for path in inputs {
        combiner.add_file(path)?;
    }
    let (papers, stats) = combiner.finish();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    serde_json::to_writer(std::io::BufWriter::new(file), &papers)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    stats.log();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(json: serde_json::Value) -> PaperRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn type_rules() {
        let mut c = Combiner::new();
        assert_eq!(
            c.push(paper(serde_json::json!({"paperId": "r", "publicationTypes": ["Review"]}))),
            Some(Rejection::WrongType)
        );
        assert_eq!(
            c.push(paper(serde_json::json!({"paperId": "n", "publicationTypes": null}))),
            Some(Rejection::WrongType)
        );
        assert_eq!(
            c.push(paper(serde_json::json!({"paperId": "j", "publicationTypes": ["JournalArticle"], "journal": null}))),
            Some(Rejection::MissingVolume)
        );
        assert_eq!(
            c.push(paper(serde_json::json!({"paperId": "j", "publicationTypes": ["JournalArticle"], "journal": {"volume": ""}}))),
            Some(Rejection::MissingVolume)
        );
        assert_eq!(
            c.push(paper(serde_json::json!({"paperId": "c", "publicationTypes": ["JournalArticle", "Conference"]}))),
            None
        );
        assert_eq!(c.stats().kept, 1);
        assert_eq!(c.stats().wrong_type, 2);
        assert_eq!(c.stats().missing_volume, 2);
    }

    #[test]
    fn first_occurrence_wins() {
        let mut c = Combiner::new();
        let a = paper(serde_json::json!({"paperId": "p", "title": "first", "publicationTypes": ["Conference"]}));
        let b = paper(serde_json::json!({"paperId": "p", "title": "second", "publicationTypes": ["Conference"]}));
        assert_eq!(c.push(a), None);
        assert_eq!(c.push(b), Some(Rejection::Duplicate));
        let (papers, stats) = c.finish();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title.as_deref(), Some("first"));
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn combine_files_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(
            &a,
            r#"[null, {"paperId":"p1","publicationTypes":["Conference"],"externalIds":{"DOI":"x"}}]"#,
        )
        .unwrap();
        std::fs::write(
            &b,
            r#"[{"paperId":"p1","publicationTypes":["Conference"]},
                {"paperId":"p2","publicationTypes":["JournalArticle"],"journal":{"volume":"3"}}]"#,
        )
        .unwrap();
        let out = dir.path().join("out").join("combined.json");
        let stats = combine_files(&[a, b], &out).unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.kept, 2);
        assert_eq!(stats.duplicates, 1);

        let back: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[0]["externalIds"]["DOI"], "x");
    }

    #[test]
    fn malformed_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[{").unwrap();
        let out = dir.path().join("combined.json");
        assert!(combine_files(&[bad], &out).is_err());
        assert!(!out.exists());
    }
}

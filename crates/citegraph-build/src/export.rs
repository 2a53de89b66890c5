//! CSV export of [`GraphTables`] plus the content manifest

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use citegraph_core::{OutputManifest, TableWriter};

use crate::dedup::{GraphTables, Link, Placement};
use crate::schema::{self, TableSpec};

/// Write every table of [`schema::ALL_TABLES`] into `dir`, then the manifest.
pub fn write_tables(tables: &GraphTables, dir: &Path) -> Result<OutputManifest> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir: {}", dir.display()))?;

    let mut counts = BTreeMap::new();
    let mut out = Emitter {
        dir,
        counts: &mut counts,
    };

    out.table(&schema::PAPER, &tables.papers, |w, p| {
        w.write_row([&p.paper_id, &p.url, &p.title, &p.abstract_text])
    })?;
    out.table(&schema::AUTHOR, &tables.authors, |w, a| {
        w.write_row([&a.author_id, &a.name])
    })?;
    out.table(&schema::JOURNAL, &tables.journals, |w, j| {
        w.write_row([&j.journal_id, &j.name, &j.issn, &j.url])
    })?;
    out.table(&schema::VOLUME, &tables.volumes, |w, v| {
        w.write_row([v.volume_id.as_str(), v.key.number.as_str(), &v.key.year.to_string()])
    })?;
    out.table(&schema::VOL_JOURNAL_MAP, &tables.volumes, |w, v| {
        w.write_row([
            v.key.journal_id.as_str(),
            &v.key.year.to_string(),
            v.key.number.as_str(),
            v.volume_id.as_str(),
        ])
    })?;
    out.table(&schema::EVENT, &tables.events, |w, e| {
        w.write_row([
            e.event_id.as_str(),
            e.name.as_str(),
            e.issn.as_str(),
            e.url.as_str(),
            e.kind.as_str(),
        ])
    })?;
    out.table(&schema::EDITION, &tables.editions, |w, e| {
        let year = e.key.year.map(|y| y.to_string()).unwrap_or_default();
        w.write_row([
            e.edition_id.as_str(),
            &e.key.edition.to_string(),
            e.key.location.as_str(),
            &year,
        ])
    })?;
    out.table(&schema::KEYWORD, &tables.keywords, |w, k| {
        w.write_row([&k.keyword_id, &k.keyword])
    })?;
    out.table(&schema::AFFILIATION, &tables.affiliations, |w, a| {
        w.write_row([&a.aff_id, &a.name])
    })?;

    out.links(&schema::AUTHOR_WROTE_PAPER, &tables.wrote)?;
    out.links(&schema::PAPER_CORRESPONDED_BY_AUTHOR, &tables.corresponded_by)?;
    out.links(&schema::PAPER_CITED_IN_PAPER, &tables.cited_in)?;
    out.placements(&schema::PAPER_PUBLISHED_IN_VOLUME, &tables.published_in_volume)?;
    out.placements(&schema::PAPER_PUBLISHED_IN_EDITION, &tables.published_in_edition)?;
    out.links(&schema::EVENT_HAS_EDITION, &tables.event_has_edition)?;
    out.links(&schema::JOURNAL_HAS_VOLUME, &tables.journal_has_volume)?;
    out.links(&schema::PAPER_RELATED_TO_KEYWORD, &tables.related_to)?;
    out.links(&schema::AUTHOR_REVIEWED_PAPER, &tables.reviewed)?;
    out.table(&schema::REVIEW_RELATIONS, &tables.reviews, |w, r| {
        w.write_row([
            r.author_id.as_str(),
            r.paper_id.as_str(),
            r.comments.as_deref().unwrap_or_default(),
            r.vote.as_deref().unwrap_or_default(),
        ])
    })?;
    out.links(&schema::AUTHOR_AFFILIATED_WITH, &tables.affiliated_with)?;

    let manifest = OutputManifest::compute(dir, &counts)?;
    manifest.write_to(dir)?;
    log::info!(
        "Wrote {} tables to {} (hash {})",
        counts.len(),
        dir.display(),
        manifest.short_hash()
    );
    Ok(manifest)
}

struct Emitter<'a> {
    dir: &'a Path,
    counts: &'a mut BTreeMap<String, usize>,
}

impl Emitter<'_> {
    fn table<T>(
        &mut self,
        spec: &TableSpec,
        items: &[T],
        mut row: impl FnMut(&mut TableWriter, &T) -> csv::Result<()>,
    ) -> Result<()> {
        let path = self.dir.join(spec.file);
        let mut writer = TableWriter::create(&path, spec.columns, spec.quoting)?;
        for item in items {
            row(&mut writer, item).with_context(|| format!("Failed to write row to {}", spec.file))?;
        }
        let rows = writer.finish()?;
        self.counts.insert(spec.file.to_string(), rows);
        Ok(())
    }

    fn links(&mut self, spec: &TableSpec, links: &[Link]) -> Result<()> {
        self.table(spec, links, |w, l| w.write_row([&l.from, &l.to]))
    }

    fn placements(&mut self, spec: &TableSpec, placements: &[Placement]) -> Result<()> {
        self.table(spec, placements, |w, p| {
            w.write_row([
                p.paper_id.as_str(),
                p.container_id.as_str(),
                p.pages.as_deref().unwrap_or_default(),
            ])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::{AuthorNode, EditionKey, EditionNode, PaperNode};

    fn read(dir: &Path, file: &str) -> String {
        std::fs::read_to_string(dir.join(file)).unwrap()
    }

    fn sample() -> GraphTables {
        GraphTables {
            papers: vec![PaperNode {
                paper_id: "p1".into(),
                url: "https://x".into(),
                title: "A, B".into(),
                abstract_text: String::new(),
            }],
            authors: vec![AuthorNode {
                author_id: "a1".into(),
                name: "Ann".into(),
            }],
            editions: vec![EditionNode {
                edition_id: "e1".into(),
                key: EditionKey {
                    venue_id: "v".into(),
                    edition: 3,
                    location: "Lyon".into(),
                    year: None,
                },
            }],
            published_in_edition: vec![Placement {
                paper_id: "p1".into(),
                container_id: "e1".into(),
                pages: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn every_table_written_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_tables(&sample(), dir.path()).unwrap();
        assert_eq!(manifest.tables.len(), schema::ALL_TABLES.len());
        for spec in schema::ALL_TABLES {
            let content = read(dir.path(), spec.file);
            let header = content.lines().next().unwrap().replace('"', "");
            assert_eq!(header, spec.columns.join(","), "{}", spec.file);
        }
    }

    #[test]
    fn rows_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = write_tables(&sample(), dir.path()).unwrap();
        assert_eq!(
            read(dir.path(), "paper.csv"),
            "\"paperId\",\"url\",\"title\",\"abstract\"\n\"p1\",\"https://x\",\"A, B\",\"\"\n"
        );
        assert_eq!(read(dir.path(), "edition.csv"), "editionId,edition,location,year\ne1,3,Lyon,\n");
        assert_eq!(
            read(dir.path(), "paper_publishedIn_edition.csv"),
            "paperId,editionId,pages\np1,e1,\n"
        );
        assert_eq!(manifest.tables["author.csv"].rows, 1);
        assert_eq!(manifest.tables["keyword.csv"].rows, 0);
    }

    #[test]
    fn manifest_written_and_stable() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_tables(&sample(), dir.path()).unwrap();
        let second = write_tables(&sample(), dir.path()).unwrap();
        assert_eq!(first.content_hash, second.content_hash);
        let on_disk = OutputManifest::read_from(dir.path()).unwrap();
        assert_eq!(on_disk.content_hash, second.content_hash);
        assert!(on_disk.verify(dir.path()).is_empty());
    }
}

//! Output table layout: file names, exact header rows, quoting.
//!
//! The graph loader builds its `LOAD CSV` statements from these same
//! definitions, so headers cannot drift between writer and loader.

use citegraph_core::Quoting;

/// One emitted CSV table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub file: &'static str,
    pub columns: &'static [&'static str],
    pub quoting: Quoting,
}

impl TableSpec {
    const fn new(file: &'static str, columns: &'static [&'static str]) -> Self {
        Self {
            file,
            columns,
            quoting: Quoting::Minimal,
        }
    }

    const fn quoted(mut self) -> Self {
        self.quoting = Quoting::All;
        self
    }

    /// File name without `.csv`.
    pub fn stem(&self) -> &'static str {
        self.file.strip_suffix(".csv").unwrap_or(self.file)
    }
}

// === Nodes ===

pub const PAPER: TableSpec = TableSpec::new("paper.csv", &["paperId", "url", "title", "abstract"]).quoted();
pub const AUTHOR: TableSpec = TableSpec::new("author.csv", &["authorId", "name"]);
pub const JOURNAL: TableSpec = TableSpec::new("journal.csv", &["journalId", "name", "ISSN", "url"]);
pub const VOLUME: TableSpec = TableSpec::new("volume.csv", &["volumeId", "number", "year"]);
pub const VOL_JOURNAL_MAP: TableSpec =
    TableSpec::new("vol_journal_map.csv", &["journalId", "year", "number", "volumeId"]);
pub const EVENT: TableSpec = TableSpec::new("event.csv", &["eventId", "name", "ISSN", "url", "type"]);
pub const EDITION: TableSpec = TableSpec::new("edition.csv", &["editionId", "edition", "location", "year"]);
pub const KEYWORD: TableSpec = TableSpec::new("keyword.csv", &["keywordId", "keyword"]);
pub const AFFILIATION: TableSpec = TableSpec::new("affiliation.csv", &["affId", "name"]).quoted();

// === Edges ===

pub const AUTHOR_WROTE_PAPER: TableSpec = TableSpec::new("author_wrote_paper.csv", &["authorId", "paperId"]);
pub const PAPER_CORRESPONDED_BY_AUTHOR: TableSpec =
    TableSpec::new("paper_correspondedBy_author.csv", &["paperId", "authorId"]);
pub const PAPER_CITED_IN_PAPER: TableSpec =
    TableSpec::new("paper_citedIn_paper.csv", &["paperId", "citingPaperId"]);
pub const PAPER_PUBLISHED_IN_VOLUME: TableSpec =
    TableSpec::new("paper_publishedIn_volume.csv", &["paperId", "volumeId", "pages"]);
pub const PAPER_PUBLISHED_IN_EDITION: TableSpec =
    TableSpec::new("paper_publishedIn_edition.csv", &["paperId", "editionId", "pages"]);
pub const EVENT_HAS_EDITION: TableSpec =
    TableSpec::new("event_hasEdition_edition.csv", &["eventId", "editionId"]);
pub const JOURNAL_HAS_VOLUME: TableSpec =
    TableSpec::new("journal_hasVolume_volume.csv", &["journalId", "volumeId"]);
pub const PAPER_RELATED_TO_KEYWORD: TableSpec =
    TableSpec::new("paper_isRelatedTo_keyword.csv", &["paperId", "keywordId"]);
pub const AUTHOR_REVIEWED_PAPER: TableSpec =
    TableSpec::new("author_reviewed_paper.csv", &["authorId", "paperId"]);
pub const REVIEW_RELATIONS: TableSpec =
    TableSpec::new("review_relations.csv", &["authorId", "paperId", "comments", "vote"]).quoted();
pub const AUTHOR_AFFILIATED_WITH: TableSpec =
    TableSpec::new("author_affiliatedWith_affiliation.csv", &["authorId", "affId"]).quoted();

/// Every table in emission order.
pub const ALL_TABLES: &[TableSpec] = &[
    PAPER,
    AUTHOR,
    JOURNAL,
    VOLUME,
    VOL_JOURNAL_MAP,
    EVENT,
    EDITION,
    KEYWORD,
    AFFILIATION,
    AUTHOR_WROTE_PAPER,
    PAPER_CORRESPONDED_BY_AUTHOR,
    PAPER_CITED_IN_PAPER,
    PAPER_PUBLISHED_IN_VOLUME,
    PAPER_PUBLISHED_IN_EDITION,
    EVENT_HAS_EDITION,
    JOURNAL_HAS_VOLUME,
    PAPER_RELATED_TO_KEYWORD,
    AUTHOR_REVIEWED_PAPER,
    REVIEW_RELATIONS,
    AUTHOR_AFFILIATED_WITH,
];

pub fn find(file: &str) -> Option<&'static TableSpec> {
    ALL_TABLES.iter().find(|t| t.file == file)
}

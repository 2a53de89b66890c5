//! Cypher for schema setup and bulk `LOAD CSV` import
//!
//! Load statements are generated from [`citegraph_build::schema`], so every
//! `row.<column>` reference matches a header the exporter writes.

use citegraph_build::schema::{self, TableSpec};

/// Rows per inner transaction of `CALL { ... } IN TRANSACTIONS`.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Columns loaded as integers. Everything else stays a string.
const INTEGER_COLUMNS: &[&str] = &["authorId", "edition", "year"];

/// Uniqueness constraints, one per node key.
pub const CONSTRAINTS: &[(&str, &str, &str)] = &[
    ("event_id", "Event", "eventId"),
    ("keyword_id", "Keyword", "keywordId"),
    ("paper_id", "Paper", "paperId"),
    ("edition_id", "Edition", "editionId"),
    ("author_id", "Author", "authorId"),
    ("journal_id", "Journal", "journalId"),
    ("volume_id", "Volume", "volumeId"),
    ("affiliation_id", "Affiliation", "affId"),
];

/// Secondary indexes used by the analytical queries.
pub const INDEXES: &[(&str, &str, &str)] = &[("volume_year", "Volume", "year")];

pub fn constraint_statements() -> Vec<String> {
    let constraints = CONSTRAINTS.iter().map(|(name, label, key)| {
        format!("CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.{key} IS UNIQUE")
    });
    let indexes = INDEXES
        .iter()
        .map(|(name, label, key)| format!("CREATE INDEX {name} IF NOT EXISTS FOR (n:{label}) ON (n.{key})"));
    constraints.chain(indexes).collect()
}

/// `row.<column>`, converted where the graph stores an integer.
fn value(column: &str) -> String {
    if INTEGER_COLUMNS.contains(&column) {
        format!("toInteger(row.{column})")
    } else {
        format!("row.{column}")
    }
}

fn property_map(columns: &[&str]) -> String {
    let props: Vec<String> = columns.iter().map(|c| format!("{c}: {}", value(c))).collect();
    format!("{{{}}}", props.join(", "))
}

/// Node table mapping.
#[derive(Debug, Clone, Copy)]
pub struct NodeLoad {
    pub table: &'static TableSpec,
    pub label: &'static str,
    /// Column whose value becomes a second label instead of a property
    pub label_column: Option<&'static str>,
}

/// One side of a relationship: node label, key property, source column.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub label: &'static str,
    pub key: &'static str,
    pub column: &'static str,
}

const fn end(label: &'static str, key: &'static str, column: &'static str) -> Endpoint {
    Endpoint { label, key, column }
}

const fn by_key(label: &'static str, key: &'static str) -> Endpoint {
    end(label, key, key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Create one relationship per row
    Create,
    /// Set properties on a relationship created by an earlier table
    Annotate,
}

/// Relationship table mapping.
#[derive(Debug, Clone, Copy)]
pub struct EdgeLoad {
    pub table: &'static TableSpec,
    pub rel: &'static str,
    pub from: Endpoint,
    pub to: Endpoint,
    /// Columns stored as relationship properties
    pub props: &'static [&'static str],
    pub mode: EdgeMode,
}

pub const NODE_LOADS: &[NodeLoad] = &[
    NodeLoad {
        table: &schema::EVENT,
        label: "Event",
        label_column: Some("type"),
    },
    NodeLoad {
        table: &schema::KEYWORD,
        label: "Keyword",
        label_column: None,
    },
    NodeLoad {
        table: &schema::PAPER,
        label: "Paper",
        label_column: None,
    },
    NodeLoad {
        table: &schema::EDITION,
        label: "Edition",
        label_column: None,
    },
    NodeLoad {
        table: &schema::AUTHOR,
        label: "Author",
        label_column: None,
    },
    NodeLoad {
        table: &schema::JOURNAL,
        label: "Journal",
        label_column: None,
    },
    NodeLoad {
        table: &schema::VOLUME,
        label: "Volume",
        label_column: None,
    },
    NodeLoad {
        table: &schema::AFFILIATION,
        label: "Affiliation",
        label_column: None,
    },
];

const PAPER: Endpoint = by_key("Paper", "paperId");
const AUTHOR: Endpoint = by_key("Author", "authorId");

/// Relationship loads in dependency order: `REVIEWED` exists before review
/// metadata is attached to it.
pub const EDGE_LOADS: &[EdgeLoad] = &[
    EdgeLoad {
        table: &schema::PAPER_CORRESPONDED_BY_AUTHOR,
        rel: "CORRESPONDED_BY",
        from: PAPER,
        to: AUTHOR,
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::AUTHOR_REVIEWED_PAPER,
        rel: "REVIEWED",
        from: AUTHOR,
        to: PAPER,
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::PAPER_CITED_IN_PAPER,
        rel: "CITED_IN",
        from: PAPER,
        to: end("Paper", "paperId", "citingPaperId"),
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::PAPER_PUBLISHED_IN_EDITION,
        rel: "PUBLISHED_IN",
        from: PAPER,
        to: by_key("Edition", "editionId"),
        props: &["pages"],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::PAPER_RELATED_TO_KEYWORD,
        rel: "RELATED_TO",
        from: PAPER,
        to: by_key("Keyword", "keywordId"),
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::EVENT_HAS_EDITION,
        rel: "HAS_EDITION",
        from: by_key("Event", "eventId"),
        to: by_key("Edition", "editionId"),
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::PAPER_PUBLISHED_IN_VOLUME,
        rel: "PUBLISHED_IN",
        from: PAPER,
        to: by_key("Volume", "volumeId"),
        props: &["pages"],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::JOURNAL_HAS_VOLUME,
        rel: "HAS_VOLUME",
        from: by_key("Journal", "journalId"),
        to: by_key("Volume", "volumeId"),
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::AUTHOR_WROTE_PAPER,
        rel: "WROTE",
        from: AUTHOR,
        to: PAPER,
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::AUTHOR_AFFILIATED_WITH,
        rel: "AFFILIATED_WITH",
        from: AUTHOR,
        to: by_key("Affiliation", "affId"),
        props: &[],
        mode: EdgeMode::Create,
    },
    EdgeLoad {
        table: &schema::REVIEW_RELATIONS,
        rel: "REVIEWED",
        from: AUTHOR,
        to: PAPER,
        props: &["comments", "vote"],
        mode: EdgeMode::Annotate,
    },
];

fn load_csv(table: &TableSpec, body: &str, batch_size: usize) -> String {
    format!(
        "LOAD CSV WITH HEADERS FROM 'file:///{file}' AS row FIELDTERMINATOR ','\n\
         CALL (row) {{\n    {body}\n}} IN TRANSACTIONS OF {batch_size} ROWS",
        file = table.file,
    )
}

impl NodeLoad {
    pub fn statement(&self, batch_size: usize) -> String {
        let columns: Vec<&str> = self
            .table
            .columns
            .iter()
            .copied()
            .filter(|c| Some(*c) != self.label_column)
            .collect();
        let labels = match self.label_column {
            Some(col) => format!("{}:$(row.{col})", self.label),
            None => self.label.to_string(),
        };
        let body = format!("CREATE (n:{labels} {})", property_map(&columns));
        load_csv(self.table, &body, batch_size)
    }
}

impl Endpoint {
    fn pattern(&self, var: &str) -> String {
        format!("({var}:{} {{{}: {}}})", self.label, self.key, value(self.column))
    }
}

impl EdgeLoad {
    pub fn statement(&self, batch_size: usize) -> String {
        let from = self.from.pattern("a");
        let to = self.to.pattern("b");
        let body = match self.mode {
            EdgeMode::Create => {
                let props = if self.props.is_empty() {
                    String::new()
                } else {
                    format!(" {}", property_map(self.props))
                };
                format!("MATCH {from}\n    MATCH {to}\n    CREATE (a)-[:{}{props}]->(b)", self.rel)
            }
            EdgeMode::Annotate => {
                let sets: Vec<String> = self
                    .props
                    .iter()
                    .map(|p| format!("r.{p} = {}", value(p)))
                    .collect();
                format!(
                    "MATCH {from}-[r:{}]->{to}\n    SET {}",
                    self.rel,
                    sets.join(", ")
                )
            }
        };
        load_csv(self.table, &body, batch_size)
    }
}

/// Tables the loader imports. The volume lookup map is not part of the graph.
pub fn loaded_tables() -> impl Iterator<Item = &'static TableSpec> {
    NODE_LOADS
        .iter()
        .map(|n| n.table)
        .chain(EDGE_LOADS.iter().map(|e| e.table))
}

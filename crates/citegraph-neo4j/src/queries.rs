//! Analytical queries, graph algorithms and the community recommender

/// Default year for the journal impact factor.
pub const DEFAULT_TARGET_YEAR: i32 = 2017;

/// Distinct editions an author needs to belong to an event community.
pub const COMMUNITY_MIN_EDITIONS: u32 = 4;

/// A named read query and the columns it returns, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedQuery {
    pub name: String,
    pub cypher: String,
    pub columns: Vec<&'static str>,
    /// Statements run first; failures are logged and ignored
    pub setup: Vec<String>,
}

impl NamedQuery {
    fn new(name: impl Into<String>, cypher: impl Into<String>, columns: &[&'static str]) -> Self {
        Self {
            name: name.into(),
            cypher: cypher.into(),
            columns: columns.to_vec(),
            setup: Vec::new(),
        }
    }

    fn with_setup(mut self, statements: &[String]) -> Self {
        self.setup.extend_from_slice(statements);
        self
    }
}

// === Analytical queries ===

pub fn top_cited_per_event() -> NamedQuery {
    NamedQuery::new(
        "Query 1: Find the top 3 most cited papers of each conference/workshop",
        "MATCH (ed:Edition)<-[:HAS_EDITION]-(c:Event)
         MATCH (ed)<-[:PUBLISHED_IN]-(cited:Paper)
         OPTIONAL MATCH (cited)-[:CITED_IN]->(p:Paper)
         WITH c, cited, COUNT(p) AS citations
         ORDER BY c.name, citations DESC
         WITH c, COLLECT({paper: cited, citations: citations})[0..3] AS top_papers
         UNWIND top_papers AS entry
         RETURN c.name AS Event, entry.paper.title AS PaperTitle, entry.citations AS Citations
         ORDER BY Event, Citations DESC",
        &["Event", "PaperTitle", "Citations"],
    )
}

pub fn event_communities(min_editions: u32) -> NamedQuery {
    NamedQuery::new(
        format!(
            "Query 2: For each conference/workshop find its community: authors that have published \
             papers on it in at least {min_editions} different editions"
        ),
        format!(
            "MATCH (c:Event)-[:HAS_EDITION]->(ed:Edition)
             MATCH (ed)<-[:PUBLISHED_IN]-(p:Paper)
             MATCH (p)<-[:WROTE]-(a:Author)
             WITH c, a, COUNT(DISTINCT ed) AS editions
             WHERE editions >= {min_editions}
             RETURN c.name AS Event, a.name AS Author, editions AS EditionsParticipated
             ORDER BY Event, EditionsParticipated DESC"
        ),
        &["Event", "Author", "EditionsParticipated"],
    )
}

/// Citations in `year` to papers of the two preceding years, per paper
/// published in those years.
pub fn impact_factor(year: i32) -> NamedQuery {
    NamedQuery::new(
        format!("Query 3: Find the impact factor of the journals in the graph (target year {year})"),
        format!(
            "WITH {year} AS targetYear
             MATCH (v:Volume)
             WHERE v.year IN [targetYear - 1, targetYear - 2]
             MATCH (j:Journal)-[:HAS_VOLUME]->(v)
             MATCH (v)<-[:PUBLISHED_IN]-(p:Paper)
             OPTIONAL MATCH (p)<-[:CITED_IN]-(citingPaper:Paper)-[:PUBLISHED_IN]->(citingVolume:Volume)
             WHERE citingVolume.year = targetYear
             WITH j, COUNT(DISTINCT p) AS totalPapers, COUNT(citingPaper) AS totalCitations
             RETURN j.name AS Journal,
                    CASE WHEN totalPapers > 0 THEN totalCitations / toFloat(totalPapers) ELSE 0.0 END AS ImpactFactor
             ORDER BY ImpactFactor DESC"
        ),
        &["Journal", "ImpactFactor"],
    )
}

pub fn h_index() -> NamedQuery {
    NamedQuery::new(
        "Query 4: Find the h-index of the authors in the graph",
        "MATCH (a:Author)-[:WROTE]->(p:Paper)
         OPTIONAL MATCH (p)-[:CITED_IN]->(citingPaper:Paper)
         WITH a, p, COUNT(citingPaper) AS citationCount
         ORDER BY citationCount DESC
         WITH a, COLLECT(citationCount) AS counts
         WITH a, REDUCE(s = 0, x IN RANGE(0, SIZE(counts) - 1) |
              CASE WHEN counts[x] >= x + 1 THEN s + 1 ELSE s END) AS hIndex
         RETURN a.name AS Author, hIndex AS HIndex
         ORDER BY HIndex DESC",
        &["Author", "HIndex"],
    )
}

/// The four analytical queries in report order.
pub fn analytical(target_year: i32, min_editions: u32) -> Vec<NamedQuery> {
    vec![
        top_cited_per_event(),
        event_communities(min_editions),
        impact_factor(target_year),
        h_index(),
    ]
}

// === Graph algorithms ===

pub const CITATION_GRAPH: &str = "citationgraph";
pub const KEYWORD_GRAPH: &str = "paperKeywordNetwork";
pub const PAGE_RANK_ITERATIONS: u32 = 50;

/// Drop a stale projection, then project afresh.
fn projection(name: &str, project: &str) -> Vec<String> {
    vec![
        format!("CALL gds.graph.drop('{name}', false) YIELD graphName RETURN graphName"),
        format!("CALL gds.graph.project('{name}', {project})"),
    ]
}

/// PageRank over citations, score flowing from citing to cited paper.
pub fn page_rank() -> NamedQuery {
    NamedQuery::new(
        "Algorithm 1- Page Rank",
        format!(
            "CALL gds.pageRank.stream('{CITATION_GRAPH}', {{ maxIterations: {PAGE_RANK_ITERATIONS} }})
             YIELD nodeId, score
             WITH gds.util.asNode(nodeId) AS paper, score
             RETURN paper.title AS influentialPaper, score
             ORDER BY score DESC"
        ),
        &["influentialPaper", "score"],
    )
    .with_setup(&projection(
        CITATION_GRAPH,
        "'Paper', { CITED_IN: { orientation: 'REVERSE' } }",
    ))
}

/// Jaccard similarity of papers over shared keywords.
pub fn node_similarity() -> NamedQuery {
    NamedQuery::new(
        "Algorithm 2- Node Similarity",
        format!(
            "CALL gds.nodeSimilarity.stream('{KEYWORD_GRAPH}')
             YIELD node1, node2, similarity
             WITH gds.util.asNode(node1) AS p1, gds.util.asNode(node2) AS p2, similarity
             WHERE p1:Paper AND p2:Paper
             RETURN p1.title AS paperA, p2.title AS paperB, similarity
             ORDER BY similarity DESC"
        ),
        &["paperA", "paperB", "similarity"],
    )
    .with_setup(&projection(KEYWORD_GRAPH, "['Paper', 'Keyword'], 'RELATED_TO'"))
}

pub fn algorithms() -> Vec<NamedQuery> {
    vec![page_rank(), node_similarity()]
}

// === Community recommender ===

/// Keyword-defined research community and recommender thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    pub name: String,
    pub keywords: Vec<String>,
    /// Share of a venue's papers that must be in the community
    pub venue_share: f64,
    /// Papers ranked by in-community citations that count as top papers
    pub top_papers: usize,
    /// Top papers an author needs to be a guru
    pub guru_min_papers: usize,
}

impl Default for Community {
    fn default() -> Self {
        Self {
            name: "Database".to_string(),
            keywords: [
                "data management",
                "indexing",
                "data modeling",
                "big data",
                "data processing",
                "data storage",
                "data querying",
            ]
            .map(String::from)
            .to_vec(),
            venue_share: 0.9,
            top_papers: 100,
            guru_min_papers: 2,
        }
    }
}

fn cypher_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl Community {
    fn name_literal(&self) -> String {
        cypher_string(&self.name)
    }

    /// Community node with one `DEFINES` edge per keyword.
    pub fn define(&self) -> String {
        let keywords: Vec<String> = self.keywords.iter().map(|k| cypher_string(k)).collect();
        format!(
            "MERGE (c:Community {{name: {name}}})
             WITH c, [{keywords}] AS keywords
             UNWIND keywords AS keyword
             MERGE (k:Keyword {{keyword: keyword}})
             MERGE (k)-[:DEFINES]->(c)",
            name = self.name_literal(),
            keywords = keywords.join(", "),
        )
    }

    /// `VENUE_OF` for journals and events whose papers are mostly in the
    /// community.
    pub fn venues(&self) -> String {
        format!(
            "MATCH (k:Keyword)-[:DEFINES]->(c:Community {{name: {name}}})
             WITH collect(k) AS communityKeywords, c
             MATCH (venue)-[:HAS_EDITION|HAS_VOLUME]->(ve)<-[:PUBLISHED_IN]-(p:Paper)
             WITH venue, c, count(DISTINCT p) AS totalPapers,
                  count(DISTINCT CASE WHEN EXISTS {{ (p)-[:RELATED_TO]->(k) WHERE k IN communityKeywords }} THEN p END) AS relevantPapers
             WHERE totalPapers > 0 AND toFloat(relevantPapers) / totalPapers > {share}
             MERGE (venue)-[:VENUE_OF]->(c)",
            name = self.name_literal(),
            share = self.venue_share,
        )
    }

    /// `TOP_IN_COMMUNITY` for the most cited papers within the community.
    pub fn top_papers(&self) -> String {
        format!(
            "MATCH (p:Paper)-[:PUBLISHED_IN]->(ve)<-[:HAS_EDITION|HAS_VOLUME]-(v)-[:VENUE_OF]->(c:Community {{name: {name}}})
             WITH collect(DISTINCT p) AS communityPapers, c
             UNWIND communityPapers AS paper
             OPTIONAL MATCH (paper)-[:CITED_IN]->(citingPaper)
             WHERE citingPaper IN communityPapers
             WITH paper, c, count(DISTINCT citingPaper) AS citations
             ORDER BY citations DESC
             LIMIT {limit}
             MERGE (paper)-[r:TOP_IN_COMMUNITY]->(c)
             SET r.citationCount = citations",
            name = self.name_literal(),
            limit = self.top_papers,
        )
    }

    /// `POTENTIAL_REVIEWER_OF` for authors of a top paper, `GURU_OF` for
    /// authors of several.
    pub fn reviewers(&self) -> String {
        format!(
            "MATCH (a:Author)-[:WROTE]->(p:Paper)-[:TOP_IN_COMMUNITY]->(c:Community {{name: {name}}})
             WITH a, c, count(p) AS topPapers
             MERGE (a)-[:POTENTIAL_REVIEWER_OF]->(c)
             FOREACH (_ IN CASE WHEN topPapers >= {guru} THEN [1] ELSE [] END |
                 MERGE (a)-[:GURU_OF]->(c))",
            name = self.name_literal(),
            guru = self.guru_min_papers,
        )
    }

    /// All recommender statements in execution order, with a label each.
    pub fn statements(&self) -> Vec<(&'static str, String)> {
        vec![
            ("community", self.define()),
            ("VENUE_OF", self.venues()),
            ("TOP_IN_COMMUNITY", self.top_papers()),
            ("POTENTIAL_REVIEWER_OF / GURU_OF", self.reviewers()),
        ]
    }

    /// Counts of the recommender edges, for the summary.
    pub fn summary_query(&self) -> NamedQuery {
        NamedQuery::new(
            format!("Community {}", self.name),
            format!(
                "MATCH (c:Community {{name: {name}}})
                 RETURN
                   COUNT {{ (:Keyword)-[:DEFINES]->(c) }} AS keywords,
                   COUNT {{ ()-[:VENUE_OF]->(c) }} AS venues,
                   COUNT {{ (:Paper)-[:TOP_IN_COMMUNITY]->(c) }} AS topPapers,
                   COUNT {{ (:Author)-[:POTENTIAL_REVIEWER_OF]->(c) }} AS reviewers,
                   COUNT {{ (:Author)-[:GURU_OF]->(c) }} AS gurus",
                name = self.name_literal(),
            ),
            &["keywords", "venues", "topPapers", "reviewers", "gurus"],
        )
    }
}

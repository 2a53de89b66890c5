use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Result, bail};
use citegraph_build::{BuildConfig, run_build};
use citegraph_core::ProgressContext;
use citegraph_neo4j::queries::{self, COMMUNITY_MIN_EDITIONS, DEFAULT_TARGET_YEAR};
use citegraph_neo4j::{
    Community, ConnectionConfig, CypherRunner, GraphClient, LoadConfig, apply_community, load_graph,
    write_report,
};

const PAPERS: &str = r#"[
  {"paperId": "p1", "title": "Graphs", "year": 2019, "venue": "2nd Graph Days",
   "publicationTypes": ["Conference"], "publicationVenue": {"id": "ev1", "name": "Graph Days"},
   "authors": [{"authorId": "1", "name": "Ann"}], "citations": [{"paperId": "p2"}]},
  {"paperId": "p2", "title": "Volumes", "year": 2016,
   "publicationTypes": ["JournalArticle"], "publicationVenue": {"id": "j1", "name": "Journal"},
   "journal": {"volume": "4", "pages": "1-2"}, "authors": [{"authorId": "2", "name": "Bob"}]}
]"#;

/// Records statements and answers fetches from a script.
#[derive(Default)]
struct Scripted {
    ran: Vec<String>,
    answers: VecDeque<Result<Vec<Vec<String>>>>,
}

impl CypherRunner for Scripted {
    fn run(&mut self, cypher: &str) -> Result<()> {
        self.ran.push(cypher.to_string());
        Ok(())
    }

    fn fetch(&mut self, _cypher: &str, _columns: &[&str]) -> Result<Vec<Vec<String>>> {
        self.answers.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn build_tables(dir: &Path) -> std::path::PathBuf {
    let papers = dir.join("papers.json");
    std::fs::write(&papers, PAPERS).unwrap();
    let config = BuildConfig {
        papers,
        output_dir: dir.join("import"),
        ..Default::default()
    };
    run_build(&config).unwrap();
    config.output_dir
}

#[test]
fn load_checks_built_tables() {
    let dir = tempfile::tempdir().unwrap();
    let import = build_tables(dir.path());
    let config = LoadConfig {
        import_dir: Some(import),
        ..Default::default()
    };
    let mut runner = Scripted::default();
    let summary = load_graph(&mut runner, &config, &ProgressContext::with_tty(false)).unwrap();
    // 2 papers, 2 authors, 1 journal, 1 volume, 1 event, 1 edition, 2 wrote,
    // 2 corresponded, 1 cited, 2 placements, 1 has_edition, 1 has_volume
    assert_eq!(summary.rows, 17);
    assert!(runner.ran.iter().any(|s| s.contains("file:///event.csv")));
}

#[test]
fn load_refuses_modified_tables() {
    let dir = tempfile::tempdir().unwrap();
    let import = build_tables(dir.path());
    std::fs::write(import.join("paper.csv"), "\"paperId\"\n\"tampered\"\n").unwrap();
    let config = LoadConfig {
        import_dir: Some(import),
        ..Default::default()
    };
    let mut runner = Scripted::default();
    let err = load_graph(&mut runner, &config, &ProgressContext::with_tty(false)).unwrap_err();
    assert!(err.to_string().contains("paper.csv"), "{err}");
    assert!(runner.ran.is_empty());
}

#[test]
fn stray_tables_do_not_block_load() {
    let dir = tempfile::tempdir().unwrap();
    let import = build_tables(dir.path());
    std::fs::write(import.join("scratch.csv"), "a,b\n1,2\n").unwrap();
    let config = LoadConfig {
        import_dir: Some(import),
        ..Default::default()
    };
    let mut runner = Scripted::default();
    let summary = load_graph(&mut runner, &config, &ProgressContext::with_tty(false)).unwrap();
    assert_eq!(summary.rows, 17);
    assert!(!runner.ran.iter().any(|s| s.contains("scratch.csv")));
}

#[test]
fn report_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("neo4j_query_results.txt");
    let mut runner = Scripted {
        answers: VecDeque::from([
            Ok(vec![vec!["Graph Days".into(), "Graphs".into(), "1".into()]]),
            Err(anyhow::anyhow!("timeout")),
            Ok(Vec::new()),
        ]),
        ..Default::default()
    };
    let summary = write_report(
        &mut runner,
        "NEO4J QUERY RESULTS",
        &queries::analytical(DEFAULT_TARGET_YEAR, COMMUNITY_MIN_EDITIONS),
        &path,
    )
    .unwrap();
    assert_eq!(summary.queries, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.rows, 1);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("NEO4J QUERY RESULTS\n"));
    assert!(text.contains("Event | PaperTitle | Citations\n"));
    assert!(text.contains("Graph Days | Graphs | 1\n"));
    assert!(text.contains("Error executing Query 2"));
    assert!(text.contains("target year 2017) Results ---\n\nNo results returned.\n"));
}

#[test]
fn algorithm_report_projects_graphs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("algorithms.txt");
    let mut runner = Scripted::default();
    write_report(&mut runner, "GRAPH ALGORITHMS", &queries::algorithms(), &path).unwrap();
    assert_eq!(runner.ran.len(), 4);
    assert!(runner.ran[1].contains("gds.graph.project('citationgraph'"));
}

#[test]
fn failing_statement_aborts_community() {
    struct Failing;
    impl CypherRunner for Failing {
        fn run(&mut self, _cypher: &str) -> Result<()> {
            bail!("unavailable")
        }
        fn fetch(&mut self, _cypher: &str, _columns: &[&str]) -> Result<Vec<Vec<String>>> {
            Ok(Vec::new())
        }
    }
    let err = apply_community(&mut Failing, &Community::default()).unwrap_err();
    assert!(format!("{err:#}").contains("unavailable"));
}

fn live_config() -> ConnectionConfig {
    ConnectionConfig {
        uri: std::env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".into()),
        password: std::env::var("NEO4J_PASSWORD").unwrap_or_default(),
        ..Default::default()
    }
}

#[test]
#[ignore] // requires a running Neo4j server
fn live_round_trip() {
    let mut client = GraphClient::connect(&live_config()).unwrap();
    let rows = client.fetch("RETURN 1 AS one, 'x' AS s", &["one", "s"]).unwrap();
    assert_eq!(rows, vec![vec!["1".to_string(), "x".to_string()]]);
}

#[test]
#[ignore] // requires a running Neo4j server with the tables in its import dir
fn live_load_and_query() {
    let mut client = GraphClient::connect(&live_config()).unwrap();
    load_graph(&mut client, &LoadConfig::default(), &ProgressContext::with_tty(false)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let summary = write_report(
        &mut client,
        "NEO4J QUERY RESULTS",
        &queries::analytical(DEFAULT_TARGET_YEAR, COMMUNITY_MIN_EDITIONS),
        &dir.path().join("report.txt"),
    )
    .unwrap();
    assert_eq!(summary.failed, 0);
}

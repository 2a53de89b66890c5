//! Bulk import of the CSV tables

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};

use citegraph_core::{OutputManifest, ProgressContext, fmt_num};

use crate::client::CypherRunner;
use crate::cypher::{self, DEFAULT_BATCH_SIZE, EDGE_LOADS, NODE_LOADS};

/// Loader settings
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Local copy of the server's import directory. When set, the tables
    /// and their manifest are checked before anything is sent.
    pub import_dir: Option<PathBuf>,
    pub batch_size: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            import_dir: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub constraints: usize,
    /// (table file, time spent)
    pub tables: Vec<(String, Duration)>,
    /// Rows per table from the manifest, when the import dir was checked
    pub rows: usize,
    pub elapsed: Duration,
}

impl LoadSummary {
    pub fn log(&self) {
        log::info!(
            "Loaded {} tables ({} rows) with {} constraints in {:.1}s",
            self.tables.len(),
            fmt_num(self.rows),
            self.constraints,
            self.elapsed.as_secs_f64()
        );
        for (table, took) in &self.tables {
            log::debug!("  {table}: {:.2}s", took.as_secs_f64());
        }
    }
}

/// Verify that `dir` holds every loaded table, unchanged since the build.
/// Returns the total row count.
pub fn check_import_dir(dir: &std::path::Path) -> Result<usize> {
    let manifest = OutputManifest::read_from(dir)?;
    let missing: Vec<&str> = cypher::loaded_tables()
        .map(|t| t.file)
        .filter(|f| !manifest.tables.contains_key(*f))
        .collect();
    if !missing.is_empty() {
        bail!("{}: manifest lacks tables: {}", dir.display(), missing.join(", "));
    }
    let changed = manifest.verify(dir);
    if !changed.is_empty() {
        bail!(
            "{}: tables changed since build: {}",
            dir.display(),
            changed.join(", ")
        );
    }
    let stray = manifest.untracked(dir)?;
    if !stray.is_empty() {
        log::warn!(
            "{}: ignoring tables not produced by the build: {}",
            dir.display(),
            stray.join(", ")
        );
    }
    let rows = cypher::loaded_tables()
        .filter_map(|t| manifest.tables.get(t.file))
        .map(|e| e.rows)
        .sum();
    log::info!(
        "Import dir {} verified (hash {})",
        dir.display(),
        manifest.short_hash()
    );
    Ok(rows)
}

/// Create constraints, then load node tables before relationship tables.
pub fn load_graph(
    runner: &mut impl CypherRunner,
    config: &LoadConfig,
    progress: &ProgressContext,
) -> Result<LoadSummary> {
    let start = Instant::now();
    if config.batch_size == 0 {
        bail!("batch size must be positive");
    }
    let rows = match &config.import_dir {
        Some(dir) => check_import_dir(dir)?,
        None => 0,
    };

    let constraints = cypher::constraint_statements();
    for stmt in &constraints {
        runner.run(stmt)?;
    }
    log::info!("Constraints created");

    let steps: Vec<(&str, String)> = NODE_LOADS
        .iter()
        .map(|n| (n.table.file, n.statement(config.batch_size)))
        .chain(
            EDGE_LOADS
                .iter()
                .map(|e| (e.table.file, e.statement(config.batch_size))),
        )
        .collect();

    let bar = progress.steps_bar("load", steps.len() as u64);
    let mut tables = Vec::with_capacity(steps.len());
    for (file, stmt) in &steps {
        bar.set_message(file.to_string());
        let t = Instant::now();
        runner.run(stmt)?;
        tables.push((file.to_string(), t.elapsed()));
        bar.inc(1);
        log::debug!("Loaded {file}");
    }
    bar.finish_and_clear();

    let summary = LoadSummary {
        constraints: constraints.len(),
        tables,
        rows,
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        statements: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl CypherRunner for Recorder {
        fn run(&mut self, cypher: &str) -> Result<()> {
            if let Some(marker) = self.fail_on {
                if cypher.contains(marker) {
                    bail!("rejected");
                }
            }
            self.statements.push(cypher.to_string());
            Ok(())
        }

        fn fetch(&mut self, _cypher: &str, _columns: &[&str]) -> Result<Vec<Vec<String>>> {
            Ok(Vec::new())
        }
    }

    fn quiet() -> ProgressContext {
        ProgressContext::with_tty(false)
    }

    #[test]
    fn constraints_then_nodes_then_edges() {
        let mut r = Recorder::default();
        let summary = load_graph(&mut r, &LoadConfig::default(), &quiet()).unwrap();
        let n_constraints = cypher::constraint_statements().len();
        assert_eq!(summary.constraints, n_constraints);
        assert_eq!(summary.tables.len(), NODE_LOADS.len() + EDGE_LOADS.len());
        assert_eq!(r.statements.len(), n_constraints + summary.tables.len());

        let first_edge = n_constraints + NODE_LOADS.len();
        assert!(r.statements[..n_constraints].iter().all(|s| s.starts_with("CREATE ")));
        assert!(r.statements[n_constraints..first_edge]
            .iter()
            .all(|s| !s.contains("MATCH")));
        assert!(r.statements[first_edge..].iter().all(|s| s.contains("MATCH")));
    }

    #[test]
    fn batch_size_applied() {
        let mut r = Recorder::default();
        let config = LoadConfig {
            batch_size: 1000,
            ..Default::default()
        };
        load_graph(&mut r, &config, &quiet()).unwrap();
        assert!(r
            .statements
            .iter()
            .filter(|s| s.starts_with("LOAD CSV"))
            .all(|s| s.ends_with("IN TRANSACTIONS OF 1000 ROWS")));
    }

    #[test]
    fn zero_batch_rejected() {
        let config = LoadConfig {
            batch_size: 0,
            ..Default::default()
        };
        let mut r = Recorder::default();
        assert!(load_graph(&mut r, &config, &quiet()).is_err());
        assert!(r.statements.is_empty());
    }

    #[test]
    fn failure_stops_the_load() {
        let mut r = Recorder {
            fail_on: Some("file:///paper.csv"),
            ..Default::default()
        };
        let err = load_graph(&mut r, &LoadConfig::default(), &quiet()).unwrap_err();
        assert_eq!(err.to_string(), "rejected");
        assert!(r.statements.iter().all(|s| !s.contains("WROTE")));
    }

    #[test]
    fn missing_manifest_checked_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoadConfig {
            import_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let mut r = Recorder::default();
        assert!(load_graph(&mut r, &config, &quiet()).is_err());
        assert!(r.statements.is_empty());
    }
}

//! Plain-text query report
//!
//! ```text
//! --- <name> Results ---
//!
//! ColA | ColB
//! -----------
//! x | 1
//! ```
//!
//! A failing query writes an error line in place of its rows and the report
//! carries on with the next query.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::client::CypherRunner;
use crate::queries::NamedQuery;

/// Rows returned by one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One report section.
pub fn render_section(name: &str, result: &Result<ResultTable, String>) -> String {
    let mut out = String::new();
    let table = match result {
        Ok(table) => table,
        Err(e) => {
            out.push_str(&format!("Error executing {name}: {e}\n"));
            return out;
        }
    };
    out.push_str(&format!("\n\n--- {name} Results ---\n\n"));
    if table.rows.is_empty() {
        out.push_str("No results returned.\n");
        return out;
    }
    let header = table.columns.join(" | ");
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.chars().count()));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&row.join(" | "));
        out.push('\n');
    }
    out
}

/// Counts for one written report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub queries: usize,
    pub failed: usize,
    pub rows: usize,
}

impl ReportSummary {
    pub fn log(&self, path: &Path) {
        log::info!(
            "{} queries ({} failed, {} rows) written to {}",
            self.queries,
            self.failed,
            self.rows,
            path.display()
        );
    }
}

/// Report writer over any sink.
pub struct Report<W: Write> {
    out: W,
    summary: ReportSummary,
}

impl<W: Write> Report<W> {
    pub fn new(mut out: W, title: &str) -> Result<Self> {
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "=".repeat(title.chars().count()))?;
        Ok(Self {
            out,
            summary: ReportSummary::default(),
        })
    }

    pub fn add(&mut self, name: &str, result: &Result<ResultTable, String>) -> Result<()> {
        self.summary.queries += 1;
        match result {
            Ok(t) => self.summary.rows += t.rows.len(),
            Err(_) => self.summary.failed += 1,
        }
        self.out.write_all(render_section(name, result).as_bytes())?;
        Ok(())
    }

    /// Run `query` (after its setup statements) and append its section.
    pub fn run(&mut self, runner: &mut impl CypherRunner, query: &NamedQuery) -> Result<()> {
        for stmt in &query.setup {
            if let Err(e) = runner.run(stmt) {
                log::debug!("{}: setup statement failed: {e:#}", query.name);
            }
        }
        let result = runner
            .fetch(&query.cypher, &query.columns)
            .map(|rows| ResultTable {
                columns: query.columns.iter().map(|c| c.to_string()).collect(),
                rows,
            })
            .map_err(|e| {
                log::warn!("{} failed: {e:#}", query.name);
                format!("{e:#}")
            });
        self.add(&query.name, &result)
    }

    pub fn finish(mut self) -> Result<ReportSummary> {
        self.out.flush()?;
        Ok(self.summary)
    }
}

/// Run `queries` in order and write their report to `path`.
pub fn write_report(
    runner: &mut impl CypherRunner,
    title: &str,
    queries: &[NamedQuery],
    path: &Path,
) -> Result<ReportSummary> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    let mut report = Report::new(std::io::BufWriter::new(file), title)?;
    for query in queries {
        report.run(runner, query)?;
        log::info!("{} executed", query.name);
    }
    let summary = report
        .finish()
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    summary.log(path);
    Ok(summary)
}

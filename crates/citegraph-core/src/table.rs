//! CSV table output for the graph bulk loader
//!
//! The loader matches columns by header name, so every table is written
//! with an explicit header row and a fixed column count.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Quoting policy for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Quote only fields containing delimiters, quotes or newlines
    Minimal,
    /// Quote every field (free-text tables such as titles and abstracts)
    All,
}

impl Quoting {
    fn style(self) -> csv::QuoteStyle {
        match self {
            Self::Minimal => csv::QuoteStyle::Necessary,
            Self::All => csv::QuoteStyle::Always,
        }
    }
}

/// Normalize free text for CSV loading.
///
/// Trims, flattens line breaks, and replaces characters the graph store's
/// CSV reader treats specially (double quote, backslash).
pub fn clean_field(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '\r' | '\n' => ' ',
            '"' => '\'',
            '\\' => '/',
            c => c,
        })
        .collect()
}

/// Header-first CSV writer that counts data rows.
pub struct TableWriter<W: Write = File> {
    name: String,
    inner: csv::Writer<W>,
    rows: usize,
}

impl TableWriter<File> {
    /// Create `path` and write the header row.
    pub fn create(path: &Path, header: &[&str], quoting: Quoting) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create table: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_writer(name, file, header, quoting)
            .with_context(|| format!("Failed to write header: {}", path.display()))
    }
}

impl<W: Write> TableWriter<W> {
    pub fn from_writer(
        name: impl Into<String>,
        writer: W,
        header: &[&str],
        quoting: Quoting,
    ) -> csv::Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .quote_style(quoting.style())
            .from_writer(writer);
        inner.write_record(header)?;
        Ok(Self {
            name: name.into(),
            inner,
            rows: 0,
        })
    }

    /// Append one data row. The field count must match the header.
    pub fn write_row<I, T>(&mut self, row: I) -> csv::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.inner.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data rows written so far (header excluded).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and return the number of data rows.
    pub fn finish(mut self) -> Result<usize> {
        self.inner
            .flush()
            .with_context(|| format!("Failed to flush table: {}", self.name))?;
        log::info!("Added {} rows to {}", self.rows, self.name);
        Ok(self.rows)
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let name = self.name;
        self.inner
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush table {name}: {}", e.error()))
    }
}

//! Statistics collection and reporting for graph table builds.
//!
//! - `CombineStats`: paper files merged into one input array
//! - `BuildStats`: records skipped or resolved while building tables
//! - `BuildSummary`: emitted tables plus `BuildStats`, printed after a build

use std::collections::BTreeMap;
use std::time::Duration;

use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use citegraph_core::fmt_num;

// =============================================================================
// Combine
// =============================================================================

/// Counters for merging fetched paper files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineStats {
    pub files: usize,
    /// Non-null records read
    pub scanned: usize,
    /// Neither `JournalArticle` nor `Conference`
    pub wrong_type: usize,
    /// Journal-only papers without journal descriptor or volume
    pub missing_volume: usize,
    pub missing_id: usize,
    pub duplicates: usize,
    pub kept: usize,
}

impl CombineStats {
    pub fn log(&self) {
        log::info!(
            "Combined {} files: kept {} of {} papers ({} wrong type, {} without volume, {} duplicates)",
            self.files,
            fmt_num(self.kept),
            fmt_num(self.scanned),
            fmt_num(self.wrong_type),
            fmt_num(self.missing_volume),
            fmt_num(self.duplicates),
        );
    }
}

// =============================================================================
// Build
// =============================================================================

/// Records skipped or resolved per relation family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub papers_in: usize,
    pub papers_without_id: usize,
    pub duplicate_papers: usize,
    /// Author refs and author details without an id
    pub authors_without_id: usize,
    pub citations_without_id: usize,
    /// Reviewer entries without an author id
    pub reviews_without_id: usize,
    pub journal_papers: usize,
    /// Journal papers lacking venue id, year or volume
    pub volumes_incomplete: usize,
    pub conference_papers: usize,
    /// Edition number taken from the venue string
    pub editions_extracted: usize,
    /// Edition number assigned by the fallback policy
    pub editions_synthetic: usize,
    /// No edition in the venue string and no year to group by
    pub editions_unresolved: usize,
    pub conference_without_venue: usize,
    pub blank_keywords: usize,
    pub blank_affiliations: usize,
}

/// Outcome of one build, for the summary table.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Table file name → data rows
    pub tables: BTreeMap<String, usize>,
    pub stats: BuildStats,
    pub content_hash: String,
    pub elapsed: Duration,
}

impl BuildSummary {
    /// Format summary table as a string.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Table")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Rows").fg(Color::Cyan),
            ]);
        for (name, rows) in &self.tables {
            table.add_row(vec![Cell::new(name), Cell::new(fmt_num(*rows))]);
        }

        let s = &self.stats;
        let mut quality = Table::new();
        quality
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Input")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Count").fg(Color::Cyan),
                Cell::new("%").fg(Color::Cyan),
            ]);
        quality.add_row(vec![
            Cell::new("Papers").fg(Color::Green),
            Cell::new(fmt_num(s.papers_in)).fg(Color::Green),
            Cell::new(""),
        ]);
        quality.add_row(vec![
            Cell::new("Duplicate / no id"),
            Cell::new(format!(
                "{} / {}",
                fmt_num(s.duplicate_papers),
                fmt_num(s.papers_without_id)
            )),
            Cell::new(""),
        ]);
        quality.add_row(vec![
            Cell::new("Journal papers without volume"),
            Cell::new(fmt_num(s.volumes_incomplete)),
            Cell::new(format!("{:.1}", pct(s.volumes_incomplete, s.journal_papers))),
        ]);
        quality.add_row(vec![
            Cell::new("Editions extracted"),
            Cell::new(fmt_num(s.editions_extracted)),
            Cell::new(format!("{:.1}", pct(s.editions_extracted, s.conference_papers))),
        ]);
        quality.add_row(vec![
            Cell::new("Editions synthetic"),
            Cell::new(fmt_num(s.editions_synthetic)),
            Cell::new(format!("{:.1}", pct(s.editions_synthetic, s.conference_papers))),
        ]);
        quality.add_row(vec![
            Cell::new("Conference papers dropped"),
            Cell::new(fmt_num(s.editions_unresolved + s.conference_without_venue)),
            Cell::new(format!(
                "{:.1}",
                pct(s.editions_unresolved + s.conference_without_venue, s.conference_papers)
            )),
        ]);

        let mut out = format!("\n{table}\n{quality}");
        if s.citations_without_id > 0 || s.authors_without_id > 0 || s.reviews_without_id > 0 {
            out.push_str(&format!(
                "\n  Citations without id: {}  |  Authors without id: {}  |  Reviewers without id: {}",
                fmt_num(s.citations_without_id),
                fmt_num(s.authors_without_id),
                fmt_num(s.reviews_without_id)
            ));
        }
        out.push_str(&format!("\n  Content hash: {}", self.content_hash));
        out
    }

    /// Log minimal summary (non-TTY mode).
    pub fn log(&self) {
        let rows: usize = self.tables.values().sum();
        log::info!(
            "Build complete: {} tables, {} rows, hash {} [{:.1}s]",
            self.tables.len(),
            fmt_num(rows),
            &self.content_hash[..8.min(self.content_hash.len())],
            self.elapsed.as_secs_f64()
        );
    }
}

/// Calculate percentage safely.
fn pct(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

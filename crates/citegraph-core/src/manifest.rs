//! Output manifest: row counts and content hashes of an emitted table set

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::hash;

pub const MANIFEST_FILE: &str = "manifest.json";

/// One emitted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Data rows (header excluded)
    pub rows: usize,
    /// Full hex blake3 hash of the file
    pub blake3: String,
}

/// Manifest stored next to the CSV tables.
///
/// The loader reads it to know which tables a build produced; `verify`
/// detects tables edited or removed after the build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputManifest {
    /// Table file name → entry
    pub tables: BTreeMap<String, TableEntry>,
    /// Combined hash of all tables in name order
    pub content_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl OutputManifest {
    /// Hash the given tables (file name → row count) inside `dir`.
    pub fn compute(dir: &Path, row_counts: &BTreeMap<String, usize>) -> Result<Self> {
        let mut tables = BTreeMap::new();
        let mut hashes = Vec::with_capacity(row_counts.len());
        for (name, rows) in row_counts {
            let path = dir.join(name);
            let h = hash::hash_file(&path)
                .with_context(|| format!("failed to hash {}", path.display()))?;
            tables.insert(
                name.clone(),
                TableEntry {
                    rows: *rows,
                    blake3: h.to_hex().to_string(),
                },
            );
            hashes.push(h);
        }
        let content_hash = hash::combine_hashes(&hashes).to_hex().to_string();
        Ok(Self {
            tables,
            content_hash,
            created_at: chrono::Utc::now(),
        })
    }

    /// Table names present in `dir` that the manifest does not list.
    pub fn untracked(&self, dir: &Path) -> Result<Vec<String>> {
        let pattern = dir.join("*.csv");
        let mut extra: Vec<String> = glob::glob(&pattern.to_string_lossy())
            .context("invalid glob pattern")?
            .filter_map(|e| e.ok())
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .filter(|n| !self.tables.contains_key(n))
            .collect();
        extra.sort();
        Ok(extra)
    }

    /// Names of tables whose current content no longer matches the manifest.
    pub fn verify(&self, dir: &Path) -> Vec<String> {
        self.tables
            .iter()
            .filter(|(name, entry)| match hash::hash_file(&dir.join(name.as_str())) {
                Ok(h) => h.to_hex().as_str() != entry.blake3,
                Err(_) => true,
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn short_hash(&self) -> &str {
        &self.content_hash[..8.min(self.content_hash.len())]
    }

    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).context("failed to serialize manifest")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn read_from(dir: &Path) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
    }
}

//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for citegraph
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub build: BuildSection,
    pub neo4j: Neo4jSection,
    pub reports: ReportsSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    pub output_dir: PathBuf,
    pub seed: u64,
    pub h_index_threshold: u32,
    pub avoid_edition_collisions: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("nodes_edges"),
            seed: 42,
            h_index_threshold: 5,
            avoid_edition_collisions: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jSection {
    #[serde(deserialize_with = "deserialize_env_string")]
    pub uri: String,
    pub user: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub password: Option<String>,
    pub database: String,
    pub batch_size: usize,
    /// Local path of the server's import directory
    pub import_dir: Option<PathBuf>,
}

impl Default for Neo4jSection {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: std::env::var("NEO4J_PASSWORD").ok(),
            database: "neo4j".to_string(),
            batch_size: 200,
            import_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportsSection {
    pub dir: PathBuf,
    pub target_year: i32,
}

impl Default for ReportsSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            target_year: 2017,
        }
    }
}

/// Optional string with `${VAR}` references; unset variables leave it unset.
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_vars(&s)))
}

/// Required string with `${VAR}` references; an unset variable is an error.
fn deserialize_env_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_env_vars(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("unset environment variable in {s:?}")))
}

/// Replace every `${VAR}` with its value. `None` when a variable is unset.
fn expand_env_vars(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&std::env::var(&rest[start + 2..start + 2 + len]).ok()?);
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    Some(out)
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./citegraph.toml (current directory)
    /// 2. ~/.config/citegraph/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("citegraph.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "citegraph") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

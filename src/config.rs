use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Where the documents are published. Feeds the document key and URL.
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            base_url: default_base_url(),
        }
    }
}

fn default_label() -> String {
    "graph".to_string()
}
fn default_base_url() -> String {
    "https://analect.github.io/quarto-graph-experiments".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscoveryConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default = "default_exclude_globs")]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: default_exclude_globs(),
            follow_symlinks: false,
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.qmd".to_string(), "**/*.ipynb".to_string()]
}
fn default_exclude_globs() -> Vec<String> {
    vec!["**/index.qmd".to_string()]
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GraphConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Graph store location: the configured path, else `graph.sqlite`
    /// next to the tables.
    pub fn db_path_for(&self, data_dir: &Path) -> PathBuf {
        self.graph
            .db_path
            .clone()
            .unwrap_or_else(|| data_dir.join("graph.sqlite"))
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.site.label.is_empty() {
        anyhow::bail!("site.label must not be empty");
    }

    if config.site.base_url.is_empty() {
        anyhow::bail!("site.base_url must not be empty");
    }

    if config.discovery.include_globs.is_empty() {
        anyhow::bail!("discovery.include_globs must list at least one pattern");
    }

    Ok(())
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::filter::DEFAULT_BOT_SUFFIX;

/// Configuration file structure for leadtime.
///
/// Lets users keep their GitHub endpoint, exclusions and output preferences
/// out of the command line. Command-line flags always win over file values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub personal access token; `LT_GITHUB_ACCESS_TOKEN` takes precedence
    pub token: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,

    /// Page size for list requests
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Number of pull requests whose commits are fetched at once
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Abort the whole run after this many seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Exclude pull requests opened by bots
    #[serde(default)]
    pub exclude_bot: bool,

    /// Pull request numbers to exclude
    #[serde(default)]
    pub exclude_prs: Vec<u64>,

    /// Author logins to exclude
    #[serde(default)]
    pub exclude_users: Vec<String>,

    /// Login suffix marking automated accounts
    #[serde(default = "default_bot_suffix")]
    pub bot_suffix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
    Json,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_github_base_url(),
            per_page: default_per_page(),
            workers: default_workers(),
            timeout_secs: None,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_bot: false,
            exclude_prs: Vec::new(),
            exclude_users: Vec::new(),
            bot_suffix: default_bot_suffix(),
        }
    }
}

fn default_github_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u8 {
    20
}

fn default_workers() -> usize {
    1
}

fn default_bot_suffix() -> String {
    DEFAULT_BOT_SUFFIX.to_string()
}

const CANDIDATES: [&str; 4] = ["leadtime.toml", "leadtime.json", "leadtime.yaml", "leadtime.yml"];

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./leadtime.toml, ./leadtime.json, ./leadtime.yaml, ./leadtime.yml
    /// 3. `<config dir>/leadtime/config.toml`
    ///
    /// Returns default configuration if no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the specified path or a discovered file cannot
    /// be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = candidate_paths(Path::new("."), dirs::config_dir().as_deref());

        match discover(&candidates) {
            Some(path) => {
                log::debug!("Using config file {}", path.display());
                Self::load_from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "toml" => {
                toml::from_str(&contents)
                    .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
            }
            "json" => {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
            }
            "yaml" | "yml" => {
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse YAML config: {}", path.display()))
            }
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}

/// Config files in lookup order: `leadtime.*` in `working_dir`, then
/// `config.toml` in the `leadtime` subdirectory of `config_dir`.
fn candidate_paths(working_dir: &Path, config_dir: Option<&Path>) -> Vec<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| working_dir.join(name))
        .chain(config_dir.map(|dir| dir.join("leadtime").join("config.toml")))
        .collect()
}

/// First candidate that exists as a file.
fn discover(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.is_file()).cloned()
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::Credentials;
use crate::evaluator::{BuildStatusEvaluator, CommitSelection, FlagThreshold};
use crate::providers::jenkins::{
    ClientOptions, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_TIMEOUT_SECONDS,
};

const CANDIDATES: [&str; 4] = [
    "buildflag.toml",
    "buildflag.json",
    "buildflag.yaml",
    "buildflag.yml",
];

/// Configuration file structure for buildflag.
///
/// Every value can be overridden from the command line or environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub jenkins: JenkinsConfig,

    #[serde(default)]
    pub flagging: FlaggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct JenkinsConfig {
    /// Jenkins base URL (e.g. https://ci.example.com/jenkins/)
    pub url: Option<String>,

    pub user: Option<String>,

    /// Jenkins API token for `user`
    pub token: Option<String>,

    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlaggingConfig {
    /// Only jobs whose name contains this substring are evaluated
    pub job_filter: Option<String>,

    #[serde(default = "default_threshold_hours")]
    pub threshold_hours: u32,

    /// Root that commit links are built from: `{root}/{repo}/commits/{id}`
    #[serde(default)]
    pub repo_root_url: String,

    #[serde(default)]
    pub commit_selection: CommitSelection,
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

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Default for JenkinsConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: None,
            token: None,
            max_concurrent_requests: default_max_concurrent_requests(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for FlaggingConfig {
    fn default() -> Self {
        Self {
            job_filter: None,
            threshold_hours: default_threshold_hours(),
            repo_root_url: String::new(),
            commit_selection: CommitSelection::default(),
        }
    }
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_threshold_hours() -> u32 {
    24
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path (must exist)
    /// 2. ./buildflag.{toml,json,yaml,yml}
    /// 3. `<config dir>/buildflag/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        if let Some(config) = Self::load_from_dir(Path::new("."))? {
            return Ok(config);
        }

        if let Some(user_config) = Self::user_config_path().filter(|p| p.exists()) {
            return Self::load_from_path(&user_config);
        }

        Ok(Self::default())
    }

    /// Platform config location, e.g. `~/.config/buildflag/config.toml` on Linux.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("buildflag").join("config.toml"))
    }

    fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        for candidate in &CANDIDATES {
            let path = dir.join(candidate);
            if path.exists() {
                return Self::load_from_path(&path).map(Some);
            }
        }
        Ok(None)
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.jenkins.user.as_deref(), self.jenkins.token.as_deref())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            max_concurrent_requests: self.jenkins.max_concurrent_requests,
            timeout: Duration::from_secs(self.jenkins.timeout_seconds),
        }
    }

    pub fn evaluator(&self) -> BuildStatusEvaluator {
        BuildStatusEvaluator::new(
            FlagThreshold::from_hours(self.flagging.threshold_hours),
            self.flagging.repo_root_url.clone(),
            self.flagging.commit_selection,
        )
    }
}

//! Configuration for the revalidation backend.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (REVALIDATOR_ENDPOINT, REVALIDATOR_SECRET)
//! 2. Config file (.revalidator/config.yaml)
//! 3. Defaults (no endpoint, default sitemap tags)
//!
//! Config file discovery:
//! - Searches current directory and parents for .revalidator/config.yaml
//! - Falls back to ~/.revalidator/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::SitemapTags;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const ENV_ENDPOINT: &str = "REVALIDATOR_ENDPOINT";
const ENV_SECRET: &str = "REVALIDATOR_SECRET";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub tags: Option<SitemapTags>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Revalidation endpoint (log-only backend when absent)
    pub endpoint: Option<String>,
    /// Shared secret sent with every request
    pub secret: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Tag groups to invalidate
    pub tags: SitemapTags,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            secret: None,
            timeout: Duration::from_secs(10),
            tags: SitemapTags::default(),
            config_file: None,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let home = dirs::home_dir();
    discover_config_file(cwd.as_deref(), home.as_deref())
}

/// Walk from `start` up to the filesystem root, then try `home`
fn discover_config_file(start: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    if let Some(start) = start {
        let mut current = start.to_path_buf();
        loop {
            let config_path = current.join(".revalidator").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = home?.join(".revalidator").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge a parsed file and environment overrides over the defaults
fn resolve(
    file: Option<(PathBuf, ConfigFile)>,
    env_endpoint: Option<String>,
    env_secret: Option<String>,
) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let (config_file, file) = match file {
        Some((path, file)) => (Some(path), Some(file)),
        None => (None, None),
    };

    let endpoint = env_endpoint.or_else(|| file.as_ref().and_then(|f| f.endpoint.clone()));
    let secret = env_secret.or_else(|| file.as_ref().and_then(|f| f.secret.clone()));
    let timeout = file
        .as_ref()
        .and_then(|f| f.timeout_seconds)
        .map(Duration::from_secs)
        .unwrap_or(defaults.timeout);
    let tags = file.and_then(|f| f.tags).unwrap_or(defaults.tags);

    ResolvedConfig {
        endpoint,
        secret,
        timeout,
        tags,
        config_file,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let file = match find_config_file() {
        Some(path) => {
            let parsed = load_config_file(&path)?;
            Some((path, parsed))
        }
        None => None,
    };

    Ok(resolve(
        file,
        std::env::var(ENV_ENDPOINT).ok(),
        std::env::var(ENV_SECRET).ok(),
    ))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    cached(&CONFIG, load_config)
}

/// Load into `cell` on first use. A load error is cached too.
fn cached(
    cell: &'static OnceLock<Result<ResolvedConfig, String>>,
    load: impl FnOnce() -> Result<ResolvedConfig>,
) -> Result<&'static ResolvedConfig> {
    let result = cell.get_or_init(|| load().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.folio/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Posts document: a path, an absolute URL, or a name relative to `base_url`.
    pub source: Option<String>,
    pub base_url: Option<String>,
    pub home_limit: Option<usize>,
    pub log_file: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SOURCE: &str = "posts.json";
pub const DEFAULT_HOME_LIMIT: usize = 3;
pub const DEFAULT_LOG_FILE: &str = "folio.log";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: String,
    pub base_url: Option<String>,
    pub home_limit: usize,
    pub log_file: PathBuf,
    /// `None` means wait forever.
    pub fetch_timeout: Option<Duration>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub source: Option<String>,
    pub base_url: Option<String>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.folio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".folio").join("config.toml"))
}

/// Load config from `~/.folio/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FolioConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FolioConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FolioConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<FolioConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FolioConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FolioConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Folio Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# source = "posts.json"              # Path, absolute URL, or name relative to base_url
# base_url = "https://example.com/blog/"
# home_limit = 3                     # Posts per section on the home view
# log_file = "folio.log"
# fetch_timeout_secs = 30            # Unset = no timeout
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &FolioConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with the environment lookup supplied by the caller.
pub fn resolve_with(
    config: &FolioConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Source: CLI → env → config → default
    let source = cli
        .source
        .clone()
        .or_else(|| env("FOLIO_SOURCE"))
        .or_else(|| config.general.source.clone())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    // Base URL: CLI → env → config
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("FOLIO_BASE_URL"))
        .or_else(|| config.general.base_url.clone());

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    ResolvedConfig {
        source,
        base_url,
        home_limit: config.general.home_limit.unwrap_or(DEFAULT_HOME_LIMIT),
        log_file,
        fetch_timeout: config
            .general
            .fetch_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
    }
}

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{
    CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_PENALTY_MARKERS, DEFAULT_SERVER_PORT,
    DEFAULT_STANDINGS_COUNT, DEFAULT_UPSTREAM_BASE_URL, DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
};
use crate::error::{Result, StandingsError};
use crate::roster::Roster;
use crate::scoring::SubstringClassifier;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub upstream: UpstreamConfig,
    pub server: ServerConfig,
    pub roster: RosterConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Rows requested in the single bulk standings fetch
    pub count: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
            count: DEFAULT_STANDINGS_COUNT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub handles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub penalty_markers: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            penalty_markers: DEFAULT_PENALTY_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Config {
    /// Load from `explicit`, else `$CF_STANDINGS_CONFIG`, else `config.toml`.
    ///
    /// A missing default file falls back to built-in defaults; a missing file
    /// that was asked for by name is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        match named {
            Some(path) => Self::from_path(&path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    warn!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StandingsError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&content)?;
        info!(
            path = %path.display(),
            roster_size = config.roster.handles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.upstream.base_url.trim().is_empty() {
            return Err(StandingsError::Config("upstream.base_url is empty".to_string()));
        }
        if self.upstream.count == 0 {
            return Err(StandingsError::Config("upstream.count must be positive".to_string()));
        }
        Ok(())
    }

    pub fn roster(&self) -> Roster {
        Roster::new(&self.roster.handles)
    }

    pub fn classifier(&self) -> SubstringClassifier {
        SubstringClassifier::new(&self.scoring.penalty_markers)
    }
}

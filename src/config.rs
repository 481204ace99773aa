//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load environment variables: {0}")]
    EnvLoad(#[from] dotenvy::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub const DEFAULT_START_YEAR: i32 = 2024;
pub const DEFAULT_CANDIDATES_PER_VISIT: usize = 3;

/// Where proposals come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in catalog is used when unset
    pub path: Option<PathBuf>,
}

/// Session tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Fixed RNG seed for reproducible draws
    pub seed: Option<u64>,
    pub start_year: i32,
    pub candidates_per_visit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            start_year: DEFAULT_START_YEAR,
            candidates_per_visit: DEFAULT_CANDIDATES_PER_VISIT,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub catalog: CatalogConfig,
    pub session: SessionConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = SessionConfig::default();

        let catalog = CatalogConfig {
            path: lookup("TORRINGTON_CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        let session = SessionConfig {
            seed: parse_optional(&lookup, "TORRINGTON_SEED")?,
            start_year: parse_optional(&lookup, "TORRINGTON_START_YEAR")?
                .unwrap_or(defaults.start_year),
            candidates_per_visit: parse_optional(&lookup, "TORRINGTON_CANDIDATES_PER_VISIT")?
                .unwrap_or(defaults.candidates_per_visit),
        };

        if session.candidates_per_visit == 0 {
            return Err(ConfigError::InvalidValue(
                "TORRINGTON_CANDIDATES_PER_VISIT must be at least 1".to_string(),
            ));
        }

        Ok(Self { catalog, session })
    }
}

fn parse_optional<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(format!("{}={}", key, raw))),
    }
}

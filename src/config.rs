use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Application configuration loaded from `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub moderation: ModerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub groups_collection: String,
    pub images_collection: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            name: "images".to_string(),
            groups_collection: "groups".to_string(),
            images_collection: "images".to_string(),
        }
    }
}

/// Moderation rules handed to the handlers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Closed set of statuses an image may have
    pub valid_statuses: Vec<String>,
    /// Page size used when `groups_per_page` is not supplied
    pub groups_per_page: u32,
    /// Length of the statistics window in days
    pub statistics_days: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            valid_statuses: ["new", "review", "accepted", "deleted"]
                .map(String::from)
                .to_vec(),
            groups_per_page: 10,
            statistics_days: 30,
        }
    }
}

impl ModerationConfig {
    pub fn is_valid_status(&self, status: &str) -> bool {
        self.valid_statuses.iter().any(|s| s == status)
    }

    /// Error description listing the accepted statuses.
    pub fn valid_statuses_description(&self) -> String {
        format!("Valid statuses are - {:?}", self.valid_statuses)
    }
}

impl AppConfig {
    /// Load from `$APP_CONFIG` (or `config.toml`), then apply env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("APP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(port) = std::env::var("PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {port}"))?;
        }
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            config.database.uri = uri;
        }
        if let Ok(name) = std::env::var("MONGODB_DATABASE") {
            config.database.name = name;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.moderation.valid_statuses.is_empty() {
            bail!("moderation.valid_statuses must not be empty");
        }
        if self.moderation.groups_per_page == 0 {
            bail!("moderation.groups_per_page must be greater than zero");
        }
        Ok(())
    }
}

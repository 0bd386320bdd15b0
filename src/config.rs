//! Configuration for scpstats
//!
//! Centralized configuration with sensible defaults, plus the `key=value`
//! file the game server deployment ships alongside the backend.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StatsError};

/// Default location of the key=value config file
pub const DEFAULT_CONFIG_FILE: &str = "config.cfg";

/// Main configuration for a backend instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Host of the game server feeding us events
    pub host: String,

    /// Port of the game server's event feed
    pub port: u16,

    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    pub storage: StorageBackend,
}

/// Where player statistics are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite database file
    Sqlite(PathBuf),

    /// Process-local map, lost on exit
    Memory,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 7777,
            storage: StorageBackend::Sqlite(PathBuf::from("scpstats.db")),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a config from a key=value file.
    ///
    /// `port` is required; `host` and `database` fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = ConfigFile::load(path)?;
        let mut builder = Config::builder().port(file.port()?);

        if let Some(host) = file.get("host") {
            builder = builder.host(host);
        }
        if let Some(database) = file.get("database") {
            builder = builder.storage(StorageBackend::Sqlite(PathBuf::from(database)));
        }

        Ok(builder.build())
    }

    /// `host:port` of the event feed
    pub fn feed_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the event feed host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the event feed port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the storage backend
    pub fn storage(mut self, storage: StorageBackend) -> Self {
        self.config.storage = storage;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Parsed `key=value` config file
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    entries: HashMap<String, String>,
}

impl ConfigFile {
    /// Read and parse a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            StatsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse config text. Blank lines, `#` comments and lines without `=`
    /// are skipped; the first occurrence of a key wins.
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            entries
                .entry(key.trim().to_string())
                .or_insert_with(|| value.trim().to_string());
        }

        Self { entries }
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a key that must be present
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| StatsError::Config(format!("key {} not found in config file", key)))
    }

    /// The required `port` key
    pub fn port(&self) -> Result<u16> {
        let raw = self.require("port")?;
        raw.parse()
            .map_err(|_| StatsError::Config(format!("invalid port: {:?}", raw)))
    }
}

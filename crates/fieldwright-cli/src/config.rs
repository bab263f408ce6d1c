//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use fieldwright_ingest::{IngestConfig, Ingestor};
use fieldwright_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry database settings
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Ingestion pipeline settings
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Registry database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".fieldwright").join("config.toml"))
    }

    /// Load configuration from a file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line and environment overrides.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(db) = &cli.db {
            self.database.path = db.clone();
        }
        if let Some(threshold) = cli.fuzzy_threshold {
            self.ingest.resolver.fuzzy_threshold = threshold;
        }
        if let Some(threshold) = cli.semantic_threshold {
            self.ingest.resolver.semantic_threshold = threshold;
        }
        if cli.semantics {
            self.ingest.resolver.semantics_enabled = true;
        }
    }

    /// Open the registry database.
    pub fn open_store(&self) -> Result<SqliteStore> {
        if let Some(parent) = self.database.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(SqliteStore::new(&self.database.path)?)
    }

    /// Build an ingestor over the registry database.
    pub fn ingestor(&self) -> Result<Ingestor<SqliteStore>> {
        let store = self.open_store()?;
        Ok(Ingestor::new(store, self.ingest.clone())?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            settings: Settings::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("fieldwright").join("registry.db"))
        .unwrap_or_else(|| PathBuf::from("fieldwright.db"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

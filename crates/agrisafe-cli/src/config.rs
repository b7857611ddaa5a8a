//! Environment configuration for the CLI.

use std::path::PathBuf;

use agrisafe_core::SchemaVariant;
use anyhow::{anyhow, Context, Result};
use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Config {
    #[envconfig(from = "AGRISAFE_DATABASE_PATH", default = "agrisafe.db")]
    pub database_path: String,

    #[envconfig(from = "AGRISAFE_SCHEMA_VARIANT", default = "cascading")]
    pub schema_variant: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Config::init_from_env().context("Failed to read configuration from environment")
    }

    /// Database path, preferring the command-line override.
    pub fn database_path(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        cli_override
            .cloned()
            .unwrap_or_else(|| PathBuf::from(&self.database_path))
    }

    /// Schema variant, preferring the command-line override.
    pub fn schema_variant(&self, cli_override: Option<SchemaVariant>) -> Result<SchemaVariant> {
        match cli_override {
            Some(variant) => Ok(variant),
            None => self
                .schema_variant
                .parse()
                .map_err(|e: String| anyhow!(e))
                .context("AGRISAFE_SCHEMA_VARIANT"),
        }
    }
}

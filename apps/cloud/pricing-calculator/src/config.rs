//! Configuration for the pricing calculator

use core_config::{env_or_default, env_parse, ConfigError, Environment, FromEnv};
use domain_pricing::{StaticPriceCatalog, DEFAULT_REGION};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing::info;

use crate::report::OutputFormat;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    /// Price list replacing the embedded catalog
    pub catalog_path: Option<PathBuf>,
    /// Primary region when none is given on the command line
    pub default_region: String,
    pub output_format: OutputFormat,
}

impl FromEnv for Config {
    /// Reads:
    /// - `PRICING_CATALOG_PATH`: optional price list JSON file
    /// - `PRICING_DEFAULT_REGION`: defaults to "US East (Ohio)"
    /// - `PRICING_OUTPUT_FORMAT`: table, markdown or json (default: table)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            environment: Environment::from_env(),
            catalog_path: env_parse::<PathBuf>("PRICING_CATALOG_PATH")?,
            default_region: env_or_default("PRICING_DEFAULT_REGION", DEFAULT_REGION),
            output_format: env_parse::<OutputFormat>("PRICING_OUTPUT_FORMAT")?.unwrap_or_default(),
        })
    }
}

impl Config {
    /// Load the configured price catalog, falling back to the embedded one.
    pub fn load_catalog(&self) -> Result<StaticPriceCatalog> {
        match &self.catalog_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("Failed to read price catalog {}", path.display()))?;
                let catalog = StaticPriceCatalog::from_json(&json)
                    .wrap_err_with(|| format!("Failed to load price catalog {}", path.display()))?;
                info!(path = %path.display(), regions = catalog.len(), "Loaded price catalog");
                Ok(catalog)
            }
            None => Ok(StaticPriceCatalog::embedded()?.clone()),
        }
    }
}

//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::cart::DEFAULT_CART_KEY;

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storage and catalog configuration.
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Where the cart lives and what it sells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the key-value files (default: .storefront).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Key of the cart snapshot.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    /// ISO currency code of the cart (default: LKR).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// JSON catalog with products, offers and cities.
    #[serde(default = "default_catalog")]
    pub catalog: String,
}

fn default_data_dir() -> String {
    ".storefront".to_string()
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_currency() -> String {
    "LKR".to_string()
}

fn default_catalog() -> String {
    "catalog.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cart_key: default_cart_key(),
            currency: default_currency(),
            catalog: default_catalog(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level filter when `RUST_LOG` is unset (default: warn).
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};
use storefront_cache::{Cache, FileStore};
use storefront_commerce::cart::{CachePersistence, CartStore};
use storefront_commerce::money::Currency;

use crate::catalog::Catalog;
use crate::config::CliConfig;
use crate::output::Output;

/// Cart backed by the on-disk key-value store.
pub type FileCart = CartStore<CachePersistence<FileStore>>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let config_names = ["storefront.toml", ".storefront.toml", "storefront.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Cart currency from config.
    pub fn currency(&self) -> Result<Currency> {
        let code = &self.config.store.currency;
        Currency::from_code(code).ok_or_else(|| anyhow!("Unsupported currency: {}", code))
    }

    /// Open the on-disk key-value store.
    pub fn open_store(&self) -> Result<FileStore> {
        let dir = self.resolve_path(&self.config.store.data_dir);
        self.output.debug(&format!("Data directory: {}", dir.display()));
        FileStore::open(dir.clone())
            .with_context(|| format!("Failed to open data directory: {}", dir.display()))
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<FileCart> {
        let store = self.open_store()?;
        tracing::debug!(dir = %store.dir().display(), key = %self.config.store.cart_key, "opening cart");
        let persistence = CachePersistence::with_key(Cache::new(store), &self.config.store.cart_key);
        Ok(CartStore::open(persistence, self.currency()?))
    }

    /// Load the catalog file.
    pub fn catalog(&self) -> Result<Catalog> {
        let path = self.resolve_path(&self.config.store.catalog);
        self.output.debug(&format!("Catalog: {}", path.display()));
        Catalog::load(&path)
    }
}

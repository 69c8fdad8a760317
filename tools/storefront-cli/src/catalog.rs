//! Catalog file: products, offers and delivery cities.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::catalog::{Offer, Product};
use storefront_commerce::checkout::City;

/// Read-only catalog loaded from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub cities: Vec<City>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))
    }

    /// Enabled product by id or code.
    pub fn product(&self, key: &str) -> Option<&Product> {
        self.products
            .iter()
            .filter(|p| p.enabled)
            .find(|p| p.id.as_str() == key || (!p.code.is_empty() && p.code == key))
    }

    /// Offer by id or slug.
    pub fn offer(&self, key: &str) -> Option<&Offer> {
        self.offers
            .iter()
            .find(|o| o.id.as_str() == key || o.slug == key)
    }

    /// City by id or (case-insensitive) name.
    pub fn city(&self, key: &str) -> Option<&City> {
        self.cities
            .iter()
            .find(|c| c.id.as_str() == key || c.name.eq_ignore_ascii_case(key))
    }
}

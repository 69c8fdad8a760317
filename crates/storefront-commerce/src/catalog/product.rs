//! Product types.

use crate::catalog::{VariantGroup, VariantOption};
use crate::ids::{ProductId, VariantOptionId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Short product code shown on invoices.
    #[serde(default)]
    pub code: String,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Image URLs; the first one is the thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// Unit weight in grams (for shipping).
    #[serde(default)]
    pub weight_grams: u32,
    /// Whether the product is listed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Whether a variant must be chosen before purchase.
    #[serde(default)]
    pub has_variants: bool,
    /// Variant options this product is offered in.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

fn default_enabled() -> bool {
    true
}

impl Product {
    /// Create a new product without variants.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            code: String::new(),
            name: name.into(),
            price,
            images: Vec::new(),
            weight_grams: 0,
            enabled: true,
            has_variants: false,
            variants: Vec::new(),
        }
    }

    /// Set the unit weight.
    pub fn with_weight(mut self, weight_grams: u32) -> Self {
        self.weight_grams = weight_grams;
        self
    }

    /// Attach a variant option and mark the product as variant-bearing.
    pub fn with_variant(mut self, option: VariantOption) -> Self {
        self.has_variants = true;
        self.variants.push(ProductVariant { option });
        self
    }

    /// First image URL, or an empty string.
    pub fn thumbnail(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }

    /// Look up one of this product's variant options.
    pub fn variant_option(&self, option_id: &VariantOptionId) -> Option<&VariantOption> {
        self.variants
            .iter()
            .map(|v| &v.option)
            .find(|o| &o.id == option_id)
    }

    /// Group this product's options by variant type.
    ///
    /// Only options in `allowed` are kept; an empty `allowed` list keeps
    /// everything. Types appear in the order their first option appears.
    pub fn variant_groups(&self, allowed: &[VariantOptionId]) -> Vec<VariantGroup> {
        let mut groups: Vec<VariantGroup> = Vec::new();
        for variant in &self.variants {
            let option = &variant.option;
            if !allowed.is_empty() && !allowed.contains(&option.id) {
                continue;
            }
            match groups
                .iter_mut()
                .find(|g| g.variant_type.id == option.variant_type.id)
            {
                Some(group) => group.options.push(option.clone()),
                None => groups.push(VariantGroup {
                    variant_type: option.variant_type.clone(),
                    options: vec![option.clone()],
                }),
            }
        }
        groups
    }
}

/// Link between a product and one of its variant options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// The option this product is offered in.
    pub option: VariantOption,
}

//! Bundle offers: "buy any N of these for P".

use crate::cart::BundleLink;
use crate::catalog::{Product, VariantGroup};
use crate::ids::{BundleId, OfferId, ProductId, VariantOptionId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A bundle offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    /// Unique offer identifier.
    pub id: OfferId,
    /// URL-friendly slug.
    pub slug: String,
    /// Display name, e.g. "Any 4 for Rs. 2000".
    pub name: String,
    /// Marketing description.
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text rule shown to shoppers.
    #[serde(default)]
    pub logic: String,
    /// Number of items the offer price covers.
    pub required_quantity: u32,
    /// Total price for `required_quantity` items.
    pub price: Money,
    /// Eligible products.
    pub products: Vec<OfferProduct>,
}

impl Offer {
    /// Effective price of one item in this offer.
    ///
    /// Zero when the offer has no required quantity.
    pub fn price_per_item(&self) -> Money {
        self.price
            .divide_round(self.required_quantity)
            .unwrap_or_else(|| Money::zero(self.price.currency))
    }

    /// Price of `quantity` items at the offer rate, rounded once.
    ///
    /// A full set of `required_quantity` items costs exactly `price`.
    pub fn price_for(&self, quantity: u32) -> Money {
        self.price
            .prorate(quantity, self.required_quantity)
            .unwrap_or_else(|| Money::zero(self.price.currency))
    }

    /// Find an eligible product.
    pub fn product(&self, product_id: &ProductId) -> Option<&OfferProduct> {
        self.products.iter().find(|op| &op.product.id == product_id)
    }

    /// Mean regular price across eligible products.
    pub fn average_regular_price(&self) -> Option<Money> {
        if self.products.is_empty() {
            return None;
        }
        let total: i64 = self.products.iter().map(|op| op.product.price.minor_units).sum();
        Money::new(total, self.price.currency).divide_round(self.products.len() as u32)
    }

    /// How much cheaper one item is inside the offer than on average outside.
    pub fn savings_per_item(&self) -> Money {
        match self.average_regular_price() {
            Some(avg) => avg
                .try_subtract(&self.price_per_item())
                .unwrap_or_else(|| Money::zero(self.price.currency)),
            None => Money::zero(self.price.currency),
        }
    }

    /// Bundle fields stamped on every cart line of one instance of this offer.
    pub fn bundle_link(&self, bundle_id: BundleId) -> BundleLink {
        BundleLink {
            bundle_id,
            offer_id: self.id.clone(),
            offer_slug: Some(self.slug.clone()),
            offer_name: Some(self.name.clone()),
            offer_price: self.price,
            offer_quantity: self.required_quantity,
        }
    }
}

/// A product enrolled in an offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferProduct {
    pub product: Product,
    /// Variant options the admin enabled for this offer. Empty means all.
    #[serde(default)]
    pub selected_variant_option_ids: Vec<VariantOptionId>,
}

impl OfferProduct {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            selected_variant_option_ids: Vec::new(),
        }
    }

    /// Variant groups a shopper picks from on the offer page.
    pub fn variant_groups(&self) -> Vec<VariantGroup> {
        self.product.variant_groups(&self.selected_variant_option_ids)
    }
}

//! Checkout payload built from the cart.

use crate::cart::{CartPersistence, CartStore};
use crate::checkout::City;
use crate::error::CommerceError;
use crate::ids::{BundleId, CityId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Who the order is for and where it goes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    pub city_id: CityId,
}

impl CustomerDetails {
    /// Check required fields. Email is optional.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::MissingField("name"));
        }
        if self.mobile.trim().is_empty() {
            return Err(CommerceError::MissingField("mobile"));
        }
        if self.address.trim().is_empty() {
            return Err(CommerceError::MissingField("address"));
        }
        if self.city_id.is_empty() {
            return Err(CommerceError::MissingField("city"));
        }
        Ok(())
    }
}

/// One order line as submitted.
///
/// `price` is the effective unit price: the bundle's per-item price for
/// bundle lines. `total` is what the line is charged; for bundle lines it is
/// the line's exact share of the bundle price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemPayload {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub price: Money,
    pub total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<BundleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_quantity: Option<u32>,
}

impl OrderItemPayload {
    pub fn line_total(&self) -> Money {
        self.total
    }

    pub fn is_bundled(&self) -> bool {
        self.bundle_id.is_some()
    }
}

/// Everything the order endpoint needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutRequest {
    pub customer: CustomerDetails,
    pub items: Vec<OrderItemPayload>,
}

impl CheckoutRequest {
    /// Build the payload from the cart.
    ///
    /// Refuses an empty cart, a cart with bundles below their required
    /// quantity and a cart holding bundle lines that cannot be priced. Every
    /// cart line is submitted, so clearing the cart after a successful order
    /// loses nothing.
    pub fn from_cart<P: CartPersistence>(
        customer: CustomerDetails,
        cart: &CartStore<P>,
    ) -> Result<Self, CommerceError> {
        customer.validate()?;
        if cart.is_empty() {
            return Err(CommerceError::CartEmpty);
        }
        let incomplete = cart.incomplete_bundles();
        if !incomplete.is_empty() {
            return Err(CommerceError::IncompleteBundles {
                count: incomplete.len(),
            });
        }

        let priced = cart.priced_items();
        let unpriced = priced.iter().filter(|(_, price)| price.is_none()).count();
        if unpriced > 0 {
            return Err(CommerceError::UnpricedBundleLines { count: unpriced });
        }

        let mut items = Vec::with_capacity(priced.len());
        for (item, price) in priced {
            let Some((price, total)) = price else {
                continue;
            };
            let bundle = item.bundle.as_ref();
            items.push(OrderItemPayload {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                size: item.size.clone().filter(|s| !s.is_empty()),
                color: item.color.clone().filter(|c| !c.is_empty()),
                price,
                total,
                bundle_id: bundle.map(|b| b.bundle_id.clone()),
                bundle_name: bundle.map(|b| {
                    b.offer_name
                        .clone()
                        .unwrap_or_else(|| "Bundle Offer".to_string())
                }),
                bundle_price: bundle.map(|b| b.offer_price),
                bundle_quantity: bundle.map(|b| b.offer_quantity),
            });
        }

        Ok(Self { customer, items })
    }

    /// Σ line totals.
    pub fn subtotal(&self) -> Money {
        let currency = self
            .items
            .first()
            .map(|i| i.price.currency)
            .unwrap_or_default();
        let total: i64 = self.items.iter().map(|i| i.line_total().minor_units).sum();
        Money::new(total, currency)
    }
}

/// Order summary shown beside the checkout form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutSummary {
    /// Number of cart lines.
    pub line_count: usize,
    pub bundle_count: usize,
    pub subtotal: Money,
    /// Zero until a city is chosen.
    pub shipping: Money,
    pub total: Money,
}

impl CheckoutSummary {
    pub fn new<P: CartPersistence>(cart: &CartStore<P>, city: Option<&City>) -> Self {
        let subtotal = cart.total_price();
        let shipping = city
            .map(|c| c.shipping_cost)
            .unwrap_or_else(|| Money::zero(subtotal.currency));
        let total = subtotal.try_add(&shipping).unwrap_or(subtotal);
        Self {
            line_count: cart.total_items(),
            bundle_count: cart.bundles().len(),
            subtotal,
            shipping,
            total,
        }
    }
}

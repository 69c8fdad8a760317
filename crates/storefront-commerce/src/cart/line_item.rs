//! Cart line items.

use crate::catalog::{Product, VariantSelection};
use crate::ids::{BundleId, OfferId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One product selection in the cart.
///
/// A line is either regular (`bundle` is `None`) or belongs to exactly one
/// bundle instance, in which case every bundle field is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    /// Catalog unit price.
    pub product_price: Money,
    /// Legacy unit price; wins over `product_price` when set and non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    /// Free-form variant descriptor. `Some("")` is a distinct value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Structured variant choices, in the order they were picked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantSelection>,
    /// Unit weight.
    #[serde(default)]
    pub weight_grams: u32,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleLink>,
}

impl CartLineItem {
    /// Create a regular line.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        product_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_code: None,
            product_name: product_name.into(),
            product_image: String::new(),
            product_price,
            price: None,
            size: None,
            color: None,
            variants: Vec::new(),
            weight_grams: 0,
            quantity,
            bundle: None,
        }
    }

    /// Create a regular line for a catalog product.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        let mut item = Self::new(product.id.clone(), product.name.clone(), product.price, quantity);
        if !product.code.is_empty() {
            item.product_code = Some(product.code.clone());
        }
        item.product_image = product.thumbnail().to_string();
        item.weight_grams = product.weight_grams;
        item
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_weight(mut self, weight_grams: u32) -> Self {
        self.weight_grams = weight_grams;
        self
    }

    pub fn with_variants(mut self, variants: Vec<VariantSelection>) -> Self {
        self.variants = variants;
        self
    }

    /// Put this line into a bundle.
    pub fn in_bundle(mut self, link: BundleLink) -> Self {
        self.bundle = Some(link);
        self
    }

    /// Bundle this line belongs to, if any.
    pub fn bundle_id(&self) -> Option<&BundleId> {
        self.bundle.as_ref().map(|b| &b.bundle_id)
    }

    pub fn is_regular(&self) -> bool {
        self.bundle.is_none()
    }

    /// Unit price used for regular lines.
    pub fn unit_price(&self) -> Money {
        self.price
            .filter(|p| !p.is_zero())
            .unwrap_or(self.product_price)
    }

    /// Human-readable variant label; falls back to `size`.
    pub fn variant_label(&self) -> Option<String> {
        if !self.variants.is_empty() {
            return Some(VariantSelection::join_labels(&self.variants));
        }
        self.size.clone().filter(|s| !s.is_empty())
    }

    /// Total weight of this line.
    pub fn line_weight_grams(&self) -> u64 {
        u64::from(self.weight_grams) * u64::from(self.quantity)
    }

    /// Whether this line is keyed by `product_id`, `size` and `color`.
    ///
    /// Structured `variants` are not part of the key; their label is carried
    /// in `size`.
    pub fn has_key(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        &self.product_id == product_id && self.size.as_deref() == size && self.color.as_deref() == color
    }

    /// Whether `other` describes the same line: same key and bundle.
    pub fn same_line(&self, other: &CartLineItem) -> bool {
        self.has_key(&other.product_id, other.size.as_deref(), other.color.as_deref())
            && self.bundle_id() == other.bundle_id()
    }
}

/// Bundle membership of a cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleLink {
    /// Bundle instance this line belongs to.
    pub bundle_id: BundleId,
    pub offer_id: OfferId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_name: Option<String>,
    /// Total price for `offer_quantity` items.
    pub offer_price: Money,
    /// Items required to complete the bundle.
    pub offer_quantity: u32,
}

impl BundleLink {
    /// Whether this link carries usable offer terms.
    ///
    /// A link with an empty offer id, a zero price or a zero quantity cannot
    /// be priced and is left out of bundle accounting.
    pub fn is_priceable(&self) -> bool {
        !self.offer_id.is_empty() && !self.offer_price.is_zero() && self.offer_quantity > 0
    }

    /// `offer_price / offer_quantity`, if priceable.
    pub fn price_per_item(&self) -> Option<Money> {
        if !self.is_priceable() {
            return None;
        }
        self.offer_price.divide_round(self.offer_quantity)
    }

    /// Price of `quantity` items at the offer rate, rounded once, if priceable.
    pub fn price_for(&self, quantity: u32) -> Option<Money> {
        if !self.is_priceable() {
            return None;
        }
        self.offer_price.prorate(quantity, self.offer_quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn lkr(major: i64) -> Money {
        Money::from_major(major, Currency::LKR)
    }

    fn link(bundle: &str) -> BundleLink {
        BundleLink {
            bundle_id: BundleId::new(bundle),
            offer_id: OfferId::new("offer-1"),
            offer_slug: None,
            offer_name: None,
            offer_price: lkr(2000),
            offer_quantity: 4,
        }
    }

    #[test]
    fn test_unit_price_prefers_legacy_price() {
        let mut item = CartLineItem::new("a", "Tee A", lkr(800), 1);
        assert_eq!(item.unit_price(), lkr(800));

        item.price = Some(lkr(750));
        assert_eq!(item.unit_price(), lkr(750));

        item.price = Some(Money::zero(Currency::LKR));
        assert_eq!(item.unit_price(), lkr(800));
    }

    #[test]
    fn test_same_line_distinguishes_empty_size() {
        let plain = CartLineItem::new("a", "Tee A", lkr(800), 1);
        let empty_size = plain.clone().with_size("");
        assert!(!plain.same_line(&empty_size));
        assert!(empty_size.same_line(&empty_size.clone()));
    }

    #[test]
    fn test_same_line_includes_bundle() {
        let regular = CartLineItem::new("a", "Tee A", lkr(800), 1);
        let bundled = regular.clone().in_bundle(link("b1"));
        let other_bundle = regular.clone().in_bundle(link("b2"));
        assert!(!regular.same_line(&bundled));
        assert!(!bundled.same_line(&other_bundle));
    }

    #[test]
    fn test_link_priceability() {
        assert_eq!(link("b1").price_per_item(), Some(lkr(500)));

        let mut zero_qty = link("b1");
        zero_qty.offer_quantity = 0;
        assert!(zero_qty.price_per_item().is_none());
        assert!(zero_qty.price_for(4).is_none());
        assert_eq!(link("b1").price_for(4), Some(lkr(2000)));

        let mut free = link("b1");
        free.offer_price = Money::zero(Currency::LKR);
        assert!(!free.is_priceable());
    }

    #[test]
    fn test_snapshot_shape_omits_absent_fields() {
        let item = CartLineItem::new("a", "Tee A", lkr(800), 2);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("bundle").is_none());
        assert!(json.get("size").is_none());

        let restored: CartLineItem = serde_json::from_value(json).unwrap();
        assert_eq!(restored, item);
    }
}

//! Bundle groups derived from cart lines.

use crate::cart::CartLineItem;
use crate::ids::{BundleId, OfferId};
use crate::money::Money;
use serde::Serialize;

/// All cart lines sharing one bundle id, with the offer's pricing applied.
///
/// Derived on every read; never stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BundleGroup {
    pub bundle_id: BundleId,
    pub offer_id: OfferId,
    /// Empty when the lines carry no slug.
    pub offer_slug: String,
    /// Empty when the lines carry no name.
    pub offer_name: String,
    /// Items needed for the offer price, taken from the first member line.
    pub required_quantity: u32,
    /// Total price for `required_quantity` items.
    pub offer_price: Money,
    /// `offer_price / required_quantity`, rounded. For display; totals are
    /// computed from `offer_price` directly.
    pub price_per_item: Money,
    /// Sum of member quantities.
    pub current_quantity: u32,
    /// `offer_price × current_quantity / required_quantity`, rounded once.
    pub calculated_total: Money,
    pub is_complete: bool,
    /// Member lines in cart order.
    pub items: Vec<CartLineItem>,
}

impl BundleGroup {
    /// Items still needed to complete the bundle.
    pub fn remaining_quantity(&self) -> u32 {
        self.required_quantity.saturating_sub(self.current_quantity)
    }

    /// What `quantity` items of this bundle cost, rounded once.
    pub fn price_for(&self, quantity: u32) -> Money {
        self.offer_price
            .prorate(quantity, self.required_quantity)
            .unwrap_or_else(|| Money::zero(self.offer_price.currency))
    }

    /// Share of `calculated_total` charged to each member line, in `items`
    /// order.
    ///
    /// Each line pays the difference between the running price before and
    /// after it, so the shares add up to `calculated_total` exactly and any
    /// rounding remainder lands on the line that crosses it.
    pub fn line_totals(&self) -> Vec<Money> {
        let mut running = 0_u32;
        let mut charged = Money::zero(self.offer_price.currency);
        self.items
            .iter()
            .map(|item| {
                running = running.saturating_add(item.quantity);
                let through = self.price_for(running);
                let share = Money::new(
                    through.minor_units.saturating_sub(charged.minor_units),
                    through.currency,
                );
                charged = through;
                share
            })
            .collect()
    }

    /// Offer page path that reopens this bundle for editing.
    pub fn edit_path(&self) -> String {
        format!("/offers/{}?bundleId={}", self.offer_slug, self.bundle_id)
    }
}

/// Group bundle lines by bundle id, in order of first appearance.
///
/// Lines whose bundle link cannot be priced are skipped with a warning; they
/// stay in the cart but contribute nothing to bundle totals.
pub fn group_bundles(items: &[CartLineItem]) -> Vec<BundleGroup> {
    let mut groups: Vec<BundleGroup> = Vec::new();

    for item in items {
        let Some(link) = &item.bundle else {
            continue;
        };
        let Some(price_per_item) = link.price_per_item() else {
            tracing::warn!(
                bundle_id = %link.bundle_id,
                product_id = %item.product_id,
                offer_quantity = link.offer_quantity,
                "bundle line has incomplete offer terms; excluded from bundle totals"
            );
            continue;
        };

        let group = match groups.iter().position(|g| g.bundle_id == link.bundle_id) {
            Some(index) => &mut groups[index],
            None => {
                groups.push(BundleGroup {
                    bundle_id: link.bundle_id.clone(),
                    offer_id: link.offer_id.clone(),
                    offer_slug: link.offer_slug.clone().unwrap_or_default(),
                    offer_name: link.offer_name.clone().unwrap_or_default(),
                    required_quantity: link.offer_quantity,
                    offer_price: link.offer_price,
                    price_per_item,
                    current_quantity: 0,
                    calculated_total: Money::zero(link.offer_price.currency),
                    is_complete: false,
                    items: Vec::new(),
                });
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };

        if link.offer_quantity != group.required_quantity || link.offer_price != group.offer_price {
            tracing::warn!(
                bundle_id = %link.bundle_id,
                product_id = %item.product_id,
                "bundle line disagrees with its group's offer terms; using the first line's"
            );
        }

        group.current_quantity = group.current_quantity.saturating_add(item.quantity);
        group.items.push(item.clone());
    }

    for group in &mut groups {
        group.calculated_total = group.price_for(group.current_quantity);
        group.is_complete = group.current_quantity >= group.required_quantity;
    }

    groups
}

//! The cart store: authoritative line list plus derived bundle views.

use std::collections::HashMap;

use crate::cart::bundle::group_bundles;
use crate::cart::{
    BundleGroup, CartLineItem, CartPersistence, CartPricing, LinePricing, NoPersistence,
};
use crate::ids::{BundleId, ProductId};
use crate::money::{Currency, Money};

/// What [`CartStore::add_item`] did with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Added as a new line.
    Appended,
    /// Merged into an existing regular line, which now has `quantity`.
    Merged { quantity: u32 },
    /// Dropped: the same bundle line already exists.
    Ignored,
}

/// Shopping cart holding regular and bundle lines.
///
/// Mutations never fail. Each one writes a snapshot through the injected
/// [`CartPersistence`]; a failed write is logged and otherwise ignored.
/// Derived views (`bundles`, `total_price`, ...) are recomputed on every
/// call.
#[derive(Debug)]
pub struct CartStore<P = NoPersistence> {
    items: Vec<CartLineItem>,
    currency: Currency,
    persistence: P,
}

impl CartStore<NoPersistence> {
    /// A cart that is not persisted anywhere.
    pub fn in_memory(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
            persistence: NoPersistence,
        }
    }
}

impl<P: CartPersistence> CartStore<P> {
    /// Open a cart, restoring the last snapshot from `persistence`.
    ///
    /// An unreadable snapshot is logged and the cart starts empty.
    pub fn open(persistence: P, currency: Currency) -> Self {
        let items = match persistence.load() {
            Ok(Some(items)) => {
                tracing::debug!(lines = items.len(), "restored cart snapshot");
                items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to restore cart; starting empty");
                Vec::new()
            }
        };
        Self {
            items,
            currency,
            persistence,
        }
    }

    /// All lines, in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Add a line, merging or dropping it when the same line already exists.
    ///
    /// Two lines are the same when product, size, color, variant choices
    /// and bundle id all match. A regular duplicate adds its quantity to the
    /// existing line; a bundle duplicate is dropped (bundles are edited by
    /// removing them and adding the new lines). Prices, weights and
    /// quantities are taken as given.
    pub fn add_item(&mut self, item: CartLineItem) -> AddOutcome {
        let outcome = match self.items.iter_mut().find(|i| i.same_line(&item)) {
            Some(existing) if item.is_regular() => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
                AddOutcome::Merged {
                    quantity: existing.quantity,
                }
            }
            Some(_) => AddOutcome::Ignored,
            None => {
                self.items.push(item.clone());
                AddOutcome::Appended
            }
        };

        tracing::debug!(
            product_id = %item.product_id,
            bundle_id = item.bundle_id().map(BundleId::as_str),
            quantity = item.quantity,
            ?outcome,
            "add item"
        );

        if outcome != AddOutcome::Ignored {
            self.persist();
        }
        outcome
    }

    /// Remove lines for a product.
    ///
    /// - With `bundle_id`: every line of that product in that bundle,
    ///   whatever its size or color.
    /// - Else with `size` or `color` (an empty string counts): regular lines
    ///   matching product, size and color exactly.
    /// - Else: every regular line of the product.
    ///
    /// Returns how many lines were removed.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        bundle_id: Option<&BundleId>,
        size: Option<&str>,
        color: Option<&str>,
    ) -> usize {
        let bundle_id = bundle_id.filter(|b| !b.is_empty());
        let before = self.items.len();

        self.items.retain(|item| {
            if &item.product_id != product_id {
                return true;
            }
            if let Some(bundle_id) = bundle_id {
                return item.bundle_id() != Some(bundle_id);
            }
            if !item.is_regular() {
                return true;
            }
            if size.is_some() || color.is_some() {
                return !item.has_key(product_id, size, color);
            }
            false
        });

        let removed = before - self.items.len();
        tracing::debug!(
            product_id = %product_id,
            bundle_id = bundle_id.map(BundleId::as_str),
            size,
            color,
            removed,
            "remove item"
        );
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Remove every line of a bundle.
    ///
    /// First step of editing a bundle: the caller then re-adds the edited
    /// lines under the same `bundle_id`.
    pub fn remove_bundle_items(&mut self, bundle_id: &BundleId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.bundle_id() != Some(bundle_id));
        let removed = before - self.items.len();

        tracing::debug!(bundle_id = %bundle_id, removed, "remove bundle");
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Set the quantity of a regular line; zero removes it.
    ///
    /// Bundle lines are not touched. Returns whether a line matched.
    pub fn update_item_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
        quantity: u32,
    ) -> bool {
        let is_target =
            |item: &CartLineItem| item.is_regular() && item.has_key(product_id, size, color);

        let matched = if quantity == 0 {
            let before = self.items.len();
            self.items.retain(|item| !is_target(item));
            self.items.len() < before
        } else {
            match self.items.iter_mut().find(|item| is_target(&**item)) {
                Some(item) => {
                    item.quantity = quantity;
                    true
                }
                None => false,
            }
        };

        tracing::debug!(product_id = %product_id, quantity, matched, "update quantity");
        if matched {
            self.persist();
        }
        matched
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        tracing::debug!("clear cart");
        self.persist();
    }

    /// Bundle groups, in order of first appearance.
    pub fn bundles(&self) -> Vec<BundleGroup> {
        group_bundles(&self.items)
    }

    /// Lines that belong to no bundle.
    pub fn regular_items(&self) -> Vec<&CartLineItem> {
        self.items.iter().filter(|i| i.is_regular()).collect()
    }

    /// Number of lines in the cart.
    ///
    /// This counts lines, not units: two of the same tee is one.
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Bundle totals plus regular `unit_price * quantity`.
    pub fn total_price(&self) -> Money {
        let bundles: i64 = self
            .bundles()
            .iter()
            .map(|b| b.calculated_total.minor_units)
            .sum();
        let regular: i64 = self
            .regular_items()
            .iter()
            .map(|i| self.checked_line_amount(i.unit_price().multiply(i.quantity), i))
            .sum();
        Money::new(bundles.saturating_add(regular), self.currency)
    }

    /// Sum of `weight * quantity` over every line.
    pub fn total_weight_grams(&self) -> u64 {
        self.items.iter().map(CartLineItem::line_weight_grams).sum()
    }

    /// Bundles still below their required quantity. Checkout is blocked
    /// while this is non-empty.
    pub fn incomplete_bundles(&self) -> Vec<BundleGroup> {
        self.bundles().into_iter().filter(|b| !b.is_complete).collect()
    }

    /// Per-line prices as checkout sees them.
    ///
    /// Regular lines are charged their unit price. Bundle lines share their
    /// bundle's total so the shares add up to it exactly; `unit_price` is the
    /// bundle's rounded per-item price. Bundle lines whose offer terms cannot
    /// be priced are left out, as they are from [`CartStore::bundles`].
    pub fn pricing(&self) -> CartPricing {
        let mut lines = Vec::with_capacity(self.items.len());
        let mut bundle_subtotal = 0_i64;
        let mut regular_subtotal = 0_i64;

        for (item, price) in self.priced_items() {
            let Some((unit_price, total)) = price else {
                continue;
            };
            let amount = self.checked_line_amount(total, item);
            if item.is_regular() {
                regular_subtotal = regular_subtotal.saturating_add(amount);
            } else {
                bundle_subtotal = bundle_subtotal.saturating_add(amount);
            }
            lines.push(LinePricing {
                product_id: item.product_id.clone(),
                bundle_id: item.bundle_id().cloned(),
                unit_price,
                quantity: item.quantity,
                total,
            });
        }

        CartPricing {
            bundle_subtotal: Money::new(bundle_subtotal, self.currency),
            regular_subtotal: Money::new(regular_subtotal, self.currency),
            subtotal: Money::new(
                bundle_subtotal.saturating_add(regular_subtotal),
                self.currency,
            ),
            lines,
        }
    }

    /// Every line in cart order with its `(unit_price, line_total)`, or
    /// `None` for a bundle line that cannot be priced.
    pub(crate) fn priced_items(&self) -> Vec<(&CartLineItem, Option<(Money, Money)>)> {
        let mut shares: HashMap<BundleId, (Money, std::vec::IntoIter<Money>)> = self
            .bundles()
            .into_iter()
            .map(|group| {
                let totals = group.line_totals();
                (group.bundle_id, (group.price_per_item, totals.into_iter()))
            })
            .collect();

        self.items
            .iter()
            .map(|item| {
                let price = match &item.bundle {
                    Some(link) if link.is_priceable() => shares
                        .get_mut(&link.bundle_id)
                        .and_then(|(unit, totals)| totals.next().map(|total| (*unit, total))),
                    Some(_) => None,
                    None => {
                        let unit = item.unit_price();
                        Some((unit, unit.multiply(item.quantity)))
                    }
                };
                (item, price)
            })
            .collect()
    }

    fn checked_line_amount(&self, amount: Money, item: &CartLineItem) -> i64 {
        if amount.currency != self.currency {
            tracing::warn!(
                product_id = %item.product_id,
                line_currency = %amount.currency,
                cart_currency = %self.currency,
                "line priced in a different currency than the cart"
            );
        }
        amount.minor_units
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.items) {
            tracing::warn!(error = %e, lines = self.items.len(), "failed to persist cart");
        }
    }
}

//! Offer page selection: turns a shopper's picks into bundle lines.

use crate::cart::{BundleGroup, CartLineItem, CartPersistence, CartStore};
use crate::catalog::{Offer, OfferProduct, VariantSelection};
use crate::error::CommerceError;
use crate::ids::{BundleId, ProductId, VariantOptionId};
use crate::money::Money;

/// Quantities and variant choices for one offer, before they reach the cart.
///
/// Submitting adds one cart line per chosen product (not per unit), all
/// sharing one bundle id. When editing, the existing bundle id is reused so
/// links to the bundle keep working.
#[derive(Debug, Clone)]
pub struct BundleBuilder<'a> {
    offer: &'a Offer,
    quantities: Vec<(ProductId, u32)>,
    choices: Vec<(ProductId, Vec<VariantSelection>)>,
    editing: Option<BundleId>,
}

impl<'a> BundleBuilder<'a> {
    /// Start an empty selection for a new bundle.
    pub fn new(offer: &'a Offer) -> Self {
        Self {
            offer,
            quantities: Vec::new(),
            choices: Vec::new(),
            editing: None,
        }
    }

    /// Start from an existing bundle in the cart.
    ///
    /// Quantities and variant choices are taken from the bundle's lines.
    /// Lines for products no longer in the offer, and choices no longer
    /// enabled for it, are dropped.
    pub fn edit(offer: &'a Offer, bundle: &BundleGroup) -> Self {
        let mut builder = Self::new(offer);
        builder.editing = Some(bundle.bundle_id.clone());

        for item in &bundle.items {
            let Some(offer_product) = offer.product(&item.product_id) else {
                tracing::warn!(
                    bundle_id = %bundle.bundle_id,
                    product_id = %item.product_id,
                    "product left the offer; dropping it from the edit"
                );
                continue;
            };

            let current = builder.quantity(&item.product_id);
            builder.put_quantity(&item.product_id, current.saturating_add(item.quantity));

            let groups = offer_product.variant_groups();
            for selection in &item.variants {
                if groups.iter().any(|g| g.contains(&selection.option_id)) {
                    builder.put_choice(&item.product_id, selection.clone());
                }
            }
        }
        builder
    }

    pub fn offer(&self) -> &Offer {
        self.offer
    }

    /// Bundle being edited, if any.
    pub fn editing(&self) -> Option<&BundleId> {
        self.editing.as_ref()
    }

    /// Choose a variant option for a product, replacing any earlier choice
    /// of the same variant type.
    pub fn select_variant(
        &mut self,
        product_id: &ProductId,
        option_id: &VariantOptionId,
    ) -> Result<(), CommerceError> {
        let offer_product = self.offer_product(product_id)?;
        let option = offer_product
            .variant_groups()
            .into_iter()
            .flat_map(|g| g.options)
            .find(|o| &o.id == option_id)
            .ok_or_else(|| CommerceError::VariantOptionNotAllowed {
                product_name: offer_product.product.name.clone(),
                option_id: option_id.to_string(),
            })?;

        self.put_choice(product_id, VariantSelection::of(&option));
        Ok(())
    }

    /// Variant choices made for a product, in the order they were made.
    pub fn choices(&self, product_id: &ProductId) -> &[VariantSelection] {
        self.choices
            .iter()
            .find(|(id, _)| id == product_id)
            .map(|(_, choices)| choices.as_slice())
            .unwrap_or(&[])
    }

    /// Whether every variant dimension of the product has been chosen.
    ///
    /// Products without variants are always complete.
    pub fn is_variant_selection_complete(&self, product_id: &ProductId) -> bool {
        match self.offer.product(product_id) {
            Some(offer_product) => self.variants_complete(offer_product),
            None => true,
        }
    }

    /// Set how many of a product go into the bundle. Zero removes it.
    ///
    /// A variant-bearing product cannot be raised above zero until all of
    /// its variant dimensions are chosen.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> Result<(), CommerceError> {
        let offer_product = self.offer_product(product_id)?;
        if quantity > 0 && !self.variants_complete(offer_product) {
            return Err(CommerceError::VariantSelectionIncomplete {
                product_name: offer_product.product.name.clone(),
            });
        }
        self.put_quantity(product_id, quantity);
        Ok(())
    }

    /// Add one of a product. Returns the new quantity.
    pub fn increment(&mut self, product_id: &ProductId) -> Result<u32, CommerceError> {
        let next = self.quantity(product_id).saturating_add(1);
        self.set_quantity(product_id, next)?;
        Ok(next)
    }

    /// Take one of a product away. Returns the new quantity.
    pub fn decrement(&mut self, product_id: &ProductId) -> Result<u32, CommerceError> {
        let current = self.quantity(product_id);
        if current == 0 {
            return Ok(0);
        }
        self.set_quantity(product_id, current - 1)?;
        Ok(current - 1)
    }

    /// Quantity chosen for a product.
    pub fn quantity(&self, product_id: &ProductId) -> u32 {
        self.quantities
            .iter()
            .find(|(id, _)| id == product_id)
            .map(|(_, q)| *q)
            .unwrap_or(0)
    }

    /// Units chosen across all products.
    pub fn total_quantity(&self) -> u32 {
        self.quantities.iter().map(|(_, q)| *q).sum()
    }

    /// What the current selection costs at the offer rate.
    pub fn calculated_total(&self) -> Money {
        self.offer.price_for(self.total_quantity())
    }

    /// Savings of the current selection against average regular prices.
    pub fn total_savings(&self) -> Money {
        self.offer.savings_per_item().multiply(self.total_quantity())
    }

    /// Check the selection can be submitted.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let selected = self.total_quantity();
        if selected < self.offer.required_quantity {
            return Err(CommerceError::BundleBelowMinimum {
                required: self.offer.required_quantity,
                selected,
            });
        }
        for (product_id, _) in self.quantities.iter().filter(|(_, q)| *q > 0) {
            let offer_product = self.offer_product(product_id)?;
            if !self.variants_complete(offer_product) {
                return Err(CommerceError::VariantSelectionIncomplete {
                    product_name: offer_product.product.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Cart lines for this selection under `bundle_id`.
    ///
    /// `size` carries the joined variant label ("" for products without
    /// variants); the structured choices go in `variants`.
    pub fn build_items(&self, bundle_id: &BundleId) -> Result<Vec<CartLineItem>, CommerceError> {
        self.validate()?;
        let mut items = Vec::with_capacity(self.quantities.len());
        for (product_id, quantity) in &self.quantities {
            let offer_product = self.offer_product(product_id)?;
            let variants = self.choices(product_id).to_vec();
            let label = VariantSelection::join_labels(&variants);
            let item = CartLineItem::from_product(&offer_product.product, *quantity)
                .with_size(label)
                .with_variants(variants)
                .in_bundle(self.offer.bundle_link(bundle_id.clone()));
            items.push(item);
        }
        Ok(items)
    }

    /// Put the selection into the cart.
    ///
    /// A new bundle gets `BundleId::for_offer(offer, now_ms)`. An edited
    /// bundle keeps its id and has its old lines removed first. Nothing is
    /// changed when validation fails.
    pub fn submit<P: CartPersistence>(
        self,
        cart: &mut CartStore<P>,
        now_ms: i64,
    ) -> Result<BundleId, CommerceError> {
        let bundle_id = self
            .editing
            .clone()
            .unwrap_or_else(|| BundleId::for_offer(&self.offer.id, now_ms));
        let items = self.build_items(&bundle_id)?;

        if let Some(existing) = &self.editing {
            cart.remove_bundle_items(existing);
        }
        for item in items {
            cart.add_item(item);
        }

        tracing::info!(
            offer_id = %self.offer.id,
            bundle_id = %bundle_id,
            quantity = self.total_quantity(),
            edited = self.editing.is_some(),
            "bundle added to cart"
        );
        Ok(bundle_id)
    }

    fn offer_product(&self, product_id: &ProductId) -> Result<&'a OfferProduct, CommerceError> {
        self.offer
            .product(product_id)
            .ok_or_else(|| CommerceError::ProductNotInOffer {
                offer_id: self.offer.id.to_string(),
                product_id: product_id.to_string(),
            })
    }

    fn variants_complete(&self, offer_product: &OfferProduct) -> bool {
        if !offer_product.product.has_variants {
            return true;
        }
        let chosen = self.choices(&offer_product.product.id);
        offer_product
            .variant_groups()
            .iter()
            .all(|g| chosen.iter().any(|c| c.type_id == g.variant_type.id))
    }

    fn put_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        let position = self.quantities.iter().position(|(id, _)| id == product_id);
        match (position, quantity) {
            (Some(index), 0) => {
                self.quantities.remove(index);
            }
            (Some(index), q) => self.quantities[index].1 = q,
            (None, 0) => {}
            (None, q) => self.quantities.push((product_id.clone(), q)),
        }
    }

    fn put_choice(&mut self, product_id: &ProductId, selection: VariantSelection) {
        let choices = match self.choices.iter().position(|(id, _)| id == product_id) {
            Some(index) => &mut self.choices[index].1,
            None => {
                self.choices.push((product_id.clone(), Vec::new()));
                let last = self.choices.len() - 1;
                &mut self.choices[last].1
            }
        };
        match choices.iter_mut().find(|c| c.type_id == selection.type_id) {
            Some(existing) => *existing = selection,
            None => choices.push(selection),
        }
    }
}

/// Quick-start a bundle: the first `required_quantity` offer products, one
/// of each, under a fresh bundle id. Variant choices are left for the
/// shopper to make when editing the bundle.
pub fn add_starter_bundle<P: CartPersistence>(
    offer: &Offer,
    cart: &mut CartStore<P>,
    now_ms: i64,
) -> BundleId {
    let bundle_id = BundleId::for_offer(&offer.id, now_ms);
    for offer_product in offer.products.iter().take(offer.required_quantity as usize) {
        let item = CartLineItem::from_product(&offer_product.product, 1)
            .in_bundle(offer.bundle_link(bundle_id.clone()));
        cart.add_item(item);
    }
    tracing::info!(offer_id = %offer.id, bundle_id = %bundle_id, "starter bundle added");
    bundle_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, VariantOption, VariantType};
    use crate::ids::OfferId;
    use crate::money::Currency;

    fn lkr(major: i64) -> Money {
        Money::from_major(major, Currency::LKR)
    }

    fn offer() -> Offer {
        let size = VariantType::new("vt-size", "Size");
        let color = VariantType::new("vt-color", "Color");
        let shirt = Product::new("shirt", "Linen Shirt", lkr(900))
            .with_variant(VariantOption::new("opt-s", "S", size.clone()))
            .with_variant(VariantOption::new("opt-l", "L", size))
            .with_variant(VariantOption::new("opt-red", "Red", color.clone()))
            .with_variant(VariantOption::new("opt-blue", "Blue", color));
        let mut shirt_product = OfferProduct::new(shirt);
        // admin disabled Blue for this offer
        shirt_product.selected_variant_option_ids = vec![
            VariantOptionId::new("opt-s"),
            VariantOptionId::new("opt-l"),
            VariantOptionId::new("opt-red"),
        ];

        Offer {
            id: OfferId::new("offer-1"),
            slug: "any-4".to_string(),
            name: "Any 4 for 2000".to_string(),
            description: None,
            logic: String::new(),
            required_quantity: 4,
            price: lkr(2000),
            products: vec![
                OfferProduct::new(Product::new("a", "Tee A", lkr(800))),
                OfferProduct::new(Product::new("b", "Tee B", lkr(850))),
                shirt_product,
            ],
        }
    }

    #[test]
    fn test_variant_gate_on_quantity() {
        let offer = offer();
        let mut builder = BundleBuilder::new(&offer);
        let shirt = ProductId::new("shirt");

        let err = builder.set_quantity(&shirt, 1).unwrap_err();
        assert!(matches!(err, CommerceError::VariantSelectionIncomplete { .. }));

        builder.select_variant(&shirt, &VariantOptionId::new("opt-l")).unwrap();
        assert!(!builder.is_variant_selection_complete(&shirt));
        builder.select_variant(&shirt, &VariantOptionId::new("opt-red")).unwrap();
        assert!(builder.is_variant_selection_complete(&shirt));
        assert_eq!(builder.increment(&shirt).unwrap(), 1);
    }

    #[test]
    fn test_disabled_option_is_rejected() {
        let offer = offer();
        let mut builder = BundleBuilder::new(&offer);
        let err = builder
            .select_variant(&ProductId::new("shirt"), &VariantOptionId::new("opt-blue"))
            .unwrap_err();
        assert!(matches!(err, CommerceError::VariantOptionNotAllowed { .. }));
    }

    #[test]
    fn test_unknown_product_is_rejected() {
        let offer = offer();
        let mut builder = BundleBuilder::new(&offer);
        let err = builder.set_quantity(&ProductId::new("zzz"), 1).unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotInOffer { .. }));
    }

    #[test]
    fn test_reselecting_a_type_replaces_in_place() {
        let offer = offer();
        let mut builder = BundleBuilder::new(&offer);
        let shirt = ProductId::new("shirt");
        builder.select_variant(&shirt, &VariantOptionId::new("opt-s")).unwrap();
        builder.select_variant(&shirt, &VariantOptionId::new("opt-red")).unwrap();
        builder.select_variant(&shirt, &VariantOptionId::new("opt-l")).unwrap();

        let labels: Vec<String> = builder.choices(&shirt).iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Size: L", "Color: Red"]);
    }

    #[test]
    fn test_minimum_quantity_gate() {
        let offer = offer();
        let mut builder = BundleBuilder::new(&offer);
        builder.set_quantity(&ProductId::new("a"), 3).unwrap();

        let mut cart = CartStore::in_memory(Currency::LKR);
        let err = builder.submit(&mut cart, 1).unwrap_err();
        assert!(matches!(
            err,
            CommerceError::BundleBelowMinimum {
                required: 4,
                selected: 3
            }
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_submit_builds_one_line_per_product() {
        let offer = offer();
        let shirt = ProductId::new("shirt");
        let mut builder = BundleBuilder::new(&offer);
        builder.set_quantity(&ProductId::new("a"), 2).unwrap();
        builder.select_variant(&shirt, &VariantOptionId::new("opt-l")).unwrap();
        builder.select_variant(&shirt, &VariantOptionId::new("opt-red")).unwrap();
        builder.set_quantity(&shirt, 3).unwrap();
        assert_eq!(builder.calculated_total(), lkr(2500));

        let mut cart = CartStore::in_memory(Currency::LKR);
        let bundle_id = builder.submit(&mut cart, 1_700_000_000_000).unwrap();
        assert_eq!(bundle_id.as_str(), "offer-1-1700000000000");

        let items = cart.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].size.as_deref(), Some(""));
        assert_eq!(items[1].size.as_deref(), Some("Size: L, Color: Red"));
        assert_eq!(items[1].variants.len(), 2);

        let bundles = cart.bundles();
        assert_eq!(bundles[0].current_quantity, 5);
        assert_eq!(bundles[0].calculated_total, lkr(2500));
    }

    #[test]
    fn test_edit_prepopulates_from_bundle() {
        let offer = offer();
        let shirt = ProductId::new("shirt");
        let mut builder = BundleBuilder::new(&offer);
        builder.select_variant(&shirt, &VariantOptionId::new("opt-s")).unwrap();
        builder.select_variant(&shirt, &VariantOptionId::new("opt-red")).unwrap();
        builder.set_quantity(&shirt, 4).unwrap();

        let mut cart = CartStore::in_memory(Currency::LKR);
        let bundle_id = builder.submit(&mut cart, 42).unwrap();

        let bundle = cart.bundles().remove(0);
        let edit = BundleBuilder::edit(&offer, &bundle);
        assert_eq!(edit.editing(), Some(&bundle_id));
        assert_eq!(edit.quantity(&shirt), 4);
        assert!(edit.is_variant_selection_complete(&shirt));
        assert_eq!(edit.choices(&shirt)[0].option_id.as_str(), "opt-s");
    }

    #[test]
    fn test_starter_bundle_takes_first_products() {
        let mut offer = offer();
        offer.required_quantity = 2;
        let mut cart = CartStore::in_memory(Currency::LKR);

        let bundle_id = add_starter_bundle(&offer, &mut cart, 7);
        assert_eq!(bundle_id.as_str(), "offer-1-7");

        let bundles = cart.bundles();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].current_quantity, 2);
        assert!(bundles[0].is_complete);
        assert_eq!(cart.items()[1].product_id.as_str(), "b");
    }
}

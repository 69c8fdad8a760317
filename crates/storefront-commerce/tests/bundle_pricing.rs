//! End-to-end bundle pricing through the public API.

use storefront_cache::{Cache, FileStore, MemoryStore};
use storefront_commerce::prelude::*;

fn lkr(major: i64) -> Money {
    Money::from_major(major, Currency::LKR)
}

fn offer() -> Offer {
    Offer {
        id: OfferId::new("offer-1"),
        slug: "buy-4".to_string(),
        name: "Buy 4 for 2000".to_string(),
        description: Some("Mix and match any four tees".to_string()),
        logic: "Any 4 items".to_string(),
        required_quantity: 4,
        price: lkr(2000),
        products: vec![
            OfferProduct::new(Product::new("A", "Tee A", lkr(800)).with_weight(250)),
            OfferProduct::new(Product::new("B", "Tee B", lkr(850)).with_weight(300)),
        ],
    }
}

fn bundle_line(product: &str, price: i64, quantity: u32, bundle: &str) -> CartLineItem {
    CartLineItem::new(product, product, lkr(price), quantity)
        .with_size("")
        .in_bundle(offer().bundle_link(BundleId::new(bundle)))
}

#[test]
fn test_regular_lines_merge() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(CartLineItem::new("tee", "Tee", lkr(800), 1).with_size("M"));
    let outcome = cart.add_item(CartLineItem::new("tee", "Tee", lkr(800), 2).with_size("M"));

    assert_eq!(outcome, AddOutcome::Merged { quantity: 3 });
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 3);
}

#[test]
fn test_bundle_duplicate_keeps_first_quantity() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(bundle_line("A", 800, 2, "b1"));
    let outcome = cart.add_item(bundle_line("A", 800, 5, "b1"));

    assert_eq!(outcome, AddOutcome::Ignored);
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
}

#[test]
fn test_bundle_price_scales_with_quantity() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(bundle_line("A", 800, 3, "b1"));
    cart.add_item(bundle_line("B", 850, 3, "b1"));

    let bundles = cart.bundles();
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].price_per_item, lkr(500));
    assert_eq!(bundles[0].current_quantity, 6);
    assert_eq!(bundles[0].calculated_total, lkr(3000));
    assert!(bundles[0].is_complete);
}

#[test]
fn test_completeness_threshold() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(bundle_line("A", 800, 3, "b1"));
    assert_eq!(cart.incomplete_bundles().len(), 1);
    assert_eq!(cart.incomplete_bundles()[0].remaining_quantity(), 1);

    cart.add_item(bundle_line("B", 850, 1, "b1"));
    assert!(cart.incomplete_bundles().is_empty());
}

#[test]
fn test_edit_in_place_keeps_bundle_id() {
    let offer = offer();
    let mut cart = CartStore::in_memory(Currency::LKR);
    let mut builder = BundleBuilder::new(&offer);
    builder.set_quantity(&ProductId::new("A"), 4).unwrap();
    let bundle_id = builder.submit(&mut cart, 1_000).unwrap();

    let existing = cart.bundles().remove(0);
    let mut edit = BundleBuilder::edit(&offer, &existing);
    edit.set_quantity(&ProductId::new("A"), 1).unwrap();
    edit.set_quantity(&ProductId::new("B"), 4).unwrap();
    let edited_id = edit.submit(&mut cart, 2_000).unwrap();

    assert_eq!(edited_id, bundle_id);
    let bundles = cart.bundles();
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].bundle_id, bundle_id);
    assert_eq!(bundles[0].current_quantity, 5);
    assert_eq!(bundles[0].calculated_total, lkr(2500));
    assert_eq!(bundles[0].edit_path(), format!("/offers/buy-4?bundleId={}", bundle_id));
}

#[test]
fn test_total_price_is_bundles_plus_regular() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(bundle_line("A", 800, 2, "b1"));
    cart.add_item(bundle_line("B", 850, 2, "b1"));
    cart.add_item(bundle_line("A", 800, 1, "b2"));
    cart.add_item(CartLineItem::new("cap", "Cap", lkr(300), 2));

    let bundle_sum: i64 = cart
        .bundles()
        .iter()
        .map(|b| b.calculated_total.minor_units)
        .sum();
    let regular_sum: i64 = cart
        .regular_items()
        .iter()
        .map(|i| i.unit_price().multiply(i.quantity).minor_units)
        .sum();

    assert_eq!(cart.total_price().minor_units, bundle_sum + regular_sum);
    assert_eq!(cart.total_price(), lkr(3100));

    let pricing = cart.pricing();
    assert_eq!(pricing.bundle_subtotal, lkr(2500));
    assert_eq!(pricing.regular_subtotal, lkr(600));
    assert_eq!(pricing.subtotal, cart.total_price());
}

#[test]
fn test_remove_item_precedence() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(CartLineItem::new("A", "Tee A", lkr(800), 1).with_size("M"));
    cart.add_item(CartLineItem::new("A", "Tee A", lkr(800), 1).with_size("L"));
    cart.add_item(bundle_line("A", 800, 2, "b1"));

    // bundle id wins: size is ignored
    assert_eq!(cart.remove_item(&ProductId::new("A"), Some(&BundleId::new("b1")), Some("M"), None), 1);
    assert_eq!(cart.items().len(), 2);

    // size only touches the matching regular line
    assert_eq!(cart.remove_item(&ProductId::new("A"), None, Some("M"), None), 1);
    assert_eq!(cart.items()[0].size.as_deref(), Some("L"));

    // no discriminator: all regular lines of the product
    cart.add_item(bundle_line("A", 800, 2, "b2"));
    assert_eq!(cart.remove_item(&ProductId::new("A"), None, None, None), 1);
    assert_eq!(cart.items().len(), 1);
    assert!(!cart.items()[0].is_regular());

    assert_eq!(cart.remove_item(&ProductId::new("zzz"), None, None, None), 0);
}

#[test]
fn test_buy_four_for_two_thousand() {
    let mut cart = CartStore::in_memory(Currency::LKR);
    cart.add_item(bundle_line("A", 800, 2, "offer-1-1"));
    cart.add_item(bundle_line("B", 850, 2, "offer-1-1"));
    cart.add_item(CartLineItem::new("cap", "Cap", lkr(300), 1));

    let bundles = cart.bundles();
    assert_eq!(bundles[0].price_per_item, lkr(500));
    assert_eq!(bundles[0].calculated_total, lkr(2000));
    assert!(bundles[0].is_complete);
    assert_eq!(cart.total_items(), 3);

    let before = cart.total_price();
    assert_eq!(cart.remove_bundle_items(&BundleId::new("offer-1-1")), 2);
    let after = cart.total_price();
    assert_eq!(before.try_subtract(&after), Some(lkr(2000)));
    assert!(cart.bundles().is_empty());
}

#[test]
fn test_total_weight_counts_every_unit() {
    let offer = offer();
    let mut cart = CartStore::in_memory(Currency::LKR);
    let mut builder = BundleBuilder::new(&offer);
    builder.set_quantity(&ProductId::new("A"), 2).unwrap();
    builder.set_quantity(&ProductId::new("B"), 2).unwrap();
    builder.submit(&mut cart, 1).unwrap();

    assert_eq!(cart.total_weight_grams(), 1100);
    assert_eq!(weight_based_shipping(cart.total_weight_grams(), lkr(200)), lkr(400));
}

#[test]
fn test_cart_survives_reopen() {
    let store = MemoryStore::new();
    {
        let mut cart = CartStore::open(CachePersistence::new(Cache::new(store.clone())), Currency::LKR);
        cart.add_item(bundle_line("A", 800, 4, "b1"));
        cart.add_item(CartLineItem::new("cap", "Cap", lkr(300), 1).with_color("Navy"));
    }

    let cart = CartStore::open(CachePersistence::new(Cache::new(store)), Currency::LKR);
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.bundles()[0].calculated_total, lkr(2000));
    assert_eq!(cart.items()[1].color.as_deref(), Some("Navy"));
}

#[test]
fn test_file_backed_cart_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let offer = offer();

    {
        let store = FileStore::open(dir.path()).unwrap();
        let mut cart = CartStore::open(CachePersistence::new(Cache::new(store)), Currency::LKR);
        add_starter_bundle(&offer, &mut cart, 5);
        let mut builder = BundleBuilder::edit(&offer, &cart.bundles()[0]);
        builder.set_quantity(&ProductId::new("A"), 3).unwrap();
        builder.submit(&mut cart, 6).unwrap();
    }

    let store = FileStore::open(dir.path()).unwrap();
    let mut cart = CartStore::open(CachePersistence::new(Cache::new(store.clone())), Currency::LKR);
    assert_eq!(cart.bundles()[0].current_quantity, 4);

    let gateway = CacheOrderGateway::new(
        Cache::new(store),
        vec![City::new("colombo", "Colombo", lkr(350))],
    );
    let customer = CustomerDetails {
        name: "Nimal".to_string(),
        mobile: "0771234567".to_string(),
        email: None,
        address: "12 Galle Road".to_string(),
        city_id: CityId::new("colombo"),
    };
    let confirmation = place_order(&mut cart, customer, &gateway).unwrap();
    assert!(cart.is_empty());

    let order = gateway.order(&confirmation.order_number).unwrap().unwrap();
    assert_eq!(order.subtotal, lkr(2000));
    assert_eq!(order.total, lkr(2350));
    assert_eq!(order.items.len(), 2);
    assert!(order.items.iter().all(|i| i.bundle_name.as_deref() == Some("Buy 4 for 2000")));
}

#[test]
fn test_three_for_two_thousand_charges_exactly_the_offer_price() {
    let mut offer = offer();
    offer.name = "Buy 3 for 2000".to_string();
    offer.required_quantity = 3;

    let mut cart = CartStore::in_memory(Currency::LKR);
    let mut builder = BundleBuilder::new(&offer);
    builder.set_quantity(&ProductId::new("A"), 2).unwrap();
    builder.set_quantity(&ProductId::new("B"), 1).unwrap();
    assert_eq!(builder.calculated_total(), lkr(2000));
    builder.submit(&mut cart, 1).unwrap();

    let bundle = &cart.bundles()[0];
    assert!(bundle.is_complete);
    assert_eq!(bundle.calculated_total, lkr(2000));
    assert_eq!(cart.total_price(), lkr(2000));
    assert_eq!(cart.pricing().subtotal, lkr(2000));

    let gateway = CacheOrderGateway::new(
        Cache::in_memory(),
        vec![City::new("colombo", "Colombo", lkr(350))],
    );
    let customer = CustomerDetails {
        name: "Nimal".to_string(),
        mobile: "0771234567".to_string(),
        email: None,
        address: "12 Galle Road".to_string(),
        city_id: CityId::new("colombo"),
    };
    let confirmation = place_order(&mut cart, customer, &gateway).unwrap();
    let order = gateway.order(&confirmation.order_number).unwrap().unwrap();
    assert_eq!(order.subtotal, lkr(2000));
    assert_eq!(order.total, lkr(2350));
}

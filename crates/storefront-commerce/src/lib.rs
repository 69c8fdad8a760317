//! Storefront domain logic: catalog, bundle-offer cart and checkout.
//!
//! - **Catalog**: products, variant options, "buy N for P" offers
//! - **Cart**: the cart store, bundle groups derived from its lines, and the
//!   offer-page builder that turns selections into bundle lines
//! - **Checkout**: order payload, shipping, order drafting and submission
//!
//! # Example
//!
//! ```rust
//! use storefront_commerce::prelude::*;
//!
//! let offer = Offer {
//!     id: OfferId::new("offer-1"),
//!     slug: "any-4".to_string(),
//!     name: "Any 4 for Rs. 2000".to_string(),
//!     description: None,
//!     logic: String::new(),
//!     required_quantity: 4,
//!     price: Money::from_major(2000, Currency::LKR),
//!     products: vec![
//!         OfferProduct::new(Product::new("a", "Tee A", Money::from_major(800, Currency::LKR))),
//!         OfferProduct::new(Product::new("b", "Tee B", Money::from_major(850, Currency::LKR))),
//!     ],
//! };
//!
//! let mut cart = CartStore::in_memory(Currency::LKR);
//! let mut builder = BundleBuilder::new(&offer);
//! builder.set_quantity(&ProductId::new("a"), 2).unwrap();
//! builder.set_quantity(&ProductId::new("b"), 2).unwrap();
//! builder.submit(&mut cart, 1_700_000_000_000).unwrap();
//!
//! cart.add_item(CartLineItem::new("c", "Cap", Money::from_major(300, Currency::LKR), 1));
//!
//! assert!(cart.incomplete_bundles().is_empty());
//! assert_eq!(cart.total_price().display(), "Rs. 2,300.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Offer, OfferProduct, Product, ProductVariant, VariantGroup, VariantOption,
        VariantSelection, VariantType,
    };

    // Cart
    pub use crate::cart::{
        add_starter_bundle, AddOutcome, BundleBuilder, BundleGroup, BundleLink,
        CachePersistence, CartLineItem, CartPersistence, CartPricing, CartStore, LinePricing,
        NoPersistence,
    };

    // Checkout
    pub use crate::checkout::{
        place_order, weight_based_shipping, CacheOrderGateway, CheckoutRequest, CheckoutSummary,
        City, CustomerDetails, Order, OrderConfirmation, OrderGateway, OrderItemPayload,
        OrderStatus,
    };
}

//! Shopping cart module.
//!
//! Cart lines, the bundle groups derived from them, the store that owns
//! them, and the offer-page builder that turns a shopper's picks into
//! bundle lines.

mod builder;
mod bundle;
mod line_item;
mod persist;
mod pricing;
mod store;

pub use builder::{add_starter_bundle, BundleBuilder};
pub use bundle::{group_bundles, BundleGroup};
pub use line_item::{BundleLink, CartLineItem};
pub use persist::{
    CachePersistence, CartPersistence, CartSnapshot, NoPersistence, DEFAULT_CART_KEY,
    SNAPSHOT_VERSION,
};
pub use pricing::{CartPricing, LinePricing};
pub use store::{AddOutcome, CartStore};

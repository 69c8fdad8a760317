//! Product catalog module.
//!
//! Read models for products, their variant options and bundle offers. The
//! catalog is owned by the admin side; the cart only consumes it.

mod offer;
mod product;
mod variant;

pub use offer::{Offer, OfferProduct};
pub use product::{Product, ProductVariant};
pub use variant::{VariantGroup, VariantOption, VariantSelection, VariantType};

//! Commerce error types.
//!
//! The cart store itself never fails; these errors come from the gates
//! around it (offer selection, checkout, order drafting) and from storage.

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product is not part of the offer.
    #[error("Product {product_id} is not part of offer {offer_id}")]
    ProductNotInOffer { offer_id: String, product_id: String },

    /// Variant option is unknown for the product or not enabled for the offer.
    #[error("Variant option {option_id} is not available for {product_name}")]
    VariantOptionNotAllowed {
        product_name: String,
        option_id: String,
    },

    /// A variant-bearing product is missing one or more variant choices.
    #[error("Select all variant options for {product_name}")]
    VariantSelectionIncomplete { product_name: String },

    /// Too few items selected for the offer.
    #[error("Please select at least {required} items for this offer ({selected} selected)")]
    BundleBelowMinimum { required: u32, selected: u32 },

    /// Checkout attempted with an empty cart.
    #[error("Cart is empty")]
    CartEmpty,

    /// Checkout attempted while bundles are below their required quantity.
    #[error("{count} bundle(s) still need more items")]
    IncompleteBundles { count: usize },

    /// Checkout attempted while bundle lines carry offer terms that cannot
    /// be priced.
    #[error("{count} bundle item(s) have no valid offer price; remove them to check out")]
    UnpricedBundleLines { count: usize },

    /// Required checkout field missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Order references a different city than the one supplied.
    #[error("Invalid city selected: {0}")]
    CityMismatch(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Order submission failed.
    #[error("Failed to place order: {0}")]
    Gateway(String),
}

impl From<storefront_cache::CacheError> for CommerceError {
    fn from(e: storefront_cache::CacheError) -> Self {
        CommerceError::Storage(e.to_string())
    }
}

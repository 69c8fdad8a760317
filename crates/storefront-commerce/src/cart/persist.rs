//! Durable storage for the cart's line list.

use crate::cart::CartLineItem;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use storefront_cache::{Cache, KeyValueStore};

/// Key the cart snapshot lives under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart-storage";

/// Snapshot format version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    pub version: u32,
    pub items: Vec<CartLineItem>,
}

/// Where the cart store keeps its snapshot.
pub trait CartPersistence {
    /// Read the last saved line list, if any.
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError>;

    /// Replace the saved line list.
    fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError>;
}

/// Keeps nothing. For carts that live only as long as the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl CartPersistence for NoPersistence {
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
        Ok(None)
    }

    fn save(&self, _items: &[CartLineItem]) -> Result<(), CommerceError> {
        Ok(())
    }
}

/// Stores the snapshot as JSON in a key-value cache.
#[derive(Debug, Clone)]
pub struct CachePersistence<S> {
    cache: Cache<S>,
    key: String,
}

impl<S: KeyValueStore> CachePersistence<S> {
    /// Persist under [`DEFAULT_CART_KEY`].
    pub fn new(cache: Cache<S>) -> Self {
        Self::with_key(cache, DEFAULT_CART_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(cache: Cache<S>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cache(&self) -> &Cache<S> {
        &self.cache
    }
}

impl<S: KeyValueStore> CartPersistence for CachePersistence<S> {
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
        let Some(snapshot) = self.cache.get::<CartSnapshot>(&self.key)? else {
            return Ok(None);
        };
        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(
                key = %self.key,
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "discarding cart snapshot with unknown version"
            );
            return Ok(None);
        }
        Ok(Some(snapshot.items))
    }

    fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError> {
        let snapshot = CartSnapshot {
            version: SNAPSHOT_VERSION,
            items: items.to_vec(),
        };
        self.cache.set(&self.key, &snapshot)?;
        Ok(())
    }
}

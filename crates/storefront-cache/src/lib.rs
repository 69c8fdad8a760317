//! Type-safe key-value cache for the storefront.
//!
//! Provides a small, ergonomic API for keeping JSON documents in a
//! key-value store. The store itself is pluggable: [`MemoryStore`] for tests
//! and short-lived sessions, [`FileStore`] for anything that has to survive
//! a restart (the cart snapshot, locally recorded orders).
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use storefront_cache::{Cache, MemoryStore};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Snapshot {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("cart-storage", &Snapshot { items: vec!["tee".into()] }).unwrap();
//!
//! let restored: Option<Snapshot> = cache.get("cart-storage").unwrap();
//! assert_eq!(restored.unwrap().items, vec!["tee".to_string()]);
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}

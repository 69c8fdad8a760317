//! File-backed cache behaviour across reopen.

use serde::{Deserialize, Serialize};
use storefront_cache::{Cache, FileStore, KeyValueStore};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    items: Vec<String>,
}

#[test]
fn test_value_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let cache = Cache::new(FileStore::open(dir.path()).unwrap());
        cache
            .set(
                "cart-storage",
                &Snapshot {
                    version: 1,
                    items: vec!["linen-shirt".to_string()],
                },
            )
            .unwrap();
    }

    let cache = Cache::new(FileStore::open(dir.path()).unwrap());
    let restored: Snapshot = cache.get("cart-storage").unwrap().unwrap();
    assert_eq!(restored.items, vec!["linen-shirt".to_string()]);
}

#[test]
fn test_overwrite_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Cache::new(FileStore::open(dir.path()).unwrap());

    cache.set("cart-storage", &1).unwrap();
    cache.set("cart-storage", &2).unwrap();
    assert_eq!(cache.get::<i32>("cart-storage").unwrap(), Some(2));

    cache.delete("cart-storage").unwrap();
    assert!(!cache.exists("cart-storage").unwrap());
    cache.delete("cart-storage").unwrap();
}

#[test]
fn test_open_creates_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("store");

    let store = FileStore::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_foreign_files_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("README.txt"), "hello").unwrap();

    let store = FileStore::open(dir.path()).unwrap();
    store.set("order:ORD-1", b"{}").unwrap();

    assert_eq!(store.keys().unwrap(), vec!["order:ORD-1".to_string()]);
}

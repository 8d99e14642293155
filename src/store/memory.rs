//! In-process document store
//!
//! Each collection is a `Vec<Document>` kept in insertion order, which is the
//! "store-natural" order callers observe. `replace_all` swaps a collection
//! under a single write lock.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{DocumentStore, Predicate, StoreResult};
use crate::error::StoreError;
use crate::model::Document;

pub struct MemoryStore {
    collections: RwLock<FxHashMap<String, Vec<Document>>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(FxHashMap::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Build a store pre-populated with raw collections (snapshot load)
    pub fn from_collections(collections: BTreeMap<String, Vec<Document>>) -> Self {
        Self {
            collections: RwLock::new(collections.into_iter().collect()),
            available: AtomicBool::new(true),
        }
    }

    /// Copy of every collection, keyed in name order
    pub fn export(&self) -> StoreResult<BTreeMap<String, Vec<Document>>> {
        let guard = self.read()?;
        Ok(guard
            .iter()
            .map(|(name, docs)| (name.clone(), docs.clone()))
            .collect())
    }

    /// Simulate an outage: every call fails with `StoreError::Unavailable` until re-enabled
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Append a document without validation. Used to stage corrupt records in tests.
    pub fn insert_raw(&self, collection: &str, document: Document) -> StoreResult<()> {
        let mut guard = self.write()?;
        guard.entry(collection.to_string()).or_default().push(document);
        Ok(())
    }

    /// Swap `collection` for `documents` under one write lock
    pub fn replace_collection(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        let mut guard = self.write()?;
        guard.insert(collection.to_string(), documents);
        Ok(())
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store is offline".to_string()))
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, FxHashMap<String, Vec<Document>>>> {
        self.ensure_available()?;
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, FxHashMap<String, Vec<Document>>>> {
        self.ensure_available()?;
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("collection lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, predicate: &Predicate) -> StoreResult<Vec<Document>> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| predicate.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str, predicate: &Predicate) -> StoreResult<u64> {
        let guard = self.read()?;
        Ok(guard
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| predicate.matches(doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn replace_all(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        self.replace_collection(collection, documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .replace_all(
                "species",
                vec![
                    doc(json!({"id": "1", "continent": "Asia", "isVenomous": true})),
                    doc(json!({"id": "2", "continent": "Europe", "isVenomous": false})),
                    doc(json!({"id": "3", "continent": "Asia", "isVenomous": true})),
                ],
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order() {
        let store = seeded().await;
        let docs = store
            .find("species", &Predicate::all().eq("continent", "Asia"))
            .await
            .unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty_not_error() {
        let store = MemoryStore::new();
        assert!(store.find("nothing", &Predicate::all()).await.unwrap().is_empty());
        assert_eq!(store.count("nothing", &Predicate::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_applies_predicate() {
        let store = seeded().await;
        assert_eq!(store.count("species", &Predicate::all()).await.unwrap(), 3);
        assert_eq!(
            store
                .count("species", &Predicate::all().eq("isVenomous", true))
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_replace_all_clears_previous_documents() {
        let store = seeded().await;
        store
            .replace_all("species", vec![doc(json!({"id": "9", "continent": "Africa"}))])
            .await
            .unwrap();
        assert_eq!(store.count("species", &Predicate::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_reports_unavailable() {
        let store = seeded().await;
        store.set_available(false);
        assert!(matches!(
            store.find("species", &Predicate::all()).await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_available(true);
        assert_eq!(store.count("species", &Predicate::all()).await.unwrap(), 3);
    }
}

//! Document store boundary
//!
//! The catalog treats persistence as an opaque collection of JSON documents
//! that can answer equality predicates and counts.
//! Backends:
//! - `MemoryStore`: insertion-ordered in-process collections
//! - `SnapshotStore`: `MemoryStore` persisted to a JSON file after each replace

pub mod memory;
pub mod snapshot;

pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::model::Document;

pub type StoreResult<T> = Result<T, StoreError>;

/// Conjunction of field-equality clauses. No clauses = match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<(String, Value)>,
}

impl Predicate {
    pub fn all() -> Self {
        Self::default()
    }

    /// Add `field == value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents matching `predicate`, in store-natural order
    async fn find(&self, collection: &str, predicate: &Predicate) -> StoreResult<Vec<Document>>;

    async fn find_one(
        &self,
        collection: &str,
        predicate: &Predicate,
    ) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, predicate).await?.into_iter().next())
    }

    async fn count(&self, collection: &str, predicate: &Predicate) -> StoreResult<u64>;

    /// Clear `collection` and insert `documents`, as one call
    async fn replace_all(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let d = doc(json!({"id": "a", "continent": "Asia"}));
        assert!(Predicate::all().matches(&d));
    }

    #[test]
    fn test_predicate_is_conjunction() {
        let d = doc(json!({"continent": "Asia", "dangerLevel": "Deadly"}));
        assert!(Predicate::all().eq("continent", "Asia").matches(&d));
        assert!(Predicate::all()
            .eq("continent", "Asia")
            .eq("dangerLevel", "Deadly")
            .matches(&d));
        assert!(!Predicate::all()
            .eq("continent", "Asia")
            .eq("dangerLevel", "Harmless")
            .matches(&d));
    }

    #[test]
    fn test_predicate_missing_field_never_matches() {
        let d = doc(json!({"id": "a"}));
        assert!(!Predicate::all().eq("continent", "Asia").matches(&d));
    }
}

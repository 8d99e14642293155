//! JSON snapshot store
//!
//! Serves reads from an inner `MemoryStore` and rewrites the whole snapshot
//! file after every `replace_all`. The file is written to a sibling temp path
//! and renamed into place; memory is only swapped once the file is on disk.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{DocumentStore, MemoryStore, Predicate, StoreResult};
use crate::error::StoreError;
use crate::model::Document;

pub struct SnapshotStore {
    path: PathBuf,
    inner: MemoryStore,
    /// Serializes replace + persist so two writers cannot interleave file writes
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    /// Open a snapshot file; a missing file starts an empty store
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let collections: BTreeMap<String, Vec<Document>> = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents).map_err(|e| {
                StoreError::Snapshot(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        tracing::info!(
            "Opened snapshot {} ({} collections)",
            path.display(),
            collections.len()
        );

        Ok(Self {
            path,
            inner: MemoryStore::from_collections(collections),
            write_lock: Mutex::new(()),
        })
    }

    fn persist(&self, collections: &BTreeMap<String, Vec<Document>>) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(collections)
            .map_err(|e| StoreError::Snapshot(format!("failed to encode snapshot: {}", e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SnapshotStore {
    async fn find(&self, collection: &str, predicate: &Predicate) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, predicate).await
    }

    async fn count(&self, collection: &str, predicate: &Predicate) -> StoreResult<u64> {
        self.inner.count(collection, predicate).await
    }

    async fn replace_all(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("snapshot lock poisoned".to_string()))?;

        let mut next = self.inner.export()?;
        next.insert(collection.to_string(), documents.clone());
        self.persist(&next)?;

        tracing::debug!(
            "Persisted {} documents to {} in {}",
            documents.len(),
            collection,
            self.path.display()
        );

        self.inner.replace_collection(collection, documents)
    }
}

//! Error types for the catalog core
//!
//! `StoreError` is what a document store backend reports; `CatalogError` is what
//! the typed accessor and query engine surface to callers.

use thiserror::Error;

/// Errors raised by a `DocumentStore` backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store cannot serve requests (offline, lock poisoned, ...)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Snapshot file could not be read or written
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Snapshot(err.to_string())
    }
}

/// Errors surfaced by the catalog accessor and query engine
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Requested id is absent
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: String },

    /// A stored document failed entity validation
    #[error("corrupt {collection} document {id}: {reason}")]
    DataIntegrity {
        collection: &'static str,
        id: String,
        reason: String,
    },

    /// A seed item was rejected before any mutation was applied
    #[error("invalid {collection} item at index {index}: {reason}")]
    InvalidRecord {
        collection: &'static str,
        index: usize,
        reason: String,
    },

    /// The underlying store could not be reached
    #[error("{0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::StoreUnavailable(err.to_string())
    }
}

impl CatalogError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn data_integrity(
        collection: &'static str,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DataIntegrity {
            collection,
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_record(
        collection: &'static str,
        index: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRecord {
            collection,
            index,
            reason: reason.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

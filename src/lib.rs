//! Serpent Aware catalog service
//!
//! Read-mostly reference service for snake species and emergency first-aid
//! procedures.
//!
//! - `model`: Species / EmergencyProcedure entities and their closed enums
//! - `store`: document store boundary (`DocumentStore`) with memory and snapshot backends
//! - `catalog`: typed accessor over the store (predicates, counts, bulk replace)
//! - `query_engine`: structural + free-text filtering and aggregation
//! - `api_server`: axum REST surface (feature `api`)

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod query_engine;
pub mod sample_data;
pub mod store;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog::{Catalog, SpeciesFilter};
pub use config::{ConfigError, ServerConfig};
pub use error::{CatalogError, CatalogResult, StoreError};
pub use model::{
    Continent, DangerLevel, EmergencyProcedure, EmergencyProcedureSeed, SeedPayload,
    SeedSummary, Species, SpeciesSeed,
};
pub use query_engine::{CatalogStats, ContinentCount, QueryEngine, SpeciesQuery, StructuralFilter};
pub use store::{DocumentStore, MemoryStore, Predicate, SnapshotStore};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};

//! Catalog Store Accessor
//!
//! Typed facade over a `DocumentStore`. Issues equality predicates, maps raw
//! documents into `Species` / `EmergencyProcedure` and tallies per-continent
//! and per-danger-level counts.
//!
//! Read policy:
//! - listing and single-record reads fail with `DataIntegrity` on a corrupt document
//! - counts decode every document and skip (with a warning) the ones that fail
//!
//! Writes are bulk replaces only. Every item is validated before the store is touched.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    Continent, DangerLevel, EmergencyProcedure, Species, EMERGENCY_COLLECTION,
    SPECIES_COLLECTION,
};
use crate::store::{DocumentStore, Predicate};

/// Equality constraints on the controlled-vocabulary fields. `None` = unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesFilter {
    pub continent: Option<Continent>,
    pub danger_level: Option<DangerLevel>,
}

impl SpeciesFilter {
    pub fn predicate(&self) -> Predicate {
        let mut predicate = Predicate::all();
        if let Some(continent) = self.continent {
            predicate = predicate.eq("continent", continent.as_str());
        }
        if let Some(level) = self.danger_level {
            predicate = predicate.eq("dangerLevel", level.as_str());
        }
        predicate
    }
}

/// Counts over the valid species of one collection read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesTally {
    pub total: u64,
    pub venomous: u64,
    pub by_continent: FxHashMap<Continent, u64>,
    pub by_danger_level: FxHashMap<DangerLevel, u64>,
}

impl SpeciesTally {
    pub fn from_species(species: &[Species]) -> Self {
        let mut tally = SpeciesTally::default();
        for s in species {
            tally.total += 1;
            if s.is_venomous {
                tally.venomous += 1;
            }
            *tally.by_continent.entry(s.continent).or_insert(0) += 1;
            *tally.by_danger_level.entry(s.danger_level).or_insert(0) += 1;
        }
        tally
    }

    pub fn danger_level(&self, level: DangerLevel) -> u64 {
        self.by_danger_level.get(&level).copied().unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn DocumentStore>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Species reads
    // ========================================================================

    pub async fn list_species(&self, filter: &SpeciesFilter) -> CatalogResult<Vec<Species>> {
        let docs = self
            .store
            .find(SPECIES_COLLECTION, &filter.predicate())
            .await?;
        docs.iter().map(Species::from_document).collect()
    }

    pub async fn get_species_by_id(&self, id: &str) -> CatalogResult<Species> {
        let doc = self
            .store
            .find_one(SPECIES_COLLECTION, &Predicate::all().eq("id", id))
            .await?
            .ok_or_else(|| CatalogError::not_found(SPECIES_COLLECTION, id))?;
        Species::from_document(&doc)
    }

    // ========================================================================
    // Aggregations
    // ========================================================================

    /// Every species that decodes cleanly. Corrupt documents are logged and skipped.
    async fn aggregate_species(&self) -> CatalogResult<Vec<Species>> {
        let docs = self
            .store
            .find(SPECIES_COLLECTION, &Predicate::all())
            .await?;

        let mut species = Vec::with_capacity(docs.len());
        for doc in &docs {
            match Species::from_document(doc) {
                Ok(s) => species.push(s),
                Err(e) => tracing::warn!("Excluding from counts: {}", e),
            }
        }
        Ok(species)
    }

    /// All species counts, taken from one read of the collection
    pub async fn tally_species(&self) -> CatalogResult<SpeciesTally> {
        Ok(SpeciesTally::from_species(&self.aggregate_species().await?))
    }

    /// Per-continent counts over the whole collection; only continents present appear
    pub async fn count_species_by_continent(&self) -> CatalogResult<FxHashMap<Continent, u64>> {
        Ok(self.tally_species().await?.by_continent)
    }

    pub async fn count_species_total(&self) -> CatalogResult<u64> {
        Ok(self.tally_species().await?.total)
    }

    pub async fn count_species_venomous(&self) -> CatalogResult<u64> {
        Ok(self.tally_species().await?.venomous)
    }

    pub async fn count_species_danger_level(&self, level: DangerLevel) -> CatalogResult<u64> {
        Ok(self.tally_species().await?.danger_level(level))
    }

    /// Raw document count, corrupt records included
    pub async fn count_species_documents(&self) -> CatalogResult<u64> {
        Ok(self.store.count(SPECIES_COLLECTION, &Predicate::all()).await?)
    }

    // ========================================================================
    // Emergency procedures
    // ========================================================================

    /// All procedures by ascending priority; equal priorities keep insertion order
    pub async fn list_emergency_procedures(&self) -> CatalogResult<Vec<EmergencyProcedure>> {
        let docs = self
            .store
            .find(EMERGENCY_COLLECTION, &Predicate::all())
            .await?;
        let mut procedures = docs
            .iter()
            .map(EmergencyProcedure::from_document)
            .collect::<CatalogResult<Vec<_>>>()?;
        // sort_by_key is stable
        procedures.sort_by_key(|p| p.priority);
        Ok(procedures)
    }

    // ========================================================================
    // Bulk replace
    // ========================================================================

    pub async fn replace_all_species(&self, items: Vec<Species>) -> CatalogResult<usize> {
        validate_species(&items)?;
        let count = items.len();
        let docs = items.iter().map(Species::to_document).collect();
        self.store.replace_all(SPECIES_COLLECTION, docs).await?;
        tracing::info!("Replaced species collection with {} records", count);
        Ok(count)
    }

    pub async fn replace_all_emergency_procedures(
        &self,
        items: Vec<EmergencyProcedure>,
    ) -> CatalogResult<usize> {
        validate_procedures(&items)?;
        let count = items.len();
        let docs = items.iter().map(EmergencyProcedure::to_document).collect();
        self.store.replace_all(EMERGENCY_COLLECTION, docs).await?;
        tracing::info!("Replaced emergency procedure collection with {} records", count);
        Ok(count)
    }
}

/// Field rules plus id uniqueness within the batch
pub fn validate_species(items: &[Species]) -> CatalogResult<()> {
    let mut seen = FxHashSet::default();
    for (index, species) in items.iter().enumerate() {
        species
            .check()
            .map_err(|reason| CatalogError::invalid_record(SPECIES_COLLECTION, index, reason))?;
        if !seen.insert(species.id.as_str()) {
            return Err(CatalogError::invalid_record(
                SPECIES_COLLECTION,
                index,
                format!("duplicate id {}", species.id),
            ));
        }
    }
    Ok(())
}

pub fn validate_procedures(items: &[EmergencyProcedure]) -> CatalogResult<()> {
    let mut seen = FxHashSet::default();
    for (index, procedure) in items.iter().enumerate() {
        procedure
            .check()
            .map_err(|reason| CatalogError::invalid_record(EMERGENCY_COLLECTION, index, reason))?;
        if !seen.insert(procedure.id.as_str()) {
            return Err(CatalogError::invalid_record(
                EMERGENCY_COLLECTION,
                index,
                format!("duplicate id {}", procedure.id),
            ));
        }
    }
    Ok(())
}

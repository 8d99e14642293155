// Query Engine Module
//
// Purpose: compose the filtered / aggregated views served to clients
//   - structural filter: continent + dangerLevel equality, decoded into closed enums
//   - free-text filter: case-insensitive substring over name, scientific name, countries
//   - aggregation: per-continent counts and global stats over the full collection
//
// The engine holds no state beyond the catalog handle.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{validate_procedures, validate_species, Catalog, SpeciesFilter};
use crate::error::CatalogResult;
use crate::model::{
    Continent, DangerLevel, EmergencyProcedure, SeedPayload, SeedSummary, Species,
};
use crate::store::DocumentStore;

/// Species query parameters as received from a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesQuery {
    pub continent: Option<String>,
    pub danger_level: Option<String>,
    pub search: Option<String>,
}

/// Decoded structural filter
///
/// A value outside the closed vocabulary is not an error: it names a category
/// with no members, so the whole query matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralFilter {
    Match(SpeciesFilter),
    Unsatisfiable { field: &'static str, value: String },
}

impl StructuralFilter {
    /// Absent or empty parameters impose no constraint
    pub fn from_params(continent: Option<&str>, danger_level: Option<&str>) -> Self {
        let mut filter = SpeciesFilter::default();

        if let Some(raw) = continent.filter(|s| !s.is_empty()) {
            match Continent::parse(raw) {
                Some(c) => filter.continent = Some(c),
                None => {
                    return StructuralFilter::Unsatisfiable {
                        field: "continent",
                        value: raw.to_string(),
                    }
                }
            }
        }

        if let Some(raw) = danger_level.filter(|s| !s.is_empty()) {
            match DangerLevel::parse(raw) {
                Some(d) => filter.danger_level = Some(d),
                None => {
                    return StructuralFilter::Unsatisfiable {
                        field: "dangerLevel",
                        value: raw.to_string(),
                    }
                }
            }
        }

        StructuralFilter::Match(filter)
    }
}

/// Keep species whose name, scientific name or any country contains `term`,
/// ignoring case. The whole term is one substring; an empty term keeps everything.
pub fn apply_text_search(species: Vec<Species>, term: &str) -> Vec<Species> {
    if term.is_empty() {
        return species;
    }
    let needle = term.to_lowercase();
    species
        .into_iter()
        .filter(|s| s.matches_text(&needle))
        .collect()
}

/// One row of the `/continents` listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentCount {
    pub continent: Continent,
    pub count: u64,
}

/// Continent counts ordered by continent name ascending
pub fn sort_continent_counts(counts: impl IntoIterator<Item = (Continent, u64)>) -> Vec<ContinentCount> {
    let mut rows: Vec<ContinentCount> = counts
        .into_iter()
        .map(|(continent, count)| ContinentCount { continent, count })
        .collect();
    rows.sort_by(|a, b| a.continent.as_str().cmp(b.continent.as_str()));
    rows
}

/// Global statistics over the unfiltered collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_species: u64,
    pub venomous_species: u64,
    pub deadly_species: u64,
    /// Continent name -> count, only continents present
    pub continents: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct QueryEngine {
    catalog: Catalog,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            catalog: Catalog::new(store),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Structural filter in the store, then free-text refinement in memory
    pub async fn list_species(&self, query: &SpeciesQuery) -> CatalogResult<Vec<Species>> {
        let filter = match StructuralFilter::from_params(
            query.continent.as_deref(),
            query.danger_level.as_deref(),
        ) {
            StructuralFilter::Match(filter) => filter,
            StructuralFilter::Unsatisfiable { field, value } => {
                tracing::debug!("Unrecognized {} '{}', returning no species", field, value);
                return Ok(Vec::new());
            }
        };

        let species = self.catalog.list_species(&filter).await?;
        let fetched = species.len();

        let species = match query.search.as_deref() {
            Some(term) => apply_text_search(species, term),
            None => species,
        };

        tracing::debug!(
            "Species query {:?} matched {} of {} structurally filtered",
            query,
            species.len(),
            fetched
        );
        Ok(species)
    }

    pub async fn get_species(&self, id: &str) -> CatalogResult<Species> {
        self.catalog.get_species_by_id(id).await
    }

    pub async fn continents(&self) -> CatalogResult<Vec<ContinentCount>> {
        let counts = self.catalog.count_species_by_continent().await?;
        Ok(sort_continent_counts(counts))
    }

    pub async fn emergency_procedures(&self) -> CatalogResult<Vec<EmergencyProcedure>> {
        self.catalog.list_emergency_procedures().await
    }

    /// Every figure comes from the same read, so continent counts sum to the total
    pub async fn stats(&self) -> CatalogResult<CatalogStats> {
        let tally = self.catalog.tally_species().await?;
        let deadly_species = tally.danger_level(DangerLevel::Deadly);
        let continents = tally
            .by_continent
            .into_iter()
            .map(|(continent, count)| (continent.as_str().to_string(), count))
            .collect();

        Ok(CatalogStats {
            total_species: tally.total,
            venomous_species: tally.venomous,
            deadly_species,
            continents,
        })
    }

    /// Replace both collections with the payload
    ///
    /// Ids and timestamps are assigned here. Both batches are validated before
    /// either collection is touched.
    pub async fn seed(&self, payload: SeedPayload) -> CatalogResult<SeedSummary> {
        let now = Utc::now();

        let species: Vec<Species> = payload
            .species
            .into_iter()
            .map(|seed| seed.into_species(uuid::Uuid::new_v4().to_string(), now))
            .collect();
        let procedures: Vec<EmergencyProcedure> = payload
            .emergency_procedures
            .into_iter()
            .map(|seed| seed.into_procedure(uuid::Uuid::new_v4().to_string(), now))
            .collect();

        validate_species(&species)?;
        validate_procedures(&procedures)?;

        let species_inserted = self.catalog.replace_all_species(species).await?;
        let emergency_procedures_inserted = self
            .catalog
            .replace_all_emergency_procedures(procedures)
            .await?;

        tracing::info!(
            "Seeded {} species and {} emergency procedures",
            species_inserted,
            emergency_procedures_inserted
        );

        Ok(SeedSummary {
            species_inserted,
            emergency_procedures_inserted,
        })
    }
}

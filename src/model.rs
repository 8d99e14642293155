//! Catalog data model
//!
//! Species and emergency procedures as stored and served. Both are immutable
//! once seeded; the only way to create them is a bulk replace from seed shapes
//! (`SpeciesSeed`, `EmergencyProcedureSeed`), which assigns `id` and `createdAt`.
//!
//! Continent and danger level are closed enums whose serialized form is the
//! display string. A stored document carrying any other string is corrupt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{CatalogError, CatalogResult};

/// Raw stored document: one JSON object per record
pub type Document = Map<String, Value>;

pub const SPECIES_COLLECTION: &str = "species";
pub const EMERGENCY_COLLECTION: &str = "emergency_procedures";

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    #[serde(rename = "Europe")]
    Europe,
    #[serde(rename = "Africa")]
    Africa,
    #[serde(rename = "Asia")]
    Asia,
    #[serde(rename = "Australia")]
    Australia,
}

impl Continent {
    pub const ALL: [Continent; 6] = [
        Continent::NorthAmerica,
        Continent::SouthAmerica,
        Continent::Europe,
        Continent::Africa,
        Continent::Asia,
        Continent::Australia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Australia => "Australia",
        }
    }

    /// Exact, case-sensitive decode of the display string
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Danger classification. Variant order is nominal; nothing compares levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DangerLevel {
    #[serde(rename = "Harmless")]
    Harmless,
    #[serde(rename = "Mildly Venomous")]
    MildlyVenomous,
    #[serde(rename = "Venomous")]
    Venomous,
    #[serde(rename = "Highly Venomous")]
    HighlyVenomous,
    #[serde(rename = "Deadly")]
    Deadly,
}

impl DangerLevel {
    pub const ALL: [DangerLevel; 5] = [
        DangerLevel::Harmless,
        DangerLevel::MildlyVenomous,
        DangerLevel::Venomous,
        DangerLevel::HighlyVenomous,
        DangerLevel::Deadly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DangerLevel::Harmless => "Harmless",
            DangerLevel::MildlyVenomous => "Mildly Venomous",
            DangerLevel::Venomous => "Venomous",
            DangerLevel::HighlyVenomous => "Highly Venomous",
            DangerLevel::Deadly => "Deadly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }

    /// Venom flag a record at this level is expected to carry (not enforced)
    pub fn implies_venomous(&self) -> bool {
        !matches!(self, DangerLevel::Harmless)
    }
}

impl fmt::Display for DangerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Species
// ============================================================================

/// One catalog record describing a snake taxon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub continent: Continent,
    pub countries: Vec<String>,
    pub danger_level: DangerLevel,
    pub is_venomous: bool,

    // Descriptive payload, never interpreted by query logic
    pub image_url: String,
    pub description: String,
    pub habitat: Vec<String>,
    pub size_range: String,
    pub identification_features: Vec<String>,
    pub behavior: String,
    pub diet: String,
    pub what_to_do: Vec<String>,
    pub what_not_to_do: Vec<String>,
    pub first_aid: Vec<String>,
    pub interesting_facts: Vec<String>,

    pub created_at: DateTime<Utc>,
}

/// Caller-supplied species shape; `id` and `createdAt` are assigned on seeding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesSeed {
    pub name: String,
    pub scientific_name: String,
    pub continent: Continent,
    pub countries: Vec<String>,
    pub danger_level: DangerLevel,
    pub is_venomous: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub habitat: Vec<String>,
    #[serde(default)]
    pub size_range: String,
    #[serde(default)]
    pub identification_features: Vec<String>,
    #[serde(default)]
    pub behavior: String,
    #[serde(default)]
    pub diet: String,
    #[serde(default)]
    pub what_to_do: Vec<String>,
    #[serde(default)]
    pub what_not_to_do: Vec<String>,
    #[serde(default)]
    pub first_aid: Vec<String>,
    #[serde(default)]
    pub interesting_facts: Vec<String>,
}

impl SpeciesSeed {
    pub fn into_species(self, id: String, created_at: DateTime<Utc>) -> Species {
        Species {
            id,
            name: self.name,
            scientific_name: self.scientific_name,
            continent: self.continent,
            countries: self.countries,
            danger_level: self.danger_level,
            is_venomous: self.is_venomous,
            image_url: self.image_url,
            description: self.description,
            habitat: self.habitat,
            size_range: self.size_range,
            identification_features: self.identification_features,
            behavior: self.behavior,
            diet: self.diet,
            what_to_do: self.what_to_do,
            what_not_to_do: self.what_not_to_do,
            first_aid: self.first_aid,
            interesting_facts: self.interesting_facts,
            created_at,
        }
    }
}

impl Species {
    /// Field-level rules beyond what the type system enforces
    pub fn check(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id is empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        if self.scientific_name.trim().is_empty() {
            return Err("scientificName is empty".to_string());
        }
        if let Some(pos) = self.countries.iter().position(|c| c.trim().is_empty()) {
            return Err(format!("countries[{}] is empty", pos));
        }
        Ok(())
    }

    /// Decode and validate a stored document. Never coerces bad values.
    pub fn from_document(doc: &Document) -> CatalogResult<Self> {
        let species: Species = decode(SPECIES_COLLECTION, doc)?;
        species
            .check()
            .map_err(|reason| CatalogError::data_integrity(SPECIES_COLLECTION, &species.id, reason))?;
        Ok(species)
    }

    pub fn to_document(&self) -> Document {
        encode(self)
    }

    /// Case-insensitive substring match on name, scientific name or any country.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.scientific_name.to_lowercase().contains(needle)
            || self
                .countries
                .iter()
                .any(|country| country.to_lowercase().contains(needle))
    }
}

// ============================================================================
// Emergency procedures
// ============================================================================

/// One prioritized first-aid / safety record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyProcedure {
    pub id: String,
    pub title: String,
    pub icon: String,
    /// Lower value = shown first
    pub priority: i64,
    pub quick_steps: Vec<String>,
    pub emergency_numbers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyProcedureSeed {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    pub priority: i64,
    #[serde(default)]
    pub quick_steps: Vec<String>,
    #[serde(default)]
    pub emergency_numbers: Vec<String>,
}

impl EmergencyProcedureSeed {
    pub fn into_procedure(self, id: String, created_at: DateTime<Utc>) -> EmergencyProcedure {
        EmergencyProcedure {
            id,
            title: self.title,
            icon: self.icon,
            priority: self.priority,
            quick_steps: self.quick_steps,
            emergency_numbers: self.emergency_numbers,
            created_at,
        }
    }
}

impl EmergencyProcedure {
    pub fn check(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id is empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        Ok(())
    }

    pub fn from_document(doc: &Document) -> CatalogResult<Self> {
        let procedure: EmergencyProcedure = decode(EMERGENCY_COLLECTION, doc)?;
        procedure.check().map_err(|reason| {
            CatalogError::data_integrity(EMERGENCY_COLLECTION, &procedure.id, reason)
        })?;
        Ok(procedure)
    }

    pub fn to_document(&self) -> Document {
        encode(self)
    }
}

// ============================================================================
// Seed payload
// ============================================================================

/// A full catalog load: every existing record of both kinds is replaced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPayload {
    pub species: Vec<SpeciesSeed>,
    #[serde(default)]
    pub emergency_procedures: Vec<EmergencyProcedureSeed>,
}

/// Counts reported back after a bulk replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub species_inserted: usize,
    pub emergency_procedures_inserted: usize,
}

// ============================================================================
// Document helpers
// ============================================================================

/// Id of a raw document, for error reporting on records that fail to decode
pub fn document_id(doc: &Document) -> String {
    doc.get("id")
        .and_then(Value::as_str)
        .unwrap_or("<missing id>")
        .to_string()
}

fn decode<T: serde::de::DeserializeOwned>(
    collection: &'static str,
    doc: &Document,
) -> CatalogResult<T> {
    serde_json::from_value(Value::Object(doc.clone()))
        .map_err(|e| CatalogError::data_integrity(collection, document_id(doc), e.to_string()))
}

fn encode<T: Serialize>(record: &T) -> Document {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        // Derived Serialize on a named-field struct always yields an object
        _ => Document::new(),
    }
}

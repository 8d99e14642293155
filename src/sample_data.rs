//! Bundled sample catalog
//!
//! 11 species across all six continents plus 3 emergency procedures, compiled
//! into the binary. Served by `POST /api/init-data` and `SEED_ON_START`.

use crate::model::SeedPayload;

const SAMPLE_CATALOG_JSON: &str = include_str!("../data/sample_catalog.json");

pub fn sample_payload() -> serde_json::Result<SeedPayload> {
    serde_json::from_str(SAMPLE_CATALOG_JSON)
}

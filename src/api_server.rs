// Axum API Server Module
//
// Purpose: REST surface over the query engine
//   GET  /api/species?continent=&dangerLevel=&search=
//   GET  /api/species/:id
//   GET  /api/continents
//   GET  /api/emergency
//   GET  /api/stats
//   POST /api/seed        (full catalog in the body)
//   POST /api/init-data   (bundled sample catalog)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::error::CatalogError;
use crate::model::{EmergencyProcedure, SeedPayload, SeedSummary, Species};
use crate::query_engine::{CatalogStats, ContinentCount, QueryEngine, SpeciesQuery};
use crate::sample_data::sample_payload;
use crate::store::{DocumentStore, MemoryStore, SnapshotStore};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub query_engine: Arc<QueryEngine>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            query_engine: Arc::new(QueryEngine::new(store)),
        }
    }

    /// Open the configured store and optionally seed the bundled sample into an empty catalog
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match &config.snapshot_path {
            Some(path) => {
                tracing::info!("Using snapshot store at {}", path.display());
                Arc::new(SnapshotStore::open(path)?)
            }
            None => {
                tracing::info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self::new(store);

        if config.seed_on_start {
            let existing = state.query_engine.catalog().count_species_documents().await?;
            if existing == 0 {
                tracing::info!("Catalog is empty, seeding bundled sample data...");
                let summary = state.query_engine.seed(sample_payload()?).await?;
                tracing::info!(
                    "Seeded {} species, {} emergency procedures",
                    summary.species_inserted,
                    summary.emergency_procedures_inserted
                );
            } else {
                tracing::info!("Catalog already holds {} species, skipping seed", existing);
            }
        }

        Ok(state)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .route("/api", get(api_root))
        .route("/api/", get(api_root))

        // Species endpoints
        .route("/api/species", get(list_species))
        .route("/api/species/:id", get(get_species))

        // Aggregates
        .route("/api/continents", get(list_continents))
        .route("/api/stats", get(get_stats))

        // Emergency procedures
        .route("/api/emergency", get(list_emergency_procedures))

        // Bulk load
        .route("/api/seed", post(seed_catalog))
        .route("/api/init-data", post(init_sample_data))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn api_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to SerpentAware API"
    }))
}

async fn list_species(
    State(state): State<AppState>,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<Vec<Species>>, AppError> {
    let species = state.query_engine.list_species(&query).await?;
    Ok(Json(species))
}

async fn get_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Species>, AppError> {
    tracing::debug!("Fetching species {}", id);
    let species = state.query_engine.get_species(&id).await?;
    Ok(Json(species))
}

async fn list_continents(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContinentCount>>, AppError> {
    Ok(Json(state.query_engine.continents().await?))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<CatalogStats>, AppError> {
    Ok(Json(state.query_engine.stats().await?))
}

async fn list_emergency_procedures(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmergencyProcedure>>, AppError> {
    Ok(Json(state.query_engine.emergency_procedures().await?))
}

async fn seed_catalog(
    State(state): State<AppState>,
    Json(payload): Json<SeedPayload>,
) -> Result<Json<SeedSummary>, AppError> {
    tracing::info!(
        "Seeding catalog with {} species, {} emergency procedures",
        payload.species.len(),
        payload.emergency_procedures.len()
    );
    Ok(Json(state.query_engine.seed(payload).await?))
}

async fn init_sample_data(State(state): State<AppState>) -> Result<Json<SeedSummary>, AppError> {
    let payload = sample_payload()
        .map_err(|e| AppError::Internal(format!("Bundled sample data is invalid: {}", e)))?;
    Ok(Json(state.query_engine.seed(payload).await?))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    InvalidRecord(String),
    DataIntegrity(String),
    StoreUnavailable(String),
    Internal(String),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::NotFound { .. } => AppError::NotFound(message),
            CatalogError::InvalidRecord { .. } => AppError::InvalidRecord(message),
            CatalogError::DataIntegrity { .. } => {
                tracing::error!("{}", message);
                AppError::DataIntegrity(message)
            }
            CatalogError::StoreUnavailable(_) => {
                tracing::error!("{}", message);
                AppError::StoreUnavailable(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidRecord(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::DataIntegrity(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::StoreUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

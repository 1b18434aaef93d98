//! Axum API Server
//!
//! JSON API over the pest, pesticide and crop catalogs, the season/soil
//! guide, and the simulated detector (`POST /api/detect`, multipart).
//! Search responses are cached in moka; detection responses never are.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use anyhow::Context;
use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::ReferenceData;
use crate::detection::{DetectionService, ImageArtifact};
use crate::guide;

/// Multipart field carrying the upload
pub const IMAGE_FIELD: &str = "image";

/// Shown when the upload has no file in it
pub const NO_IMAGE_MESSAGE: &str = "Please select an image first";

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<ReferenceData>,
    pub detector: Arc<DetectionService>,
    pub cache: Cache<String, serde_json::Value>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let data = match &config.data_dir {
            Some(dir) => {
                tracing::info!("Loading catalogs from {}...", dir.display());
                ReferenceData::load(dir)
                    .with_context(|| format!("Failed to load catalogs from {}", dir.display()))?
            }
            None => {
                tracing::info!("Loading embedded catalogs...");
                ReferenceData::embedded().context("Embedded catalogs are invalid")?
            }
        };
        let data = Arc::new(data);

        tracing::info!(
            "Initializing detector (latency {} ms)...",
            config.detection_latency.as_millis()
        );
        let detector = DetectionService::new(Arc::clone(&data)).with_latency(config.detection_latency);

        Ok(Self::from_parts(data, detector, config))
    }

    /// Assemble state around an already-built detector
    pub fn from_parts(data: Arc<ReferenceData>, detector: DetectionService, config: &AppConfig) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            data,
            detector: Arc::new(detector),
            cache,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Pest library
        .route("/api/pests", get(search_pests))
        .route("/api/pests/categories", get(pest_categories))
        .route("/api/pests/:id", get(get_pest))

        // Crop library
        .route("/api/crops", get(search_crops))
        .route("/api/crops/:id", get(get_crop))

        // Pesticides
        .route("/api/pesticides", get(search_pesticides))

        // Season and soil guide
        .route("/api/guide/seasons", get(list_seasons))
        .route("/api/guide/seasons/current", get(current_season))
        .route("/api/guide/seasons/:name", get(get_season))
        .route("/api/guide/soils", get(list_soils))
        .route("/api/guide/soils/:name", get(get_soil))

        // Detection
        .route("/api/detect", post(detect_pest))

        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(upload_limit))
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

async fn search_pests(
    State(state): State<AppState>,
    Query(query): Query<PestQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!("pests:{:?}", query);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let pests = state.data.search_pests(
        query.q.as_deref().unwrap_or_default(),
        query.category.as_deref(),
    );
    let result = rows_json(&pests)?;

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn pest_categories(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "categories": state.data.pest_categories()
    }))
}

async fn get_pest(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pest = state
        .data
        .pest(id)
        .ok_or_else(|| AppError::NotFound(format!("Pest {} not found", id)))?;

    Ok(Json(serde_json::json!({
        "pest": to_json(pest)?,
        "recommended_pesticides": to_json(&state.data.recommendations_for(pest))?,
    })))
}

async fn search_crops(
    State(state): State<AppState>,
    Query(query): Query<CropQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!("crops:{:?}", query);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let crops = state.data.search_crops(query.q.as_deref().unwrap_or_default());
    let result = rows_json(&crops)?;

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn get_crop(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let crop = state
        .data
        .crop(id)
        .ok_or_else(|| AppError::NotFound(format!("Crop {} not found", id)))?;

    Ok(Json(serde_json::json!({
        "crop": to_json(crop)?,
        "related_pests": to_json(&state.data.pests_affecting_crop(&crop.name))?,
    })))
}

async fn search_pesticides(
    State(state): State<AppState>,
    Query(query): Query<PesticideQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!("pesticides:{:?}", query);
    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let result = match query.target.as_deref().map(str::trim) {
        Some(target) if !target.is_empty() => {
            rows_json(&state.data.pesticides_effective_against(target))?
        }
        _ => rows_json(state.data.pesticides())?,
    };

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn list_seasons() -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(rows_json(guide::seasons())?))
}

/// Season for the current month (UTC)
async fn current_season() -> Result<Json<serde_json::Value>, AppError> {
    let month = chrono::Utc::now().format("%B").to_string();
    let season = guide::season_for_month(&month)
        .ok_or_else(|| AppError::Internal(format!("No season covers {}", month)))?;
    Ok(Json(to_json(season)?))
}

async fn get_season(Path(name): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    let season = guide::season(&name)
        .ok_or_else(|| AppError::NotFound(format!("Season '{}' not found", name)))?;
    Ok(Json(to_json(season)?))
}

async fn list_soils() -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(rows_json(guide::soil_types())?))
}

async fn get_soil(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let soil = guide::soil_type(&name)
        .ok_or_else(|| AppError::NotFound(format!("Soil type '{}' not found", name)))?;

    Ok(Json(serde_json::json!({
        "soil": to_json(soil)?,
        "crops": to_json(&state.data.crops_for_soil(soil.name))?,
    })))
}

/// Upload an image, get the matched pest back
///
/// Validation runs before the detector: a missing or empty `image` field
/// and declared non-image content types are rejected with 400. Detector
/// failures are not errors here; they come back as the default result with
/// `"fallback": true`.
async fn detect_pest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let artifact = read_image_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_IMAGE_MESSAGE.to_string()))?;

    if let Some(content_type) = &artifact.content_type {
        if !is_image_type(content_type) {
            return Err(AppError::BadRequest(format!(
                "Unsupported file type '{}', please upload an image",
                content_type
            )));
        }
    }

    let outcome = state.detector.detect(&artifact).await;

    Ok(Json(serde_json::json!({
        "result": to_json(outcome.result())?,
        "fallback": outcome.is_fallback(),
    })))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(serde::Deserialize, Debug)]
struct PestQuery {
    q: Option<String>,
    category: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct CropQuery {
    q: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct PesticideQuery {
    target: Option<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// First `image` field as an artifact; `None` when absent or empty
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<ImageArtifact>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        // Browsers send an empty part when no file was chosen
        if filename.is_empty() && bytes.is_empty() {
            return Ok(None);
        }

        let artifact = ImageArtifact::from_bytes(filename, &bytes);
        return Ok(Some(match content_type {
            Some(content_type) => artifact.with_content_type(content_type),
            None => artifact,
        }));
    }
    Ok(None)
}

fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("JSON serialization error: {}", e)))
}

/// `{rows, data}` envelope used by every list endpoint
fn rows_json<T: Serialize>(items: &[T]) -> Result<serde_json::Value, AppError> {
    Ok(serde_json::json!({
        "rows": items.len(),
        "data": to_json(items)?
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Internal(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!("{}", message);
        }

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

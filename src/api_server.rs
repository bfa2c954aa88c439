// Axum API Server Module
//
// Purpose: REST surface over the recommendation engine
// Engine work is CPU-bound and runs on the blocking pool; responses are cached

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::error::RecommendationError;
use crate::forecast::{
    agri_features, ClimatologySource, DailyWeather, ForecastOutlook, MediumRangeForecaster,
};
use crate::metrics::IrrigationLevel;
use crate::recommender::{PlanRequest, RecommendationEngine, RecommendationReport};
use crate::season::Season;
use crate::soil::SoilProfile;

// ============================================================================
// Application State
// ============================================================================

type Forecaster = MediumRangeForecaster<Arc<dyn ClimatologySource>>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub forecaster: Arc<Forecaster>,
    pub cache: Cache<String, serde_json::Value>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, climatology: Arc<dyn ClimatologySource>) -> Self {
        tracing::info!(
            crops = engine.crops().len(),
            regions = engine.regions().len(),
            "Initializing application state"
        );

        let cache = Cache::builder()
            .max_capacity(10_000) // 10K entries
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build();

        Self {
            engine: Arc::new(engine),
            forecaster: Arc::new(MediumRangeForecaster::new(climatology)),
            cache,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Catalog endpoints
        .route("/api/regions", get(list_regions))
        .route("/api/regions/:id", get(get_region))
        .route("/api/crops", get(list_crops))
        .route("/api/seasons", get(list_seasons))

        // Weather feature derivation
        .route("/api/weather/features", post(weather_features))

        // Recommendation endpoint
        .route("/api/recommend", post(recommend))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request Types
// ============================================================================

/// Soil fields as submitted by a form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilInput {
    pub texture: String,
    pub ph: f64,
    pub organic_matter: String,
    pub drainage: String,
}

/// Body of `POST /api/recommend`
///
/// Either `forecast_outlook` is given directly, or `live_weather` (possibly
/// empty) is blended with climatology into an outlook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendBody {
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Defaults to today (UTC)
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub season: Option<String>,

    #[serde(default)]
    pub soil: Option<SoilInput>,

    pub irrigation_level: String,

    #[serde(default)]
    pub forecast_outlook: Option<ForecastOutlook>,

    #[serde(default)]
    pub live_weather: Vec<DailyWeather>,

    #[serde(default)]
    pub planning_days: Option<u32>,

    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CropQuery {
    pub season: Option<String>,
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

async fn list_regions(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = "regions:all".to_string();

    if let Some(cached) = state.cache.get(&cache_key).await {
        return Ok(Json(cached));
    }

    let result = to_json(state.engine.regions().all_regions())?;
    state.cache.insert(cache_key, result.clone()).await;

    Ok(Json(result))
}

async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let region = state
        .engine
        .regions()
        .get_region(&id)
        .ok_or_else(|| AppError::NotFound(format!("Region {} not found", id)))?;

    Ok(Json(to_json(region)?))
}

async fn list_crops(
    State(state): State<AppState>,
    Query(params): Query<CropQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let season = params
        .season
        .as_deref()
        .map(str::parse::<Season>)
        .transpose()?;
    let cache_key = format!("crops:{:?}", season);

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for {}", cache_key);
        return Ok(Json(cached));
    }

    let crops: Vec<_> = state
        .engine
        .crops()
        .all_crops()
        .iter()
        .filter(|crop| season.map_or(true, |s| crop.grown_in(s)))
        .collect();

    let result = to_json(&crops)?;
    state.cache.insert(cache_key, result.clone()).await;

    Ok(Json(result))
}

async fn list_seasons() -> impl IntoResponse {
    let seasons: Vec<serde_json::Value> = Season::all()
        .iter()
        .map(|season| {
            serde_json::json!({
                "season": season,
                "description": season.description(),
                "typical_crops": season.typical_crops(),
                "water_source": season.water_source(),
                "planting_window": season.planting_window(),
            })
        })
        .collect();

    Json(seasons)
}

/// Per-day GDD, rolling rainfall and dry-spell run for a weather series
async fn weather_features(
    Json(mut records): Json<Vec<DailyWeather>>,
) -> Result<Json<serde_json::Value>, AppError> {
    if records.is_empty() {
        return Err(AppError::BadRequest("weather series is empty".to_string()));
    }
    records.sort_by_key(|d| d.date);

    Ok(Json(to_json(&agri_features(&records))?))
}

async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    // Dateless requests depend on today, so the key carries the resolved date
    let date = payload.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let cache_key = format!("recommend:{}:{}", date, to_json(&payload)?);

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for recommendation");
        return Ok(Json(cached));
    }

    // CPU-bound work: run in blocking thread pool
    let engine = state.engine.clone();
    let forecaster = state.forecaster.clone();

    let report = tokio::task::spawn_blocking(move || {
        build_report(&engine, &forecaster, payload, date)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    tracing::info!(
        region = %report.region.id,
        season = %report.season.active,
        results = report.recommendations.len(),
        "Served recommendation"
    );

    let result = to_json(&report)?;
    state.cache.insert(cache_key, result.clone()).await;

    Ok(Json(result))
}

/// Parse form-level fields, build the outlook if needed, and run the plan
fn build_report(
    engine: &RecommendationEngine,
    forecaster: &Forecaster,
    body: RecommendBody,
    date: NaiveDate,
) -> Result<RecommendationReport, AppError> {
    let irrigation_level: IrrigationLevel =
        body.irrigation_level.parse().map_err(AppError::BadRequest)?;

    let season = body.season.as_deref().map(str::parse::<Season>).transpose()?;

    let soil_profile = body
        .soil
        .map(|s| SoilProfile::parse(&s.texture, s.ph, &s.organic_matter, &s.drainage))
        .transpose()
        .map_err(RecommendationError::from)?;

    let planning_days = body
        .planning_days
        .unwrap_or(engine.config().default_planning_days);

    let forecast_outlook = match body.forecast_outlook {
        Some(outlook) => outlook,
        None => {
            let region = engine.resolve_region(
                body.region_id.as_deref(),
                body.latitude,
                body.longitude,
            )?;
            forecaster.outlook(&region.id, &body.live_weather, date, planning_days)?
        }
    };

    let request = PlanRequest {
        region_id: body.region_id,
        latitude: body.latitude,
        longitude: body.longitude,
        date,
        season,
        soil_profile,
        irrigation_level,
        forecast_outlook,
        planning_days: Some(planning_days),
        top_n: body.top_n,
    };

    Ok(engine.plan(&request)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Unprocessable(String),
    Internal(String),
}

impl From<RecommendationError> for AppError {
    fn from(err: RecommendationError) -> Self {
        let message = err.to_string();
        match err {
            RecommendationError::UnknownRegion(_) | RecommendationError::NoRegionNearby { .. } => {
                AppError::NotFound(message)
            }
            RecommendationError::NoEligibleCrops { .. }
            | RecommendationError::NoWeatherData { .. }
            | RecommendationError::UnsupportedSeason { .. }
            | RecommendationError::IncompleteCropRecord { .. } => AppError::Unprocessable(message),
            RecommendationError::InvalidConfig(_) => AppError::Internal(message),
            _ => AppError::BadRequest(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let status = |e: RecommendationError| AppError::from(e).into_response().status();

        assert_eq!(status(RecommendationError::UnknownRegion("X".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(RecommendationError::MissingLocation), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(RecommendationError::UnknownSeason("Winter".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(RecommendationError::NoEligibleCrops {
                season: Season::Zaid,
                region_id: "PUNE".into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(RecommendationError::InvalidConfig("bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_build_report_rejects_bad_irrigation() {
        let engine = RecommendationEngine::builtin();
        let climatology: Arc<dyn ClimatologySource> =
            Arc::new(crate::forecast::InMemoryClimatology::new());
        let forecaster = MediumRangeForecaster::new(climatology);
        let body: RecommendBody = serde_json::from_value(serde_json::json!({
            "region_id": "PUNE",
            "irrigation_level": "sprinkler",
            "forecast_outlook": {
                "expected_avg_temp_c": 24.0,
                "expected_rainfall_mm": 40.0,
                "dry_spell_days": 3.0,
                "horizon_days": 90
            }
        }))
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 11, 15).unwrap();
        let err = build_report(&engine, &forecaster, body, date).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("sprinkler")));
    }
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument, warn};
use utoipa::{OpenApi, ToSchema};

use crate::services::{ClimateService, ObservationField, ServiceError};

pub const API_PREFIX: &str = "/api/v1.0";

/// Routes advertised by the index page
pub const ROUTE_LISTING: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

#[derive(Clone)]
pub struct AppState {
    pub climate_service: ClimateService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned from handlers, rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ServiceError::InvalidDateFormat { .. } => StatusCode::BAD_REQUEST,
            ServiceError::MalformedStoredDate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            warn!("Rejected request: {}", self.0);
        } else {
            error!("Request failed: {}", self.0);
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home,
        health,
        get_precipitation,
        get_stations,
        get_tobs,
        get_summary_from,
        get_summary_between
    ),
    components(schemas(HealthResponse, ErrorResponse, ObservationField)),
    tags((name = "climate", description = "Climate observation queries"))
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/precipitation", get(get_precipitation))
        .route("/stations", get(get_stations))
        .route("/tobs", get(get_tobs))
        .route("/{start}", get(get_summary_from))
        .route("/{start}/{end}", get(get_summary_between))
        .with_state(state);

    Router::new()
        .route("/", get(home))
        .nest(API_PREFIX, api_routes)
}

/// List all available api routes
#[utoipa::path(
    get,
    path = "/",
    tag = "climate",
    responses((status = 200, description = "Available routes, one per line", body = String))
)]
async fn home() -> String {
    ROUTE_LISTING.join("\n")
}

#[utoipa::path(
    get,
    path = "/api/v1.0/health",
    tag = "climate",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    debug!("Health check requested");
    state.climate_service.check_health().await?;
    info!("Health check successful");
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    tag = "climate",
    responses(
        (status = 200, description = "Precipitation keyed by date; the last station scanned wins per date", body = BTreeMap<String, f64>),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_precipitation(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, ApiError> {
    debug!("Fetching precipitation by date");
    let precipitation = state.climate_service.get_precipitation().await?;
    info!("Retrieved precipitation for {} dates", precipitation.len());
    Ok(Json(precipitation))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    tag = "climate",
    responses(
        (status = 200, description = "All station identifiers", body = [String]),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_stations(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    debug!("Fetching station list");
    let stations = state.climate_service.get_stations().await?;
    info!("Retrieved {} stations", stations.len());
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    tag = "climate",
    responses(
        (status = 200, description = "Flat list of station, date, temperature for the most active station over the last year", body = [ObservationField]),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
async fn get_tobs(State(state): State<AppState>) -> Result<Json<Vec<ObservationField>>, ApiError> {
    debug!("Fetching trailing-year observations for the most active station");
    let flattened = match state.climate_service.get_recent_tobs().await? {
        Some(recent) => {
            info!(
                "Retrieved {} observations for station {} since {}",
                recent.observations.len(),
                recent.station,
                recent.window_start
            );
            recent.flatten()
        }
        None => {
            warn!("No measurements available for temperature observations");
            Vec::new()
        }
    };
    Ok(Json(flattened))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    tag = "climate",
    params(("start" = String, Path, description = "Start date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Min/avg/max temperature from start onwards", body = [String]),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(start = %start))]
async fn get_summary_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    debug!("Aggregating temperatures from {}", start);
    let summary = state
        .climate_service
        .get_date_range_aggregate(&start, None)
        .await?;
    Ok(Json(vec![summary.describe()]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    tag = "climate",
    params(
        ("start" = String, Path, description = "Start date, YYYY-MM-DD"),
        ("end" = String, Path, description = "End date (inclusive), YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Min/avg/max temperature within the inclusive range", body = [String]),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 503, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state), fields(start = %start, end = %end))]
async fn get_summary_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    debug!("Aggregating temperatures from {} to {}", start, end);
    let summary = state
        .climate_service
        .get_date_range_aggregate(&start, Some(&end))
        .await?;
    Ok(Json(vec![summary.describe()]))
}

//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::coord::Coordinate;
use crate::error::{Error, GeoError, ResolveError};
use crate::format::{available_formats, FormatInfo, Operation, Report};
use crate::proximity::validate_radius;
use crate::server::state::AppState;
use crate::service::LocationQuery;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/formats", get(formats_handler))
        .route("/api/neighbourhoods", get(neighbourhoods_handler))
        .route("/api/resolve", post(resolve_handler))
        .route("/api/nearby", post(nearby_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A location in a request body
///
/// Exactly one form is used, in this order: `here`, `lat`+`lng`, `query`.
#[derive(Debug, Default, Deserialize)]
pub struct LocationRequest {
    /// "lat,lng", an address, or "here"
    pub query: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Use the server's current location
    #[serde(default)]
    pub here: bool,
}

impl LocationRequest {
    fn location(&self) -> Result<LocationQuery, ApiError> {
        if self.here {
            return Ok(LocationQuery::CurrentLocation);
        }
        match (self.lat, self.lng, self.query.as_deref()) {
            (Some(lat), Some(lng), _) => Ok(LocationQuery::Coordinate(Coordinate::new(lat, lng))),
            (None, None, Some(query)) if !query.trim().is_empty() => Ok(LocationQuery::parse(query)),
            (Some(_), None, _) | (None, Some(_), _) => Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "Both lat and lng are required",
                "INVALID_COORDINATES",
            )),
            _ => Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "Request needs a query, lat/lng or here",
                "MISSING_LOCATION",
            )),
        }
    }
}

/// Nearby request body
#[derive(Debug, Default, Deserialize)]
pub struct NearbyRequest {
    #[serde(flatten)]
    pub location: LocationRequest,
    /// Search radius in kilometres (0 = no limit; server default when absent)
    pub radius_km: Option<f64>,
}

/// Neighbourhood listing query string
#[derive(Debug, Deserialize)]
pub struct NeighbourhoodsQuery {
    /// Region key or name
    pub region: Option<String>,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        let status = match &err {
            ResolveError::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
            ResolveError::OutOfTerritory { .. } | ResolveError::NoMatch { .. } => {
                StatusCode::NOT_FOUND
            }
            ResolveError::Geo(geo) => match geo {
                GeoError::NotFound(_) => StatusCode::NOT_FOUND,
                GeoError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                GeoError::PermissionDenied => StatusCode::FORBIDDEN,
                GeoError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                GeoError::ProviderUnavailable(_) | GeoError::Unavailable(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
        };
        ApiError::new(status, err.to_string(), &err.kind().to_uppercase())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Resolve(e) => e.into(),
            Error::InvalidCoordinates(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, err.to_string(), "INVALID_COORDINATES")
            }
            Error::InvalidRadius(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, err.to_string(), "INVALID_RADIUS")
            }
            Error::Config(_) => {
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), "CONFIG_ERROR")
            }
            _ => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
                "INTERNAL_ERROR",
            ),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub geocoder: String,
    pub country: String,
    pub regions: usize,
    pub neighbourhoods: usize,
    pub cache: String,
    pub cache_entries: usize,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let service = &state.service;
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: service.provider_name().to_string(),
        country: service.country().to_string(),
        regions: service.taxonomy().regions().len(),
        neighbourhoods: service.taxonomy().len(),
        cache: service.cache().name().to_string(),
        cache_entries: service.cache().len(),
    })
}

/// Formats response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

/// List neighbourhoods, optionally for one region
///
/// GET /api/neighbourhoods?region=auckland
async fn neighbourhoods_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NeighbourhoodsQuery>,
) -> Result<Json<Report>, ApiError> {
    let region = params.region.as_deref().filter(|r| !r.trim().is_empty());
    let listing = state.service.browse_region(region);

    let mut report = Report::new(Operation::Browse, listing);
    if let Some(region) = region {
        if report.results.is_empty() {
            return Err(ApiError::new(
                StatusCode::NOT_FOUND,
                format!("Unknown region: {}", region),
                "UNKNOWN_REGION",
            ));
        }
        report = report.with_query(region);
    }
    Ok(Json(report))
}

/// Resolve the neighbourhood containing a location
///
/// POST /api/resolve
///
/// An address outside the territory or in no known neighbourhood is not an
/// error: the report is empty and `reason` says why.
async fn resolve_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocationRequest>,
) -> Result<Json<Report>, ApiError> {
    let query = req.location()?;

    let report = match state.service.try_resolve_neighbourhood(&query).await {
        Ok(resolved) => Report::new(Operation::Resolve, vec![resolved]),
        Err(e @ (ResolveError::OutOfTerritory { .. } | ResolveError::NoMatch { .. })) => {
            Report::new(Operation::Resolve, Vec::new()).with_reason(e.kind())
        }
        Err(e) => return Err(e.into()),
    };
    Ok(Json(report.with_query(query.to_string())))
}

/// Rank neighbourhoods by distance from a location
///
/// POST /api/nearby
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NearbyRequest>,
) -> Result<Json<Report>, ApiError> {
    let query = req.location.location()?;
    let radius = validate_radius(req.radius_km.or(Some(state.default_radius_km())))?;

    let ranked = state.service.try_find_nearby(&query, radius).await?;
    Ok(Json(
        Report::new(Operation::Nearby, ranked)
            .with_query(query.to_string())
            .with_radius(radius),
    ))
}

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::clients::maps::LatLng;
use crate::entities::driver_offer;
use crate::entities::trip_request::{self, RequestType, Status, VehicleType};
use crate::error::{AppError, AppResult};
use crate::services::matching::{self, NearbyCandidate};
use crate::services::trip_requests;
use crate::services::{delivery_code, offers, ratings};
use crate::utils::geo::is_valid_coordinate;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub vehicle_type: VehicleType,
}

/// Open requests around the driver's position
pub async fn nearby_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<NearbyCandidate>>> {
    if !is_valid_coordinate(query.lat, query.lng) {
        return Err(AppError::BadRequest("Invalid position".to_string()));
    }

    let candidates = matching::nearby_trip_requests(
        &state.db,
        &state.maps,
        LatLng::new(query.lat, query.lng),
        claims.sub,
        query.vehicle_type,
        state.config.nearby_radius_km,
        state.config.match_stale_minutes,
    )
    .await?;

    Ok(Json(candidates))
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub trip_request_id: i64,
    pub fare_offered: f64,
    pub estimated_time_min: Option<f64>,
    pub estimated_distance_km: Option<f64>,
}

/// Bid on an open request
pub async fn create_offer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateOfferRequest>,
) -> AppResult<Json<driver_offer::Model>> {
    let offer = offers::create(
        &state.db,
        &state.events,
        payload.trip_request_id,
        claims.sub,
        payload.fare_offered,
        payload.estimated_time_min,
        payload.estimated_distance_km,
    )
    .await?;
    Ok(Json(offer))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Status,
}

/// Advance the trip through its lifecycle
pub async fn update_trip_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::update_status(&state.db, &state.events, id, payload.status).await?;
    Ok(Json(serde_json::json!({ "message": "Status updated" })))
}

/// The driver's current accepted trip, if any
pub async fn active_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Option<trip_request::Model>>> {
    Ok(Json(
        trip_requests::active_by_driver(&state.db, claims.sub).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub request_type: Option<RequestType>,
}

/// The driver's most recent trips, optionally narrowed to one kind
pub async fn trip_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<trip_request::Model>>> {
    Ok(Json(
        trip_requests::history_by_driver(&state.db, claims.sub, query.request_type).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
}

/// Rate the client after the trip closes
pub async fn rate_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RatingRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ratings::rate_client(&state.db, id, payload.rating).await?;
    Ok(Json(serde_json::json!({ "message": "Client rated" })))
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub report: String,
}

/// File the driver's one-off report for this trip
pub async fn file_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReportRequest>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::update_driver_report(&state.db, id, payload.report).await?;
    Ok(Json(serde_json::json!({ "message": "Report filed" })))
}

#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CodeCheckResponse {
    pub valid: bool,
}

/// Strict hand-off check: the code must match and not be retired
pub async fn validate_delivery_code(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<CodeQuery>,
) -> AppResult<Json<CodeCheckResponse>> {
    let valid = delivery_code::validate(&state.db, id, &query.code).await?;
    Ok(Json(CodeCheckResponse { valid }))
}

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub lat: f64,
    pub lng: f64,
    pub trip_request_id: Option<i64>,
}

/// Position ping; also refreshes the live snapshot of an open trip
pub async fn update_position(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PositionRequest>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::update_driver_position(
        &state.db,
        &state.events,
        claims.sub,
        LatLng::new(payload.lat, payload.lng),
        payload.trip_request_id,
    )
    .await?;
    Ok(Json(serde_json::json!({ "message": "Position updated" })))
}

use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};

use crate::entities::fare_rates;
use crate::entities::trip_request::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::client::{build_trip_detail, TripDetailResponse};
use crate::handlers::driver::UpdateStatusRequest;
use crate::services::trip_requests;
use crate::AppState;

/// Current per-km / per-minute rate configuration
pub async fn get_fare_rates(
    State(state): State<AppState>,
) -> AppResult<Json<fare_rates::Model>> {
    fare_rates::Entity::find_by_id(1)
        .one(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::Internal("Fare rates are not configured".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateFareRatesRequest {
    pub km_rate_car: Option<f64>,
    pub min_rate_car: Option<f64>,
    pub km_rate_motorcycle: Option<f64>,
    pub min_rate_motorcycle: Option<f64>,
}

/// Update the rate table; estimation picks the new values up immediately
pub async fn update_fare_rates(
    State(state): State<AppState>,
    Json(payload): Json<UpdateFareRatesRequest>,
) -> AppResult<Json<fare_rates::Model>> {
    let rates = fare_rates::Entity::find_by_id(1)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("Fare rates are not configured".to_string()))?;

    for rate in [
        payload.km_rate_car,
        payload.min_rate_car,
        payload.km_rate_motorcycle,
        payload.min_rate_motorcycle,
    ]
    .into_iter()
    .flatten()
    {
        if !(rate >= 0.0) {
            return Err(AppError::BadRequest("Rates must not be negative".to_string()));
        }
    }

    let mut active: fare_rates::ActiveModel = rates.into();
    if let Some(v) = payload.km_rate_car {
        active.km_rate_car = Set(v);
    }
    if let Some(v) = payload.min_rate_car {
        active.min_rate_car = Set(v);
    }
    if let Some(v) = payload.km_rate_motorcycle {
        active.km_rate_motorcycle = Set(v);
    }
    if let Some(v) = payload.min_rate_motorcycle {
        active.min_rate_motorcycle = Set(v);
    }

    let updated = active.update(&state.db).await?;
    tracing::info!("fare rates updated");
    Ok(Json(updated))
}

/// Any trip request, regardless of phase
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TripDetailResponse>> {
    let trip = trip_requests::get_by_id(&state.db, id).await?;
    Ok(Json(build_trip_detail(&state.db, trip).await?))
}

/// Fetch a trip only if the scheduler already expired it
pub async fn get_expired_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TripDetailResponse>> {
    let trip = trip_requests::get_by_id_and_status(&state.db, id, Status::Expired)
        .await?
        .ok_or_else(|| AppError::NotFound("No expired trip request with this id".to_string()))?;
    Ok(Json(build_trip_detail(&state.db, trip).await?))
}

/// Status override sharing the same transition rules as the driver path
pub async fn update_trip_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::update_status(&state.db, &state.events, id, payload.status).await?;
    Ok(Json(serde_json::json!({ "message": "Status updated" })))
}

#[derive(Debug, Serialize)]
pub struct TerminalResponse {
    pub terminal: bool,
}

/// Whether a request is closed (finished or cancelled)
pub async fn check_terminal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TerminalResponse>> {
    let terminal = trip_requests::check_terminal(&state.db, id).await?;
    Ok(Json(TerminalResponse { terminal }))
}

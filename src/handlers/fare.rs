use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::clients::maps::LatLng;
use crate::error::{AppError, AppResult};
use crate::services::fare::{self, FareEstimate};
use crate::utils::geo::is_valid_coordinate;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    /// Car rate table when true, motorcycle otherwise
    pub is_car: bool,
}

/// Recommended fare for an origin/destination pair
pub async fn estimate(
    State(state): State<AppState>,
    Query(query): Query<EstimateQuery>,
) -> AppResult<Json<FareEstimate>> {
    if !is_valid_coordinate(query.origin_lat, query.origin_lng)
        || !is_valid_coordinate(query.destination_lat, query.destination_lng)
    {
        return Err(AppError::BadRequest("Invalid coordinates".to_string()));
    }

    let estimate = fare::estimate(
        &state.db,
        &state.maps,
        LatLng::new(query.origin_lat, query.origin_lng),
        LatLng::new(query.destination_lat, query.destination_lng),
        query.is_car,
    )
    .await?;

    Ok(Json(estimate))
}

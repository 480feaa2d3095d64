use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::clients::maps::{LatLng, MapsClient, MatrixElement};
use crate::clients::push::PushClient;
use crate::entities::trip_request::{self, Status, VehicleType};
use crate::entities::user;
use crate::error::AppResult;
use crate::services::trip_requests::nearby_driver_tokens;
use crate::utils::geo::haversine_distance;

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub name: String,
    pub phone: Option<String>,
    pub general_client_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct NearbyCandidate {
    #[serde(flatten)]
    pub request: trip_request::Model,
    /// Great-circle distance from the driver to the pickup point
    pub straight_line_km: f64,
    /// Live driving distance/time, absent when the provider is down
    pub driving: Option<MatrixElement>,
    pub client: Option<ClientSummary>,
}

/// Open requests a driver could take: fresh, matching vehicle type, not
/// their own, within the configured radius of their position. Newest
/// first; proximity is annotated, not ranked on.
pub async fn nearby_trip_requests(
    db: &DatabaseConnection,
    maps: &MapsClient,
    driver: LatLng,
    driver_id: Uuid,
    vehicle_type: VehicleType,
    radius_km: f64,
    stale_minutes: i64,
) -> AppResult<Vec<NearbyCandidate>> {
    let cutoff = Utc::now() - Duration::minutes(stale_minutes);

    let open_requests = trip_request::Entity::find()
        .filter(trip_request::Column::Status.eq(Status::Created))
        .filter(trip_request::Column::VehicleType.eq(vehicle_type))
        .filter(trip_request::Column::ClientId.ne(driver_id))
        .filter(trip_request::Column::UpdatedAt.gt(cutoff))
        .order_by_desc(trip_request::Column::Id)
        .all(db)
        .await?;

    let mut candidates: Vec<NearbyCandidate> = open_requests
        .into_iter()
        .filter_map(|request| {
            let km = haversine_distance(
                driver.lat,
                driver.lng,
                request.pickup_lat,
                request.pickup_lng,
            );
            (km <= radius_km).then_some(NearbyCandidate {
                request,
                straight_line_km: km,
                driving: None,
                client: None,
            })
        })
        .collect();

    // Nothing survived the geometric filter; skip the provider round trip
    if candidates.is_empty() {
        return Ok(candidates);
    }

    let client_ids: Vec<Uuid> = candidates.iter().map(|c| c.request.client_id).collect();
    let clients = user::Entity::find()
        .filter(user::Column::Id.is_in(client_ids))
        .all(db)
        .await?;
    for candidate in &mut candidates {
        candidate.client = clients
            .iter()
            .find(|u| u.id == candidate.request.client_id)
            .map(|u| ClientSummary {
                name: u.name.clone(),
                phone: u.phone.clone(),
                general_client_rating: u.general_client_rating,
            });
    }

    let pickups: Vec<LatLng> = candidates
        .iter()
        .map(|c| LatLng::new(c.request.pickup_lat, c.request.pickup_lng))
        .collect();

    // One batched matrix call for the whole candidate set. A provider
    // outage degrades to the unenriched list instead of failing matching.
    match maps.distance_matrix(driver, &pickups).await {
        Ok(matrix) => {
            if let Some(row) = matrix.rows.into_iter().next() {
                for (candidate, element) in candidates.iter_mut().zip(row.elements) {
                    candidate.driving = Some(element);
                }
            }
        }
        Err(e) => {
            tracing::warn!("nearby enrichment skipped, routing provider failed: {}", e);
        }
    }

    Ok(candidates)
}

/// Creation side effect: tell drivers around the pickup point that a new
/// request is up. Best-effort; runs detached from the create call.
pub async fn notify_nearby_drivers(
    db: DatabaseConnection,
    push: PushClient,
    pickup: LatLng,
    radius_km: f64,
    trip_request_id: i64,
    pickup_description: String,
) {
    let tokens = match nearby_driver_tokens(&db, pickup, radius_km).await {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!(trip_request_id, "nearby driver lookup failed: {}", e);
            return;
        }
    };

    if tokens.is_empty() {
        tracing::debug!(trip_request_id, "no nearby drivers to notify");
        return;
    }

    tracing::debug!(trip_request_id, count = tokens.len(), "notifying nearby drivers");
    push.notify_tokens(
        &tokens,
        "New trip request",
        &pickup_description,
        json!({
            "trip_request_id": trip_request_id.to_string(),
            "type": "TRIP_REQUEST",
        }),
    )
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_filter_excludes_far_pickups() {
        let driver = LatLng::new(-23.5505, -46.6333); // São Paulo
        let close = (-23.5609, -46.6560); // Paulista Ave, ~2.5 km
        let far = (-22.9099, -47.0626); // Campinas, ~85 km

        assert!(haversine_distance(driver.lat, driver.lng, close.0, close.1) <= 20.0);
        assert!(haversine_distance(driver.lat, driver.lng, far.0, far.1) > 20.0);
    }
}

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::driver_offer;
use crate::entities::trip_request::{self, Status};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::realtime::{EventBroadcaster, TripEvent};

#[derive(Debug, Clone, Serialize)]
pub struct DriverSummary {
    pub name: String,
    pub phone: Option<String>,
    pub general_driver_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct OfferWithDriver {
    #[serde(flatten)]
    pub offer: driver_offer::Model,
    pub driver: Option<DriverSummary>,
}

/// A driver's competing bid for an open request. Only requests still in
/// `created` take offers; anything later is a conflict.
pub async fn create(
    db: &DatabaseConnection,
    events: &EventBroadcaster,
    trip_request_id: i64,
    driver_id: Uuid,
    fare_offered: f64,
    estimated_time_min: Option<f64>,
    estimated_distance_km: Option<f64>,
) -> AppResult<driver_offer::Model> {
    if !(fare_offered > 0.0) {
        return Err(AppError::BadRequest(
            "Offered fare must be positive".to_string(),
        ));
    }

    let request = trip_request::Entity::find_by_id(trip_request_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip request not found".to_string()))?;

    if request.status != Status::Created {
        return Err(AppError::Conflict(
            "Trip request is no longer accepting offers".to_string(),
        ));
    }

    let offer = driver_offer::ActiveModel {
        trip_request_id: Set(trip_request_id),
        driver_id: Set(driver_id),
        fare_offered: Set(fare_offered),
        estimated_time_min: Set(estimated_time_min),
        estimated_distance_km: Set(estimated_distance_km),
        ..Default::default()
    }
    .insert(db)
    .await?;

    events.publish(TripEvent::OfferCreated {
        trip_request_id,
        offer_id: offer.id,
        driver_id,
        fare_offered,
    });

    Ok(offer)
}

/// Offers for one request in arrival order, with enough driver context
/// for the client to choose.
pub async fn list_by_request(
    db: &DatabaseConnection,
    trip_request_id: i64,
) -> AppResult<Vec<OfferWithDriver>> {
    let offers = driver_offer::Entity::find()
        .filter(driver_offer::Column::TripRequestId.eq(trip_request_id))
        .order_by_asc(driver_offer::Column::Id)
        .all(db)
        .await?;

    if offers.is_empty() {
        return Ok(Vec::new());
    }

    let driver_ids: Vec<Uuid> = offers.iter().map(|o| o.driver_id).collect();
    let drivers = user::Entity::find()
        .filter(user::Column::Id.is_in(driver_ids))
        .all(db)
        .await?;

    Ok(offers
        .into_iter()
        .map(|offer| {
            let driver = drivers
                .iter()
                .find(|d| d.id == offer.driver_id)
                .map(|d| DriverSummary {
                    name: d.name.clone(),
                    phone: d.phone.clone(),
                    general_driver_rating: d.general_driver_rating,
                });
            OfferWithDriver { offer, driver }
        })
        .collect())
}

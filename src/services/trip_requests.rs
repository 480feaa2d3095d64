use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::clients::maps::LatLng;
use crate::entities::trip_request::{
    self, PackageType, PaymentMethod, RequestType, Status, VehicleType,
};
use crate::entities::{driver_position, user};
use crate::error::{AppError, AppResult};
use crate::realtime::{EventBroadcaster, TripEvent};
use crate::utils::code::generate_delivery_code;
use crate::utils::geo::is_valid_coordinate;

/// History views return the most recent N rows
const HISTORY_LIMIT: u64 = 10;

/// Fields common to every request type
#[derive(Debug, Clone)]
pub struct NewTripRequest {
    pub client_id: Uuid,
    pub fare_offered: f64,
    pub pickup_description: String,
    pub pickup_description_plus: Option<String>,
    pub destination_description: String,
    pub destination_description_plus: Option<String>,
    pub pickup: LatLng,
    pub destination: LatLng,
    pub vehicle_type: VehicleType,
    pub payment_method: Option<PaymentMethod>,
    pub distance_text: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_text: Option<String>,
    pub duration_min: Option<f64>,
    pub recommended_fare: Option<f64>,
    pub km_rate: Option<f64>,
    pub min_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ScheduleFields {
    pub scheduled_for: chrono::DateTime<Utc>,
    pub tolerance_minutes: i32,
}

#[derive(Debug, Clone)]
pub struct DeliveryFields {
    pub package_details: String,
    pub package_weight: Option<String>,
    pub package_volume: Option<f64>,
    pub package_type: Option<PackageType>,
    pub is_fragile: bool,
    pub requires_cooling: bool,
    pub requires_signature: bool,
    pub sender_name: String,
    pub sender_phone: String,
    pub receiver_name: String,
    pub receiver_phone: String,
}

/// Driver arrival tolerance comes in 5-minute steps between 15 and 60
pub fn is_valid_tolerance(minutes: i32) -> bool {
    (15..=60).contains(&minutes) && minutes % 5 == 0
}

fn validate_base(input: &NewTripRequest) -> AppResult<()> {
    if !is_valid_coordinate(input.pickup.lat, input.pickup.lng) {
        return Err(AppError::BadRequest("Invalid pickup position".to_string()));
    }
    if !is_valid_coordinate(input.destination.lat, input.destination.lng) {
        return Err(AppError::BadRequest(
            "Invalid destination position".to_string(),
        ));
    }
    if !(input.fare_offered > 0.0) {
        return Err(AppError::BadRequest(
            "Offered fare must be positive".to_string(),
        ));
    }
    if input.pickup_description.trim().is_empty() || input.destination_description.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Pickup and destination descriptions are required".to_string(),
        ));
    }
    Ok(())
}

fn base_active_model(input: &NewTripRequest, request_type: RequestType) -> trip_request::ActiveModel {
    trip_request::ActiveModel {
        client_id: Set(input.client_id),
        fare_offered: Set(input.fare_offered),
        pickup_description: Set(input.pickup_description.clone()),
        pickup_description_plus: Set(input.pickup_description_plus.clone()),
        destination_description: Set(input.destination_description.clone()),
        destination_description_plus: Set(input.destination_description_plus.clone()),
        pickup_lat: Set(input.pickup.lat),
        pickup_lng: Set(input.pickup.lng),
        destination_lat: Set(input.destination.lat),
        destination_lng: Set(input.destination.lng),
        vehicle_type: Set(input.vehicle_type),
        payment_method: Set(input.payment_method.unwrap_or(PaymentMethod::Cash)),
        request_type: Set(request_type),
        status: Set(Status::Created),
        distance_text: Set(input.distance_text.clone()),
        distance_km: Set(input.distance_km),
        duration_text: Set(input.duration_text.clone()),
        duration_min: Set(input.duration_min),
        recommended_fare: Set(input.recommended_fare),
        km_rate: Set(input.km_rate),
        min_rate: Set(input.min_rate),
        ..Default::default()
    }
}

/// Create an on-demand ride request. Returns the new id.
pub async fn create_common(db: &DatabaseConnection, input: &NewTripRequest) -> AppResult<i64> {
    validate_base(input)?;

    let model = base_active_model(input, RequestType::Common).insert(db).await?;
    tracing::info!(trip_request_id = model.id, "trip request created");
    Ok(model.id)
}

/// Create a ride scheduled for a future time window.
pub async fn create_scheduled(
    db: &DatabaseConnection,
    input: &NewTripRequest,
    schedule: &ScheduleFields,
) -> AppResult<i64> {
    validate_base(input)?;

    if schedule.scheduled_for <= Utc::now() {
        return Err(AppError::BadRequest(
            "Scheduled time must be in the future".to_string(),
        ));
    }
    if !is_valid_tolerance(schedule.tolerance_minutes) {
        return Err(AppError::BadRequest(
            "Tolerance must be between 15 and 60 minutes in steps of 5".to_string(),
        ));
    }

    let mut model = base_active_model(input, RequestType::Scheduled);
    model.scheduled_for = Set(Some(schedule.scheduled_for.into()));
    model.tolerance_minutes = Set(Some(schedule.tolerance_minutes));

    let model = model.insert(db).await?;
    tracing::info!(trip_request_id = model.id, "scheduled trip request created");
    Ok(model.id)
}

/// Create a delivery request with a fresh hand-off code. The code column
/// is unique across active deliveries; collisions regenerate and retry.
pub async fn create_delivery(
    db: &DatabaseConnection,
    input: &NewTripRequest,
    delivery: &DeliveryFields,
) -> AppResult<i64> {
    validate_base(input)?;

    if delivery.package_details.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Package details are required".to_string(),
        ));
    }
    if delivery.sender_name.trim().is_empty()
        || delivery.sender_phone.trim().is_empty()
        || delivery.receiver_name.trim().is_empty()
        || delivery.receiver_phone.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "Sender and receiver contact details are required".to_string(),
        ));
    }

    for _attempt in 0..3 {
        let mut model = base_active_model(input, RequestType::Delivery);
        model.package_details = Set(Some(delivery.package_details.clone()));
        model.package_weight = Set(delivery.package_weight.clone());
        model.package_volume = Set(delivery.package_volume);
        model.package_type = Set(Some(delivery.package_type.unwrap_or(PackageType::Undefined)));
        model.is_fragile = Set(delivery.is_fragile);
        model.requires_cooling = Set(delivery.requires_cooling);
        model.requires_signature = Set(delivery.requires_signature);
        model.sender_name = Set(Some(delivery.sender_name.clone()));
        model.sender_phone = Set(Some(delivery.sender_phone.clone()));
        model.receiver_name = Set(Some(delivery.receiver_name.clone()));
        model.receiver_phone = Set(Some(delivery.receiver_phone.clone()));
        model.code = Set(Some(generate_delivery_code()));

        match model.insert(db).await {
            Ok(model) => {
                tracing::info!(trip_request_id = model.id, "delivery trip request created");
                return Ok(model.id);
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!("delivery code collision, regenerating");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::Internal(
        "Could not generate a unique delivery code".to_string(),
    ))
}

/// Accept a request on behalf of a driver. The status condition lives in
/// the UPDATE itself, so two racing drivers resolve to exactly one winner.
pub async fn assign_driver(
    db: &DatabaseConnection,
    events: &EventBroadcaster,
    id: i64,
    driver_id: Uuid,
    fare: f64,
) -> AppResult<()> {
    if !(fare > 0.0) {
        return Err(AppError::BadRequest(
            "Assigned fare must be positive".to_string(),
        ));
    }

    let now = Utc::now();
    let result = trip_request::Entity::update_many()
        .set(trip_request::ActiveModel {
            driver_id: Set(Some(driver_id)),
            fare_assigned: Set(Some(fare)),
            status: Set(Status::Accepted),
            accepted_at: Set(Some(now.into())),
            updated_at: Set(now.into()),
            ..Default::default()
        })
        .filter(trip_request::Column::Id.eq(id))
        .filter(trip_request::Column::Status.eq(Status::Created))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return match trip_request::Entity::find_by_id(id).one(db).await? {
            Some(_) => Err(AppError::Conflict(
                "Trip request was already taken".to_string(),
            )),
            None => Err(AppError::NotFound("Trip request not found".to_string())),
        };
    }

    tracing::info!(trip_request_id = id, %driver_id, "driver assigned");
    events.publish(TripEvent::StatusChanged {
        trip_request_id: id,
        status: Status::Accepted,
    });
    Ok(())
}

/// Move a request to a new status. The decision is made against a row
/// read and locked in the same transaction as the write; finishing a
/// delivery retires its hand-off code in the same UPDATE statement.
pub async fn update_status(
    db: &DatabaseConnection,
    events: &EventBroadcaster,
    id: i64,
    new_status: Status,
) -> AppResult<()> {
    if new_status == Status::Accepted {
        return Err(AppError::BadRequest(
            "Acceptance happens through driver assignment".to_string(),
        ));
    }

    let txn = db.begin().await?;

    let current = trip_request::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip request not found".to_string()))?;

    if !current.status.can_transition(new_status) {
        return Err(AppError::Conflict(format!(
            "Cannot move a {:?} trip request to {:?}",
            current.status, new_status
        )));
    }

    let now = Utc::now();
    let mut update = trip_request::Entity::update_many()
        .set(trip_request::ActiveModel {
            status: Set(new_status),
            updated_at: Set(now.into()),
            ..Default::default()
        })
        .filter(trip_request::Column::Id.eq(id))
        .filter(trip_request::Column::Status.eq(current.status));

    // Stamp the matching _at column the first time this status is reached
    if let Some(column) = new_status.timestamp_column() {
        let already_stamped = match new_status {
            Status::Accepted => current.accepted_at.is_some(),
            Status::Started => current.started_at.is_some(),
            Status::Finished => current.finished_at.is_some(),
            Status::Cancelled => current.cancelled_at.is_some(),
            Status::Expired => current.expired_at.is_some(),
            _ => true,
        };
        if !already_stamped {
            update = update.col_expr(column, Expr::value(now));
        }
    }

    if new_status == Status::Finished && current.request_type == RequestType::Delivery {
        // Retire the hand-off code atomically with the status flip
        update = update.col_expr(
            trip_request::Column::InvalidCode,
            Expr::col(trip_request::Column::Code).into(),
        );
    }

    let result = update.exec(&txn).await?;
    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(AppError::Conflict(
            "Trip request changed concurrently".to_string(),
        ));
    }

    txn.commit().await?;

    tracing::info!(trip_request_id = id, status = ?new_status, "status updated");
    events.publish(TripEvent::StatusChanged {
        trip_request_id: id,
        status: new_status,
    });
    Ok(())
}

pub async fn get_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> AppResult<trip_request::Model> {
    trip_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip request not found".to_string()))
}

/// Fetch only while the request is in a specific phase
pub async fn get_by_id_and_status(
    db: &DatabaseConnection,
    id: i64,
    status: Status,
) -> AppResult<Option<trip_request::Model>> {
    Ok(trip_request::Entity::find()
        .filter(trip_request::Column::Id.eq(id))
        .filter(trip_request::Column::Status.eq(status))
        .one(db)
        .await?)
}

pub async fn active_by_client(
    db: &DatabaseConnection,
    client_id: Uuid,
) -> AppResult<Option<trip_request::Model>> {
    Ok(trip_request::Entity::find()
        .filter(trip_request::Column::ClientId.eq(client_id))
        .filter(trip_request::Column::Status.eq(Status::Accepted))
        .order_by_desc(trip_request::Column::CreatedAt)
        .one(db)
        .await?)
}

pub async fn active_by_driver(
    db: &DatabaseConnection,
    driver_id: Uuid,
) -> AppResult<Option<trip_request::Model>> {
    Ok(trip_request::Entity::find()
        .filter(trip_request::Column::DriverId.eq(driver_id))
        .filter(trip_request::Column::Status.eq(Status::Accepted))
        .order_by_desc(trip_request::Column::CreatedAt)
        .one(db)
        .await?)
}

fn history_statuses() -> [Status; 4] {
    [
        Status::Created,
        Status::Accepted,
        Status::Finished,
        Status::Cancelled,
    ]
}

pub async fn history_by_client(
    db: &DatabaseConnection,
    client_id: Uuid,
    request_type: Option<RequestType>,
) -> AppResult<Vec<trip_request::Model>> {
    let mut query = trip_request::Entity::find()
        .filter(trip_request::Column::ClientId.eq(client_id))
        .filter(trip_request::Column::Status.is_in(history_statuses()));
    if let Some(request_type) = request_type {
        query = query.filter(trip_request::Column::RequestType.eq(request_type));
    }
    Ok(query
        .order_by_desc(trip_request::Column::Id)
        .limit(HISTORY_LIMIT)
        .all(db)
        .await?)
}

pub async fn history_by_driver(
    db: &DatabaseConnection,
    driver_id: Uuid,
    request_type: Option<RequestType>,
) -> AppResult<Vec<trip_request::Model>> {
    let mut query = trip_request::Entity::find()
        .filter(trip_request::Column::DriverId.eq(driver_id))
        .filter(trip_request::Column::Status.is_in(history_statuses()));
    if let Some(request_type) = request_type {
        query = query.filter(trip_request::Column::RequestType.eq(request_type));
    }
    Ok(query
        .order_by_desc(trip_request::Column::Id)
        .limit(HISTORY_LIMIT)
        .all(db)
        .await?)
}

/// Cheap existence check other subsystems use to stop writing against a
/// request that is already closed
pub async fn check_terminal(db: &DatabaseConnection, id: i64) -> AppResult<bool> {
    let found = trip_request::Entity::find()
        .select_only()
        .column(trip_request::Column::Id)
        .filter(trip_request::Column::Id.eq(id))
        .filter(
            trip_request::Column::Status.is_in([Status::Finished, Status::Cancelled]),
        )
        .into_tuple::<i64>()
        .one(db)
        .await?;
    Ok(found.is_some())
}

/// A trip report can be filed once; the null-check rides in the UPDATE so
/// a double submit loses cleanly.
pub async fn update_client_report(
    db: &DatabaseConnection,
    id: i64,
    report: String,
) -> AppResult<()> {
    if report.trim().is_empty() {
        return Err(AppError::BadRequest("Report text is required".to_string()));
    }

    let result = trip_request::Entity::update_many()
        .set(trip_request::ActiveModel {
            client_report: Set(Some(report)),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(trip_request::Column::Id.eq(id))
        .filter(trip_request::Column::ClientReport.is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return match trip_request::Entity::find_by_id(id).one(db).await? {
            Some(_) => Err(AppError::Conflict(
                "A client report was already filed for this trip".to_string(),
            )),
            None => Err(AppError::NotFound("Trip request not found".to_string())),
        };
    }
    Ok(())
}

pub async fn update_driver_report(
    db: &DatabaseConnection,
    id: i64,
    report: String,
) -> AppResult<()> {
    if report.trim().is_empty() {
        return Err(AppError::BadRequest("Report text is required".to_string()));
    }

    let result = trip_request::Entity::update_many()
        .set(trip_request::ActiveModel {
            driver_report: Set(Some(report)),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(trip_request::Column::Id.eq(id))
        .filter(trip_request::Column::DriverReport.is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return match trip_request::Entity::find_by_id(id).one(db).await? {
            Some(_) => Err(AppError::Conflict(
                "A driver report was already filed for this trip".to_string(),
            )),
            None => Err(AppError::NotFound("Trip request not found".to_string())),
        };
    }
    Ok(())
}

/// Record a driver position ping; optionally refresh the live snapshot on
/// the driver's open trip and broadcast it.
pub async fn update_driver_position(
    db: &DatabaseConnection,
    events: &EventBroadcaster,
    driver_id: Uuid,
    position: LatLng,
    trip_request_id: Option<i64>,
) -> AppResult<()> {
    if !is_valid_coordinate(position.lat, position.lng) {
        return Err(AppError::BadRequest("Invalid position".to_string()));
    }

    let now = Utc::now();
    driver_position::Entity::insert(driver_position::ActiveModel {
        driver_id: Set(driver_id),
        lat: Set(position.lat),
        lng: Set(position.lng),
        updated_at: Set(now.into()),
    })
    .on_conflict(
        OnConflict::column(driver_position::Column::DriverId)
            .update_columns([
                driver_position::Column::Lat,
                driver_position::Column::Lng,
                driver_position::Column::UpdatedAt,
            ])
            .to_owned(),
    )
    .exec(db)
    .await?;

    if let Some(id) = trip_request_id {
        let result = trip_request::Entity::update_many()
            .set(trip_request::ActiveModel {
                driver_lat: Set(Some(position.lat)),
                driver_lng: Set(Some(position.lng)),
                updated_at: Set(now.into()),
                ..Default::default()
            })
            .filter(trip_request::Column::Id.eq(id))
            .filter(trip_request::Column::DriverId.eq(driver_id))
            .filter(
                trip_request::Column::Status
                    .is_not_in([Status::Finished, Status::Cancelled, Status::Expired]),
            )
            .exec(db)
            .await?;

        if result.rows_affected > 0 {
            events.publish(TripEvent::DriverPosition {
                trip_request_id: id,
                lat: position.lat,
                lng: position.lng,
            });
        }
    }

    Ok(())
}

/// Drivers whose last known position is inside the notification radius of
/// a pickup point, deduplicated to their usable push tokens.
pub async fn nearby_driver_tokens(
    db: &DatabaseConnection,
    pickup: LatLng,
    radius_km: f64,
) -> AppResult<Vec<String>> {
    let positions = driver_position::Entity::find().all(db).await?;
    let nearby: Vec<Uuid> = positions
        .iter()
        .filter(|p| {
            crate::utils::geo::is_within_radius(p.lat, p.lng, pickup.lat, pickup.lng, radius_km)
        })
        .map(|p| p.driver_id)
        .collect();

    if nearby.is_empty() {
        return Ok(Vec::new());
    }

    let drivers = user::Entity::find()
        .filter(user::Column::Id.is_in(nearby))
        .filter(user::Column::Role.eq(user::UserRole::Driver))
        .all(db)
        .await?;

    let mut tokens = Vec::new();
    for driver in drivers {
        if let Some(token) = driver.notification_token {
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_steps() {
        for valid in [15, 20, 25, 30, 35, 40, 45, 50, 55, 60] {
            assert!(is_valid_tolerance(valid), "{}", valid);
        }
        for invalid in [0, 10, 14, 17, 61, 65, -15] {
            assert!(!is_valid_tolerance(invalid), "{}", invalid);
        }
    }
}

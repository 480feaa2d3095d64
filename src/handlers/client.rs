use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clients::maps::LatLng;
use crate::entities::trip_request::{
    self, PackageType, PaymentMethod, RequestType, Status, VehicleType,
};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::services::matching::{notify_nearby_drivers, ClientSummary};
use crate::services::offers::{self, DriverSummary, OfferWithDriver};
use crate::services::trip_requests::{
    self, DeliveryFields, NewTripRequest, ScheduleFields,
};
use crate::services::{delivery_code, ratings};
use crate::utils::jwt::Claims;
use crate::AppState;

/// One payload covers all three request kinds; the type-specific fields
/// are validated by the matching create endpoint.
#[derive(Debug, Deserialize)]
pub struct CreateTripPayload {
    pub fare_offered: f64,
    pub pickup_description: String,
    pub pickup_description_plus: Option<String>,
    pub destination_description: String,
    pub destination_description_plus: Option<String>,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    pub vehicle_type: VehicleType,
    pub payment_method: Option<PaymentMethod>,
    pub distance_text: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_text: Option<String>,
    pub duration_min: Option<f64>,
    pub recommended_fare: Option<f64>,
    pub km_rate: Option<f64>,
    pub min_rate: Option<f64>,
    // Scheduled trips
    pub scheduled_for: Option<DateTime<Utc>>,
    pub tolerance_minutes: Option<i32>,
    // Deliveries
    pub package_details: Option<String>,
    pub package_weight: Option<String>,
    pub package_volume: Option<f64>,
    pub package_type: Option<PackageType>,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub requires_cooling: bool,
    #[serde(default)]
    pub requires_signature: bool,
    pub sender_name: Option<String>,
    pub sender_phone: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
}

impl CreateTripPayload {
    fn base(&self, client_id: Uuid) -> NewTripRequest {
        NewTripRequest {
            client_id,
            fare_offered: self.fare_offered,
            pickup_description: self.pickup_description.clone(),
            pickup_description_plus: self.pickup_description_plus.clone(),
            destination_description: self.destination_description.clone(),
            destination_description_plus: self.destination_description_plus.clone(),
            pickup: LatLng::new(self.pickup_lat, self.pickup_lng),
            destination: LatLng::new(self.destination_lat, self.destination_lng),
            vehicle_type: self.vehicle_type,
            payment_method: self.payment_method,
            distance_text: self.distance_text.clone(),
            distance_km: self.distance_km,
            duration_text: self.duration_text.clone(),
            duration_min: self.duration_min,
            recommended_fare: self.recommended_fare,
            km_rate: self.km_rate,
            min_rate: self.min_rate,
        }
    }

    fn schedule(&self) -> AppResult<ScheduleFields> {
        let scheduled_for = self.scheduled_for.ok_or_else(|| {
            AppError::BadRequest("scheduled_for is required for scheduled trips".to_string())
        })?;
        let tolerance_minutes = self.tolerance_minutes.ok_or_else(|| {
            AppError::BadRequest("tolerance_minutes is required for scheduled trips".to_string())
        })?;
        Ok(ScheduleFields {
            scheduled_for,
            tolerance_minutes,
        })
    }

    fn delivery(&self) -> AppResult<DeliveryFields> {
        let required = |field: &Option<String>, name: &str| {
            field.clone().ok_or_else(|| {
                AppError::BadRequest(format!("{} is required for deliveries", name))
            })
        };
        Ok(DeliveryFields {
            package_details: required(&self.package_details, "package_details")?,
            package_weight: self.package_weight.clone(),
            package_volume: self.package_volume,
            package_type: self.package_type,
            is_fragile: self.is_fragile,
            requires_cooling: self.requires_cooling,
            requires_signature: self.requires_signature,
            sender_name: required(&self.sender_name, "sender_name")?,
            sender_phone: required(&self.sender_phone, "sender_phone")?,
            receiver_name: required(&self.receiver_name, "receiver_name")?,
            receiver_phone: required(&self.receiver_phone, "receiver_phone")?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

fn spawn_driver_notification(state: &AppState, payload: &CreateTripPayload, id: i64) {
    let db = state.db.clone();
    let push = state.push.clone();
    let pickup = LatLng::new(payload.pickup_lat, payload.pickup_lng);
    let radius = state.config.nearby_radius_km;
    let description = payload.pickup_description.clone();
    tokio::spawn(async move {
        notify_nearby_drivers(db, push, pickup, radius, id, description).await;
    });
}

/// Create an on-demand trip request
pub async fn create_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTripPayload>,
) -> AppResult<Json<CreatedResponse>> {
    let id = trip_requests::create_common(&state.db, &payload.base(claims.sub)).await?;
    spawn_driver_notification(&state, &payload, id);
    Ok(Json(CreatedResponse { id }))
}

/// Create a trip scheduled for later
pub async fn create_scheduled_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTripPayload>,
) -> AppResult<Json<CreatedResponse>> {
    let schedule = payload.schedule()?;
    let id =
        trip_requests::create_scheduled(&state.db, &payload.base(claims.sub), &schedule).await?;
    spawn_driver_notification(&state, &payload, id);
    Ok(Json(CreatedResponse { id }))
}

/// Create a package delivery request
pub async fn create_delivery_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTripPayload>,
) -> AppResult<Json<CreatedResponse>> {
    let delivery = payload.delivery()?;
    let id =
        trip_requests::create_delivery(&state.db, &payload.base(claims.sub), &delivery).await?;
    spawn_driver_notification(&state, &payload, id);
    Ok(Json(CreatedResponse { id }))
}

#[derive(Debug, Serialize)]
pub struct TripDetailResponse {
    #[serde(flatten)]
    pub trip: trip_request::Model,
    pub client: Option<ClientSummary>,
    pub driver: Option<DriverSummary>,
}

pub async fn build_trip_detail(
    db: &DatabaseConnection,
    trip: trip_request::Model,
) -> AppResult<TripDetailResponse> {
    let mut ids = vec![trip.client_id];
    if let Some(driver_id) = trip.driver_id {
        ids.push(driver_id);
    }
    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;

    let client = users
        .iter()
        .find(|u| u.id == trip.client_id)
        .map(|u| ClientSummary {
            name: u.name.clone(),
            phone: u.phone.clone(),
            general_client_rating: u.general_client_rating,
        });
    let driver = trip.driver_id.and_then(|driver_id| {
        users
            .iter()
            .find(|u| u.id == driver_id)
            .map(|u| DriverSummary {
                name: u.name.clone(),
                phone: u.phone.clone(),
                general_driver_rating: u.general_driver_rating,
            })
    });

    Ok(TripDetailResponse {
        trip,
        client,
        driver,
    })
}

/// Fetch a trip only while it is still waiting for a driver
pub async fn get_created_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TripDetailResponse>> {
    let trip = trip_requests::get_by_id_and_status(&state.db, id, Status::Created)
        .await?
        .ok_or_else(|| AppError::NotFound("No created trip request with this id".to_string()))?;
    Ok(Json(build_trip_detail(&state.db, trip).await?))
}

/// Fetch a trip only once a driver has accepted it
pub async fn get_accepted_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TripDetailResponse>> {
    let trip = trip_requests::get_by_id_and_status(&state.db, id, Status::Accepted)
        .await?
        .ok_or_else(|| AppError::NotFound("No accepted trip request with this id".to_string()))?;
    Ok(Json(build_trip_detail(&state.db, trip).await?))
}

/// The client's current accepted trip, if any
pub async fn active_trip(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Option<trip_request::Model>>> {
    Ok(Json(
        trip_requests::active_by_client(&state.db, claims.sub).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub request_type: Option<RequestType>,
}

/// The client's most recent trips, optionally narrowed to one kind
pub async fn trip_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<trip_request::Model>>> {
    Ok(Json(
        trip_requests::history_by_client(&state.db, claims.sub, query.request_type).await?,
    ))
}

/// Competing driver offers for one of the client's requests
pub async fn trip_offers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OfferWithDriver>>> {
    Ok(Json(offers::list_by_request(&state.db, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: Uuid,
    pub fare: f64,
}

/// Accept one of the competing offers; exactly one acceptance can win
pub async fn assign_driver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignDriverRequest>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::assign_driver(&state.db, &state.events, id, payload.driver_id, payload.fare)
        .await?;
    Ok(Json(serde_json::json!({ "message": "Driver assigned" })))
}

/// Cancel the trip; rejected once it is finished
pub async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::update_status(&state.db, &state.events, id, Status::Cancelled).await?;
    Ok(Json(serde_json::json!({ "message": "Trip cancelled" })))
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: f64,
}

/// Rate the driver after the trip closes
pub async fn rate_driver(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RatingRequest>,
) -> AppResult<Json<serde_json::Value>> {
    ratings::rate_driver(&state.db, id, payload.rating).await?;
    Ok(Json(serde_json::json!({ "message": "Driver rated" })))
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub report: String,
}

/// File the client's one-off report for this trip
pub async fn file_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReportRequest>,
) -> AppResult<Json<serde_json::Value>> {
    trip_requests::update_client_report(&state.db, id, payload.report).await?;
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

/// Loose delivery-code check (ignores retirement)
pub async fn verify_delivery_code(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<CodeQuery>,
) -> AppResult<Json<CodeCheckResponse>> {
    let valid = delivery_code::verify(&state.db, id, &query.code).await?;
    Ok(Json(CodeCheckResponse { valid }))
}

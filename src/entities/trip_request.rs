use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trip_status")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "on_the_way")]
    OnTheWay,
    #[sea_orm(string_value = "arrived")]
    Arrived,
    #[sea_orm(string_value = "travelling")]
    Travelling,
    #[sea_orm(string_value = "started")]
    Started,
    #[sea_orm(string_value = "finished")]
    Finished,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl Status {
    /// Closed states: nothing transitions out of these.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Finished | Status::Cancelled)
    }

    fn rank(self) -> Option<u8> {
        match self {
            Status::Created => Some(0),
            Status::Accepted => Some(1),
            Status::OnTheWay => Some(2),
            Status::Arrived => Some(3),
            Status::Travelling => Some(4),
            Status::Started => Some(5),
            Status::Finished => Some(6),
            Status::Cancelled | Status::Expired => None,
        }
    }

    /// Whether the status graph permits moving from `self` to `to`.
    ///
    /// Cancellation and expiry are reachable from any non-terminal state;
    /// the ride path itself only moves forward. An expired request can
    /// still be cancelled, nothing else.
    pub fn can_transition(self, to: Status) -> bool {
        if self.is_terminal() || self == to {
            return false;
        }
        match to {
            Status::Cancelled | Status::Expired => true,
            Status::Created => false,
            _ => match (self.rank(), to.rank()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }

    /// The `_at` column stamped on first entry into this status, if any.
    pub fn timestamp_column(self) -> Option<Column> {
        match self {
            Status::Accepted => Some(Column::AcceptedAt),
            Status::Started => Some(Column::StartedAt),
            Status::Finished => Some(Column::FinishedAt),
            Status::Cancelled => Some(Column::CancelledAt),
            Status::Expired => Some(Column::ExpiredAt),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trip_request_type")]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[sea_orm(string_value = "common")]
    Common,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "delivery")]
    Delivery,
    #[sea_orm(string_value = "freight")]
    Freight,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "vehicle_type")]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[sea_orm(string_value = "car")]
    Car,
    #[sea_orm(string_value = "motorcycle")]
    Motorcycle,
    #[sea_orm(string_value = "bicycle")]
    Bicycle,
    #[sea_orm(string_value = "truck")]
    Truck,
    #[sea_orm(string_value = "van")]
    Van,
    #[sea_orm(string_value = "helicopter")]
    Helicopter,
    #[sea_orm(string_value = "drone")]
    Drone,
    #[sea_orm(string_value = "jet")]
    Jet,
    #[sea_orm(string_value = "boat")]
    Boat,
    #[sea_orm(string_value = "jet_ski")]
    JetSki,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "pix")]
    Pix,
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    #[sea_orm(string_value = "debit_card")]
    DebitCard,
    #[sea_orm(string_value = "wallet")]
    Wallet,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "package_type")]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    #[sea_orm(string_value = "box")]
    Box,
    #[sea_orm(string_value = "document")]
    Document,
    #[sea_orm(string_value = "bag")]
    Bag,
    #[sea_orm(string_value = "envelope")]
    Envelope,
    #[sea_orm(string_value = "other")]
    Other,
    #[sea_orm(string_value = "undefined")]
    Undefined,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: Uuid,
    pub driver_id: Option<Uuid>,

    pub pickup_description: String,
    pub pickup_description_plus: Option<String>,
    pub destination_description: String,
    pub destination_description_plus: Option<String>,
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub destination_lat: f64,
    pub destination_lng: f64,
    // Live snapshot; the only geometry that moves after the trip starts
    pub driver_lat: Option<f64>,
    pub driver_lng: Option<f64>,

    pub fare_offered: f64,
    pub fare_assigned: Option<f64>,
    pub recommended_fare: Option<f64>,
    pub km_rate: Option<f64>,
    pub min_rate: Option<f64>,
    pub distance_text: Option<String>,
    pub distance_km: Option<f64>,
    pub duration_text: Option<String>,
    pub duration_min: Option<f64>,

    pub payment_method: PaymentMethod,
    pub total_fare: Option<f64>,
    pub platform_fee: Option<f64>,
    pub driver_earnings: Option<f64>,
    pub is_paid: bool,

    pub request_type: RequestType,
    pub vehicle_type: VehicleType,
    pub status: Status,

    pub scheduled_for: Option<DateTimeWithTimeZone>,
    pub tolerance_minutes: Option<i32>,

    pub package_details: Option<String>,
    pub package_weight: Option<String>,
    pub package_volume: Option<f64>,
    pub package_type: Option<PackageType>,
    pub is_fragile: bool,
    pub requires_cooling: bool,
    pub requires_signature: bool,
    pub sender_name: Option<String>,
    pub sender_phone: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    #[sea_orm(unique)]
    pub code: Option<String>,
    pub invalid_code: Option<String>,

    pub client_rating: Option<f64>,
    pub driver_rating: Option<f64>,
    pub client_report: Option<String>,
    pub driver_report: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub accepted_at: Option<DateTimeWithTimeZone>,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub finished_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub expired_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ClientId",
        to = "super::user::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DriverId",
        to = "super::user::Column::Id"
    )]
    Driver,
    #[sea_orm(has_many = "super::driver_offer::Entity")]
    Offers,
}

impl Related<super::driver_offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ride_path_moves_forward_only() {
        assert!(Status::Created.can_transition(Status::Accepted));
        assert!(Status::Accepted.can_transition(Status::OnTheWay));
        assert!(Status::OnTheWay.can_transition(Status::Arrived));
        assert!(Status::Arrived.can_transition(Status::Travelling));
        assert!(Status::Travelling.can_transition(Status::Started));
        assert!(Status::Started.can_transition(Status::Finished));

        // Skipping ahead is allowed, walking back is not
        assert!(Status::Accepted.can_transition(Status::Finished));
        assert!(!Status::Arrived.can_transition(Status::OnTheWay));
        assert!(!Status::Started.can_transition(Status::Created));
    }

    #[test]
    fn cancel_and_expire_reachable_from_any_open_state() {
        for from in [
            Status::Created,
            Status::Accepted,
            Status::OnTheWay,
            Status::Arrived,
            Status::Travelling,
            Status::Started,
        ] {
            assert!(from.can_transition(Status::Cancelled), "{:?}", from);
            assert!(from.can_transition(Status::Expired), "{:?}", from);
        }
    }

    #[test]
    fn nothing_leaves_a_terminal_state() {
        for to in [
            Status::Created,
            Status::Accepted,
            Status::OnTheWay,
            Status::Arrived,
            Status::Travelling,
            Status::Started,
            Status::Finished,
            Status::Cancelled,
            Status::Expired,
        ] {
            assert!(!Status::Finished.can_transition(to), "{:?}", to);
            assert!(!Status::Cancelled.can_transition(to), "{:?}", to);
        }
    }

    #[test]
    fn cancelling_a_finished_trip_is_rejected() {
        assert!(!Status::Finished.can_transition(Status::Cancelled));
    }

    #[test]
    fn expired_can_only_be_cancelled() {
        assert!(Status::Expired.can_transition(Status::Cancelled));
        assert!(!Status::Expired.can_transition(Status::Accepted));
        assert!(!Status::Expired.can_transition(Status::Finished));
    }

    #[test]
    fn self_transition_is_rejected() {
        assert!(!Status::Travelling.can_transition(Status::Travelling));
    }

    #[test]
    fn timestamp_columns_match_their_status() {
        assert!(Status::Created.timestamp_column().is_none());
        assert!(Status::OnTheWay.timestamp_column().is_none());
        assert!(matches!(
            Status::Finished.timestamp_column(),
            Some(Column::FinishedAt)
        ));
        assert!(matches!(
            Status::Cancelled.timestamp_column(),
            Some(Column::CancelledAt)
        ));
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver_offer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trip_request_id: i64,
    pub driver_id: Uuid,
    pub fare_offered: f64,
    pub estimated_time_min: Option<f64>,
    pub estimated_distance_km: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip_request::Entity",
        from = "Column::TripRequestId",
        to = "super::trip_request::Column::Id"
    )]
    TripRequest,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DriverId",
        to = "super::user::Column::Id"
    )]
    Driver,
}

impl Related<super::trip_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripRequest.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

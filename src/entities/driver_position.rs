use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Last reported position per driver, upserted on every ping.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver_position")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub driver_id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DriverId",
        to = "super::user::Column::Id"
    )]
    Driver,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Single-row runtime rate configuration. Estimation re-reads this on
/// every call so admin updates take effect immediately.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fare_rates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub km_rate_car: f64,
    pub min_rate_car: f64,
    pub km_rate_motorcycle: f64,
    pub min_rate_motorcycle: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

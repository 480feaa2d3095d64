pub use sea_orm_migration::prelude::*;

mod m20260115_000001_create_users;
mod m20260115_000002_create_fare_rates;
mod m20260115_000003_create_trip_requests;
mod m20260115_000004_create_driver_positions;
mod m20260115_000005_create_driver_offers;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_create_users::Migration),
            Box::new(m20260115_000002_create_fare_rates::Migration),
            Box::new(m20260115_000003_create_trip_requests::Migration),
            Box::new(m20260115_000004_create_driver_positions::Migration),
            Box::new(m20260115_000005_create_driver_offers::Migration),
        ]
    }
}

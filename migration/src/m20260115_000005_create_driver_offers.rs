use sea_orm_migration::{prelude::*, schema::*};

use super::m20260115_000001_create_users::User;
use super::m20260115_000003_create_trip_requests::TripRequest;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverOffer::Table)
                    .if_not_exists()
                    .col(big_integer(DriverOffer::Id).auto_increment().primary_key())
                    .col(big_integer(DriverOffer::TripRequestId).not_null())
                    .col(uuid(DriverOffer::DriverId).not_null())
                    .col(double(DriverOffer::FareOffered).not_null())
                    .col(double_null(DriverOffer::EstimatedTimeMin))
                    .col(double_null(DriverOffer::EstimatedDistanceKm))
                    .col(
                        timestamp_with_time_zone(DriverOffer::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(DriverOffer::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_offer_trip_request")
                            .from(DriverOffer::Table, DriverOffer::TripRequestId)
                            .to(TripRequest::Table, TripRequest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_offer_driver")
                            .from(DriverOffer::Table, DriverOffer::DriverId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverOffer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DriverOffer {
    Table,
    Id,
    TripRequestId,
    DriverId,
    FareOffered,
    EstimatedTimeMin,
    EstimatedDistanceKm,
    CreatedAt,
    UpdatedAt,
}

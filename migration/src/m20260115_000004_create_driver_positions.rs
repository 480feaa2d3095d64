use sea_orm_migration::{prelude::*, schema::*};

use super::m20260115_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DriverPosition::Table)
                    .if_not_exists()
                    .col(uuid(DriverPosition::DriverId).primary_key())
                    .col(double(DriverPosition::Lat).not_null())
                    .col(double(DriverPosition::Lng).not_null())
                    .col(
                        timestamp_with_time_zone(DriverPosition::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_driver_position_driver")
                            .from(DriverPosition::Table, DriverPosition::DriverId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DriverPosition::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DriverPosition {
    Table,
    DriverId,
    Lat,
    Lng,
    UpdatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FareRates::Table)
                    .if_not_exists()
                    .col(pk_auto(FareRates::Id))
                    .col(double(FareRates::KmRateCar).not_null())
                    .col(double(FareRates::MinRateCar).not_null())
                    .col(double(FareRates::KmRateMotorcycle).not_null())
                    .col(double(FareRates::MinRateMotorcycle).not_null())
                    .to_owned(),
            )
            .await?;

        // Seed the single settings row the estimator reads
        let seed = Query::insert()
            .into_table(FareRates::Table)
            .columns([
                FareRates::Id,
                FareRates::KmRateCar,
                FareRates::MinRateCar,
                FareRates::KmRateMotorcycle,
                FareRates::MinRateMotorcycle,
            ])
            .values_panic([1.into(), 2.00.into(), 0.50.into(), 1.20.into(), 0.30.into()])
            .to_owned();

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FareRates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FareRates {
    Table,
    Id,
    KmRateCar,
    MinRateCar,
    KmRateMotorcycle,
    MinRateMotorcycle,
}

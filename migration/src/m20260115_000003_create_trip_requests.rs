use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

use super::m20260115_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(TripStatus::Enum)
                    .values([
                        TripStatus::Created,
                        TripStatus::Accepted,
                        TripStatus::OnTheWay,
                        TripStatus::Arrived,
                        TripStatus::Travelling,
                        TripStatus::Started,
                        TripStatus::Finished,
                        TripStatus::Cancelled,
                        TripStatus::Expired,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(TripRequestType::Enum)
                    .values([
                        TripRequestType::Common,
                        TripRequestType::Scheduled,
                        TripRequestType::Delivery,
                        TripRequestType::Freight,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(VehicleType::Enum)
                    .values([
                        VehicleType::Car,
                        VehicleType::Motorcycle,
                        VehicleType::Bicycle,
                        VehicleType::Truck,
                        VehicleType::Van,
                        VehicleType::Helicopter,
                        VehicleType::Drone,
                        VehicleType::Jet,
                        VehicleType::Boat,
                        VehicleType::JetSki,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(PaymentMethod::Enum)
                    .values([
                        PaymentMethod::Cash,
                        PaymentMethod::Pix,
                        PaymentMethod::CreditCard,
                        PaymentMethod::DebitCard,
                        PaymentMethod::Wallet,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(PackageType::Enum)
                    .values([
                        PackageType::Box,
                        PackageType::Document,
                        PackageType::Bag,
                        PackageType::Envelope,
                        PackageType::Other,
                        PackageType::Undefined,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripRequest::Table)
                    .if_not_exists()
                    .col(big_integer(TripRequest::Id).auto_increment().primary_key())
                    .col(uuid(TripRequest::ClientId).not_null())
                    .col(uuid_null(TripRequest::DriverId))
                    .col(string(TripRequest::PickupDescription).not_null())
                    .col(string_null(TripRequest::PickupDescriptionPlus))
                    .col(string(TripRequest::DestinationDescription).not_null())
                    .col(string_null(TripRequest::DestinationDescriptionPlus))
                    .col(double(TripRequest::PickupLat).not_null())
                    .col(double(TripRequest::PickupLng).not_null())
                    .col(double(TripRequest::DestinationLat).not_null())
                    .col(double(TripRequest::DestinationLng).not_null())
                    .col(double_null(TripRequest::DriverLat))
                    .col(double_null(TripRequest::DriverLng))
                    .col(double(TripRequest::FareOffered).not_null())
                    .col(double_null(TripRequest::FareAssigned))
                    .col(double_null(TripRequest::RecommendedFare))
                    .col(double_null(TripRequest::KmRate))
                    .col(double_null(TripRequest::MinRate))
                    .col(string_null(TripRequest::DistanceText))
                    .col(double_null(TripRequest::DistanceKm))
                    .col(string_null(TripRequest::DurationText))
                    .col(double_null(TripRequest::DurationMin))
                    .col(
                        ColumnDef::new(TripRequest::PaymentMethod)
                            .custom(PaymentMethod::Enum)
                            .not_null(),
                    )
                    .col(double_null(TripRequest::TotalFare))
                    .col(double_null(TripRequest::PlatformFee))
                    .col(double_null(TripRequest::DriverEarnings))
                    .col(boolean(TripRequest::IsPaid).not_null().default(false))
                    .col(
                        ColumnDef::new(TripRequest::RequestType)
                            .custom(TripRequestType::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRequest::VehicleType)
                            .custom(VehicleType::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRequest::Status)
                            .custom(TripStatus::Enum)
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(TripRequest::ScheduledFor))
                    .col(integer_null(TripRequest::ToleranceMinutes))
                    .col(string_null(TripRequest::PackageDetails))
                    .col(string_len_null(TripRequest::PackageWeight, 20))
                    .col(double_null(TripRequest::PackageVolume))
                    .col(
                        ColumnDef::new(TripRequest::PackageType)
                            .custom(PackageType::Enum)
                            .null(),
                    )
                    .col(boolean(TripRequest::IsFragile).not_null().default(false))
                    .col(boolean(TripRequest::RequiresCooling).not_null().default(false))
                    .col(boolean(TripRequest::RequiresSignature).not_null().default(false))
                    .col(string_null(TripRequest::SenderName))
                    .col(string_len_null(TripRequest::SenderPhone, 20))
                    .col(string_null(TripRequest::ReceiverName))
                    .col(string_len_null(TripRequest::ReceiverPhone, 20))
                    .col(string_len_null(TripRequest::Code, 6).unique_key())
                    .col(string_len_null(TripRequest::InvalidCode, 6))
                    .col(double_null(TripRequest::ClientRating))
                    .col(double_null(TripRequest::DriverRating))
                    .col(string_len_null(TripRequest::ClientReport, 500))
                    .col(string_len_null(TripRequest::DriverReport, 500))
                    .col(
                        timestamp_with_time_zone(TripRequest::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(TripRequest::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(TripRequest::AcceptedAt))
                    .col(timestamp_with_time_zone_null(TripRequest::StartedAt))
                    .col(timestamp_with_time_zone_null(TripRequest::FinishedAt))
                    .col(timestamp_with_time_zone_null(TripRequest::CancelledAt))
                    .col(timestamp_with_time_zone_null(TripRequest::ExpiredAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_request_client")
                            .from(TripRequest::Table, TripRequest::ClientId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_request_driver")
                            .from(TripRequest::Table, TripRequest::DriverId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The matching engine scans open requests by vehicle type
        manager
            .create_index(
                Index::create()
                    .name("idx_trip_request_status_vehicle")
                    .table(TripRequest::Table)
                    .col(TripRequest::Status)
                    .col(TripRequest::VehicleType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TripRequest::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(TripStatus::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(TripRequestType::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(VehicleType::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(PaymentMethod::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(PackageType::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TripRequest {
    Table,
    Id,
    ClientId,
    DriverId,
    PickupDescription,
    PickupDescriptionPlus,
    DestinationDescription,
    DestinationDescriptionPlus,
    PickupLat,
    PickupLng,
    DestinationLat,
    DestinationLng,
    DriverLat,
    DriverLng,
    FareOffered,
    FareAssigned,
    RecommendedFare,
    KmRate,
    MinRate,
    DistanceText,
    DistanceKm,
    DurationText,
    DurationMin,
    PaymentMethod,
    TotalFare,
    PlatformFee,
    DriverEarnings,
    IsPaid,
    RequestType,
    VehicleType,
    Status,
    ScheduledFor,
    ToleranceMinutes,
    PackageDetails,
    PackageWeight,
    PackageVolume,
    PackageType,
    IsFragile,
    RequiresCooling,
    RequiresSignature,
    SenderName,
    SenderPhone,
    ReceiverName,
    ReceiverPhone,
    Code,
    InvalidCode,
    ClientRating,
    DriverRating,
    ClientReport,
    DriverReport,
    CreatedAt,
    UpdatedAt,
    AcceptedAt,
    StartedAt,
    FinishedAt,
    CancelledAt,
    ExpiredAt,
}

#[derive(DeriveIden)]
pub enum TripStatus {
    #[sea_orm(iden = "trip_status")]
    Enum,
    #[sea_orm(iden = "created")]
    Created,
    #[sea_orm(iden = "accepted")]
    Accepted,
    #[sea_orm(iden = "on_the_way")]
    OnTheWay,
    #[sea_orm(iden = "arrived")]
    Arrived,
    #[sea_orm(iden = "travelling")]
    Travelling,
    #[sea_orm(iden = "started")]
    Started,
    #[sea_orm(iden = "finished")]
    Finished,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
    #[sea_orm(iden = "expired")]
    Expired,
}

#[derive(DeriveIden)]
pub enum TripRequestType {
    #[sea_orm(iden = "trip_request_type")]
    Enum,
    #[sea_orm(iden = "common")]
    Common,
    #[sea_orm(iden = "scheduled")]
    Scheduled,
    #[sea_orm(iden = "delivery")]
    Delivery,
    #[sea_orm(iden = "freight")]
    Freight,
}

#[derive(DeriveIden)]
pub enum VehicleType {
    #[sea_orm(iden = "vehicle_type")]
    Enum,
    #[sea_orm(iden = "car")]
    Car,
    #[sea_orm(iden = "motorcycle")]
    Motorcycle,
    #[sea_orm(iden = "bicycle")]
    Bicycle,
    #[sea_orm(iden = "truck")]
    Truck,
    #[sea_orm(iden = "van")]
    Van,
    #[sea_orm(iden = "helicopter")]
    Helicopter,
    #[sea_orm(iden = "drone")]
    Drone,
    #[sea_orm(iden = "jet")]
    Jet,
    #[sea_orm(iden = "boat")]
    Boat,
    #[sea_orm(iden = "jet_ski")]
    JetSki,
}

#[derive(DeriveIden)]
pub enum PaymentMethod {
    #[sea_orm(iden = "payment_method")]
    Enum,
    #[sea_orm(iden = "cash")]
    Cash,
    #[sea_orm(iden = "pix")]
    Pix,
    #[sea_orm(iden = "credit_card")]
    CreditCard,
    #[sea_orm(iden = "debit_card")]
    DebitCard,
    #[sea_orm(iden = "wallet")]
    Wallet,
}

#[derive(DeriveIden)]
pub enum PackageType {
    #[sea_orm(iden = "package_type")]
    Enum,
    #[sea_orm(iden = "box")]
    Box,
    #[sea_orm(iden = "document")]
    Document,
    #[sea_orm(iden = "bag")]
    Bag,
    #[sea_orm(iden = "envelope")]
    Envelope,
    #[sea_orm(iden = "other")]
    Other,
    #[sea_orm(iden = "undefined")]
    Undefined,
}

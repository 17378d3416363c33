use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 50).unique_key())
                    .col(string_len(Users::Email, 100).unique_key())
                    .col(string_len(Users::PasswordHash, 255))
                    .col(string_len_null(Users::Phone, 15))
                    .col(string_len_null(Users::ProfilePicture, 255))
                    .col(timestamp_with_time_zone(Users::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create admins table
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(pk_auto(Admins::Id))
                    .col(string_len(Admins::Username, 50).unique_key())
                    .col(string_len(Admins::Email, 100).unique_key())
                    .col(string_len(Admins::PasswordHash, 255))
                    .col(string_len_null(Admins::Phone, 15))
                    .col(string_len(Admins::Role, 20).default("admin"))
                    .col(timestamp_with_time_zone(Admins::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create parking_slots table
        manager
            .create_table(
                Table::create()
                    .table(ParkingSlots::Table)
                    .if_not_exists()
                    .col(pk_auto(ParkingSlots::Id))
                    .col(string_len(ParkingSlots::Location, 100))
                    .col(integer(ParkingSlots::SlotNumber))
                    .col(string_len(ParkingSlots::Status, 20).default("available"))
                    .col(integer_null(ParkingSlots::UserId))
                    .col(timestamp_with_time_zone(ParkingSlots::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_slot_user")
                            .from(ParkingSlots::Table, ParkingSlots::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_parking_slots_location_number")
                    .table(ParkingSlots::Table)
                    .col(ParkingSlots::Location)
                    .col(ParkingSlots::SlotNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create payments table
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(integer(Payments::UserId))
                    .col(string_len(Payments::PlotNo, 20))
                    .col(string_len(Payments::VehicleNo, 20))
                    .col(string_len(Payments::VehicleType, 20))
                    .col(integer(Payments::Hours))
                    .col(decimal_len(Payments::Amount, 10, 2))
                    .col(string_len(Payments::PaymentType, 20))
                    .col(string_len(Payments::PaymentStatus, 20).default("completed"))
                    .col(timestamp_with_time_zone(Payments::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_user")
                            .from(Payments::Table, Payments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create notifications table
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(pk_auto(Notifications::Id))
                    .col(string_len(Notifications::Title, 200))
                    .col(text(Notifications::Message))
                    .col(string_len(Notifications::Kind, 20).default("info"))
                    .col(boolean(Notifications::IsActive).default(true))
                    .col(timestamp_with_time_zone(Notifications::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create features table
        manager
            .create_table(
                Table::create()
                    .table(Features::Table)
                    .if_not_exists()
                    .col(pk_auto(Features::Id))
                    .col(string_len(Features::Title, 200))
                    .col(text(Features::Description))
                    .col(string_len_null(Features::Icon, 50))
                    .col(boolean(Features::IsActive).default(true))
                    .col(timestamp_with_time_zone(Features::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create guidelines table
        manager
            .create_table(
                Table::create()
                    .table(Guidelines::Table)
                    .if_not_exists()
                    .col(pk_auto(Guidelines::Id))
                    .col(string_len(Guidelines::Title, 200))
                    .col(text(Guidelines::Content))
                    .col(string_len_null(Guidelines::Category, 50))
                    .col(boolean(Guidelines::IsActive).default(true))
                    .col(timestamp_with_time_zone(Guidelines::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to respect foreign key constraints
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ParkingSlots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Guidelines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Features::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Phone,
    ProfilePicture,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Phone,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ParkingSlots {
    Table,
    Id,
    Location,
    SlotNumber,
    Status,
    UserId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    UserId,
    PlotNo,
    VehicleNo,
    VehicleType,
    Hours,
    Amount,
    PaymentType,
    PaymentStatus,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    Title,
    Message,
    Kind,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Features {
    Table,
    Id,
    Title,
    Description,
    Icon,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Guidelines {
    Table,
    Id,
    Title,
    Content,
    Category,
    IsActive,
    CreatedAt,
}

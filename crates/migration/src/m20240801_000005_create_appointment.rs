//! Create `appointment` table with FKs to `user` (customer), `stylist` and `salon`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Appointment::Table)
                    .if_not_exists()
                    .col(uuid(Appointment::Id).primary_key())
                    .col(uuid(Appointment::CustomerId).not_null())
                    .col(uuid(Appointment::StylistId).not_null())
                    .col(uuid(Appointment::SalonId).not_null())
                    .col(date(Appointment::Date).not_null())
                    .col(time(Appointment::StartTime).not_null())
                    .col(time(Appointment::EndTime).not_null())
                    .col(string_len(Appointment::Status, 20).not_null().default("booked"))
                    .col(big_integer(Appointment::TotalPriceCents).not_null())
                    .col(text(Appointment::Notes).not_null())
                    .col(timestamp_with_time_zone(Appointment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Appointment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_customer")
                            .from(Appointment::Table, Appointment::CustomerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_stylist")
                            .from(Appointment::Table, Appointment::StylistId)
                            .to(Stylist::Table, Stylist::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_salon")
                            .from(Appointment::Table, Appointment::SalonId)
                            .to(Salon::Table, Salon::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Appointment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Appointment {
    Table,
    Id,
    CustomerId,
    StylistId,
    SalonId,
    Date,
    StartTime,
    EndTime,
    Status,
    TotalPriceCents,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Stylist { Table, Id }

#[derive(DeriveIden)]
enum Salon { Table, Id }

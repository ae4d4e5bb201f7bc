use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Salon lookups by name, city and rating
        for (name, col) in [
            ("idx_salon_name", Salon::Name),
            ("idx_salon_city", Salon::City),
            ("idx_salon_rating", Salon::Rating),
        ] {
            manager
                .create_index(Index::create().name(name).table(Salon::Table).col(col).to_owned())
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_stylist_salon")
                    .table(Stylist::Table)
                    .col(Stylist::SalonId)
                    .to_owned(),
            )
            .await?;

        // Conflict check and availability scan: (stylist_id, date)
        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_stylist_date")
                    .table(Appointment::Table)
                    .col(Appointment::StylistId)
                    .col(Appointment::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_salon")
                    .table(Appointment::Table)
                    .col(Appointment::SalonId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_appointment_customer")
                    .table(Appointment::Table)
                    .col(Appointment::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_review_salon")
                    .table(Review::Table)
                    .col(Review::SalonId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_user")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_salon_name", "idx_salon_city", "idx_salon_rating"] {
            manager
                .drop_index(Index::drop().name(name).table(Salon::Table).to_owned())
                .await?;
        }
        manager
            .drop_index(Index::drop().name("idx_stylist_salon").table(Stylist::Table).to_owned())
            .await?;
        for name in ["idx_appointment_stylist_date", "idx_appointment_salon", "idx_appointment_customer"] {
            manager
                .drop_index(Index::drop().name(name).table(Appointment::Table).to_owned())
                .await?;
        }
        manager
            .drop_index(Index::drop().name("idx_review_salon").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notification_user").table(Notification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Salon { Table, Name, City, Rating }

#[derive(DeriveIden)]
enum Stylist { Table, SalonId }

#[derive(DeriveIden)]
enum Appointment { Table, StylistId, Date, SalonId, CustomerId }

#[derive(DeriveIden)]
enum Review { Table, SalonId }

#[derive(DeriveIden)]
enum Notification { Table, UserId }

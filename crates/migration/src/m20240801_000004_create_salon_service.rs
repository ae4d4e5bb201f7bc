//! Create `salon_service` table: the bookable catalogue of a salon.
//! Prices are integer cents.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SalonService::Table)
                    .if_not_exists()
                    .col(uuid(SalonService::Id).primary_key())
                    .col(uuid(SalonService::SalonId).not_null())
                    .col(string_len(SalonService::Name, 100).not_null())
                    .col(text(SalonService::Description).not_null())
                    .col(big_integer(SalonService::PriceCents).not_null())
                    .col(integer(SalonService::DurationMinutes).not_null())
                    .col(timestamp_with_time_zone(SalonService::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_salon_service_salon")
                            .from(SalonService::Table, SalonService::SalonId)
                            .to(Salon::Table, Salon::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SalonService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SalonService { Table, Id, SalonId, Name, Description, PriceCents, DurationMinutes, CreatedAt }

#[derive(DeriveIden)]
enum Salon { Table, Id }

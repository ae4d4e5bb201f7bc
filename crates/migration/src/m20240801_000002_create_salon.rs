//! Create `salon` table with optional owner FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Salon::Table)
                    .if_not_exists()
                    .col(uuid(Salon::Id).primary_key())
                    .col(ColumnDef::new(Salon::OwnerId).uuid().null())
                    .col(string_len(Salon::Name, 100).not_null())
                    .col(string_len(Salon::Address, 200).not_null())
                    .col(string_len(Salon::City, 100).not_null())
                    .col(string_len(Salon::Phone, 20).not_null())
                    .col(ColumnDef::new(Salon::Email).string_len(255).null())
                    .col(ColumnDef::new(Salon::Website).string_len(255).null())
                    .col(string_len(Salon::CountryCode, 5).not_null())
                    .col(text(Salon::Description).not_null())
                    .col(ColumnDef::new(Salon::Latitude).double().null())
                    .col(ColumnDef::new(Salon::Longitude).double().null())
                    .col(ColumnDef::new(Salon::Rating).double().null())
                    .col(timestamp_with_time_zone(Salon::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Salon::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_salon_owner")
                            .from(Salon::Table, Salon::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Salon::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Salon {
    Table,
    Id,
    OwnerId,
    Name,
    Address,
    City,
    Phone,
    Email,
    Website,
    CountryCode,
    Description,
    Latitude,
    Longitude,
    Rating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }

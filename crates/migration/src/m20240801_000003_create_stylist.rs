//! Create `stylist` table with FK to `salon` and optional unique link to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stylist::Table)
                    .if_not_exists()
                    .col(uuid(Stylist::Id).primary_key())
                    .col(uuid(Stylist::SalonId).not_null())
                    // nullable, at most one profile per account
                    .col(ColumnDef::new(Stylist::UserId).uuid().null().unique_key())
                    .col(string_len(Stylist::Name, 100).not_null())
                    .col(ColumnDef::new(Stylist::Email).string_len(255).null().unique_key())
                    .col(string_len(Stylist::Phone, 20).not_null())
                    .col(string_len(Stylist::Specialties, 200).not_null())
                    .col(integer(Stylist::YearsOfExperience).not_null())
                    .col(timestamp_with_time_zone(Stylist::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Stylist::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stylist_salon")
                            .from(Stylist::Table, Stylist::SalonId)
                            .to(Salon::Table, Salon::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stylist_user")
                            .from(Stylist::Table, Stylist::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Stylist::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Stylist {
    Table,
    Id,
    SalonId,
    UserId,
    Name,
    Email,
    Phone,
    Specialties,
    YearsOfExperience,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Salon { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }

//! Create `review` table. Reviews feed the salon's aggregate rating.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(uuid(Review::Id).primary_key())
                    .col(uuid(Review::AuthorId).not_null())
                    .col(uuid(Review::SalonId).not_null())
                    .col(ColumnDef::new(Review::StylistId).uuid().null())
                    .col(ColumnDef::new(Review::AppointmentId).uuid().null())
                    .col(integer(Review::Rating).not_null())
                    .col(text(Review::Comment).not_null())
                    .col(timestamp_with_time_zone(Review::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_author")
                            .from(Review::Table, Review::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_salon")
                            .from(Review::Table, Review::SalonId)
                            .to(Salon::Table, Salon::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_stylist")
                            .from(Review::Table, Review::StylistId)
                            .to(Stylist::Table, Stylist::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_appointment")
                            .from(Review::Table, Review::AppointmentId)
                            .to(Appointment::Table, Appointment::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Review::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Review { Table, Id, AuthorId, SalonId, StylistId, AppointmentId, Rating, Comment, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Salon { Table, Id }

#[derive(DeriveIden)]
enum Stylist { Table, Id }

#[derive(DeriveIden)]
enum Appointment { Table, Id }

//! Create `blog` and `promotion` tables (editorial content, no lifecycle).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blog::Table)
                    .if_not_exists()
                    .col(uuid(Blog::Id).primary_key())
                    .col(uuid(Blog::AuthorId).not_null())
                    .col(string_len(Blog::Title, 200).not_null())
                    .col(text(Blog::Content).not_null())
                    .col(timestamp_with_time_zone(Blog::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Blog::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_author")
                            .from(Blog::Table, Blog::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Promotion::Table)
                    .if_not_exists()
                    .col(uuid(Promotion::Id).primary_key())
                    .col(string_len(Promotion::Title, 200).not_null())
                    .col(text(Promotion::Description).not_null())
                    .col(integer(Promotion::DiscountPercentage).not_null())
                    .col(timestamp_with_time_zone(Promotion::ValidUntil).not_null())
                    .col(timestamp_with_time_zone(Promotion::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Promotion::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Blog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Blog { Table, Id, AuthorId, Title, Content, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Promotion { Table, Id, Title, Description, DiscountPercentage, ValidUntil, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

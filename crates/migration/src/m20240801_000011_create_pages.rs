//! Create `static_page` and `faq` tables (site content outside the blog).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StaticPage::Table)
                    .if_not_exists()
                    .col(uuid(StaticPage::Id).primary_key())
                    .col(string_len(StaticPage::Slug, 100).unique_key().not_null())
                    .col(string_len(StaticPage::Title, 200).not_null())
                    .col(text(StaticPage::Content).not_null())
                    .col(timestamp_with_time_zone(StaticPage::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(StaticPage::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Faq::Table)
                    .if_not_exists()
                    .col(uuid(Faq::Id).primary_key())
                    .col(string_len(Faq::Question, 300).not_null())
                    .col(text(Faq::Answer).not_null())
                    .col(integer(Faq::Position).not_null().default(0))
                    .col(timestamp_with_time_zone(Faq::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Faq::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(StaticPage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StaticPage { Table, Id, Slug, Title, Content, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Faq { Table, Id, Question, Answer, Position, CreatedAt }

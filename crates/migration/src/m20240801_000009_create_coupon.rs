//! Create `coupon` table. `discount_value` is a percentage or cents depending on `discount_type`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coupon::Table)
                    .if_not_exists()
                    .col(uuid(Coupon::Id).primary_key())
                    .col(string_len(Coupon::Code, 50).unique_key().not_null())
                    .col(text(Coupon::Description).not_null())
                    .col(string_len(Coupon::DiscountType, 16).not_null())
                    .col(big_integer(Coupon::DiscountValue).not_null())
                    .col(timestamp_with_time_zone(Coupon::StartDate).not_null())
                    .col(timestamp_with_time_zone(Coupon::EndDate).not_null())
                    .col(ColumnDef::new(Coupon::MaxUses).integer().null())
                    .col(integer(Coupon::TimesUsed).not_null().default(0))
                    .col(boolean(Coupon::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Coupon::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Coupon::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Coupon {
    Table,
    Id,
    Code,
    Description,
    DiscountType,
    DiscountValue,
    StartDate,
    EndDate,
    MaxUses,
    TimesUsed,
    IsActive,
    CreatedAt,
}

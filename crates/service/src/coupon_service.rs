//! Discount codes. Admin-only throughout, reads included.
use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder};
use serde::Deserialize;

use common::pagination::Pagination;
use common::types::Page;
use models::coupon;

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};
use crate::search_service::contains_any;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CouponFilter {
    pub discount_type: Option<coupon::DiscountType>,
    pub is_active: Option<bool>,
    /// Substring of the code or description, case-insensitive.
    pub search: Option<String>,
    /// `discount_value`, `start_date` or `end_date`; a leading `-` sorts descending.
    pub ordering: Option<String>,
}

fn ordering(raw: Option<&str>) -> Result<(coupon::Column, Order), ServiceError> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok((coupon::Column::Code, Order::Asc));
    };
    let (field, order) = match raw.strip_prefix('-') {
        Some(field) => (field, Order::Desc),
        None => (raw, Order::Asc),
    };
    let col = match field {
        "discount_value" => coupon::Column::DiscountValue,
        "start_date" => coupon::Column::StartDate,
        "end_date" => coupon::Column::EndDate,
        "code" => coupon::Column::Code,
        other => return Err(ServiceError::Validation(format!("cannot order coupons by '{other}'"))),
    };
    Ok((col, order))
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<coupon::Model, ServiceError> {
    coupon::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("coupon"))
}

pub async fn get_coupon(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<coupon::Model, ServiceError> {
    ensure(actor, &Resource::Coupon, Action::Read)?;
    load(db, id).await
}

pub async fn list_coupons(
    db: &DatabaseConnection,
    actor: &Actor,
    filter: CouponFilter,
    opts: Pagination,
) -> Result<Page<coupon::Model>, ServiceError> {
    ensure(actor, &Resource::Coupon, Action::Read)?;
    let (col, order) = ordering(filter.ordering.as_deref())?;
    let mut query = coupon::Entity::find();
    if let Some(kind) = filter.discount_type {
        query = query.filter(coupon::Column::DiscountType.eq(kind.as_str()));
    }
    if let Some(active) = filter.is_active {
        query = query.filter(coupon::Column::IsActive.eq(active));
    }
    if let Some(needle) = filter.search.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        query = query.filter(contains_any(&[coupon::Column::Code, coupon::Column::Description], needle));
    }
    fetch_page(db, query.order_by(col, order).order_by_asc(coupon::Column::Code), opts).await
}

pub async fn create_coupon(db: &DatabaseConnection, actor: &Actor, fields: coupon::CouponFields) -> Result<coupon::Model, ServiceError> {
    ensure(actor, &Resource::Coupon, Action::Create)?;
    Ok(coupon::create(db, fields).await?)
}

pub async fn update_coupon(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: coupon::CouponFields) -> Result<coupon::Model, ServiceError> {
    ensure(actor, &Resource::Coupon, Action::Update)?;
    let existing = load(db, id).await?;
    Ok(coupon::update(db, existing, fields).await?)
}

pub async fn delete_coupon(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    ensure(actor, &Resource::Coupon, Action::Delete)?;
    load(db, id).await?;
    coupon::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use models::user::Role;
    use crate::test_support::{actor, get_db};

    fn fields(code: &str) -> coupon::CouponFields {
        let start = Utc::now();
        coupon::CouponFields {
            code: code.into(),
            description: String::new(),
            discount_type: coupon::DiscountType::Fixed,
            discount_value: 500,
            start_date: start.into(),
            end_date: (start + Duration::days(10)).into(),
            max_uses: Some(100),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn codes_are_unique_and_admin_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = actor(&db, Role::Admin).await?;
        let customer = actor(&db, Role::Customer).await?;

        let c = create_coupon(&db, &admin, fields("welcome5")).await?;
        assert_eq!(c.code, "WELCOME5");
        assert_eq!(create_coupon(&db, &admin, fields("WELCOME5")).await.unwrap_err().kind(), "conflict");

        assert_eq!(list_coupons(&db, &customer, CouponFilter::default(), Pagination::default()).await.unwrap_err().kind(), "forbidden");
        assert_eq!(get_coupon(&db, &customer, c.id).await.unwrap_err().kind(), "forbidden");
        assert_eq!(coupon::find_by_code(&db, "welcome5").await?.map(|x| x.id), Some(c.id));

        delete_coupon(&db, &admin, c.id).await?;
        assert_eq!(list_coupons(&db, &admin, CouponFilter::default(), Pagination::default()).await?.total, 0);
        Ok(())
    }

    #[tokio::test]
    async fn list_filters_and_orders() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = actor(&db, Role::Admin).await?;

        let mut pct = fields("SPRING");
        pct.discount_type = coupon::DiscountType::Percentage;
        pct.discount_value = 15;
        pct.description = "Spring sale".into();
        create_coupon(&db, &admin, pct).await?;
        let mut big = fields("BIGSAVE");
        big.discount_value = 2000;
        create_coupon(&db, &admin, big).await?;
        let mut expired = fields("OLD");
        expired.is_active = false;
        create_coupon(&db, &admin, expired).await?;

        let codes = |page: Page<coupon::Model>| page.items.into_iter().map(|c| c.code).collect::<Vec<_>>();

        let fixed = CouponFilter { discount_type: Some(coupon::DiscountType::Fixed), ..Default::default() };
        assert_eq!(codes(list_coupons(&db, &admin, fixed, Pagination::default()).await?), ["BIGSAVE", "OLD"]);

        let active = CouponFilter { is_active: Some(true), ordering: Some("-discount_value".into()), ..Default::default() };
        assert_eq!(codes(list_coupons(&db, &admin, active, Pagination::default()).await?), ["BIGSAVE", "SPRING"]);

        let by_value = CouponFilter { ordering: Some("discount_value".into()), ..Default::default() };
        assert_eq!(codes(list_coupons(&db, &admin, by_value, Pagination::default()).await?), ["SPRING", "OLD", "BIGSAVE"]);

        let search = CouponFilter { search: Some("sale".into()), ..Default::default() };
        assert_eq!(codes(list_coupons(&db, &admin, search, Pagination::default()).await?), ["SPRING"]);

        let bad = CouponFilter { ordering: Some("times_used".into()), ..Default::default() };
        assert_eq!(list_coupons(&db, &admin, bad, Pagination::default()).await.unwrap_err().kind(), "validation");
        Ok(())
    }
}

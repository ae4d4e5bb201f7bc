use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use common::pagination::Pagination;
use common::types::Page;
use models::promotion;

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<promotion::Model, ServiceError> {
    promotion::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("promotion"))
}

pub async fn get_promotion(db: &DatabaseConnection, id: Uuid) -> Result<promotion::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_promotions(db: &DatabaseConnection, opts: Pagination) -> Result<Page<promotion::Model>, ServiceError> {
    fetch_page(db, promotion::Entity::find().order_by_asc(promotion::Column::ValidUntil), opts).await
}

pub async fn create_promotion(db: &DatabaseConnection, actor: &Actor, fields: promotion::PromotionFields) -> Result<promotion::Model, ServiceError> {
    ensure(actor, &Resource::Promotion, Action::Create)?;
    Ok(promotion::create(db, fields).await?)
}

pub async fn update_promotion(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: promotion::PromotionFields) -> Result<promotion::Model, ServiceError> {
    ensure(actor, &Resource::Promotion, Action::Update)?;
    let existing = load(db, id).await?;
    Ok(promotion::update(db, existing, fields).await?)
}

pub async fn delete_promotion(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    ensure(actor, &Resource::Promotion, Action::Delete)?;
    load(db, id).await?;
    promotion::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use models::user::Role;
    use crate::test_support::{actor, get_db};

    #[tokio::test]
    async fn percentage_is_bounded() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = actor(&db, Role::Admin).await?;
        let owner = actor(&db, Role::SalonOwner).await?;
        let fields = promotion::PromotionFields {
            title: "Spring".into(),
            description: String::new(),
            discount_percentage: 20,
            valid_until: (Utc::now() + Duration::days(7)).into(),
        };

        assert_eq!(create_promotion(&db, &owner, fields.clone()).await.unwrap_err().kind(), "forbidden");
        let p = create_promotion(&db, &admin, fields.clone()).await?;
        let too_much = promotion::PromotionFields { discount_percentage: 120, ..fields };
        assert_eq!(update_promotion(&db, &admin, p.id, too_much).await.unwrap_err().kind(), "validation");
        assert_eq!(get_promotion(&db, p.id).await?.discount_percentage, 20);
        Ok(())
    }
}

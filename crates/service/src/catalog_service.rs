//! The bookable services each salon offers.
use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use tracing::info;

use common::pagination::Pagination;
use common::types::Page;
use models::salon_service;

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};
use crate::salon_service as salons;

#[derive(Clone, Debug, Deserialize)]
pub struct NewService {
    pub salon_id: Uuid,
    #[serde(flatten)]
    pub fields: salon_service::ServiceFields,
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<salon_service::Model, ServiceError> {
    salon_service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))
}

async fn owner_resource(db: &DatabaseConnection, salon_id: Uuid) -> Result<Resource, ServiceError> {
    let owner = salons::load(db, salon_id).await?.owner_id;
    Ok(Resource::Service { salon_owner_id: owner })
}

pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<salon_service::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_services(db: &DatabaseConnection, salon_id: Option<Uuid>, opts: Pagination) -> Result<Page<salon_service::Model>, ServiceError> {
    let mut query = salon_service::Entity::find();
    if let Some(salon_id) = salon_id {
        query = query.filter(salon_service::Column::SalonId.eq(salon_id));
    }
    fetch_page(db, query.order_by_asc(salon_service::Column::Name), opts).await
}

pub async fn create_service(db: &DatabaseConnection, actor: &Actor, input: NewService) -> Result<salon_service::Model, ServiceError> {
    ensure(actor, &owner_resource(db, input.salon_id).await?, Action::Create)?;
    let created = salon_service::create(db, input.salon_id, input.fields).await?;
    info!(service_id = %created.id, salon_id = %created.salon_id, "service_created");
    Ok(created)
}

pub async fn update_service(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: salon_service::ServiceFields) -> Result<salon_service::Model, ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &owner_resource(db, existing.salon_id).await?, Action::Update)?;
    Ok(salon_service::update(db, existing, fields).await?)
}

pub async fn delete_service(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &owner_resource(db, existing.salon_id).await?, Action::Delete)?;
    salon_service::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{actor, fixture, get_db};

    #[tokio::test]
    async fn only_owner_edits_catalogue() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let fx = fixture(&db).await?;
        let customer = actor(&db, Role::Customer).await?;
        let fields = salon_service::ServiceFields { name: "Wash".into(), price_cents: 900, duration_minutes: 15, ..Default::default() };

        let input = NewService { salon_id: fx.salon.id, fields: fields.clone() };
        assert_eq!(create_service(&db, &customer, input.clone()).await.unwrap_err().kind(), "forbidden");
        let wash = create_service(&db, &fx.owner, input).await?;

        let pricier = salon_service::ServiceFields { price_cents: 1200, ..fields.clone() };
        assert_eq!(update_service(&db, &fx.owner, wash.id, pricier).await?.price_cents, 1200);
        let invalid = salon_service::ServiceFields { duration_minutes: 0, ..fields };
        assert_eq!(update_service(&db, &fx.owner, wash.id, invalid).await.unwrap_err().kind(), "validation");

        let listed = list_services(&db, Some(fx.salon.id), Pagination::default()).await?;
        assert_eq!(listed.total, 3);
        let names: Vec<&str> = listed.items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Cut", "Dye", "Wash"]);

        delete_service(&db, &fx.owner, wash.id).await?;
        assert_eq!(get_service(&db, wash.id).await.unwrap_err().kind(), "not_found");
        Ok(())
    }
}

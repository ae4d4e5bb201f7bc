use uuid::Uuid;
use chrono::Utc;
use sea_orm::{sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use tracing::{info, instrument};

use common::pagination::Pagination;
use common::types::Page;
use models::stylist;

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};
use crate::salon_service;

#[derive(Clone, Debug, Deserialize)]
pub struct NewStylist {
    pub salon_id: Uuid,
    #[serde(flatten)]
    pub fields: stylist::StylistFields,
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<stylist::Model, ServiceError> {
    stylist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("stylist"))
}

async fn resource(db: &DatabaseConnection, found: &stylist::Model) -> Result<Resource, ServiceError> {
    let owner = salon_service::load(db, found.salon_id).await?.owner_id;
    Ok(Resource::Stylist { salon_owner_id: owner, user_id: found.user_id })
}

pub async fn get_stylist(db: &DatabaseConnection, id: Uuid) -> Result<stylist::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_stylists(db: &DatabaseConnection, opts: Pagination) -> Result<Page<stylist::Model>, ServiceError> {
    fetch_page(db, stylist::Entity::find().order_by_asc(stylist::Column::Name), opts).await
}

#[instrument(skip(db, input), fields(user_id = %actor.user_id, salon_id = %input.salon_id))]
pub async fn create_stylist(db: &DatabaseConnection, actor: &Actor, input: NewStylist) -> Result<stylist::Model, ServiceError> {
    let s = salon_service::load(db, input.salon_id).await?;
    ensure(actor, &Resource::Stylist { salon_owner_id: s.owner_id, user_id: None }, Action::Create)?;
    let created = stylist::create(db, s.id, None, input.fields).await?;
    info!(stylist_id = %created.id, "stylist_created");
    Ok(created)
}

pub async fn update_stylist(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: stylist::StylistFields) -> Result<stylist::Model, ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &resource(db, &existing).await?, Action::Update)?;
    Ok(stylist::update(db, existing, fields).await?)
}

pub async fn delete_stylist(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &resource(db, &existing).await?, Action::Delete)?;
    stylist::Entity::delete_by_id(id).exec(db).await?;
    info!(stylist_id = %id, "stylist_deleted");
    Ok(())
}

/// Link the actor's account to an unlinked profile. An account holds at
/// most one stylist profile.
#[instrument(skip(db), fields(user_id = %actor.user_id))]
pub async fn claim_stylist(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<stylist::Model, ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &resource(db, &existing).await?, Action::Claim)?;
    if existing.user_id.is_some() {
        return Err(ServiceError::Conflict("stylist profile already linked".into()));
    }
    if stylist::find_by_user(db, actor.user_id).await?.is_some() {
        return Err(ServiceError::Conflict("account already has a stylist profile".into()));
    }
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let res = stylist::Entity::update_many()
        .col_expr(stylist::Column::UserId, Expr::value(actor.user_id))
        .col_expr(stylist::Column::UpdatedAt, Expr::value(now))
        .filter(stylist::Column::Id.eq(id))
        .filter(stylist::Column::UserId.is_null())
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::Conflict("stylist profile already linked".into()));
    }
    info!(stylist_id = %id, "stylist_claimed");
    load(db, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{actor, fixture, get_db};

    fn fields(name: &str) -> stylist::StylistFields {
        stylist::StylistFields { name: name.into(), years_of_experience: 1, ..Default::default() }
    }

    #[tokio::test]
    async fn owner_manages_and_stylist_edits_self() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let fx = fixture(&db).await?;
        let stranger = actor(&db, Role::SalonOwner).await?;

        let input = NewStylist { salon_id: fx.salon.id, fields: fields("Bo") };
        assert_eq!(create_stylist(&db, &stranger, input.clone()).await.unwrap_err().kind(), "forbidden");
        let bo = create_stylist(&db, &fx.owner, input).await?;

        let renamed = update_stylist(&db, &fx.stylist_user, fx.stylist.id, fields("Ana Maria")).await?;
        assert_eq!(renamed.name, "Ana Maria");
        assert_eq!(update_stylist(&db, &fx.stylist_user, bo.id, fields("Nope")).await.unwrap_err().kind(), "forbidden");
        assert_eq!(delete_stylist(&db, &fx.stylist_user, fx.stylist.id).await.unwrap_err().kind(), "forbidden");

        delete_stylist(&db, &fx.owner, bo.id).await?;
        assert_eq!(get_stylist(&db, bo.id).await.unwrap_err().kind(), "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn claim_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let fx = fixture(&db).await?;
        let newcomer = actor(&db, Role::Stylist).await?;
        let customer = actor(&db, Role::Customer).await?;

        let first = create_stylist(&db, &fx.owner, NewStylist { salon_id: fx.salon.id, fields: fields("First") }).await?;
        let second = create_stylist(&db, &fx.owner, NewStylist { salon_id: fx.salon.id, fields: fields("Second") }).await?;

        assert_eq!(claim_stylist(&db, &customer, first.id).await.unwrap_err().kind(), "forbidden");
        // already linked to the fixture's stylist account
        assert_eq!(claim_stylist(&db, &newcomer, fx.stylist.id).await.unwrap_err().kind(), "conflict");

        let claimed = claim_stylist(&db, &newcomer, first.id).await?;
        assert_eq!(claimed.user_id, Some(newcomer.user_id));
        // one profile per account
        assert_eq!(claim_stylist(&db, &newcomer, second.id).await.unwrap_err().kind(), "conflict");
        Ok(())
    }
}

use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use serde::Deserialize;
use tracing::{info, instrument};

use common::pagination::Pagination;
use common::types::Page;
use models::{appointment, review, stylist};

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};
use crate::salon_service;

#[derive(Clone, Debug, Deserialize)]
pub struct NewReview {
    pub salon_id: Uuid,
    #[serde(default)]
    pub stylist_id: Option<Uuid>,
    #[serde(default)]
    pub appointment_id: Option<Uuid>,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReviewUpdate {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<review::Model, ServiceError> {
    review::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("review"))
}

pub async fn get_review(db: &DatabaseConnection, id: Uuid) -> Result<review::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_reviews(db: &DatabaseConnection, salon_id: Option<Uuid>, opts: Pagination) -> Result<Page<review::Model>, ServiceError> {
    let mut query = review::Entity::find();
    if let Some(salon_id) = salon_id {
        query = query.filter(review::Column::SalonId.eq(salon_id));
    }
    fetch_page(db, query.order_by_desc(review::Column::CreatedAt), opts).await
}

#[instrument(skip(db, input), fields(user_id = %actor.user_id, salon_id = %input.salon_id))]
pub async fn create_review(db: &DatabaseConnection, actor: &Actor, input: NewReview) -> Result<review::Model, ServiceError> {
    ensure(actor, &Resource::Review { author_id: None }, Action::Create)?;
    salon_service::load(db, input.salon_id).await?;
    if let Some(stylist_id) = input.stylist_id {
        let s = stylist::Entity::find_by_id(stylist_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("stylist"))?;
        if s.salon_id != input.salon_id {
            return Err(ServiceError::Validation("stylist does not work at this salon".into()));
        }
    }
    if let Some(appointment_id) = input.appointment_id {
        let a = appointment::Entity::find_by_id(appointment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("appointment"))?;
        if a.salon_id != input.salon_id || a.customer_id != actor.user_id {
            return Err(ServiceError::Validation("appointment does not match this review".into()));
        }
    }

    let txn = db.begin().await?;
    let created = review::create(
        &txn,
        review::NewReview {
            author_id: actor.user_id,
            salon_id: input.salon_id,
            stylist_id: input.stylist_id,
            appointment_id: input.appointment_id,
            rating: input.rating,
            comment: input.comment,
        },
    )
    .await?;
    salon_service::refresh_rating(&txn, created.salon_id).await?;
    txn.commit().await?;
    info!(review_id = %created.id, rating = created.rating, "review_created");
    Ok(created)
}

pub async fn update_review(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: ReviewUpdate) -> Result<review::Model, ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &Resource::Review { author_id: Some(existing.author_id) }, Action::Update)?;
    let txn = db.begin().await?;
    let updated = review::update(&txn, existing, input.rating, input.comment).await?;
    salon_service::refresh_rating(&txn, updated.salon_id).await?;
    txn.commit().await?;
    Ok(updated)
}

pub async fn delete_review(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &Resource::Review { author_id: Some(existing.author_id) }, Action::Delete)?;
    let txn = db.begin().await?;
    review::Entity::delete_by_id(id).exec(&txn).await?;
    salon_service::refresh_rating(&txn, existing.salon_id).await?;
    txn.commit().await?;
    info!(review_id = %id, "review_deleted");
    Ok(())
}

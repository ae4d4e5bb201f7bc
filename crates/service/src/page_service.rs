//! Static pages and the FAQ. Everyone reads; admins write.
use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use common::pagination::Pagination;
use common::types::Page;
use models::{faq, static_page};

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<static_page::Model, ServiceError> {
    static_page::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("page"))
}

pub async fn get_page(db: &DatabaseConnection, id: Uuid) -> Result<static_page::Model, ServiceError> {
    load(db, id).await
}

pub async fn get_page_by_slug(db: &DatabaseConnection, slug: &str) -> Result<static_page::Model, ServiceError> {
    static_page::find_by_slug(db, slug)
        .await?
        .ok_or_else(|| ServiceError::not_found("page"))
}

pub async fn list_pages(db: &DatabaseConnection, opts: Pagination) -> Result<Page<static_page::Model>, ServiceError> {
    fetch_page(db, static_page::Entity::find().order_by_asc(static_page::Column::Slug), opts).await
}

pub async fn create_page(db: &DatabaseConnection, actor: &Actor, fields: static_page::PageFields) -> Result<static_page::Model, ServiceError> {
    ensure(actor, &Resource::StaticPage, Action::Create)?;
    Ok(static_page::create(db, fields).await?)
}

pub async fn update_page(
    db: &DatabaseConnection,
    actor: &Actor,
    id: Uuid,
    fields: static_page::PageFields,
) -> Result<static_page::Model, ServiceError> {
    ensure(actor, &Resource::StaticPage, Action::Update)?;
    let existing = load(db, id).await?;
    Ok(static_page::update(db, existing, fields).await?)
}

pub async fn delete_page(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    ensure(actor, &Resource::StaticPage, Action::Delete)?;
    load(db, id).await?;
    static_page::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

pub async fn list_faqs(db: &DatabaseConnection, opts: Pagination) -> Result<Page<faq::Model>, ServiceError> {
    let query = faq::Entity::find()
        .order_by_asc(faq::Column::Position)
        .order_by_asc(faq::Column::CreatedAt);
    fetch_page(db, query, opts).await
}

pub async fn get_faq(db: &DatabaseConnection, id: Uuid) -> Result<faq::Model, ServiceError> {
    faq::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("faq"))
}

pub async fn create_faq(db: &DatabaseConnection, actor: &Actor, fields: faq::FaqFields) -> Result<faq::Model, ServiceError> {
    ensure(actor, &Resource::Faq, Action::Create)?;
    Ok(faq::create(db, fields).await?)
}

pub async fn delete_faq(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    ensure(actor, &Resource::Faq, Action::Delete)?;
    get_faq(db, id).await?;
    faq::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

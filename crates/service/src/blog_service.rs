use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Deserialize;

use common::pagination::Pagination;
use common::types::Page;
use models::blog;

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};

#[derive(Clone, Debug, Deserialize)]
pub struct BlogInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

async fn load(db: &DatabaseConnection, id: Uuid) -> Result<blog::Model, ServiceError> {
    blog::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("blog"))
}

pub async fn get_blog(db: &DatabaseConnection, id: Uuid) -> Result<blog::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_blogs(db: &DatabaseConnection, opts: Pagination) -> Result<Page<blog::Model>, ServiceError> {
    fetch_page(db, blog::Entity::find().order_by_desc(blog::Column::CreatedAt), opts).await
}

pub async fn create_blog(db: &DatabaseConnection, actor: &Actor, input: BlogInput) -> Result<blog::Model, ServiceError> {
    ensure(actor, &Resource::Blog, Action::Create)?;
    Ok(blog::create(db, actor.user_id, &input.title, &input.content).await?)
}

pub async fn update_blog(db: &DatabaseConnection, actor: &Actor, id: Uuid, input: BlogInput) -> Result<blog::Model, ServiceError> {
    ensure(actor, &Resource::Blog, Action::Update)?;
    let existing = load(db, id).await?;
    Ok(blog::update(db, existing, &input.title, &input.content).await?)
}

pub async fn delete_blog(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    ensure(actor, &Resource::Blog, Action::Delete)?;
    load(db, id).await?;
    blog::Entity::delete_by_id(id).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{actor, get_db};

    #[tokio::test]
    async fn admins_write_everyone_reads() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = actor(&db, Role::Admin).await?;
        let customer = actor(&db, Role::Customer).await?;
        let input = BlogInput { title: "Summer looks".into(), content: "Braids.".into() };

        assert_eq!(create_blog(&db, &customer, input.clone()).await.unwrap_err().kind(), "forbidden");
        let post = create_blog(&db, &admin, input).await?;
        assert_eq!(post.author_id, admin.user_id);

        let edited = update_blog(&db, &admin, post.id, BlogInput { title: "Autumn looks".into(), content: String::new() }).await?;
        assert_eq!(edited.title, "Autumn looks");
        assert_eq!(
            update_blog(&db, &admin, post.id, BlogInput { title: " ".into(), content: String::new() }).await.unwrap_err().kind(),
            "validation"
        );
        assert_eq!(list_blogs(&db, Pagination::default()).await?.total, 1);

        delete_blog(&db, &admin, post.id).await?;
        assert_eq!(get_blog(&db, post.id).await.unwrap_err().kind(), "not_found");
        Ok(())
    }
}

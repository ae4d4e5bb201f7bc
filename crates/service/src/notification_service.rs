use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use tracing::{info, instrument};

use common::pagination::Pagination;
use common::types::Page;
use models::{notification, user};

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{ensure, Action, Actor, Resource};

/// The actor's inbox, newest first.
pub async fn list_own(db: &DatabaseConnection, actor: &Actor, opts: Pagination) -> Result<Page<notification::Model>, ServiceError> {
    let query = notification::Entity::find()
        .filter(notification::Column::UserId.eq(actor.user_id))
        .order_by_desc(notification::Column::CreatedAt);
    fetch_page(db, query, opts).await
}

pub async fn mark_read(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<notification::Model, ServiceError> {
    let found = notification::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("notification"))?;
    ensure(actor, &Resource::Notification { recipient_id: Some(found.user_id) }, Action::Update)?;
    Ok(notification::mark_read(db, found).await?)
}

/// Send `message` to every user. Returns how many notifications were written.
#[instrument(skip(db, message), fields(user_id = %actor.user_id))]
pub async fn broadcast(db: &DatabaseConnection, actor: &Actor, message: &str) -> Result<u64, ServiceError> {
    ensure(actor, &Resource::Notification { recipient_id: None }, Action::Create)?;
    if message.trim().is_empty() {
        return Err(ServiceError::Validation("message required".into()));
    }
    let txn = db.begin().await?;
    let users = user::Entity::find().all(&txn).await?;
    for u in &users {
        notification::create(&txn, u.id, message).await?;
    }
    txn.commit().await?;
    info!(recipients = users.len(), "notification_broadcast");
    Ok(users.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{actor, get_db};

    #[tokio::test]
    async fn broadcast_reaches_everyone_and_only_recipient_marks() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = actor(&db, Role::Admin).await?;
        let alice = actor(&db, Role::Customer).await?;
        let bob = actor(&db, Role::Customer).await?;

        assert_eq!(broadcast(&db, &alice, "hi").await.unwrap_err().kind(), "forbidden");
        assert_eq!(broadcast(&db, &admin, "Closed on Monday").await?, 3);

        let inbox = list_own(&db, &alice, Pagination::default()).await?;
        assert_eq!(inbox.total, 1);
        let note = &inbox.items[0];
        assert!(!note.is_read);

        assert_eq!(mark_read(&db, &bob, note.id).await.unwrap_err().kind(), "forbidden");
        assert!(mark_read(&db, &alice, note.id).await?.is_read);
        Ok(())
    }
}

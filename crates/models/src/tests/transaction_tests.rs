use anyhow::Result;
use sea_orm::{EntityTrait, TransactionTrait};
use uuid::Uuid;

use super::setup_test_db;
use crate::user::{self, Role};

#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = setup_test_db().await?;
    let id = Uuid::new_v4();

    let txn = db.begin().await?;
    user::upsert(&txn, id, "tx@example.com", "Tx", Role::Customer).await?;
    txn.commit().await?;

    assert!(user::Entity::find_by_id(id).one(&db).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = setup_test_db().await?;
    let id = Uuid::new_v4();

    let txn = db.begin().await?;
    user::upsert(&txn, id, "tx@example.com", "Tx", Role::Customer).await?;
    txn.rollback().await?;

    assert!(user::Entity::find_by_id(id).one(&db).await?.is_none());
    Ok(())
}

/// CRUD operations against a migrated in-memory database
pub mod crud_tests;

/// Transaction handling
pub mod transaction_tests;

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect_memory;

/// Fresh in-memory database with every migration applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

use uuid::Uuid;
use sea_orm::DatabaseConnection;
use tracing::instrument;

use models::user::{self, Role};
use crate::{errors::ServiceError, permissions::Actor};

/// Make sure a token's subject exists locally and return it as an actor.
#[instrument(skip(db, email, name))]
pub async fn provision(db: &DatabaseConnection, id: Uuid, email: &str, name: &str, role: Role) -> Result<Actor, ServiceError> {
    let u = user::upsert(db, id, email, name, role).await?;
    Ok(Actor::new(u.id, role))
}

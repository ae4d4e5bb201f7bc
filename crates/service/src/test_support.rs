#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::db::connect_memory;
use models::user::{self, Role};

use crate::permissions::Actor;

/// Fresh in-memory database with all migrations applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Provision a user row and return the matching actor.
pub async fn actor(db: &DatabaseConnection, role: Role) -> Result<Actor, anyhow::Error> {
    let id = Uuid::new_v4();
    let email = format!("{}-{}@example.com", role.as_str(), id.simple());
    user::upsert(db, id, &email, role.as_str(), role).await?;
    Ok(Actor::new(id, role))
}

pub fn salon_fields(name: &str) -> models::salon::SalonFields {
    models::salon::SalonFields {
        name: name.into(),
        address: "1 High St".into(),
        city: "Springfield".into(),
        phone: "+1234567890".into(),
        ..Default::default()
    }
}

/// A salon with an owner, one stylist linked to a stylist account and two services.
pub struct Fixture {
    pub owner: Actor,
    pub stylist_user: Actor,
    pub salon: models::salon::Model,
    pub stylist: models::stylist::Model,
    /// 30 minutes, 2500 cents.
    pub cut: models::salon_service::Model,
    /// 60 minutes, 4000 cents.
    pub dye: models::salon_service::Model,
}

pub async fn fixture(db: &DatabaseConnection) -> Result<Fixture, anyhow::Error> {
    use models::{salon, salon_service, stylist};

    let owner = actor(db, Role::SalonOwner).await?;
    let stylist_user = actor(db, Role::Stylist).await?;
    let salon = salon::create(db, Some(owner.user_id), salon_fields("Glamour")).await?;
    let stylist = stylist::create(
        db,
        salon.id,
        Some(stylist_user.user_id),
        stylist::StylistFields {
            name: "Ana".into(),
            email: Some(format!("ana-{}@example.com", Uuid::new_v4().simple())),
            years_of_experience: 4,
            ..Default::default()
        },
    )
    .await?;
    let cut = salon_service::create(
        db,
        salon.id,
        salon_service::ServiceFields { name: "Cut".into(), price_cents: 2500, duration_minutes: 30, ..Default::default() },
    )
    .await?;
    let dye = salon_service::create(
        db,
        salon.id,
        salon_service::ServiceFields { name: "Dye".into(), price_cents: 4000, duration_minutes: 60, ..Default::default() },
    )
    .await?;
    Ok(Fixture { owner, stylist_user, salon, stylist, cut, dye })
}

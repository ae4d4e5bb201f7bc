//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240801_000001_create_user;
mod m20240801_000002_create_salon;
mod m20240801_000003_create_stylist;
mod m20240801_000004_create_salon_service;
mod m20240801_000005_create_appointment;
mod m20240801_000006_create_appointment_service;
mod m20240801_000007_create_review;
mod m20240801_000008_create_content;
mod m20240801_000009_create_coupon;
mod m20240801_000010_create_notification;
mod m20240801_000011_create_pages;
mod m20240801_000020_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240801_000001_create_user::Migration),
            Box::new(m20240801_000002_create_salon::Migration),
            Box::new(m20240801_000003_create_stylist::Migration),
            Box::new(m20240801_000004_create_salon_service::Migration),
            Box::new(m20240801_000005_create_appointment::Migration),
            Box::new(m20240801_000006_create_appointment_service::Migration),
            Box::new(m20240801_000007_create_review::Migration),
            Box::new(m20240801_000008_create_content::Migration),
            Box::new(m20240801_000009_create_coupon::Migration),
            Box::new(m20240801_000010_create_notification::Migration),
            Box::new(m20240801_000011_create_pages::Migration),
            // Indexes should always be applied last
            Box::new(m20240801_000020_add_indexes::Migration),
        ]
    }
}

//! Create `appointment_service` link table (many-to-many appointment <-> service).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppointmentService::Table)
                    .if_not_exists()
                    .col(uuid(AppointmentService::AppointmentId).not_null())
                    .col(uuid(AppointmentService::ServiceId).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_appointment_service")
                            .col(AppointmentService::AppointmentId)
                            .col(AppointmentService::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_service_appointment")
                            .from(AppointmentService::Table, AppointmentService::AppointmentId)
                            .to(Appointment::Table, Appointment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointment_service_service")
                            .from(AppointmentService::Table, AppointmentService::ServiceId)
                            .to(SalonService::Table, SalonService::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppointmentService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AppointmentService { Table, AppointmentId, ServiceId }

#[derive(DeriveIden)]
enum Appointment { Table, Id }

#[derive(DeriveIden)]
enum SalonService { Table, Id }

//! Link table between appointments and the catalogue services they book.
use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{appointment, salon_service};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointment_service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub appointment_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub service_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Appointment,
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Appointment => Entity::belongs_to(appointment::Entity)
                .from(Column::AppointmentId)
                .to(appointment::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(salon_service::Entity)
                .from(Column::ServiceId)
                .to(salon_service::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Bookable catalogue entries. Named `salon_service` to stay clear of the
//! service layer crate.
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, salon};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "salon_service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub duration_minutes: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Salon }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Salon => Entity::belongs_to(salon::Entity).from(Column::SalonId).to(salon::Column::Id).into(),
        }
    }
}

impl Related<salon::Entity> for Entity {
    fn to() -> RelationDef { Relation::Salon.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceFields {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub duration_minutes: i32,
}

impl ServiceFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if self.name.trim().is_empty() {
            return Err(errors::ModelError::Validation("name required".into()));
        }
        if self.name.chars().count() > 100 {
            return Err(errors::ModelError::Validation("name too long (<=100)".into()));
        }
        if self.price_cents < 0 {
            return Err(errors::ModelError::Validation("price_cents must be >= 0".into()));
        }
        if self.duration_minutes <= 0 {
            return Err(errors::ModelError::Validation("duration_minutes must be > 0".into()));
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, salon_id: Uuid, fields: ServiceFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        salon_id: Set(salon_id),
        name: Set(fields.name.trim().to_string()),
        description: Set(fields.description),
        price_cents: Set(fields.price_cents),
        duration_minutes: Set(fields.duration_minutes),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: ServiceFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(fields.name.trim().to_string());
    am.description = Set(fields.description);
    am.price_cents = Set(fields.price_cents);
    am.duration_minutes = Set(fields.duration_minutes);
    Ok(am.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_and_duration_bounds() {
        let ok = ServiceFields { name: "Cut".into(), price_cents: 0, duration_minutes: 30, ..Default::default() };
        assert!(ok.validate().is_ok());
        assert!(ServiceFields { price_cents: -1, ..ok.clone() }.validate().is_err());
        assert!(ServiceFields { duration_minutes: 0, ..ok }.validate().is_err());
    }
}

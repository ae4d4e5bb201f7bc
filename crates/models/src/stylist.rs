use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, salon, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stylist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub salon_id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub phone: String,
    pub specialties: String,
    pub years_of_experience: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Salon,
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Salon => Entity::belongs_to(salon::Entity).from(Column::SalonId).to(salon::Column::Id).into(),
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl Related<salon::Entity> for Entity {
    fn to() -> RelationDef { Relation::Salon.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StylistFields {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub specialties: String,
    #[serde(default)]
    pub years_of_experience: i32,
}

impl StylistFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if self.name.trim().is_empty() {
            return Err(errors::ModelError::Validation("name required".into()));
        }
        if self.name.chars().count() > 100 {
            return Err(errors::ModelError::Validation("name too long (<=100)".into()));
        }
        if let Some(email) = self.email.as_deref() { user::validate_email(email)?; }
        if !self.phone.is_empty() { salon::validate_phone(&self.phone)?; }
        if self.specialties.chars().count() > 200 {
            return Err(errors::ModelError::Validation("specialties too long (<=200)".into()));
        }
        if self.years_of_experience < 0 {
            return Err(errors::ModelError::Validation("years_of_experience must be >= 0".into()));
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, salon_id: Uuid, user_id: Option<Uuid>, fields: StylistFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        salon_id: Set(salon_id),
        user_id: Set(user_id),
        name: Set(fields.name.trim().to_string()),
        email: Set(fields.email),
        phone: Set(fields.phone),
        specialties: Set(fields.specialties),
        years_of_experience: Set(fields.years_of_experience),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: StylistFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(fields.name.trim().to_string());
    am.email = Set(fields.email);
    am.phone = Set(fields.phone);
    am.specialties = Set(fields.specialties);
    am.years_of_experience = Set(fields.years_of_experience);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_experience_rejected() {
        let f = StylistFields { name: "Ana".into(), years_of_experience: -1, ..Default::default() };
        assert!(f.validate().is_err());
        let f = StylistFields { name: "Ana".into(), years_of_experience: 3, ..Default::default() };
        assert!(f.validate().is_ok());
    }
}

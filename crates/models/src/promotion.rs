use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub discount_percentage: i32,
    pub valid_until: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromotionFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount_percentage: i32,
    pub valid_until: DateTime<FixedOffset>,
}

impl PromotionFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if self.title.trim().is_empty() {
            return Err(errors::ModelError::Validation("title required".into()));
        }
        if !(0..=100).contains(&self.discount_percentage) {
            return Err(errors::ModelError::Validation("discount_percentage must be within 0..=100".into()));
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: PromotionFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(fields.title.trim().to_string()),
        description: Set(fields.description),
        discount_percentage: Set(fields.discount_percentage),
        valid_until: Set(fields.valid_until),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: PromotionFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.title = Set(fields.title.trim().to_string());
    am.description = Set(fields.description);
    am.discount_percentage = Set(fields.discount_percentage);
    am.valid_until = Set(fields.valid_until);
    Ok(am.update(db).await?)
}

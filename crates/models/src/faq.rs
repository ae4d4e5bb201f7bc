use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "faq")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    /// Display order, ascending.
    pub position: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaqFields {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub position: i32,
}

impl FaqFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err(errors::ModelError::Validation("question and answer required".into()));
        }
        if self.question.chars().count() > 300 {
            return Err(errors::ModelError::Validation("question too long (<=300)".into()));
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: FaqFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        question: Set(fields.question.trim().to_string()),
        answer: Set(fields.answer),
        position: Set(fields.position),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

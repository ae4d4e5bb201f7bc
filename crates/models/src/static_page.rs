use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "static_page")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageFields {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Lower-cases the slug and rejects anything outside `[a-z0-9-]`.
pub fn normalize_slug(slug: &str) -> Result<String, errors::ModelError> {
    let slug = slug.trim().to_ascii_lowercase();
    if slug.is_empty() || slug.len() > 100 {
        return Err(errors::ModelError::Validation("slug must be 1..=100 characters".into()));
    }
    if !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(errors::ModelError::Validation("slug may contain only letters, digits and '-'".into()));
    }
    Ok(slug)
}

impl PageFields {
    pub fn validate(&self) -> Result<String, errors::ModelError> {
        if self.title.trim().is_empty() {
            return Err(errors::ModelError::Validation("title required".into()));
        }
        if self.title.chars().count() > 200 {
            return Err(errors::ModelError::Validation("title too long (<=200)".into()));
        }
        normalize_slug(&self.slug)
    }
}

pub async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<Option<Model>, errors::ModelError> {
    let slug = normalize_slug(slug)?;
    Ok(Entity::find().filter(Column::Slug.eq(slug)).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: PageFields) -> Result<Model, errors::ModelError> {
    let slug = fields.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        slug: Set(slug),
        title: Set(fields.title.trim().to_string()),
        content: Set(fields.content),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: PageFields) -> Result<Model, errors::ModelError> {
    let slug = fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.slug = Set(slug);
    am.title = Set(fields.title.trim().to_string());
    am.content = Set(fields.content);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

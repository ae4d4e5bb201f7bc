use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Author }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user::Entity).from(Column::AuthorId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() { return Err(errors::ModelError::Validation("title required".into())); }
    if title.chars().count() > 200 { return Err(errors::ModelError::Validation("title too long (<=200)".into())); }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, author_id: Uuid, title: &str, content: &str) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        author_id: Set(author_id),
        title: Set(title.trim().to_string()),
        content: Set(content.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, title: &str, content: &str) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    let mut am: ActiveModel = existing.into();
    am.title = Set(title.trim().to_string());
    am.content = Set(content.to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

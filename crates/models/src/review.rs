use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, salon, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub salon_id: Uuid,
    pub stylist_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Author,
    Salon,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user::Entity).from(Column::AuthorId).to(user::Column::Id).into(),
            Relation::Salon => Entity::belongs_to(salon::Entity).from(Column::SalonId).to(salon::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_rating(rating: i32) -> Result<(), errors::ModelError> {
    if !(1..=5).contains(&rating) {
        return Err(errors::ModelError::Validation("rating must be within 1..=5".into()));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct NewReview {
    pub author_id: Uuid,
    pub salon_id: Uuid,
    pub stylist_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewReview) -> Result<Model, errors::ModelError> {
    validate_rating(new.rating)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        author_id: Set(new.author_id),
        salon_id: Set(new.salon_id),
        stylist_id: Set(new.stylist_id),
        appointment_id: Set(new.appointment_id),
        rating: Set(new.rating),
        comment: Set(new.comment),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, rating: i32, comment: String) -> Result<Model, errors::ModelError> {
    validate_rating(rating)?;
    let mut am: ActiveModel = existing.into();
    am.rating = Set(rating);
    am.comment = Set(comment);
    Ok(am.update(db).await?)
}

/// Mean of a salon's review ratings, `None` when it has none.
pub async fn mean_rating<C: ConnectionTrait>(db: &C, salon_id: Uuid) -> Result<Option<f64>, errors::ModelError> {
    let rows = Entity::find().filter(Column::SalonId.eq(salon_id)).all(db).await?;
    if rows.is_empty() {
        return Ok(None);
    }
    let sum: i64 = rows.iter().map(|r| i64::from(r.rating)).sum();
    Ok(Some(sum as f64 / rows.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
    }
}

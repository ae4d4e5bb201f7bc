use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "salon")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub country_code: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity).from(Column::OwnerId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Writable salon fields, shared by create and full update.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SalonFields {
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn required(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} required")));
    }
    if value.chars().count() > max {
        return Err(errors::ModelError::Validation(format!("{field} too long (<={max})")));
    }
    Ok(())
}

/// `^\+?1?\d{9,15}$`
pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let ok = digits.chars().all(|c| c.is_ascii_digit()) && {
        let n = digits.len();
        (9..=15).contains(&n) || (digits.starts_with('1') && (10..=16).contains(&n))
    };
    if !ok {
        return Err(errors::ModelError::Validation(
            "phone number must be entered in the format '+999999999', up to 15 digits".into(),
        ));
    }
    Ok(())
}

pub fn validate_website(url: &str) -> Result<(), errors::ModelError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(errors::ModelError::Validation("website must start with http(s)".into()));
    }
    Ok(())
}

pub fn validate_coordinates(lat: Option<f64>, lon: Option<f64>) -> Result<(), errors::ModelError> {
    match (lat, lon) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => Ok(()),
        (Some(_), Some(_)) => Err(errors::ModelError::Validation("coordinates out of range".into())),
        _ => Err(errors::ModelError::Validation("latitude and longitude must be given together".into())),
    }
}

pub fn validate_rating(rating: f64) -> Result<(), errors::ModelError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(errors::ModelError::Validation("rating must be within 0..=5".into()));
    }
    Ok(())
}

impl SalonFields {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        required("name", &self.name, 100)?;
        required("address", &self.address, 200)?;
        required("city", &self.city, 100)?;
        validate_phone(&self.phone)?;
        if let Some(email) = self.email.as_deref() { user::validate_email(email)?; }
        if let Some(site) = self.website.as_deref() { validate_website(site)?; }
        if self.country_code.chars().count() > 5 {
            return Err(errors::ModelError::Validation("country_code too long (<=5)".into()));
        }
        validate_coordinates(self.latitude, self.longitude)
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, owner_id: Option<Uuid>, fields: SalonFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(owner_id),
        name: Set(fields.name.trim().to_string()),
        address: Set(fields.address),
        city: Set(fields.city),
        phone: Set(fields.phone),
        email: Set(fields.email),
        website: Set(fields.website),
        country_code: Set(fields.country_code),
        description: Set(fields.description),
        latitude: Set(fields.latitude),
        longitude: Set(fields.longitude),
        rating: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: SalonFields) -> Result<Model, errors::ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(fields.name.trim().to_string());
    am.address = Set(fields.address);
    am.city = Set(fields.city);
    am.phone = Set(fields.phone);
    am.email = Set(fields.email);
    am.website = Set(fields.website);
    am.country_code = Set(fields.country_code);
    am.description = Set(fields.description);
    am.latitude = Set(fields.latitude);
    am.longitude = Set(fields.longitude);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn set_rating<C: ConnectionTrait>(db: &C, id: Uuid, rating: Option<f64>) -> Result<(), errors::ModelError> {
    if let Some(r) = rating { validate_rating(r)?; }
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| errors::ModelError::Validation("salon not found".into()))?
        .into();
    found.rating = Set(rating);
    found.updated_at = Set(Utc::now().into());
    found.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> SalonFields {
        SalonFields {
            name: "Glamour Salon".into(),
            address: "123 Main St".into(),
            city: "Metropolis".into(),
            phone: "+1234567890".into(),
            ..SalonFields::default()
        }
    }

    #[test]
    fn phone_format() {
        assert!(validate_phone("+1234567890").is_ok());
        assert!(validate_phone("123456789").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+12-345-678-90").is_err());
        assert!(validate_phone("1234567890123456").is_ok());
        assert!(validate_phone("9234567890123456").is_err());
    }

    #[test]
    fn fields_validation() {
        assert!(fields().validate().is_ok());
        let mut f = fields();
        f.name = "  ".into();
        assert!(f.validate().is_err());
        let mut f = fields();
        f.latitude = Some(10.0);
        assert!(f.validate().is_err());
        let mut f = fields();
        f.latitude = Some(91.0);
        f.longitude = Some(0.0);
        assert!(f.validate().is_err());
        let mut f = fields();
        f.website = Some("ftp://x".into());
        assert!(f.validate().is_err());
    }
}
